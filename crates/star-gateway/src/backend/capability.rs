use async_trait::async_trait;

use star_core::{CapabilityCheck, Snowflake};

/// Capability check that grants everything
///
/// The standalone gateway has no permission model to consult.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllCapability;

#[async_trait]
impl CapabilityCheck for AllowAllCapability {
    async fn can_post(&self, _channel_id: Snowflake) -> bool {
        true
    }

    async fn has_embed_capability(&self, _channel_id: Snowflake) -> bool {
        true
    }
}
