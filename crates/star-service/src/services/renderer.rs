//! Default entry renderer

use async_trait::async_trait;
use serde_json::json;

use star_core::{DomainError, EntryContent, EntryRenderer, StarSnapshot, StarTier};

/// Renders an entry as the snapshot headline plus a small embed
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEntryRenderer;

impl TextEntryRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Embed accent colour for a tier, brighter as the count grows
    pub const fn color(tier: StarTier) -> u32 {
        match tier {
            StarTier::Star => 0x00FF_D700,
            StarTier::GlowingStar => 0x00FF_C107,
            StarTier::Dizzy => 0x00FF_A000,
            StarTier::Sparkles => 0x00FF_6F00,
        }
    }
}

#[async_trait]
impl EntryRenderer for TextEntryRenderer {
    async fn render(&self, snapshot: &StarSnapshot) -> Result<EntryContent, DomainError> {
        let embed = json!({
            "color": Self::color(snapshot.tier),
            "description": format!(
                "Starred by {} member{}",
                snapshot.count,
                if snapshot.count == 1 { "" } else { "s" }
            ),
            "footer": { "text": format!("Message ID: {}", snapshot.message_id) },
        });

        Ok(EntryContent {
            content: snapshot.headline(),
            embed: Some(embed),
        })
    }
}
