//! Starboard settings - per-guild board configuration

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Board configuration for one guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StarboardSettings {
    pub guild_id: Snowflake,

    /// Channel entries are posted to; `None` until an admin picks one
    pub channel_id: Option<Snowflake>,

    /// Distinct stars required before an entry is first created
    #[validate(range(min = 1, message = "Threshold must be at least 1"))]
    pub threshold: i64,
}

impl StarboardSettings {
    /// Create validated settings
    pub fn new(
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
        threshold: i64,
    ) -> Result<Self, DomainError> {
        let settings = Self {
            guild_id,
            channel_id,
            threshold,
        };
        settings.check()?;
        Ok(settings)
    }

    /// Run field validation, mapping failures to [`DomainError::InvalidThreshold`]
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|_| DomainError::InvalidThreshold(self.threshold))
    }

    /// Check whether `count` stars is enough to create an entry
    #[inline]
    pub fn meets_threshold(&self, count: i64) -> bool {
        count >= self.threshold
    }
}
