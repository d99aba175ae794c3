//! Read-only views handed to the entry renderer and poster

use serde::{Deserialize, Serialize};

use super::tier::StarTier;
use crate::value_objects::Snowflake;

/// Point-in-time view of a starred message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarSnapshot {
    pub guild_id: Snowflake,
    pub message_id: Snowflake,
    pub entry_id: Option<Snowflake>,
    pub reactors: Vec<Snowflake>,
    pub count: i64,
    pub tier: StarTier,
}

impl StarSnapshot {
    /// Build a snapshot; count and tier are derived from `reactors`
    pub fn new(
        guild_id: Snowflake,
        message_id: Snowflake,
        entry_id: Option<Snowflake>,
        mut reactors: Vec<Snowflake>,
    ) -> Self {
        reactors.sort_unstable();
        let count = reactors.len() as i64;
        Self {
            guild_id,
            message_id,
            entry_id,
            reactors,
            count,
            tier: StarTier::for_count(count),
        }
    }

    /// One-line summary, e.g. `⭐ **3** (ID: 1234)`
    pub fn headline(&self) -> String {
        format!("{} **{}** (ID: {})", self.tier.emoji(), self.count, self.message_id)
    }
}

/// Rendered entry body, opaque to the starboard core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryContent {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<serde_json::Value>,
}

impl EntryContent {
    /// Plain text entry
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embed: None,
        }
    }
}
