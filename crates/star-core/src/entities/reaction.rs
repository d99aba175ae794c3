//! Star reaction entity - one member nominating one message

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A single star on a starred message
///
/// Identity is `(guild_id, message_id, user_id)`; a member stars a message at
/// most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarReaction {
    pub guild_id: Snowflake,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl StarReaction {
    /// Create a new StarReaction
    pub fn new(guild_id: Snowflake, message_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            guild_id,
            message_id,
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Check if this star was given by `user_id`
    #[inline]
    pub fn is_from(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }
}
