//! Star events - what the chat gateway tells the starboard

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Inbound event from the chat gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StarEvent {
    ReactionAdded {
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: String,
    },
    ReactionRemoved {
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: String,
    },
    MessageDeleted {
        guild_id: Snowflake,
        message_id: Snowflake,
    },
    GuildLeft {
        guild_id: Snowflake,
    },
    /// Admin command: point the board at a channel and/or change its threshold
    ConfigureStarboard {
        guild_id: Snowflake,
        #[serde(default)]
        channel_id: Option<Snowflake>,
        #[serde(default)]
        threshold: Option<i64>,
    },
}

impl StarEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ReactionAdded { .. } => "REACTION_ADDED",
            Self::ReactionRemoved { .. } => "REACTION_REMOVED",
            Self::MessageDeleted { .. } => "MESSAGE_DELETED",
            Self::GuildLeft { .. } => "GUILD_LEFT",
            Self::ConfigureStarboard { .. } => "CONFIGURE_STARBOARD",
        }
    }

    /// Guild the event belongs to
    pub fn guild_id(&self) -> Snowflake {
        match self {
            Self::ReactionAdded { guild_id, .. }
            | Self::ReactionRemoved { guild_id, .. }
            | Self::MessageDeleted { guild_id, .. }
            | Self::GuildLeft { guild_id }
            | Self::ConfigureStarboard { guild_id, .. } => *guild_id,
        }
    }

    /// Message the event is about; `None` for guild-wide events
    pub fn message_id(&self) -> Option<Snowflake> {
        match self {
            Self::ReactionAdded { message_id, .. }
            | Self::ReactionRemoved { message_id, .. }
            | Self::MessageDeleted { message_id, .. } => Some(*message_id),
            Self::GuildLeft { .. } | Self::ConfigureStarboard { .. } => None,
        }
    }

    /// Emoji carried by reaction events
    pub fn emoji(&self) -> Option<&str> {
        match self {
            Self::ReactionAdded { emoji, .. } | Self::ReactionRemoved { emoji, .. } => {
                Some(emoji)
            }
            _ => None,
        }
    }
}
