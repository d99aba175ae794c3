//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use std::sync::atomic::{AtomicI64, Ordering};

use star_core::{Snowflake, StarEvent, StarboardSettings};

/// Counter for unique ids across a test binary
static COUNTER: AtomicI64 = AtomicI64::new(1_000_000);

/// A Snowflake no other fixture has handed out
pub fn unique_id() -> Snowflake {
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// `n` distinct user ids
pub fn users(n: usize) -> Vec<Snowflake> {
    (0..n).map(|_| unique_id()).collect()
}

/// A fresh guild with a board channel
#[derive(Debug, Clone, Copy)]
pub struct GuildFixture {
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
}

impl GuildFixture {
    pub fn unique() -> Self {
        Self {
            guild_id: unique_id(),
            channel_id: unique_id(),
        }
    }

    /// Settings posting to this guild's board channel
    pub fn settings(&self, threshold: i64) -> StarboardSettings {
        StarboardSettings::new(self.guild_id, Some(self.channel_id), threshold)
            .expect("fixture threshold must be positive")
    }

    /// Settings with no board channel
    pub fn settings_without_channel(&self, threshold: i64) -> StarboardSettings {
        StarboardSettings::new(self.guild_id, None, threshold)
            .expect("fixture threshold must be positive")
    }

    pub fn star(&self, message_id: Snowflake, user_id: Snowflake) -> StarEvent {
        StarEvent::ReactionAdded {
            guild_id: self.guild_id,
            message_id,
            user_id,
            emoji: "⭐".to_string(),
        }
    }

    pub fn unstar(&self, message_id: Snowflake, user_id: Snowflake) -> StarEvent {
        StarEvent::ReactionRemoved {
            guild_id: self.guild_id,
            message_id,
            user_id,
            emoji: "⭐".to_string(),
        }
    }
}
