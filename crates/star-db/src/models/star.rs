//! Star reaction and entry link database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for star_reactions table
#[derive(Debug, Clone, FromRow)]
pub struct StarReactionModel {
    pub guild_id: i64,
    pub message_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Database model for star_entries table
#[derive(Debug, Clone, FromRow)]
pub struct StarEntryModel {
    pub guild_id: i64,
    pub message_id: i64,
    pub entry_id: i64,
    pub created_at: DateTime<Utc>,
}
