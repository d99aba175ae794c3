//! Starboard settings database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for starboard_settings table
#[derive(Debug, Clone, FromRow)]
pub struct SettingsModel {
    pub guild_id: i64,
    pub channel_id: Option<i64>,
    pub threshold: i64,
    pub updated_at: DateTime<Utc>,
}
