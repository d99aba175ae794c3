//! Repository traits (ports) - define the interface for starboard persistence
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::StarboardSettings;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Reaction Store
// ============================================================================

/// Durable store of stars and entry links, keyed by `(guild_id, message_id)`
///
/// Every failed call returns [`DomainError::StoreFault`] and must be treated
/// as not applied. Multi-row writes are atomic.
#[async_trait]
pub trait ReactionStore: Send + Sync {
    /// Record a star if absent. Returns `true` when a row was inserted.
    ///
    /// Safe under concurrent calls for different users on the same message.
    async fn add_star(&self, guild_id: Snowflake, message_id: Snowflake, user_id: Snowflake)
        -> RepoResult<bool>;

    /// Users currently starring a message (order is not significant)
    async fn get_stars(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Number of users currently starring a message
    async fn get_star_count(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<i64>;

    /// Check if a user stars a message
    async fn is_starring(&self, guild_id: Snowflake, message_id: Snowflake, user_id: Snowflake)
        -> RepoResult<bool>;

    /// Delete one star. Returns `true` when a row was removed.
    async fn remove_star(&self, guild_id: Snowflake, message_id: Snowflake, user_id: Snowflake)
        -> RepoResult<bool>;

    /// Persist the starred message -> entry message link
    async fn set_entry(&self, guild_id: Snowflake, message_id: Snowflake, entry_id: Snowflake)
        -> RepoResult<()>;

    /// Entry linked to a starred message, if one was created
    async fn get_entry(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<Option<Snowflake>>;

    /// Starred message an entry mirrors
    async fn find_by_entry(&self, guild_id: Snowflake, entry_id: Snowflake) -> RepoResult<Option<Snowflake>>;

    /// Wipe every star and the entry link of one starred message
    async fn remove_all_entries(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<()>;

    /// Wipe every starred message of a guild. Returns the number of star rows removed.
    async fn remove_all(&self, guild_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Settings Repository
// ============================================================================

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Find the board settings of a guild
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<StarboardSettings>>;

    /// List every configured guild
    async fn find_all(&self) -> RepoResult<Vec<StarboardSettings>>;

    /// Insert or replace the settings of a guild
    async fn upsert(&self, settings: &StarboardSettings) -> RepoResult<()>;

    /// Delete the settings of a guild
    async fn delete(&self, guild_id: Snowflake) -> RepoResult<()>;
}
