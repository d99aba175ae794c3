//! Chat backend collaborators
//!
//! Timeouts and retries for network calls belong to the implementations.

use async_trait::async_trait;

use crate::entities::{EntryContent, StarSnapshot};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Permission checks evaluated before every entry create or update
#[async_trait]
pub trait CapabilityCheck: Send + Sync {
    /// Can the bot send messages in `channel_id`
    async fn can_post(&self, channel_id: Snowflake) -> bool;

    /// Can the bot attach embeds in `channel_id`
    async fn has_embed_capability(&self, channel_id: Snowflake) -> bool;
}

/// Turns a starred message into entry content
#[async_trait]
pub trait EntryRenderer: Send + Sync {
    /// Fails with [`DomainError::RenderFault`]
    async fn render(&self, snapshot: &StarSnapshot) -> Result<EntryContent, DomainError>;
}

/// Posts, edits, and deletes entries in the board channel
#[async_trait]
pub trait EntryPoster: Send + Sync {
    /// Post a new entry and return its message id. Fails with [`DomainError::PostFault`].
    async fn post(&self, channel_id: Snowflake, content: &EntryContent) -> Result<Snowflake, DomainError>;

    /// Replace the content of an existing entry
    async fn edit(&self, entry_id: Snowflake, content: &EntryContent) -> Result<(), DomainError>;

    /// Delete an entry. Callers treat failure as best-effort.
    async fn delete(&self, entry_id: Snowflake) -> Result<(), DomainError>;
}
