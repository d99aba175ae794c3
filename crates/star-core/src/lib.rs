//! # star-core
//!
//! Domain layer for the starboard: entities, value objects, inbound events,
//! and the ports (store and chat-backend collaborators) the service layer
//! consumes. This crate has zero dependencies on infrastructure.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{EntryContent, StarReaction, StarSnapshot, StarTier, StarboardSettings};
pub use error::DomainError;
pub use events::StarEvent;
pub use traits::{
    CapabilityCheck, EntryPoster, EntryRenderer, ReactionStore, RepoResult, SettingsRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
