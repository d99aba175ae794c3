//! Ports - the interfaces the starboard core consumes

mod collaborators;
mod repositories;

pub use collaborators::{CapabilityCheck, EntryPoster, EntryRenderer};
pub use repositories::{ReactionStore, RepoResult, SettingsRepository};
