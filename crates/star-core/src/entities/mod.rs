//! Domain entities - core starboard objects

mod reaction;
mod settings;
mod snapshot;
mod tier;

pub use reaction::StarReaction;
pub use settings::StarboardSettings;
pub use snapshot::{EntryContent, StarSnapshot};
pub use tier::StarTier;
