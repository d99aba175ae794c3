//! Repository implementations
//!
//! PostgreSQL and in-memory implementations of the ports defined in star-core.

mod error;
mod memory;
mod settings;
mod star;

pub use memory::{MemoryReactionStore, MemorySettingsRepository};
pub use settings::PgSettingsRepository;
pub use star::PgReactionStore;
