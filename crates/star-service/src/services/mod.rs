//! Starboard services
//!
//! Event handling, entry lifecycle, and the registries that route events to
//! the right aggregate.

pub mod context;
pub mod error;
pub mod manager;
pub mod renderer;
pub mod star_message;
pub mod starboard;


pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use manager::StarboardManager;
pub use renderer::TextEntryRenderer;
pub use star_message::{EntryState, StarMessage, StarOutcome};
pub use starboard::Starboard;
