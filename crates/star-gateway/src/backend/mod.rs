//! Chat backend collaborators used when running standalone

mod capability;
mod poster;

pub use capability::AllowAllCapability;
pub use poster::LogEntryPoster;
