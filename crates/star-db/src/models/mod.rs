//! Database models
//!
//! Row types with SQLx `FromRow` derives. Ids are stored as `BIGINT`.

mod settings;
mod star;

pub use settings::SettingsModel;
pub use star::{StarEntryModel, StarReactionModel};
