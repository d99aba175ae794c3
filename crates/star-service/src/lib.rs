//! # star-service
//!
//! Application layer: the `StarMessage` aggregate, the per-guild `Starboard`
//! facade, and the `StarboardManager` the event dispatcher talks to.

pub mod services;

pub use services::{
    EntryState, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, StarMessage,
    StarOutcome, Starboard, StarboardManager, TextEntryRenderer,
};
