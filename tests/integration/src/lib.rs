//! Integration test utilities for the starboard
//!
//! Provides collaborator doubles and fixtures for end-to-end tests of the
//! starboard services and the gateway dispatcher.

pub mod fixtures;

pub use fixtures::*;
pub use helpers::*;
