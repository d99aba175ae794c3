//! # star-gateway
//!
//! Reads chat events, filters them down to star reactions, and routes them
//! to the starboard manager.

pub mod backend;
pub mod dispatch;
pub mod server;
pub mod source;

pub use server::run;
