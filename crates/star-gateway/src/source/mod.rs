//! Event sources
//!
//! Anything that produces [`StarEvent`](star_core::StarEvent)s into the
//! dispatcher's channel.

mod lines;

pub use lines::{parse_line, pump_lines};
