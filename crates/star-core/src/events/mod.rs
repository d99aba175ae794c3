//! Inbound events routed to the starboard

mod star_event;

pub use star_event::StarEvent;
