//! Event dispatch

mod dispatcher;
mod lanes;

pub use dispatcher::EventDispatcher;
pub use lanes::EventLanes;
