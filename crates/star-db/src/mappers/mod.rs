//! Entity to model mappers
//!
//! - `From<Model> for Entity`: convert rows to domain objects
//! - `TryFrom<Model>` where the row may violate a domain invariant

mod settings;
mod star;
