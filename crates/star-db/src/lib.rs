//! # star-db
//!
//! Persistence layer implementing the starboard ports.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations (PostgreSQL via SQLx)
//! - Row models with SQLx `FromRow` derives and their entity mappers
//! - `PgReactionStore` / `PgSettingsRepository`
//! - `MemoryReactionStore` / `MemorySettingsRepository` for running without a database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use star_db::{create_pool, run_migrations, PgReactionStore, PoolConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/starboard")).await?;
//!     run_migrations(&pool).await?;
//!     let store = PgReactionStore::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig, MIGRATOR};
pub use repositories::{
    MemoryReactionStore, MemorySettingsRepository, PgReactionStore, PgSettingsRepository,
};
