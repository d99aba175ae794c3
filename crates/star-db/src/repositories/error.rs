//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use star_core::error::DomainError;

/// Convert SQLx error to a store fault
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::StoreFault(e.to_string())
}
