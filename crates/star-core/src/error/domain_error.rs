//! Domain errors - error types for the starboard domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Persistence
    // =========================================================================
    /// The reaction or settings store failed; the write must be treated as not applied
    #[error("Store fault: {0}")]
    StoreFault(String),

    // =========================================================================
    // Board Access
    // =========================================================================
    #[error("Starboard channel is not configured")]
    BoardChannelMissing,

    #[error("Cannot post entries in channel {channel_id}")]
    CapabilityDenied { channel_id: Snowflake },

    // =========================================================================
    // Chat Backend
    // =========================================================================
    #[error("Failed to render entry: {0}")]
    RenderFault(String),

    #[error("Failed to post entry: {0}")]
    PostFault(String),

    // =========================================================================
    // Validation
    // =========================================================================
    #[error("Invalid threshold {0}: must be at least 1")]
    InvalidThreshold(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Get a stable error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreFault(_) => "STORE_FAULT",
            Self::BoardChannelMissing => "BOARD_CHANNEL_MISSING",
            Self::CapabilityDenied { .. } => "CAPABILITY_DENIED",
            Self::RenderFault(_) => "RENDER_FAULT",
            Self::PostFault(_) => "POST_FAULT",
            Self::InvalidThreshold(_) => "INVALID_THRESHOLD",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Check if this is a persistence failure
    pub fn is_store_fault(&self) -> bool {
        matches!(self, Self::StoreFault(_))
    }

    /// Check if this error is absorbed at the entry boundary (retried on the next event)
    pub fn is_absorbed(&self) -> bool {
        matches!(
            self,
            Self::BoardChannelMissing
                | Self::CapabilityDenied { .. }
                | Self::RenderFault(_)
                | Self::PostFault(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidThreshold(_) | Self::ValidationError(_))
    }
}
