//! Error types for the cache engine and its collaborators
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::storage::SlotId;

// == Cache Error Enum ==
/// Unified error type for cache engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key was never inserted or has already been evicted
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key was present but its TTL has passed
    #[error("Key expired: {0}")]
    Expired(String),

    /// The storage backend failed to read or write a slot
    #[error("Storage fault: {0}")]
    StorageFault(#[from] StorageError),

    /// Index bookkeeping is inconsistent; indicates a bug
    #[error("Capacity invariant violated: {0}")]
    CapacityInvariantViolation(String),

    /// The engine cannot be built with the given parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Storage Error Enum ==
/// Failure reported by a storage backend for a single slot access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Slot lies outside the backend's address space
    #[error("slot {slot} out of range (backend has {slots} slots)")]
    OutOfRange { slot: SlotId, slots: usize },

    /// Write rejected because the part is write-protected
    #[error("slot {0} is write-protected")]
    WriteProtected(SlotId),

    /// The bus transaction did not complete
    #[error("bus error accessing slot {0}")]
    Bus(SlotId),

    /// Bytes in the slot do not decode to a value
    #[error("slot {0} holds undecodable bytes")]
    Corrupt(SlotId),
}

// == Sensor Error Enum ==
/// Failure to obtain a reading from a sensor source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    /// The sensor produced a value outside its valid domain
    #[error("{channel} produced no valid reading")]
    NoReading { channel: String },

    /// The sensor did not respond
    #[error("{channel} did not respond")]
    Unavailable { channel: String },
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::Expired(_) => StatusCode::NOT_FOUND,
            CacheError::StorageFault(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            CacheError::CapacityInvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
