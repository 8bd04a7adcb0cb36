pub mod customer_repository;
pub mod onboarding_status_repository;

// Re-exports
pub use customer_repository::*;
pub use onboarding_status_repository::*;

use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by the data layer.
///
/// `Conflict` is a distinct variant because a uniqueness violation is a
/// business outcome for the caller, not an infrastructure fault.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(Uuid),

    #[error("stale version for {id}: incoming {incoming}, stored {stored}")]
    StaleVersion { id: Uuid, incoming: i32, stored: i32 },

    #[error("store error: {0}")]
    Store(String),
}
