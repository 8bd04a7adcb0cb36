use thiserror::Error;

use crate::service::collaborators::CollaboratorError;
use crate::service::ledger::LedgerError;

/// Top-level error for the onboarding core.
///
/// Business outcomes (validation failure, duplicate email, failed
/// verification, elevated risk) are never surfaced through this type; they
/// are encoded in the `OnboardingResponse`. An `Err` from the orchestrator
/// always means the attempt could not be completed for infrastructure
/// reasons and may be retried as a whole.
#[derive(Error, Debug)]
pub enum OnboardingError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Collaborator unavailable: {collaborator}: {detail}")]
    CollaboratorUnavailable {
        collaborator: &'static str,
        detail: String,
    },

    #[error("Ledger error: {0}")]
    LedgerError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type OnboardingResult<T> = Result<T, OnboardingError>;

impl From<CollaboratorError> for OnboardingError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Unavailable {
                collaborator,
                detail,
            } => OnboardingError::CollaboratorUnavailable {
                collaborator,
                detail,
            },
        }
    }
}

impl From<LedgerError> for OnboardingError {
    fn from(err: LedgerError) -> Self {
        OnboardingError::LedgerError(err.to_string())
    }
}
