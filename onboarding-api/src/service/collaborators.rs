use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::customer::Customer;
use crate::domain::request::{AddressInfo, OnboardingRequest, PersonalInfo};
use crate::domain::status::RiskCategory;

/// Infrastructure-level failure of an external collaborator. Always fatal
/// for the current attempt; never silently swallowed.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{collaborator} unavailable: {detail}")]
    Unavailable {
        collaborator: &'static str,
        detail: String,
    },
}

impl CollaboratorError {
    pub fn unavailable(collaborator: &'static str, detail: impl Into<String>) -> Self {
        CollaboratorError::Unavailable {
            collaborator,
            detail: detail.into(),
        }
    }
}

/// Failure of the identity provisioner. `Conflict` means the uniqueness
/// constraint rejected the write (a concurrent submission won the race) and
/// maps to a business rejection, not an infrastructure error.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("email {0} is already registered")]
    Conflict(String),

    #[error("identity provisioner unavailable: {0}")]
    Unavailable(String),
}

/// Result of a KYC/AML verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub passed: bool,
    pub detail: String,
}

impl VerificationOutcome {
    pub fn pass(detail: impl Into<String>) -> Self {
        VerificationOutcome {
            passed: true,
            detail: detail.into(),
        }
    }

    pub fn fail(detail: impl Into<String>) -> Self {
        VerificationOutcome {
            passed: false,
            detail: detail.into(),
        }
    }
}

/// Result of external risk scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub category: RiskCategory,
    pub rationale: String,
}

/// Fast-path duplicate lookup by normalized email. Advisory only: the
/// authoritative duplicate rejection is the uniqueness constraint enforced
/// at provisioning time.
#[async_trait]
pub trait DuplicateChecker: Send + Sync {
    async fn exists(&self, email: &str) -> Result<bool, CollaboratorError>;
}

/// Creates and activates canonical customer records.
#[async_trait]
pub trait IdentityProvisioner: Send + Sync {
    /// Create the customer record from validated personal and address data.
    async fn create(
        &self,
        personal: &PersonalInfo,
        address: &AddressInfo,
    ) -> Result<Customer, ProvisionError>;

    /// The second, final write of an approved outcome: flips the customer
    /// to its active form.
    async fn activate(&self, customer_id: Uuid) -> Result<Customer, ProvisionError>;
}

/// Performs KYC/AML checks against the original request.
#[async_trait]
pub trait VerificationService: Send + Sync {
    async fn verify(
        &self,
        request: &OnboardingRequest,
    ) -> Result<VerificationOutcome, CollaboratorError>;
}

/// Scores the provisioned customer in the context of its request.
#[async_trait]
pub trait RiskScorer: Send + Sync {
    async fn score(
        &self,
        customer: &Customer,
        request: &OnboardingRequest,
    ) -> Result<RiskAssessment, CollaboratorError>;
}
