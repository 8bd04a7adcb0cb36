use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::domain::request::OnboardingRequest;
use crate::domain::response::OnboardingResponse;
use crate::domain::status::{OnboardingStep, OverallStatus, StepStatus};
use crate::error::{OnboardingError, OnboardingResult};
use crate::service::collaborators::{
    DuplicateChecker, IdentityProvisioner, ProvisionError, RiskScorer, VerificationService,
};
use crate::service::decision;
use crate::service::ledger::StatusLedger;

/// Steps that are represented on the ledger but not separately re-verified
/// by this pipeline; they are completed as part of accepting the request.
const PRE_VERIFIED_STEPS: [OnboardingStep; 3] = [
    OnboardingStep::Identity,
    OnboardingStep::DocumentUpload,
    OnboardingStep::Biometric,
];

#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Minimum applicant age in whole years at submission time.
    pub minimum_age: u32,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        OnboardingConfig { minimum_age: 18 }
    }
}

/// Drives a single onboarding attempt through its collaborators in strict
/// order and records every transition on the status ledger.
///
/// Collaborators are injected at construction; the orchestrator holds no
/// cross-request mutable state and issues each collaborator call at most
/// once per attempt.
pub struct OnboardingOrchestrator {
    duplicate_checker: Arc<dyn DuplicateChecker>,
    identity_provisioner: Arc<dyn IdentityProvisioner>,
    verification_service: Arc<dyn VerificationService>,
    risk_scorer: Arc<dyn RiskScorer>,
    ledger: StatusLedger,
    config: OnboardingConfig,
}

impl OnboardingOrchestrator {
    pub fn new(
        duplicate_checker: Arc<dyn DuplicateChecker>,
        identity_provisioner: Arc<dyn IdentityProvisioner>,
        verification_service: Arc<dyn VerificationService>,
        risk_scorer: Arc<dyn RiskScorer>,
        ledger: StatusLedger,
    ) -> Self {
        Self::with_config(
            duplicate_checker,
            identity_provisioner,
            verification_service,
            risk_scorer,
            ledger,
            OnboardingConfig::default(),
        )
    }

    pub fn with_config(
        duplicate_checker: Arc<dyn DuplicateChecker>,
        identity_provisioner: Arc<dyn IdentityProvisioner>,
        verification_service: Arc<dyn VerificationService>,
        risk_scorer: Arc<dyn RiskScorer>,
        ledger: StatusLedger,
        config: OnboardingConfig,
    ) -> Self {
        OnboardingOrchestrator {
            duplicate_checker,
            identity_provisioner,
            verification_service,
            risk_scorer,
            ledger,
            config,
        }
    }

    /// Run one onboarding attempt to a terminal outcome.
    ///
    /// Business rejections and manual-review routing come back as
    /// `Ok(response)`; an `Err` always means an infrastructure failure and
    /// the attempt as a whole may be retried.
    pub async fn initiate_onboarding(
        &self,
        request: OnboardingRequest,
    ) -> OnboardingResult<OnboardingResponse> {
        // Step 1: structural validation, before anything else runs.
        if let Err(detail) = self.validate_request(&request) {
            info!(%detail, "onboarding request rejected by validation");
            return Ok(OnboardingResponse::rejected(format!("validation failed: {detail}")));
        }
        let email = request.personal_info.normalized_email();

        // Step 2: advisory duplicate check. Duplicates must never incur the
        // cost of provisioning or verification.
        if self.duplicate_checker.exists(&email).await? {
            info!("onboarding rejected: email already registered");
            return Ok(OnboardingResponse::rejected(format!(
                "email {email} is already registered"
            )));
        }

        // Step 3: provision the customer. The store's uniqueness constraint
        // is authoritative for races the advisory check missed.
        let customer = match self
            .identity_provisioner
            .create(&request.personal_info, &request.address)
            .await
        {
            Ok(customer) => customer,
            Err(ProvisionError::Conflict(email)) => {
                warn!("provisioning lost a uniqueness race, rejecting");
                return Ok(OnboardingResponse::rejected(format!(
                    "email {email} is already registered"
                )));
            }
            Err(ProvisionError::Unavailable(detail)) => {
                return Err(OnboardingError::CollaboratorUnavailable {
                    collaborator: "identity provisioner",
                    detail,
                });
            }
        };
        debug!(customer_id = %customer.id, "customer provisioned");

        let initial: Vec<(OnboardingStep, StepStatus)> = PRE_VERIFIED_STEPS
            .iter()
            .map(|step| (*step, StepStatus::Completed))
            .collect();
        let mut entry = self.ledger.create(customer.id, &initial).await?;

        // Step 4: KYC/AML verification. A failed outcome is terminal and
        // risk scoring is never reached.
        let outcome = self.verification_service.verify(&request).await?;
        if !outcome.passed {
            let message = format!("verification failed: {}", outcome.detail);
            self.ledger
                .finalize(
                    &mut entry,
                    OverallStatus::Rejected,
                    Some(message.clone()),
                    &[
                        (OnboardingStep::KycScreening, StepStatus::Failed),
                        (OnboardingStep::AmlScreening, StepStatus::Failed),
                    ],
                )
                .await?;
            info!(customer_id = %customer.id, "onboarding rejected by verification");
            return Ok(OnboardingResponse::rejected(message).with_customer_id(customer.id));
        }
        self.ledger
            .update(
                &mut entry,
                &[
                    (OnboardingStep::KycScreening, StepStatus::Completed),
                    (OnboardingStep::AmlScreening, StepStatus::Completed),
                ],
            )
            .await?;

        // Step 5: risk scoring, only after verification has passed.
        let assessment = self.risk_scorer.score(&customer, &request).await?;
        debug!(customer_id = %customer.id, category = %assessment.category, "risk assessed");

        // Step 6: decide, finalize the ledger, and activate on approval.
        let overall = decision::decide(outcome.passed, assessment.category);
        let message = match overall {
            OverallStatus::Approved => "onboarding approved".to_string(),
            OverallStatus::PendingManualReview => format!(
                "risk assessment flagged {} risk; onboarding pending manual review",
                assessment.category
            ),
            other => {
                return Err(OnboardingError::InternalError(format!(
                    "decision engine returned non-terminal status {other}"
                )))
            }
        };

        self.ledger
            .finalize(
                &mut entry,
                overall,
                Some(message.clone()),
                &[(OnboardingStep::RiskAssessment, StepStatus::Completed)],
            )
            .await?;

        let customer = if overall == OverallStatus::Approved {
            match self.identity_provisioner.activate(customer.id).await {
                Ok(activated) => activated,
                Err(ProvisionError::Unavailable(detail)) => {
                    return Err(OnboardingError::CollaboratorUnavailable {
                        collaborator: "identity provisioner",
                        detail,
                    });
                }
                Err(ProvisionError::Conflict(email)) => {
                    return Err(OnboardingError::InternalError(format!(
                        "activation reported a conflict for {email}"
                    )));
                }
            }
        } else {
            customer
        };

        info!(customer_id = %customer.id, status = %overall, "onboarding attempt finalized");
        Ok(OnboardingResponse::new(overall, message).with_customer(customer))
    }

    fn validate_request(&self, request: &OnboardingRequest) -> Result<(), String> {
        request.validate().map_err(|errors| errors.to_string())?;

        let raw = &request.personal_info.date_of_birth;
        let date_of_birth = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| format!("date of birth {raw:?} is not a YYYY-MM-DD date"))?;

        let today = Utc::now().date_naive();
        let age = today
            .years_since(date_of_birth)
            .ok_or_else(|| "date of birth is in the future".to_string())?;
        if age < self.config.minimum_age {
            return Err(format!(
                "applicant must be at least {} years old",
                self.config.minimum_age
            ));
        }
        Ok(())
    }
}
