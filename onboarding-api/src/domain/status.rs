use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Workflow steps tracked per onboarding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnboardingStep {
    Identity,
    DocumentUpload,
    Biometric,
    KycScreening,
    AmlScreening,
    RiskAssessment,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 6] = [
        OnboardingStep::Identity,
        OnboardingStep::DocumentUpload,
        OnboardingStep::Biometric,
        OnboardingStep::KycScreening,
        OnboardingStep::AmlScreening,
        OnboardingStep::RiskAssessment,
    ];
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnboardingStep::Identity => write!(f, "Identity"),
            OnboardingStep::DocumentUpload => write!(f, "DocumentUpload"),
            OnboardingStep::Biometric => write!(f, "Biometric"),
            OnboardingStep::KycScreening => write!(f, "KycScreening"),
            OnboardingStep::AmlScreening => write!(f, "AmlScreening"),
            OnboardingStep::RiskAssessment => write!(f, "RiskAssessment"),
        }
    }
}

/// Per-step progress. `Completed` and `Failed` are terminal; a step never
/// regresses once it has reached either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "step_status", rename_all = "PascalCase"))]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            StepStatus::Pending => 0,
            StepStatus::InProgress => 1,
            StepStatus::Completed | StepStatus::Failed => 2,
        }
    }

    /// Whether moving from `self` to `next` is a forward (or idempotent)
    /// transition. Terminal statuses only re-assert themselves.
    pub fn can_advance_to(self, next: StepStatus) -> bool {
        if self == next {
            return true;
        }
        !self.is_terminal() && next.rank() > self.rank()
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "Pending"),
            StepStatus::InProgress => write!(f, "InProgress"),
            StepStatus::Completed => write!(f, "Completed"),
            StepStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for StepStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(StepStatus::Pending),
            "InProgress" => Ok(StepStatus::InProgress),
            "Completed" => Ok(StepStatus::Completed),
            "Failed" => Ok(StepStatus::Failed),
            _ => Err(()),
        }
    }
}

/// Terminal classification of an onboarding attempt. `InProgress` exists
/// only on the ledger while the pipeline is running and never appears in a
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "overall_status", rename_all = "PascalCase"))]
pub enum OverallStatus {
    InProgress,
    Approved,
    Rejected,
    PendingManualReview,
}

impl OverallStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OverallStatus::InProgress)
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::InProgress => write!(f, "InProgress"),
            OverallStatus::Approved => write!(f, "Approved"),
            OverallStatus::Rejected => write!(f, "Rejected"),
            OverallStatus::PendingManualReview => write!(f, "PendingManualReview"),
        }
    }
}

impl FromStr for OverallStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "InProgress" => Ok(OverallStatus::InProgress),
            "Approved" => Ok(OverallStatus::Approved),
            "Rejected" => Ok(OverallStatus::Rejected),
            "PendingManualReview" => Ok(OverallStatus::PendingManualReview),
            _ => Err(()),
        }
    }
}

/// Risk classification produced by the external scorer and consumed as an
/// opaque input by the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "risk_category", rename_all = "PascalCase"))]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Blacklisted,
}

impl RiskCategory {
    /// Elevated risk routes an otherwise-clean attempt to manual review.
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskCategory::High | RiskCategory::Blacklisted)
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskCategory::Low => write!(f, "Low"),
            RiskCategory::Medium => write!(f, "Medium"),
            RiskCategory::High => write!(f, "High"),
            RiskCategory::Blacklisted => write!(f, "Blacklisted"),
        }
    }
}

impl FromStr for RiskCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(RiskCategory::Low),
            "Medium" => Ok(RiskCategory::Medium),
            "High" => Ok(RiskCategory::High),
            "Blacklisted" => Ok(RiskCategory::Blacklisted),
            _ => Err(()),
        }
    }
}

/// Rejected transitions on a ledger entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("step {step} cannot move from {from} to {to}")]
    StepRegression {
        step: OnboardingStep,
        from: StepStatus,
        to: StepStatus,
    },

    #[error("onboarding {0} is already finalized as {1}")]
    AlreadyFinalized(Uuid, OverallStatus),

    #[error("{0} is not a terminal overall status")]
    NonTerminalOverall(OverallStatus),
}

/// Per-attempt audit record of workflow progress.
///
/// Every write carries the complete step-status vector; step statuses only
/// advance, and a terminal overall status is never overwritten with a
/// different one. The version counter advances by one per persisted write
/// and backs the store's optimistic-concurrency check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLedgerEntry {
    pub id: Uuid,

    /// In-flight customer; absent only before provisioning has assigned one.
    pub customer_id: Option<Uuid>,

    pub identity_step: StepStatus,
    pub document_step: StepStatus,
    pub biometric_step: StepStatus,
    pub kyc_step: StepStatus,
    pub aml_step: StepStatus,
    pub risk_step: StepStatus,

    pub overall_status: OverallStatus,
    pub message: Option<String>,

    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StatusLedgerEntry {
    pub fn new(customer_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        StatusLedgerEntry {
            id: Uuid::new_v4(),
            customer_id,
            identity_step: StepStatus::Pending,
            document_step: StepStatus::Pending,
            biometric_step: StepStatus::Pending,
            kyc_step: StepStatus::Pending,
            aml_step: StepStatus::Pending,
            risk_step: StepStatus::Pending,
            overall_status: OverallStatus::InProgress,
            message: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn step(&self, step: OnboardingStep) -> StepStatus {
        match step {
            OnboardingStep::Identity => self.identity_step,
            OnboardingStep::DocumentUpload => self.document_step,
            OnboardingStep::Biometric => self.biometric_step,
            OnboardingStep::KycScreening => self.kyc_step,
            OnboardingStep::AmlScreening => self.aml_step,
            OnboardingStep::RiskAssessment => self.risk_step,
        }
    }

    fn step_mut(&mut self, step: OnboardingStep) -> &mut StepStatus {
        match step {
            OnboardingStep::Identity => &mut self.identity_step,
            OnboardingStep::DocumentUpload => &mut self.document_step,
            OnboardingStep::Biometric => &mut self.biometric_step,
            OnboardingStep::KycScreening => &mut self.kyc_step,
            OnboardingStep::AmlScreening => &mut self.aml_step,
            OnboardingStep::RiskAssessment => &mut self.risk_step,
        }
    }

    /// Move one step forward. Re-asserting the current status is a no-op;
    /// regression is rejected.
    pub fn advance_step(
        &mut self,
        step: OnboardingStep,
        status: StepStatus,
    ) -> Result<(), TransitionError> {
        let current = self.step(step);
        if !current.can_advance_to(status) {
            return Err(TransitionError::StepRegression {
                step,
                from: current,
                to: status,
            });
        }
        *self.step_mut(step) = status;
        Ok(())
    }

    /// Set the terminal overall status. Finalizing twice with the same
    /// status is a no-op; with a different one it is rejected.
    pub fn finalize(
        &mut self,
        overall: OverallStatus,
        message: Option<String>,
    ) -> Result<(), TransitionError> {
        if !overall.is_terminal() {
            return Err(TransitionError::NonTerminalOverall(overall));
        }
        if self.overall_status.is_terminal() && self.overall_status != overall {
            return Err(TransitionError::AlreadyFinalized(self.id, self.overall_status));
        }
        self.overall_status = overall;
        if message.is_some() {
            self.message = message;
        }
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.overall_status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_pending_everywhere() {
        let entry = StatusLedgerEntry::new(Some(Uuid::new_v4()));
        for step in OnboardingStep::ALL {
            assert_eq!(entry.step(step), StepStatus::Pending);
        }
        assert_eq!(entry.overall_status, OverallStatus::InProgress);
        assert_eq!(entry.version, 1);
    }

    #[test]
    fn test_advance_step_forward() {
        let mut entry = StatusLedgerEntry::new(None);
        entry
            .advance_step(OnboardingStep::KycScreening, StepStatus::InProgress)
            .unwrap();
        entry
            .advance_step(OnboardingStep::KycScreening, StepStatus::Completed)
            .unwrap();
        assert_eq!(entry.step(OnboardingStep::KycScreening), StepStatus::Completed);
    }

    #[test]
    fn test_advance_step_skipping_in_progress() {
        let mut entry = StatusLedgerEntry::new(None);
        entry
            .advance_step(OnboardingStep::Identity, StepStatus::Completed)
            .unwrap();
        assert_eq!(entry.step(OnboardingStep::Identity), StepStatus::Completed);
    }

    #[test]
    fn test_advance_step_is_idempotent() {
        let mut entry = StatusLedgerEntry::new(None);
        entry
            .advance_step(OnboardingStep::AmlScreening, StepStatus::Failed)
            .unwrap();
        entry
            .advance_step(OnboardingStep::AmlScreening, StepStatus::Failed)
            .unwrap();
        assert_eq!(entry.step(OnboardingStep::AmlScreening), StepStatus::Failed);
    }

    #[test]
    fn test_terminal_step_never_regresses() {
        let mut entry = StatusLedgerEntry::new(None);
        entry
            .advance_step(OnboardingStep::KycScreening, StepStatus::Completed)
            .unwrap();

        let err = entry
            .advance_step(OnboardingStep::KycScreening, StepStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, TransitionError::StepRegression { .. }));

        let err = entry
            .advance_step(OnboardingStep::KycScreening, StepStatus::Failed)
            .unwrap_err();
        assert!(matches!(err, TransitionError::StepRegression { .. }));
    }

    #[test]
    fn test_finalize_requires_terminal_status() {
        let mut entry = StatusLedgerEntry::new(None);
        let err = entry.finalize(OverallStatus::InProgress, None).unwrap_err();
        assert_eq!(err, TransitionError::NonTerminalOverall(OverallStatus::InProgress));
    }

    #[test]
    fn test_finalize_is_idempotent_for_same_status() {
        let mut entry = StatusLedgerEntry::new(None);
        entry
            .finalize(OverallStatus::Rejected, Some("verification failed".to_string()))
            .unwrap();
        entry.finalize(OverallStatus::Rejected, None).unwrap();
        assert_eq!(entry.overall_status, OverallStatus::Rejected);
        assert_eq!(entry.message.as_deref(), Some("verification failed"));
    }

    #[test]
    fn test_finalize_rejects_conflicting_terminal_status() {
        let mut entry = StatusLedgerEntry::new(None);
        entry.finalize(OverallStatus::Approved, None).unwrap();
        let err = entry.finalize(OverallStatus::Rejected, None).unwrap_err();
        assert!(matches!(err, TransitionError::AlreadyFinalized(_, OverallStatus::Approved)));
    }

    #[test]
    fn test_risk_category_elevation() {
        assert!(!RiskCategory::Low.is_elevated());
        assert!(!RiskCategory::Medium.is_elevated());
        assert!(RiskCategory::High.is_elevated());
        assert!(RiskCategory::Blacklisted.is_elevated());
    }

    #[test]
    fn test_status_enums_round_trip() {
        for status in [
            StepStatus::Pending,
            StepStatus::InProgress,
            StepStatus::Completed,
            StepStatus::Failed,
        ] {
            assert_eq!(StepStatus::from_str(&status.to_string()), Ok(status));
        }
        for status in [
            OverallStatus::InProgress,
            OverallStatus::Approved,
            OverallStatus::Rejected,
            OverallStatus::PendingManualReview,
        ] {
            assert_eq!(OverallStatus::from_str(&status.to_string()), Ok(status));
        }
    }
}
