use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use onboarding_api::domain::status::{OverallStatus, StatusLedgerEntry, StepStatus};

use crate::models::identifiable::Identifiable;
use crate::utils::heapless_from;

/// Database model for the per-attempt onboarding status ledger row.
///
/// One row per onboarding attempt. Every write carries the complete
/// step-status vector; the version column backs the store's
/// optimistic-concurrency check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OnboardingStatusModel {
    pub id: Uuid,

    /// The in-flight customer, once provisioning has assigned one
    pub customer_id: Option<Uuid>,

    pub identity_step: StepStatus,
    pub document_step: StepStatus,
    pub biometric_step: StepStatus,
    pub kyc_step: StepStatus,
    pub aml_step: StepStatus,
    pub risk_step: StepStatus,

    pub overall_status: OverallStatus,

    pub message: Option<HeaplessString<200>>,

    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for OnboardingStatusModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl TryFrom<&StatusLedgerEntry> for OnboardingStatusModel {
    type Error = String;

    fn try_from(entry: &StatusLedgerEntry) -> Result<Self, Self::Error> {
        Ok(OnboardingStatusModel {
            id: entry.id,
            customer_id: entry.customer_id,
            identity_step: entry.identity_step,
            document_step: entry.document_step,
            biometric_step: entry.biometric_step,
            kyc_step: entry.kyc_step,
            aml_step: entry.aml_step,
            risk_step: entry.risk_step,
            overall_status: entry.overall_status,
            message: entry
                .message
                .as_deref()
                .map(|m| heapless_from("message", m))
                .transpose()?,
            version: entry.version,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        })
    }
}

impl From<&OnboardingStatusModel> for StatusLedgerEntry {
    fn from(model: &OnboardingStatusModel) -> Self {
        StatusLedgerEntry {
            id: model.id,
            customer_id: model.customer_id,
            identity_step: model.identity_step,
            document_step: model.document_step,
            biometric_step: model.biometric_step,
            kyc_step: model.kyc_step,
            aml_step: model.aml_step,
            risk_step: model.risk_step,
            overall_status: model.overall_status,
            message: model.message.as_ref().map(|m| m.as_str().to_string()),
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl OnboardingStatusModel {
    /// State equality for idempotent-retry detection: everything except the
    /// write timestamp.
    pub fn same_state(&self, other: &OnboardingStatusModel) -> bool {
        let mut normalized = other.clone();
        normalized.updated_at = self.updated_at;
        *self == normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboarding_api::domain::status::OnboardingStep;

    fn entry() -> StatusLedgerEntry {
        let mut entry = StatusLedgerEntry::new(Some(Uuid::new_v4()));
        entry
            .advance_step(OnboardingStep::Identity, StepStatus::Completed)
            .unwrap();
        entry
            .finalize(OverallStatus::Rejected, Some("verification failed: expired id".to_string()))
            .unwrap();
        entry
    }

    #[test]
    fn test_round_trip_through_model() {
        let entry = entry();
        let model = OnboardingStatusModel::try_from(&entry).unwrap();
        assert_eq!(StatusLedgerEntry::from(&model), entry);
    }

    #[test]
    fn test_oversized_message_is_rejected() {
        let mut entry = StatusLedgerEntry::new(None);
        entry
            .finalize(OverallStatus::Rejected, Some("x".repeat(500)))
            .unwrap();
        let err = OnboardingStatusModel::try_from(&entry).unwrap_err();
        assert!(err.contains("message"));
    }

    #[test]
    fn test_same_state_ignores_write_timestamp() {
        let model = OnboardingStatusModel::try_from(&entry()).unwrap();
        let mut later = model.clone();
        later.updated_at = later.updated_at + chrono::Duration::seconds(5);
        assert!(model.same_state(&later));

        let mut diverged = model.clone();
        diverged.version += 1;
        assert!(!model.same_state(&diverged));
    }
}
