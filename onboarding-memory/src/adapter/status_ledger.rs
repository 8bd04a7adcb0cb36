use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use onboarding_api::domain::status::StatusLedgerEntry;
use onboarding_api::service::ledger::{LedgerError, StatusLedgerStore};
use onboarding_db::models::onboarding_status::OnboardingStatusModel;
use onboarding_db::repository::{OnboardingStatusRepository, RepositoryError};

/// Bridges the ledger service port onto a status repository, converting
/// between the domain entry and its persistence model.
pub struct LedgerStoreAdapter {
    repository: Arc<dyn OnboardingStatusRepository>,
}

impl LedgerStoreAdapter {
    pub fn new(repository: Arc<dyn OnboardingStatusRepository>) -> Self {
        LedgerStoreAdapter { repository }
    }
}

#[async_trait]
impl StatusLedgerStore for LedgerStoreAdapter {
    async fn upsert(&self, entry: &StatusLedgerEntry) -> Result<(), LedgerError> {
        let model = OnboardingStatusModel::try_from(entry).map_err(LedgerError::Unavailable)?;
        self.repository.upsert(model).await.map_err(|err| match err {
            RepositoryError::StaleVersion { id, incoming, stored } => LedgerError::StaleVersion {
                id,
                version: incoming,
                stored,
            },
            other => LedgerError::Unavailable(other.to_string()),
        })
    }

    async fn load(&self, ledger_id: Uuid) -> Result<StatusLedgerEntry, LedgerError> {
        self.repository
            .find_by_id(ledger_id)
            .await
            .map_err(|err| LedgerError::Unavailable(err.to_string()))?
            .map(|model| StatusLedgerEntry::from(&model))
            .ok_or(LedgerError::NotFound(ledger_id))
    }
}
