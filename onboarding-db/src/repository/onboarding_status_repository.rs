use async_trait::async_trait;
use uuid::Uuid;

use crate::models::onboarding_status::OnboardingStatusModel;
use crate::repository::RepositoryError;

/// Repository for onboarding status ledger rows.
///
/// `upsert` is a full-row write. Implementations must treat a repeat of an
/// identical target state as a no-op (idempotent retry) and reject any
/// write whose version does not advance the stored row.
#[async_trait]
pub trait OnboardingStatusRepository: Send + Sync {
    async fn upsert(&self, status: OnboardingStatusModel) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid)
        -> Result<Option<OnboardingStatusModel>, RepositoryError>;
}
