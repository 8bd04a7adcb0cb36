use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;
use uuid::Uuid;

use onboarding_db::models::onboarding_status::OnboardingStatusModel;
use onboarding_db::repository::{OnboardingStatusRepository, RepositoryError};

/// In-memory ledger row store with optimistic-concurrency semantics: a
/// write must advance the stored version, except that retrying an
/// identical target state is accepted as a no-op.
#[derive(Default)]
pub struct InMemoryStatusLedgerRepository {
    rows: RwLock<HashMap<Uuid, OnboardingStatusModel>>,
    writes: AtomicUsize,
}

impl InMemoryStatusLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes that actually mutated a row. Idempotent retries of
    /// an already-applied state do not count.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored row, for audit-style inspection in tests.
    pub fn all_rows(&self) -> Vec<OnboardingStatusModel> {
        self.rows.read().values().cloned().collect()
    }
}

#[async_trait]
impl OnboardingStatusRepository for InMemoryStatusLedgerRepository {
    async fn upsert(&self, status: OnboardingStatusModel) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write();

        if let Some(stored) = rows.get(&status.id) {
            if status.version == stored.version && stored.same_state(&status) {
                debug!(ledger_id = %status.id, "idempotent ledger retry ignored");
                return Ok(());
            }
            if status.version <= stored.version {
                return Err(RepositoryError::StaleVersion {
                    id: status.id,
                    incoming: status.version,
                    stored: stored.version,
                });
            }
        }

        rows.insert(status.id, status);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<OnboardingStatusModel>, RepositoryError> {
        Ok(self.rows.read().get(&id).cloned())
    }
}
