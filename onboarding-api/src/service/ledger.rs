use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::status::{
    OnboardingStep, OverallStatus, StatusLedgerEntry, StepStatus, TransitionError,
};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger entry {0} not found")]
    NotFound(Uuid),

    #[error("stale write for ledger entry {id}: version {version} is behind stored version {stored}")]
    StaleVersion { id: Uuid, version: i32, stored: i32 },

    #[error("invalid ledger transition: {0}")]
    Transition(#[from] TransitionError),

    #[error("ledger store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence port for ledger entries.
///
/// `upsert` always receives the full row. Implementations must accept a
/// retried write of an identical target state as a no-op and reject writes
/// whose version does not advance the stored one.
#[async_trait]
pub trait StatusLedgerStore: Send + Sync {
    async fn upsert(&self, entry: &StatusLedgerEntry) -> Result<(), LedgerError>;

    async fn load(&self, ledger_id: Uuid) -> Result<StatusLedgerEntry, LedgerError>;
}

/// Write discipline around the ledger store: applies transitions to the
/// in-flight entry, bumps its version once per persisted write, and always
/// upserts the complete row.
#[derive(Clone)]
pub struct StatusLedger {
    store: Arc<dyn StatusLedgerStore>,
}

impl StatusLedger {
    pub fn new(store: Arc<dyn StatusLedgerStore>) -> Self {
        StatusLedger { store }
    }

    /// Open a ledger entry for a freshly provisioned customer and persist
    /// it with the given initial step transitions applied.
    pub async fn create(
        &self,
        customer_id: Uuid,
        initial: &[(OnboardingStep, StepStatus)],
    ) -> Result<StatusLedgerEntry, LedgerError> {
        let mut entry = StatusLedgerEntry::new(Some(customer_id));
        for (step, status) in initial {
            entry.advance_step(*step, *status)?;
        }
        self.store.upsert(&entry).await?;
        Ok(entry)
    }

    /// Advance step statuses and persist the full row.
    pub async fn update(
        &self,
        entry: &mut StatusLedgerEntry,
        updates: &[(OnboardingStep, StepStatus)],
    ) -> Result<(), LedgerError> {
        for (step, status) in updates {
            entry.advance_step(*step, *status)?;
        }
        entry.version += 1;
        entry.updated_at = Utc::now();
        self.store.upsert(entry).await
    }

    /// Apply final step transitions, set the terminal overall status, and
    /// persist the full row.
    pub async fn finalize(
        &self,
        entry: &mut StatusLedgerEntry,
        overall: OverallStatus,
        message: Option<String>,
        updates: &[(OnboardingStep, StepStatus)],
    ) -> Result<(), LedgerError> {
        for (step, status) in updates {
            entry.advance_step(*step, *status)?;
        }
        entry.finalize(overall, message)?;
        entry.version += 1;
        entry.updated_at = Utc::now();
        self.store.upsert(entry).await
    }

    pub async fn load(&self, ledger_id: Uuid) -> Result<StatusLedgerEntry, LedgerError> {
        self.store.load(ledger_id).await
    }
}
