use async_trait::async_trait;
use moka::sync::Cache;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use onboarding_api::service::collaborators::{CollaboratorError, DuplicateChecker};
use onboarding_db::repository::CustomerRepository;
use onboarding_db::utils::hash_as_i64;

const EMAIL_CACHE_CAPACITY: u64 = 10_000;

/// Duplicate checker backed by the customer repository's email-hash index,
/// with a read-through cache of known-taken hashes.
///
/// Only positive hits are cached: a cached absence could mask a customer
/// registered since the lookup, and the advisory check must never be more
/// stale than the index it fronts.
pub struct CachedDuplicateChecker {
    repository: Arc<dyn CustomerRepository>,
    known_emails: Cache<i64, Uuid>,
}

impl CachedDuplicateChecker {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        CachedDuplicateChecker {
            repository,
            known_emails: Cache::new(EMAIL_CACHE_CAPACITY),
        }
    }
}

#[async_trait]
impl DuplicateChecker for CachedDuplicateChecker {
    async fn exists(&self, email: &str) -> Result<bool, CollaboratorError> {
        let email_hash = hash_as_i64(&email)
            .map_err(|e| CollaboratorError::unavailable("duplicate checker", e))?;

        if self.known_emails.get(&email_hash).is_some() {
            debug!("duplicate email found in cache");
            return Ok(true);
        }

        match self.repository.find_id_by_email_hash(email_hash).await {
            Ok(Some(customer_id)) => {
                self.known_emails.insert(email_hash, customer_id);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => Err(CollaboratorError::unavailable(
                "duplicate checker",
                err.to_string(),
            )),
        }
    }
}
