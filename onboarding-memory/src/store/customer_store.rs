use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use onboarding_db::models::customer::CustomerModel;
use onboarding_db::repository::{CustomerRepository, RepositoryError};

#[derive(Default)]
struct Inner {
    customers: HashMap<Uuid, CustomerModel>,
    /// email_hash -> customer id; this is the authoritative uniqueness
    /// constraint for duplicate prevention.
    email_idx: HashMap<i64, Uuid>,
}

/// In-memory customer repository.
///
/// Both maps are guarded by a single lock so that the uniqueness check and
/// the insert are one atomic step, exactly as a database unique index
/// would behave under concurrent submissions.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    inner: RwLock<Inner>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().customers.is_empty()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, customer: CustomerModel) -> Result<CustomerModel, RepositoryError> {
        let idx = customer.to_index().map_err(RepositoryError::Store)?;
        let mut inner = self.inner.write();

        if inner.email_idx.contains_key(&idx.email_hash) {
            debug!(customer_id = %customer.id, "unique email constraint violated");
            return Err(RepositoryError::Conflict(customer.email.as_str().to_string()));
        }
        if inner.customers.contains_key(&customer.id) {
            return Err(RepositoryError::Conflict(customer.id.to_string()));
        }

        inner.email_idx.insert(idx.email_hash, idx.id);
        inner.customers.insert(customer.id, customer.clone());
        debug!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }

    async fn update(&self, customer: CustomerModel) -> Result<CustomerModel, RepositoryError> {
        let idx = customer.to_index().map_err(RepositoryError::Store)?;
        let mut inner = self.inner.write();

        let stored = inner
            .customers
            .get(&customer.id)
            .ok_or(RepositoryError::NotFound(customer.id))?;
        let stored_idx = stored.to_index().map_err(RepositoryError::Store)?;

        // Re-key the index when the email changed, still under uniqueness.
        if stored_idx.email_hash != idx.email_hash {
            if inner.email_idx.contains_key(&idx.email_hash) {
                return Err(RepositoryError::Conflict(customer.email.as_str().to_string()));
            }
            inner.email_idx.remove(&stored_idx.email_hash);
            inner.email_idx.insert(idx.email_hash, idx.id);
        }

        inner.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerModel>, RepositoryError> {
        Ok(self.inner.read().customers.get(&id).cloned())
    }

    async fn find_id_by_email_hash(
        &self,
        email_hash: i64,
    ) -> Result<Option<Uuid>, RepositoryError> {
        Ok(self.inner.read().email_idx.get(&email_hash).copied())
    }
}
