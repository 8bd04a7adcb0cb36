use async_trait::async_trait;
use uuid::Uuid;

use crate::models::customer::CustomerModel;
use crate::repository::RepositoryError;

/// Repository for customer identity records.
///
/// Implementations own the email uniqueness constraint: `create` must fail
/// with `RepositoryError::Conflict` when another customer already holds the
/// same normalized email, including when two concurrent submissions race
/// past the advisory duplicate check.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a new customer record.
    async fn create(&self, customer: CustomerModel) -> Result<CustomerModel, RepositoryError>;

    /// Persist changes to an existing customer (e.g. activation).
    async fn update(&self, customer: CustomerModel) -> Result<CustomerModel, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerModel>, RepositoryError>;

    /// Fast lookup through the email-hash index.
    async fn find_id_by_email_hash(&self, email_hash: i64)
        -> Result<Option<Uuid>, RepositoryError>;
}
