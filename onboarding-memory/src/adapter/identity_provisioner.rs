use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use onboarding_api::domain::customer::{Customer, CustomerStatus};
use onboarding_api::domain::request::{AddressInfo, PersonalInfo};
use onboarding_api::service::collaborators::{IdentityProvisioner, ProvisionError};
use onboarding_db::models::customer::CustomerModel;
use onboarding_db::repository::{CustomerRepository, RepositoryError};

/// Identity provisioner backed by the customer repository.
///
/// Customers are provisioned `PendingVerification`; `activate` is the
/// second write that flips an approved customer to `Active`.
pub struct RepositoryIdentityProvisioner {
    repository: Arc<dyn CustomerRepository>,
}

impl RepositoryIdentityProvisioner {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        RepositoryIdentityProvisioner { repository }
    }
}

#[async_trait]
impl IdentityProvisioner for RepositoryIdentityProvisioner {
    async fn create(
        &self,
        personal: &PersonalInfo,
        address: &AddressInfo,
    ) -> Result<Customer, ProvisionError> {
        let date_of_birth = NaiveDate::parse_from_str(&personal.date_of_birth, "%Y-%m-%d")
            .map_err(|_| {
                ProvisionError::Unavailable(format!(
                    "date of birth {:?} reached provisioning unparsed",
                    personal.date_of_birth
                ))
            })?;

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            first_name: personal.first_name.clone(),
            last_name: personal.last_name.clone(),
            email: personal.normalized_email(),
            phone: personal.phone.clone(),
            date_of_birth,
            nationality: Some(address.country.clone()),
            status: CustomerStatus::PendingVerification,
            created_at: now,
            updated_at: now,
        };

        let model = CustomerModel::try_from(&customer).map_err(ProvisionError::Unavailable)?;
        match self.repository.create(model).await {
            Ok(saved) => {
                debug!(customer_id = %saved.id, "customer provisioned");
                Ok(Customer::from(&saved))
            }
            Err(RepositoryError::Conflict(_)) => Err(ProvisionError::Conflict(customer.email)),
            Err(err) => Err(ProvisionError::Unavailable(err.to_string())),
        }
    }

    async fn activate(&self, customer_id: Uuid) -> Result<Customer, ProvisionError> {
        let mut model = self
            .repository
            .find_by_id(customer_id)
            .await
            .map_err(|e| ProvisionError::Unavailable(e.to_string()))?
            .ok_or_else(|| {
                ProvisionError::Unavailable(format!("customer {customer_id} not found"))
            })?;

        model.status = CustomerStatus::Active;
        model.updated_at = Utc::now();

        let saved = self
            .repository
            .update(model)
            .await
            .map_err(|e| ProvisionError::Unavailable(e.to_string()))?;
        debug!(customer_id = %saved.id, "customer activated");
        Ok(Customer::from(&saved))
    }
}
