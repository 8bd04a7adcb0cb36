use chrono::{DateTime, NaiveDate, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use onboarding_api::domain::customer::{Customer, CustomerStatus};

use crate::models::identifiable::Identifiable;
use crate::utils::{hash_as_i64, heapless_from};

/// Database model for a customer identity record.
///
/// The email column is stored in normalized form and is unique across all
/// customers; that constraint, not the advisory duplicate check, is the
/// source of truth for duplicate prevention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CustomerModel {
    pub id: Uuid,

    pub first_name: HeaplessString<100>,
    pub last_name: HeaplessString<100>,

    /// Normalized (trimmed, lower-cased) email
    pub email: HeaplessString<100>,

    pub phone: HeaplessString<20>,
    pub date_of_birth: NaiveDate,

    pub nationality: Option<HeaplessString<100>>,

    pub status: CustomerStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for CustomerModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Index model for customer email lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CustomerIdxModel {
    pub id: Uuid,
    pub email_hash: i64,
}

impl Identifiable for CustomerIdxModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl CustomerModel {
    /// Index row derived from the normalized email.
    pub fn to_index(&self) -> Result<CustomerIdxModel, String> {
        Ok(CustomerIdxModel {
            id: self.id,
            email_hash: hash_as_i64(&self.email.as_str())?,
        })
    }
}

impl TryFrom<&Customer> for CustomerModel {
    type Error = String;

    fn try_from(customer: &Customer) -> Result<Self, Self::Error> {
        Ok(CustomerModel {
            id: customer.id,
            first_name: heapless_from("first_name", &customer.first_name)?,
            last_name: heapless_from("last_name", &customer.last_name)?,
            email: heapless_from("email", &customer.email)?,
            phone: heapless_from("phone", &customer.phone)?,
            date_of_birth: customer.date_of_birth,
            nationality: customer
                .nationality
                .as_deref()
                .map(|n| heapless_from("nationality", n))
                .transpose()?,
            status: customer.status,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        })
    }
}

impl From<&CustomerModel> for Customer {
    fn from(model: &CustomerModel) -> Self {
        Customer {
            id: model.id,
            first_name: model.first_name.as_str().to_string(),
            last_name: model.last_name.as_str().to_string(),
            email: model.email.as_str().to_string(),
            phone: model.phone.as_str().to_string(),
            date_of_birth: model.date_of_birth,
            nationality: model.nationality.as_ref().map(|n| n.as_str().to_string()),
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        let now = Utc::now();
        Customer {
            id: Uuid::new_v4(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+15551234567".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            nationality: Some("US".to_string()),
            status: CustomerStatus::PendingVerification,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_round_trip_through_model() {
        let customer = customer();
        let model = CustomerModel::try_from(&customer).unwrap();
        assert_eq!(Customer::from(&model), customer);
    }

    #[test]
    fn test_oversized_field_is_rejected() {
        let mut customer = customer();
        customer.email = format!("{}@example.com", "x".repeat(120));
        let err = CustomerModel::try_from(&customer).unwrap_err();
        assert!(err.contains("email"));
    }

    #[test]
    fn test_index_hash_tracks_email() {
        let model = CustomerModel::try_from(&customer()).unwrap();
        let idx = model.to_index().unwrap();
        assert_eq!(idx.id, model.id);
        assert_eq!(idx.email_hash, hash_as_i64(&model.email.as_str()).unwrap());
    }
}
