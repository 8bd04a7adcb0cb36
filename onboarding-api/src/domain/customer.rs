use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a customer record.
///
/// A customer is provisioned as `PendingVerification` and flipped to
/// `Active` only by the activation write of an approved onboarding outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "customer_status", rename_all = "PascalCase"))]
pub enum CustomerStatus {
    PendingVerification,
    Active,
    Suspended,
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerStatus::PendingVerification => write!(f, "PendingVerification"),
            CustomerStatus::Active => write!(f, "Active"),
            CustomerStatus::Suspended => write!(f, "Suspended"),
        }
    }
}

impl FromStr for CustomerStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PendingVerification" => Ok(CustomerStatus::PendingVerification),
            "Active" => Ok(CustomerStatus::Active),
            "Suspended" => Ok(CustomerStatus::Suspended),
            _ => Err(()),
        }
    }
}

/// Canonical customer identity record.
///
/// Created exactly once per successful onboarding; the email is unique
/// across all customers and always stored in normalized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,

    /// Sourced from the address country at provisioning time.
    pub nationality: Option<String>,

    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn is_active(&self) -> bool {
        self.status == CustomerStatus::Active
    }
}
