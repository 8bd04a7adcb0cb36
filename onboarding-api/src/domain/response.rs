use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::customer::Customer;
use crate::domain::status::OverallStatus;

/// Outcome of an onboarding attempt as returned to the caller.
///
/// A projection of the ledger at the end of the run; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResponse {
    pub customer_id: Option<Uuid>,
    pub onboarding_status: OverallStatus,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,

    pub processed_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

impl OnboardingResponse {
    pub fn new(status: OverallStatus, message: impl Into<String>) -> Self {
        let now = Utc::now();
        OnboardingResponse {
            customer_id: None,
            onboarding_status: status,
            message: message.into(),
            customer: None,
            processed_at: now,
            timestamp: now,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(OverallStatus::Rejected, message)
    }

    /// Attach the customer snapshot; also sets `customer_id`.
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer_id = Some(customer.id);
        self.customer = Some(customer);
        self
    }

    pub fn with_customer_id(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }
}
