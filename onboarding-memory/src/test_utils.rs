use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use heapless::String as HeaplessString;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use onboarding_api::domain::customer::{Customer, CustomerStatus};
use onboarding_api::domain::request::{
    AddressInfo, DocumentAttachment, OnboardingRequest, PersonalInfo,
};
use onboarding_api::domain::status::{OverallStatus, RiskCategory, StepStatus};
use onboarding_api::service::collaborators::{
    CollaboratorError, RiskAssessment, RiskScorer, VerificationOutcome, VerificationService,
};
use onboarding_db::models::customer::CustomerModel;
use onboarding_db::models::onboarding_status::OnboardingStatusModel;

pub fn create_test_personal_info(email: &str) -> PersonalInfo {
    PersonalInfo {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: email.to_string(),
        phone: "+15551234567".to_string(),
        date_of_birth: "1990-04-12".to_string(),
    }
}

pub fn create_test_address() -> AddressInfo {
    AddressInfo {
        street: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip_code: "62701".to_string(),
        country: "US".to_string(),
    }
}

pub fn create_test_request(email: &str) -> OnboardingRequest {
    OnboardingRequest {
        personal_info: create_test_personal_info(email),
        address: create_test_address(),
        documents: vec![DocumentAttachment {
            document_type: "Passport".to_string(),
            file_name: "passport.pdf".to_string(),
            content_hash: None,
        }],
    }
}

pub fn create_test_customer_model(email: &str) -> CustomerModel {
    let now = Utc::now();
    CustomerModel {
        id: Uuid::new_v4(),
        first_name: HeaplessString::try_from("John").unwrap(),
        last_name: HeaplessString::try_from("Doe").unwrap(),
        email: HeaplessString::try_from(email).unwrap(),
        phone: HeaplessString::try_from("+15551234567").unwrap(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
        nationality: Some(HeaplessString::try_from("US").unwrap()),
        status: CustomerStatus::PendingVerification,
        created_at: now,
        updated_at: now,
    }
}

pub fn create_test_status_model(customer_id: Option<Uuid>) -> OnboardingStatusModel {
    let now = Utc::now();
    OnboardingStatusModel {
        id: Uuid::new_v4(),
        customer_id,
        identity_step: StepStatus::Pending,
        document_step: StepStatus::Pending,
        biometric_step: StepStatus::Pending,
        kyc_step: StepStatus::Pending,
        aml_step: StepStatus::Pending,
        risk_step: StepStatus::Pending,
        overall_status: OverallStatus::InProgress,
        message: None,
        version: 1,
        created_at: now,
        updated_at: now,
    }
}

/// Random mailbox for tests that need distinct emails per run.
pub fn random_email() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("applicant.{suffix}@example.com")
}

/// Verification stub returning a fixed outcome and counting invocations.
pub struct StaticVerificationService {
    outcome: VerificationOutcome,
    calls: AtomicUsize,
}

impl StaticVerificationService {
    pub fn passing() -> Self {
        StaticVerificationService {
            outcome: VerificationOutcome::pass("all checks passed"),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(detail: &str) -> Self {
        StaticVerificationService {
            outcome: VerificationOutcome::fail(detail.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VerificationService for StaticVerificationService {
    async fn verify(
        &self,
        _request: &OnboardingRequest,
    ) -> Result<VerificationOutcome, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

/// Risk scorer stub returning a fixed category and counting invocations.
pub struct StaticRiskScorer {
    category: RiskCategory,
    calls: AtomicUsize,
}

impl StaticRiskScorer {
    pub fn new(category: RiskCategory) -> Self {
        StaticRiskScorer {
            category,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RiskScorer for StaticRiskScorer {
    async fn score(
        &self,
        _customer: &Customer,
        _request: &OnboardingRequest,
    ) -> Result<RiskAssessment, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RiskAssessment {
            category: self.category,
            rationale: "static test score".to_string(),
        })
    }
}
