//! End-to-end onboarding runs over the in-memory stack: real stores and
//! adapters, stubbed verification and risk collaborators.

use std::sync::Arc;

use onboarding_api::domain::customer::CustomerStatus;
use onboarding_api::domain::status::{OverallStatus, RiskCategory, StepStatus};
use onboarding_api::service::ledger::StatusLedger;
use onboarding_api::service::orchestrator::OnboardingOrchestrator;

use onboarding_db::repository::{CustomerRepository, OnboardingStatusRepository};

use onboarding_memory::adapter::{
    CachedDuplicateChecker, LedgerStoreAdapter, RepositoryIdentityProvisioner,
};
use onboarding_memory::store::{InMemoryCustomerRepository, InMemoryStatusLedgerRepository};
use onboarding_memory::test_utils::{
    create_test_request, random_email, StaticRiskScorer, StaticVerificationService,
};

struct Stack {
    customers: Arc<InMemoryCustomerRepository>,
    ledger_rows: Arc<InMemoryStatusLedgerRepository>,
    verification: Arc<StaticVerificationService>,
    risk_scorer: Arc<StaticRiskScorer>,
    orchestrator: OnboardingOrchestrator,
}

fn stack(verification: StaticVerificationService, risk_scorer: StaticRiskScorer) -> Stack {
    let customers = Arc::new(InMemoryCustomerRepository::new());
    let ledger_rows = Arc::new(InMemoryStatusLedgerRepository::new());
    let verification = Arc::new(verification);
    let risk_scorer = Arc::new(risk_scorer);

    let orchestrator = OnboardingOrchestrator::new(
        Arc::new(CachedDuplicateChecker::new(customers.clone())),
        Arc::new(RepositoryIdentityProvisioner::new(customers.clone())),
        verification.clone(),
        risk_scorer.clone(),
        StatusLedger::new(Arc::new(LedgerStoreAdapter::new(ledger_rows.clone()))),
    );

    Stack {
        customers,
        ledger_rows,
        verification,
        risk_scorer,
        orchestrator,
    }
}

#[tokio::test]
async fn test_happy_path_approves_activates_and_audits() -> anyhow::Result<()> {
    let stack = stack(
        StaticVerificationService::passing(),
        StaticRiskScorer::new(RiskCategory::Low),
    );

    let response = stack
        .orchestrator
        .initiate_onboarding(create_test_request("john.doe@example.com"))
        .await?;

    assert_eq!(response.onboarding_status, OverallStatus::Approved);
    let customer_id = response.customer_id.expect("approved response carries an id");
    assert_eq!(response.customer.as_ref().unwrap().first_name, "John");

    // Final persisted form of the customer is active.
    let stored = stack.customers.find_by_id(customer_id).await?.unwrap();
    assert_eq!(stored.status, CustomerStatus::Active);

    // The ledger saw at least creation and finalization.
    assert!(stack.ledger_rows.write_count() >= 2);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_submission_is_rejected_without_further_writes() -> anyhow::Result<()> {
    let stack = stack(
        StaticVerificationService::passing(),
        StaticRiskScorer::new(RiskCategory::Low),
    );
    let email = random_email();

    let first = stack
        .orchestrator
        .initiate_onboarding(create_test_request(&email))
        .await?;
    assert_eq!(first.onboarding_status, OverallStatus::Approved);

    let writes_before = stack.ledger_rows.write_count();
    let customers_before = stack.customers.len();

    let second = stack
        .orchestrator
        .initiate_onboarding(create_test_request(&email))
        .await?;

    assert_eq!(second.onboarding_status, OverallStatus::Rejected);
    assert!(second.message.contains("already registered"));
    assert_eq!(stack.ledger_rows.write_count(), writes_before);
    assert_eq!(stack.customers.len(), customers_before);
    // Verification ran once (for the first attempt), never for the duplicate.
    assert_eq!(stack.verification.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_verification_failure_ends_with_failed_screening_steps() -> anyhow::Result<()> {
    let stack = stack(
        StaticVerificationService::failing("document expired"),
        StaticRiskScorer::new(RiskCategory::Low),
    );

    let response = stack
        .orchestrator
        .initiate_onboarding(create_test_request("john.doe@example.com"))
        .await?;

    assert_eq!(response.onboarding_status, OverallStatus::Rejected);
    assert!(response.message.contains("document expired"));
    assert_eq!(stack.risk_scorer.calls(), 0);

    let customer_id = response.customer_id.expect("rejection after provisioning carries an id");
    let stored = stack.customers.find_by_id(customer_id).await?.unwrap();
    assert_eq!(stored.status, CustomerStatus::PendingVerification);

    let row = stack
        .ledger_rows
        .find_by_id(row_id_for(&stack, customer_id).await)
        .await?
        .unwrap();
    assert_eq!(row.overall_status, OverallStatus::Rejected);
    assert_eq!(row.kyc_step, StepStatus::Failed);
    assert_eq!(row.aml_step, StepStatus::Failed);
    assert_eq!(row.risk_step, StepStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn test_elevated_risk_is_parked_for_manual_review() -> anyhow::Result<()> {
    let stack = stack(
        StaticVerificationService::passing(),
        StaticRiskScorer::new(RiskCategory::High),
    );

    let response = stack
        .orchestrator
        .initiate_onboarding(create_test_request("john.doe@example.com"))
        .await?;

    assert_eq!(response.onboarding_status, OverallStatus::PendingManualReview);
    let customer_id = response.customer_id.unwrap();

    // No activation write: the stored customer keeps its provisioned form.
    let stored = stack.customers.find_by_id(customer_id).await?.unwrap();
    assert_eq!(stored.status, CustomerStatus::PendingVerification);

    let row = stack
        .ledger_rows
        .find_by_id(row_id_for(&stack, customer_id).await)
        .await?
        .unwrap();
    assert_eq!(row.overall_status, OverallStatus::PendingManualReview);
    assert_eq!(row.risk_step, StepStatus::Completed);
    Ok(())
}

#[tokio::test]
async fn test_lost_uniqueness_race_maps_to_rejection() -> anyhow::Result<()> {
    // A checker that never sees the duplicate models the race window where
    // two submissions both pass the advisory check; the store constraint
    // must still reject the loser.
    struct BlindChecker;

    #[async_trait::async_trait]
    impl onboarding_api::service::collaborators::DuplicateChecker for BlindChecker {
        async fn exists(
            &self,
            _email: &str,
        ) -> Result<bool, onboarding_api::service::collaborators::CollaboratorError> {
            Ok(false)
        }
    }

    let customers = Arc::new(InMemoryCustomerRepository::new());
    let ledger_rows = Arc::new(InMemoryStatusLedgerRepository::new());
    let orchestrator = OnboardingOrchestrator::new(
        Arc::new(BlindChecker),
        Arc::new(RepositoryIdentityProvisioner::new(customers.clone())),
        Arc::new(StaticVerificationService::passing()),
        Arc::new(StaticRiskScorer::new(RiskCategory::Low)),
        StatusLedger::new(Arc::new(LedgerStoreAdapter::new(ledger_rows))),
    );

    let email = random_email();
    let first = orchestrator
        .initiate_onboarding(create_test_request(&email))
        .await?;
    assert_eq!(first.onboarding_status, OverallStatus::Approved);

    let second = orchestrator
        .initiate_onboarding(create_test_request(&email))
        .await?;
    assert_eq!(second.onboarding_status, OverallStatus::Rejected);
    assert!(second.message.contains("already registered"));
    assert_eq!(customers.len(), 1);
    Ok(())
}

/// The stores key ledger rows by their own id; tests resolve a customer's
/// row by scanning the single attempt they created.
async fn row_id_for(stack: &Stack, customer_id: uuid::Uuid) -> uuid::Uuid {
    stack
        .ledger_rows
        .all_rows()
        .into_iter()
        .find(|row| row.customer_id == Some(customer_id))
        .map(|row| row.id)
        .expect("ledger row for customer")
}
