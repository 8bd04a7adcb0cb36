use crate::domain::status::{OverallStatus, RiskCategory};

/// Map verification and risk results to the terminal onboarding status.
///
/// Pure and total: the same two inputs always produce the same output,
/// which is what makes compliance decisions replayable in audits.
pub fn decide(verification_passed: bool, risk: RiskCategory) -> OverallStatus {
    if !verification_passed {
        return OverallStatus::Rejected;
    }
    if risk.is_elevated() {
        OverallStatus::PendingManualReview
    } else {
        OverallStatus::Approved
    }
}
