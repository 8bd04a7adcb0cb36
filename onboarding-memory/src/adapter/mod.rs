pub mod duplicate_checker;
pub mod identity_provisioner;
pub mod status_ledger;

// Re-exports
pub use duplicate_checker::*;
pub use identity_provisioner::*;
pub use status_ledger::*;
