pub mod collaborators;
pub mod decision;
pub mod ledger;
pub mod orchestrator;

// Re-exports
pub use collaborators::*;
pub use decision::*;
pub use ledger::*;
pub use orchestrator::*;
