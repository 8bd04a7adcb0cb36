pub mod customer;
pub mod identifiable;
pub mod onboarding_status;

// Re-exports
pub use customer::*;
pub use identifiable::*;
pub use onboarding_status::*;
