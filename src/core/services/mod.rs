pub mod health;
pub mod verification;

pub use health::{HealthReport, HealthService};
pub use verification::{VerificationError, VerificationService};
