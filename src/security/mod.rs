//! Password policy, scoring, generation and health checks.

pub mod breach;
pub mod generator;
pub mod health;
pub mod strength;

pub use breach::{BreachCheck, OfflineBreachCheck};
pub use generator::{generate_password, GeneratorOptions};
pub use health::{health_report, HealthFinding, HealthIssue};
pub use strength::{strength_score, validate_master_password, StrengthLabel};
