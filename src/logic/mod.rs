pub mod audit;
pub mod normalize;
pub mod runway_temp;
pub mod rules;
pub mod scenarios;

pub use audit::{AuditLog, TracingSink};
pub use rules::AdvisoryEngine;
