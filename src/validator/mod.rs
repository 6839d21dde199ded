//! Validation orchestration: cache lookup, rule classification, one judge call per
//! batch for the rule-indeterminate remainder, confidence merge and memoization.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod request;


pub use config::{JudgeFailurePolicy, ValidatorConfig};
pub use error::ValidatorError;
pub use orchestrator::Validator;
pub use request::{ValidateRequest, ValidateResponse};
