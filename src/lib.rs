//! shelfcheck library crate (used by the server and integration tests).
//!
//! Decides whether candidate store products are acceptable purchases for a
//! required ingredient.
//!
//! # Pipeline
//!
//! 1. [`cache`]: previously decisive outputs are returned as-is.
//! 2. [`rules`]: deterministic bans and additive scoring, with sizes normalized by [`size`].
//! 3. [`judge`]: everything the rules leave `unsure` goes to a generative model in one batch.
//! 4. [`validator`]: merges the two signals and memoizes decisive results.
//!
//! [`gateway`] exposes the validator over HTTP; [`config`] reads `SHELFCHECK_*` variables.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod hashing;
pub mod judge;
pub mod model;
pub mod rules;
pub mod size;
pub mod validator;

#[cfg(any(test, feature = "mock"))]
pub use cache::ManualClock;
pub use cache::{Clock, SystemClock, TtlCache, ValidationCache};

pub use config::{Config, ConfigError, JudgeBackendKind};
pub use constants::{DECISIVE_CONFIDENCE, JUDGE_MIN_CONFIDENCE};
pub use hashing::{hash_to_u64, validation_key};

#[cfg(any(test, feature = "mock"))]
pub use judge::MockJudgeBackend;
pub use judge::{
    BatchJudgeClient, ConfiguredBackend, GenaiBackend, JudgeBackend, JudgeError, JudgeItem,
    JudgeVerdict, OpenAiCompatBackend, RetryConfig,
};

pub use model::{
    CandidateProduct, IngredientForm, IngredientSpec, Quantity, Signals, ValidationOutput, Verdict,
};
pub use rules::{RuleOutcome, evaluate};
pub use size::{Size, SizeKind, SizeUnit, Tolerance, parse_size, within_tolerance};
pub use validator::{
    JudgeFailurePolicy, ValidateRequest, ValidateResponse, Validator, ValidatorConfig,
    ValidatorError,
};
