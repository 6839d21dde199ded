//! Cross-cutting decision thresholds.
//!
//! Rule scoring is done in integer hundredths (see [`crate::rules`]); the `f32`
//! constants here are the same values as seen by callers and the judge merge.

/// Minimum confidence for a `pass`/`fail` to be treated as decisive and cached.
pub const DECISIVE_CONFIDENCE: f32 = 0.8;

/// Minimum judge confidence before a judge `pass`/`fail` is accepted.
pub const JUDGE_MIN_CONFIDENCE: f32 = 0.7;

/// Confidence assumed when the judge omits or garbles one.
pub const JUDGE_DEFAULT_CONFIDENCE: f32 = 0.5;

/// Default size tolerance for weight/volume comparisons, in percent of the required amount.
pub const DEFAULT_SIZE_TOLERANCE_PCT: f64 = 15.0;

/// Default absolute slack for count comparisons.
pub const DEFAULT_COUNT_SLACK: f64 = 1.0;

/// Default lifetime of a cached decision.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

/// Default maximum number of cached decisions.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default judge model (genai resolves the provider from the model name).
pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4o-mini";

/// Response header carrying a short machine-readable outcome.
pub const SHELFCHECK_STATUS_HEADER: &str = "X-Shelfcheck-Status";
pub const SHELFCHECK_STATUS_HEALTHY: &str = "healthy";
pub const SHELFCHECK_STATUS_VALIDATED: &str = "validated";
pub const SHELFCHECK_STATUS_INVALID_REQUEST: &str = "invalid_request";
pub const SHELFCHECK_STATUS_JUDGE_ERROR: &str = "judge_error";
