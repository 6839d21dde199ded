use std::str::FromStr;
use std::time::Duration;

use crate::constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_JUDGE_MODEL, JUDGE_MIN_CONFIDENCE};
use crate::size::Tolerance;

/// What happens to a batch when the judge call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JudgeFailurePolicy {
    /// Keep the rule-only `unsure` outputs and carry on.
    #[default]
    Degrade,
    /// Fail the whole validation call.
    Fail,
}

impl JudgeFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeFailurePolicy::Degrade => "degrade",
            JudgeFailurePolicy::Fail => "fail",
        }
    }
}

impl FromStr for JudgeFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(JudgeFailurePolicy::Degrade),
            "fail" => Ok(JudgeFailurePolicy::Fail),
            other => Err(format!("unknown judge failure policy '{other}'")),
        }
    }
}

impl std::fmt::Display for JudgeFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables for [`super::Validator`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    pub tolerance: Tolerance,

    /// Lifetime of cached decisive outputs. Default: 24h.
    pub cache_ttl: Duration,

    /// Judge confidence required before its pass/fail is adopted. Default: `0.7`.
    pub judge_min_confidence: f32,

    /// Model used when a request does not name one.
    pub default_model: String,

    pub failure_policy: JudgeFailurePolicy,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            judge_min_confidence: JUDGE_MIN_CONFIDENCE,
            default_model: DEFAULT_JUDGE_MODEL.to_string(),
            failure_policy: JudgeFailurePolicy::Degrade,
        }
    }
}

impl ValidatorConfig {
    pub fn with_failure_policy(mut self, policy: JudgeFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}
