//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SHELFCHECK_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS, DEFAULT_JUDGE_MODEL, JUDGE_MIN_CONFIDENCE,
};
use crate::judge::RetryConfig;
use crate::size::Tolerance;
use crate::validator::{JudgeFailurePolicy, ValidatorConfig};

/// Default endpoint for the OpenAI-compatible judge backend.
pub const DEFAULT_JUDGE_BASE_URL: &str = "https://api.openai.com/v1";

/// Which transport carries judge calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JudgeBackendKind {
    /// Multi-provider client; credentials come from provider env vars.
    #[default]
    Genai,
    /// Plain HTTP against an OpenAI-compatible `/chat/completions` endpoint.
    OpenAi,
    /// No judge; rule-indeterminate candidates stay `unsure`.
    Disabled,
}

impl FromStr for JudgeBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "genai" => Ok(JudgeBackendKind::Genai),
            "openai" | "openai-compat" => Ok(JudgeBackendKind::OpenAi),
            "disabled" | "none" | "off" => Ok(JudgeBackendKind::Disabled),
            other => Err(format!("expected genai, openai or disabled, got '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SHELFCHECK_*` overrides on top of defaults.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    pub judge_backend: JudgeBackendKind,

    /// Model used when a request does not name one. Default: `gpt-4o-mini`.
    pub judge_model: String,

    /// Base URL for [`JudgeBackendKind::OpenAi`].
    pub judge_base_url: String,

    /// Bearer token for [`JudgeBackendKind::OpenAi`].
    pub judge_api_key: Option<String>,

    /// Per-call HTTP timeout. `None` leaves the deadline to the caller.
    pub judge_timeout: Option<Duration>,

    /// Retries after a transient judge failure. Default: `2`.
    pub judge_max_retries: u32,

    pub judge_failure_policy: JudgeFailurePolicy,

    /// Lifetime of cached decisive outputs. Default: 24h.
    pub cache_ttl_secs: u64,

    /// Max entries in the validation cache. Default: `10_000`.
    pub cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            judge_backend: JudgeBackendKind::default(),
            judge_model: DEFAULT_JUDGE_MODEL.to_string(),
            judge_base_url: DEFAULT_JUDGE_BASE_URL.to_string(),
            judge_api_key: None,
            judge_timeout: None,
            judge_max_retries: RetryConfig::default().max_retries,
            judge_failure_policy: JudgeFailurePolicy::default(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("bind_addr", &self.bind_addr)
            .field("judge_backend", &self.judge_backend)
            .field("judge_model", &self.judge_model)
            .field("judge_base_url", &self.judge_base_url)
            .field("judge_api_key", &self.judge_api_key.as_ref().map(|_| "<redacted>"))
            .field("judge_timeout", &self.judge_timeout)
            .field("judge_max_retries", &self.judge_max_retries)
            .field("judge_failure_policy", &self.judge_failure_policy)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

impl Config {
    const ENV_PORT: &'static str = "SHELFCHECK_PORT";
    const ENV_BIND_ADDR: &'static str = "SHELFCHECK_BIND_ADDR";
    const ENV_JUDGE_BACKEND: &'static str = "SHELFCHECK_JUDGE_BACKEND";
    const ENV_JUDGE_MODEL: &'static str = "SHELFCHECK_JUDGE_MODEL";
    const ENV_JUDGE_BASE_URL: &'static str = "SHELFCHECK_JUDGE_BASE_URL";
    const ENV_JUDGE_API_KEY: &'static str = "SHELFCHECK_JUDGE_API_KEY";
    const ENV_JUDGE_TIMEOUT_SECS: &'static str = "SHELFCHECK_JUDGE_TIMEOUT_SECS";
    const ENV_JUDGE_MAX_RETRIES: &'static str = "SHELFCHECK_JUDGE_MAX_RETRIES";
    const ENV_JUDGE_FAILURE_POLICY: &'static str = "SHELFCHECK_JUDGE_FAILURE_POLICY";
    const ENV_CACHE_TTL_SECS: &'static str = "SHELFCHECK_CACHE_TTL_SECS";
    const ENV_CACHE_CAPACITY: &'static str = "SHELFCHECK_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let judge_backend = Self::parse_from_env(Self::ENV_JUDGE_BACKEND, defaults.judge_backend)?;
        let judge_model = Self::parse_string_from_env(Self::ENV_JUDGE_MODEL, defaults.judge_model);
        let judge_base_url =
            Self::parse_string_from_env(Self::ENV_JUDGE_BASE_URL, defaults.judge_base_url);
        let judge_api_key = Self::parse_optional_string_from_env(Self::ENV_JUDGE_API_KEY);
        let judge_timeout = Self::parse_optional_from_env::<u64>(Self::ENV_JUDGE_TIMEOUT_SECS)?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let judge_max_retries =
            Self::parse_from_env(Self::ENV_JUDGE_MAX_RETRIES, defaults.judge_max_retries)?;
        let judge_failure_policy =
            Self::parse_from_env(Self::ENV_JUDGE_FAILURE_POLICY, defaults.judge_failure_policy)?;
        let cache_ttl_secs = Self::parse_from_env(Self::ENV_CACHE_TTL_SECS, defaults.cache_ttl_secs)?;
        let cache_capacity =
            Self::parse_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity)?;

        Ok(Self {
            port,
            bind_addr,
            judge_backend,
            judge_model,
            judge_base_url,
            judge_api_key,
            judge_timeout,
            judge_max_retries,
            judge_failure_policy,
            cache_ttl_secs,
            cache_capacity,
        })
    }

    /// Checks cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.judge_model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "judge model must not be blank".to_string(),
            ));
        }

        if self.judge_backend == JudgeBackendKind::OpenAi
            && !(self.judge_base_url.starts_with("http://")
                || self.judge_base_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "judge base URL must be http(s), got '{}'",
                self.judge_base_url
            )));
        }

        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "cache TTL must be at least one second".to_string(),
            ));
        }

        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::default().with_max_retries(self.judge_max_retries)
    }

    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            tolerance: Tolerance::default(),
            cache_ttl: self.cache_ttl(),
            judge_min_confidence: JUDGE_MIN_CONFIDENCE,
            default_model: self.judge_model.clone(),
            failure_policy: self.judge_failure_policy,
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(Self::parse_optional_from_env(var_name)?.unwrap_or(default))
    }

    fn parse_optional_from_env<T>(var_name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name: var_name,
                    reason: e.to_string(),
                    value,
                }),
            None => Ok(None),
        }
    }
}
