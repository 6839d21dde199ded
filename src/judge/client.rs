use tracing::{debug, instrument, warn};

use super::backend::JudgeBackend;
use super::error::JudgeError;
use super::parse::{JudgeVerdict, parse_verdicts};
use super::prompt::{JudgeItem, SYSTEM_INSTRUCTION, render_items};
use super::retry::RetryConfig;

/// Judges a whole batch of items with one model call.
#[derive(Debug, Clone)]
pub struct BatchJudgeClient<B> {
    backend: B,
    retry: RetryConfig,
}

impl<B: JudgeBackend> BatchJudgeClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Returns exactly `items.len()` verdicts, in item order.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn judge_batch(
        &self,
        items: &[JudgeItem],
        model: &str,
    ) -> Result<Vec<JudgeVerdict>, JudgeError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let user = render_items(items)?;
        let text = self.complete_with_retry(model, &user).await?;
        let verdicts = parse_verdicts(&text, items.len())?;

        debug!(verdicts = verdicts.len(), "judge batch complete");
        Ok(verdicts)
    }

    async fn complete_with_retry(&self, model: &str, user: &str) -> Result<String, JudgeError> {
        let mut attempt = 0u32;
        loop {
            match self.backend.complete(model, SYSTEM_INSTRUCTION, user).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.backoff_for(attempt);
                    warn!(
                        error = %e,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "judge call failed, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
