use tracing::{debug, error, info, instrument, warn};

use super::config::{JudgeFailurePolicy, ValidatorConfig};
use super::error::ValidatorError;
use crate::cache::ValidationCache;
use crate::hashing::validation_key;
use crate::judge::{BatchJudgeClient, JudgeBackend, JudgeItem, JudgeVerdict};
use crate::model::{CandidateProduct, IngredientSpec, Signals, ValidationOutput, Verdict};
use crate::rules;

/// A candidate the rules left `unsure`, waiting for the judge.
#[derive(Debug, Clone, Copy)]
struct Deferred {
    index: usize,
    key: u64,
    rule_conf: f32,
}

/// Cache, then rules, then one batched judge call for whatever is still undecided.
#[derive(Debug)]
pub struct Validator<B, C> {
    judge: BatchJudgeClient<B>,
    cache: C,
    config: ValidatorConfig,
}

impl<B: JudgeBackend, C: ValidationCache> Validator<B, C> {
    pub fn new(judge: BatchJudgeClient<B>, cache: C, config: ValidatorConfig) -> Self {
        Self {
            judge,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn judge(&self) -> &BatchJudgeClient<B> {
        &self.judge
    }

    /// Returns one output per candidate, in input order.
    ///
    /// `model` falls back to the configured default when `None`.
    #[instrument(skip_all, fields(ingredient = %spec.name, candidates = candidates.len()))]
    pub async fn validate(
        &self,
        spec: &IngredientSpec,
        candidates: &[CandidateProduct],
        model: Option<&str>,
    ) -> Result<Vec<ValidationOutput>, ValidatorError> {
        let mut outputs = Vec::with_capacity(candidates.len());
        let mut deferred = Vec::new();
        let mut cache_hits = 0usize;

        for (index, candidate) in candidates.iter().enumerate() {
            let key = validation_key(spec, candidate);

            if let Some(hit) = self.cache.get(key).filter(ValidationOutput::is_decisive) {
                cache_hits += 1;
                outputs.push(hit);
                continue;
            }

            let outcome = rules::evaluate_with(spec, candidate, self.config.tolerance);
            let output = ValidationOutput {
                verdict: outcome.verdict,
                confidence: outcome.rule_conf,
                reason: outcome.reason,
                signals: Signals::rule_only(outcome.rule_conf),
            };

            if output.verdict == Verdict::Unsure {
                deferred.push(Deferred {
                    index,
                    key,
                    rule_conf: outcome.rule_conf,
                });
            } else {
                self.remember(key, &output);
            }
            outputs.push(output);
        }

        debug!(
            cache_hits,
            deferred = deferred.len(),
            "rule pass complete"
        );

        if deferred.is_empty() {
            return Ok(outputs);
        }

        let items: Vec<JudgeItem> = deferred
            .iter()
            .map(|d| JudgeItem::new(spec, &candidates[d.index]))
            .collect();
        let model = model.unwrap_or(&self.config.default_model);

        match self.judge.judge_batch(&items, model).await {
            Ok(verdicts) => {
                for (d, verdict) in deferred.iter().zip(verdicts) {
                    let merged = self.merge(&outputs[d.index], d.rule_conf, verdict);
                    self.remember(d.key, &merged);
                    outputs[d.index] = merged;
                }
                info!(judged = deferred.len(), model, "judge batch merged");
            }
            Err(e) => match self.config.failure_policy {
                JudgeFailurePolicy::Fail => {
                    error!(error = %e, "judge failed, aborting validation");
                    return Err(e.into());
                }
                JudgeFailurePolicy::Degrade => {
                    warn!(
                        error = %e,
                        undecided = deferred.len(),
                        "judge failed, keeping rule-only outputs"
                    );
                    for d in &deferred {
                        outputs[d.index].reason.push_str("; judge unavailable");
                    }
                }
            },
        }

        Ok(outputs)
    }

    /// Judge pass/fail is adopted only at or above `judge_min_confidence`.
    fn merge(
        &self,
        provisional: &ValidationOutput,
        rule_conf: f32,
        judged: JudgeVerdict,
    ) -> ValidationOutput {
        let ai_conf = judged.confidence;
        let verdict = match judged.verdict {
            Verdict::Pass | Verdict::Fail if ai_conf >= self.config.judge_min_confidence => {
                judged.verdict
            }
            _ => Verdict::Unsure,
        };

        let reason = if judged.reason.trim().is_empty() {
            provisional.reason.clone()
        } else {
            format!("{}; judge: {}", provisional.reason, judged.reason.trim())
        };

        ValidationOutput {
            verdict,
            confidence: rule_conf.max(ai_conf),
            reason,
            signals: Signals::with_judge(rule_conf, ai_conf),
        }
    }

    fn remember(&self, key: u64, output: &ValidationOutput) {
        if output.is_decisive() {
            self.cache.set(key, output.clone(), self.config.cache_ttl);
        }
    }
}
