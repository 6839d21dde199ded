//! Scripted judge backend for tests.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::backend::JudgeBackend;
use super::error::JudgeError;
use super::parse::extract_first_array;
use crate::model::Verdict;

/// A call observed by [`MockJudgeBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub model: String,
    pub system: String,
    pub user: String,
}

impl RecordedCall {
    /// Number of items serialized into the user message.
    pub fn item_count(&self) -> usize {
        extract_first_array(&self.user).map_or(0, |items| items.len())
    }
}

/// Replays queued responses, then falls back to a uniform verdict for every item.
pub struct MockJudgeBackend {
    scripted: Mutex<VecDeque<Result<String, JudgeError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    fallback: (Verdict, f32),
}

impl MockJudgeBackend {
    /// Answers every item with `verdict` at `confidence` once the script is exhausted.
    pub fn always(verdict: Verdict, confidence: f32) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            fallback: (verdict, confidence),
        }
    }

    /// Queues a raw response text.
    pub fn push_text(&self, text: impl Into<String>) -> &Self {
        self.scripted.lock().push_back(Ok(text.into()));
        self
    }

    /// Queues an error.
    pub fn push_error(&self, error: JudgeError) -> &Self {
        self.scripted.lock().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn fallback_response(&self, user: &str) -> String {
        let count = extract_first_array(user).map_or(0, |items| items.len());
        let (verdict, confidence) = self.fallback;
        let element = serde_json::json!({
            "verdict": verdict.as_str(),
            "confidence": confidence,
            "reason": "mock judgement",
        });
        serde_json::Value::Array(vec![element; count]).to_string()
    }
}

impl Default for MockJudgeBackend {
    fn default() -> Self {
        Self::always(Verdict::Unsure, 0.5)
    }
}

impl std::fmt::Debug for MockJudgeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockJudgeBackend")
            .field("pending", &self.scripted.lock().len())
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

impl JudgeBackend for MockJudgeBackend {
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, JudgeError> {
        self.calls.lock().push(RecordedCall {
            model: model.to_string(),
            system: system.to_string(),
            user: user.to_string(),
        });

        let scripted = self.scripted.lock().pop_front();
        match scripted {
            Some(result) => result,
            None => Ok(self.fallback_response(user)),
        }
    }
}
