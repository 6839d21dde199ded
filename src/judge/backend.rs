//! Transports that carry one judge request to a generative model.

use std::time::Duration;

use async_openai::types::chat::CreateChatCompletionResponse;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::debug;

use super::error::JudgeError;
use crate::config::{Config, JudgeBackendKind};

/// Sends a system instruction plus user message and returns the model's text reply.
pub trait JudgeBackend: Send + Sync {
    fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> impl std::future::Future<Output = Result<String, JudgeError>> + Send;
}

impl<T: JudgeBackend> JudgeBackend for std::sync::Arc<T> {
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, JudgeError> {
        (**self).complete(model, system, user).await
    }
}

/// Provider-agnostic backend on top of `genai`; the model name selects the provider
/// and credentials come from the provider's usual environment variables.
#[derive(Clone, Default)]
pub struct GenaiBackend {
    client: genai::Client,
}

impl GenaiBackend {
    pub fn new(client: genai::Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for GenaiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiBackend").finish_non_exhaustive()
    }
}

impl JudgeBackend for GenaiBackend {
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, JudgeError> {
        let request = ChatRequest::new(vec![ChatMessage::user(user)]).with_system(system);

        let response = self
            .client
            .exec_chat(model, request, None)
            .await
            .map_err(|e| JudgeError::Provider(e.to_string()))?;

        response
            .first_text()
            .map(str::to_string)
            .filter(|text| !text.trim().is_empty())
            .ok_or(JudgeError::EmptyResponse)
    }
}

/// Backend for any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, JudgeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| JudgeError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl JudgeBackend for OpenAiCompatBackend {
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, JudgeError> {
        let body = serde_json::json!({
            "model": model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let mut request = self.http.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| JudgeError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| JudgeError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(JudgeError::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!(bytes = text.len(), "judge completion received");

        let completion: CreateChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| JudgeError::InvalidResponse(format!("malformed completion: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(JudgeError::EmptyResponse)
    }
}

/// Backend picked at startup from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredBackend {
    Genai(GenaiBackend),
    OpenAiCompat(OpenAiCompatBackend),
    /// Every call fails with [`JudgeError::Disabled`]; validation stays rule-only.
    Disabled,
}

impl ConfiguredBackend {
    pub fn from_config(config: &Config) -> Result<Self, JudgeError> {
        match config.judge_backend {
            JudgeBackendKind::Genai => Ok(ConfiguredBackend::Genai(GenaiBackend::default())),
            JudgeBackendKind::OpenAi => OpenAiCompatBackend::new(
                config.judge_base_url.clone(),
                config.judge_api_key.clone(),
                config.judge_timeout,
            )
            .map(ConfiguredBackend::OpenAiCompat),
            JudgeBackendKind::Disabled => Ok(ConfiguredBackend::Disabled),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfiguredBackend::Genai(_) => "genai",
            ConfiguredBackend::OpenAiCompat(_) => "openai",
            ConfiguredBackend::Disabled => "disabled",
        }
    }
}

impl JudgeBackend for ConfiguredBackend {
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, JudgeError> {
        match self {
            ConfiguredBackend::Genai(backend) => backend.complete(model, system, user).await,
            ConfiguredBackend::OpenAiCompat(backend) => backend.complete(model, system, user).await,
            ConfiguredBackend::Disabled => Err(JudgeError::Disabled),
        }
    }
}
