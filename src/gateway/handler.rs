use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument};

use crate::cache::ValidationCache;
use crate::constants::{SHELFCHECK_STATUS_HEADER, SHELFCHECK_STATUS_VALIDATED};
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::judge::JudgeBackend;
use crate::model::Verdict;
use crate::validator::{ValidateRequest, ValidateResponse};

/// `POST /v1/validate`
///
/// The body is read as raw bytes so malformed JSON gets the same `{error, code}`
/// shape as every other rejection.
#[instrument(
    skip(state, body),
    fields(bytes = body.len(), ingredient = tracing::field::Empty, candidates = tracing::field::Empty)
)]
pub async fn validate_handler<B, C>(
    State(state): State<HandlerState<B, C>>,
    body: Bytes,
) -> Result<Response, GatewayError>
where
    B: JudgeBackend + 'static,
    C: ValidationCache + 'static,
{
    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::InvalidRequest(format!("malformed JSON body: {e}")))?;
    let request = ValidateRequest::from_value(value)?;

    let span = tracing::Span::current();
    span.record("ingredient", tracing::field::display(&request.spec.name));
    span.record("candidates", request.candidates.len());
    debug!(model = ?request.model, "validating candidates");

    let results = state
        .validator
        .validate(&request.spec, &request.candidates, request.model.as_deref())
        .await?;

    let count = |verdict: Verdict| results.iter().filter(|r| r.verdict == verdict).count();
    info!(
        pass = count(Verdict::Pass),
        fail = count(Verdict::Fail),
        unsure = count(Verdict::Unsure),
        "validation complete"
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        SHELFCHECK_STATUS_HEADER,
        HeaderValue::from_static(SHELFCHECK_STATUS_VALIDATED),
    );

    Ok((StatusCode::OK, headers, Json(ValidateResponse { results })).into_response())
}
