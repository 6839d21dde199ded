use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::{
    SHELFCHECK_STATUS_HEADER, SHELFCHECK_STATUS_INVALID_REQUEST, SHELFCHECK_STATUS_JUDGE_ERROR,
};
use crate::judge::JudgeError;
use crate::validator::ValidatorError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("judge failed: {0}")]
    Judge(#[from] JudgeError),
}

impl From<ValidatorError> for GatewayError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::InvalidPayload(message) => GatewayError::InvalidRequest(message),
            ValidatorError::Judge(e) => GatewayError::Judge(e),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Judge(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn status_tag(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => SHELFCHECK_STATUS_INVALID_REQUEST,
            GatewayError::Judge(_) => SHELFCHECK_STATUS_JUDGE_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut headers = HeaderMap::new();
        headers.insert(
            SHELFCHECK_STATUS_HEADER,
            HeaderValue::from_static(self.status_tag()),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
