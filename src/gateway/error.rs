use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::extract::ExtractError;
use crate::space::SpaceError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("{message}")]
    UnsupportedType { message: String },

    #[error("no extractable text found in '{filename}'; ensure it is a text, PDF, or DOCX file")]
    NoExtractableText { filename: String },

    #[error("failed to extract text from file")]
    ExtractionFailed { detail: String },

    #[error("Space call failed: {0}")]
    SpaceCall(#[from] SpaceError),
}

impl GatewayError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GatewayError::InvalidRequest {
            message: message.into(),
        }
    }
}

impl From<ExtractError> for GatewayError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedType { .. } => GatewayError::UnsupportedType {
                message: err.to_string(),
            },
            ExtractError::Extraction { message, .. } => {
                GatewayError::ExtractionFailed { detail: message }
            }
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            GatewayError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, None),
            GatewayError::UnsupportedType { .. } => (StatusCode::UNSUPPORTED_MEDIA_TYPE, None),
            GatewayError::NoExtractableText { .. } => (StatusCode::UNPROCESSABLE_ENTITY, None),
            GatewayError::ExtractionFailed { detail } => {
                (StatusCode::INTERNAL_SERVER_ERROR, Some(detail.clone()))
            }
            GatewayError::SpaceCall(err) => {
                (StatusCode::BAD_GATEWAY, err.detail().map(str::to_string))
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            detail,
        });

        (status, body).into_response()
    }
}
