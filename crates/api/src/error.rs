//! API Error Responses

use alerting::AlertmanagerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Errors returned by gateway handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Backend(#[from] AlertmanagerError),

    #[error("Invalid query parameter '{name}': {reason}")]
    InvalidQuery { name: String, reason: String },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            ApiError::Backend(err) => match err {
                AlertmanagerError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
                AlertmanagerError::InvalidSilenceId(_) | AlertmanagerError::Config(_) => {
                    StatusCode::BAD_REQUEST
                }
                AlertmanagerError::ConfigNotFound
                | AlertmanagerError::SilenceNotFound(_)
                | AlertmanagerError::OrgNotFound(_) => StatusCode::NOT_FOUND,
                AlertmanagerError::InvalidUrl { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                AlertmanagerError::Transport(_)
                | AlertmanagerError::Request(_)
                | AlertmanagerError::ReadBody(_)
                | AlertmanagerError::ApplyFailed { .. }
                | AlertmanagerError::UnexpectedStatus { .. }
                | AlertmanagerError::Decode(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Request failed with {}: {}", status, self);
        }
        metrics::counter!("gateway_errors_total", "status" => status.as_u16().to_string()).increment(1);

        (
            status,
            Json(ErrorBody {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
