//! Configuration Routes

use alerting::UserConfig;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Replace the organization's configuration with the posted document
pub async fn post_config(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
    body: String,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let config = UserConfig::load(&body)?;
    state.registry.get(org_id)?.save_and_apply_config(&config).await?;
    info!("Configuration applied for org {}", org_id);

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "configuration applied".to_string(),
        }),
    ))
}

/// Reset the organization's configuration to its default
pub async fn post_default_config(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.registry.get(org_id)?.save_and_apply_default_config().await?;
    info!("Default configuration applied for org {}", org_id);

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "default configuration applied".to_string(),
        }),
    ))
}
