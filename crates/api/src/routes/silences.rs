//! Silence Routes

use alerting::{GettableSilence, PostableSilence};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::repeated;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SilenceCreated {
    #[serde(rename = "silenceID")]
    pub silence_id: String,
}

/// `?filter=` may repeat
pub async fn list_silences(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<GettableSilence>>, ApiError> {
    let filters = repeated(&params, "filter");
    Ok(Json(state.registry.get(org_id)?.list_silences(&filters).await?))
}

pub async fn create_silence(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
    Json(silence): Json<PostableSilence>,
) -> Result<(StatusCode, Json<SilenceCreated>), ApiError> {
    let silence_id = state.registry.get(org_id)?.create_silence(&silence).await?;
    Ok((StatusCode::ACCEPTED, Json(SilenceCreated { silence_id })))
}

pub async fn get_silence(
    State(state): State<Arc<AppState>>,
    Path((org_id, silence_id)): Path<(i64, String)>,
) -> Result<Json<GettableSilence>, ApiError> {
    Ok(Json(state.registry.get(org_id)?.get_silence(&silence_id).await?))
}

pub async fn delete_silence(
    State(state): State<Arc<AppState>>,
    Path((org_id, silence_id)): Path<(i64, String)>,
) -> Result<StatusCode, ApiError> {
    state.registry.get(org_id)?.delete_silence(&silence_id).await?;
    Ok(StatusCode::OK)
}
