//! Receiver and Template Routes

use alerting::{
    Receiver, TestReceiversRequest, TestReceiversResult, TestTemplatesRequest,
    TestTemplatesResults,
};
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

pub async fn get_receivers(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
) -> Result<Json<Vec<Receiver>>, ApiError> {
    Ok(Json(state.registry.get(org_id)?.get_receivers().await?))
}

pub async fn test_receivers(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
    Json(request): Json<TestReceiversRequest>,
) -> Result<Json<TestReceiversResult>, ApiError> {
    Ok(Json(state.registry.get(org_id)?.test_receivers(&request).await?))
}

pub async fn test_template(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
    Json(request): Json<TestTemplatesRequest>,
) -> Result<Json<TestTemplatesResults>, ApiError> {
    Ok(Json(state.registry.get(org_id)?.test_template(&request).await?))
}
