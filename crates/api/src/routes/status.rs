//! Status, Readiness and Capability Routes

use alerting::{Capability, GettableStatus};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
) -> Result<Json<GettableStatus>, ApiError> {
    Ok(Json(state.registry.get(org_id)?.get_status().await?))
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub org_id: i64,
    pub ready: bool,
}

/// 200 when the backend reports ready, 503 otherwise
pub async fn get_ready(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
) -> Result<(StatusCode, Json<ReadyResponse>), ApiError> {
    let ready = state.registry.get(org_id)?.ready();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    Ok((status, Json(ReadyResponse { org_id, ready })))
}

#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub supported: Vec<Capability>,
    pub unsupported: Vec<Capability>,
}

pub async fn get_capabilities(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
) -> Result<Json<CapabilitiesResponse>, ApiError> {
    let backend = state.registry.get(org_id)?;
    let (supported, unsupported) = Capability::ALL
        .into_iter()
        .partition(|c| backend.supports(*c));
    Ok(Json(CapabilitiesResponse {
        supported,
        unsupported,
    }))
}
