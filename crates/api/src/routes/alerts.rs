//! Alert Routes

use alerting::{AlertFilter, AlertGroup, GettableAlert, PostableAlert};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use super::{flag, repeated};
use crate::error::ApiError;
use crate::AppState;

/// Build the alert selection from `active`, `silenced`, `inhibited`,
/// repeated `filter` and `receiver` query parameters
fn alert_filter(params: &[(String, String)]) -> Result<AlertFilter, ApiError> {
    let defaults = AlertFilter::default();
    Ok(AlertFilter {
        active: flag(params, "active", defaults.active)?,
        silenced: flag(params, "silenced", defaults.silenced)?,
        inhibited: flag(params, "inhibited", defaults.inhibited)?,
        matchers: repeated(params, "filter"),
        receiver: repeated(params, "receiver").pop(),
    })
}

/// Get alerts
pub async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<GettableAlert>>, ApiError> {
    let filter = alert_filter(&params)?;
    Ok(Json(state.registry.get(org_id)?.get_alerts(&filter).await?))
}

/// Get alert groups
pub async fn get_alert_groups(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<AlertGroup>>, ApiError> {
    let filter = alert_filter(&params)?;
    Ok(Json(state.registry.get(org_id)?.get_alert_groups(&filter).await?))
}

/// Push alerts
pub async fn post_alerts(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<i64>,
    Json(alerts): Json<Vec<PostableAlert>>,
) -> Result<StatusCode, ApiError> {
    state.registry.get(org_id)?.put_alerts(&alerts).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_filter_defaults() {
        assert_eq!(alert_filter(&[]).unwrap(), AlertFilter::default());
    }

    #[test]
    fn test_filter_from_query() {
        let filter = alert_filter(&params(&[
            ("silenced", "false"),
            ("filter", "team=\"db\""),
            ("filter", "severity=\"critical\""),
            ("receiver", "pager"),
        ]))
        .unwrap();

        assert!(filter.active);
        assert!(!filter.silenced);
        assert_eq!(filter.matchers.len(), 2);
        assert_eq!(filter.receiver.as_deref(), Some("pager"));
    }

    #[test]
    fn test_invalid_flag() {
        let err = alert_filter(&params(&[("active", "yes")])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuery { .. }));
    }
}
