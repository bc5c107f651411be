//! Per-Organization Routes

pub mod alerts;
pub mod config;
pub mod receivers;
pub mod silences;
pub mod status;

use crate::error::ApiError;

/// Repeated values of `name` in a query string
pub(crate) fn repeated(params: &[(String, String)], name: &str) -> Vec<String> {
    params
        .iter()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
        .collect()
}

/// Last value of `name`, parsed as a boolean
pub(crate) fn flag(params: &[(String, String)], name: &str, default: bool) -> Result<bool, ApiError> {
    match params.iter().rev().find(|(key, _)| key == name) {
        None => Ok(default),
        Some((_, value)) => value.parse().map_err(|_| ApiError::InvalidQuery {
            name: name.to_string(),
            reason: format!("'{}' is not a boolean", value),
        }),
    }
}
