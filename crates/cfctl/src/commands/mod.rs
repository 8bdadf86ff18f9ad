//! Command implementations

pub mod async_utils;
pub mod confirm;
pub mod domain;
pub mod org_quota;
pub mod profile;
pub mod route;
pub mod service;
pub mod service_binding;
pub mod service_key;
pub mod space;
pub mod target;

use std::path::Path;

use serde_json::Value;

use crate::error::{CfCtlError, Result as CliResult};

const INVALID_PARAMETERS: &str = "Invalid configuration provided for -c flag. Please provide a valid JSON object or path to a file containing a valid JSON object.";

/// Parse a `-c` value: inline JSON, or a path to a file holding JSON
///
/// Only JSON objects are accepted.
pub fn parse_parameters(raw: Option<&str>) -> CliResult<Option<Value>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let path = Path::new(raw);
    let text = if path.is_file() {
        std::fs::read_to_string(path).map_err(|e| CfCtlError::InvalidInput {
            message: format!("Unable to read '{}': {}", raw, e),
        })?
    } else {
        raw.to_string()
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(value @ Value::Object(_)) => Ok(Some(value)),
        _ => Err(CfCtlError::InvalidInput {
            message: INVALID_PARAMETERS.to_string(),
        }),
    }
}
