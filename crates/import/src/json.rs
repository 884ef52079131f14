use serde_json::Value;
use std::path::Path;

use crate::source::{ensure_readable, ImportError};

pub fn read_json_file(path: &Path) -> Result<Vec<Value>, ImportError> {
    ensure_readable(path)?;
    let content = std::fs::read_to_string(path)?;
    let records = parse_json(&content)?;
    tracing::info!(count = records.len(), path = %path.display(), "loaded JSON records");
    Ok(records)
}

/// The document must be a top-level array; its elements are passed on
/// untouched.
pub fn parse_json(content: &str) -> Result<Vec<Value>, ImportError> {
    match serde_json::from_str::<Value>(content.trim_start_matches('\u{feff}'))? {
        Value::Array(items) => Ok(items),
        _ => Err(ImportError::NotAnArray),
    }
}
