use serde_json::{Map, Number, Value};
use std::path::Path;

use crate::source::{ensure_readable, ImportError};

#[derive(Debug, Clone, Default)]
pub struct CsvOptions {
    /// Field delimiter; detected from the header line when `None`.
    pub delimiter: Option<u8>,
}

impl CsvOptions {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }
}

pub fn read_csv_file(path: &Path, options: &CsvOptions) -> Result<Vec<Value>, ImportError> {
    ensure_readable(path)?;
    let content = std::fs::read_to_string(path)?;
    let records = parse_csv(&content, options)?;
    tracing::info!(count = records.len(), path = %path.display(), "loaded CSV records");
    Ok(records)
}

/// One JSON object per data row, keyed by the header row.
pub fn parse_csv(content: &str, options: &CsvOptions) -> Result<Vec<Value>, ImportError> {
    let content = content.trim_start_matches('\u{feff}');
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(content));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let object: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header.clone(), cell_value(field)))
            .collect();
        rows.push(Value::Object(object));
    }

    Ok(rows)
}

fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Empty cells become `null`; cells whose text survives a round trip through
/// a number become numbers; the rest stay text.
pub(crate) fn cell_value(field: &str) -> Value {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        if n.to_string() == trimmed {
            return Value::from(n);
        }
    }
    if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        if n.to_string() == trimmed {
            return Value::Number(n);
        }
    }
    Value::String(trimmed.to_string())
}
