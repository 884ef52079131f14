use calamine::{open_workbook, Data, Reader, Xlsx};
use serde_json::{Map, Value};
use std::path::Path;

use crate::csv::cell_value;
use crate::source::{ensure_readable, ImportError};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Rows of the first worksheet as JSON objects keyed by the header row.
pub fn read_xlsx_file(path: &Path) -> Result<Vec<Value>, ImportError> {
    ensure_readable(path)?;
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::NoWorksheet(path.to_path_buf()))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in rows {
        let object: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.clone(), data_value(cell)))
            .collect();
        if object.values().all(Value::is_null) {
            continue;
        }
        records.push(Value::Object(object));
    }

    tracing::info!(count = records.len(), path = %path.display(), "loaded XLSX records");
    Ok(records)
}

// Spreadsheets store `16210` as the float `16210.0`; the CSV cell rules turn
// it back into an integer.
fn data_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(n) => Value::from(*n),
        Data::Float(f) => cell_value(&f.to_string()),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => cell_value(s),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Value::String(d.format(DATE_TIME_FORMAT).to_string()))
            .unwrap_or(Value::Null),
    }
}
