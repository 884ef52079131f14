use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::csv::{read_csv_file, CsvOptions};
use crate::json::read_json_file;
use crate::xlsx::read_xlsx_file;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("file is empty: {}", .0.display())]
    Empty(PathBuf),
    #[error("workbook has no worksheets: {}", .0.display())]
    NoWorksheet(PathBuf),
    #[error("JSON document is not an array of records")]
    NotAnArray,
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("XLSX error: {0}")]
    Xlsx(#[from] calamine::XlsxError),
}

pub(crate) fn ensure_readable(path: &Path) -> Result<(), ImportError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ImportError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_file() {
        return Err(ImportError::NotAFile(path.to_path_buf()));
    }
    if metadata.len() == 0 {
        return Err(ImportError::Empty(path.to_path_buf()));
    }
    Ok(())
}

/// Reads a JSON, CSV or XLSX file, picked by extension.
pub fn read_records(path: &Path, csv_options: &CsvOptions) -> Result<Vec<Value>, ImportError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => read_json_file(path),
        "csv" => read_csv_file(path, csv_options),
        "xlsx" => read_xlsx_file(path),
        other => Err(ImportError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn dispatches_by_extension() {
        let mut json = tempfile::Builder::new().suffix(".JSON").tempfile().unwrap();
        json.write_all(br#"[{"id": 1}]"#).unwrap();
        assert_eq!(read_records(json.path(), &CsvOptions::default()).unwrap().len(), 1);

        let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        csv.write_all(b"id,state\n1,EXECUTED\n2,CANCELED\n").unwrap();
        assert_eq!(read_records(csv.path(), &CsvOptions::default()).unwrap().len(), 2);
    }

    #[test]
    fn rejects_unknown_extension() {
        let mut xls = tempfile::Builder::new().suffix(".xls").tempfile().unwrap();
        xls.write_all(b"\xd0\xcf").unwrap();
        assert!(matches!(
            read_records(xls.path(), &CsvOptions::default()),
            Err(ImportError::UnsupportedFormat(ext)) if ext == "xls"
        ));
    }

    #[test]
    fn xlsx_is_read_by_extension() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "status").unwrap();
        sheet.write_string(1, 0, "EXECUTED").unwrap();
        workbook.save(file.path()).unwrap();

        let rows = read_records(file.path(), &CsvOptions::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["status"], "EXECUTED");
    }

    #[test]
    fn broken_xlsx_is_a_spreadsheet_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();
        assert!(matches!(
            read_records(file.path(), &CsvOptions::default()),
            Err(ImportError::Xlsx(_))
        ));
    }
}
