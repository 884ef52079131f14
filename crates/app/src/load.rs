use kassa_core::{normalize_with, Diagnostics, NormalizeError, Transaction};
use kassa_import::{read_csv_file, read_json_file, read_records, read_xlsx_file, CsvOptions};
use std::path::Path;

use crate::menu::SourceKind;

/// Reports skipped records as `tracing` warnings.
#[derive(Debug, Default)]
pub struct TracingDiagnostics {
    pub skipped: usize,
}

impl Diagnostics for TracingDiagnostics {
    fn skipped(&mut self, index: usize, error: &NormalizeError) {
        self.skipped += 1;
        tracing::warn!(index, %error, "skipping record");
    }
}

/// Reads and normalizes a file. With no `kind` the format follows the
/// extension. Read failures are logged and give no transactions.
pub fn load_transactions(
    path: &Path,
    kind: Option<SourceKind>,
    csv_options: &CsvOptions,
) -> Vec<Transaction> {
    let records = match kind {
        Some(SourceKind::Json) => read_json_file(path),
        Some(SourceKind::Csv) => read_csv_file(path, csv_options),
        Some(SourceKind::Xlsx) => read_xlsx_file(path),
        None => read_records(path, csv_options),
    };
    let records = match records {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(path = %path.display(), "failed to load transactions: {e}");
            return Vec::new();
        }
    };

    let mut diagnostics = TracingDiagnostics::default();
    let transactions = normalize_with(&records, &mut diagnostics);
    if diagnostics.skipped > 0 {
        tracing::warn!(skipped = diagnostics.skipped, "some records were not transactions");
    }
    tracing::info!(count = transactions.len(), "loaded transactions");
    transactions
}
