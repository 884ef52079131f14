pub mod csv;
pub mod json;
pub mod rates;
pub mod source;
pub mod xlsx;

pub use self::csv::{read_csv_file, CsvOptions};
pub use self::json::read_json_file;
pub use rates::{RateClient, RateError};
pub use source::{read_records, ImportError};
pub use xlsx::read_xlsx_file;
