pub mod display;
pub mod mask;
pub mod money;
pub mod normalize;
pub mod period;
pub mod pipeline;
pub mod query;
pub mod transaction;

pub use mask::MaskError;
pub use money::Money;
pub use normalize::{normalize, normalize_with, Diagnostics, NormalizeError, SkippedRecord};
pub use period::DateRange;
pub use pipeline::{run_pipeline, PipelineOptions, SortOrder};
pub use query::Counts;
pub use transaction::{Currency, OperationAmount, Transaction, TransactionId};
