use serde::{Deserialize, Serialize};

use crate::query::{
    filter_by_currency_code, filter_by_state, search_by_description, sort_by_date,
    DEFAULT_CURRENCY, DEFAULT_STATE,
};
use crate::transaction::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn is_descending(self) -> bool {
        matches!(self, SortOrder::Descending)
    }
}

/// Stages chosen by the user. Applied in a fixed order: state, sort,
/// RUB-only, search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub state: String,
    pub sort: Option<SortOrder>,
    pub rub_only: bool,
    pub search: Option<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            state: DEFAULT_STATE.to_string(),
            sort: None,
            rub_only: false,
            search: None,
        }
    }
}

pub fn run_pipeline(transactions: &[Transaction], options: &PipelineOptions) -> Vec<Transaction> {
    let mut selected = filter_by_state(transactions, &options.state);

    if let Some(order) = options.sort {
        selected = sort_by_date(&selected, order.is_descending());
    }

    if options.rub_only {
        selected = filter_by_currency_code(&selected, DEFAULT_CURRENCY);
    }

    if let Some(query) = &options.search {
        selected = search_by_description(&selected, query);
    }

    selected
}
