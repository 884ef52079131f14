use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_STATE: &str = "UNKNOWN";

/// Source identifiers arrive either as integers or as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Int(i64),
    Text(String),
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionId::Int(n) => write!(f, "{n}"),
            TransactionId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for TransactionId {
    fn from(n: i64) -> Self {
        TransactionId::Int(n)
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        TransactionId::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
}

impl Currency {
    pub fn new(code: &str, name: &str) -> Self {
        Currency {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// Amount as written by the source. Kept as text so display never loses
/// precision; see [`crate::Money::parse`] for arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationAmount {
    pub amount: String,
    pub currency: Currency,
}

impl OperationAmount {
    pub fn new(amount: &str, currency: Currency) -> Self {
        OperationAmount {
            amount: amount.to_string(),
            currency,
        }
    }
}

/// The canonical record every input shape is normalized into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<TransactionId>,
    pub state: String,
    pub date: String,
    #[serde(rename = "operationAmount")]
    pub amount: OperationAmount,
    pub description: String,
    pub from: String,
    pub to: String,
}

impl Default for Transaction {
    fn default() -> Self {
        Transaction {
            id: None,
            state: UNKNOWN_STATE.to_string(),
            date: String::new(),
            amount: OperationAmount::default(),
            description: String::new(),
            from: String::new(),
            to: String::new(),
        }
    }
}

impl Transaction {
    pub fn currency_code(&self) -> &str {
        &self.amount.currency.code
    }

    /// Value of a top-level field by its canonical name. `None` for unknown
    /// names and for an absent `id`.
    pub fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => self.id.as_ref().map(|id| id.to_string()),
            "state" => Some(self.state.clone()),
            "date" => Some(self.date.clone()),
            "description" => Some(self.description.clone()),
            "from" => Some(self.from.clone()),
            "to" => Some(self.to.clone()),
            _ => None,
        }
    }
}
