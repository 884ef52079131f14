//! Conversion of loosely-typed source records into [`Transaction`]s.
//!
//! Every canonical field is resolved from an ordered list of candidate keys;
//! the canonical key always comes first, so aliases only fill gaps. `null`
//! counts as absent. A record that cannot be converted is dropped and
//! reported to the caller's [`Diagnostics`] sink; the rest of the batch is
//! still returned.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::transaction::{Currency, OperationAmount, Transaction, TransactionId, UNKNOWN_STATE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("record is a {0}, not an object")]
    NotAnObject(&'static str),
    #[error("field `{0}` holds a structured value where text is expected")]
    NotText(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub error: NormalizeError,
}

/// Receives the records dropped during normalization.
pub trait Diagnostics {
    fn skipped(&mut self, index: usize, error: &NormalizeError);
}

impl Diagnostics for () {
    fn skipped(&mut self, _index: usize, _error: &NormalizeError) {}
}

impl Diagnostics for Vec<SkippedRecord> {
    fn skipped(&mut self, index: usize, error: &NormalizeError) {
        self.push(SkippedRecord {
            index,
            error: error.clone(),
        });
    }
}

struct TextField {
    keys: &'static [&'static str],
    default: &'static str,
}

const ID_KEYS: &[&str] = &["id", "transaction_id"];

const STATE: TextField = TextField {
    keys: &["state", "status"],
    default: UNKNOWN_STATE,
};
const DATE: TextField = TextField {
    keys: &["date", "transaction_date"],
    default: "",
};
const DESCRIPTION: TextField = TextField {
    keys: &["description"],
    default: "",
};
const FROM: TextField = TextField {
    keys: &["from"],
    default: "",
};
const TO: TextField = TextField {
    keys: &["to"],
    default: "",
};

const NESTED_AMOUNT_KEYS: &[&str] = &["operationAmount", "amount"];
/// Inner keys accepted for the value of a nested amount, in priority order.
const NESTED_VALUE_KEYS: &[&str] = &["amount", "value"];
const FLAT_AMOUNT_KEYS: &[&str] = &["amount"];
const CURRENCY_CODE_KEYS: &[&str] = &["currency_code", "currency"];
const CURRENCY_NAME_KEYS: &[&str] = &["currency_name", "currency"];

impl TextField {
    fn resolve(&self, record: &Map<String, Value>) -> Result<String, NormalizeError> {
        match lookup(record, self.keys) {
            Some((key, value)) => text(key, value),
            None => Ok(self.default.to_string()),
        }
    }
}

pub fn normalize(records: &[Value]) -> Vec<Transaction> {
    normalize_with(records, &mut ())
}

pub fn normalize_with<D>(records: &[Value], diagnostics: &mut D) -> Vec<Transaction>
where
    D: Diagnostics + ?Sized,
{
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match normalize_record(record) {
            Ok(tx) => Some(tx),
            Err(e) => {
                diagnostics.skipped(index, &e);
                None
            }
        })
        .collect()
}

pub fn normalize_record(record: &Value) -> Result<Transaction, NormalizeError> {
    let Value::Object(record) = record else {
        return Err(NormalizeError::NotAnObject(kind(record)));
    };

    Ok(Transaction {
        id: resolve_id(record)?,
        state: STATE.resolve(record)?,
        date: DATE.resolve(record)?,
        amount: resolve_amount(record)?,
        description: DESCRIPTION.resolve(record)?,
        from: FROM.resolve(record)?,
        to: TO.resolve(record)?,
    })
}

fn lookup<'r, 'k>(
    record: &'r Map<String, Value>,
    keys: &[&'k str],
) -> Option<(&'k str, &'r Value)> {
    keys.iter().find_map(|key| match record.get(*key) {
        None | Some(Value::Null) => None,
        Some(value) => Some((*key, value)),
    })
}

fn text(field: &str, value: &Value) -> Result<String, NormalizeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(NormalizeError::NotText(field.to_string())),
    }
}

fn resolve_id(record: &Map<String, Value>) -> Result<Option<TransactionId>, NormalizeError> {
    let Some((key, value)) = lookup(record, ID_KEYS) else {
        return Ok(None);
    };
    match value {
        Value::Number(n) => Ok(Some(number_id(n))),
        other => text(key, other).map(|s| Some(TransactionId::Text(s))),
    }
}

// Spreadsheet exports turn integer ids into floats (`7.0`).
fn number_id(n: &Number) -> TransactionId {
    if let Some(i) = n.as_i64() {
        return TransactionId::Int(i);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => TransactionId::Int(f as i64),
        _ => TransactionId::Text(n.to_string()),
    }
}

fn resolve_amount(record: &Map<String, Value>) -> Result<OperationAmount, NormalizeError> {
    for inner_key in NESTED_VALUE_KEYS {
        for outer_key in NESTED_AMOUNT_KEYS {
            let Some(Value::Object(nested)) = record.get(*outer_key) else {
                continue;
            };
            let Some((_, amount)) = lookup(nested, &[*inner_key]) else {
                continue;
            };
            let amount = text(outer_key, amount)?;
            let currency = match nested.get("currency") {
                Some(value) if !value.is_null() => currency_from(outer_key, value)?,
                _ => flat_currency(record)?,
            };
            return Ok(OperationAmount { amount, currency });
        }
    }

    match lookup(record, FLAT_AMOUNT_KEYS) {
        Some((key, value)) if !value.is_object() => Ok(OperationAmount {
            amount: text(key, value)?,
            currency: flat_currency(record)?,
        }),
        _ => Ok(OperationAmount::default()),
    }
}

fn currency_from(field: &str, value: &Value) -> Result<Currency, NormalizeError> {
    match value {
        Value::Object(currency) => Ok(Currency {
            code: optional_text(currency, "code", field)?,
            name: optional_text(currency, "name", field)?,
        }),
        other => {
            let code = text(field, other)?;
            Ok(Currency {
                name: code.clone(),
                code,
            })
        }
    }
}

fn flat_currency(record: &Map<String, Value>) -> Result<Currency, NormalizeError> {
    if let Some(value @ Value::Object(_)) = record.get("currency") {
        return currency_from("currency", value);
    }
    Ok(Currency {
        code: first_text(record, CURRENCY_CODE_KEYS)?,
        name: first_text(record, CURRENCY_NAME_KEYS)?,
    })
}

fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Result<String, NormalizeError> {
    Ok(lookup(record, keys)
        .map(|(key, value)| text(key, value))
        .transpose()?
        .unwrap_or_default())
}

fn optional_text(
    record: &Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<String, NormalizeError> {
    match record.get(key) {
        Some(value) => text(field, value),
        None => Ok(String::new()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
