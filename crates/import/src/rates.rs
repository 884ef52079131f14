use kassa_core::{Money, Transaction};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.apilayer.com/exchangerates_data/latest";
pub const TARGET_CURRENCY: &str = "RUB";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum RateError {
    #[error("exchange rate API key is not configured")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate service answered with status {0}")]
    Status(u16),
    #[error("rate service response has no usable {0} rate")]
    MissingRate(&'static str),
}

/// Looks up exchange rates into roubles.
pub struct RateClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RateClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, RateError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub async fn rate_to_rub(&self, code: &str) -> Result<Decimal, RateError> {
        let api_key = self.api_key.as_deref().ok_or(RateError::MissingApiKey)?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("base", code), ("symbols", TARGET_CURRENCY)])
            .header("apikey", api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        body.get("rates")
            .and_then(|rates| rates.get(TARGET_CURRENCY))
            .and_then(parse_rate)
            .ok_or(RateError::MissingRate(TARGET_CURRENCY))
    }

    /// Transaction amount in roubles. Rouble amounts are returned without a
    /// lookup; any failure is logged and yields `None`.
    pub async fn convert_to_rub(&self, tx: &Transaction) -> Option<Money> {
        let code = tx.currency_code();
        if code.is_empty() {
            return None;
        }
        let Some(amount) = Money::parse(&tx.amount.amount) else {
            tracing::warn!(amount = %tx.amount.amount, "amount is not a number, skipping conversion");
            return None;
        };
        if code == TARGET_CURRENCY {
            return Some(amount);
        }

        match self.rate_to_rub(code).await {
            Ok(rate) => {
                let converted = amount.checked_mul(rate);
                if converted.is_none() {
                    tracing::warn!(currency = code, %rate, "converted amount is out of range");
                }
                converted
            }
            Err(e) => {
                tracing::warn!(currency = code, error = %e, "currency conversion failed");
                None
            }
        }
    }
}

fn parse_rate(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
