use crate::period::transaction_date;
use crate::transaction::OperationAmount;

/// `2024-03-11T02:26:18.671407` → `11.03.2024`.
pub fn format_date(raw: &str) -> Option<String> {
    transaction_date(raw).map(|d| d.format("%d.%m.%Y").to_string())
}

/// `100.0 руб. (RUB)`, or `100.0 USD` when the name adds nothing.
pub fn format_amount(amount: &OperationAmount) -> String {
    let currency = &amount.currency;
    if currency.name.is_empty() || currency.name == currency.code {
        format!("{} {}", amount.amount, currency.code)
            .trim_end()
            .to_string()
    } else {
        format!("{} {} ({})", amount.amount, currency.name, currency.code)
    }
}
