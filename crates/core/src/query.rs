//! Read-only queries over normalized transactions. Nothing here mutates its
//! input; filters keep the relative order of what they return.

use regex::RegexBuilder;
use serde::Serialize;

use crate::money::Money;
use crate::period::{transaction_date, DateRange};
use crate::transaction::Transaction;

pub const DEFAULT_STATE: &str = "EXECUTED";
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Occurrence counts keyed by value, in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Counts(Vec<(String, usize)>);

impl Counts {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, n)| (k.as_str(), *n))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest count; ties go to the value seen first.
    pub fn most_common(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (k, n) in self.iter() {
            if best.map_or(true, |(_, m)| n > m) {
                best = Some((k, n));
            }
        }
        best
    }

    fn increment(&mut self, key: &str) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, n)) => *n += 1,
            None => self.0.push((key.to_string(), 1)),
        }
    }
}

pub fn filter_by_state(transactions: &[Transaction], state: &str) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.state == state)
        .cloned()
        .collect()
}

/// Stable sort on the raw date text. ISO-8601 timestamps order correctly as
/// strings; anything else orders by its characters.
pub fn sort_by_date(transactions: &[Transaction], descending: bool) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    if descending {
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
    } else {
        sorted.sort_by(|a, b| a.date.cmp(&b.date));
    }
    sorted
}

pub fn filter_by_currency_code(transactions: &[Transaction], code: &str) -> Vec<Transaction> {
    if code.is_empty() {
        return Vec::new();
    }
    transactions
        .iter()
        .filter(|tx| tx.currency_code() == code)
        .cloned()
        .collect()
}

/// Case-insensitive literal substring search on the description. An empty
/// query finds nothing.
pub fn search_by_description(transactions: &[Transaction], query: &str) -> Vec<Transaction> {
    if query.is_empty() || transactions.is_empty() {
        return Vec::new();
    }
    let Ok(pattern) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };
    transactions
        .iter()
        .filter(|tx| pattern.is_match(&tx.description))
        .cloned()
        .collect()
}

pub fn filter_by_date_range(transactions: &[Transaction], range: DateRange) -> Vec<Transaction> {
    if range.is_empty() {
        return Vec::new();
    }
    transactions
        .iter()
        .filter(|tx| transaction_date(&tx.date).is_some_and(|d| range.contains(d)))
        .cloned()
        .collect()
}

pub fn count_by_field(transactions: &[Transaction], field: &str) -> Counts {
    let mut counts = Counts::default();
    for value in transactions.iter().filter_map(|tx| tx.field_value(field)) {
        counts.increment(&value);
    }
    counts
}

/// Transactions without a currency code are not counted.
pub fn count_by_currency(transactions: &[Transaction]) -> Counts {
    let mut counts = Counts::default();
    for tx in transactions.iter().filter(|tx| !tx.currency_code().is_empty()) {
        counts.increment(tx.currency_code());
    }
    counts
}

/// For each category, how many descriptions contain it (case-insensitive).
/// A description containing several categories counts toward each of them.
pub fn count_by_category<S: AsRef<str>>(transactions: &[Transaction], categories: &[S]) -> Counts {
    if transactions.is_empty() {
        return Counts::default();
    }
    let descriptions: Vec<String> = transactions
        .iter()
        .map(|tx| tx.description.to_lowercase())
        .collect();

    let mut counts = Counts::default();
    for category in categories {
        let category = category.as_ref();
        if counts.get(category).is_some() {
            continue;
        }
        let needle = category.to_lowercase();
        let n = descriptions.iter().filter(|d| d.contains(&needle)).count();
        counts.0.push((category.to_string(), n));
    }
    counts
}

/// Sum of parseable amounts per currency code, in order of first occurrence.
/// An amount that would overflow its currency's total is left out.
pub fn totals_by_currency(transactions: &[Transaction]) -> Vec<(String, Money)> {
    let mut totals: Vec<(String, Money)> = Vec::new();
    for tx in transactions {
        let Some(amount) = Money::parse(&tx.amount.amount) else {
            continue;
        };
        let code = tx.currency_code();
        match totals.iter_mut().find(|(c, _)| c == code) {
            Some((_, total)) => {
                if let Some(sum) = total.checked_add(amount) {
                    *total = sum;
                }
            }
            None => totals.push((code.to_string(), amount)),
        }
    }
    totals
}

pub fn descriptions(transactions: &[Transaction]) -> impl Iterator<Item = &str> {
    transactions.iter().map(|tx| tx.description.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{Currency, OperationAmount, TransactionId};
    use chrono::NaiveDate;

    fn tx(id: i64, state: &str, date: &str) -> Transaction {
        Transaction {
            id: Some(TransactionId::Int(id)),
            state: state.to_string(),
            date: date.to_string(),
            ..Transaction::default()
        }
    }

    fn priced(id: i64, description: &str, amount: &str, code: &str) -> Transaction {
        Transaction {
            id: Some(TransactionId::Int(id)),
            description: description.to_string(),
            amount: OperationAmount::new(amount, Currency::new(code, code)),
            ..Transaction::default()
        }
    }

    fn ids(txs: &[Transaction]) -> Vec<i64> {
        txs.iter()
            .map(|t| match t.id {
                Some(TransactionId::Int(n)) => n,
                _ => panic!("expected integer id"),
            })
            .collect()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(1, "EXECUTED", "2023-01-15T12:00:00.000000"),
            tx(2, "CANCELED", "2023-01-10T08:30:00.000000"),
            tx(3, "EXECUTED", "2023-01-20T18:45:00.000000"),
            tx(4, "PENDING", "2023-01-05T10:15:00.000000"),
            tx(5, "EXECUTED", "2023-01-25T09:00:00.000000"),
        ]
    }

    fn shop() -> Vec<Transaction> {
        vec![
            priced(1, "Перевод организации", "100.0", "RUB"),
            priced(2, "Покупка в магазине", "50.0", "USD"),
            priced(3, "Перевод со счета на счет", "200.0", "RUB"),
            priced(4, "Оплата услуг", "75.0", "EUR"),
        ]
    }

    // ── filter_by_state ───────────────────────────────────────────────────────

    #[test]
    fn filter_by_state_keeps_order() {
        assert_eq!(ids(&filter_by_state(&sample(), DEFAULT_STATE)), vec![1, 3, 5]);
        assert_eq!(ids(&filter_by_state(&sample(), "CANCELED")), vec![2]);
        assert_eq!(ids(&filter_by_state(&sample(), "PENDING")), vec![4]);
    }

    #[test]
    fn filter_by_state_unknown_or_empty() {
        assert!(filter_by_state(&sample(), "UNKNOWN").is_empty());
        assert!(filter_by_state(&sample(), "").is_empty());
        assert!(filter_by_state(&sample(), "executed").is_empty());
    }

    #[test]
    fn filter_by_state_matches_literal_unknown() {
        let txs = vec![Transaction::default(), tx(2, "EXECUTED", "")];
        assert_eq!(filter_by_state(&txs, "UNKNOWN").len(), 1);
    }

    // ── sort_by_date ──────────────────────────────────────────────────────────

    #[test]
    fn sort_by_date_both_directions() {
        assert_eq!(ids(&sort_by_date(&sample(), true)), vec![5, 3, 1, 2, 4]);
        assert_eq!(ids(&sort_by_date(&sample(), false)), vec![4, 2, 1, 3, 5]);
    }

    #[test]
    fn sort_by_date_is_stable() {
        let same = vec![
            tx(1, "EXECUTED", "2023-01-15T12:00:00.000000"),
            tx(2, "EXECUTED", "2023-01-15T12:00:00.000000"),
            tx(3, "EXECUTED", "2023-01-15T12:00:00.000000"),
        ];
        assert_eq!(ids(&sort_by_date(&same, true)), vec![1, 2, 3]);
        assert_eq!(ids(&sort_by_date(&same, false)), vec![1, 2, 3]);
    }

    #[test]
    fn sort_by_date_orders_malformed_dates_as_text() {
        let data = vec![
            tx(1, "EXECUTED", "2023-01-15"),
            tx(2, "EXECUTED", "invalid-date"),
            tx(3, "EXECUTED", "15-01-2023"),
        ];
        assert_eq!(ids(&sort_by_date(&data, true)), vec![2, 1, 3]);
    }

    #[test]
    fn sort_by_date_puts_missing_dates_first_ascending() {
        let data = vec![tx(1, "EXECUTED", "2023-01-15"), tx(2, "EXECUTED", "")];
        assert_eq!(ids(&sort_by_date(&data, false)), vec![2, 1]);
    }

    #[test]
    fn sort_by_date_leaves_input_untouched() {
        let data = sample();
        let _ = sort_by_date(&data, true);
        assert_eq!(ids(&data), vec![1, 2, 3, 4, 5]);
    }

    // ── filter_by_currency_code ───────────────────────────────────────────────

    #[test]
    fn filter_by_currency_code_rub_and_usd() {
        let rub = filter_by_currency_code(&shop(), DEFAULT_CURRENCY);
        assert_eq!(ids(&rub), vec![1, 3]);
        assert!(rub.iter().all(|t| t.currency_code() == "RUB"));
        assert_eq!(ids(&filter_by_currency_code(&shop(), "USD")), vec![2]);
        assert!(filter_by_currency_code(&shop(), "GBP").is_empty());
    }

    #[test]
    fn filter_by_currency_code_skips_records_without_amount() {
        let mut txs = shop();
        txs.push(Transaction {
            id: Some(TransactionId::Int(9)),
            ..Transaction::default()
        });
        assert_eq!(ids(&filter_by_currency_code(&txs, "USD")), vec![2]);
    }

    #[test]
    fn filter_by_currency_code_empty_code_matches_nothing() {
        let txs = vec![Transaction::default()];
        assert!(filter_by_currency_code(&txs, "").is_empty());
    }

    // ── search_by_description ─────────────────────────────────────────────────

    #[test]
    fn search_basic_and_case_insensitive() {
        assert_eq!(ids(&search_by_description(&shop(), "Перевод")), vec![1, 3]);
        assert_eq!(ids(&search_by_description(&shop(), "пЕрЕвОд")), vec![1, 3]);
        assert!(search_by_description(&shop(), "НесуществующееОписание").is_empty());
    }

    #[test]
    fn search_empty_query_or_input_finds_nothing() {
        assert!(search_by_description(&shop(), "").is_empty());
        assert!(search_by_description(&[], "Перевод").is_empty());
    }

    #[test]
    fn search_treats_metacharacters_literally() {
        let txs = vec![
            priced(1, "Оплата (кафе)", "1", "RUB"),
            priced(2, "Оплата кафе", "1", "RUB"),
            priced(3, "a.b", "1", "RUB"),
            priced(4, "axb", "1", "RUB"),
        ];
        assert_eq!(ids(&search_by_description(&txs, "(кафе)")), vec![1]);
        assert_eq!(ids(&search_by_description(&txs, "a.b")), vec![3]);
        assert!(search_by_description(&txs, ".*").is_empty());
    }

    // ── filter_by_date_range ──────────────────────────────────────────────────

    #[test]
    fn filter_by_date_range_inclusive() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 20).unwrap(),
        );
        assert_eq!(ids(&filter_by_date_range(&sample(), range)), vec![1, 2, 3]);
    }

    #[test]
    fn filter_by_date_range_inverted_or_unparseable() {
        let inverted = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 20).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
        );
        assert!(filter_by_date_range(&sample(), inverted).is_empty());

        let all = DateRange::new(
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2100, 1, 1).unwrap(),
        );
        let odd = vec![tx(1, "EXECUTED", "invalid-date"), tx(2, "EXECUTED", "")];
        assert!(filter_by_date_range(&odd, all).is_empty());
    }

    // ── counting ──────────────────────────────────────────────────────────────

    #[test]
    fn count_by_field_in_first_seen_order() {
        let counts = count_by_field(&sample(), "state");
        let pairs: Vec<_> = counts.iter().collect();
        assert_eq!(pairs, vec![("EXECUTED", 3), ("CANCELED", 1), ("PENDING", 1)]);
        assert_eq!(counts.most_common(), Some(("EXECUTED", 3)));
    }

    #[test]
    fn count_by_field_skips_absent_and_unknown() {
        let txs = vec![Transaction::default(), tx(1, "EXECUTED", "")];
        assert_eq!(count_by_field(&txs, "id").len(), 1);
        assert!(count_by_field(&txs, "no_such_field").is_empty());
    }

    #[test]
    fn most_common_tie_goes_to_first_seen() {
        let txs = vec![tx(1, "PENDING", ""), tx(2, "EXECUTED", "")];
        assert_eq!(count_by_field(&txs, "state").most_common(), Some(("PENDING", 1)));
        assert_eq!(Counts::default().most_common(), None);
    }

    #[test]
    fn count_by_currency_reads_nested_code() {
        let counts = count_by_currency(&shop());
        assert_eq!(counts.get("RUB"), Some(2));
        assert_eq!(counts.get("USD"), Some(1));
        assert_eq!(counts.get("EUR"), Some(1));
        assert_eq!(counts.get("GBP"), None);
    }

    #[test]
    fn count_by_currency_skips_records_without_currency() {
        let counts = count_by_currency(&[Transaction::default()]);
        assert!(counts.is_empty());
        assert_eq!(counts.get(""), None);
    }

    #[test]
    fn count_by_category_basic() {
        let counts = count_by_category(&shop(), &["Перевод", "Покупка", "Оплата"]);
        assert_eq!(counts.get("Перевод"), Some(2));
        assert_eq!(counts.get("Покупка"), Some(1));
        assert_eq!(counts.get("Оплата"), Some(1));
    }

    #[test]
    fn count_by_category_keeps_caller_casing() {
        let counts = count_by_category(&shop(), &["перевод", "покупка"]);
        assert_eq!(counts.get("перевод"), Some(2));
        assert_eq!(counts.get("покупка"), Some(1));
        assert_eq!(counts.get("Перевод"), None);
    }

    #[test]
    fn count_by_category_counts_overlaps_in_each() {
        let txs = vec![priced(1, "Перевод организации", "1", "RUB")];
        let counts = count_by_category(&txs, &["Перевод", "организации"]);
        assert_eq!(counts.get("Перевод"), Some(1));
        assert_eq!(counts.get("организации"), Some(1));
    }

    #[test]
    fn count_by_category_zero_and_empty_inputs() {
        let counts = count_by_category(&shop(), &["НесуществующаяКатегория"]);
        assert_eq!(counts.get("НесуществующаяКатегория"), Some(0));
        assert!(count_by_category(&[], &["Перевод"]).is_empty());
        assert!(count_by_category::<&str>(&shop(), &[]).is_empty());
    }

    #[test]
    fn totals_by_currency_sums_parseable_amounts() {
        let mut txs = shop();
        txs.push(priced(5, "broken", "n/a", "RUB"));
        let totals = totals_by_currency(&txs);
        let rendered: Vec<_> = totals
            .iter()
            .map(|(code, total)| format!("{code} {total}"))
            .collect();
        assert_eq!(rendered, vec!["RUB 300.00", "USD 50.00", "EUR 75.00"]);
    }

    #[test]
    fn totals_by_currency_leaves_out_overflowing_amount() {
        let huge = priced(1, "huge", "79228162514264337593543950335", "RUB");
        let totals = totals_by_currency(&[huge.clone(), huge]);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].0, "RUB");
        assert_eq!(totals[0].1, Money::parse("79228162514264337593543950335").unwrap());
    }

    #[test]
    fn descriptions_in_order() {
        let shop = shop();
        let all: Vec<_> = descriptions(&shop).collect();
        assert_eq!(all[0], "Перевод организации");
        assert_eq!(all.len(), 4);
    }
}
