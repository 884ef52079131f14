use kassa_core::display::{format_amount, format_date};
use kassa_core::mask::mask_account_card;
use kassa_core::query::{
    count_by_category, count_by_currency, count_by_field, totals_by_currency,
};
use kassa_core::{Counts, MaskError, Money, Transaction};
use std::io::{self, Write};

const EMPTY_SELECTION: &str = "No transactions matched the selected filters.";
const HIDDEN: &str = "[hidden]";

fn masked(descriptor: &str) -> String {
    if descriptor.trim().is_empty() {
        return String::new();
    }
    match mask_account_card(descriptor) {
        Ok(masked) => masked,
        // No number to hide, e.g. a merchant name.
        Err(MaskError::MissingNumber(raw)) => raw,
        Err(_) => HIDDEN.to_string(),
    }
}

/// Three lines: date and description, parties, amount.
pub fn format_transaction(tx: &Transaction) -> String {
    let date = format_date(&tx.date).unwrap_or_else(|| tx.date.clone());
    let headline = format!("{date} {}", tx.description).trim().to_string();

    let to = masked(&tx.to);
    let parties = match masked(&tx.from) {
        from if from.is_empty() => to,
        from => format!("{from} -> {to}"),
    };

    format!(
        "{headline}\n{parties}\nAmount: {}",
        format_amount(&tx.amount)
    )
}

pub fn write_report<W: Write>(out: &mut W, transactions: &[Transaction]) -> io::Result<()> {
    if transactions.is_empty() {
        return writeln!(out, "{EMPTY_SELECTION}");
    }
    writeln!(out, "Transactions in selection: {}", transactions.len())?;
    for tx in transactions {
        writeln!(out)?;
        writeln!(out, "{}", format_transaction(tx))?;
    }
    Ok(())
}

fn write_counts<W: Write>(out: &mut W, title: &str, counts: &Counts) -> io::Result<()> {
    writeln!(out, "{title}:")?;
    if counts.is_empty() {
        return writeln!(out, "  (none)");
    }
    for (key, count) in counts.iter() {
        let key = if key.is_empty() { "(blank)" } else { key };
        writeln!(out, "  {key}: {count}")?;
    }
    Ok(())
}

pub fn write_summary<W: Write, S: AsRef<str>>(
    out: &mut W,
    transactions: &[Transaction],
    categories: &[S],
) -> io::Result<()> {
    writeln!(out)?;
    write_counts(out, "By status", &count_by_field(transactions, "state"))?;
    write_counts(out, "By currency", &count_by_currency(transactions))?;
    if !categories.is_empty() {
        write_counts(
            out,
            "By category",
            &count_by_category(transactions, categories),
        )?;
    }

    writeln!(out, "Totals:")?;
    let totals = totals_by_currency(transactions);
    if totals.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (code, total) in totals {
        writeln!(out, "  {code}: {total}")?;
    }

    if let Some((description, count)) =
        count_by_field(transactions, "description").most_common()
    {
        writeln!(out, "Most common description: {description} ({count})")?;
    }
    Ok(())
}

/// `skipped` is the number of transactions that could not be converted.
pub fn write_rub_total<W: Write>(out: &mut W, total: Money, skipped: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Total in RUB: {total}")?;
    if skipped > 0 {
        writeln!(out, "Not converted: {skipped}")?;
    }
    Ok(())
}
