//! Masking of card and account numbers for display.

use thiserror::Error;

const ACCOUNT_LABELS: &[&str] = &["счет", "счёт", "account"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    #[error("card number must be 16 digits: {0}")]
    InvalidCard(String),
    #[error("account number must have at least 4 digits: {0}")]
    InvalidAccount(String),
    #[error("expected a label followed by a number: {0}")]
    MissingNumber(String),
}

/// `7000792289606361` → `7000 79** **** 6361`. Spaces and dashes are ignored.
pub fn mask_card_number(card_number: &str) -> Result<String, MaskError> {
    let digits: String = card_number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(MaskError::InvalidCard(card_number.to_string()));
    }
    Ok(format!(
        "{} {}** **** {}",
        &digits[..4],
        &digits[4..6],
        &digits[12..]
    ))
}

/// `73654108430135874305` → `**4305`.
pub fn mask_account(account_number: &str) -> Result<String, MaskError> {
    let digits: String = account_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if digits.len() < 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(MaskError::InvalidAccount(account_number.to_string()));
    }
    Ok(format!("**{}", &digits[digits.len() - 4..]))
}

/// Masks the number at the end of a `from`/`to` descriptor such as
/// `Visa Platinum 7000 7922 8960 6361` or `Счет 73654108430135874305`.
pub fn mask_account_card(descriptor: &str) -> Result<String, MaskError> {
    let words: Vec<&str> = descriptor.split_whitespace().collect();
    let label_len = words
        .iter()
        .rposition(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .map_or(0, |i| i + 1);
    let (label, number) = words.split_at(label_len);
    if label.is_empty() || number.is_empty() {
        return Err(MaskError::MissingNumber(descriptor.to_string()));
    }

    let label = label.join(" ");
    let number = number.concat();
    let masked = if ACCOUNT_LABELS.contains(&label.to_lowercase().as_str()) {
        mask_account(&number)?
    } else {
        mask_card_number(&number)?
    };
    Ok(format!("{label} {masked}"))
}

/// Card numbers from `start` to `end` inclusive, zero-padded to 16 digits
/// and grouped by four. Nothing when `start > end`.
pub fn card_numbers(start: u64, end: u64) -> impl Iterator<Item = String> {
    (start..=end).map(|n| {
        let digits = format!("{n:016}");
        format!(
            "{} {} {} {}",
            &digits[..4],
            &digits[4..8],
            &digits[8..12],
            &digits[12..16]
        )
    })
}
