use crate::domain::wallet::WalletBalance;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

// "Balance" is optional so terse provider replies like "Spendable: 12.5"
// still match, but a colon must follow directly: overview labels such as
// "Total Transactions:" or "Total Debit Amount:" must not.
static TOTAL_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btotal(?:\s+wallet)?(?:\s+balance)?\s*:").unwrap());
static SPENDABLE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bspendable(?:\s+balance)?\s*:").unwrap());
static PENDING_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bpending(?:\s+balance)?\s*:").unwrap());

/// First numeric token, thousands separators allowed.
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?").unwrap());

/// Scans labeled lines for the three balance figures. Returns `None` when no
/// label matched at all, so the caller can tell "no balance in this text"
/// apart from a genuine zero balance.
pub fn parse(content: &str) -> Option<WalletBalance> {
    let mut balance = WalletBalance::default();
    let mut found = false;

    for line in content.lines() {
        if let Some(value) = number_after(&TOTAL_LABEL, line) {
            balance.total = value;
            found = true;
        } else if let Some(value) = number_after(&SPENDABLE_LABEL, line) {
            balance.spendable = value;
            found = true;
        } else if let Some(value) = number_after(&PENDING_LABEL, line) {
            balance.pending = value;
            found = true;
        }
    }

    found.then_some(balance)
}

/// First number following the label match, commas stripped. Searching after
/// the label keeps wallet numbers in lines like "Wallet 3 Total Balance: 500"
/// from being read as the amount.
pub(super) fn number_after(label: &Regex, line: &str) -> Option<Decimal> {
    let m = label.find(line)?;
    first_number(&line[m.end()..])
}

pub(super) fn first_number(text: &str) -> Option<Decimal> {
    let m = NUMBER.find(text)?;
    Decimal::from_str(&m.as_str().replace(',', "")).ok()
}

/// The fixed demo balance served when no labeled line was found.
pub fn demo_balance() -> WalletBalance {
    WalletBalance {
        total: dec!(843.84),
        spendable: dec!(843.84),
        pending: Decimal::ZERO,
    }
}
