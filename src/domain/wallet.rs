use crate::error::PortalError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a positive monetary amount in the provider's virtual currency.
///
/// Ensures that payment and scholarship amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PortalError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PortalError::Validation(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PortalError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Debit,
    Credit,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    /// Reads a status out of a free-text table cell. Anything the provider
    /// labels neither pending nor failed counts as completed.
    pub fn from_cell(cell: &str) -> Self {
        let lower = cell.to_lowercase();
        if lower.contains("pending") {
            TransactionStatus::Pending
        } else if lower.contains("fail") {
            TransactionStatus::Failed
        } else {
            TransactionStatus::Completed
        }
    }
}

/// A single wallet movement as reported by the payment provider.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub status: TransactionStatus,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Wallet balances in the provider's virtual currency (TSD).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub struct WalletBalance {
    pub total: Decimal,
    pub spendable: Decimal,
    pub pending: Decimal,
}

/// Identity of the wallet a history document describes, when the provider
/// includes it in the summary section.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct WalletDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paytag: Option<String>,
    pub currency: String,
}

impl Default for WalletDetails {
    fn default() -> Self {
        Self {
            wallet_id: None,
            paytag: None,
            currency: "TSD".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct TransactionSummary {
    pub total_transactions: usize,
    pub total_debit_transactions: usize,
    pub total_debit_amount: Decimal,
}

/// Everything one transaction-history document yields: the movements, the
/// balances, the overview figures and the wallet identity.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct TransactionReport {
    pub transactions: Vec<Transaction>,
    pub balance: WalletBalance,
    pub summary: TransactionSummary,
    pub wallet: WalletDetails,
}

impl TransactionReport {
    /// Fills overview figures the provider left out from the parsed rows.
    /// Debit counts are always recomputed; totals only when missing.
    pub fn recompute_summary(&mut self) {
        let debits: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Debit)
            .collect();

        if self.summary.total_transactions == 0 {
            self.summary.total_transactions = self.transactions.len();
        }
        self.summary.total_debit_transactions = debits.len();
        if self.summary.total_debit_amount.is_zero() {
            self.summary.total_debit_amount = debits.iter().map(|tx| tx.amount).sum();
        }
    }
}
