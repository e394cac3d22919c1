//! Turns the payment provider's prose and table replies into typed records.
//!
//! The provider answers natural-language commands with human-readable text,
//! so each record kind has a scraper over the known response shapes.
//! Extraction never fails: when a document yields zero records, a fixed demo
//! dataset is served instead, and the provenance is reported so callers and
//! tests can tell the two apart.

pub mod balance;
pub mod payees;
pub mod transactions;

use crate::domain::payee::Payee;
use crate::domain::ports::ProviderResponse;
use crate::domain::wallet::{TransactionReport, WalletBalance};
use serde::Serialize;

/// Where a set of records came from.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Parsed,
    Fallback,
}

/// Records plus their provenance. Fallback data is real, renderable data;
/// the marker exists so nothing downstream mistakes it for live figures.
#[derive(Debug, Clone)]
pub struct Extracted<T> {
    pub records: T,
    pub source: Source,
}

impl<T> Extracted<T> {
    pub fn parsed(records: T) -> Self {
        Self {
            records,
            source: Source::Parsed,
        }
    }

    pub fn fallback(records: T) -> Self {
        Self {
            records,
            source: Source::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }
}

/// The document to parse, if the provider completed the command and returned
/// an artifact carrying one.
fn usable_body(response: &ProviderResponse) -> Option<&str> {
    if !response.is_usable() {
        return None;
    }
    response.first_artifact_body()
}

pub fn extract_payees(response: &ProviderResponse) -> Extracted<Vec<Payee>> {
    let parsed = usable_body(response).map(payees::parse).unwrap_or_default();
    if parsed.is_empty() {
        Extracted::fallback(payees::demo_payees())
    } else {
        Extracted::parsed(parsed)
    }
}

pub fn extract_balance(response: &ProviderResponse) -> Extracted<WalletBalance> {
    match usable_body(response).and_then(balance::parse) {
        Some(found) => Extracted::parsed(found),
        None => Extracted::fallback(balance::demo_balance()),
    }
}

pub fn extract_report(response: &ProviderResponse) -> Extracted<TransactionReport> {
    let report = usable_body(response).map(transactions::parse_report);
    match report {
        Some(report) if !report.transactions.is_empty() => Extracted::parsed(report),
        _ => Extracted::fallback(transactions::demo_report()),
    }
}
