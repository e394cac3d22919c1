use crate::domain::wallet::{
    Transaction, TransactionKind, TransactionReport, TransactionStatus, WalletBalance,
};
use crate::interfaces::response::balance;
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal_macros::dec;
use serde_json::Value;

/// The transaction-history shapes the provider has been seen to emit. Each
/// variant has its own extractor; adding a shape means adding a variant, not
/// widening an existing regex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// A JSON array (or object wrapping one) instead of prose.
    Structured,
    /// A markdown pipe table, usually inside a sectioned document.
    Table,
    /// Numbered narrative lines like `1. Payment to john: -TSD 1.00`.
    Narrative,
}

static NARRATIVE_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:payment\s+to|transfer\s+to|deposit)\b").unwrap());

static NARRATIVE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:\d+\.\s*)?(payment|transfer)\s+to\s+(.+?)\s*:\s*-?\s*(?:TSD\s*)?([0-9][0-9,]*(?:\.[0-9]+)?)",
    )
    .unwrap()
});

static DEPOSIT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:\d+\.\s*)?deposit(?:\s+from\s+(.+?))?\s*:?\s*\+?\s*(?:TSD\s*)?([0-9][0-9,]*(?:\.[0-9]+)?)",
    )
    .unwrap()
});

static SECTION_WALLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)wallet\s+financial\s+summary").unwrap());
static SECTION_SUMMARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)transaction\s+(?:overview|details)").unwrap());
static SECTION_LOG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)detailed\s+transaction\s+log").unwrap());
static SECTION_PAYEES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)payee\s+list").unwrap());

static WALLET_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)wallet\s+id\s*:\s*([\w-]+)").unwrap());
static PAYTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)paytag\s*:\s*([\w./]+)").unwrap());
static CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bcurrency\s*:\s*([A-Za-z]+)").unwrap());
static TOTAL_TXNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)total\s+transactions\s*:").unwrap());
static TOTAL_DEBITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)total\s+debit(?:\s+amount|s)?\s*:").unwrap());

static PAYMENT_TO_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^payment\s+to\s+").unwrap());

/// Decides which extractor a history document belongs to. `None` means the
/// text carries no recognizable transaction shape at all.
pub fn detect(content: &str) -> Option<ReportFormat> {
    let trimmed = content.trim_start();
    if (trimmed.starts_with('[') || trimmed.starts_with('{'))
        && serde_json::from_str::<Value>(content).is_ok()
    {
        return Some(ReportFormat::Structured);
    }
    if content
        .lines()
        .any(|line| line.trim_start().starts_with('|') || line.contains("|--"))
    {
        return Some(ReportFormat::Table);
    }
    if NARRATIVE_HINT.is_match(content) {
        return Some(ReportFormat::Narrative);
    }
    None
}

/// Parses one history response into a report, dispatching on the detected
/// shape. Unmatched lines are silently skipped; an unrecognizable document
/// yields an empty report (the fallback decision belongs to the caller).
pub fn parse_report(content: &str) -> TransactionReport {
    let mut report = match detect(content) {
        Some(ReportFormat::Structured) => parse_structured(content),
        Some(ReportFormat::Narrative) => parse_narrative(content),
        Some(ReportFormat::Table) | None => parse_document(content),
    };
    report.recompute_summary();
    report
}

/// Walks a sectioned document: balance labels, overview figures, wallet
/// identity lines and the markdown table, stopping at a trailing payee list.
fn parse_document(content: &str) -> TransactionReport {
    let mut report = TransactionReport::default();
    if let Some(found) = balance::parse(content) {
        report.balance = found;
    }

    let mut table = TableParser::default();
    for line in content.lines() {
        if SECTION_PAYEES.is_match(line) {
            break;
        }
        if SECTION_WALLET.is_match(line) || SECTION_SUMMARY.is_match(line) || SECTION_LOG.is_match(line) {
            continue;
        }
        if let Some(id) = capture(&WALLET_ID, line) {
            report.wallet.wallet_id = Some(id);
        } else if let Some(tag) = capture(&PAYTAG, line) {
            report.wallet.paytag = Some(tag);
        } else if let Some(currency) = capture(&CURRENCY, line) {
            report.wallet.currency = currency.to_uppercase();
        } else if let Some(count) = balance::number_after(&TOTAL_TXNS, line) {
            report.summary.total_transactions = count.to_usize().unwrap_or(0);
        } else if let Some(total) = balance::number_after(&TOTAL_DEBITS, line) {
            report.summary.total_debit_amount = total;
        } else if line.contains('|') {
            table.feed(line, &mut report.transactions);
        }
    }

    report
}

fn capture(pattern: &Regex, line: &str) -> Option<String> {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Incremental markdown-table reader: remembers the header row, skips the
/// `|---|` separator, and column-maps data rows by header keyword with a
/// positional fallback when the table came without headers.
#[derive(Default)]
struct TableParser {
    headers: Vec<String>,
    active: bool,
    rows: usize,
}

impl TableParser {
    fn feed(&mut self, line: &str, out: &mut Vec<Transaction>) {
        if line.contains("|--") {
            self.active = true;
            return;
        }

        let lower = line.to_lowercase();
        if self.headers.is_empty()
            && (lower.contains("transaction") || lower.contains("date") || lower.contains("amount"))
        {
            self.headers = split_row(line)
                .into_iter()
                .map(|cell| cell.to_lowercase())
                .collect();
            self.active = true;
            return;
        }

        if self.active && line.trim_start().starts_with('|') {
            let columns = split_row(line);
            if columns.len() >= 3
                && let Some(tx) = self.row_transaction(&columns)
            {
                out.push(tx);
            }
        }
    }

    fn row_transaction(&mut self, columns: &[String]) -> Option<Transaction> {
        let mut draft = RowDraft::default();
        if self.headers.is_empty() {
            // Positional layout: Date | Recipient | Amount | Type | Status | Created By
            let mut cells = columns.iter();
            draft.date = cells.next().cloned().unwrap_or_default();
            draft.recipient = cells.next().cloned().unwrap_or_default();
            draft.amount = cells.next().cloned().unwrap_or_default();
            draft.kind = cells.next().cloned().unwrap_or_default();
            draft.status = cells.next().cloned().unwrap_or_default();
            draft.reference = cells.next().cloned().unwrap_or_default();
        } else {
            for (index, value) in columns.iter().enumerate() {
                let header = self.headers.get(index).map(String::as_str).unwrap_or("");
                draft.assign(header, value);
            }
        }

        let amount = balance::first_number(&draft.amount)?;
        let date = parse_date(&draft.date).unwrap_or_else(today);
        let kind_cell = draft.kind.to_uppercase();
        let kind = if kind_cell.contains("CREDIT") || kind_cell.contains("TRANSFER") {
            TransactionKind::Credit
        } else {
            TransactionKind::Debit
        };

        self.rows += 1;
        let id = if draft.id.is_empty() {
            format!("tx-{date}-{}", self.rows)
        } else {
            draft.id
        };
        let description = if draft.recipient.is_empty() {
            "Unknown transaction".to_string()
        } else {
            draft.recipient.clone()
        };
        let recipient = PAYMENT_TO_PREFIX.replace(&draft.recipient, "").into_owned();

        Some(Transaction {
            id,
            kind,
            amount,
            description,
            date,
            status: TransactionStatus::from_cell(&draft.status),
            recipient,
            reference: (!draft.reference.is_empty()).then_some(draft.reference),
        })
    }
}

#[derive(Default)]
struct RowDraft {
    id: String,
    recipient: String,
    amount: String,
    date: String,
    kind: String,
    status: String,
    reference: String,
}

impl RowDraft {
    fn assign(&mut self, header: &str, value: &str) {
        if header.contains("transaction id") || header.contains("id") {
            self.id = value.to_string();
        } else if header.contains("recipient") || header.contains("description") {
            self.recipient = value.to_string();
        } else if header.contains("amount") {
            self.amount = value.to_string();
        } else if header.contains("date") {
            self.date = value.to_string();
        } else if header.contains("type") {
            self.kind = value.to_string();
        } else if header.contains("status") {
            self.status = value.to_string();
        } else if header.contains("created by") {
            self.reference = value.to_string();
        }
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Narrative lines carry no dates; rows are stamped with today, matching what
/// the provider's prose describes ("recent activity").
fn parse_narrative(content: &str) -> TransactionReport {
    let mut report = TransactionReport::default();
    if let Some(found) = balance::parse(content) {
        report.balance = found;
    }

    let date = today();
    for line in content.lines() {
        let index = report.transactions.len() + 1;
        if let Some(caps) = NARRATIVE_LINE.captures(line) {
            let verb = match caps[1].to_lowercase().as_str() {
                "transfer" => "Transfer",
                _ => "Payment",
            };
            let recipient = caps[2].trim().to_string();
            let Some(amount) = balance::first_number(&caps[3]) else {
                continue;
            };
            report.transactions.push(Transaction {
                id: format!("tx-{date}-{index}"),
                kind: TransactionKind::Debit,
                amount,
                description: format!("{verb} to {recipient}"),
                date,
                status: TransactionStatus::Completed,
                recipient,
                reference: None,
            });
        } else if let Some(caps) = DEPOSIT_LINE.captures(line) {
            let source = caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| "wallet".to_string());
            let Some(amount) = balance::first_number(&caps[2]) else {
                continue;
            };
            report.transactions.push(Transaction {
                id: format!("tx-{date}-{index}"),
                kind: TransactionKind::Credit,
                amount,
                description: format!("Deposit from {source}"),
                date,
                status: TransactionStatus::Completed,
                recipient: source,
                reference: None,
            });
        }
    }

    report
}

/// Maps a JSON array (or `{"transactions": [...], "balance": {...}}` object)
/// field-wise with loose key matching across the spellings the provider has
/// used.
fn parse_structured(content: &str) -> TransactionReport {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return TransactionReport::default();
    };

    let empty = Vec::new();
    let items: &Vec<Value> = match &value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("transactions")
            .and_then(Value::as_array)
            .unwrap_or(&empty),
        _ => &empty,
    };

    let mut report = TransactionReport::default();
    for (index, item) in items.iter().enumerate() {
        if let Some(tx) = structured_transaction(item, index + 1) {
            report.transactions.push(tx);
        }
    }

    if let Value::Object(map) = &value
        && let Some(Value::Object(bal)) = map.get("balance")
    {
        report.balance = WalletBalance {
            total: decimal_field(bal, &["total", "total_balance", "totalBalance"])
                .unwrap_or_default(),
            spendable: decimal_field(bal, &["spendable", "spendable_balance", "spendableBalance"])
                .unwrap_or_default(),
            pending: decimal_field(bal, &["pending", "pending_balance", "pendingBalance"])
                .unwrap_or_default(),
        };
    }

    report
}

fn structured_transaction(item: &Value, index: usize) -> Option<Transaction> {
    let obj = item.as_object()?;
    let amount = decimal_field(obj, &["amount"])?;
    let date = string_field(obj, &["date", "created_at", "createdAt"])
        .and_then(|s| parse_date(&s))
        .unwrap_or_else(today);
    let kind = match string_field(obj, &["type", "kind"]) {
        Some(kind) if kind.to_uppercase().contains("CREDIT") => TransactionKind::Credit,
        _ => TransactionKind::Debit,
    };
    let recipient = string_field(obj, &["recipient", "payee", "counterparty"]).unwrap_or_default();
    let description = string_field(obj, &["description", "memo"]).unwrap_or_else(|| {
        if recipient.is_empty() {
            "Unknown transaction".to_string()
        } else {
            format!("Payment to {recipient}")
        }
    });

    Some(Transaction {
        id: string_field(obj, &["id", "transaction_id", "transactionId"])
            .unwrap_or_else(|| format!("tx-{date}-{index}")),
        kind,
        amount,
        description,
        date,
        status: string_field(obj, &["status"])
            .map(|s| TransactionStatus::from_cell(&s))
            .unwrap_or_default(),
        recipient,
        reference: string_field(obj, &["reference", "created_by", "createdBy"]),
    })
}

fn string_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn decimal_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|key| obj.get(*key)).and_then(|value| match value {
        Value::Number(n) => n.as_f64().and_then(Decimal::from_f64),
        Value::String(s) => balance::first_number(s),
        _ => None,
    })
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Some(date);
        }
    }
    None
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The fixed demo history served when a document yields no transactions,
/// dated relative to today so the listing always looks recent.
pub fn demo_report() -> TransactionReport {
    let demo = |id: &str, amount: Decimal, recipient: &str, days_ago: i64, reference: &str| {
        Transaction {
            id: id.to_string(),
            kind: TransactionKind::Debit,
            amount,
            description: format!("Payment to {recipient}"),
            date: today() - chrono::Duration::days(days_ago),
            status: TransactionStatus::Completed,
            recipient: recipient.to_string(),
            reference: Some(reference.to_string()),
        }
    };

    let mut report = TransactionReport {
        transactions: vec![
            demo("tx-001", dec!(1.00), "john", 1, "expenzse"),
            demo("tx-002", dec!(10.00), "sahaj jain", 2, "expenzse"),
            demo("tx-003", dec!(11.00), "kartik design", 3, "expenzse"),
            demo("tx-004", dec!(7.00), "ritik jain", 3, "expenzse"),
            demo("tx-005", dec!(2.00), "TSD Wallet 1", 3, "expenzse"),
            demo("tx-006", dec!(0.01), "Fees and taxes", 4, "government"),
            demo("tx-007", dec!(5.00), "ram", 5, "government"),
            demo("tx-008", dec!(11.00), "mahaveer", 6, "government"),
            demo("tx-009", dec!(10.00), "Rathore", 7, "government"),
            demo("tx-010", dec!(1.00), "Jain", 8, "government"),
        ],
        balance: balance::demo_balance(),
        ..Default::default()
    };
    report.recompute_summary();
    report
}
