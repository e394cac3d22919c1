use crate::domain::payee::{Payee, PayeeStatus};
use once_cell::sync::Lazy;
use regex::Regex;

/// Numbered listing line: `N. primary [(detail)] [- suffix]`.
static PAYEE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\.\s*(.+?)(?:\s+\((.+?)\))?(?:\s*-\s*(.+?))?\s*$").unwrap());

/// Extracts payees from a numbered provider listing. Lines that do not match
/// the pattern are silently skipped; order of appearance is preserved and no
/// deduplication happens.
pub fn parse(content: &str) -> Vec<Payee> {
    content.lines().filter_map(parse_line).collect()
}

/// The primary token is whichever of name or email the provider led with:
/// an email primary gets a display name derived from its local part, a name
/// primary gets the email from the parenthesized detail when one is there,
/// or a placeholder address otherwise. Lossy and order-dependent.
fn parse_line(line: &str) -> Option<Payee> {
    let caps = PAYEE_LINE.captures(line)?;
    let primary = caps.get(1)?.as_str().trim();
    let detail = caps.get(2).map(|m| m.as_str().trim().to_string());
    let suffix = caps.get(3).map(|m| m.as_str().trim().to_string());

    let (name, email, kind) = if primary.contains('@') {
        (display_name(primary), primary.to_string(), detail.or(suffix))
    } else if detail.as_deref().is_some_and(|d| d.contains('@')) {
        (primary.to_string(), detail.unwrap(), suffix)
    } else {
        (
            primary.to_string(),
            placeholder_email(primary),
            detail.or(suffix),
        )
    };

    Some(Payee {
        name,
        email,
        status: PayeeStatus::Active,
        kind,
    })
}

/// `ritik.jain@example.com` -> `Ritik Jain`
fn display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    local
        .split(['.', '_'])
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `kartik design` -> `kartik.design@example.com`
fn placeholder_email(name: &str) -> String {
    let local = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".");
    format!("{local}@example.com")
}

/// The fixed demo roster served when a listing yields nothing.
pub fn demo_payees() -> Vec<Payee> {
    vec![
        Payee::active("sahaj jain", "sahaj.jain@example.com"),
        Payee::active("kartik design", "kartik.design@example.com"),
        Payee::active("ritik jain", "ritik.jain@example.com"),
    ]
}
