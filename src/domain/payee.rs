use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PayeeStatus {
    Active,
    Inactive,
}

/// A recipient registered with the payment provider, eligible to receive a
/// disbursement. Parsed out of the provider's numbered payee listings;
/// uniqueness is by parse order only.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Payee {
    pub name: String,
    pub email: String,
    pub status: PayeeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Payee {
    pub fn active(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            status: PayeeStatus::Active,
            kind: None,
        }
    }
}
