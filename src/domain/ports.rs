use crate::domain::application::Application;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// One artifact of a provider reply. The document to parse arrives in
/// `content` or, on older provider versions, in `text`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Artifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Artifact {
    pub fn body(&self) -> Option<&str> {
        self.content.as_deref().or(self.text.as_deref())
    }
}

/// What the provider's "ask" endpoint returns: a completion status and an
/// artifacts array whose first element carries the prose or table to parse.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl ProviderResponse {
    pub const COMPLETED: &'static str = "COMPLETED";

    /// A completed response carrying one text artifact.
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            status: Some(Self::COMPLETED.to_string()),
            artifacts: vec![Artifact {
                name: None,
                content: Some(content.into()),
                text: None,
            }],
        }
    }

    pub fn first_artifact_body(&self) -> Option<&str> {
        self.artifacts.first().and_then(Artifact::body)
    }

    /// A response is usable when the provider either omits the status field
    /// or reports the task as completed.
    pub fn is_usable(&self) -> bool {
        match self.status.as_deref() {
            Some(status) => status.eq_ignore_ascii_case(Self::COMPLETED),
            None => true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: u64,
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn put(&self, application: Application) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Application>>;
    async fn all(&self) -> Result<Vec<Application>>;
}

/// The payment provider's natural-language command API, plus the server-side
/// authorization-code exchange. Command strings are built in [`commands`].
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn ask(
        &self,
        command: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<ProviderResponse>;

    async fn exchange_code(&self, code: &str) -> Result<AccessToken>;
}

pub type ApplicationStoreBox = Box<dyn ApplicationStore>;
pub type SharedProvider = Arc<dyn PaymentProvider>;

/// The command phrasings the provider's assistant responds to. The wording is
/// part of the integration contract: rephrasing changes the response layout
/// the normalizer expects.
pub mod commands {
    use rust_decimal::Decimal;
    use serde_json::json;

    pub const LIST_PAYEES: &str = "List all payees (always in this proper manner only)";

    pub fn pay(amount: Decimal, recipient: &str) -> String {
        format!("pay {amount} tds to {recipient}")
    }

    pub fn pay_metadata(amount: Decimal, recipient: &str, description: &str) -> serde_json::Value {
        json!({
            "source": "scholarship-portal",
            "type": "scholarship-payment",
            "recipient": recipient,
            "amount": amount,
            "currency": "TSD",
            "description": description,
        })
    }

    pub fn add_payee(email: &str, name: &str) -> String {
        format!("Add payee with email {email} and name \"{name}\"")
    }

    pub fn wallet_balance(wallet: u32) -> String {
        format!("Show my TDS wallet {wallet} balance")
    }

    /// The structured history prompt. The section headings and table columns
    /// requested here are exactly what the transaction parser walks.
    pub fn transaction_history(wallet: u32) -> String {
        format!(
            "Show my TDS wallet {wallet} complete transaction history in this exact layout:\n\
             ### Wallet Financial Summary\n\
             - Wallet ID, Paytag, Total Balance, Spendable Balance, Pending Balance\n\
             ### Transaction Overview\n\
             - Total Transactions, Total Debit Amount, Currency\n\
             ### Detailed Transaction Log\n\
             | Date | Recipient | Amount | Type | Status | Created By |"
        )
    }
}
