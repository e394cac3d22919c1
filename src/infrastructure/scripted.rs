use crate::domain::ports::{AccessToken, PaymentProvider, ProviderResponse};
use crate::error::{PortalError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

enum ScriptedReply {
    Text(String),
    Failure(String),
}

/// A canned provider for tests and offline demo runs.
///
/// Replies are served in the order they were scripted; once the script runs
/// out, every further ask gets an empty completed response, which drives the
/// normalizer's fallback path. Every command asked is recorded for
/// inspection.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Text(content.into()));
        self
    }

    pub fn with_failure(self, reason: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Failure(reason.into()));
        self
    }

    /// The commands asked so far, in order.
    pub async fn commands(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for ScriptedProvider {
    async fn ask(
        &self,
        command: &str,
        _metadata: Option<serde_json::Value>,
    ) -> Result<ProviderResponse> {
        self.asked.lock().unwrap().push(command.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(ScriptedReply::Text(content)) => Ok(ProviderResponse::from_text(content)),
            Some(ScriptedReply::Failure(reason)) => Err(PortalError::Provider(reason)),
            None => Ok(ProviderResponse::from_text("")),
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessToken> {
        Ok(AccessToken {
            access_token: format!("scripted-token-{code}"),
            expires_in: 3600,
        })
    }
}
