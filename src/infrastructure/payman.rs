use crate::config::ProviderConfig;
use crate::domain::ports::{AccessToken, PaymentProvider, ProviderResponse};
use crate::error::{PortalError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::RwLock;

/// HTTP adapter for the Payman "ask" API.
///
/// One instance is built at startup and handed to whatever needs it; the
/// session token obtained from an authorization-code exchange lives inside
/// the instance, not in process-wide state. Requests authenticate with the
/// bearer token when one is held, and with the client credentials otherwise.
pub struct PaymanClient {
    http: reqwest::Client,
    config: ProviderConfig,
    token: RwLock<Option<AccessToken>>,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a serde_json::Value>,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

impl PaymanClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    /// The scopes the portal requests: wallet/payee/transaction reads plus
    /// payee creation and payment sending.
    pub const OAUTH_SCOPES: &'static str = "read_balance,read_list_wallets,read_list_payees,\
         read_list_transactions,write_create_payee,write_send_payment,write_create_wallet";

    /// Where to send a user to authorize the portal.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&scope={}&response_type=code",
            self.config.app_url,
            self.config.client_id,
            urlencoding::encode(redirect_uri),
            urlencoding::encode(Self::OAUTH_SCOPES),
        )
    }

    pub async fn has_session(&self) -> bool {
        self.token.read().await.is_some()
    }
}

#[async_trait]
impl PaymentProvider for PaymanClient {
    async fn ask(
        &self,
        command: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<ProviderResponse> {
        let url = format!("{}/ask", self.config.base_url);
        let body = AskRequest {
            message: command,
            metadata: metadata.as_ref(),
        };

        let mut request = self.http.post(&url).json(&body);
        request = match self.token.read().await.as_ref() {
            Some(token) => request.bearer_auth(&token.access_token),
            None => request.basic_auth(&self.config.client_id, Some(&self.config.client_secret)),
        };

        tracing::debug!(%command, "asking provider");
        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<ProviderResponse>().await?)
    }

    /// Server-side authorization-code exchange. The token is kept in this
    /// client for subsequent commands; failures propagate, there is no mock
    /// token to fall back to.
    async fn exchange_code(&self, code: &str) -> Result<AccessToken> {
        let url = format!("{}/oauth/token", self.config.base_url);
        let body = TokenRequest {
            grant_type: "authorization_code",
            code,
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
        };

        let response = self.http.post(&url).json(&body).send().await?;
        let token = response
            .error_for_status()
            .map_err(|e| PortalError::Provider(format!("token exchange failed: {e}")))?
            .json::<AccessToken>()
            .await?;

        *self.token.write().await = Some(token.clone());
        tracing::info!("provider session established");
        Ok(token)
    }
}
