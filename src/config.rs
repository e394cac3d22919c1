use crate::error::{PortalError, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Portal configuration, read from a TOML file with environment overrides
/// for the provider credentials. CLI flags win over file values; the
/// composition root applies them after loading.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct PortalConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".parse().expect("static listen address"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base URL of the provider's command API.
    pub base_url: String,
    /// Base URL of the provider's end-user app, for the authorize redirect.
    pub app_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Which of the account's test wallets commands address.
    pub wallet: u32,
    pub currency: String,
    /// Outbound request timeout. A provider call that never resolves would
    /// otherwise hold its caller forever.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://agent.payman.example".to_string(),
            app_url: "https://app.payman.example".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            wallet: 3,
            currency: "TSD".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to a persistent database. Absent means in-memory storage.
    pub db_path: Option<PathBuf>,
}

impl PortalConfig {
    /// Loads the file when given, otherwise starts from defaults; then
    /// applies `PAYMAN_*` environment overrides so credentials can stay out
    /// of the config file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    PortalError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                toml::from_str(&raw)
                    .map_err(|e| PortalError::Config(format!("{}: {e}", path.display())))?
            }
            None => Self::default(),
        };

        if let Ok(base_url) = std::env::var("PAYMAN_BASE_URL") {
            config.provider.base_url = base_url;
        }
        if let Ok(client_id) = std::env::var("PAYMAN_CLIENT_ID") {
            config.provider.client_id = client_id;
        }
        if let Ok(client_secret) = std::env::var("PAYMAN_CLIENT_SECRET") {
            config.provider.client_secret = client_secret;
        }

        Ok(config)
    }
}
