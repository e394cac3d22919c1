use crate::domain::application::ApplicationStatus;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("Application not found: {0}")]
    NotFound(Uuid),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        PortalError::Provider(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
