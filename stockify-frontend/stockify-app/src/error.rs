use std::{error, fmt::Display, sync::Arc, time::Duration};

use stockify_api_types::result::ApiError;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum AppError {
    #[error("API {0}")]
    Api(#[from] ApiError),
    #[error("Server responded with status {0}")]
    Status(u16),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("System error {0}")]
    SystemError(#[from] SystemError),
}

/// Wraps the error types that aren't `Clone` so [`AppError`] can be handed to every
/// subscriber of a chart.
#[derive(Clone, Debug)]
pub enum SystemError {
    Message(String),
    ReqwestError(Arc<reqwest::Error>),
    UrlError(url::ParseError),
    JsonError(Arc<serde_json::Error>),
    IoError(Arc<std::io::Error>),
    Anyhow(Arc<anyhow::Error>),
}

impl From<anyhow::Error> for SystemError {
    fn from(value: anyhow::Error) -> Self {
        Self::Anyhow(Arc::new(value))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        Self::SystemError(value.into())
    }
}

impl From<reqwest::Error> for SystemError {
    fn from(value: reqwest::Error) -> Self {
        Self::ReqwestError(Arc::new(value))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::SystemError(value.into())
    }
}

impl From<url::ParseError> for AppError {
    fn from(value: url::ParseError) -> Self {
        Self::SystemError(SystemError::UrlError(value))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::SystemError(SystemError::JsonError(Arc::new(value)))
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::SystemError(SystemError::IoError(Arc::new(value)))
    }
}

impl Display for SystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemError::Message(message) => write!(f, "{}", message),
            SystemError::ReqwestError(reqwest) => write!(f, "{}", reqwest),
            SystemError::UrlError(url) => write!(f, "{}", url),
            SystemError::JsonError(json) => write!(f, "{}", json),
            SystemError::IoError(io) => write!(f, "{}", io),
            SystemError::Anyhow(anyhow) => write!(f, "{}", anyhow),
        }
    }
}

impl error::Error for SystemError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            SystemError::Message(_) => None,
            SystemError::ReqwestError(reqwest) => Some(reqwest.as_ref()),
            SystemError::UrlError(url) => Some(url),
            SystemError::JsonError(json) => Some(json.as_ref()),
            SystemError::IoError(io) => Some(io.as_ref()),
            SystemError::Anyhow(anyhow) => Some(anyhow.root_cause()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
