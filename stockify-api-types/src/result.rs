use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Deserialize, Serialize)]
pub enum ApiError {
    #[error("request rejected by the server: {0}")]
    Rejected(String),
    #[error("response was marked successful but carried no data")]
    MissingData,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum ApiResult<T> {
    Ok(T),
    Error(ApiError),
}

impl<T> ApiResult<T> {
    pub fn into_std(self) -> Result<T, ApiError> {
        match self {
            ApiResult::Ok(value) => Ok(value),
            ApiResult::Error(error) => Err(error),
        }
    }
}

impl<T> From<ApiResult<T>> for Result<T, ApiError> {
    fn from(value: ApiResult<T>) -> Self {
        value.into_std()
    }
}
