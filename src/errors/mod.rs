// Error types for each layer and the top-level AppError the handlers return.
use thiserror::Error;

pub mod response;
pub mod store;
pub mod user_info;

pub use store::{StoreError, StoreResult};
pub use user_info::{UserInfoError, UserInfoResult};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("User info error: {0}")]
    UserInfo(#[from] UserInfoError),
}

pub type AppResult<T> = Result<T, AppError>;
