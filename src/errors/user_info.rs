use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserInfoError {
    #[error("No user with passport {0}")]
    NotFound(String),

    #[error("User info request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("User info service answered with status {0}")]
    Status(u16),
}

pub type UserInfoResult<T> = Result<T, UserInfoError>;
