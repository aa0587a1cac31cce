use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use crate::errors::{AppError, StoreError, UserInfoError};

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            AppError::UserInfo(UserInfoError::NotFound(_)) => StatusCode::NOT_FOUND,
            // Everything else is an upstream failure
            AppError::Store(_) | AppError::UserInfo(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self);
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::NotFound("user 1".into()), StatusCode::NOT_FOUND)]
    #[case(AppError::InvalidInput("bad date".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::Store(StoreError::NotFound("task 9".into())), StatusCode::NOT_FOUND)]
    #[case(AppError::Store(StoreError::Conflict("passport 1 2".into())), StatusCode::CONFLICT)]
    #[case(AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut)), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::UserInfo(UserInfoError::NotFound("1 2".into())), StatusCode::NOT_FOUND)]
    #[case(AppError::UserInfo(UserInfoError::Status(503)), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_errors_to_status(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }
}
