//! Error types for cardpay-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use cardpay_core::error::{ErrorCode, ErrorDetails};
use cardpay_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Anonymous operator; carries the login URL to send them to
    #[error("Login required")]
    LoginRequired { redirect: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::LoginRequired { .. } => StatusCode::SEE_OTHER,
            ApiError::Core(e) => match e.code() {
                ErrorCode::TransactionNotFound => StatusCode::NOT_FOUND,
                ErrorCode::AlreadyPaid => StatusCode::CONFLICT,
                ErrorCode::Unauthorized => StatusCode::FORBIDDEN,
                ErrorCode::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::FetchFailed | ErrorCode::MutationFailed => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        match self {
            ApiError::Core(e) => e.to_details(),
            ApiError::NotFound { .. } => ErrorDetails::new(ErrorCode::TransactionNotFound, self.to_string()),
            ApiError::BadRequest { .. } => ErrorDetails::new(ErrorCode::InvalidFormat, self.to_string()),
            ApiError::LoginRequired { .. } => ErrorDetails::new(ErrorCode::Unauthorized, self.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::LoginRequired { redirect } = &self {
            return Redirect::to(redirect).into_response();
        }

        let status = self.status_code();
        if status.is_server_error() {
            log::error!(target: "cardpay::api", "{}", self);
        } else {
            log::warn!(target: "cardpay::api", "{}", self);
        }
        let body = serde_json::to_string(&self.to_details()).unwrap_or_default();
        (status, [(axum::http::header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_status() {
        let err = ApiError::from(CoreError::AlreadyPaid { id: "A".to_string() });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = ApiError::from(CoreError::Unauthorized {
            action: "mark paid".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_login_required_redirects() {
        let response = ApiError::LoginRequired {
            redirect: "/login?redirectTo=%2Fcard-purchases".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(axum::http::header::LOCATION).unwrap(),
            "/login?redirectTo=%2Fcard-purchases"
        );
    }
}
