use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AuthorizationError, BalanceError, BatchError, UnknownCategory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String
}

/// Every failure the HTTP surface can report. Each kind keeps one status and
/// one code so clients can tell retryable conflicts from final rejections.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing or unknown API key")]
    Unauthorized,
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Balance(#[from] BalanceError)
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnknownCategory(_) => "INVALID_CATEGORY",
            Self::Authorization(error) => error.code(),
            Self::Batch(error) => error.code(),
            Self::Balance(error) => error.code()
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "INVALID_CATEGORY" | "INVALID_AMOUNT" => StatusCode::BAD_REQUEST,
            "ACCOUNT_OR_CATEGORY_NOT_FOUND" => StatusCode::NOT_FOUND,
            "INSUFFICIENT_BALANCE" => StatusCode::UNPROCESSABLE_ENTITY,
            "CONCURRENT_MODIFICATION" => StatusCode::CONFLICT,
            "STORE_UNAVAILABLE" | "BATCH_READ_FAILED" | "BATCH_WRITE_FAILED" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string()
        };

        (self.status(), Json(body)).into_response()
    }
}
