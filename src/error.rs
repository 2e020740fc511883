use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{pagination::PageError, repository::StoreError};

pub type AppResult<T> = Result<T, AppError>;

/// AppError
///
/// The error taxonomy used by the resource orchestrators. The core (policy and
/// pagination) never raises these itself; orchestrators translate its return
/// values (`Decision::Deny`, `PageError`) into the matching variant.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{resource} not found with id {id}"))
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("You don't have permission to make this operation".to_string())
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized("Full authentication is required to access this resource".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "success": false,
            "status": status.as_u16(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if let StoreError::Referenced(message) = err {
            tracing::debug!(%message, "delete refused, row still referenced");
            return Self::Conflict(message);
        }
        // Details stay in the logs; clients get a generic message.
        tracing::error!(error = ?err, "persistence operation failed");
        Self::Internal("Persistence operation failed".to_string())
    }
}
