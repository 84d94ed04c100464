// Error handling module for the LocalSkill API
// Provides the shared failure envelope, storage errors and route-level errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::auth::AuthError;

/// Failure envelope shared by every error response
///
/// `error` carries diagnostic text and is only present on 500 responses.
/// `errors` carries field-level validation details on 400 responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = false)]
    pub success: bool,
    #[schema(example = "Service not found")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            errors: None,
        }
    }

    pub fn with_diagnostic(message: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            error: Some(diagnostic.into()),
            ..Self::new(message)
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Errors raised by the account and service stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique field already holds this value
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),
}

/// Route-level error type
/// Handlers return `Result<T, ApiError>`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Maps to HTTP 400
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Maps to HTTP 400
    #[error("{0}")]
    BadRequest(String),

    /// Maps to HTTP 404
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Authentication and authorization failures keep their own status mapping
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Maps to HTTP 500; `context` is the client-facing message
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// Maps to HTTP 500
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Build a mapper that wraps a store failure with a client-facing context message
    ///
    /// ```ignore
    /// state.services.find_by_id(id).await.map_err(ApiError::store("Error fetching service"))?;
    /// ```
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Auth(auth) => auth.status_code(),
            ApiError::Store { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Auth(auth) => return auth.into_response(),
            ApiError::Validation(errors) => {
                debug!("Validation error: {:?}", errors);
                ErrorBody {
                    errors: Some(serde_json::to_value(&errors).unwrap_or_default()),
                    ..ErrorBody::new("Please provide all required fields")
                }
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                ErrorBody::new(message)
            }
            ApiError::NotFound { resource } => {
                debug!("{} not found", resource);
                ErrorBody::new(format!("{} not found", resource))
            }
            ApiError::Store { context, source } => {
                error!("{}: {:?}", context, source);
                ErrorBody::with_diagnostic(context, source.to_string())
            }
            ApiError::Internal(message) => {
                error!("Internal error: {}", message);
                ErrorBody::with_diagnostic("Internal server error", message)
            }
        };

        body.into_response_with(status)
    }
}
