// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::auth::models::Role;
use crate::error::ErrorBody;

/// Authentication and authorization failures
///
/// Every variant maps to exactly one status code and one stable message.
/// Only `InternalFailure` carries diagnostic text to the client.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header
    #[error("missing bearer credential")]
    MissingCredential,

    /// Unparsable token or signature mismatch
    #[error("malformed or tampered token")]
    MalformedToken,

    #[error("token has expired")]
    ExpiredToken,

    /// The token's subject no longer exists
    #[error("token subject not found")]
    UnknownSubject,

    #[error("account is deactivated")]
    AccountDeactivated,

    #[error("route requires role '{required}'")]
    RoleForbidden { required: Role },

    /// The caller is not the recorded owner of the resource
    #[error("not authorized to {action} this {resource}")]
    NotOwner {
        action: &'static str,
        resource: &'static str,
    },

    #[error("{resource} not found")]
    ResourceNotFound { resource: &'static str },

    /// Unknown email or wrong password at login
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailAlreadyExists,

    /// Store outage, hashing failure, signing failure
    #[error("internal authentication failure: {0}")]
    InternalFailure(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::MalformedToken
            | AuthError::ExpiredToken
            | AuthError::UnknownSubject
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountDeactivated
            | AuthError::RoleForbidden { .. }
            | AuthError::NotOwner { .. } => StatusCode::FORBIDDEN,
            AuthError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::InternalFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message for this error
    pub fn error_message(&self) -> String {
        match self {
            AuthError::MissingCredential => "No token provided. Authorization denied.".to_string(),
            AuthError::MalformedToken => "Invalid token. Authorization denied.".to_string(),
            AuthError::ExpiredToken => "Token expired. Please login again.".to_string(),
            AuthError::UnknownSubject => "User not found. Authorization denied.".to_string(),
            AuthError::AccountDeactivated => {
                "Account is deactivated. Please contact support.".to_string()
            }
            AuthError::RoleForbidden { required } => match required {
                Role::Freelancer => "Access denied. Freelancers only.".to_string(),
                Role::Client => "Access denied. Clients only.".to_string(),
            },
            AuthError::NotOwner { action, resource } => {
                format!("Not authorized to {} this {}", action, resource)
            }
            AuthError::ResourceNotFound { resource } => {
                let mut chars = resource.chars();
                match chars.next() {
                    Some(first) => format!("{}{} not found", first.to_uppercase(), chars.as_str()),
                    None => "Resource not found".to_string(),
                }
            }
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::EmailAlreadyExists => "User already exists with this email".to_string(),
            AuthError::InternalFailure(_) => "Server error in authentication".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AuthError::InternalFailure(detail) => {
                error!("Auth middleware error: {}", detail);
                ErrorBody::with_diagnostic(self.error_message(), detail.clone())
            }
            AuthError::MalformedToken | AuthError::ExpiredToken | AuthError::MissingCredential => {
                warn!("Rejected request: {}", self);
                ErrorBody::new(self.error_message())
            }
            _ => {
                warn!("Authorization failed: {}", self);
                ErrorBody::new(self.error_message())
            }
        };

        body.into_response_with(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        assert_eq!(AuthError::MissingCredential.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::MalformedToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::ExpiredToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UnknownSubject.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::AccountDeactivated.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::RoleForbidden { required: Role::Client }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::NotOwner { action: "update", resource: "service" }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::ResourceNotFound { resource: "service" }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::InternalFailure("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_expired_and_malformed_messages_differ() {
        assert_ne!(
            AuthError::ExpiredToken.error_message(),
            AuthError::MalformedToken.error_message()
        );
        assert_ne!(
            AuthError::AccountDeactivated.error_message(),
            AuthError::UnknownSubject.error_message()
        );
    }

    #[test]
    fn test_messages_name_the_resource() {
        assert_eq!(
            AuthError::NotOwner { action: "delete", resource: "service" }.error_message(),
            "Not authorized to delete this service"
        );
        assert_eq!(
            AuthError::ResourceNotFound { resource: "service" }.error_message(),
            "Service not found"
        );
        assert_eq!(
            AuthError::RoleForbidden { required: Role::Freelancer }.error_message(),
            "Access denied. Freelancers only."
        );
    }
}
