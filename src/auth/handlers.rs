// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{
    middleware::AuthenticatedUser,
    models::{AccountResponse, AuthResponse, LoginRequest, SignupRequest},
};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input data", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    tracing::debug!("Signup attempt for {} ({})", request.email, request.role);
    request.validate()?;

    let (token, user) = state.auth.signup(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "Account created successfully".to_string(),
            token,
            user,
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 403, description = "Account is deactivated", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let (token, user) = state.auth.login(&request).await?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

/// Current account
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Missing, malformed or expired token", body = ErrorBody),
        (status = 403, description = "Account is deactivated", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me_handler(AuthenticatedUser(identity): AuthenticatedUser) -> Json<AccountResponse> {
    Json(AccountResponse {
        success: true,
        user: identity.account,
    })
}
