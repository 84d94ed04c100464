// HTTP handlers for the freelancer directory and the caller's own profile

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::auth::{
    middleware::AuthenticatedUser,
    models::{AccountResponse, ProfileUpdate},
    repository::FreelancerFilter,
};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::models::{parse_path_id, MessageResponse};
use crate::users::models::{FreelancerQuery, ProfileUpdateRequest, ProfileUpdatedResponse, UserListResponse};
use crate::validation::validate_phone;
use crate::AppState;

/// List active freelancers
#[utoipa::path(
    get,
    path = "/api/users",
    params(FreelancerQuery),
    responses(
        (status = 200, description = "Matching freelancers", body = UserListResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "users"
)]
pub async fn list_freelancers(
    State(state): State<AppState>,
    Query(query): Query<FreelancerQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let filter = FreelancerFilter::from(query);
    let users = state
        .accounts
        .list_freelancers(&filter)
        .await
        .map_err(ApiError::store("Error fetching users"))?;

    tracing::debug!("Directory query {:?} returned {} freelancers", filter, users.len());
    Ok(Json(UserListResponse {
        success: true,
        count: users.len(),
        users,
    }))
}

/// Public profile of one account
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account found", body = AccountResponse),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let not_found = || ApiError::NotFound { resource: "User" };
    let id = parse_path_id(&id).ok_or_else(not_found)?;

    let user = state
        .accounts
        .find_by_id(id)
        .await
        .map_err(ApiError::store("Error fetching user"))?
        .ok_or_else(not_found)?;

    Ok(Json(AccountResponse { success: true, user }))
}

/// Update the caller's own profile
#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileUpdatedResponse),
        (status = 400, description = "Invalid phone number", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    JsonBody(request): JsonBody<ProfileUpdateRequest>,
) -> Result<Json<ProfileUpdatedResponse>, ApiError> {
    let update = ProfileUpdate::from(request);
    if let Some(ref phone) = update.phone {
        validate_phone(phone)
            .map_err(|_| ApiError::BadRequest("Please provide a valid phone number".to_string()))?;
    }

    let user = state
        .accounts
        .update_profile(identity.user_id, &update)
        .await
        .map_err(ApiError::store("Error updating profile"))?
        .ok_or(ApiError::NotFound { resource: "User" })?;

    tracing::info!("user_id={} updated their profile", identity.user_id);
    Ok(Json(ProfileUpdatedResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
        user,
    }))
}

/// Deactivate the caller's own account
#[utoipa::path(
    delete,
    path = "/api/users/account",
    responses(
        (status = 200, description = "Account deactivated", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let deactivated = state
        .accounts
        .deactivate(identity.user_id)
        .await
        .map_err(ApiError::store("Error deleting account"))?;
    if !deactivated {
        return Err(ApiError::NotFound { resource: "User" });
    }

    tracing::info!("user_id={} deactivated their account", identity.user_id);
    Ok(Json(MessageResponse::new("Account deactivated successfully")))
}
