// HTTP handlers for service listing endpoints

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{middleware::AuthenticatedUser, ownership::authorize_mutation};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::models::{parse_path_id, MessageResponse};
use crate::services::{
    models::{
        CreateServiceRequest, Service, ServiceListResponse, ServiceListing, ServiceMutationResponse,
        ServiceResponse, UpdateServiceRequest,
    },
    query::{ServiceFilter, ServiceQuery},
};
use crate::AppState;

/// Attach each owner's public profile to its services
async fn populate(state: &AppState, services: Vec<Service>) -> Result<Vec<ServiceListing>, ApiError> {
    let mut owner_ids: Vec<Uuid> = services.iter().map(|s| s.user_id).collect();
    owner_ids.sort();
    owner_ids.dedup();

    let owners: HashMap<Uuid, _> = state
        .accounts
        .find_many(&owner_ids)
        .await
        .map_err(ApiError::store("Error loading service owners"))?
        .into_iter()
        .map(|account| (account.id, account))
        .collect();

    Ok(services
        .into_iter()
        .map(|service| ServiceListing {
            user: owners.get(&service.user_id).cloned(),
            service,
        })
        .collect())
}

async fn populate_one(state: &AppState, service: Service) -> Result<ServiceListing, ApiError> {
    let mut listings = populate(state, vec![service]).await?;
    listings
        .pop()
        .ok_or_else(|| ApiError::Internal("populated listing went missing".to_string()))
}

/// List active services
#[utoipa::path(
    get,
    path = "/api/services",
    params(ServiceQuery),
    responses(
        (status = 200, description = "Matching services", body = ServiceListResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "services"
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceQuery>,
) -> Result<Json<ServiceListResponse>, ApiError> {
    tracing::debug!("Fetching services with query parameters: {:?}", query);
    let filter = ServiceFilter::try_from(query)?;

    let services = state
        .services
        .search(&filter)
        .await
        .map_err(ApiError::store("Error fetching services"))?;
    let services = populate(&state, services).await?;

    Ok(Json(ServiceListResponse {
        success: true,
        count: services.len(),
        services,
    }))
}

/// Fetch one service; each fetch counts as a view
#[utoipa::path(
    get,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service found", body = ServiceResponse),
        (status = 404, description = "Service not found", body = ErrorBody)
    ),
    tag = "services"
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceResponse>, ApiError> {
    let not_found = || ApiError::NotFound { resource: "Service" };
    let id = parse_path_id(&id).ok_or_else(not_found)?;

    let service = state
        .services
        .record_view(id)
        .await
        .map_err(ApiError::store("Error fetching service"))?
        .ok_or_else(not_found)?;

    Ok(Json(ServiceResponse {
        success: true,
        service: populate_one(&state, service).await?,
    }))
}

/// Active services of one account
#[utoipa::path(
    get,
    path = "/api/services/user/{userId}",
    params(("userId" = Uuid, Path, description = "Owner account ID")),
    responses(
        (status = 200, description = "Services of the account", body = ServiceListResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "services"
)]
pub async fn list_user_services(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ServiceListResponse>, ApiError> {
    let services = match parse_path_id(&user_id) {
        Some(user_id) => state
            .services
            .list_by_owner(user_id)
            .await
            .map_err(ApiError::store("Error fetching user services"))?,
        None => Vec::new(),
    };
    let services = populate(&state, services).await?;

    Ok(Json(ServiceListResponse {
        success: true,
        count: services.len(),
        services,
    }))
}

/// Create a service owned by the caller
///
/// Mounted behind the gate and the freelancer guard.
#[utoipa::path(
    post,
    path = "/api/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ServiceMutationResponse),
        (status = 400, description = "Invalid input data", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Freelancers only", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "services"
)]
pub async fn create_service(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    JsonBody(request): JsonBody<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceMutationResponse>), ApiError> {
    request.validate()?;

    let service = state
        .services
        .create(request.into_new_service(identity.user_id))
        .await
        .map_err(ApiError::store("Error creating service"))?;

    tracing::info!("user_id={} created service {}", identity.user_id, service.id);
    Ok((
        StatusCode::CREATED,
        Json(ServiceMutationResponse {
            success: true,
            message: "Service created successfully".to_string(),
            service: populate_one(&state, service).await?,
        }),
    ))
}

/// Update a service; only its owner may do so
#[utoipa::path(
    put,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = ServiceMutationResponse),
        (status = 400, description = "Invalid input data", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Service not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "services"
)]
pub async fn update_service(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateServiceRequest>,
) -> Result<Json<ServiceMutationResponse>, ApiError> {
    let found = match parse_path_id(&id) {
        Some(id) => state
            .services
            .find_by_id(id)
            .await
            .map_err(ApiError::store("Error updating service"))?,
        None => None,
    };
    let mut service = authorize_mutation(found, &identity, "update")?;

    request.validate()?;
    request.apply_to(&mut service);

    let saved = state
        .services
        .save(&service)
        .await
        .map_err(ApiError::store("Error updating service"))?
        .ok_or(ApiError::NotFound { resource: "Service" })?;

    tracing::info!("user_id={} updated service {}", identity.user_id, saved.id);
    Ok(Json(ServiceMutationResponse {
        success: true,
        message: "Service updated successfully".to_string(),
        service: populate_one(&state, saved).await?,
    }))
}

/// Delete a service; only its owner may do so
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Service not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "services"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let found = match parse_path_id(&id) {
        Some(id) => state
            .services
            .find_by_id(id)
            .await
            .map_err(ApiError::store("Error deleting service"))?,
        None => None,
    };
    let service = authorize_mutation(found, &identity, "delete")?;

    state
        .services
        .delete(service.id)
        .await
        .map_err(ApiError::store("Error deleting service"))?;

    tracing::info!("user_id={} deleted service {}", identity.user_id, service.id);
    Ok(Json(MessageResponse::new("Service deleted successfully")))
}
