// LocalSkill API: marketplace backend for local freelancers and their clients

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod memory;
pub mod models;
pub mod query;
pub mod services;
pub mod users;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{AccountStore, AuthGate, AuthService, TokenService, UserRepository};
use config::AuthConfig;
use db::DbPool;
use memory::MemoryStore;
use models::HealthResponse;
use services::{ServiceRepository, ServiceStore};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        auth::handlers::signup_handler,
        auth::handlers::login_handler,
        auth::handlers::me_handler,
        users::handlers::list_freelancers,
        users::handlers::get_user,
        users::handlers::update_profile,
        users::handlers::delete_account,
        services::handlers::list_services,
        services::handlers::get_service,
        services::handlers::list_user_services,
        services::handlers::create_service,
        services::handlers::update_service,
        services::handlers::delete_service,
    ),
    components(schemas(
        error::ErrorBody,
        models::MessageResponse,
        models::HealthResponse,
        auth::models::Role,
        auth::models::Account,
        auth::models::SignupRequest,
        auth::models::LoginRequest,
        auth::models::AuthResponse,
        auth::models::AccountResponse,
        users::models::ProfileUpdateRequest,
        users::models::UserListResponse,
        users::models::ProfileUpdatedResponse,
        services::models::Service,
        services::models::FeaturesInput,
        services::models::CreateServiceRequest,
        services::models::UpdateServiceRequest,
        services::models::ServiceListing,
        services::models::ServiceResponse,
        services::models::ServiceMutationResponse,
        services::models::ServiceListResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup, login and current account"),
        (name = "users", description = "Freelancer directory and own profile"),
        (name = "services", description = "Service listings")
    ),
    info(
        title = "LocalSkill API",
        version = "1.0.0",
        description = "Marketplace connecting local freelancers with clients"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub services: Arc<dyn ServiceStore>,
    pub gate: AuthGate,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        services: Arc<dyn ServiceStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            gate: AuthGate::new(tokens.clone(), accounts.clone()),
            auth: AuthService::new(accounts.clone(), tokens),
            accounts,
            services,
        }
    }

    /// State backed by PostgreSQL
    pub fn postgres(pool: DbPool, auth_config: &AuthConfig) -> Self {
        Self::new(
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(ServiceRepository::new(pool)),
            TokenService::new(auth_config),
        )
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(auth_config: &AuthConfig) -> Self {
        let store = MemoryStore::new();
        Self::new(
            Arc::new(store.clone()),
            Arc::new(store),
            TokenService::new(auth_config),
        )
    }
}

impl FromRef<AppState> for AuthGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok".to_string(),
    })
}

/// Creates and configures the application router
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/signup", post(auth::signup_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/users", get(users::handlers::list_freelancers))
        .route("/api/users/:id", get(users::handlers::get_user))
        .route("/api/services", get(services::handlers::list_services))
        .route("/api/services/:id", get(services::handlers::get_service))
        .route(
            "/api/services/user/:user_id",
            get(services::handlers::list_user_services),
        );

    // Freelancers only
    let freelancer_routes = Router::new()
        .route("/api/services", post(services::handlers::create_service))
        .route_layer(middleware::from_fn(auth::freelancer_only));

    // Protected by the gate; ownership is checked inside the handlers
    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me_handler))
        .route("/api/users/profile", put(users::handlers::update_profile))
        .route("/api/users/account", delete(users::handlers::delete_account))
        .route("/api/services/:id", put(services::handlers::update_service))
        .route("/api/services/:id", delete(services::handlers::delete_service))
        .merge(freelancer_routes)
        .route_layer(middleware::from_fn_with_state(
            state.gate.clone(),
            auth::require_auth,
        ));

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(state)
}
