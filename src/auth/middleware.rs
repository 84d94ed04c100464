// Authentication gate, request identity and role guards for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    models::{Account, Role},
    repository::AccountStore,
    token::TokenService,
};

/// Identity attached to a request once the gate has verified it
///
/// Lives in the request extensions for the duration of one request.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub account: Account,
}

/// Verifies bearer tokens and re-checks the subject against the account store
///
/// Nothing is cached: every call re-verifies signature, expiry and the live
/// account status.
#[derive(Clone)]
pub struct AuthGate {
    tokens: TokenService,
    accounts: Arc<dyn AccountStore>,
}

impl AuthGate {
    pub fn new(tokens: TokenService, accounts: Arc<dyn AccountStore>) -> Self {
        Self { tokens, accounts }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Run the full gate against a request's headers
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<VerifiedIdentity, AuthError> {
        let token = bearer_token(headers)?;
        self.authenticate_token(token).await
    }

    /// Verify a raw token and load its live subject
    pub async fn authenticate_token(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let claims = self.tokens.verify(token)?;
        let user_id = claims.subject_id()?;

        let account = self
            .accounts
            .find_by_id(user_id)
            .await
            .map_err(|e| {
                error!("Account lookup failed for user_id={}: {:?}", user_id, e);
                AuthError::InternalFailure(e.to_string())
            })?
            .ok_or_else(|| {
                warn!("Token subject {} no longer exists", user_id);
                AuthError::UnknownSubject
            })?;

        if !account.is_active {
            warn!("Deactivated account {} presented a token", user_id);
            return Err(AuthError::AccountDeactivated);
        }

        Ok(VerifiedIdentity {
            user_id,
            email: claims.email,
            role: claims.role,
            account,
        })
    }
}

/// Extract the token from `Authorization: Bearer <token>`
///
/// The prefix is case-sensitive with exactly one space.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingCredential)
}

/// Route middleware: gate the request and attach the identity
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = gate.authenticate(request.headers()).await.map_err(|e| {
        debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        e
    })?;

    debug!(
        "Authenticated user_id={}, role={}, endpoint={}",
        identity.user_id,
        identity.role,
        request.uri().path()
    );
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Authenticated user extractor for protected handlers
///
/// Reuses the identity attached by [`require_auth`]; when the middleware did
/// not run, the gate is invoked here instead.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub VerifiedIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AuthGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<VerifiedIdentity>().cloned() {
            return Ok(AuthenticatedUser(identity));
        }

        let gate = AuthGate::from_ref(state);
        let identity = gate.authenticate(&parts.headers).await?;
        parts.extensions.insert(identity.clone());
        Ok(AuthenticatedUser(identity))
    }
}

/// Role guard applied after the gate
#[derive(Debug, Clone, Copy)]
pub struct RequireRole {
    required_role: Role,
}

impl RequireRole {
    pub fn new(required_role: Role) -> Self {
        Self { required_role }
    }

    pub fn freelancer() -> Self {
        Self::new(Role::Freelancer)
    }

    pub fn client() -> Self {
        Self::new(Role::Client)
    }

    /// Pure check against an already verified identity
    pub fn check(&self, identity: &VerifiedIdentity) -> Result<(), AuthError> {
        if identity.role == self.required_role {
            Ok(())
        } else {
            warn!(
                "Authorization failed: user_id={}, required_role={}, actual_role={}",
                identity.user_id, self.required_role, identity.role
            );
            Err(AuthError::RoleForbidden {
                required: self.required_role,
            })
        }
    }

    /// Middleware form; must be layered inside [`require_auth`]
    pub async fn middleware(self, request: Request, next: Next) -> Result<Response, AuthError> {
        let identity = request
            .extensions()
            .get::<VerifiedIdentity>()
            .ok_or(AuthError::MissingCredential)?;

        self.check(identity)?;
        Ok(next.run(request).await)
    }
}

/// Passes only freelancer identities
pub async fn freelancer_only(request: Request, next: Next) -> Result<Response, AuthError> {
    RequireRole::freelancer().middleware(request, next).await
}

/// Passes only client identities
pub async fn client_only(request: Request, next: Next) -> Result<Response, AuthError> {
    RequireRole::client().middleware(request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{AccountCredentials, NewAccount, ProfileUpdate};
    use crate::auth::repository::FreelancerFilter;
    use crate::config::AuthConfig;
    use crate::error::StoreError;
    use crate::memory::MemoryStore;
    use axum::{
        body::{to_bytes, Body},
        http::{HeaderValue, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    const SECRET: &str = "middleware_test_secret";

    fn token_service() -> TokenService {
        TokenService::new(&AuthConfig::new(SECRET, 3600).unwrap())
    }

    async fn seeded(role: Role) -> (MemoryStore, AuthGate, Account) {
        let store = MemoryStore::new();
        let account = store
            .create(NewAccount {
                email: format!("{}@example.com", role),
                password_hash: "hash".to_string(),
                full_name: "Test User".to_string(),
                phone: "+91 98765 43210".to_string(),
                city: "Pune".to_string(),
                role,
                skill: Some("Tutoring".to_string()),
                experience: Some("2 years".to_string()),
                description: None,
            })
            .await
            .unwrap();
        let gate = AuthGate::new(token_service(), Arc::new(store.clone()));
        (store, gate, account)
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn token_for(account: &Account) -> String {
        token_service()
            .issue(account.id, &account.email, account.role, Duration::hours(1))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_attaches_matching_identity() {
        let (_store, gate, account) = seeded(Role::Freelancer).await;
        let headers = headers_with(&format!("Bearer {}", token_for(&account)));

        let identity = gate.authenticate(&headers).await.unwrap();
        assert_eq!(identity.user_id, account.id);
        assert_eq!(identity.email, account.email);
        assert_eq!(identity.role, Role::Freelancer);
        assert_eq!(identity.account, account);
    }

    #[tokio::test]
    async fn test_missing_or_misformatted_header() {
        let (_store, gate, account) = seeded(Role::Client).await;
        let token = token_for(&account);

        let result = gate.authenticate(&HeaderMap::new()).await;
        assert!(matches!(result, Err(AuthError::MissingCredential)));

        for value in [
            format!("bearer {}", token),
            format!("BEARER {}", token),
            format!("Bearer\t{}", token),
            format!("Token {}", token),
            token.clone(),
            "Basic dXNlcjpwYXNz".to_string(),
        ] {
            let result = gate.authenticate(&headers_with(&value)).await;
            assert!(
                matches!(result, Err(AuthError::MissingCredential)),
                "header {:?} should be rejected as missing credential",
                value
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_and_expired_are_distinct() {
        let (_store, gate, account) = seeded(Role::Client).await;

        let result = gate.authenticate(&headers_with("Bearer not.a.jwt")).await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));

        let now = Utc::now().timestamp();
        let expired = token_service()
            .sign(&crate::auth::token::Claims {
                sub: account.id.to_string(),
                email: account.email.clone(),
                role: account.role,
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();
        let result = gate.authenticate(&headers_with(&format!("Bearer {}", expired))).await;
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_rejected() {
        let (_store, gate, _account) = seeded(Role::Client).await;
        let token = token_service()
            .issue(Uuid::new_v4(), "ghost@example.com", Role::Client, Duration::hours(1))
            .unwrap();

        let result = gate.authenticate(&headers_with(&format!("Bearer {}", token))).await;
        assert!(matches!(result, Err(AuthError::UnknownSubject)));
    }

    // Token issued for a freelancer, account deactivated afterwards
    #[tokio::test]
    async fn test_deactivation_takes_effect_on_next_request() {
        let (store, gate, account) = seeded(Role::Freelancer).await;
        let headers = headers_with(&format!("Bearer {}", token_for(&account)));

        let identity = gate.authenticate(&headers).await.unwrap();
        assert_eq!(identity.user_id, account.id);
        assert_eq!(identity.role, Role::Freelancer);

        assert!(store.deactivate(account.id).await.unwrap());

        let result = gate.authenticate(&headers).await;
        let error = result.unwrap_err();
        assert!(matches!(error, AuthError::AccountDeactivated));
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_role_guard_checks() {
        let (_store, gate, freelancer) = seeded(Role::Freelancer).await;
        let identity = gate
            .authenticate(&headers_with(&format!("Bearer {}", token_for(&freelancer))))
            .await
            .unwrap();

        assert!(RequireRole::freelancer().check(&identity).is_ok());
        assert!(matches!(
            RequireRole::client().check(&identity),
            Err(AuthError::RoleForbidden { required: Role::Client })
        ));
    }

    fn guarded_router(gate: AuthGate) -> Router {
        let freelancer = Router::new()
            .route("/freelancer", get(|| async { "freelancer ok" }))
            .route_layer(middleware::from_fn(freelancer_only));
        let client = Router::new()
            .route("/client", get(|| async { "client ok" }))
            .route_layer(middleware::from_fn(client_only));
        let any_role = Router::new().route(
            "/any",
            get(|AuthenticatedUser(identity): AuthenticatedUser| async move {
                identity.role.to_string()
            }),
        );

        Router::new()
            .merge(freelancer)
            .merge(client)
            .merge(any_role)
            .route_layer(middleware::from_fn_with_state(gate.clone(), require_auth))
            .with_state(gate)
    }

    async fn status_for(router: &Router, path: &str, token: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        router.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_guards_as_route_layers() {
        let store = MemoryStore::new();
        let gate = AuthGate::new(token_service(), Arc::new(store.clone()));
        let mut tokens = Vec::new();
        for role in [Role::Freelancer, Role::Client] {
            let account = store
                .create(NewAccount {
                    email: format!("{}@example.com", role),
                    password_hash: "hash".to_string(),
                    full_name: "Test User".to_string(),
                    phone: "+91 98765 43210".to_string(),
                    city: "Pune".to_string(),
                    role,
                    skill: None,
                    experience: None,
                    description: None,
                })
                .await
                .unwrap();
            tokens.push(token_for(&account));
        }
        let (freelancer_token, client_token) = (&tokens[0], &tokens[1]);
        let router = guarded_router(gate);

        assert_eq!(status_for(&router, "/freelancer", freelancer_token).await, StatusCode::OK);
        assert_eq!(status_for(&router, "/freelancer", client_token).await, StatusCode::FORBIDDEN);
        assert_eq!(status_for(&router, "/client", client_token).await, StatusCode::OK);
        assert_eq!(status_for(&router, "/client", freelancer_token).await, StatusCode::FORBIDDEN);
        assert_eq!(status_for(&router, "/any", freelancer_token).await, StatusCode::OK);
        assert_eq!(status_for(&router, "/any", client_token).await, StatusCode::OK);
        assert_eq!(status_for(&router, "/any", "garbage").await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_guard_without_gate_reports_missing_credential() {
        let router = Router::new()
            .route("/freelancer", get(|| async { "freelancer ok" }))
            .route_layer(middleware::from_fn(freelancer_only));

        let request = HttpRequest::builder()
            .uri("/freelancer")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    /// Store whose backing database is unreachable
    struct UnavailableStore;

    fn unavailable() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }

    #[async_trait]
    impl AccountStore for UnavailableStore {
        async fn create(&self, _new_account: NewAccount) -> Result<Account, StoreError> {
            Err(unavailable())
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Account>, StoreError> {
            Err(unavailable())
        }

        async fn find_many(&self, _ids: &[Uuid]) -> Result<Vec<Account>, StoreError> {
            Err(unavailable())
        }

        async fn find_credentials_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<AccountCredentials>, StoreError> {
            Err(unavailable())
        }

        async fn update_profile(
            &self,
            _id: Uuid,
            _update: &ProfileUpdate,
        ) -> Result<Option<Account>, StoreError> {
            Err(unavailable())
        }

        async fn deactivate(&self, _id: Uuid) -> Result<bool, StoreError> {
            Err(unavailable())
        }

        async fn list_freelancers(&self, _filter: &FreelancerFilter) -> Result<Vec<Account>, StoreError> {
            Err(unavailable())
        }
    }

    #[tokio::test]
    async fn test_store_failure_during_lookup_is_internal() {
        let gate = AuthGate::new(token_service(), Arc::new(UnavailableStore));
        let token = token_service()
            .issue(Uuid::new_v4(), "asha@example.com", Role::Freelancer, Duration::hours(1))
            .unwrap();

        let result = gate.authenticate(&headers_with(&format!("Bearer {}", token))).await;
        assert!(matches!(result, Err(AuthError::InternalFailure(_))));

        let request = HttpRequest::builder()
            .uri("/any")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = guarded_router(gate).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Server error in authentication");
        assert!(body["error"].as_str().is_some_and(|detail| !detail.is_empty()));
    }
}
