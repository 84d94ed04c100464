// JWT token generation and validation service

use crate::auth::{error::AuthError, models::Role};
use crate::config::AuthConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account id
    pub email: String,
    pub role: Role,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

impl Claims {
    /// Parse the subject as an account id
    pub fn subject_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::MalformedToken)
    }
}

/// Token service for JWT operations
///
/// Stateless: verification needs only the shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl: Duration,
}

impl TokenService {
    /// Create a new TokenService from explicit configuration
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            default_ttl: Duration::seconds(config.token_ttl_seconds()),
        }
    }

    /// Lifetime applied by [`TokenService::issue_login_token`]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a signed token expiring `ttl` after now
    pub fn issue(
        &self,
        subject_id: Uuid,
        email: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            role,
            iat: now,
            exp: now + ttl.num_seconds(),
        };

        self.sign(&claims)
    }

    /// Issue a token with the configured login lifetime
    pub fn issue_login_token(&self, subject_id: Uuid, email: &str, role: Role) -> Result<String, AuthError> {
        self.issue(subject_id, email, role, self.default_ttl)
    }

    /// Sign arbitrary claims with the configured secret
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalFailure(format!("token signing failed: {}", e)))
    }

    /// Verify signature and expiry against the current time
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify signature and expiry against an explicit unix timestamp
    ///
    /// Expired means `now >= exp`; no leeway is granted.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::MalformedToken)?;

        if now >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }
}
