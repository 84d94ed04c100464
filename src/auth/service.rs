// Authentication service - signup and login

use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    models::{normalize_email, Account, LoginRequest, SignupRequest},
    password::PasswordService,
    repository::AccountStore,
    token::TokenService,
};
use crate::error::{ApiError, StoreError};

/// Authentication service coordinating signup and login
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(accounts: Arc<dyn AccountStore>, tokens: TokenService) -> Self {
        Self { accounts, tokens }
    }

    /// Register a new account and issue its first token
    ///
    /// The request must already be validated.
    pub async fn signup(&self, request: SignupRequest) -> Result<(String, Account), ApiError> {
        let password_hash = PasswordService::hash_password(&request.password)?;
        let new_account = request.into_new_account(password_hash);

        let account = self.accounts.create(new_account).await.map_err(|e| match e {
            StoreError::Duplicate(_) => ApiError::from(AuthError::EmailAlreadyExists),
            other => ApiError::store("Error creating account")(other),
        })?;

        let token = self
            .tokens
            .issue_login_token(account.id, &account.email, account.role)?;

        tracing::info!("Created {} account {}", account.role, account.id);
        Ok((token, account))
    }

    /// Check credentials and issue a token
    pub async fn login(&self, request: &LoginRequest) -> Result<(String, Account), ApiError> {
        let email = normalize_email(&request.email);

        let credentials = self
            .accounts
            .find_credentials_by_email(&email)
            .await
            .map_err(ApiError::store("Error logging in"))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(&request.password, &credentials.password_hash)? {
            tracing::warn!("Failed login for account {}", credentials.account.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        let account = credentials.account;
        if !account.is_active {
            return Err(AuthError::AccountDeactivated.into());
        }

        let token = self
            .tokens
            .issue_login_token(account.id, &account.email, account.role)?;

        tracing::debug!("Account {} logged in", account.id);
        Ok((token, account))
    }
}
