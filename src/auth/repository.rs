// Account persistence: the store contract and its PostgreSQL implementation

use axum::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::models::{Account, AccountCredentials, NewAccount, ProfileUpdate, Role};
use crate::db::is_unique_violation;
use crate::error::StoreError;
use crate::query::{SqlParam, SqlQueryBuilder};

/// Filters for the public freelancer directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreelancerFilter {
    /// Exact city match
    pub city: Option<String>,
    /// Exact skill match
    pub skill: Option<String>,
    /// Case-insensitive substring of full name or skill
    pub search: Option<String>,
}

impl FreelancerFilter {
    /// True when `account` belongs in the directory under this filter
    pub fn matches(&self, account: &Account) -> bool {
        if account.role != Role::Freelancer || !account.is_active {
            return false;
        }
        if let Some(ref city) = self.city {
            if &account.city != city {
                return false;
            }
        }
        if let Some(ref skill) = self.skill {
            if account.skill.as_ref() != Some(skill) {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            let in_name = account.full_name.to_lowercase().contains(&needle);
            let in_skill = account
                .skill
                .as_deref()
                .map(|s| s.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !in_name && !in_skill {
                return false;
            }
        }
        true
    }
}

/// Persistence boundary for account records
///
/// Every read except [`AccountStore::find_credentials_by_email`] excludes the password hash.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account; a taken email yields `StoreError::Duplicate("email")`
    async fn create(&self, new_account: NewAccount) -> Result<Account, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Fetch several accounts at once; unknown ids are skipped
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Account>, StoreError>;

    /// Case-insensitive email lookup including the password hash
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountCredentials>, StoreError>;

    /// Apply a profile update; `None` when the account does not exist
    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, StoreError>;

    /// Soft delete; returns false when the account does not exist
    async fn deactivate(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Active freelancers matching the filter, oldest first
    async fn list_freelancers(&self, filter: &FreelancerFilter) -> Result<Vec<Account>, StoreError>;
}

const ACCOUNT_COLUMNS: &str = "id, email, full_name, phone, city, user_type, skill, experience, \
     description, is_active, created_at, updated_at";

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for UserRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, full_name, phone, city, user_type, skill, experience, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            ACCOUNT_COLUMNS
        );

        sqlx::query_as::<_, Account>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_account.email)
            .bind(&new_account.password_hash)
            .bind(&new_account.full_name)
            .bind(&new_account.phone)
            .bind(&new_account.city)
            .bind(new_account.role)
            .bind(&new_account.skill)
            .bind(&new_account.experience)
            .bind(&new_account.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate("email")
                } else {
                    StoreError::Database(e)
                }
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", ACCOUNT_COLUMNS);
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Account>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", ACCOUNT_COLUMNS);
        let accounts = sqlx::query_as::<_, Account>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountCredentials>, StoreError> {
        let sql = format!(
            "SELECT {}, password_hash FROM users WHERE LOWER(email) = LOWER($1)",
            ACCOUNT_COLUMNS
        );
        let credentials = sqlx::query_as::<_, AccountCredentials>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(credentials)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, StoreError> {
        let sql = format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                city = COALESCE($4, city),
                skill = COALESCE($5, skill),
                experience = COALESCE($6, experience),
                description = COALESCE($7, description),
                updated_at = $8
            WHERE id = $1
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        );

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .bind(&update.full_name)
            .bind(&update.phone)
            .bind(&update.city)
            .bind(&update.skill)
            .bind(&update.experience)
            .bind(&update.description)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_freelancers(&self, filter: &FreelancerFilter) -> Result<Vec<Account>, StoreError> {
        let mut builder = SqlQueryBuilder::new(format!("SELECT {} FROM users", ACCOUNT_COLUMNS));
        builder
            .add_condition("user_type = 'freelancer'")
            .add_condition("is_active = TRUE");

        if let Some(ref city) = filter.city {
            builder.add_filter("city = {}", SqlParam::Text(city.clone()));
        }
        if let Some(ref skill) = filter.skill {
            builder.add_filter("skill = {}", SqlParam::Text(skill.clone()));
        }
        if let Some(ref search) = filter.search {
            builder.add_contains_any(&["full_name", "skill"], search);
        }
        builder.set_order("created_at ASC, id ASC");

        let (sql, params) = builder.build();
        tracing::debug!("Listing freelancers: {}", sql);

        let mut query = sqlx::query_as::<_, Account>(&sql);
        for param in params {
            query = match param {
                SqlParam::Text(value) => query.bind(value),
                SqlParam::Float(value) => query.bind(value),
            };
        }

        Ok(query.fetch_all(&self.pool).await?)
    }
}
