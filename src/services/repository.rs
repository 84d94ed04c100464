// Service listing persistence

use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::query::{SqlParam, SqlQueryBuilder};
use crate::services::{
    models::{NewService, Service},
    query::ServiceFilter,
};

/// Persistence boundary for service listings
#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn create(&self, new_service: NewService) -> Result<Service, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, StoreError>;

    /// Write back every mutable field; `None` if the row vanished meanwhile
    async fn save(&self, service: &Service) -> Result<Option<Service>, StoreError>;

    /// Hard delete; false when nothing was removed
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Increment the view counter and return the updated record
    async fn record_view(&self, id: Uuid) -> Result<Option<Service>, StoreError>;

    /// Active services matching the filter, ordered by its sort
    async fn search(&self, filter: &ServiceFilter) -> Result<Vec<Service>, StoreError>;

    /// Active services of one owner, oldest first
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Service>, StoreError>;
}

const SERVICE_COLUMNS: &str = "s.id, s.user_id, s.title, s.category, s.description, s.price, \
     s.delivery_time, s.features, s.images, s.rating, s.total_orders, s.is_active, s.views, \
     s.created_at, s.updated_at";

const RETURNING_COLUMNS: &str = "id, user_id, title, category, description, price, delivery_time, \
     features, images, rating, total_orders, is_active, views, created_at, updated_at";

/// PostgreSQL-backed service store
#[derive(Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    /// Create a new ServiceRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceStore for ServiceRepository {
    async fn create(&self, new_service: NewService) -> Result<Service, StoreError> {
        let sql = format!(
            "INSERT INTO services (id, user_id, title, category, description, price, delivery_time, features, images) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            RETURNING_COLUMNS
        );

        let service = sqlx::query_as::<_, Service>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_service.user_id)
            .bind(&new_service.title)
            .bind(&new_service.category)
            .bind(&new_service.description)
            .bind(new_service.price)
            .bind(&new_service.delivery_time)
            .bind(&new_service.features)
            .bind(&new_service.images)
            .fetch_one(&self.pool)
            .await?;

        Ok(service)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, StoreError> {
        let sql = format!("SELECT {} FROM services s WHERE s.id = $1", SERVICE_COLUMNS);
        let service = sqlx::query_as::<_, Service>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(service)
    }

    async fn save(&self, service: &Service) -> Result<Option<Service>, StoreError> {
        let sql = format!(
            r#"
            UPDATE services
            SET title = $2,
                category = $3,
                description = $4,
                price = $5,
                delivery_time = $6,
                features = $7,
                images = $8,
                is_active = $9,
                updated_at = $10
            WHERE id = $1
            RETURNING {}
            "#,
            RETURNING_COLUMNS
        );

        let saved = sqlx::query_as::<_, Service>(&sql)
            .bind(service.id)
            .bind(&service.title)
            .bind(&service.category)
            .bind(&service.description)
            .bind(service.price)
            .bind(&service.delivery_time)
            .bind(&service.features)
            .bind(&service.images)
            .bind(service.is_active)
            .bind(service.updated_at)
            .fetch_optional(&self.pool)
            .await?;

        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_view(&self, id: Uuid) -> Result<Option<Service>, StoreError> {
        let sql = format!(
            "UPDATE services SET views = views + 1 WHERE id = $1 RETURNING {}",
            RETURNING_COLUMNS
        );
        let service = sqlx::query_as::<_, Service>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(service)
    }

    async fn search(&self, filter: &ServiceFilter) -> Result<Vec<Service>, StoreError> {
        let mut builder = SqlQueryBuilder::new(format!(
            "SELECT {} FROM services s LEFT JOIN users u ON u.id = s.user_id",
            SERVICE_COLUMNS
        ));
        builder.add_condition("s.is_active = TRUE");

        if let Some(ref category) = filter.category {
            builder.add_filter("s.category = {}", SqlParam::Text(category.clone()));
        }
        if let Some(ref city) = filter.city {
            builder.add_filter("u.city = {}", SqlParam::Text(city.clone()));
        }
        if let Some(min) = filter.min_price {
            builder.add_filter("s.price >= {}", SqlParam::Float(min));
        }
        if let Some(max) = filter.max_price {
            builder.add_filter("s.price <= {}", SqlParam::Float(max));
        }
        if let Some(ref search) = filter.search {
            builder.add_contains_any(&["s.title", "s.description"], search);
        }
        builder.set_order(filter.sort.order_clause());

        let (sql, params) = builder.build();
        tracing::debug!("Searching services: {}", sql);

        let mut query = sqlx::query_as::<_, Service>(&sql);
        for param in params {
            query = match param {
                SqlParam::Text(value) => query.bind(value),
                SqlParam::Float(value) => query.bind(value),
            };
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Service>, StoreError> {
        let sql = format!(
            "SELECT {} FROM services s WHERE s.user_id = $1 AND s.is_active = TRUE \
             ORDER BY s.created_at ASC, s.id ASC",
            SERVICE_COLUMNS
        );
        let services = sqlx::query_as::<_, Service>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(services)
    }
}
