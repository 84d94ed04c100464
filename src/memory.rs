// In-memory account and service stores
//
// Used by the test suite and when no DATABASE_URL is configured. Records are
// kept in insertion order so listings match the SQL tie-breaking.

use std::sync::Arc;

use axum::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{
    models::{Account, AccountCredentials, NewAccount, ProfileUpdate},
    repository::{AccountStore, FreelancerFilter},
};
use crate::error::StoreError;
use crate::services::{
    models::{NewService, Service},
    query::ServiceFilter,
    repository::ServiceStore,
};

#[derive(Default)]
struct Tables {
    accounts: Vec<AccountCredentials>,
    services: Vec<Service>,
}

/// Shared handle; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create(&self, new_account: NewAccount) -> Result<Account, StoreError> {
        let mut tables = self.tables.write().await;
        let email = new_account.email.to_lowercase();
        if tables
            .accounts
            .iter()
            .any(|stored| stored.account.email.to_lowercase() == email)
        {
            return Err(StoreError::Duplicate("email"));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: new_account.email,
            full_name: new_account.full_name,
            phone: new_account.phone,
            city: new_account.city,
            role: new_account.role,
            skill: new_account.skill,
            experience: new_account.experience,
            description: new_account.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.push(AccountCredentials {
            account: account.clone(),
            password_hash: new_account.password_hash,
        });

        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|stored| stored.account.id == id)
            .map(|stored| stored.account.clone()))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .filter(|stored| ids.contains(&stored.account.id))
            .map(|stored| stored.account.clone())
            .collect())
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AccountCredentials>, StoreError> {
        let email = email.trim().to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|stored| stored.account.email.to_lowercase() == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .accounts
            .iter_mut()
            .find(|stored| stored.account.id == id)
            .map(|stored| {
                update.apply_to(&mut stored.account);
                stored.account.updated_at = Utc::now();
                stored.account.clone()
            }))
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.accounts.iter_mut().find(|stored| stored.account.id == id) {
            Some(stored) => {
                stored.account.is_active = false;
                stored.account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_freelancers(&self, filter: &FreelancerFilter) -> Result<Vec<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .map(|stored| &stored.account)
            .filter(|account| filter.matches(account))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ServiceStore for MemoryStore {
    async fn create(&self, new_service: NewService) -> Result<Service, StoreError> {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            user_id: new_service.user_id,
            title: new_service.title,
            category: new_service.category,
            description: new_service.description,
            price: new_service.price,
            delivery_time: new_service.delivery_time,
            features: new_service.features,
            images: new_service.images,
            rating: 0.0,
            total_orders: 0,
            is_active: true,
            views: 0,
            created_at: now,
            updated_at: now,
        };

        self.tables.write().await.services.push(service.clone());
        Ok(service)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.services.iter().find(|s| s.id == id).cloned())
    }

    async fn save(&self, service: &Service) -> Result<Option<Service>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .services
            .iter_mut()
            .find(|s| s.id == service.id)
            .map(|stored| {
                stored.title = service.title.clone();
                stored.category = service.category.clone();
                stored.description = service.description.clone();
                stored.price = service.price;
                stored.delivery_time = service.delivery_time.clone();
                stored.features = service.features.clone();
                stored.images = service.images.clone();
                stored.is_active = service.is_active;
                stored.updated_at = service.updated_at;
                stored.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.services.len();
        tables.services.retain(|s| s.id != id);
        Ok(tables.services.len() < before)
    }

    async fn record_view(&self, id: Uuid) -> Result<Option<Service>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.services.iter_mut().find(|s| s.id == id).map(|stored| {
            stored.views += 1;
            stored.clone()
        }))
    }

    async fn search(&self, filter: &ServiceFilter) -> Result<Vec<Service>, StoreError> {
        let tables = self.tables.read().await;
        let mut services = Vec::new();
        for service in &tables.services {
            let owner = tables
                .accounts
                .iter()
                .map(|stored| &stored.account)
                .find(|account| account.id == service.user_id);
            if filter.matches(service, owner) {
                services.push(service.clone());
            }
        }
        filter.sort(&mut services);

        Ok(services)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Service>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .services
            .iter()
            .filter(|s| s.user_id == user_id && s.is_active)
            .cloned()
            .collect())
    }
}
