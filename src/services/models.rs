// Service listing models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{models::Account, ownership::OwnedResource};
use crate::validation::{
    validate_category, validate_delivery_time, validate_description, validate_price, validate_title,
};

/// Service listing as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    /// Owning account; fixed at creation
    pub user_id: Uuid,
    #[schema(example = "Responsive business website")]
    pub title: String,
    #[schema(example = "Web Development")]
    pub category: String,
    pub description: String,
    #[schema(example = 15000.0)]
    pub price: f64,
    #[schema(example = "1 week")]
    pub delivery_time: String,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub rating: f64,
    pub total_orders: i32,
    pub is_active: bool,
    pub views: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for Service {
    const RESOURCE: &'static str = "service";

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Fields needed to insert a new service
#[derive(Debug, Clone)]
pub struct NewService {
    pub user_id: Uuid,
    pub title: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub delivery_time: String,
    pub features: Vec<String>,
    pub images: Vec<String>,
}

/// Features may arrive as a list or as newline-separated text
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FeaturesInput {
    List(Vec<String>),
    Text(String),
}

impl FeaturesInput {
    /// Trimmed feature lines with blanks removed
    pub fn into_features(self) -> Vec<String> {
        let lines: Vec<String> = match self {
            FeaturesInput::List(items) => items,
            FeaturesInput::Text(text) => text.lines().map(String::from).collect(),
        };
        lines
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Create service request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    #[validate(custom(function = "validate_title", message = "Title must be at least 10 characters"))]
    pub title: String,
    #[validate(custom(function = "validate_category", message = "Please select a valid category"))]
    pub category: String,
    #[validate(custom(
        function = "validate_description",
        message = "Description must be at least 20 characters"
    ))]
    pub description: String,
    #[validate(custom(function = "validate_price", message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(custom(function = "validate_delivery_time", message = "Please select a valid delivery time"))]
    pub delivery_time: String,
    pub features: Option<FeaturesInput>,
    pub images: Option<Vec<String>>,
}

impl CreateServiceRequest {
    /// Converts the validated request into a store insert owned by `user_id`
    pub fn into_new_service(self, user_id: Uuid) -> NewService {
        NewService {
            user_id,
            title: self.title.trim().to_string(),
            category: self.category,
            description: self.description.trim().to_string(),
            price: self.price,
            delivery_time: self.delivery_time,
            features: self.features.map(FeaturesInput::into_features).unwrap_or_default(),
            images: self.images.unwrap_or_default(),
        }
    }
}

/// Partial update request DTO; omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    #[validate(custom(function = "validate_title", message = "Title must be at least 10 characters"))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_category", message = "Please select a valid category"))]
    pub category: Option<String>,
    #[validate(custom(
        function = "validate_description",
        message = "Description must be at least 20 characters"
    ))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price", message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(custom(function = "validate_delivery_time", message = "Please select a valid delivery time"))]
    pub delivery_time: Option<String>,
    pub features: Option<FeaturesInput>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl UpdateServiceRequest {
    /// Applies the update; `id`, `user_id` and counters are never touched
    pub fn apply_to(self, service: &mut Service) {
        if let Some(title) = self.title {
            service.title = title.trim().to_string();
        }
        if let Some(category) = self.category {
            service.category = category;
        }
        if let Some(description) = self.description {
            service.description = description.trim().to_string();
        }
        if let Some(price) = self.price {
            service.price = price;
        }
        if let Some(delivery_time) = self.delivery_time {
            service.delivery_time = delivery_time;
        }
        if let Some(features) = self.features {
            service.features = features.into_features();
        }
        if let Some(images) = self.images {
            service.images = images;
        }
        if let Some(is_active) = self.is_active {
            service.is_active = is_active;
        }
        service.updated_at = Utc::now();
    }
}

/// Service together with its owner's public profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceListing {
    #[serde(flatten)]
    pub service: Service,
    pub user: Option<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceResponse {
    pub success: bool,
    pub service: ServiceListing,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceMutationResponse {
    pub success: bool,
    pub message: String,
    pub service: ServiceListing,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceListResponse {
    pub success: bool,
    pub count: usize,
    pub services: Vec<ServiceListing>,
}
