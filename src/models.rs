// Response envelopes shared across route groups

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// `{ success: true, message }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    #[schema(example = "Service deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Liveness check body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    #[schema(example = "ok")]
    pub status: String,
}

/// Path ids that are not UUIDs cannot name any record
pub fn parse_path_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}
