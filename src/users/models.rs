// User directory and profile DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::{
    models::{non_blank, Account, ProfileUpdate},
    repository::FreelancerFilter,
};

/// Query string of `GET /api/users`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FreelancerQuery {
    /// Exact city match
    pub city: Option<String>,
    /// Exact skill match
    pub skill: Option<String>,
    /// Case-insensitive substring of full name or skill
    pub search: Option<String>,
}

impl From<FreelancerQuery> for FreelancerFilter {
    fn from(query: FreelancerQuery) -> Self {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());
        Self {
            city: present(query.city),
            skill: present(query.skill),
            search: present(query.search),
        }
    }
}

/// Profile update request DTO; empty strings leave the field unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub skill: Option<String>,
    pub experience: Option<String>,
    pub description: Option<String>,
}

impl From<ProfileUpdateRequest> for ProfileUpdate {
    fn from(request: ProfileUpdateRequest) -> Self {
        Self {
            full_name: non_blank(request.full_name),
            phone: non_blank(request.phone),
            city: non_blank(request.city),
            skill: non_blank(request.skill),
            experience: non_blank(request.experience),
            description: non_blank(request.description),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub success: bool,
    pub count: usize,
    pub users: Vec<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdatedResponse {
    pub success: bool,
    pub message: String,
    pub user: Account,
}
