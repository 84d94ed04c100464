// Account data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation::{validate_email_address, validate_not_blank, validate_phone};

/// Account kind; the two variants are mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Freelancer,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Freelancer => "freelancer",
            Role::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account record as returned by the store (no credential)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    #[schema(example = "priya@example.com")]
    pub email: String,
    #[schema(example = "Priya Patel")]
    pub full_name: String,
    #[schema(example = "+91 98765 43211")]
    pub phone: String,
    #[schema(example = "Bangalore")]
    pub city: String,
    #[sqlx(rename = "user_type")]
    #[serde(rename = "userType")]
    pub role: Role,
    #[schema(example = "Graphic Design")]
    pub skill: Option<String>,
    #[schema(example = "5 years")]
    pub experience: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account record together with its password hash; only the login path reads this
#[derive(Debug, Clone, FromRow)]
pub struct AccountCredentials {
    #[sqlx(flatten)]
    pub account: Account,
    pub password_hash: String,
}

/// Fields needed to insert a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: String,
    pub city: String,
    pub role: Role,
    pub skill: Option<String>,
    pub experience: Option<String>,
    pub description: Option<String>,
}

/// Profile fields a user may change about themselves
/// `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub skill: Option<String>,
    pub experience: Option<String>,
    pub description: Option<String>,
}

impl ProfileUpdate {
    /// Applies the update to an in-memory record
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(ref full_name) = self.full_name {
            account.full_name = full_name.clone();
        }
        if let Some(ref phone) = self.phone {
            account.phone = phone.clone();
        }
        if let Some(ref city) = self.city {
            account.city = city.clone();
        }
        if let Some(ref skill) = self.skill {
            account.skill = Some(skill.clone());
        }
        if let Some(ref experience) = self.experience {
            account.experience = Some(experience.clone());
        }
        if let Some(ref description) = self.description {
            account.description = Some(description.clone());
        }
    }
}

/// Signup request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_freelancer_fields", skip_on_field_errors = false))]
pub struct SignupRequest {
    #[validate(custom(function = "validate_email_address", message = "Please provide a valid email"))]
    #[schema(example = "priya@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(custom(function = "validate_not_blank", message = "Full name is required"))]
    pub full_name: String,
    #[validate(custom(function = "validate_phone", message = "Please provide a valid phone number"))]
    pub phone: String,
    #[validate(custom(function = "validate_not_blank", message = "City is required"))]
    pub city: String,
    #[serde(rename = "userType")]
    pub role: Role,
    pub skill: Option<String>,
    pub experience: Option<String>,
    pub description: Option<String>,
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Freelancers must describe their skill and experience
fn validate_freelancer_fields(request: &SignupRequest) -> Result<(), ValidationError> {
    if request.role == Role::Freelancer && !(has_text(&request.skill) && has_text(&request.experience)) {
        let mut error = ValidationError::new("freelancer_profile_incomplete");
        error.message = Some("Freelancers must provide skill and experience".into());
        return Err(error);
    }
    Ok(())
}

/// Trims optional text, mapping blank values to `None`
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SignupRequest {
    /// Converts the validated request into a store insert
    pub fn into_new_account(self, password_hash: String) -> NewAccount {
        NewAccount {
            email: normalize_email(&self.email),
            password_hash,
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            city: self.city.trim().to_string(),
            role: self.role,
            skill: non_blank(self.skill),
            experience: non_blank(self.experience),
            description: non_blank(self.description),
        }
    }
}

/// Emails are compared case-insensitively and stored lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Login request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_email_address", message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Signup and login response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: Account,
}

/// Single-account response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub success: bool,
    pub user: Account,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(role: Role, skill: Option<&str>, experience: Option<&str>) -> SignupRequest {
        SignupRequest {
            email: "Priya@Example.com ".to_string(),
            password: "secret1".to_string(),
            full_name: " Priya Patel ".to_string(),
            phone: "+91 98765 43211".to_string(),
            city: "Bangalore".to_string(),
            role,
            skill: skill.map(String::from),
            experience: experience.map(String::from),
            description: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Freelancer).unwrap(), "\"freelancer\"");
        let parsed: Role = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(parsed, Role::Client);
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn test_freelancer_requires_skill_and_experience() {
        assert!(signup(Role::Freelancer, Some("Graphic Design"), None).validate().is_err());
        assert!(signup(Role::Freelancer, Some("Graphic Design"), Some("5 years")).validate().is_ok());
        assert!(signup(Role::Client, None, None).validate().is_ok());
    }

    #[test]
    fn test_email_with_surrounding_spaces_is_accepted() {
        let mut request = signup(Role::Client, None, None);
        request.email = "  priya@example.com\t".to_string();
        assert!(request.validate().is_ok());

        request.email = "priya at example".to_string();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_short_password_is_rejected() {
        let mut request = signup(Role::Client, None, None);
        request.password = "12345".to_string();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_into_new_account_normalizes_fields() {
        let account = signup(Role::Client, None, None).into_new_account("hash".to_string());
        assert_eq!(account.email, "priya@example.com");
        assert_eq!(account.full_name, "Priya Patel");
        assert_eq!(account.description, None);
    }

    #[test]
    fn test_signup_deserializes_camel_case() {
        let json = r#"{
            "email": "rahul@example.com",
            "password": "secret1",
            "fullName": "Rahul Sharma",
            "phone": "+91 98765 43210",
            "city": "Mumbai",
            "userType": "freelancer",
            "skill": "Web Development",
            "experience": "3 years"
        }"#;
        let request: SignupRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.role, Role::Freelancer);
        assert_eq!(request.full_name, "Rahul Sharma");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_account_serialization_has_no_credential() {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            full_name: "A".to_string(),
            phone: "+91 98765 43210".to_string(),
            city: "Pune".to_string(),
            role: Role::Client,
            skill: None,
            experience: None,
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["userType"], "client");
        assert_eq!(json["fullName"], "A");
        assert_eq!(json["isActive"], true);
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
