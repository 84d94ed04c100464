// Validation utilities module
// Provides custom validation functions for marketplace-specific rules

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

/// Service categories accepted by the marketplace
pub const SERVICE_CATEGORIES: [&str; 12] = [
    "Web Development",
    "Mobile Development",
    "Graphic Design",
    "Content Writing",
    "Digital Marketing",
    "Tutoring",
    "Photography",
    "Plumbing",
    "Electrical Work",
    "Carpentry",
    "Music Lessons",
    "Fitness Training",
];

/// Delivery windows a freelancer can promise
pub const DELIVERY_TIMES: [&str; 7] = [
    "1 day", "2 days", "3 days", "5 days", "1 week", "2 weeks", "1 month",
];

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").expect("phone regex is valid"))
}

/// Validates that a category is one of [`SERVICE_CATEGORIES`] (exact match)
pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if SERVICE_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_category"))
    }
}

/// Validates that a delivery time is one of [`DELIVERY_TIMES`] (exact match)
pub fn validate_delivery_time(delivery_time: &str) -> Result<(), ValidationError> {
    if DELIVERY_TIMES.contains(&delivery_time) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_delivery_time"))
    }
}

/// Validates that price is not negative
pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("price_cannot_be_negative"))
    }
}

/// Validates a phone number: digits with optional leading `+`, spaces and dashes
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone_regex().is_match(phone.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone"))
    }
}

/// Validates an email address once surrounding whitespace is removed
pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if validator::validate_email(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

/// Validates that a text field still has content after trimming
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// Validates a minimum length measured on the trimmed value
pub fn validate_trimmed_min_length(value: &str, min: usize) -> Result<(), ValidationError> {
    if value.trim().chars().count() >= min {
        Ok(())
    } else {
        Err(ValidationError::new("too_short"))
    }
}

/// Validates a service title: at least 10 characters once trimmed
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    validate_trimmed_min_length(title, 10)
}

/// Validates a service description: at least 20 characters once trimmed
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    validate_trimmed_min_length(description, 20)
}
