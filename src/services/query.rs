// Query parameters for the public service listing

use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::models::Account;
use crate::error::ApiError;
use crate::services::models::Service;

/// Raw query string of `GET /api/services`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ServiceQuery {
    /// Exact category match
    pub category: Option<String>,
    /// Owner's city, exact match
    pub city: Option<String>,
    /// Inclusive lower price bound
    #[param(value_type = Option<f64>)]
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    #[param(value_type = Option<f64>)]
    pub max_price: Option<String>,
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    /// `price_low`, `price_high`, `rating` or `newest`
    pub sort: Option<String>,
}

/// Result ordering; unknown values keep insertion order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServiceSort {
    #[default]
    Insertion,
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
}

impl ServiceSort {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("price_low") => ServiceSort::PriceLow,
            Some("price_high") => ServiceSort::PriceHigh,
            Some("rating") => ServiceSort::Rating,
            Some("newest") => ServiceSort::Newest,
            _ => ServiceSort::Insertion,
        }
    }

    /// ORDER BY clause over the `s` alias; ties fall back to insertion order
    pub fn order_clause(&self) -> &'static str {
        match self {
            ServiceSort::Insertion => "s.created_at ASC, s.id ASC",
            ServiceSort::PriceLow => "s.price ASC, s.created_at ASC, s.id ASC",
            ServiceSort::PriceHigh => "s.price DESC, s.created_at ASC, s.id ASC",
            ServiceSort::Rating => "s.rating DESC, s.created_at ASC, s.id ASC",
            ServiceSort::Newest => "s.created_at DESC, s.id ASC",
        }
    }
}

/// Normalized listing filter handed to the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceFilter {
    pub category: Option<String>,
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub sort: ServiceSort,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn price_bound(name: &str, value: Option<String>) -> Result<Option<f64>, ApiError> {
    match present(value) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite())
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("{} must be a number", name))),
    }
}

impl TryFrom<ServiceQuery> for ServiceFilter {
    type Error = ApiError;

    fn try_from(query: ServiceQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            sort: ServiceSort::parse(query.sort.as_deref()),
            category: present(query.category),
            city: present(query.city),
            min_price: price_bound("minPrice", query.min_price)?,
            max_price: price_bound("maxPrice", query.max_price)?,
            search: present(query.search),
        })
    }
}

impl ServiceFilter {
    /// True when an active `service` owned by `owner` passes every filter
    pub fn matches(&self, service: &Service, owner: Option<&Account>) -> bool {
        if !service.is_active {
            return false;
        }
        if let Some(ref category) = self.category {
            if &service.category != category {
                return false;
            }
        }
        if let Some(ref city) = self.city {
            if owner.map(|o| &o.city) != Some(city) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if service.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if service.price > max {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            if !service.title.to_lowercase().contains(&needle)
                && !service.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    /// Stable in-place sort matching [`ServiceSort::order_clause`]
    pub fn sort(&self, services: &mut [Service]) {
        match self.sort {
            ServiceSort::Insertion => {}
            ServiceSort::PriceLow => services.sort_by(|a, b| a.price.total_cmp(&b.price)),
            ServiceSort::PriceHigh => services.sort_by(|a, b| b.price.total_cmp(&a.price)),
            ServiceSort::Rating => services.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            ServiceSort::Newest => services.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn service(title: &str, price: f64, rating: f64, minutes_ago: i64) -> Service {
        let created = Utc::now() - Duration::minutes(minutes_ago);
        Service {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            category: "Tutoring".to_string(),
            description: "Weekly maths and science lessons at home".to_string(),
            price,
            delivery_time: "1 week".to_string(),
            features: vec![],
            images: vec![],
            rating,
            total_orders: 0,
            is_active: true,
            views: 0,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(ServiceSort::parse(Some("price_low")), ServiceSort::PriceLow);
        assert_eq!(ServiceSort::parse(Some("newest")), ServiceSort::Newest);
        assert_eq!(ServiceSort::parse(Some("cheapest")), ServiceSort::Insertion);
        assert_eq!(ServiceSort::parse(None), ServiceSort::Insertion);
    }

    #[test]
    fn test_empty_query_values_are_ignored() {
        let filter = ServiceFilter::try_from(ServiceQuery {
            category: Some(String::new()),
            min_price: Some(String::new()),
            max_price: Some("  ".to_string()),
            search: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter, ServiceFilter::default());
    }

    #[test]
    fn test_price_bounds_are_parsed() {
        let filter = ServiceFilter::try_from(ServiceQuery {
            min_price: Some("100".to_string()),
            max_price: Some(" 2500.5 ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.min_price, Some(100.0));
        assert_eq!(filter.max_price, Some(2500.5));
    }

    #[test]
    fn test_non_numeric_price_bound_is_rejected() {
        let result = ServiceFilter::try_from(ServiceQuery {
            min_price: Some("abc".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ApiError::BadRequest(ref message)) if message == "minPrice must be a number"));
    }

    #[test]
    fn test_search_matches_title_or_description() {
        let filter = ServiceFilter {
            search: Some("MATHS".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&service("Home tuition classes", 500.0, 4.0, 1), None));

        let filter = ServiceFilter {
            search: Some("guitar".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&service("Home tuition classes", 500.0, 4.0, 1), None));
    }

    #[test]
    fn test_inactive_never_matches() {
        let mut hidden = service("Home tuition classes", 500.0, 4.0, 1);
        hidden.is_active = false;
        assert!(!ServiceFilter::default().matches(&hidden, None));
    }

    #[test]
    fn test_city_filter_needs_owner() {
        let filter = ServiceFilter {
            city: Some("Pune".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&service("Home tuition classes", 500.0, 4.0, 1), None));
    }

    #[test]
    fn test_newest_and_rating_order() {
        let mut services = vec![
            service("Older listing here", 10.0, 3.0, 30),
            service("Newer listing here", 20.0, 5.0, 5),
            service("Middle listing here", 30.0, 4.0, 10),
        ];

        ServiceFilter { sort: ServiceSort::Newest, ..Default::default() }.sort(&mut services);
        assert_eq!(services[0].title, "Newer listing here");
        assert_eq!(services[2].title, "Older listing here");

        ServiceFilter { sort: ServiceSort::Rating, ..Default::default() }.sort(&mut services);
        let ratings: Vec<f64> = services.iter().map(|s| s.rating).collect();
        assert_eq!(ratings, vec![5.0, 4.0, 3.0]);
    }

    proptest! {
        #[test]
        fn prop_price_bounds_are_inclusive(
            price in 0.0f64..10_000.0,
            min in 0.0f64..10_000.0,
            max in 0.0f64..10_000.0,
        ) {
            let filter = ServiceFilter {
                min_price: Some(min),
                max_price: Some(max),
                ..Default::default()
            };
            let expected = price >= min && price <= max;
            prop_assert_eq!(filter.matches(&service("Home tuition classes", price, 0.0, 1), None), expected);
        }

        #[test]
        fn prop_price_low_sort_is_ascending(prices in prop::collection::vec(0.0f64..10_000.0, 0..20)) {
            let mut services: Vec<Service> = prices
                .iter()
                .map(|p| service("Home tuition classes", *p, 0.0, 1))
                .collect();
            ServiceFilter { sort: ServiceSort::PriceLow, ..Default::default() }.sort(&mut services);
            prop_assert!(services.windows(2).all(|w| w[0].price <= w[1].price));
        }
    }
}
