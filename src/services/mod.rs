// Service listings: the owned resource of the marketplace

pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;

pub use models::{Service, ServiceListing};
pub use query::{ServiceFilter, ServiceQuery, ServiceSort};
pub use repository::{ServiceRepository, ServiceStore};
