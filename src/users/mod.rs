// Freelancer directory and self-service profile routes

pub mod handlers;
pub mod models;
