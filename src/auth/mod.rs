// Authentication module
// Stateless bearer tokens, a live account check per request, role guards and ownership checks

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod ownership;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, me_handler, signup_handler};
pub use middleware::{
    client_only, freelancer_only, require_auth, AuthGate, AuthenticatedUser, RequireRole,
    VerifiedIdentity,
};
pub use models::{Account, AuthResponse, LoginRequest, Role, SignupRequest};
pub use ownership::{authorize_mutation, OwnedResource};
pub use repository::{AccountStore, FreelancerFilter, UserRepository};
pub use service::AuthService;
pub use token::{Claims, TokenService};
