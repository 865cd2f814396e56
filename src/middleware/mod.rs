pub mod auth;
pub mod validate_user;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use validate_user::{validate_user_middleware, ValidatedUser};
