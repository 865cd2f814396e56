// Protected handlers - routed behind jwt_auth_middleware + validate_user_middleware,
// so every handler here receives a ValidatedUser extension.
pub mod posts;
