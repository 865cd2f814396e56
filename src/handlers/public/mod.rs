// Public handlers - no authentication required
pub mod posts;
pub mod sessions;
pub mod users;
