// handlers/mod.rs - two security tiers
//
// Public (no auth): reads of posts, account creation, token acquisition
// Protected (bearer token naming an existing user): post mutations
pub mod public;
pub mod protected;
