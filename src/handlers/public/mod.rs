// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account creation, login and password recovery, plus read-only user profiles.

pub mod auth;
pub mod users;
