// handlers/protected/auth/mod.rs - Account management for the signed-in user

pub mod account;
pub mod whoami;

pub use account::{details_put, password_put, security_qa_put};
pub use whoami::whoami_get;
