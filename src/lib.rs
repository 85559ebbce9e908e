pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod relations;
pub mod routes;
pub mod state;
pub mod validation;

pub use routes::app;
pub use state::AppState;
