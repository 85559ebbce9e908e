// handlers/public/auth/mod.rs - Token acquisition and account recovery

pub mod login;
pub mod recovery;
pub mod register;

pub use login::login_post;
pub use recovery::{forgot_password_post, reset_password_post, security_answer_post};
pub use register::register_post;
