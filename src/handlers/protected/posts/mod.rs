// handlers/protected/posts/mod.rs - Posts and votes

pub mod post;
pub mod votes;

pub use post::{post_create, post_get};
pub use votes::{downvote_post, upvote_post};
