// handlers/protected/users/mod.rs - Follow and block relations

pub mod blocked;
pub mod relations;

pub use blocked::blocked_get;
pub use relations::{block_post, follow_post, unblock_delete, unfollow_delete};
