pub mod comment;
pub mod post;
pub mod subtask;
pub mod task;
pub mod user;

pub use comment::Comment;
pub use post::{NewPost, Post, PostDetail, TaskDetail, Visibility, VoteCounts};
pub use subtask::{Progress, Subtask};
pub use task::Task;
pub use user::{NewUser, User, UserProfile};
