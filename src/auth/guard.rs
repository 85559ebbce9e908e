//! Permit/deny decisions, re-evaluated on every request.

use tracing::warn;
use uuid::Uuid;

use crate::database::models::{Post, Visibility};
use crate::error::ApiError;
use crate::middleware::Caller;
use crate::relations::IdSet;

/// Caller may act if they own the resource or are one of its collaborators
pub fn permit(caller: Uuid, owner: Uuid, collaborators: &IdSet) -> bool {
    caller == owner || collaborators.contains(&caller)
}

/// The verified caller must be the subject named in the path or body
pub fn require_identity(caller: &Caller, subject: Uuid) -> Result<(), ApiError> {
    if caller.id == subject {
        Ok(())
    } else {
        warn!(caller = %caller.id, %subject, "identity mismatch");
        Err(ApiError::invalid_credentials("Invalid Credentials!"))
    }
}

pub fn require_post_access(caller: &Caller, post: &Post) -> Result<(), ApiError> {
    if permit(caller.id, post.creator_id, &post.authorized_users) {
        Ok(())
    } else {
        warn!(caller = %caller.id, post = %post.id, "caller is neither owner nor collaborator");
        Err(ApiError::unauthorized("Unauthorized request!"))
    }
}

/// Public posts are readable by anyone signed in; private ones only by owner and collaborators
pub fn require_post_visibility(caller: &Caller, post: &Post) -> Result<(), ApiError> {
    match post.visibility {
        Visibility::Public => Ok(()),
        Visibility::Private => require_post_access(caller, post),
    }
}
