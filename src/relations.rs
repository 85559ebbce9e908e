//! Many-to-many relations stored as identifier lists on each document.
//!
//! Every helper here updates both ends of a relation in memory, so the two
//! documents can never disagree after a successful call. Persisting them is
//! the caller's job and takes one save per document. There is no cross-document
//! transaction: if the second save fails the first one stays committed. A
//! saga with a compensating write (or a store transaction) would close that
//! gap; neither exists today.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Post, User};

/// Ordered, duplicate-free list of identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Uuid>", into = "Vec<Uuid>")]
pub struct IdSet(Vec<Uuid>);

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.0.contains(id)
    }

    /// Returns false if the id was already present
    pub fn insert(&mut self, id: Uuid) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Returns false if the id was absent
    pub fn remove(&mut self, id: &Uuid) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Uuid> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Uuid] {
        &self.0
    }
}

impl From<Vec<Uuid>> for IdSet {
    fn from(ids: Vec<Uuid>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<IdSet> for Vec<Uuid> {
    fn from(set: IdSet) -> Self {
        set.0
    }
}

impl FromIterator<Uuid> for IdSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        let mut set = IdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a IdSet {
    type Item = &'a Uuid;
    type IntoIter = std::slice::Iter<'a, Uuid>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationError {
    #[error("You cannot {0} yourself!")]
    SelfRelation(&'static str),

    #[error("User is already followed by the follower!")]
    AlreadyFollowing,

    #[error("User is not followed by the follower!")]
    NotFollowing,

    #[error("User is already blocked!")]
    AlreadyBlocked,

    #[error("User is not blocked!")]
    NotBlocked,

    #[error("Post is already upvoted!")]
    AlreadyUpvoted,

    #[error("Post is already downvoted!")]
    AlreadyDownvoted,
}

/// `follower` starts following `followee`
///
/// The precondition reads the follower's list only. That is the document
/// saved first, so a half-written follow stays one-sided and a retry is
/// rejected.
pub fn follow(follower: &mut User, followee: &mut User) -> Result<(), RelationError> {
    if follower.id == followee.id {
        return Err(RelationError::SelfRelation("follow"));
    }
    if follower.following.contains(&followee.id) {
        return Err(RelationError::AlreadyFollowing);
    }

    follower.following.insert(followee.id);
    followee.followers.insert(follower.id);
    Ok(())
}

/// `follower` stops following `followee`; rejected unless the follower's list records it
pub fn unfollow(follower: &mut User, followee: &mut User) -> Result<(), RelationError> {
    if !follower.following.remove(&followee.id) {
        return Err(RelationError::NotFollowing);
    }
    followee.followers.remove(&follower.id);
    Ok(())
}

/// `blocker` blocks `target`, dropping blocker's follow of target
pub fn block(blocker: &mut User, target: &mut User) -> Result<(), RelationError> {
    if blocker.id == target.id {
        return Err(RelationError::SelfRelation("block"));
    }
    if blocker.blocked.contains(&target.id) {
        return Err(RelationError::AlreadyBlocked);
    }

    blocker.following.remove(&target.id);
    target.followers.remove(&blocker.id);
    blocker.blocked.insert(target.id);
    Ok(())
}

/// Only the blocker's document changes
pub fn unblock(blocker: &mut User, target: &User) -> Result<(), RelationError> {
    if !blocker.blocked.remove(&target.id) {
        return Err(RelationError::NotBlocked);
    }
    Ok(())
}

/// Record an upvote, moving any existing downvote
pub fn upvote(post: &mut Post, voter: &mut User) -> Result<(), RelationError> {
    if post.upvoted_by.contains(&voter.id) {
        return Err(RelationError::AlreadyUpvoted);
    }

    post.downvoted_by.remove(&voter.id);
    voter.downvoted_posts.remove(&post.id);
    post.upvoted_by.insert(voter.id);
    voter.upvoted_posts.insert(post.id);
    Ok(())
}

/// Record a downvote, moving any existing upvote
pub fn downvote(post: &mut Post, voter: &mut User) -> Result<(), RelationError> {
    if post.downvoted_by.contains(&voter.id) {
        return Err(RelationError::AlreadyDownvoted);
    }

    post.upvoted_by.remove(&voter.id);
    voter.upvoted_posts.remove(&post.id);
    post.downvoted_by.insert(voter.id);
    voter.downvoted_posts.insert(post.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{NewPost, NewUser, Visibility};

    fn user(name: &str) -> User {
        User::new(NewUser {
            first_name: name.to_string(),
            last_name: "Test".to_string(),
            email: format!("{}@example.com", name),
            username: name.to_string(),
            password_digest: "digest".to_string(),
            security_question: "q".to_string(),
            security_answer_digest: "a".to_string(),
        })
    }

    fn post_by(creator: &User) -> Post {
        Post::new(NewPost {
            title: "Weekend".to_string(),
            creator_id: creator.id,
            creator_username: creator.username.clone(),
            due_date: None,
            color: "#fff".to_string(),
            category: "home".to_string(),
            visibility: Visibility::Public,
            authorized_users: IdSet::new(),
        })
    }

    #[test]
    fn id_set_dedupes_and_keeps_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut set: IdSet = vec![a, b, a].into();
        assert_eq!(set.as_slice(), &[a, b]);
        assert!(!set.insert(b));
        assert!(set.remove(&a));
        assert!(!set.remove(&a));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn id_set_deserializes_duplicate_free() {
        let a = Uuid::new_v4();
        let set: IdSet = serde_json::from_value(serde_json::json!([a, a])).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn follow_updates_both_sides() {
        let (mut a, mut b) = (user("alice"), user("bob"));
        follow(&mut a, &mut b).unwrap();
        assert!(a.following.contains(&b.id));
        assert!(b.followers.contains(&a.id));
        assert!(a.followers.is_empty());
    }

    #[test]
    fn follow_twice_is_rejected() {
        let (mut a, mut b) = (user("alice"), user("bob"));
        follow(&mut a, &mut b).unwrap();
        let (a_before, b_before) = (a.clone(), b.clone());
        assert_eq!(follow(&mut a, &mut b), Err(RelationError::AlreadyFollowing));
        assert_eq!(a.following, a_before.following);
        assert_eq!(b.followers, b_before.followers);
    }

    #[test]
    fn half_recorded_follow_is_left_alone() {
        let (mut a, mut b) = (user("alice"), user("bob"));
        a.following.insert(b.id);
        assert_eq!(follow(&mut a, &mut b), Err(RelationError::AlreadyFollowing));
        assert!(b.followers.is_empty());

        let (mut c, mut d) = (user("carol"), user("dave"));
        d.followers.insert(c.id);
        assert_eq!(unfollow(&mut c, &mut d), Err(RelationError::NotFollowing));
        assert!(d.followers.contains(&c.id));
    }

    #[test]
    fn unfollow_twice_is_rejected() {
        let (mut a, mut b) = (user("alice"), user("bob"));
        follow(&mut a, &mut b).unwrap();
        unfollow(&mut a, &mut b).unwrap();
        assert!(a.following.is_empty());
        assert!(b.followers.is_empty());
        assert_eq!(unfollow(&mut a, &mut b), Err(RelationError::NotFollowing));
    }

    #[test]
    fn self_relations_are_rejected() {
        let mut a = user("alice");
        let mut same = a.clone();
        assert_eq!(follow(&mut a, &mut same), Err(RelationError::SelfRelation("follow")));
        assert_eq!(block(&mut a, &mut same), Err(RelationError::SelfRelation("block")));
    }

    #[test]
    fn block_drops_follow_and_records_block() {
        let (mut a, mut b) = (user("alice"), user("bob"));
        follow(&mut a, &mut b).unwrap();
        block(&mut a, &mut b).unwrap();
        assert!(!a.following.contains(&b.id));
        assert!(!b.followers.contains(&a.id));
        assert!(a.blocked.contains(&b.id));
        assert_eq!(block(&mut a, &mut b), Err(RelationError::AlreadyBlocked));
    }

    #[test]
    fn blocks_do_not_gate_follows() {
        let (mut a, mut b) = (user("alice"), user("bob"));
        block(&mut a, &mut b).unwrap();
        follow(&mut b, &mut a).unwrap();
        assert!(b.following.contains(&a.id));
        assert_eq!(follow(&mut b, &mut a), Err(RelationError::AlreadyFollowing));
    }

    #[test]
    fn unblock_twice_is_rejected() {
        let (mut a, mut b) = (user("alice"), user("bob"));
        block(&mut a, &mut b).unwrap();
        unblock(&mut a, &b).unwrap();
        assert!(a.blocked.is_empty());
        assert_eq!(unblock(&mut a, &b), Err(RelationError::NotBlocked));
    }

    #[test]
    fn votes_move_between_sides() {
        let creator = user("carol");
        let mut voter = user("dave");
        let mut post = post_by(&creator);

        upvote(&mut post, &mut voter).unwrap();
        assert_eq!(upvote(&mut post, &mut voter), Err(RelationError::AlreadyUpvoted));

        downvote(&mut post, &mut voter).unwrap();
        assert!(post.upvoted_by.is_empty());
        assert!(post.downvoted_by.contains(&voter.id));
        assert!(voter.downvoted_posts.contains(&post.id));
        assert!(voter.upvoted_posts.is_empty());
        assert_eq!(downvote(&mut post, &mut voter), Err(RelationError::AlreadyDownvoted));
    }
}
