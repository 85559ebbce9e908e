use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Document;
use crate::database::store::Collection;
use crate::relations::IdSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub profile_picture: String,
    /// bcrypt digest
    pub password: String,
    pub security_question: String,
    /// bcrypt digest
    pub security_answer: String,
    #[serde(default)]
    pub followers: IdSet,
    #[serde(default)]
    pub following: IdSet,
    #[serde(default)]
    pub blocked: IdSet,
    #[serde(default)]
    pub posts: IdSet,
    #[serde(default)]
    pub upvoted_posts: IdSet,
    #[serde(default)]
    pub downvoted_posts: IdSet,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied at registration, digests already computed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_digest: String,
    pub security_question: String,
    pub security_answer_digest: String,
}

impl User {
    pub fn new(new: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            username: new.username,
            address: String::new(),
            profile_picture: String::new(),
            password: new.password_digest,
            security_question: new.security_question,
            security_answer: new.security_answer_digest,
            followers: IdSet::new(),
            following: IdSet::new(),
            blocked: IdSet::new(),
            posts: IdSet::new(),
            upvoted_posts: IdSet::new(),
            downvoted_posts: IdSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// What other users (and the owner) get to see; digests never leave the server
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub profile_picture: String,
    pub followers: IdSet,
    pub following: IdSet,
    pub posts: IdSet,
    pub upvoted_posts: IdSet,
    pub downvoted_posts: IdSet,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            profile_picture: user.profile_picture.clone(),
            followers: user.followers.clone(),
            following: user.following.clone(),
            posts: user.posts.clone(),
            upvoted_posts: user.upvoted_posts.clone(),
            downvoted_posts: user.downvoted_posts.clone(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_omits_digests() {
        let user = User::new(NewUser {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            username: "jane".to_string(),
            password_digest: "$2b$04$secret".to_string(),
            security_question: "First pet?".to_string(),
            security_answer_digest: "$2b$04$answer".to_string(),
        });

        let value = serde_json::to_value(user.profile()).unwrap();
        assert_eq!(value["username"], "jane");
        assert!(value.get("password").is_none());
        assert!(value.get("securityAnswer").is_none());
        assert!(value.get("blocked").is_none());
    }

    #[test]
    fn stored_document_round_trips_with_camel_case_fields() {
        let user = User::new(NewUser {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            username: "jane".to_string(),
            password_digest: "p".to_string(),
            security_question: "q".to_string(),
            security_answer_digest: "a".to_string(),
        });
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("firstName").is_some());
        assert!(value.get("upvotedPosts").is_some());
        let back: User = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, user.id);
    }
}
