/// Data models.
///
/// Plain records backing the repositories and the GraphQL schema:
/// - User: account row; the password hash never leaves the server
/// - Post: shared link with its aggregate score
/// - Vote: one ledger row per (user, post) pair
/// - FeedPost / PaginatedPosts: the enriched feed page shape
use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, SimpleObject)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    #[graphql(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, SimpleObject)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    /// Aggregate score; equals the sum of the post's vote values
    pub points: i32,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vote {
    pub user_id: i64,
    pub post_id: i64,
    /// +1 or -1
    pub value: i32,
}

/// Public identity fields of a post author
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
pub struct Author {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A feed row: the post plus its author and, for an authenticated caller,
/// the caller's own vote on it
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct FeedPost {
    #[graphql(flatten)]
    pub post: Post,
    pub creator: Author,
    pub vote_status: Option<i32>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PaginatedPosts {
    pub posts: Vec<FeedPost>,
    pub has_more: bool,
}

/// Field-level validation outcome surfaced as data, not as a transport error
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
