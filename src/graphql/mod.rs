//! GraphQL schema: query and mutation roots merged from the account and
//! post namespaces.
pub mod post;
pub mod user;

use async_graphql::{EmptySubscription, MergedObject, Schema};
use sqlx::PgPool;

use crate::services::{AuthService, EmailService, FeedService, VoteService};
use crate::session::{PasswordResetStore, SessionStore};

/// Root query object
#[derive(MergedObject, Default)]
pub struct QueryRoot(user::UserQuery, post::PostQuery);

/// Root mutation object
#[derive(MergedObject, Default)]
pub struct MutationRoot(user::UserMutation, post::PostMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the long-lived services attached as schema data.
/// The per-request `Identity` is attached to each execution by the HTTP
/// handler, never stored here.
pub fn build_schema(
    pool: PgPool,
    sessions: SessionStore,
    reset_tokens: PasswordResetStore,
    email: EmailService,
) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(VoteService::new(pool.clone()))
    .data(FeedService::new(pool.clone()))
    .data(AuthService::new(pool.clone()))
    .data(sessions)
    .data(reset_tokens)
    .data(email)
    .data(pool)
    .finish()
}
