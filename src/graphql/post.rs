//! Post resolvers: feed page, single post, create/update, vote
use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result as GraphQLResult};
use sqlx::PgPool;

use crate::db::post_repo;
use crate::error::AppError;
use crate::models::{PaginatedPosts, Post};
use crate::services::{FeedService, VoteService};
use crate::session::Identity;

#[derive(Debug, Clone, InputObject)]
pub struct PostInput {
    pub title: String,
    pub text: String,
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// One feed page, newest first. The cursor is the millisecond
    /// timestamp of the previous page's last post.
    async fn posts(
        &self,
        ctx: &Context<'_>,
        limit: i32,
        cursor: Option<String>,
    ) -> GraphQLResult<PaginatedPosts> {
        let identity = ctx.data::<Identity>()?;
        let feed = ctx.data::<FeedService>()?;

        feed.list_posts(identity, limit, cursor.as_deref())
            .await
            .map_err(|e| e.extend())
    }

    /// A single post by id
    async fn post(&self, ctx: &Context<'_>, id: i64) -> GraphQLResult<Option<Post>> {
        let pool = ctx.data::<PgPool>()?;

        post_repo::find_post_by_id(pool, id)
            .await
            .map_err(|e| AppError::from(e).extend())
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    /// Create a post owned by the authenticated caller
    async fn create_post(&self, ctx: &Context<'_>, input: PostInput) -> GraphQLResult<Post> {
        let identity = ctx.data::<Identity>()?;
        let user_id = identity.require_user_id().map_err(|e| e.extend())?;

        let pool = ctx.data::<PgPool>()?;
        post_repo::create_post(pool, user_id, &input.title, &input.text)
            .await
            .map_err(|e| AppError::from(e).extend())
    }

    /// Update a post's title and/or text. Null when the post does not
    /// exist or is not the caller's.
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: i64,
        title: Option<String>,
        text: Option<String>,
    ) -> GraphQLResult<Option<Post>> {
        let identity = ctx.data::<Identity>()?;
        let user_id = identity.require_user_id().map_err(|e| e.extend())?;

        let pool = ctx.data::<PgPool>()?;
        post_repo::update_post(pool, id, user_id, title.as_deref(), text.as_deref())
            .await
            .map_err(|e| AppError::from(e).extend())
    }

    /// Cast an up or down vote on a post
    async fn vote(&self, ctx: &Context<'_>, post_id: i64, value: i32) -> GraphQLResult<bool> {
        let identity = ctx.data::<Identity>()?;
        let voting = ctx.data::<VoteService>()?;

        voting
            .cast_vote(identity, post_id, value)
            .await
            .map_err(|e| e.extend())
    }
}
