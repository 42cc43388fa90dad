/// Post repository - handles all database operations for posts
use crate::models::{Author, FeedPost, Post};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Row};

/// Create a new post owned by a user
pub async fn create_post(
    pool: &PgPool,
    creator_id: i64,
    title: &str,
    text: &str,
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (title, text, creator_id)
        VALUES ($1, $2, $3)
        RETURNING id, title, text, points, creator_id, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(text)
    .bind(creator_id)
    .fetch_one(pool)
    .await
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, text, points, creator_id, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Update a post's title and/or text, only when it belongs to the caller.
/// Returns the updated post, or None when it does not exist or is not theirs.
pub async fn update_post(
    pool: &PgPool,
    post_id: i64,
    creator_id: i64,
    title: Option<&str>,
    text: Option<&str>,
) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = COALESCE($3, title),
            text = COALESCE($4, text),
            updated_at = NOW()
        WHERE id = $1 AND creator_id = $2
        RETURNING id, title, text, points, creator_id, created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(creator_id)
    .bind(title)
    .bind(text)
    .fetch_optional(pool)
    .await
}

/// Adjust a post's aggregate score by a relative delta.
/// Runs inside the caller's vote transaction.
pub async fn adjust_points(
    conn: &mut PgConnection,
    post_id: i64,
    delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET points = points + $1, updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(delta)
    .bind(post_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Fetch a feed page: newest first, keyset-filtered on creation time, each
/// row joined with its author and the viewer's own vote when present.
pub async fn list_feed(
    pool: &PgPool,
    viewer_id: Option<i64>,
    fetch_limit: i64,
    before: Option<DateTime<Utc>>,
) -> Result<Vec<FeedPost>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            p.id, p.title, p.text, p.points, p.creator_id, p.created_at, p.updated_at,
            u.username AS creator_username,
            u.email AS creator_email,
            u.created_at AS creator_created_at,
            u.updated_at AS creator_updated_at,
            v.value AS vote_status
        FROM posts p
        JOIN users u ON u.id = p.creator_id
        LEFT JOIN votes v ON v.post_id = p.id AND v.user_id = $1
        WHERE $2::timestamptz IS NULL OR p.created_at < $2
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $3
        "#,
    )
    .bind(viewer_id)
    .bind(before)
    .bind(fetch_limit)
    .fetch_all(pool)
    .await?;

    let feed = rows
        .iter()
        .map(|r| {
            let post = Post {
                id: r.get("id"),
                title: r.get("title"),
                text: r.get("text"),
                points: r.get("points"),
                creator_id: r.get("creator_id"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            };

            let creator = Author {
                id: post.creator_id,
                username: r.get("creator_username"),
                email: r.get("creator_email"),
                created_at: r.get("creator_created_at"),
                updated_at: r.get("creator_updated_at"),
            };

            FeedPost {
                post,
                creator,
                vote_status: r.get("vote_status"),
            }
        })
        .collect();

    Ok(feed)
}
