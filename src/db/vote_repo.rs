/// Vote repository - the durable ledger behind post scores
use crate::models::Vote;
use sqlx::{PgConnection, PgPool};

/// Find a user's vote on a post
pub async fn find_vote(
    pool: &PgPool,
    user_id: i64,
    post_id: i64,
) -> Result<Option<Vote>, sqlx::Error> {
    sqlx::query_as::<_, Vote>(
        r#"
        SELECT user_id, post_id, value
        FROM votes
        WHERE user_id = $1 AND post_id = $2
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Read a vote's value inside a transaction, locking the row so a
/// concurrent change for the same (user, post) pair waits.
pub async fn find_value_for_update(
    conn: &mut PgConnection,
    user_id: i64,
    post_id: i64,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"
        SELECT value
        FROM votes
        WHERE user_id = $1 AND post_id = $2
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(conn)
    .await
}

/// Insert a first vote. The composite primary key rejects a concurrent
/// duplicate insert for the same pair.
pub async fn insert_vote(
    conn: &mut PgConnection,
    user_id: i64,
    post_id: i64,
    value: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO votes (user_id, post_id, value)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .bind(value)
    .execute(conn)
    .await?;

    Ok(())
}

/// Flip an existing vote to a new value
pub async fn update_vote_value(
    conn: &mut PgConnection,
    user_id: i64,
    post_id: i64,
    value: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE votes
        SET value = $3
        WHERE user_id = $1 AND post_id = $2
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .bind(value)
    .execute(conn)
    .await?;

    Ok(())
}

/// Sum of all ledger values for a post
pub async fn sum_values(pool: &PgPool, post_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(value), 0)
        FROM votes
        WHERE post_id = $1
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await
}
