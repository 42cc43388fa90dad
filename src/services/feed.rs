/// Feed service - stable cursor pagination over posts, newest first
use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::models::PaginatedPosts;
use crate::session::Identity;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::PgPool;

/// Hard cap on a feed page, regardless of the requested limit
pub const MAX_PAGE_SIZE: i64 = 50;

pub struct FeedService {
    pool: PgPool,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return one feed page.
    ///
    /// Fetches one row past the page to learn whether another page exists
    /// without a separate count query. The cursor is the millisecond
    /// timestamp of the previous page's last post; rows strictly older than
    /// it form the next page. Ordering is `created_at DESC, id DESC` so
    /// pages stay deterministic when timestamps collide.
    pub async fn list_posts(
        &self,
        identity: &Identity,
        limit: i32,
        cursor: Option<&str>,
    ) -> Result<PaginatedPosts> {
        let limit = clamp_limit(limit);
        let fetch_limit = limit + 1;
        let before = cursor.map(parse_cursor).transpose()?;

        let mut posts =
            post_repo::list_feed(&self.pool, identity.user_id(), fetch_limit, before).await?;

        let has_more = posts.len() as i64 == fetch_limit;
        posts.truncate(limit as usize);

        Ok(PaginatedPosts { posts, has_more })
    }
}

fn clamp_limit(limit: i32) -> i64 {
    (i64::from(limit.max(0))).min(MAX_PAGE_SIZE)
}

/// Decode a cursor: the decimal string of a millisecond Unix timestamp
fn parse_cursor(cursor: &str) -> Result<DateTime<Utc>> {
    let millis = cursor
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("invalid cursor: {}", cursor)))?;

    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| AppError::Validation(format!("cursor out of range: {}", cursor)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(10), 10);
        assert_eq!(clamp_limit(50), 50);
        assert_eq!(clamp_limit(1000), 50);
        assert_eq!(clamp_limit(0), 0);
        assert_eq!(clamp_limit(-3), 0);
    }

    #[test]
    fn test_parse_cursor() {
        let ts = parse_cursor("1699632000000").unwrap();
        assert_eq!(ts.timestamp_millis(), 1_699_632_000_000);
    }

    #[test]
    fn test_parse_cursor_rejects_garbage() {
        assert!(matches!(
            parse_cursor("not-a-timestamp"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(parse_cursor(""), Err(AppError::Validation(_))));
    }
}
