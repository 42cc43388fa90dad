/// Voting service - keeps the vote ledger and post scores consistent
use crate::db::{post_repo, vote_repo};
use crate::error::{AppError, Result};
use crate::session::Identity;
use sqlx::PgPool;

pub struct VoteService {
    pool: PgPool,
}

impl VoteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cast a directional vote on a post for the authenticated caller.
    ///
    /// The ledger write and the score update commit as one transaction, so
    /// `posts.points` always equals the sum of the post's vote values:
    /// - first vote: insert the ledger row, move the score by the value
    /// - changed vote: flip the row, move the score by twice the value
    /// - repeated identical vote: no writes
    pub async fn cast_vote(&self, identity: &Identity, post_id: i64, value: i32) -> Result<bool> {
        let user_id = identity.require_user_id()?;
        let value = normalize_direction(value);

        let mut tx = self.pool.begin().await?;

        let existing = vote_repo::find_value_for_update(&mut *tx, user_id, post_id).await?;

        match existing {
            None => {
                vote_repo::insert_vote(&mut *tx, user_id, post_id, value)
                    .await
                    .map_err(|e| classify_vote_insert(e, post_id))?;
                post_repo::adjust_points(&mut *tx, post_id, value).await?;
            }
            Some(current) if current != value => {
                vote_repo::update_vote_value(&mut *tx, user_id, post_id, value).await?;
                // The score swings from the old value to the new one
                post_repo::adjust_points(&mut *tx, post_id, 2 * value).await?;
            }
            Some(_) => {
                // Re-casting the same direction changes nothing
            }
        }

        tx.commit().await?;

        tracing::debug!(user_id, post_id, value, "vote applied");

        Ok(true)
    }
}

/// Anything other than exactly -1 counts as an upvote.
fn normalize_direction(value: i32) -> i32 {
    if value == -1 {
        -1
    } else {
        1
    }
}

/// An insert hitting the posts foreign key means the post is gone
fn classify_vote_insert(err: sqlx::Error, post_id: i64) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) {
            return AppError::NotFound(format!("post {} does not exist", post_id));
        }
    }
    AppError::Database(err)
}
