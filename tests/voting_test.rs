/// Integration tests for the voting service.
/// Cover first votes, idempotent repeats, vote changes, the aggregate
/// invariant, and the unauthenticated rejection path.
mod common;

#[cfg(test)]
mod tests {
    use linkboard::db::vote_repo;
    use linkboard::error::AppError;
    use linkboard::services::VoteService;
    use linkboard::session::Identity;
    use serial_test::serial;

    use crate::common::fixtures;

    fn identity_for(user_id: i64) -> Identity {
        Identity::authenticated(user_id, "test-session".to_string())
    }

    #[tokio::test]
    #[serial]
    async fn test_first_upvote_adds_one_point_and_one_ledger_row() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool, "upvoter").await;
        let post = fixtures::create_test_post(&pool, user.id, "First post").await;

        let voting = VoteService::new(pool.clone());
        let ok = voting
            .cast_vote(&identity_for(user.id), post.id, 1)
            .await
            .expect("vote should succeed");
        assert!(ok);

        assert_eq!(fixtures::post_points(&pool, post.id).await, 1);

        let vote = vote_repo::find_vote(&pool, user.id, post.id)
            .await
            .expect("ledger lookup should succeed")
            .expect("ledger row should exist");
        assert_eq!(vote.value, 1);

        fixtures::cleanup_test_data(&pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_first_downvote_removes_one_point() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool, "downvoter").await;
        let post = fixtures::create_test_post(&pool, user.id, "Contested post").await;

        let voting = VoteService::new(pool.clone());
        voting
            .cast_vote(&identity_for(user.id), post.id, -1)
            .await
            .expect("vote should succeed");

        assert_eq!(fixtures::post_points(&pool, post.id).await, -1);

        let vote = vote_repo::find_vote(&pool, user.id, post.id)
            .await
            .expect("ledger lookup should succeed")
            .expect("ledger row should exist");
        assert_eq!(vote.value, -1);

        fixtures::cleanup_test_data(&pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_repeating_the_same_vote_changes_nothing() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool, "repeater").await;
        let post = fixtures::create_test_post(&pool, user.id, "Popular post").await;

        let voting = VoteService::new(pool.clone());
        let identity = identity_for(user.id);

        voting
            .cast_vote(&identity, post.id, 1)
            .await
            .expect("first vote should succeed");
        voting
            .cast_vote(&identity, post.id, 1)
            .await
            .expect("repeated vote should succeed");

        assert_eq!(fixtures::post_points(&pool, post.id).await, 1);
        assert_eq!(vote_repo::sum_values(&pool, post.id).await.unwrap(), 1);

        fixtures::cleanup_test_data(&pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_changing_a_vote_swings_the_score_by_two() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool, "swinger").await;
        let post = fixtures::create_test_post(&pool, user.id, "Divisive post").await;

        let voting = VoteService::new(pool.clone());
        let identity = identity_for(user.id);

        voting
            .cast_vote(&identity, post.id, -1)
            .await
            .expect("downvote should succeed");
        assert_eq!(fixtures::post_points(&pool, post.id).await, -1);

        voting
            .cast_vote(&identity, post.id, 1)
            .await
            .expect("changed vote should succeed");
        assert_eq!(fixtures::post_points(&pool, post.id).await, 1);

        let vote = vote_repo::find_vote(&pool, user.id, post.id)
            .await
            .unwrap()
            .expect("ledger row should exist");
        assert_eq!(vote.value, 1);

        // And back down again
        voting
            .cast_vote(&identity, post.id, -1)
            .await
            .expect("changed vote should succeed");
        assert_eq!(fixtures::post_points(&pool, post.id).await, -1);

        fixtures::cleanup_test_data(&pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_score_equals_ledger_sum_across_many_users() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let author = fixtures::create_test_user(&pool, "author").await;
        let post = fixtures::create_test_post(&pool, author.id, "Crowd post").await;

        let alice = fixtures::create_test_user(&pool, "alice").await;
        let bob = fixtures::create_test_user(&pool, "bob").await;
        let carol = fixtures::create_test_user(&pool, "carol").await;

        let voting = VoteService::new(pool.clone());

        voting
            .cast_vote(&identity_for(alice.id), post.id, 1)
            .await
            .unwrap();
        voting
            .cast_vote(&identity_for(bob.id), post.id, -1)
            .await
            .unwrap();
        voting
            .cast_vote(&identity_for(carol.id), post.id, 1)
            .await
            .unwrap();
        // Alice flips, Bob repeats himself
        voting
            .cast_vote(&identity_for(alice.id), post.id, -1)
            .await
            .unwrap();
        voting
            .cast_vote(&identity_for(bob.id), post.id, -1)
            .await
            .unwrap();

        let points = fixtures::post_points(&pool, post.id).await;
        let ledger_sum = vote_repo::sum_values(&pool, post.id).await.unwrap();
        assert_eq!(i64::from(points), ledger_sum);
        assert_eq!(points, -1);

        fixtures::cleanup_test_data(&pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_unauthenticated_vote_is_rejected_and_leaves_no_trace() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let author = fixtures::create_test_user(&pool, "lurker-author").await;
        let post = fixtures::create_test_post(&pool, author.id, "Guarded post").await;

        let voting = VoteService::new(pool.clone());
        let result = voting.cast_vote(&Identity::anonymous(), post.id, 1).await;

        assert!(matches!(result, Err(AppError::Unauthenticated)));
        assert_eq!(fixtures::post_points(&pool, post.id).await, 0);
        assert_eq!(vote_repo::sum_values(&pool, post.id).await.unwrap(), 0);

        fixtures::cleanup_test_data(&pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_any_other_direction_counts_as_an_upvote() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool, "confused").await;
        let post = fixtures::create_test_post(&pool, user.id, "Oddly voted post").await;

        let voting = VoteService::new(pool.clone());
        voting
            .cast_vote(&identity_for(user.id), post.id, 0)
            .await
            .expect("vote should succeed");

        let vote = vote_repo::find_vote(&pool, user.id, post.id)
            .await
            .unwrap()
            .expect("ledger row should exist");
        assert_eq!(vote.value, 1);
        assert_eq!(fixtures::post_points(&pool, post.id).await, 1);

        fixtures::cleanup_test_data(&pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_vote_on_missing_post_is_not_found() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool, "eager").await;

        let voting = VoteService::new(pool.clone());
        let result = voting
            .cast_vote(&identity_for(user.id), 999_999, 1)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));

        fixtures::cleanup_test_data(&pool).await;
    }
}
