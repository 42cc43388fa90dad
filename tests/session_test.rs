/// Integration tests for the Redis-backed session and reset-token stores.
/// Override the target with REDIS_URL.
use linkboard::config::SessionConfig;
use linkboard::session::{PasswordResetStore, SessionStore};
use redis::aio::ConnectionManager;
use serial_test::serial;

async fn create_test_redis() -> ConnectionManager {
    let url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let client = redis::Client::open(url).expect("invalid Redis URL");
    ConnectionManager::new(client)
        .await
        .expect("failed to connect to Redis")
}

fn test_session_config() -> SessionConfig {
    SessionConfig {
        cookie_name: "lbid".to_string(),
        ttl_seconds: 60,
        secure: false,
    }
}

#[tokio::test]
#[serial]
async fn test_session_round_trip() {
    let store = SessionStore::new(create_test_redis().await, test_session_config());

    let token = store.create(42).await.expect("session create");
    assert_eq!(store.user_id(&token).await.unwrap(), Some(42));

    assert!(store.destroy(&token).await.unwrap());
    assert_eq!(store.user_id(&token).await.unwrap(), None);

    // Destroying again reports that nothing was there
    assert!(!store.destroy(&token).await.unwrap());
}

#[tokio::test]
#[serial]
async fn test_unknown_session_resolves_to_none() {
    let store = SessionStore::new(create_test_redis().await, test_session_config());
    assert_eq!(store.user_id("no-such-token").await.unwrap(), None);
}

#[tokio::test]
#[serial]
async fn test_reset_token_round_trip() {
    let store = PasswordResetStore::new(create_test_redis().await);

    let token = store.create(7).await.expect("token create");
    assert_eq!(store.peek(&token).await.unwrap(), Some(7));

    store.delete(&token).await.expect("token delete");
    assert_eq!(store.peek(&token).await.unwrap(), None);
}

#[tokio::test]
#[serial]
async fn test_session_cookie_attributes() {
    let store = SessionStore::new(create_test_redis().await, test_session_config());

    let cookie = store.session_cookie("abc");
    assert!(cookie.starts_with("lbid=abc"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=60"));
    assert!(!cookie.contains("Secure"));

    let removal = store.removal_cookie();
    assert!(removal.starts_with("lbid="));
    assert!(removal.contains("Max-Age=0"));
}
