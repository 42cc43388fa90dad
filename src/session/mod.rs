/// Cookie-backed sessions and password reset tokens.
///
/// The HTTP layer resolves the session cookie once per request and threads
/// the result through resolvers as an explicit `Identity` value; nothing in
/// the request pipeline mutates shared session state.
pub mod keys;

use crate::config::SessionConfig;
use crate::error::{AppError, Result};
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use uuid::Uuid;

use keys::{PasswordResetKey, SessionKey};

/// The caller's identity for one request.
///
/// Anonymous requests carry no user id; authenticated ones also remember the
/// session token so logout can destroy the matching store entry.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    user_id: Option<i64>,
    session_token: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: i64, session_token: String) -> Self {
        Self {
            user_id: Some(user_id),
            session_token: Some(session_token),
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// The authenticated user id, or Unauthenticated
    pub fn require_user_id(&self) -> Result<i64> {
        self.user_id.ok_or(AppError::Unauthenticated)
    }
}

/// Redis-backed session store
#[derive(Clone)]
pub struct SessionStore {
    redis: ConnectionManager,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(redis: ConnectionManager, config: SessionConfig) -> Self {
        Self { redis, config }
    }

    /// Create a session for a user and return the opaque token
    pub async fn create(&self, user_id: i64) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let mut conn = self.redis.clone();
        let _: () = conn
            .set_ex(
                SessionKey::token(&token),
                user_id.to_string(),
                self.config.ttl_seconds,
            )
            .await?;
        Ok(token)
    }

    /// Resolve a session token to its user id
    pub async fn user_id(&self, token: &str) -> Result<Option<i64>> {
        let mut conn = self.redis.clone();
        let value: Option<String> = conn.get(SessionKey::token(token)).await?;
        match value {
            Some(raw) => {
                let user_id = raw
                    .parse::<i64>()
                    .map_err(|_| AppError::Internal(format!("corrupt session entry: {}", raw)))?;
                Ok(Some(user_id))
            }
            None => Ok(None),
        }
    }

    /// Destroy a session; returns whether an entry existed
    pub async fn destroy(&self, token: &str) -> Result<bool> {
        let mut conn = self.redis.clone();
        let deleted: u32 = conn.del(SessionKey::token(token)).await?;
        Ok(deleted > 0)
    }

    /// Session cookie carrying a freshly created token
    pub fn session_cookie(&self, token: &str) -> String {
        Cookie::build(self.config.cookie_name.clone(), token.to_string())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.secure)
            .max_age(CookieDuration::seconds(self.config.ttl_seconds as i64))
            .finish()
            .to_string()
    }

    /// Expired cookie that clears the session on the client
    pub fn removal_cookie(&self) -> String {
        Cookie::build(self.config.cookie_name.clone(), "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.secure)
            .max_age(CookieDuration::ZERO)
            .finish()
            .to_string()
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }
}

/// Redis-backed password reset tokens, valid for three days
#[derive(Clone)]
pub struct PasswordResetStore {
    redis: ConnectionManager,
}

const PASSWORD_RESET_TTL_SECONDS: u64 = 60 * 60 * 24 * 3;

impl PasswordResetStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    /// Issue a reset token for a user
    pub async fn create(&self, user_id: i64) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let mut conn = self.redis.clone();
        let _: () = conn
            .set_ex(
                PasswordResetKey::token(&token),
                user_id.to_string(),
                PASSWORD_RESET_TTL_SECONDS,
            )
            .await?;
        Ok(token)
    }

    /// Resolve a reset token to its user id, if still valid
    pub async fn peek(&self, token: &str) -> Result<Option<i64>> {
        let mut conn = self.redis.clone();
        let value: Option<String> = conn.get(PasswordResetKey::token(token)).await?;
        match value {
            Some(raw) => {
                let user_id = raw.parse::<i64>().map_err(|_| {
                    AppError::Internal(format!("corrupt password reset entry: {}", raw))
                })?;
                Ok(Some(user_id))
            }
            None => Ok(None),
        }
    }

    /// Delete a reset token after use
    pub async fn delete(&self, token: &str) -> Result<()> {
        let mut conn = self.redis.clone();
        let _: u32 = conn.del(PasswordResetKey::token(token)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_require_user_id() {
        let identity = Identity::authenticated(7, "token".to_string());
        assert_eq!(identity.require_user_id().unwrap(), 7);
        assert_eq!(identity.session_token(), Some("token"));

        let anonymous = Identity::anonymous();
        assert!(matches!(
            anonymous.require_user_id(),
            Err(AppError::Unauthenticated)
        ));
        assert!(anonymous.session_token().is_none());
    }
}
