//! Account resolvers: register, login, logout, password reset, me
use async_graphql::{Context, ErrorExtensions, Object, Result as GraphQLResult, SimpleObject};
use sqlx::PgPool;

use crate::db::user_repo;
use crate::error::AppError;
use crate::models::{FieldError, User};
use crate::services::{AuthOutcome, AuthService, EmailService};
use crate::session::{Identity, PasswordResetStore, SessionStore};
use crate::validators::RegisterInput;

/// Outcome of register/login style mutations: either the signed-in user or
/// field errors for the form
#[derive(SimpleObject, Default)]
pub struct UserResponse {
    pub errors: Option<Vec<FieldError>>,
    pub user: Option<User>,
}

impl UserResponse {
    fn from_user(user: User) -> Self {
        Self {
            errors: None,
            user: Some(user),
        }
    }

    fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            errors: Some(errors),
            user: None,
        }
    }
}

/// Create a session for the user and hand the cookie to the client
async fn start_session(ctx: &Context<'_>, user_id: i64) -> GraphQLResult<()> {
    let sessions = ctx.data::<SessionStore>()?;
    let token = sessions.create(user_id).await.map_err(|e| e.extend())?;
    ctx.insert_http_header("Set-Cookie", sessions.session_cookie(&token));
    Ok(())
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The currently authenticated user, if any
    async fn me(&self, ctx: &Context<'_>) -> GraphQLResult<Option<User>> {
        let identity = ctx.data::<Identity>()?;
        let Some(user_id) = identity.user_id() else {
            return Ok(None);
        };

        let pool = ctx.data::<PgPool>()?;
        let user = user_repo::find_by_id(pool, user_id)
            .await
            .map_err(|e| AppError::from(e).extend())?;

        Ok(user)
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Create an account and sign the caller in
    async fn register(
        &self,
        ctx: &Context<'_>,
        options: RegisterInput,
    ) -> GraphQLResult<UserResponse> {
        let auth = ctx.data::<AuthService>()?;

        match auth.register(&options).await.map_err(|e| e.extend())? {
            AuthOutcome::Authenticated(user) => {
                start_session(ctx, user.id).await?;
                Ok(UserResponse::from_user(user))
            }
            AuthOutcome::Rejected(errors) => Ok(UserResponse::from_errors(errors)),
        }
    }

    /// Sign in with a username or an email address
    async fn login(
        &self,
        ctx: &Context<'_>,
        username_or_email: String,
        password: String,
    ) -> GraphQLResult<UserResponse> {
        let auth = ctx.data::<AuthService>()?;

        match auth
            .login(&username_or_email, &password)
            .await
            .map_err(|e| e.extend())?
        {
            AuthOutcome::Authenticated(user) => {
                start_session(ctx, user.id).await?;
                Ok(UserResponse::from_user(user))
            }
            AuthOutcome::Rejected(errors) => Ok(UserResponse::from_errors(errors)),
        }
    }

    /// Destroy the current session; false when there was none
    async fn logout(&self, ctx: &Context<'_>) -> GraphQLResult<bool> {
        let identity = ctx.data::<Identity>()?;
        let sessions = ctx.data::<SessionStore>()?;

        let Some(token) = identity.session_token() else {
            return Ok(false);
        };

        let destroyed = sessions.destroy(token).await.map_err(|e| e.extend())?;
        ctx.insert_http_header("Set-Cookie", sessions.removal_cookie());

        Ok(destroyed)
    }

    /// Always true so callers cannot probe which emails exist; sends a
    /// reset link when the account does
    async fn forgot_password(&self, ctx: &Context<'_>, email: String) -> GraphQLResult<bool> {
        let pool = ctx.data::<PgPool>()?;

        let Some(user) = user_repo::find_by_email(pool, &email)
            .await
            .map_err(|e| AppError::from(e).extend())?
        else {
            return Ok(true);
        };

        let reset_tokens = ctx.data::<PasswordResetStore>()?;
        let token = reset_tokens.create(user.id).await.map_err(|e| e.extend())?;

        let mailer = ctx.data::<EmailService>()?;
        mailer
            .send_password_reset(&user.email, &user.username, &token)
            .await
            .map_err(|e| e.extend())?;

        Ok(true)
    }

    /// Redeem a reset token for a new password and sign the caller in
    async fn change_password(
        &self,
        ctx: &Context<'_>,
        token: String,
        new_password: String,
    ) -> GraphQLResult<UserResponse> {
        if new_password.len() < 8 {
            return Ok(UserResponse::from_errors(vec![FieldError::new(
                "newPassword",
                "password must be at least 8 characters",
            )]));
        }

        let reset_tokens = ctx.data::<PasswordResetStore>()?;
        let Some(user_id) = reset_tokens.peek(&token).await.map_err(|e| e.extend())? else {
            return Ok(UserResponse::from_errors(vec![FieldError::new(
                "token",
                "token expired",
            )]));
        };

        let auth = ctx.data::<AuthService>()?;
        let Some(user) = auth
            .reset_password(user_id, &new_password)
            .await
            .map_err(|e| e.extend())?
        else {
            return Ok(UserResponse::from_errors(vec![FieldError::new(
                "token",
                "user no longer exists",
            )]));
        };

        reset_tokens.delete(&token).await.map_err(|e| e.extend())?;

        start_session(ctx, user.id).await?;

        Ok(UserResponse::from_user(user))
    }
}
