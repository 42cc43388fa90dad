/// Credential handling: registration, login and password resets.
///
/// Bad input and conflicts come back as field errors for the client form;
/// only store failures surface as hard errors.
use crate::db::user_repo;
use crate::error::Result;
use crate::models::{FieldError, User};
use crate::security::password;
use crate::validators::{validate_register, RegisterInput};
use sqlx::PgPool;

/// Outcome of a credential operation
pub enum AuthOutcome {
    Authenticated(User),
    Rejected(Vec<FieldError>),
}

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an account. A duplicate email or username becomes a field
    /// error on the matching field rather than a hard failure.
    pub async fn register(&self, input: &RegisterInput) -> Result<AuthOutcome> {
        if let Some(errors) = validate_register(input) {
            return Ok(AuthOutcome::Rejected(errors));
        }

        let password_hash = password::hash_password(&input.password)?;

        match user_repo::create_user(&self.pool, &input.email, &input.username, &password_hash)
            .await
        {
            Ok(user) => Ok(AuthOutcome::Authenticated(user)),
            Err(sqlx::Error::Database(db))
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                let error = match db.constraint() {
                    Some("users_email_key") => FieldError::new("email", "email already taken"),
                    _ => FieldError::new("username", "username already taken"),
                };
                Ok(AuthOutcome::Rejected(vec![error]))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Log in with either the email (argument contains '@') or the username
    pub async fn login(&self, username_or_email: &str, password_input: &str) -> Result<AuthOutcome> {
        let user = if username_or_email.contains('@') {
            user_repo::find_by_email(&self.pool, username_or_email).await?
        } else {
            user_repo::find_by_username(&self.pool, username_or_email).await?
        };

        let Some(user) = user else {
            return Ok(AuthOutcome::Rejected(vec![FieldError::new(
                "usernameOrEmail",
                "that user doesn't exist",
            )]));
        };

        if !password::verify_password(password_input, &user.password_hash)? {
            return Ok(AuthOutcome::Rejected(vec![FieldError::new(
                "password",
                "incorrect password",
            )]));
        }

        Ok(AuthOutcome::Authenticated(user))
    }

    /// Set a new password for a user resolved from a reset token.
    /// Returns None when the account no longer exists.
    pub async fn reset_password(&self, user_id: i64, new_password: &str) -> Result<Option<User>> {
        if user_repo::find_by_id(&self.pool, user_id).await?.is_none() {
            return Ok(None);
        }

        let password_hash = password::hash_password(new_password)?;
        let user = user_repo::update_password(&self.pool, user_id, &password_hash).await?;

        Ok(Some(user))
    }
}
