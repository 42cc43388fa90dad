/// Email service for sending password reset mail
/// Uses lettre for SMTP delivery
use crate::config::SmtpConfig;
use crate::error::{AppError, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::SmtpTransport;
use lettre::{Message, Transport};
use std::sync::Arc;

pub struct EmailService {
    config: Arc<SmtpConfig>,
}

impl EmailService {
    pub fn new(config: SmtpConfig) -> Self {
        EmailService {
            config: Arc::new(config),
        }
    }

    /// Create SMTP transport
    fn create_transport(&self) -> Result<SmtpTransport> {
        let creds = Credentials::new(
            self.config.username.clone(),
            self.config.password.clone(),
        );

        let mailer = SmtpTransport::builder_dangerous(&self.config.host)
            .port(self.config.port)
            .credentials(creds)
            .build();

        Ok(mailer)
    }

    /// Send the password reset email with the tokenized link
    pub async fn send_password_reset(
        &self,
        to_email: &str,
        username: &str,
        token: &str,
    ) -> Result<()> {
        let reset_url = format!("{}/change-password/{}", self.config.frontend_url, token);

        let html_body = format!(
            r#"
<!DOCTYPE html>
<html>
<body>
    <p>Hi <strong>{}</strong>,</p>
    <p>Someone requested a password reset for your account. If that was you,
    follow the link below within three days:</p>
    <p><a href="{}">Reset password</a></p>
    <p>If you did not request this, you can ignore this email.</p>
</body>
</html>
"#,
            username, reset_url
        );

        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| AppError::Email(format!("invalid sender address: {}", e)))?;
        let to: Mailbox = to_email
            .parse()
            .map_err(|e| AppError::Email(format!("invalid recipient address: {}", e)))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject("Reset your Linkboard password")
            .header(ContentType::TEXT_HTML)
            .body(html_body)?;

        let mailer = self.create_transport()?;
        mailer.send(&email)?;

        tracing::info!(to = %to_email, "password reset email sent");

        Ok(())
    }
}
