//! SMTP notifications
//!
//! Welcome/account emails for newly created employees. The mailer is
//! optional: with no SMTP credentials configured, sends are skipped.
//! One synchronous attempt per send — failures are logged and reported
//! as warnings, the primary operation always completes.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::core::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP is not configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to send email: {0}")]
    Transport(String),
}

#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl Mailer {
    /// Build from config; missing credentials leave the mailer disabled
    pub fn from_config(config: &SmtpConfig) -> Self {
        let transport = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                match AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host) {
                    Ok(builder) => Some(
                        builder
                            .port(config.port)
                            .credentials(Credentials::new(username.clone(), password.clone()))
                            .build(),
                    ),
                    Err(e) => {
                        tracing::warn!(error = %e, "Invalid SMTP relay config, mailer disabled");
                        None
                    }
                }
            }
            _ => {
                tracing::info!("SMTP not configured - emails will be skipped");
                None
            }
        };

        Self {
            transport,
            from: config.from.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), MailError> {
        let transport = self.transport.as_ref().ok_or(MailError::NotConfigured)?;

        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailError::Transport(e.to_string()))?;

        transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }

    /// Welcome email with the generated account credentials
    pub async fn send_welcome(
        &self,
        to: &str,
        employee_name: &str,
        username: &str,
        default_password: &str,
    ) -> Result<(), MailError> {
        let body = format!(
            "Hello {employee_name},\n\n\
             You have been added to the attendance system.\n\n\
             Login account: {username}\n\
             Temporary password: {default_password}\n\n\
             Please sign in and change your password after the first login.\n"
        );
        self.send(to, "Welcome to the attendance system", body).await
    }
}
