use async_trait::async_trait;
use lettre::message::Message;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::MailError;

/// Hands one finished message to the outside world.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), MailError>;
}

/// App passwords are often pasted with the display grouping spaces.
#[must_use]
pub fn strip_password_spaces(password: &str) -> String {
    password.chars().filter(|c| !c.is_whitespace()).collect()
}

/// STARTTLS SMTP relay with username/password auth.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// # Errors
    ///
    /// Returns [`MailError::Smtp`] if the relay cannot be configured for `host`.
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> Result<Self, MailError> {
        let credentials = Credentials::new(username.to_owned(), strip_password_spaces(password));
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(port)
            .credentials(credentials)
            .build();
        Ok(Self {
            transport,
            host: host.to_owned(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        self.transport.send(message).await?;
        tracing::debug!(host = %self.host, "SMTP delivered");
        Ok(())
    }
}
