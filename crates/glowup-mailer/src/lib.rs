//! Outreach email rendering, MIME assembly and sequential SMTP sending.

pub mod message;
pub mod outreach;
pub mod template;
pub mod transport;

pub use message::{build_message, preview_html, OutgoingMail};
pub use outreach::{send_batch, OutreachLedger, OutreachReport, SendFailure};
pub use template::{
    PartnershipTemplate, RenderedEmail, SeedingTemplate, FALLBACK_CREATOR_NAME,
};
pub use transport::{MailTransport, SmtpMailer};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The transport refused the message without a lower-level error.
    #[error("message rejected: {0}")]
    Rejected(String),
}
