//! Sequential batch sending with per-recipient failure isolation.
//!
//! A recipient is recorded as sent only after the transport accepted the
//! message. A failed recipient is left untouched so a later batch picks it up
//! again. Sends are never retried.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;

use crate::message::{build_message, parse_mailbox, OutgoingMail};
use crate::transport::MailTransport;
use crate::MailError;

/// Where successful sends are recorded.
#[async_trait]
pub trait OutreachLedger: Send + Sync {
    async fn record_sent(&self, email: &str) -> Result<(), String>;
}

/// One recipient that did not get (or did not record) a mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendFailure {
    pub email: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutreachReport {
    /// Delivered and recorded.
    pub sent: Vec<String>,
    /// Not delivered; the record stays as it was.
    pub failures: Vec<SendFailure>,
    /// Delivered, but the ledger write failed.
    pub unrecorded: Vec<SendFailure>,
}

impl OutreachReport {
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.sent.len() + self.unrecorded.len()
    }
}

/// Sends `mails` one at a time from `from`, pausing `pacing` between sends.
///
/// # Errors
///
/// Returns [`MailError::InvalidAddress`] only if `from` itself is malformed;
/// per-recipient problems land in the report.
pub async fn send_batch<T, L>(
    transport: &T,
    ledger: &L,
    from: &str,
    mails: &[OutgoingMail],
    pacing: Duration,
) -> Result<OutreachReport, MailError>
where
    T: MailTransport + ?Sized,
    L: OutreachLedger + ?Sized,
{
    let from: Mailbox = parse_mailbox(from)?;
    let mut report = OutreachReport::default();

    for (index, mail) in mails.iter().enumerate() {
        if index > 0 && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }

        tracing::info!(
            to = %mail.to,
            n = index + 1,
            total = mails.len(),
            "sending outreach mail"
        );

        let delivery = match build_message(&from, mail) {
            Ok(message) => transport.send(message).await,
            Err(err) => Err(err),
        };

        if let Err(err) = delivery {
            tracing::warn!(to = %mail.to, error = %err, "outreach send failed");
            report.failures.push(SendFailure {
                email: mail.to.clone(),
                reason: err.to_string(),
            });
            continue;
        }

        match ledger.record_sent(&mail.to).await {
            Ok(()) => report.sent.push(mail.to.clone()),
            Err(reason) => {
                tracing::error!(to = %mail.to, %reason, "mail delivered but not recorded");
                report.unrecorded.push(SendFailure {
                    email: mail.to.clone(),
                    reason,
                });
            }
        }
    }

    tracing::info!(
        sent = report.sent.len(),
        failed = report.failures.len(),
        unrecorded = report.unrecorded.len(),
        "outreach batch finished"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "outreach_test.rs"]
mod tests;
