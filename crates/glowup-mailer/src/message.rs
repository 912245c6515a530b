//! Addressing and MIME assembly.
//!
//! Layout: `multipart/mixed` holding a `multipart/related` part (HTML body plus
//! the inline card) followed by any file attachments. Missing asset files are
//! skipped with a warning; the mail still goes out.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};

use crate::template::{RenderedEmail, CARD_CONTENT_ID};
use crate::MailError;

/// A fully addressed outreach email, assets referenced by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html_body: String,
    pub card_path: Option<PathBuf>,
    pub attachments: Vec<PathBuf>,
}

impl OutgoingMail {
    /// Addresses a rendered template, resolving asset names under `assets_dir`.
    #[must_use]
    pub fn from_rendered(
        rendered: RenderedEmail,
        to: &str,
        reply_to: &str,
        card_path: Option<PathBuf>,
        assets_dir: &Path,
    ) -> Self {
        Self {
            to: to.trim().to_owned(),
            reply_to: reply_to.to_owned(),
            subject: rendered.subject,
            html_body: rendered.html_body,
            card_path,
            attachments: rendered
                .attachments
                .iter()
                .map(|name| assets_dir.join(name))
                .collect(),
        }
    }
}

pub(crate) fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse()
        .map_err(|source| MailError::InvalidAddress {
            address: address.to_owned(),
            source,
        })
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn content_type_for(path: &Path) -> ContentType {
    ContentType::parse(mime_for(path)).unwrap_or(ContentType::TEXT_PLAIN)
}

fn read_asset(path: &Path, role: &str) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::warn!(path = %path.display(), role, error = %err, "asset unreadable, skipping");
            None
        }
    }
}

/// Builds the MIME message for `mail`.
///
/// # Errors
///
/// Returns [`MailError::InvalidAddress`] for a malformed address or
/// [`MailError::Build`] if lettre rejects the message.
pub fn build_message(from: &Mailbox, mail: &OutgoingMail) -> Result<Message, MailError> {
    let mut related = MultiPart::related().singlepart(SinglePart::html(mail.html_body.clone()));
    if let Some(card) = mail.card_path.as_deref() {
        if let Some(bytes) = read_asset(card, "card") {
            related = related.singlepart(
                Attachment::new_inline(CARD_CONTENT_ID.to_owned())
                    .body(bytes, content_type_for(card)),
            );
        }
    }

    let mut body = MultiPart::mixed().multipart(related);
    for path in &mail.attachments {
        let Some(bytes) = read_asset(path, "attachment") else {
            continue;
        };
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment")
            .to_owned();
        body = body.singlepart(Attachment::new(filename).body(bytes, content_type_for(path)));
    }

    let message = Message::builder()
        .from(from.clone())
        .to(parse_mailbox(&mail.to)?)
        .reply_to(parse_mailbox(&mail.reply_to)?)
        .subject(mail.subject.clone())
        .multipart(body)?;

    Ok(message)
}

/// The body with the inline card swapped for a `data:` URI, for local preview.
/// The body is returned unchanged when the card cannot be read.
#[must_use]
pub fn preview_html(html_body: &str, card_path: &Path) -> String {
    let Ok(bytes) = std::fs::read(card_path) else {
        return html_body.to_owned();
    };
    let data_uri = format!("data:{};base64,{}", mime_for(card_path), STANDARD.encode(bytes));
    html_body.replace(&format!("cid:{CARD_CONTENT_ID}"), &data_uri)
}
