//! Seeding mail to pending creators.
//!
//! A creator moves to `sent` only after the relay accepted its mail; a failed
//! send leaves it pending for the next batch.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use clap::Subcommand;
use glowup_core::{AppConfig, CreatorStatus, Platform};
use glowup_db::{CreatorFilter, CreatorRow};
use glowup_mailer::{
    preview_html, send_batch, OutgoingMail, OutreachLedger, OutreachReport, SeedingTemplate,
    SmtpMailer,
};

/// Sub-commands available under `outreach`.
#[derive(Debug, Subcommand)]
pub enum OutreachCommands {
    /// Render one seeding mail to an HTML file with the card inlined
    Preview {
        #[arg(long, default_value = "melv")]
        template: SeedingTemplate,
        /// Use this stored creator's name
        #[arg(long)]
        email: Option<String>,
        /// Name to greet when no creator is given
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "preview.html")]
        output: PathBuf,
    },
    /// Send a seeding mail to pending creators
    Send {
        #[arg(long)]
        template: SeedingTemplate,
        /// Recipient (repeatable); every pending creator when omitted
        #[arg(long = "email")]
        emails: Vec<String>,
        /// Only creators from this platform
        #[arg(long)]
        platform: Option<Platform>,
        /// Maximum number of mails in this batch
        #[arg(long)]
        limit: Option<usize>,
        /// List the recipients without sending
        #[arg(long)]
        dry_run: bool,
    },
}

/// Marks creators as sent in the store.
struct CreatorLedger<'a> {
    pool: &'a sqlx::PgPool,
}

#[async_trait]
impl OutreachLedger for CreatorLedger<'_> {
    async fn record_sent(&self, email: &str) -> Result<(), String> {
        match glowup_db::mark_creator_sent(self.pool, email).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!(email, "creator was no longer pending when marked sent");
                Ok(())
            }
            Err(err) => Err(err.to_string()),
        }
    }
}

/// Relay plus sender address from the configured credentials.
pub(crate) fn smtp_from_config(config: &AppConfig) -> anyhow::Result<(SmtpMailer, &str)> {
    let (Some(address), Some(password)) = (
        config.sender_email.as_deref(),
        config.sender_password.as_deref(),
    ) else {
        anyhow::bail!("GLOWUP_SENDER_EMAIL and GLOWUP_SENDER_PASSWORD must both be set");
    };
    let mailer = SmtpMailer::new(&config.smtp_host, config.smtp_port, address, password)?;
    Ok((mailer, address))
}

/// Print the batch outcome; failures are listed one per line.
pub(crate) fn print_report(report: &OutreachReport) {
    println!(
        "sent {}, failed {}, delivered but unrecorded {}",
        report.sent.len(),
        report.failures.len(),
        report.unrecorded.len()
    );
    for failure in &report.failures {
        println!("  failed       {}: {}", failure.email, failure.reason);
    }
    for failure in &report.unrecorded {
        println!("  unrecorded   {}: {}", failure.email, failure.reason);
    }
}

/// Pending rows only, in the order given, capped at `limit`.
pub(crate) fn pending_recipients(rows: Vec<CreatorRow>, limit: Option<usize>) -> Vec<CreatorRow> {
    rows.into_iter()
        .filter(CreatorRow::is_pending)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: OutreachCommands,
) -> anyhow::Result<()> {
    match command {
        OutreachCommands::Preview {
            template,
            email,
            name,
            output,
        } => run_preview(pool, config, template, email.as_deref(), name, &output).await,
        OutreachCommands::Send {
            template,
            emails,
            platform,
            limit,
            dry_run,
        } => {
            let selected = select(pool, &emails, platform, limit).await?;
            run_send(pool, config, template, &selected, dry_run).await
        }
    }
}

async fn run_preview(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    template: SeedingTemplate,
    email: Option<&str>,
    name: Option<String>,
    output: &std::path::Path,
) -> anyhow::Result<()> {
    let creator_name = match email {
        Some(email) => {
            glowup_db::get_creator_by_email(pool, email)
                .await?
                .with_context(|| format!("creator '{email}' not found"))?
                .display_name
        }
        None => name.unwrap_or_default(),
    };

    let rendered = template.render(&creator_name, &config.creator_sender_name);
    let card = config.assets_dir.join(&config.creator_card_path);
    std::fs::write(output, preview_html(&rendered.html_body, &card))?;

    println!("subject: {}", rendered.subject);
    println!("attachments: {}", rendered.attachments.join(", "));
    println!("preview written to {}", output.display());
    Ok(())
}

async fn select(
    pool: &sqlx::PgPool,
    emails: &[String],
    platform: Option<Platform>,
    limit: Option<usize>,
) -> anyhow::Result<Vec<CreatorRow>> {
    if emails.is_empty() {
        let filter = CreatorFilter {
            platform,
            status: Some(CreatorStatus::Pending),
        };
        return Ok(pending_recipients(
            glowup_db::list_creators(pool, filter).await?,
            limit,
        ));
    }

    let mut rows = Vec::with_capacity(emails.len());
    for email in emails {
        match glowup_db::get_creator_by_email(pool, email).await? {
            Some(row) if platform.is_some_and(|p| row.platform != p.as_str()) => {
                tracing::warn!(email = %email, platform = %row.platform, "platform mismatch, skipping");
            }
            Some(row) if !row.is_pending() => {
                tracing::warn!(email = %email, "already sent, skipping");
            }
            Some(row) => rows.push(row),
            None => tracing::warn!(email = %email, "creator not found, skipping"),
        }
    }
    Ok(pending_recipients(rows, limit))
}

/// Send `template` to each selected creator in order.
///
/// # Errors
///
/// Returns an error if SMTP credentials are missing or the sender address is
/// malformed. Per-recipient failures are reported, not propagated.
async fn run_send(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    template: SeedingTemplate,
    recipients: &[CreatorRow],
    dry_run: bool,
) -> anyhow::Result<()> {
    if recipients.is_empty() {
        println!("no pending creators selected");
        return Ok(());
    }

    if dry_run {
        println!(
            "dry-run: would send '{template}' to {} creator(s):",
            recipients.len()
        );
        for row in recipients {
            println!("  {} ({})", row.email, row.display_name);
        }
        return Ok(());
    }

    let (mailer, from) = smtp_from_config(config)?;
    let card = config.assets_dir.join(&config.creator_card_path);
    let mails: Vec<OutgoingMail> = recipients
        .iter()
        .map(|row| {
            OutgoingMail::from_rendered(
                template.render(&row.display_name, &config.creator_sender_name),
                &row.email,
                &config.creator_reply_to,
                Some(card.clone()),
                &config.assets_dir,
            )
        })
        .collect();

    let ledger = CreatorLedger { pool };
    let report = send_batch(
        &mailer,
        &ledger,
        from,
        &mails,
        Duration::from_millis(config.send_delay_ms),
    )
    .await?;
    print_report(&report);
    Ok(())
}
