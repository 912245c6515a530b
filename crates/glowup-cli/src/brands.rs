//! Storefront owner leads: discovery and partnership mail.

use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use clap::Subcommand;
use glowup_core::{load_senders, AppConfig};
use glowup_db::BrandLeadRow;
use glowup_mailer::{send_batch, OutgoingMail, OutreachLedger, PartnershipTemplate};
use glowup_scraper::{discover_leads, storefront_query, ApifySearchClient, HttpSettings};

use crate::collect::clean_keywords;
use crate::creators::clip;
use crate::outreach::{print_report, smtp_from_config};

/// Sub-commands available under `brands`.
#[derive(Debug, Subcommand)]
pub enum BrandCommands {
    /// Search storefronts for each keyword and store their owner addresses
    Collect {
        /// Comma-separated product keywords
        #[arg(long, value_delimiter = ',', required = true)]
        keywords: Vec<String>,
        /// Result pages fetched per keyword
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// Print stored leads
    List {
        /// Only leads that were never mailed
        #[arg(long)]
        unsent: bool,
    },
    /// Send a partnership mail to leads that were never mailed
    Send {
        #[arg(long, default_value = "commerce")]
        template: PartnershipTemplate,
        /// Sender key from the senders file, e.g. `hs`
        #[arg(long)]
        sender: String,
        /// Maximum number of mails in this batch
        #[arg(long)]
        limit: Option<i64>,
        /// List the recipients without sending
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete leads by email
    Delete {
        /// Email to delete (repeatable)
        #[arg(long = "email", required = true)]
        emails: Vec<String>,
    },
}

/// Counts each successful send against the lead.
struct BrandLedger<'a> {
    pool: &'a sqlx::PgPool,
    template: PartnershipTemplate,
}

#[async_trait]
impl OutreachLedger for BrandLedger<'_> {
    async fn record_sent(&self, email: &str) -> Result<(), String> {
        match glowup_db::record_brand_send(self.pool, email, self.template.as_str()).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(format!("no lead stored for {email}")),
            Err(err) => Err(err.to_string()),
        }
    }
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: BrandCommands,
) -> anyhow::Result<()> {
    match command {
        BrandCommands::Collect { keywords, pages } => {
            run_collect(pool, config, &keywords, pages).await
        }
        BrandCommands::List { unsent } => run_list(pool, unsent).await,
        BrandCommands::Send {
            template,
            sender,
            limit,
            dry_run,
        } => run_send(pool, config, template, &sender, limit, dry_run).await,
        BrandCommands::Delete { emails } => {
            let removed = glowup_db::delete_brand_leads_by_email(pool, &emails).await?;
            println!("deleted {removed} of {} lead(s)", emails.len());
            Ok(())
        }
    }
}

/// Search storefronts per keyword and insert unseen owner addresses.
///
/// # Errors
///
/// Returns an error if no search token is configured or an insert fails. A
/// failed search stops the run after the leads found so far are stored.
async fn run_collect(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    keywords: &[String],
    pages: u32,
) -> anyhow::Result<()> {
    let token = config
        .apify_api_token
        .as_deref()
        .context("APIFY_API_TOKEN is not set")?;
    let client = ApifySearchClient::new(
        token,
        &config.apify_actor_id,
        &HttpSettings::from_app_config(config),
    )?;

    let (mut added, mut known) = (0usize, 0usize);
    for keyword in clean_keywords(keywords) {
        let results = client
            .search(&storefront_query(keyword), pages)
            .await
            .with_context(|| format!("storefront search for '{keyword}' failed"));
        let results = match results {
            Ok(results) => results,
            Err(err) => {
                println!("brands: {added} new, {known} already known");
                return Err(err);
            }
        };

        for lead in discover_leads(&results) {
            if glowup_db::insert_brand_lead(pool, &lead.email, keyword).await? {
                added += 1;
            } else {
                known += 1;
            }
        }
        tracing::info!(keyword, results = results.len(), "storefront keyword done");
    }

    println!("brands: {added} new, {known} already known");
    Ok(())
}

async fn run_list(pool: &sqlx::PgPool, unsent: bool) -> anyhow::Result<()> {
    let leads = if unsent {
        glowup_db::list_unsent_brand_leads(pool, None).await?
    } else {
        glowup_db::list_brand_leads(pool).await?
    };
    if leads.is_empty() {
        println!("no brand leads found; run `brands collect` first");
        return Ok(());
    }

    println!(
        "{:<34}{:<18}{:>6}  {:<11}LAST SENT",
        "EMAIL", "KEYWORD", "SENT", "TEMPLATE"
    );
    for lead in &leads {
        println!(
            "{:<34}{:<18}{:>6}  {:<11}{}",
            clip(&lead.email, 32),
            clip(&lead.keyword, 16),
            lead.send_count,
            lead.template_used.as_deref().unwrap_or("-"),
            lead.last_sent_at
                .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
        );
    }
    Ok(())
}

/// Mail every never-contacted lead, signed by the chosen sender.
///
/// # Errors
///
/// Returns an error if the senders file cannot be loaded, the sender key is
/// unknown, or SMTP credentials are missing.
async fn run_send(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    template: PartnershipTemplate,
    sender_key: &str,
    limit: Option<i64>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let senders = load_senders(&config.senders_path)?;
    let sender = senders
        .find(sender_key)
        .with_context(|| format!("sender '{sender_key}' not found in {}", config.senders_path.display()))?;

    let leads: Vec<BrandLeadRow> = glowup_db::list_unsent_brand_leads(pool, limit).await?;
    if leads.is_empty() {
        println!("no unsent brand leads");
        return Ok(());
    }

    if dry_run {
        println!(
            "dry-run: would send '{template}' as {} to {} lead(s):",
            sender.name,
            leads.len()
        );
        for lead in &leads {
            println!("  {}", lead.email);
        }
        return Ok(());
    }

    let (mailer, from) = smtp_from_config(config)?;
    let card = config.assets_dir.join(&sender.card_path);
    let mails: Vec<OutgoingMail> = leads
        .iter()
        .map(|lead| {
            OutgoingMail::from_rendered(
                template.render(&sender.name),
                &lead.email,
                &config.brand_reply_to,
                Some(card.clone()),
                &config.assets_dir,
            )
        })
        .collect();

    let ledger = BrandLedger { pool, template };
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
