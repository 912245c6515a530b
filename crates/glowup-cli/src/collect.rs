//! Collection command handlers.
//!
//! A collaborator failure stops fetching, but every contact gathered before
//! it is still merged; the error is surfaced afterwards.

use std::collections::HashSet;
use std::future::Future;

use anyhow::Context as _;
use clap::Subcommand;
use glowup_core::{AppConfig, ExtractedContact, MergeOutcome, Platform};
use glowup_db::{DbError, QuotaLedger};
use glowup_scraper::{
    creator_query, find_email, harvest, needs_generative, ApifySearchClient, Blacklist,
    GeminiClient, HttpSettings, Region, RelevanceFilter, SubscriberRange, YouTubeClient,
    SEARCH_QUOTA_COST,
};

/// Sub-commands available under `collect`.
#[derive(Debug, Subcommand)]
pub enum CollectCommands {
    /// Search Instagram profiles through the search actor
    Instagram {
        #[command(flatten)]
        args: SearchArgs,
    },
    /// Search TikTok profiles through the search actor
    Tiktok {
        #[command(flatten)]
        args: SearchArgs,
    },
    /// Search YouTube channels through the Data API
    Youtube {
        /// Comma-separated search keywords
        #[arg(long, value_delimiter = ',', required = true)]
        keywords: Vec<String>,
        /// Category stored with each contact (defaults to the keyword)
        #[arg(long)]
        category: Option<String>,
        /// Region code for the video search
        #[arg(long, default_value = "kr")]
        region: Region,
        /// Subscriber band, e.g. `10k-50k`
        #[arg(long, default_value = "all")]
        range: SubscriberRange,
        /// Videos requested per keyword (1-50)
        #[arg(long, default_value = "50")]
        max_results: u32,
        /// Skip the generative fallback for descriptions without an email
        #[arg(long)]
        no_generative: bool,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct SearchArgs {
    /// Comma-separated search keywords
    #[arg(long, value_delimiter = ',', required = true)]
    pub keywords: Vec<String>,
    /// Category stored with each contact (defaults to the keyword)
    #[arg(long)]
    pub category: Option<String>,
    /// Result pages fetched per keyword
    #[arg(long, default_value = "1")]
    pub pages: u32,
}

/// Merge outcomes for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MergeTally {
    pub inserted: usize,
    pub skipped: usize,
    pub renamed: usize,
    pub failed: usize,
}

impl MergeTally {
    pub(crate) fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Inserted => self.inserted += 1,
            MergeOutcome::SkippedDuplicate => self.skipped += 1,
            MergeOutcome::UpdatedName => self.renamed += 1,
        }
    }
}

fn category_for<'a>(category: Option<&'a str>, keyword: &'a str) -> &'a str {
    category.map_or(keyword, str::trim)
}

/// Keywords as typed, trimmed, blanks dropped.
pub(crate) fn clean_keywords(keywords: &[String]) -> Vec<&str> {
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect()
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: CollectCommands,
) -> anyhow::Result<()> {
    match command {
        CollectCommands::Instagram { args } => {
            run_collect_search(pool, config, Platform::Instagram, &args).await
        }
        CollectCommands::Tiktok { args } => {
            run_collect_search(pool, config, Platform::TikTok, &args).await
        }
        CollectCommands::Youtube {
            keywords,
            category,
            region,
            range,
            max_results,
            no_generative,
        } => {
            let options = YouTubeOptions {
                category: category.as_deref(),
                region,
                range,
                max_results,
                generative: !no_generative,
            };
            run_collect_youtube(pool, config, &keywords, &options).await
        }
    }
}

/// Merges each contact in turn. A failed merge is logged and counted, and the
/// run moves on; only a store inconsistency stops it.
pub(crate) async fn merge_all<'a, F, Fut>(
    contacts: &'a [ExtractedContact],
    mut merge: F,
) -> anyhow::Result<MergeTally>
where
    F: FnMut(&'a ExtractedContact) -> Fut,
    Fut: Future<Output = Result<MergeOutcome, DbError>>,
{
    let mut tally = MergeTally::default();
    for contact in contacts {
        match merge(contact).await {
            Ok(outcome) => tally.record(outcome),
            Err(err @ DbError::StoreInconsistency(_)) => {
                tracing::error!(
                    email = %contact.email,
                    error = %err,
                    "store inconsistency; stopping merge"
                );
                return Err(err.into());
            }
            Err(err) => {
                tracing::error!(
                    email = %contact.email,
                    error = %err,
                    "merge failed; skipping contact"
                );
                tally.failed += 1;
            }
        }
    }
    Ok(tally)
}

fn print_tally(platform: Platform, tally: MergeTally) {
    println!(
        "{platform}: {} new, {} renamed, {} already known, {} failed",
        tally.inserted, tally.renamed, tally.skipped, tally.failed
    );
}

// ---------------------------------------------------------------------------
// Search-actor platforms
// ---------------------------------------------------------------------------

/// Search each keyword in turn, run the results through the extraction
/// pipeline, and merge what survives.
///
/// # Errors
///
/// Returns an error if no search token is configured, the store is inconsistent,
/// or a search fails (after the contacts gathered so far are merged).
async fn run_collect_search(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    platform: Platform,
    args: &SearchArgs,
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
    let filter = RelevanceFilter::new(Blacklist::with_extra(&config.blacklist_extra));

    let mut contacts = Vec::new();
    let mut failure = None;
    for keyword in clean_keywords(&args.keywords) {
        let query = creator_query(platform, keyword);
        let results = match client.search(&query, args.pages).await {
            Ok(results) => results,
            Err(err) => {
                tracing::error!(keyword, error = %err, "search failed; stopping collection");
                failure = Some(err);
                break;
            }
        };

        let category = category_for(args.category.as_deref(), keyword);
        let batch = harvest(results, platform, category, &filter);
        tracing::info!(
            keyword,
            examined = batch.examined(),
            extracted = batch.contacts.len(),
            filtered = batch.filtered,
            no_email = batch.no_email,
            "keyword harvested"
        );
        contacts.extend(batch.contacts);
    }

    let tally = merge_all(&contacts, |c| glowup_db::merge_contact(pool, c)).await?;
    print_tally(platform, tally);

    match failure {
        Some(err) => Err(err).context("collection stopped early"),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// YouTube
// ---------------------------------------------------------------------------

struct YouTubeOptions<'a> {
    category: Option<&'a str>,
    region: Region,
    range: SubscriberRange,
    max_results: u32,
    generative: bool,
}

fn quota_cost() -> u32 {
    u32::try_from(SEARCH_QUOTA_COST).unwrap_or(u32::MAX)
}

/// `true` if one more keyword search fits in the daily budget.
pub(crate) fn search_budget_left(used: i64, daily_budget: i64) -> bool {
    used.saturating_add(SEARCH_QUOTA_COST) <= daily_budget
}

/// Collect YouTube channels for each keyword, dedupe them across the run,
/// keep those inside the subscriber band and find their contact email.
///
/// # Errors
///
/// Returns an error if no API key is configured, a quota write fails, the
/// store is inconsistent, or a collaborator fails (after the contacts
/// gathered so far are merged).
async fn run_collect_youtube(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    keywords: &[String],
    options: &YouTubeOptions<'_>,
) -> anyhow::Result<()> {
    let api_key = config
        .youtube_api_key
        .as_deref()
        .context("YOUTUBE_API_KEY is not set")?;
    let settings = HttpSettings::from_app_config(config);
    let youtube = YouTubeClient::new(api_key, &settings)?;
    let gemini = match (options.generative, config.gemini_api_key.as_deref()) {
        (true, Some(key)) => Some(GeminiClient::new(key, &config.gemini_model, &settings)?),
        (true, None) => {
            tracing::warn!("GEMINI_API_KEY is not set; descriptions without an email are skipped");
            None
        }
        (false, _) => None,
    };
    let ledger = QuotaLedger::new(pool.clone(), config.quota_policy);

    let mut contacts = Vec::new();
    let gathered = gather_youtube(
        &youtube,
        gemini.as_ref(),
        &ledger,
        config.youtube_daily_quota,
        keywords,
        options,
        &mut contacts,
    )
    .await;

    let tally = merge_all(&contacts, |c| glowup_db::merge_contact(pool, c)).await?;
    print_tally(Platform::YouTube, tally);

    gathered.context("collection stopped early")
}

async fn gather_youtube(
    youtube: &YouTubeClient,
    gemini: Option<&GeminiClient>,
    ledger: &QuotaLedger,
    daily_budget: i64,
    keywords: &[String],
    options: &YouTubeOptions<'_>,
    contacts: &mut Vec<ExtractedContact>,
) -> anyhow::Result<()> {
    let mut seen: HashSet<String> = HashSet::new();

    for keyword in clean_keywords(keywords) {
        let used = ledger.read().await?.external_search_calls;
        if !search_budget_left(used, daily_budget) {
            tracing::warn!(used, daily_budget, "daily search quota exhausted; stopping");
            println!("daily search quota exhausted ({used}/{daily_budget} units)");
            break;
        }

        let ids = youtube
            .search_channel_ids(keyword, options.region, options.max_results)
            .await?;
        let counters = ledger.charge_and_read(quota_cost(), 0).await?;
        tracing::debug!(
            keyword,
            used = counters.external_search_calls,
            "search quota charged"
        );

        let fresh: Vec<String> = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
        let channels = youtube.channels(&fresh).await?;
        let category = category_for(options.category, keyword);

        let mut found = 0usize;
        for channel in channels {
            if !options.range.contains(channel.subscriber_count) {
                tracing::debug!(
                    channel = %channel.id,
                    subscribers = channel.subscriber_count,
                    "outside subscriber range"
                );
                continue;
            }

            let email = match find_email(&channel.description) {
                Some(email) => Some(email),
                None => match gemini {
                    Some(gemini) if needs_generative(&channel.description) => {
                        ledger.charge_and_read(0, 1).await?;
                        gemini.extract_email(&channel.description).await?
                    }
                    _ => None,
                },
            };

            let Some(email) = email else {
                tracing::debug!(channel = %channel.id, "no email in description");
                continue;
            };
            contacts.push(channel.into_contact(email, category));
            found += 1;
        }
        tracing::info!(keyword, channels = fresh.len(), found, "keyword harvested");
    }

    Ok(())
}
