use chrono::{Duration, Utc};
use clap::Subcommand;
use glowup_core::AppConfig;
use glowup_db::QuotaLedger;

/// Sub-commands available under `quota`.
#[derive(Debug, Subcommand)]
pub enum QuotaCommands {
    /// Show usage in the current window and the search budget left
    Show,
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: QuotaCommands,
) -> anyhow::Result<()> {
    match command {
        QuotaCommands::Show => run_show(pool, config).await,
    }
}

async fn run_show(pool: &sqlx::PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let ledger = QuotaLedger::new(pool.clone(), config.quota_policy);
    let counters = ledger.read().await?;
    let policy = ledger.policy();
    let offset = policy.utc_offset();
    let next_reset = policy.last_boundary(Utc::now()) + Duration::days(1);
    let budget = config.youtube_daily_quota;
    let remaining = (budget - counters.external_search_calls).max(0);

    println!(
        "search units:     {} / {budget} ({remaining} left)",
        counters.external_search_calls
    );
    println!("generative calls: {} (cumulative)", counters.generative_calls);
    println!(
        "last reset:       {}",
        counters.last_reset_at.with_timezone(&offset).format("%Y-%m-%d %H:%M %:z")
    );
    println!(
        "next reset:       {}",
        next_reset.with_timezone(&offset).format("%Y-%m-%d %H:%M %:z")
    );
    Ok(())
}
