//! Read, export and delete stored creators.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use glowup_core::{CreatorStatus, Platform};
use glowup_db::{CreatorFilter, CreatorRow};
use serde::Serialize;
use uuid::Uuid;

/// Sub-commands available under `creators`.
#[derive(Debug, Subcommand)]
pub enum CreatorCommands {
    /// Print stored creators, newest first
    List {
        #[arg(long)]
        platform: Option<Platform>,
        #[arg(long)]
        status: Option<CreatorStatus>,
        /// Maximum number of rows to print
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    /// Delete creators by email
    Delete {
        /// Email to delete (repeatable)
        #[arg(long = "email", required = true)]
        emails: Vec<String>,
    },
    /// Write creators as JSON
    Export {
        #[arg(long)]
        platform: Option<Platform>,
        #[arg(long)]
        status: Option<CreatorStatus>,
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Export shape for one creator.
#[derive(Debug, Serialize)]
pub(crate) struct CreatorExport<'a> {
    pub id: Uuid,
    pub platform: &'a str,
    pub category: &'a str,
    pub display_name: &'a str,
    pub email: &'a str,
    pub profile_url: &'a str,
    pub subscriber_count: i64,
    pub description: &'a str,
    pub collected_at: DateTime<Utc>,
    pub status: &'a str,
}

impl<'a> From<&'a CreatorRow> for CreatorExport<'a> {
    fn from(row: &'a CreatorRow) -> Self {
        Self {
            id: row.public_id,
            platform: &row.platform,
            category: &row.category,
            display_name: &row.display_name,
            email: &row.email,
            profile_url: &row.profile_url,
            subscriber_count: row.subscriber_count,
            description: &row.description,
            collected_at: row.collected_at,
            status: &row.status,
        }
    }
}

/// Truncate to `max` characters, marking the cut.
pub(crate) fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: CreatorCommands) -> anyhow::Result<()> {
    match command {
        CreatorCommands::List {
            platform,
            status,
            limit,
        } => run_list(pool, CreatorFilter { platform, status }, limit).await,
        CreatorCommands::Delete { emails } => {
            let removed = glowup_db::delete_creators_by_email(pool, &emails).await?;
            println!("deleted {removed} of {} creator(s)", emails.len());
            Ok(())
        }
        CreatorCommands::Export {
            platform,
            status,
            output,
        } => run_export(pool, CreatorFilter { platform, status }, output).await,
    }
}

async fn run_list(pool: &sqlx::PgPool, filter: CreatorFilter, limit: usize) -> anyhow::Result<()> {
    let creators = glowup_db::list_creators(pool, filter).await?;
    if creators.is_empty() {
        println!("no creators found; run `collect` first");
        return Ok(());
    }

    println!(
        "{:<34}{:<11}{:<9}{:>12}  NAME",
        "EMAIL", "PLATFORM", "STATUS", "SUBSCRIBERS"
    );
    for creator in creators.iter().take(limit) {
        println!(
            "{:<34}{:<11}{:<9}{:>12}  {}",
            clip(&creator.email, 32),
            creator.platform,
            creator.status,
            creator.subscriber_count,
            clip(&creator.display_name, 30)
        );
    }
    if creators.len() > limit {
        println!("... {} more", creators.len() - limit);
    }

    Ok(())
}

async fn run_export(
    pool: &sqlx::PgPool,
    filter: CreatorFilter,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let creators = glowup_db::list_creators(pool, filter).await?;
    let rows: Vec<CreatorExport<'_>> = creators.iter().map(CreatorExport::from).collect();
    let json = serde_json::to_string_pretty(&rows)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("exported {} creator(s) to {}", rows.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
