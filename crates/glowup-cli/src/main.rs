mod brands;
mod collect;
mod creators;
mod outreach;
mod quota;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use brands::BrandCommands;
use collect::CollectCommands;
use creators::CreatorCommands;
use outreach::OutreachCommands;
use quota::QuotaCommands;

#[derive(Debug, Parser)]
#[command(name = "glowup")]
#[command(about = "Creator contact collection and outreach")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Search a platform and merge the contacts found into the store
    Collect {
        #[command(subcommand)]
        command: CollectCommands,
    },
    /// Inspect, export or remove stored creators
    Creators {
        #[command(subcommand)]
        command: CreatorCommands,
    },
    /// Seeding mail to pending creators
    Outreach {
        #[command(subcommand)]
        command: OutreachCommands,
    },
    /// Storefront owner leads and partnership mail
    Brands {
        #[command(subcommand)]
        command: BrandCommands,
    },
    /// External API usage for the current window
    Quota {
        #[command(subcommand)]
        command: QuotaCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database answers
    Ping,
    /// Apply pending migrations
    Migrate,
}

/// `RUST_LOG` wins over `GLOWUP_LOG_LEVEL`; both fall back to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("GLOWUP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = glowup_core::load_app_config_from_env()?;
    let pool = glowup_db::connect_pool(
        &config.database_url,
        glowup_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                glowup_db::ping(&pool).await?;
                println!("database ok");
            }
            DbCommands::Migrate => {
                let applied = glowup_db::run_migrations(&pool).await?;
                println!("applied {applied} migration(s)");
            }
        },
        Commands::Collect { command } => collect::run(&pool, &config, command).await?,
        Commands::Creators { command } => creators::run(&pool, command).await?,
        Commands::Outreach { command } => outreach::run(&pool, &config, command).await?,
        Commands::Brands { command } => brands::run(&pool, &config, command).await?,
        Commands::Quota { command } => quota::run(&pool, &config, command).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
