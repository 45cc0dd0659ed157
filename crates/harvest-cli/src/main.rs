use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use harvest_core::models::ScrapeUrl;
use harvest_core::status::UrlStatus;
use harvest_core::traits::UrlQueue;
use harvest_db::{Database, DatabaseConfig};

#[derive(Parser)]
#[command(name = "harvest", version, about = "Operator tools for the Harvest URL queue")]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create any missing tables
    Migrate,

    /// Show pending URLs in queue order without claiming them
    Pending {
        /// Maximum number of URLs to show
        #[arg(short, long, default_value_t = 100)]
        limit: u64,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Claim the next pending URLs, moving them to in_progress
    Claim {
        /// Maximum number of URLs to claim
        #[arg(short, long, default_value_t = 10)]
        limit: u64,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Record the outcome of a scrape
    Complete {
        /// URL identifier
        #[arg(short, long)]
        id: Uuid,

        /// Scrape outcome
        #[arg(short, long, value_enum)]
        status: Outcome,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Outcome {
    Success,
    Failed,
}

impl From<Outcome> for UrlStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => UrlStatus::Success,
            Outcome::Failed => UrlStatus::Failed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("harvest_db=warn".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = connect_db(cli.database_url).await?;

    match cli.command {
        Commands::Migrate => {
            db.migrate().await.context("Migration failed")?;
            println!("Database schema is up to date.");
        }
        Commands::Pending { limit, json } => {
            let urls = db.url_repo().pending_ordered(limit).await?;
            print_urls(&urls, json, "No pending URLs.")?;
        }
        Commands::Claim { limit, json } => {
            let urls = db.url_repo().claim_pending(limit).await?;
            print_urls(&urls, json, "Nothing to claim.")?;
        }
        Commands::Complete { id, status } => {
            let status = UrlStatus::from(status);
            match db.url_repo().mark_scraped(id, status).await? {
                Some(url) => println!("{} -> {}", url.id, url.status),
                None => anyhow::bail!("No URL with ID {id}"),
            }
        }
    }

    Ok(())
}

/// Connect using `--database-url`/`DATABASE_URL`, plus the pool settings from the environment.
async fn connect_db(database_url: String) -> Result<Database> {
    let config = DatabaseConfig::with_pool_env(database_url)?;
    tracing::debug!(max_connections = config.max_connections, "Connecting to database");

    Database::connect(&config)
        .await
        .context("Failed to connect to database")
}

fn print_urls(urls: &[ScrapeUrl], json: bool, empty_message: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(urls)?);
        return Ok(());
    }

    if urls.is_empty() {
        println!("{empty_message}");
        return Ok(());
    }

    for url in urls {
        println!(
            "  [p{:>2}] {} {} (queued {}, {})",
            url.priority.get(),
            url.id,
            url.url,
            url.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            url.status,
        );
    }

    Ok(())
}
