use std::path::PathBuf;

use almanac::cli::{self, EntryKind};
use almanac::client::ApiClient;
use almanac::config::Config;
use almanac::models::ScheduleEntryInput;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "Personal diary and schedule calendar")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (the default)
    Serve,
    /// Print the schedule and diary of one day
    Agenda {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// API root, overrides ALMANAC_API
        #[arg(long)]
        api: Option<String>,
    },
    /// Write a diary entry
    Note {
        title: String,
        content: String,

        /// Day the entry belongs to (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        api: Option<String>,
    },
    /// Add a schedule entry
    Plan {
        title: String,

        /// Start, e.g. "2024-03-10T15:00" (UTC unless an offset is given)
        #[arg(short, long)]
        start: String,

        /// End, e.g. "2024-03-10T16:00"
        #[arg(short, long)]
        end: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        api: Option<String>,
    },
    /// Delete a diary or schedule entry
    Remove {
        #[arg(value_enum)]
        kind: EntryKind,
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        #[arg(long)]
        api: Option<String>,
    },
    /// Load an export file into the local database
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("almanac=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let client = |api: Option<String>| ApiClient::new(api.unwrap_or_else(|| config.api_url.clone()));
    let today = || chrono::Local::now().date_naive();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await,
        Commands::Agenda { date, api } => cli::agenda(client(api), date.unwrap_or_else(today)).await,
        Commands::Note {
            title,
            content,
            date,
            api,
        } => cli::note(client(api), date.unwrap_or_else(today), &title, &content).await,
        Commands::Plan {
            title,
            start,
            end,
            description,
            api,
        } => {
            let input = ScheduleEntryInput {
                title,
                description,
                start_time: start,
                end_time: end,
            };
            cli::plan(client(api), input).await
        }
        Commands::Remove { kind, id, yes, api } => cli::remove(client(api), kind, &id, yes).await,
        Commands::Import { file } => {
            let pool = almanac::db::init_pool(&config.database_url).await?;
            let imported = cli::import_data(&pool, &file).await?;
            println!("Imported {imported} entries");
            Ok(())
        }
    }
}

async fn serve(config: &Config) -> Result<()> {
    let pool = almanac::db::init_pool(&config.database_url)
        .await
        .context("Failed to open database")?;

    let app = almanac::build_app(pool);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
