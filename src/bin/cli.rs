use clap::{Parser, Subcommand};
use game_price_engine::{EngineConfig, PriceEngine};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "game-price-cli")]
#[command(about = "Multi-region game price lookup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overall deadline for one lookup
    #[arg(short, long, default_value = "20")]
    timeout_secs: u64,

    /// Print JSON instead of chat text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Prices for a game in every configured country
    Find {
        /// Game name
        query: String,
    },

    /// Plain store search in the baseline region
    Search {
        /// Search query
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_price_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_yaml_file(path)?,
        None => EngineConfig::default(),
    }
    .apply_env_overrides();

    let engine = PriceEngine::from_config(&config)?;
    let timeout = Duration::from_secs(cli.timeout_secs);

    match cli.command {
        Commands::Find { query } => {
            eprintln!("🔍 Looking up: {}", query);

            let reply = engine.handle_within(&query, timeout).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!("{}", engine.render(&reply));
            }
        }

        Commands::Search { query } => {
            eprintln!("🔍 Searching for: {}", query);

            let hits = engine.search(&query).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                println!("{}", engine.formatter().format_search_results(&hits));
            }
        }
    }

    Ok(())
}
