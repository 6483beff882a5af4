mod commands;
mod window;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::Context;
use crate::window::WindowArgs;

#[derive(Debug, Parser)]
#[command(name = "gsclens")]
#[command(about = "Search Console analytics with optional AI-written insights")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the properties visible to the access token
    Properties,
    /// Show a property's permission level and submitted sitemaps
    Sitemaps {
        /// Search Console property (defaults to `GSCLENS_DEFAULT_PROPERTY`)
        #[arg(long)]
        property: Option<String>,
    },
    /// Headline clicks, impressions, CTR and position
    Overview(WindowArgs),
    /// Daily traffic trend
    Trends(WindowArgs),
    /// Queries with many impressions but a weak position and low CTR
    Opportunities {
        #[command(flatten)]
        window: WindowArgs,
        /// Minimum impressions for a query to qualify
        #[arg(long, default_value_t = 100)]
        min_impressions: u64,
    },
    /// Top pages by clicks
    Content(WindowArgs),
    /// Compare the window with the preceding window of equal length
    Compare(WindowArgs),
    /// Branded versus non-branded traffic
    Branded(WindowArgs),
    /// Performance of queries mentioning competitor keywords
    Competitors(WindowArgs),
    /// Deterministic executive report
    Report {
        #[command(flatten)]
        window: WindowArgs,
        /// Period label used in the report title
        #[arg(long, default_value = "monthly")]
        period: String,
    },
    /// Ask a free-form question about the window's data
    Ask {
        /// The question to answer
        question: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Print suggested questions for `ask`
    Suggestions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = gsclens_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, command = ?cli.command, "starting gsclens");

    let keywords = commands::load_keywords_or_default(&config.keywords_path)?;
    let ctx = Context {
        orchestrator: gsclens_insights::ReportOrchestrator::from_config(&config),
        today: chrono::Local::now().date_naive(),
        config,
    };

    match &cli.command {
        Commands::Properties => commands::run_properties(&ctx).await?,
        Commands::Sitemaps { property } => {
            commands::run_sitemaps(&ctx, property.as_deref()).await?;
        }
        Commands::Overview(window) => commands::run_overview(&ctx, window).await?,
        Commands::Trends(window) => commands::run_trends(&ctx, window).await?,
        Commands::Opportunities {
            window,
            min_impressions,
        } => commands::run_opportunities(&ctx, window, *min_impressions).await?,
        Commands::Content(window) => commands::run_content(&ctx, window).await?,
        Commands::Compare(window) => commands::run_compare(&ctx, window).await?,
        Commands::Branded(window) => commands::run_branded(&ctx, window, &keywords).await?,
        Commands::Competitors(window) => {
            commands::run_competitors(&ctx, window, &keywords).await?;
        }
        Commands::Report { window, period } => {
            commands::run_report(&ctx, window, period).await?;
        }
        Commands::Ask { question, window } => commands::run_ask(&ctx, window, question).await?,
        Commands::Suggestions => commands::run_suggestions(),
    }

    Ok(())
}
