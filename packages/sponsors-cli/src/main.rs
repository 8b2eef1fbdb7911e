//! GitHub Sponsors CLI
//!
//! Prints sponsorships as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use github_sponsors::{
    AccountType, GitHubSponsors, SponsorsConfig, SponsorsMode, TotalAmountFilter,
};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::{load_tiers, Config};

#[derive(Parser)]
#[command(name = "sponsors")]
#[command(about = "Fetch GitHub Sponsors data")]
#[command(version)]
struct Cli {
    /// Account to query (defaults to SPONSORKIT_GITHUB_LOGIN)
    #[arg(short, long, global = true)]
    login: Option<String>,

    /// `user` or `organization` (defaults to SPONSORKIT_GITHUB_TYPE, then `user`)
    #[arg(short = 't', long = "type", global = true)]
    account_type: Option<AccountType>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List sponsors, or the accounts this one sponsors
    List(ListArgs),

    /// Lifetime amount given as a sponsor, in cents
    Total {
        /// Only count sponsorships from this RFC 3339 instant on
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Only count sponsorships up to this RFC 3339 instant
        #[arg(long)]
        until: Option<DateTime<Utc>>,

        /// Only count these sponsorables
        #[arg(short, long)]
        sponsorable: Vec<String>,
    },
}

#[derive(Args, Default)]
struct ListArgs {
    /// `sponsors` or `sponsees`
    #[arg(short, long, default_value = "sponsors")]
    mode: SponsorsMode,

    /// JSON tier catalog used to prorate lapsed one-time sponsorships
    #[arg(long, value_name = "FILE")]
    tiers: Option<PathBuf>,

    /// Include sponsorships that are no longer active
    #[arg(long)]
    include_past: bool,

    /// Prorate lapsed one-time sponsorships over the tier catalog
    #[arg(long)]
    prorate_onetime: bool,

    /// Keep private sponsorships in the output
    #[arg(long)]
    include_private: bool,

    /// Cap on concurrent lifetime-total queries (sponsees mode)
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,github_sponsors=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.login, cli.account_type)?;

    let client = GitHubSponsors::new(config.token.as_str())
        .context("Failed to create GitHub client")?;

    match cli.command {
        Some(Commands::List(args)) => cmd_list(&client, &config, args).await,
        Some(Commands::Total {
            since,
            until,
            sponsorable,
        }) => cmd_total(&client, &config, since, until, sponsorable).await,
        None => cmd_list(&client, &config, ListArgs::default()).await,
    }
}

async fn cmd_list(client: &GitHubSponsors, config: &Config, args: ListArgs) -> Result<()> {
    let tiers = match &args.tiers {
        Some(path) => load_tiers(path)?,
        None => vec![],
    };

    let mut options = SponsorsConfig::new()
        .with_mode(args.mode)
        .with_tiers(tiers)
        .with_past_sponsors(args.include_past)
        .with_prorate_onetime(args.prorate_onetime)
        .with_private(args.include_private);
    if let Some(limit) = args.concurrency {
        options = options.with_total_concurrency(limit);
    }

    tracing::info!(
        login = %config.login,
        account_type = %config.account_type,
        mode = ?options.mode,
        "Fetching sponsorships"
    );

    let sponsorships = client
        .fetch(&config.login, config.account_type, &options)
        .await
        .with_context(|| format!("Failed to fetch sponsorships for {}", config.login))?;

    println!("{}", serde_json::to_string_pretty(&sponsorships)?);
    Ok(())
}

async fn cmd_total(
    client: &GitHubSponsors,
    config: &Config,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    sponsorables: Vec<String>,
) -> Result<()> {
    let mut filter = TotalAmountFilter::new();
    if let Some(since) = since {
        filter = filter.since(since);
    }
    if let Some(until) = until {
        filter = filter.until(until);
    }
    for sponsorable in sponsorables {
        filter = filter.sponsorable(sponsorable);
    }

    let cents = client
        .fetch_total_amount(&config.login, config.account_type, &filter)
        .await
        .with_context(|| format!("Failed to fetch total amount for {}", config.login))?;

    let output = json!({
        "login": config.login,
        "totalCents": cents,
        "totalDollars": cents as f64 / 100.0,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
