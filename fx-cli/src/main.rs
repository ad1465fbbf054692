//! FX CLI
//!
//! Command-line currency converter backed by a remote rate provider.

mod config;
mod render;
mod session;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fx_client::HttpRateRepository;
use fx_core::ConversionController;
use fx_types::{ConversionRequest, CurrencyCode, RateRepository, parse_amount};

#[derive(Parser)]
#[command(name = "fx")]
#[command(author, version, about = "Currency converter CLI", long_about = None)]
struct Cli {
    /// Base URL of the rate provider (overrides FX_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides FX_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Base fetched at startup to discover supported currencies
    #[arg(long, env = "FX_BOOTSTRAP_BASE", default_value = "USD")]
    bootstrap_base: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported currency codes
    Currencies,
    /// Show the rates of one base currency
    Rates {
        #[arg(long, default_value = "USD")]
        base: String,
    },
    /// Convert an amount once
    Convert {
        /// Amount in the source currency
        amount: String,
        #[arg(long, default_value = "USD")]
        from: String,
        #[arg(long, default_value = "INR")]
        to: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive session
    Interactive,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    let (plain, structured) = if json {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(structured)
        .init();
}

fn parse_code(s: &str) -> Result<CurrencyCode> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid currency code: {:?}", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = config::Config::load(cli.api_url, cli.timeout_secs, &cli.bootstrap_base)?;
    tracing::debug!(url = %config.client.base_url, "using rate provider");

    let repo = HttpRateRepository::new(config.client)?;
    let controller = ConversionController::new(repo, config.controller);

    match cli.command {
        Commands::Currencies => {
            controller.initialize().await?;
            for code in controller.currencies().await {
                println!("{}", code);
            }
        }

        Commands::Rates { base } => {
            let base = parse_code(&base)?;
            let rates = controller.repo().fetch_rates(&base).await?;
            println!("{}", serde_json::to_string_pretty(&rates)?);
        }

        Commands::Convert {
            amount,
            from,
            to,
            json,
        } => {
            let request = ConversionRequest::new(
                parse_amount(&amount)?,
                parse_code(&from)?,
                parse_code(&to)?,
            );
            controller.initialize().await?;
            let result = controller
                .convert(request)
                .await?
                .context("conversion was superseded")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.display_amount);
                println!("{}", result.display_rate);
            }
        }

        Commands::Interactive => {
            session::run(Arc::new(controller)).await?;
        }
    }

    Ok(())
}
