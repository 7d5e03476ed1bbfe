use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tallybot::application::LedgerService;
use tallybot::bot::{Bot, TelegramClient};
use tallybot::rates::CurrencyConverter;
use tallybot::storage::JsonStore;

/// Tallybot - chat-driven ledger
#[derive(Parser)]
#[command(name = "tallybot")]
#[command(about = "A chat-driven ledger bot for tracking named account balances")]
#[command(version)]
struct Cli {
    /// Ledger state file path
    #[arg(short, long, default_value = "ledger.json")]
    data_file: String,

    /// Long-poll timeout in seconds
    #[arg(long, default_value = "30")]
    poll_timeout: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "tallybot=debug" } else { "tallybot=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let token = std::env::var("TELEGRAM_TOKEN")
        .context("TELEGRAM_TOKEN environment variable is not set")?;

    let service = LedgerService::open(JsonStore::new(&cli.data_file))
        .with_context(|| format!("failed to open ledger state at {}", cli.data_file))?;
    let telegram = TelegramClient::new(&token, cli.poll_timeout)?;
    let rates = CurrencyConverter::new()?;

    Bot::new(telegram, service, rates).run().await
}
