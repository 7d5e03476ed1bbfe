mod command;
mod telegram;

pub use command::*;
pub use telegram::*;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::application::{AppError, LedgerService};
use crate::domain::{format_cents, Cents};
use crate::rates::{CurrencyConverter, Pair};

/// The dispatch loop: pulls updates, handles each message in its own
/// task, and replies in the originating chat. Per-message failures are
/// reported back to the user; only transport-level polling failures are
/// retried with a backoff.
pub struct Bot {
    telegram: Arc<TelegramClient>,
    service: Arc<LedgerService>,
    rates: Arc<CurrencyConverter>,
}

impl Bot {
    pub fn new(telegram: TelegramClient, service: LedgerService, rates: CurrencyConverter) -> Self {
        Self {
            telegram: Arc::new(telegram),
            service: Arc::new(service),
            rates: Arc::new(rates),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        info!("bot started, polling for updates");
        let mut offset = 0i64;
        loop {
            let updates = match self.telegram.get_updates(offset).await {
                Ok(updates) => updates,
                Err(err) => {
                    warn!(%err, "polling failed, backing off");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some(message) = update.message else { continue };
                let Some(text) = message.text else { continue };

                // Messages may overlap in time; the ledger's own lock
                // serializes the mutations.
                let telegram = Arc::clone(&self.telegram);
                let service = Arc::clone(&self.service);
                let rates = Arc::clone(&self.rates);
                tokio::spawn(async move {
                    if let Some(reply) = respond(&service, &rates, &text).await {
                        if let Err(err) = telegram.send_message(message.chat.id, &reply).await {
                            warn!(%err, chat_id = message.chat.id, "failed to send reply");
                        }
                    }
                });
            }
        }
    }
}

/// Turn one incoming message into a reply, if it was a command at all.
pub async fn respond(
    service: &LedgerService,
    rates: &CurrencyConverter,
    text: &str,
) -> Option<String> {
    let command = match parse_command(text)? {
        Ok(command) => command,
        Err(usage) => return Some(format!("⚠️ {}", usage)),
    };
    debug!(?command, "dispatching");
    Some(dispatch(service, rates, command).await)
}

async fn dispatch(service: &LedgerService, rates: &CurrencyConverter, command: Command) -> String {
    let result = match command {
        Command::Help => Ok(help_text()),

        Command::AddAccount { name } => service
            .create_account(&name)
            .await
            .map(|name| format!("✅ Account '{}' added.", name)),

        Command::DeleteAccount { name } => service
            .delete_account(&name)
            .await
            .map(|name| format!("🗑 Account '{}' deleted.", name)),

        Command::ShowBalances => Ok(render_balances(service.balances().await)),

        Command::Record {
            account,
            amount_expr,
            comment,
        } => service
            .record_transaction(&account, &amount_expr, &comment)
            .await
            .map(|tx| {
                let mut reply = format!(
                    "💾 Recorded {} {}",
                    format_cents(tx.amount_cents),
                    tx.account.to_uppercase()
                );
                if let Some(comment) = &tx.comment {
                    reply.push_str(&format!(" ({})", comment));
                }
                reply
            }),

        // Runs in the dispatch layer, outside any ledger lock.
        Command::ConvertRate { pair, amount } => convert(rates, &pair, amount).await,
    };

    result.unwrap_or_else(|err| error_reply(&err))
}

async fn convert(rates: &CurrencyConverter, pair: &str, amount: f64) -> Result<String, AppError> {
    let pair = Pair::parse(pair)?;
    let conversion = rates.convert(pair, amount).await?;
    Ok(format!(
        "{} {} = {:.4} {}\n1 {} = {:.4} {}",
        conversion.amount,
        conversion.pair.base,
        conversion.result,
        conversion.pair.quote,
        conversion.pair.base,
        conversion.rate,
        conversion.pair.quote,
    ))
}

fn render_balances(balances: Vec<(String, Cents)>) -> String {
    if balances.is_empty() {
        return "📊 Balances:\nNo accounts yet.".to_string();
    }
    let lines: Vec<String> = balances
        .iter()
        .map(|(name, cents)| format!("{}: {}", name.to_uppercase(), format_cents(*cents)))
        .collect();
    format!("📊 Balances:\n{}", lines.join("\n"))
}

fn error_reply(err: &AppError) -> String {
    format!("⚠️ {}", err)
}
