//! Interactive conversion session.
//!
//! Reads one command per line from stdin and drives the controller. Output is
//! produced by a separate task subscribed to the controller's state.

use std::sync::Arc;

use anyhow::Result;
use fx_core::ConversionController;
use fx_types::{ConvertError, CurrencyCode, RateRepository, parse_amount};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::{rates_freshness, render_loop};

const HELP: &str = "\
commands:
  amount <N>     set the amount to convert
  from <CODE>    set the source currency
  to <CODE>      set the target currency
  swap           exchange source and target
  convert        convert the current selection
  list           list supported currencies
  retry          reload rates after a failed start
  help           show this help
  quit           leave the session";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Amount(f64),
    From(CurrencyCode),
    To(CurrencyCode),
    Swap,
    Convert,
    List,
    Retry,
    Help,
    Quit,
}

impl Command {
    /// Parses an input line. Amounts are validated here, before any fetch.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or("").to_lowercase();
        let arg = parts.next();

        let need = |name: &str| arg.ok_or_else(|| format!("usage: {} <value>", name));

        match verb.as_str() {
            "amount" => parse_amount(need("amount")?)
                .map(Command::Amount)
                .map_err(|e| e.to_string()),
            "from" => parse_code(need("from")?).map(Command::From),
            "to" => parse_code(need("to")?).map(Command::To),
            "swap" => Ok(Command::Swap),
            "convert" | "" => Ok(Command::Convert),
            "list" => Ok(Command::List),
            "retry" => Ok(Command::Retry),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command: {} (type `help`)", other)),
        }
    }
}

fn parse_code(s: &str) -> Result<CurrencyCode, String> {
    s.parse().map_err(|e: ConvertError| e.to_string())
}

/// Runs the session until `quit` or end of input.
pub async fn run<R: RateRepository>(controller: Arc<ConversionController<R>>) -> Result<()> {
    let renderer = tokio::spawn(render_loop(controller.subscribe()));
    println!("{}", HELP);

    if controller.initialize().await.is_ok() {
        let selection = controller.selection().await;
        println!(
            "{} currencies loaded; converting {} {} to {}",
            controller.currencies().await.len(),
            selection.amount,
            selection.source,
            selection.target
        );
        if let Some(rates) = controller.rates().await {
            println!("{}", rates_freshness(&rates));
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        };

        if let Err(e) = execute(&controller, command).await {
            // NotReady is the only error not already published; Superseded is silent.
            if matches!(e, ConvertError::NotReady) {
                eprintln!("{} (type `retry`)", e);
            } else {
                tracing::debug!(error = %e, "command failed");
            }
        }
    }

    controller.dispose().await;
    renderer.abort();
    Ok(())
}

async fn execute<R: RateRepository>(
    controller: &ConversionController<R>,
    command: Command,
) -> Result<(), ConvertError> {
    match command {
        Command::Amount(amount) => controller.set_amount(amount).await.map(drop),
        Command::From(code) => controller.set_source_code(code).await.map(drop),
        Command::To(code) => controller.set_target_code(code).await.map(drop),
        Command::Swap => controller.swap().await.map(drop),
        Command::Convert => controller.convert_selection().await.map(drop),
        Command::Retry => controller.initialize().await,
        Command::List => {
            let codes: Vec<String> = controller
                .currencies()
                .await
                .into_iter()
                .map(String::from)
                .collect();
            println!("{}", codes.join(" "));
            Ok(())
        }
        Command::Help => {
            println!("{}", HELP);
            Ok(())
        }
        Command::Quit => Ok(()),
    }
}
