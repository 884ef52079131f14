use anyhow::Context;
use clap::Parser;
use kassa_core::mask::card_numbers;
use kassa_core::{run_pipeline, Money, Transaction};
use kassa_import::RateClient;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

mod cli;
mod load;
mod menu;
mod report;
mod settings;

use cli::{Cli, Command, ReportArgs};
use menu::{is_closed_input, Menu};
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let (settings, settings_path) = Settings::load(cli.config.as_deref())?;
    init_tracing(&settings.log_filter);
    if let Some(path) = &settings_path {
        tracing::debug!(path = %path.display(), "loaded settings");
    }

    match cli.command {
        Some(Command::Cards { start, end }) => {
            let mut out = io::stdout().lock();
            for number in card_numbers(start, end) {
                writeln!(out, "{number}")?;
            }
        }
        Some(Command::Report(args)) => run_report(&settings, &args).await?,
        None => {
            let stdin = io::stdin();
            let menu = Menu::new(stdin.lock(), io::stdout().lock());
            if let Err(e) = run_menu(&settings, menu) {
                if !is_closed_input(&e) {
                    return Err(e).context("interactive session failed");
                }
            }
        }
    }
    Ok(())
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_report(settings: &Settings, args: &ReportArgs) -> anyhow::Result<()> {
    let transactions = load::load_transactions(&args.path, None, &settings.csv_options());
    let options = args.pipeline_options(&settings.default_status);
    let selected = run_pipeline(&transactions, &options);

    let mut out = io::stdout().lock();
    report::write_report(&mut out, &selected)?;
    if args.summary {
        report::write_summary(&mut out, &selected, &settings.categories)?;
    }
    if args.convert {
        let client = RateClient::new(settings.rates.base_url.as_str(), settings.api_key())
            .context("failed to build the exchange rate client")?;
        let (total, skipped) = rub_total(&client, &selected).await;
        report::write_rub_total(&mut out, total, skipped)?;
    }
    Ok(())
}

async fn rub_total(client: &RateClient, transactions: &[Transaction]) -> (Money, usize) {
    let mut total = Money::zero();
    let mut skipped = 0;
    for tx in transactions {
        match client
            .convert_to_rub(tx)
            .await
            .and_then(|amount| total.checked_add(amount))
        {
            Some(sum) => total = sum,
            None => skipped += 1,
        }
    }
    (total, skipped)
}

fn run_menu<R: BufRead, W: Write>(settings: &Settings, mut menu: Menu<R, W>) -> io::Result<()> {
    writeln!(menu.output(), "Welcome! This program works with bank transactions.")?;
    let kind = menu.ask_source()?;
    let path = menu.ask_path(kind)?;
    let transactions = load::load_transactions(&path, Some(kind), &settings.csv_options());
    let options = menu.collect_options()?;
    let selected = run_pipeline(&transactions, &options);

    writeln!(menu.output(), "Printing the selected transactions...")?;
    report::write_report(menu.output(), &selected)?;
    if !selected.is_empty() && menu.ask_yes_no("Show a summary?")? {
        report::write_summary(menu.output(), &selected, &settings.categories)?;
    }
    Ok(())
}
