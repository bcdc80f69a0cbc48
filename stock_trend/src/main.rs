use anyhow::{Context, Result};
use clap::Parser;
use indexmap::IndexSet;
use stock_trend::{
    Session,
    aggregator::Aggregator,
    cli::{
        commands::{Cli, Commands},
        params::{SESSION_HELP, SessionCommand, parse_symbols},
    },
    config::AppConfig,
    live_quote::LiveQuotePoller,
    providers::build_http_client,
    registry::{build_fallback_fetcher, build_quote_provider, build_suggestion_provider},
    suggest::SuggestionResolver,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn load_config(path: Option<&str>) -> Result<AppConfig> {
    match path {
        Some(p) => AppConfig::load(p).with_context(|| format!("loading {p}")),
        None => Ok(AppConfig::default()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_session(cfg: &AppConfig) -> Result<()> {
    let mut session = Session::from_config(cfg)?;
    session.load().await;
    print_json(&session.view())?;
    eprintln!("{SESSION_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<SessionCommand>() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            SessionCommand::Event(event) => {
                if let Err(warning) = session.dispatch(event).await {
                    eprintln!("warning: {warning}");
                    continue;
                }
                print_json(&session.view())?;
            }
            SessionCommand::Suggest(query) => print_json(&session.suggest(&query).await)?,
            SessionCommand::Pick(symbol) => match session.pick_suggestion(&symbol).await {
                Ok(_) => print_json(&session.view())?,
                Err(warning) => eprintln!("warning: {warning}"),
            },
            SessionCommand::RefreshQuote => {
                session.refresh_live_quote().await;
                print_json(&session.live_quote())?;
            }
            SessionCommand::Show => print_json(&session.view())?,
            SessionCommand::Help => eprintln!("{SESSION_HELP}"),
            SessionCommand::Quit => break,
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    let client = build_http_client(&cfg.http)?;

    match cli.command {
        Commands::History { symbols, range } => {
            let symbols = parse_symbols(&symbols)?;
            anyhow::ensure!(!symbols.is_empty(), "no symbols given");
            let aggregator = Aggregator::new(build_fallback_fetcher(&cfg, &client)?);
            let outcome = aggregator.fetch_all(&symbols, range).await;
            if !outcome.failed.is_empty() {
                eprintln!("no data for: {}", outcome.failed.join(", "));
            }
            print_json(&outcome.series)?;
        }
        Commands::Quote { symbol } => {
            let poller = LiveQuotePoller::new(build_quote_provider(&cfg, &client)?);
            let selected: IndexSet<String> = parse_symbols(&symbol)?.into_iter().collect();
            let mut resolver =
                SuggestionResolver::new(build_suggestion_provider(&cfg, &client)?, &cfg.search);
            resolver.suggest(&symbol).await;
            match poller.refresh(&selected, &resolver).await {
                Some(live) => print_json(&live)?,
                None => anyhow::bail!("no quote available for {symbol}"),
            }
        }
        Commands::Suggest { query } => {
            let mut resolver =
                SuggestionResolver::new(build_suggestion_provider(&cfg, &client)?, &cfg.search);
            print_json(&resolver.suggest(&query).await)?;
        }
        Commands::Session => run_session(&cfg).await?,
    }
    Ok(())
}
