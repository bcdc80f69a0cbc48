use clap::{Parser, Subcommand};

use crate::models::range::Range;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the config file (stock_trend.toml). Defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and merge the closing-price series of several symbols
    History {
        /// Comma-separated list of symbols (e.g. "AAPL,TSLA")
        #[arg(long)]
        symbols: String,

        /// Lookback window: 1d, 5d, 1mo, 6mo, ytd, 1y, 5y
        #[arg(long, default_value = "1mo")]
        range: Range,
    },

    /// Fetch the live quote of one symbol
    Quote {
        #[arg(long)]
        symbol: String,
    },

    /// Look up symbols matching a partial name
    Suggest {
        #[arg(long)]
        query: String,
    },

    /// Run an interactive comparison session reading commands from stdin
    Session,
}
