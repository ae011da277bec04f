//! CLI argument definitions for stockcast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quote` | Current quote for a ticker |
//! | `news` | Sentiment-scored news for a ticker |
//! | `predict` | Multi-day price forecast for a ticker |
//! | `dashboard` | Quote, forecast and news together |
//! | `config` | Effective configuration and its violations |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--api-url` | from env | Backend base URL |
//! | `--timeout-ms` | from env | Timeout for every endpoint |
//! | `--cache-ttl-ms` | from env | Cache time-to-live |
//! | `--offline` | `false` | Never contact the backend |
//!
//! Settings not given on the command line come from `STOCKCAST_*`
//! environment variables or a `.env` file.
//!
//! # Examples
//!
//! ```bash
//! stockcast quote AAPL
//! stockcast predict TSLA --horizon 5 --pretty
//! stockcast dashboard MSFT --offline
//! ```

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "stockcast",
    author,
    version,
    about = "Stock quotes, news sentiment and price forecasts",
    long_about = "stockcast queries a prediction backend for quotes, sentiment-scored news and \
multi-day price forecasts. When the backend is unreachable it answers with plausible \
synthetic data instead of failing.\n\
\n\
Use 'stockcast <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Backend base URL, e.g. http://localhost:8000.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in milliseconds, applied to every endpoint.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Cache time-to-live in milliseconds.
    #[arg(long, global = true)]
    pub cache_ttl_ms: Option<u64>,

    /// Do not contact the backend; every answer is synthetic.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the current quote for a ticker.
    ///
    /// # Examples
    ///
    ///   stockcast quote AAPL
    Quote(TickerArgs),

    /// Fetch news with FinBERT sentiment scores.
    ///
    /// # Examples
    ///
    ///   stockcast news TSLA --pretty
    News(TickerArgs),

    /// Forecast the next days' prices.
    ///
    /// # Examples
    ///
    ///   stockcast predict NVDA
    ///   stockcast predict NVDA --horizon 7 --raw
    Predict(PredictArgs),

    /// Quote, forecast and news for one ticker, fetched concurrently.
    Dashboard(TickerArgs),

    /// Print the effective configuration and any violations.
    Config,
}

#[derive(Debug, Args)]
pub struct TickerArgs {
    /// Ticker symbol, e.g. AAPL.
    pub ticker: String,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Ticker symbol, e.g. AAPL.
    pub ticker: String,

    /// Forecast horizon in days (1-30).
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Emit the full prediction result instead of the chart-ready view.
    #[arg(long, default_value_t = false)]
    pub raw: bool,
}
