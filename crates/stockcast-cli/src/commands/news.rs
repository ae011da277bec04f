use serde::Serialize;
use stockcast_core::{NewsItem, PredictionOrchestrator, Ticker};

use crate::cli::TickerArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct NewsResponseData {
    symbol: Ticker,
    articles: Vec<NewsItem>,
}

pub async fn run(
    args: &TickerArgs,
    orchestrator: &PredictionOrchestrator,
) -> Result<CommandResult, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;
    let articles = orchestrator.get_news(&ticker).await;

    let data = serde_json::to_value(NewsResponseData {
        symbol: ticker,
        articles,
    })?;
    Ok(CommandResult::ok(data))
}
