use stockcast_core::{PredictionOrchestrator, Ticker};

use crate::cli::TickerArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &TickerArgs,
    orchestrator: &PredictionOrchestrator,
) -> Result<CommandResult, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;
    let dashboard = orchestrator.get_dashboard(&ticker).await;

    Ok(CommandResult::ok(serde_json::to_value(dashboard)?))
}
