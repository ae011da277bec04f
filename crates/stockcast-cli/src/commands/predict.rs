use stockcast_core::{PredictionOrchestrator, Ticker};

use crate::cli::PredictArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &PredictArgs,
    orchestrator: &PredictionOrchestrator,
) -> Result<CommandResult, CliError> {
    let ticker = Ticker::parse(&args.ticker)?;

    let data = if args.raw {
        let result = orchestrator.get_prediction_result(&ticker).await;
        serde_json::to_value(result.as_ref())?
    } else {
        serde_json::to_value(orchestrator.get_prediction(&ticker).await)?
    };

    Ok(CommandResult::ok(data))
}
