mod config;
mod dashboard;
mod news;
mod predict;
mod quote;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use stockcast_core::{
    EndpointTimeouts, HttpClient, OfflineHttpClient, PredictionOrchestrator, ReqwestHttpClient,
    StockcastConfig,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::{Envelope, EnvelopeMeta};

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    run_with(cli, StockcastConfig::from_env()).await
}

/// Run `cli` against `base` with command-line overrides applied.
async fn run_with(cli: &Cli, base: StockcastConfig) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let config = effective_config(cli, base);

    let (result, source) = match &cli.command {
        Command::Config => (config::run(&config)?, "config"),
        Command::Quote(args) => {
            let orchestrator = build_orchestrator(cli, &config)?;
            let result = quote::run(args, &orchestrator).await?;
            (result, orchestrator.provider().source_name())
        }
        Command::News(args) => {
            let orchestrator = build_orchestrator(cli, &config)?;
            let result = news::run(args, &orchestrator).await?;
            (result, orchestrator.provider().source_name())
        }
        Command::Predict(args) => {
            let orchestrator = build_orchestrator(cli, &config)?;
            let result = predict::run(args, &orchestrator).await?;
            (result, orchestrator.provider().source_name())
        }
        Command::Dashboard(args) => {
            let orchestrator = build_orchestrator(cli, &config)?;
            let result = dashboard::run(args, &orchestrator).await?;
            (result, orchestrator.provider().source_name())
        }
    };

    Ok(finish(result, source, started, cli))
}

/// Validated configuration wired to the live or offline transport.
fn build_orchestrator(
    cli: &Cli,
    config: &StockcastConfig,
) -> Result<PredictionOrchestrator, CliError> {
    let violations = config.validate();
    if !violations.is_empty() {
        return Err(CliError::InvalidConfig { violations });
    }

    let http_client: Arc<dyn HttpClient> = if cli.offline {
        Arc::new(OfflineHttpClient)
    } else {
        Arc::new(ReqwestHttpClient::new())
    };
    tracing::debug!(base_url = config.api.base_url.as_str(), "orchestrator ready");
    Ok(PredictionOrchestrator::from_config(config, http_client))
}

/// `base` with command-line overrides applied.
fn effective_config(cli: &Cli, base: StockcastConfig) -> StockcastConfig {
    let mut config = base;

    if let Some(api_url) = &cli.api_url {
        config.api.base_url = api_url.trim().trim_end_matches('/').to_owned();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.api.timeouts = EndpointTimeouts::uniform(timeout_ms);
    }
    if let Some(ttl_ms) = cli.cache_ttl_ms {
        config.cache.ttl_ms = ttl_ms;
    }
    if let Command::Predict(args) = &cli.command {
        if let Some(horizon) = args.horizon {
            config.model.prediction_days = horizon;
        }
    }

    config
}

fn finish(result: CommandResult, source: &str, started: Instant, cli: &Cli) -> Envelope<Value> {
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = EnvelopeMeta::new(source, latency_ms);

    if cli.offline {
        meta.push_warning("offline mode: backend was not contacted");
    }
    for warning in result.warnings {
        meta.push_warning(warning);
    }

    Envelope::new(meta, result.data)
}
