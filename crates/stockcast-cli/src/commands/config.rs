use serde::Serialize;
use stockcast_core::{ApiConfig, CacheConfig, ModelConfig, StockcastConfig};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ConfigResponseData<'a> {
    api: &'a ApiConfig,
    model: &'a ModelConfig,
    cache: &'a CacheConfig,
    valid: bool,
    violations: &'a [String],
}

/// Report the effective configuration. Violations are listed as data and
/// repeated as warnings; they never fail the command.
pub fn run(config: &StockcastConfig) -> Result<CommandResult, CliError> {
    let violations = config.validate();
    let data = serde_json::to_value(ConfigResponseData {
        api: &config.api,
        model: &config.model,
        cache: &config.cache,
        valid: violations.is_empty(),
        violations: &violations,
    })?;

    Ok(CommandResult::ok(data).with_warnings(violations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_violations_without_failing() {
        let mut config = StockcastConfig::default();
        config.model.epochs = 0;

        let result = run(&config).expect("config command never fails");

        assert_eq!(result.data["valid"], false);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.data["violations"][0], result.warnings[0].as_str());
        assert_eq!(result.data["model"]["sequenceLength"], 60);
    }
}
