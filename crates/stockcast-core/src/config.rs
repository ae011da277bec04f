//! Runtime configuration for the backend connection, the forecast model
//! request and the result cache.
//!
//! Defaults suit a backend on `localhost:8000`. [`StockcastConfig::from_env`]
//! reads a `.env` file (if any) and `STOCKCAST_*` overrides on top.

use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::{HistoryPeriod, SentimentThresholds};

/// Backend location and transport limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeouts: EndpointTimeouts,
    /// Carried for deployments that wrap the transport; requests are sent once.
    pub retry_attempts: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:8000"),
            timeouts: EndpointTimeouts::default(),
            retry_attempts: 3,
        }
    }
}

/// Per-endpoint request timeouts in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointTimeouts {
    pub quote_ms: u64,
    pub historical_ms: u64,
    pub news_ms: u64,
    pub predict_ms: u64,
}

impl EndpointTimeouts {
    /// Same timeout for every endpoint.
    pub const fn uniform(timeout_ms: u64) -> Self {
        Self {
            quote_ms: timeout_ms,
            historical_ms: timeout_ms,
            news_ms: timeout_ms,
            predict_ms: timeout_ms,
        }
    }
}

impl Default for EndpointTimeouts {
    fn default() -> Self {
        Self {
            predict_ms: 30_000,
            ..Self::uniform(10_000)
        }
    }
}

/// How the backend should weigh news sentiment. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentConfig {
    pub thresholds: SentimentThresholds,
    pub weighting_strategy: String,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            thresholds: SentimentThresholds::default(),
            weighting_strategy: String::from("finbert"),
        }
    }
}

/// Forecast model parameters, passed through to the predict endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub sequence_length: u32,
    pub features: Vec<String>,
    pub epochs: u32,
    pub batch_size: u32,
    pub learning_rate: f64,
    pub prediction_days: u32,
    pub history_period: HistoryPeriod,
    pub sentiment: SentimentConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            sequence_length: 60,
            features: vec![
                String::from("close"),
                String::from("volume"),
                String::from("sentiment"),
            ],
            epochs: 100,
            batch_size: 32,
            learning_rate: 0.001,
            prediction_days: 3,
            history_period: HistoryPeriod::default(),
            sentiment: SentimentConfig::default(),
        }
    }
}

impl ModelConfig {
    /// Range-check every field. Returns one message per violation; an empty
    /// list means the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if !(10..=500).contains(&self.sequence_length) {
            violations.push(format!(
                "sequence_length must be between 10 and 500 (got {})",
                self.sequence_length
            ));
        }
        if self.features.is_empty() {
            violations.push(String::from("features must list at least one input"));
        }
        if self.features.iter().any(|feature| feature.trim().is_empty()) {
            violations.push(String::from("features must not contain blank names"));
        }
        if !(1..=1000).contains(&self.epochs) {
            violations.push(format!(
                "epochs must be between 1 and 1000 (got {})",
                self.epochs
            ));
        }
        if !(1..=1024).contains(&self.batch_size) {
            violations.push(format!(
                "batch_size must be between 1 and 1024 (got {})",
                self.batch_size
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            violations.push(format!(
                "learning_rate must be in (0, 1] (got {})",
                self.learning_rate
            ));
        }
        if !(1..=30).contains(&self.prediction_days) {
            violations.push(format!(
                "prediction_days must be between 1 and 30 (got {})",
                self.prediction_days
            ));
        }

        let thresholds = self.sentiment.thresholds;
        let in_unit_range = |value: f64| (-1.0..=1.0).contains(&value);
        if !in_unit_range(thresholds.positive) || !in_unit_range(thresholds.negative) {
            violations.push(String::from(
                "sentiment thresholds must lie within [-1, 1]",
            ));
        }
        if thresholds.negative > thresholds.positive {
            violations.push(format!(
                "negative sentiment threshold {} exceeds positive threshold {}",
                thresholds.negative, thresholds.positive
            ));
        }
        if self.sentiment.weighting_strategy.trim().is_empty() {
            violations.push(String::from("weighting_strategy must not be empty"));
        }

        violations
    }
}

/// Result cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheConfig {
    pub ttl_ms: u64,
}

impl CacheConfig {
    pub const fn ttl(self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_ms: 300_000 }
    }
}

/// Complete configuration surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockcastConfig {
    pub api: ApiConfig,
    pub model: ModelConfig,
    pub cache: CacheConfig,
}

impl StockcastConfig {
    /// Defaults overridden by a `.env` file and `STOCKCAST_*` variables.
    pub fn from_env() -> Self {
        if let Err(error) = dotenvy::dotenv() {
            if !error.not_found() {
                tracing::warn!("ignoring unreadable .env file: {error}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `STOCKCAST_*` key. Unparsable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let api = &mut config.api;
        let model = &mut config.model;

        if let Some(url) = lookup("STOCKCAST_API_URL") {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                api.base_url = url.to_owned();
            }
        }
        if let Some(timeout_ms) = parse_var(&lookup, "STOCKCAST_TIMEOUT_MS") {
            let predict_ms = api.timeouts.predict_ms;
            api.timeouts = EndpointTimeouts {
                predict_ms,
                ..EndpointTimeouts::uniform(timeout_ms)
            };
        }
        override_var(&lookup, "STOCKCAST_PREDICT_TIMEOUT_MS", &mut api.timeouts.predict_ms);
        override_var(&lookup, "STOCKCAST_RETRY_ATTEMPTS", &mut api.retry_attempts);

        override_var(&lookup, "STOCKCAST_SEQUENCE_LENGTH", &mut model.sequence_length);
        if let Some(features) = lookup("STOCKCAST_FEATURES") {
            model.features = features
                .split(',')
                .map(|feature| feature.trim().to_owned())
                .filter(|feature| !feature.is_empty())
                .collect();
        }
        override_var(&lookup, "STOCKCAST_EPOCHS", &mut model.epochs);
        override_var(&lookup, "STOCKCAST_BATCH_SIZE", &mut model.batch_size);
        override_var(&lookup, "STOCKCAST_LEARNING_RATE", &mut model.learning_rate);
        override_var(&lookup, "STOCKCAST_PREDICTION_DAYS", &mut model.prediction_days);
        override_var(&lookup, "STOCKCAST_HISTORY_PERIOD", &mut model.history_period);
        override_var(
            &lookup,
            "STOCKCAST_SENTIMENT_POSITIVE",
            &mut model.sentiment.thresholds.positive,
        );
        override_var(
            &lookup,
            "STOCKCAST_SENTIMENT_NEGATIVE",
            &mut model.sentiment.thresholds.negative,
        );
        if let Some(strategy) = lookup("STOCKCAST_WEIGHTING_STRATEGY") {
            model.sentiment.weighting_strategy = strategy.trim().to_owned();
        }

        override_var(&lookup, "STOCKCAST_CACHE_TTL_MS", &mut config.cache.ttl_ms);

        config
    }

    /// Model violations plus API and cache checks.
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        let base_url = self.api.base_url.as_str();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            violations.push(format!(
                "api base_url must start with http:// or https:// (got '{base_url}')"
            ));
        }
        let timeouts = self.api.timeouts;
        if [
            timeouts.quote_ms,
            timeouts.historical_ms,
            timeouts.news_ms,
            timeouts.predict_ms,
        ]
        .contains(&0)
        {
            violations.push(String::from("endpoint timeouts must be greater than zero"));
        }

        violations.extend(self.model.validate());
        violations
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = raw.as_str(), "ignoring unparsable configuration value");
            None
        }
    }
}

fn override_var<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(value) = parse_var(lookup, key) {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = StockcastConfig::default();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.model.prediction_days, 3);
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn env_overrides_apply() {
        let config = StockcastConfig::from_lookup(lookup_from(&[
            ("STOCKCAST_API_URL", "https://forecast.example.com/"),
            ("STOCKCAST_TIMEOUT_MS", "2500"),
            ("STOCKCAST_PREDICTION_DAYS", "5"),
            ("STOCKCAST_FEATURES", "close, rsi ,"),
            ("STOCKCAST_HISTORY_PERIOD", "1y"),
            ("STOCKCAST_CACHE_TTL_MS", "1000"),
        ]));

        assert_eq!(config.api.base_url, "https://forecast.example.com");
        assert_eq!(config.api.timeouts.quote_ms, 2500);
        assert_eq!(config.api.timeouts.news_ms, 2500);
        assert_eq!(config.api.timeouts.predict_ms, 30_000);
        assert_eq!(config.model.prediction_days, 5);
        assert_eq!(config.model.features, vec!["close", "rsi"]);
        assert_eq!(config.model.history_period, HistoryPeriod::OneYear);
        assert_eq!(config.cache.ttl_ms, 1000);
    }

    #[test]
    fn unparsable_values_keep_defaults() {
        let config = StockcastConfig::from_lookup(lookup_from(&[
            ("STOCKCAST_EPOCHS", "many"),
            ("STOCKCAST_LEARNING_RATE", "fast"),
        ]));

        assert_eq!(config.model.epochs, 100);
        assert_eq!(config.model.learning_rate, 0.001);
    }

    #[test]
    fn validation_lists_every_violation() {
        let model = ModelConfig {
            sequence_length: 2,
            features: Vec::new(),
            epochs: 0,
            batch_size: 4096,
            learning_rate: 0.0,
            prediction_days: 90,
            sentiment: SentimentConfig {
                thresholds: SentimentThresholds {
                    positive: -0.5,
                    negative: 0.5,
                },
                weighting_strategy: String::new(),
            },
            ..ModelConfig::default()
        };

        let violations = model.validate();
        assert_eq!(violations.len(), 8, "{violations:?}");
        assert!(violations.iter().any(|v| v.starts_with("sequence_length")));
        assert!(violations.iter().any(|v| v.starts_with("learning_rate")));
        assert!(violations.iter().any(|v| v.contains("exceeds positive threshold")));
    }

    #[test]
    fn config_validation_checks_api_surface() {
        let mut config = StockcastConfig::default();
        config.api.base_url = String::from("localhost:8000");
        config.api.timeouts.news_ms = 0;

        let violations = config.validate();
        assert_eq!(violations.len(), 2, "{violations:?}");
    }
}
