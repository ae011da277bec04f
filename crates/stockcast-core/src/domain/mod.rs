//! # Domain Models
//!
//! Value objects exchanged with the prediction backend and handed to the UI.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Quote`] | Current price snapshot with 52-week range and valuation |
//! | [`HistoricalBar`] | Daily OHLCV bar |
//! | [`NewsArticle`] | Article with heuristic and FinBERT sentiment scores |
//! | [`ForecastPoint`] | Predicted price with confidence band |
//! | [`SentimentWeights`] | Label fractions plus mean FinBERT score |
//! | [`PredictionResult`] | Unified forecast, history, metrics and sentiment |
//! | [`Ticker`] | Validated, upper-cased stock symbol |
//! | [`HistoryPeriod`] | Lookback window for historical bars |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Values are created fresh per fetch and replaced, never mutated, on refresh.
//! Wire names follow the backend's camelCase JSON.

mod models;
mod period;
mod ticker;
mod timestamp;

pub use models::{
    ForecastPoint, HistoricalBar, ModelMetrics, NewsArticle, PredictionResult, Quote,
    SentimentLabel, SentimentThresholds, SentimentWeights, Trend,
};
pub use period::HistoryPeriod;
pub use ticker::Ticker;
pub use timestamp::{format_date, iso_date, parse_date, short_label, UtcDateTime};
