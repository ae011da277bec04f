//! # Stockcast Core
//!
//! Service layer between a stock-prediction UI and its prediction backend.
//!
//! ## Overview
//!
//! - **Domain models** for quotes, daily bars, scored news and forecasts
//! - **Data source trait** with an HTTP adapter for the backend REST API
//! - **Data provider** that reports upstream failures as values
//! - **Synthetic generators** standing in for data the backend cannot supply
//! - **Sentiment weighting** of news into forecast inputs
//! - **Prediction orchestrator** with per-category TTL caches
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Backend REST adapter |
//! | [`cache`] | Typed TTL cache stores |
//! | [`config`] | Backend, model and cache configuration |
//! | [`data_source`] | Market data source trait and forecast wire types |
//! | [`domain`] | Domain models (Quote, HistoricalBar, NewsArticle, ...) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`orchestrator`] | Cache-or-fetch entry point for clients |
//! | [`provider`] | Data provider and `Fetched` outcomes |
//! | [`sentiment`] | Sentiment weight aggregation |
//! | [`synthetic`] | Deterministic fallback data |
//! | [`view`] | Screen-facing projections |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockcast_core::{PredictionOrchestrator, ReqwestHttpClient, StockcastConfig, Ticker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StockcastConfig::from_env();
//!     let orchestrator =
//!         PredictionOrchestrator::from_config(&config, Arc::new(ReqwestHttpClient::new()));
//!
//!     let ticker = Ticker::parse("AAPL")?;
//!     let prediction = orchestrator.get_prediction(&ticker).await;
//!     println!("{} {} ({}%)", ticker, prediction.trend_label, prediction.confidence_pct);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / UI       │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Orchestrator   │────▶│ Cache stores     │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Data Provider   │────▶│ Synthetic data   │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Data Source     │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest/offline)│
//! └─────────────────┘     └──────────────────┘
//! ```

pub mod adapters;
pub mod cache;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod orchestrator;
pub mod provider;
pub mod sentiment;
pub mod synthetic;
pub mod view;

pub use adapters::BackendAdapter;
pub use cache::{CacheCategory, CacheStats, CacheStore};
pub use config::{
    ApiConfig, CacheConfig, EndpointTimeouts, ModelConfig, SentimentConfig, StockcastConfig,
};
pub use data_source::{
    ForecastRequest, ForecastResponse, MarketDataSource, SourceError, SourceErrorKind,
    SourceFuture,
};
pub use domain::{
    format_date, iso_date, parse_date, short_label, ForecastPoint, HistoricalBar, HistoryPeriod,
    ModelMetrics, NewsArticle, PredictionResult, Quote, SentimentLabel, SentimentThresholds,
    SentimentWeights, Ticker, Trend, UtcDateTime,
};
pub use error::ValidationError;
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, OfflineHttpClient,
    ReqwestHttpClient,
};
pub use orchestrator::PredictionOrchestrator;
pub use provider::{DataProvider, Fetched};
pub use sentiment::calculate_sentiment_weights;
pub use view::{ChartPoint, ChartPointKind, Dashboard, NewsItem, PredictionView};
