//! Data Provider: one attempt against the market data source per call, with
//! failures reported as values instead of errors.
//!
//! The provider never decides what to show when the source is down. It hands
//! back [`Fetched::Unavailable`] and the caller picks the substitute through
//! [`Fetched::or_fallback`]. The `*_or_synthetic` helpers bundle that choice
//! with the generators in [`crate::synthetic`].

use std::sync::Arc;

use crate::data_source::{ForecastRequest, ForecastResponse, MarketDataSource, SourceError};
use crate::{synthetic, HistoricalBar, HistoryPeriod, NewsArticle, Quote, Ticker, UtcDateTime};

/// Outcome of a fetch that must not fail the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Unavailable(SourceError),
}

impl<T> Fetched<T> {
    pub fn from_result(result: Result<T, SourceError>) -> Self {
        match result {
            Ok(value) => Self::Live(value),
            Err(error) => Self::Unavailable(error),
        }
    }

    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    pub fn error(&self) -> Option<&SourceError> {
        match self {
            Self::Live(_) => None,
            Self::Unavailable(error) => Some(error),
        }
    }

    /// The live value, or whatever `fallback` produces.
    pub fn or_fallback<F>(self, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Self::Live(value) => value,
            Self::Unavailable(_) => fallback(),
        }
    }
}

/// Fetches quotes, history, news and forecasts from a [`MarketDataSource`].
#[derive(Clone)]
pub struct DataProvider {
    source: Arc<dyn MarketDataSource>,
}

impl DataProvider {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn fetch_quote(&self, ticker: &Ticker) -> Fetched<Quote> {
        let fetched = Fetched::from_result(self.source.quote(ticker).await);
        self.log_outcome("quote", ticker, &fetched);
        fetched
    }

    pub async fn fetch_historical(
        &self,
        ticker: &Ticker,
        period: HistoryPeriod,
    ) -> Fetched<Vec<HistoricalBar>> {
        let fetched = Fetched::from_result(self.source.historical(ticker, period).await);
        self.log_outcome("historical", ticker, &fetched);
        fetched
    }

    pub async fn fetch_news_with_sentiment(&self, ticker: &Ticker) -> Fetched<Vec<NewsArticle>> {
        let fetched = Fetched::from_result(self.source.news(ticker).await);
        self.log_outcome("news", ticker, &fetched);
        fetched
    }

    /// Ask the source for a forecast. Unlike the other fetches this surfaces
    /// the failure so the caller can replace the whole prediction.
    ///
    /// Whatever the source, a response that does not match the request
    /// (see [`ForecastResponse::validate`]) is reported as malformed.
    pub async fn request_forecast(
        &self,
        ticker: &Ticker,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, SourceError> {
        tracing::info!(
            source = self.source.name(),
            ticker = ticker.as_str(),
            days = request.prediction_days,
            bars = request.historical_data.len(),
            "requesting forecast"
        );
        let result = self
            .source
            .forecast(ticker, request)
            .await
            .and_then(|response| {
                response.validate(request.prediction_days)?;
                Ok(response)
            });
        if let Err(error) = &result {
            tracing::warn!(
                source = self.source.name(),
                ticker = ticker.as_str(),
                code = error.code(),
                "forecast unavailable: {}",
                error.message()
            );
        }
        result
    }

    pub async fn quote_or_synthetic(&self, ticker: &Ticker) -> Quote {
        self.fetch_quote(ticker)
            .await
            .or_fallback(|| synthetic::quote(ticker))
    }

    pub async fn historical_or_synthetic(
        &self,
        ticker: &Ticker,
        period: HistoryPeriod,
    ) -> Vec<HistoricalBar> {
        self.fetch_historical(ticker, period)
            .await
            .or_fallback(|| synthetic::historical(ticker, period, UtcDateTime::now().date()))
    }

    pub async fn news_or_synthetic(&self, ticker: &Ticker) -> Vec<NewsArticle> {
        self.fetch_news_with_sentiment(ticker)
            .await
            .or_fallback(|| synthetic::news(ticker, UtcDateTime::now()))
    }

    fn log_outcome<T>(&self, what: &'static str, ticker: &Ticker, fetched: &Fetched<T>) {
        match fetched {
            Fetched::Live(_) => tracing::info!(
                source = self.source.name(),
                ticker = ticker.as_str(),
                "fetched {what}"
            ),
            Fetched::Unavailable(error) => tracing::warn!(
                source = self.source.name(),
                ticker = ticker.as_str(),
                code = error.code(),
                "{what} unavailable: {}",
                error.message()
            ),
        }
    }
}
