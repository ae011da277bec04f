//! Backend contract and request/response types.
//!
//! [`MarketDataSource`] is the seam between the service layer and whatever
//! produces market data: the HTTP backend in production, scripted fakes in
//! tests. Every method is fallible; deciding what to do about a failure is
//! left to the caller.
//!
//! | Method | Backend endpoint | Response |
//! |--------|------------------|----------|
//! | [`quote`](MarketDataSource::quote) | `GET /api/stock/{ticker}` | [`Quote`] |
//! | [`historical`](MarketDataSource::historical) | `GET /api/historical/{ticker}?period=` | [`HistoricalBar`]s |
//! | [`news`](MarketDataSource::news) | `GET /api/news/{ticker}` | [`NewsArticle`]s |
//! | [`forecast`](MarketDataSource::forecast) | `POST /api/predict/{ticker}` | [`ForecastResponse`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::{
    ForecastPoint, HistoricalBar, HistoryPeriod, ModelMetrics, NewsArticle, Quote,
    SentimentWeights, Ticker, Trend,
};

/// Why an upstream call produced no usable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Connection, DNS, TLS or timeout failure.
    Transport,
    /// The backend answered with a non-2xx status.
    Status,
    /// The body did not decode or violated a data invariant.
    Malformed,
}

/// Upstream-unavailable condition. The kind is kept for diagnostics only;
/// callers treat every kind the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn status(status: u16, url: &str) -> Self {
        Self {
            kind: SourceErrorKind::Status,
            message: format!("{url} returned status {status}"),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Transport => "upstream.transport",
            SourceErrorKind::Status => "upstream.status",
            SourceErrorKind::Malformed => "upstream.malformed",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "upstream unavailable: {} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Body of the predict call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub historical_data: Vec<HistoricalBar>,
    pub sentiment_weights: SentimentWeights,
    pub model_config: ModelConfig,
    pub prediction_days: u32,
}

/// Forecast as returned by the model backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub predictions: Vec<ForecastPoint>,
    pub metrics: ModelMetrics,
    pub trend: Trend,
    pub confidence: f64,
}

impl ForecastResponse {
    /// Check the response against the request it answers: one point per
    /// requested day, strictly increasing dates, valid bands and a
    /// confidence in [0, 1].
    pub fn validate(&self, horizon_days: u32) -> Result<(), SourceError> {
        if self.predictions.len() != horizon_days as usize {
            return Err(SourceError::malformed(format!(
                "expected {horizon_days} forecast points, got {}",
                self.predictions.len()
            )));
        }

        for point in &self.predictions {
            point
                .validate()
                .map_err(|error| SourceError::malformed(format!("forecast point: {error}")))?;
        }

        if self
            .predictions
            .windows(2)
            .any(|pair| pair[1].date <= pair[0].date)
        {
            return Err(SourceError::malformed(
                "forecast dates must be strictly increasing",
            ));
        }

        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(SourceError::malformed(format!(
                "forecast confidence {} outside [0, 1]",
                self.confidence
            )));
        }

        Ok(())
    }
}

/// Boxed future returned by [`MarketDataSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Source of quotes, history, scored news and forecasts.
///
/// Implementations must be `Send + Sync`; the orchestrator shares one source
/// across concurrent fetches and detached tasks. All calls are treated as
/// idempotent.
pub trait MarketDataSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn quote<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, Quote>;

    /// Daily bars for `period`, oldest first.
    fn historical<'a>(
        &'a self,
        ticker: &'a Ticker,
        period: HistoryPeriod,
    ) -> SourceFuture<'a, Vec<HistoricalBar>>;

    fn news<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, Vec<NewsArticle>>;

    fn forecast<'a>(
        &'a self,
        ticker: &'a Ticker,
        request: &'a ForecastRequest,
    ) -> SourceFuture<'a, ForecastResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month};

    fn point(day: u8, price: f64) -> ForecastPoint {
        let date = Date::from_calendar_date(2024, Month::May, day).expect("valid date");
        ForecastPoint::new(date, price, 0.8, price * 1.02, price * 0.98).expect("valid point")
    }

    fn response(points: Vec<ForecastPoint>) -> ForecastResponse {
        ForecastResponse {
            predictions: points,
            metrics: ModelMetrics {
                accuracy: 0.8,
                mse: 4.0,
                rmse: 2.0,
                mae: 1.5,
                r2: 0.7,
            },
            trend: Trend::Sideways,
            confidence: 0.8,
        }
    }

    #[test]
    fn accepts_well_formed_forecast() {
        let forecast = response(vec![point(1, 100.0), point(2, 101.0), point(3, 102.0)]);
        assert_eq!(forecast.validate(3), Ok(()));
    }

    #[test]
    fn rejects_wrong_point_count() {
        let forecast = response(vec![point(1, 100.0)]);
        let error = forecast.validate(3).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Malformed);
    }

    #[test]
    fn rejects_non_increasing_dates() {
        let forecast = response(vec![point(2, 100.0), point(2, 101.0)]);
        let error = forecast.validate(2).expect_err("must fail");
        assert!(error.message().contains("strictly increasing"));
    }

    #[test]
    fn forecast_response_decodes_backend_json() {
        let body = r#"{
            "predictions": [
                {"date": "2024-05-01", "predictedPrice": 101.0, "confidence": 0.82,
                 "upperBound": 103.0, "lowerBound": 99.0}
            ],
            "metrics": {"accuracy": 0.84, "mse": 2.1, "rmse": 1.45, "mae": 1.1, "r2": 0.77},
            "trend": "bullish",
            "confidence": 0.82
        }"#;

        let forecast: ForecastResponse = serde_json::from_str(body).expect("must decode");
        assert_eq!(forecast.trend, Trend::Bullish);
        assert_eq!(forecast.validate(1), Ok(()));
    }

    #[test]
    fn error_display_carries_code() {
        let error = SourceError::status(503, "http://backend.test/api/stock/AAPL");
        assert_eq!(error.kind(), SourceErrorKind::Status);
        assert_eq!(
            error.to_string(),
            "upstream unavailable: http://backend.test/api/stock/AAPL returned status 503 (upstream.status)"
        );
    }
}
