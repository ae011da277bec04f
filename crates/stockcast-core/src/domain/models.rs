use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::Date;

use super::timestamp::iso_date;
use crate::{Ticker, UtcDateTime, ValidationError};

/// Relative move, in percent, beyond which a forecast counts as directional.
const TREND_THRESHOLD_PCT: f64 = 2.0;

/// Current quote snapshot for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: Ticker,
    pub name: String,
    pub current_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub market_cap: f64,
    pub high_52_week: f64,
    pub low_52_week: f64,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
}

impl Quote {
    /// Checks invariants on values that arrived through deserialization.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_negative("currentPrice", self.current_price)?;
        validate_finite("change", self.change)?;
        validate_finite("changePercent", self.change_percent)?;
        validate_non_negative("marketCap", self.market_cap)?;
        validate_non_negative("high52Week", self.high_52_week)?;
        validate_non_negative("low52Week", self.low_52_week)?;
        validate_optional_finite("peRatio", self.pe_ratio)?;
        if let Some(value) = self.dividend_yield {
            validate_non_negative("dividendYield", value)?;
        }
        Ok(())
    }
}

/// Daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalBar {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjusted_close: f64,
}

impl HistoricalBar {
    pub fn new(
        date: Date,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
        adjusted_close: f64,
    ) -> Result<Self, ValidationError> {
        let bar = Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            adjusted_close,
        };
        bar.validate()?;
        Ok(bar)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_negative("open", self.open)?;
        validate_non_negative("high", self.high)?;
        validate_non_negative("low", self.low)?;
        validate_non_negative("close", self.close)?;
        validate_non_negative("adjustedClose", self.adjusted_close)?;

        if self.high < self.low {
            return Err(ValidationError::InvalidBarRange);
        }

        if self.open < self.low
            || self.open > self.high
            || self.close < self.low
            || self.close > self.high
        {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(())
    }
}

/// Sentiment classification attached to a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Classify a score in [-1, 1]: strictly above the positive threshold is
    /// positive, strictly below the negative threshold is negative.
    pub fn from_score(score: f64, thresholds: &SentimentThresholds) -> Self {
        if score > thresholds.positive {
            Self::Positive
        } else if score < thresholds.negative {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl Display for SentimentLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score cut-offs separating positive, neutral and negative sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentThresholds {
    pub positive: f64,
    pub negative: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            positive: 0.1,
            negative: -0.1,
        }
    }
}

/// News article scored by both the heuristic scorer and FinBERT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub headline: String,
    pub summary: String,
    #[serde(default)]
    pub content: String,
    pub sentiment: SentimentLabel,
    /// Coarse heuristic score. Carried for consumers; nothing here aggregates it.
    pub sentiment_score: f64,
    pub finbert_score: f64,
    pub source: String,
    pub published_at: UtcDateTime,
    pub relevance_score: f64,
}

impl NewsArticle {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_range("sentimentScore", self.sentiment_score, -1.0, 1.0)?;
        validate_range("finbertScore", self.finbert_score, -1.0, 1.0)?;
        validate_range("relevanceScore", self.relevance_score, 0.0, 1.0)
    }
}

/// One forecast day with its confidence band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub predicted_price: f64,
    pub confidence: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl ForecastPoint {
    pub fn new(
        date: Date,
        predicted_price: f64,
        confidence: f64,
        upper_bound: f64,
        lower_bound: f64,
    ) -> Result<Self, ValidationError> {
        let point = Self {
            date,
            predicted_price,
            confidence,
            upper_bound,
            lower_bound,
        };
        point.validate()?;
        Ok(point)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_non_negative("predictedPrice", self.predicted_price)?;
        validate_finite("upperBound", self.upper_bound)?;
        validate_finite("lowerBound", self.lower_bound)?;
        validate_range("confidence", self.confidence, 0.0, 1.0)?;

        if !(self.upper_bound >= self.predicted_price && self.predicted_price >= self.lower_bound) {
            return Err(ValidationError::InvalidForecastBounds);
        }
        Ok(())
    }
}

/// Backtest quality metrics reported alongside a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

/// Aggregate sentiment over a set of articles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentWeights {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub overall_sentiment: f64,
}

impl SentimentWeights {
    /// Weights used when there is no news to aggregate.
    pub const fn neutral_prior() -> Self {
        Self {
            positive: 0.33,
            negative: 0.33,
            neutral: 0.34,
            overall_sentiment: 0.0,
        }
    }
}

/// Direction of the forecast relative to the current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Sideways,
}

impl Trend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Sideways => "sideways",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Sideways => "Sideways",
        }
    }

    /// Classify the move from `current` to `target`.
    pub fn from_prices(current: f64, target: f64) -> Self {
        if current <= 0.0 || !current.is_finite() || !target.is_finite() {
            return Self::Sideways;
        }

        let change_pct = (target - current) / current * 100.0;
        if change_pct > TREND_THRESHOLD_PCT {
            Self::Bullish
        } else if change_pct < -TREND_THRESHOLD_PCT {
            Self::Bearish
        } else {
            Self::Sideways
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the prediction screen shows for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub symbol: Ticker,
    pub current_price: f64,
    pub historical_data: Vec<HistoricalBar>,
    pub predictions: Vec<ForecastPoint>,
    pub metrics: ModelMetrics,
    pub sentiment_weights: SentimentWeights,
    pub trend: Trend,
    pub confidence: f64,
    pub last_updated: UtcDateTime,
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn validate_optional_finite(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        validate_finite(field, value)?;
    }
    Ok(())
}

fn validate_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}
