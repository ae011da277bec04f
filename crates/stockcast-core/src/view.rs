//! Screen-facing projections of cached payloads.
//!
//! These shapes are what a client renders directly: display scores, trend
//! labels, percentages and a single chart series joining recent history to
//! the forecast.

use serde::Serialize;
use time::Date;

use crate::{
    iso_date, short_label, ForecastPoint, ModelMetrics, NewsArticle, PredictionResult, Quote,
    SentimentLabel, SentimentWeights, Ticker, Trend, UtcDateTime,
};

/// Historical closes shown on the prediction chart ahead of the forecast.
pub const RECENT_BARS_SHOWN: usize = 4;

/// Simplified news entry. `score` is the FinBERT score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub headline: String,
    pub summary: String,
    pub sentiment: SentimentLabel,
    pub score: f64,
    pub source: String,
    pub published_at: UtcDateTime,
    pub relevance: f64,
}

impl From<&NewsArticle> for NewsItem {
    fn from(article: &NewsArticle) -> Self {
        Self {
            id: article.id.clone(),
            headline: article.headline.clone(),
            summary: article.summary.clone(),
            sentiment: article.sentiment,
            score: article.finbert_score,
            source: article.source.clone(),
            published_at: article.published_at,
            relevance: article.relevance_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartPointKind {
    Historical,
    Forecast,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Short axis label, e.g. `Oct 5`.
    pub label: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub price: f64,
    pub kind: ChartPointKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
}

/// Prediction as the prediction screen shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionView {
    pub symbol: Ticker,
    pub current_price: f64,
    pub trend: Trend,
    pub trend_label: String,
    /// Confidence as a percentage with one decimal.
    pub confidence_pct: f64,
    pub chart: Vec<ChartPoint>,
    pub predictions: Vec<ForecastPoint>,
    pub metrics: ModelMetrics,
    pub sentiment_weights: SentimentWeights,
    pub last_updated: UtcDateTime,
}

impl From<&PredictionResult> for PredictionView {
    fn from(result: &PredictionResult) -> Self {
        let recent_start = result
            .historical_data
            .len()
            .saturating_sub(RECENT_BARS_SHOWN);
        let history = result.historical_data[recent_start..]
            .iter()
            .map(|bar| ChartPoint {
                label: short_label(bar.date),
                date: bar.date,
                price: bar.close,
                kind: ChartPointKind::Historical,
                upper_bound: None,
                lower_bound: None,
            });
        let forecast = result.predictions.iter().map(|point| ChartPoint {
            label: short_label(point.date),
            date: point.date,
            price: point.predicted_price,
            kind: ChartPointKind::Forecast,
            upper_bound: Some(point.upper_bound),
            lower_bound: Some(point.lower_bound),
        });

        Self {
            symbol: result.symbol.clone(),
            current_price: result.current_price,
            trend: result.trend,
            trend_label: result.trend.label().to_owned(),
            confidence_pct: confidence_pct(result.confidence),
            chart: history.chain(forecast).collect(),
            predictions: result.predictions.clone(),
            metrics: result.metrics,
            sentiment_weights: result.sentiment_weights,
            last_updated: result.last_updated,
        }
    }
}

/// Everything one ticker's screen loads at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub quote: Quote,
    pub prediction: PredictionView,
    pub news: Vec<NewsItem>,
}

fn confidence_pct(confidence: f64) -> f64 {
    (confidence.clamp(0.0, 1.0) * 1000.0).round() / 10.0
}
