//! Synthetic stand-ins for data the backend failed to deliver.
//!
//! Every generator is seeded from the ticker string alone, so a given ticker
//! always gets the same shape of data for a given day and nothing depends on
//! hidden state. Output satisfies the same invariants as live data.

use time::{Date, Duration};

use crate::{
    ForecastPoint, HistoricalBar, HistoryPeriod, ModelMetrics, NewsArticle, PredictionResult,
    Quote, SentimentLabel, SentimentWeights, Ticker, Trend, UtcDateTime,
};

const QUOTE_SALT: u64 = 0x51;
const HISTORY_SALT: u64 = 0x4853;
const FORECAST_SALT: u64 = 0x4643;

const MIN_CONFIDENCE: f64 = 0.60;
const MAX_CONFIDENCE: f64 = 0.90;
const CONFIDENCE_DECAY_PER_DAY: f64 = 0.02;

fn ticker_seed(ticker: &Ticker) -> u64 {
    ticker.as_str().bytes().fold(5381_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

fn rng_for(ticker: &Ticker, salt: u64) -> fastrand::Rng {
    fastrand::Rng::with_seed(ticker_seed(ticker) ^ salt)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reference price shared by the synthetic quote and history, so the two
/// line up on a chart.
fn reference_price(ticker: &Ticker) -> f64 {
    round_cents(50.0 + rng_for(ticker, 0).f64() * 400.0)
}

/// Display name derived from the ticker.
pub fn display_name(ticker: &Ticker) -> String {
    format!("{ticker} Corporation")
}

/// Synthetic quote. Price is positive and volume non-negative.
pub fn quote(ticker: &Ticker) -> Quote {
    let mut rng = rng_for(ticker, QUOTE_SALT);
    let current_price = reference_price(ticker);

    let change = round_cents(current_price * (rng.f64() * 0.06 - 0.03));
    let previous_close = current_price - change;
    let change_percent = if previous_close > 0.0 {
        round_cents(change / previous_close * 100.0)
    } else {
        0.0
    };
    let shares_outstanding = rng.u64(100_000_000..10_000_000_000);

    Quote {
        symbol: ticker.clone(),
        name: display_name(ticker),
        current_price,
        change,
        change_percent,
        volume: rng.u64(1_000_000..50_000_000),
        market_cap: round_cents(current_price * shares_outstanding as f64),
        high_52_week: round_cents(current_price * (1.0 + rng.f64() * 0.3)),
        low_52_week: round_cents(current_price * (1.0 - rng.f64() * 0.3)),
        pe_ratio: Some(round_cents(10.0 + rng.f64() * 30.0)),
        dividend_yield: Some(round_cents(rng.f64() * 3.0)),
    }
}

/// Synthetic daily bars ending on `end`, oldest first, one per day of
/// `period`. The final close equals the synthetic quote price.
pub fn historical(ticker: &Ticker, period: HistoryPeriod, end: Date) -> Vec<HistoricalBar> {
    let mut rng = rng_for(ticker, HISTORY_SALT);
    let count = period.bar_count();

    // Walk in relative units first, then scale onto the reference price.
    let mut raw = Vec::with_capacity(count);
    let mut close = 1.0_f64;
    for _ in 0..count {
        let open = close;
        close = open * (1.0 + rng.f64() * 0.04 - 0.02);
        let high = open.max(close) * (1.0 + rng.f64() * 0.015);
        let low = open.min(close) * (1.0 - rng.f64() * 0.015);
        let volume = rng.u64(1_000_000..20_000_000);
        raw.push((open, high, low, close, volume));
    }

    let scale = reference_price(ticker) / close;
    raw.into_iter()
        .enumerate()
        .map(|(index, (open, high, low, close, volume))| {
            let open = round_cents(open * scale);
            let close = round_cents(close * scale);
            let high = round_cents(high * scale).max(open).max(close);
            let low = round_cents(low * scale).min(open).min(close);
            let days_back = (count - 1 - index) as i64;

            HistoricalBar {
                date: end - Duration::days(days_back),
                open,
                high,
                low,
                close,
                volume,
                adjusted_close: close,
            }
        })
        .collect()
}

/// Fixed set of four articles covering every sentiment label. FinBERT scores
/// carry the sign their label implies under the default thresholds.
pub fn news(ticker: &Ticker, now: UtcDateTime) -> Vec<NewsArticle> {
    let name = display_name(ticker);
    let entries = [
        (
            format!("{name} beats quarterly earnings expectations"),
            format!("{name} reported revenue and margins ahead of analyst consensus."),
            SentimentLabel::Positive,
            0.6,
            0.72,
            "Market Wire",
            2,
            0.95,
        ),
        (
            format!("Regulators open inquiry into {name} supply chain"),
            format!("A regulatory review could delay {name}'s product roadmap."),
            SentimentLabel::Negative,
            -0.5,
            -0.58,
            "Financial Daily",
            5,
            0.85,
        ),
        (
            format!("{name} schedules annual shareholder meeting"),
            format!("{name} confirmed the date and agenda of its annual meeting."),
            SentimentLabel::Neutral,
            0.0,
            0.04,
            "Business Journal",
            9,
            0.6,
        ),
        (
            format!("Analysts raise price target on {ticker}"),
            format!("Several brokers lifted their outlook for {name} citing demand."),
            SentimentLabel::Positive,
            0.3,
            0.41,
            "Street Insider",
            26,
            0.75,
        ),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(
            |(index, (headline, summary, sentiment, sentiment_score, finbert_score, source, hours_ago, relevance_score))| {
                NewsArticle {
                    id: format!("{ticker}-synthetic-{}", index + 1),
                    content: summary.clone(),
                    headline,
                    summary,
                    sentiment,
                    sentiment_score,
                    finbert_score,
                    source: source.to_owned(),
                    published_at: hours_before(now, hours_ago),
                    relevance_score,
                }
            },
        )
        .collect()
}

fn hours_before(now: UtcDateTime, hours: i64) -> UtcDateTime {
    UtcDateTime::from_offset_datetime(now.into_inner() - Duration::hours(hours))
}

/// Complete synthetic prediction used when the forecast call fails.
///
/// Points start the day after the last bar (or after `now` with no bars),
/// drift with the overall sentiment, and carry bands that widen as
/// confidence decays. Trend and confidence are derived from the points so
/// the result is self-consistent.
pub fn prediction(
    ticker: &Ticker,
    current_price: f64,
    historical_data: Vec<HistoricalBar>,
    sentiment_weights: SentimentWeights,
    horizon_days: u32,
    now: UtcDateTime,
) -> PredictionResult {
    let mut rng = rng_for(ticker, FORECAST_SALT);

    let anchor = if current_price > 0.0 {
        current_price
    } else {
        historical_data
            .last()
            .map(|bar| bar.close)
            .filter(|close| *close > 0.0)
            .unwrap_or_else(|| reference_price(ticker))
    };
    let first_day = historical_data
        .last()
        .map(|bar| bar.date)
        .unwrap_or_else(|| now.date())
        + Duration::days(1);

    let base_confidence = 0.70 + rng.f64() * (MAX_CONFIDENCE - 0.70);
    let drift = sentiment_weights.overall_sentiment * 0.01;

    let mut price = anchor;
    let predictions = (0..horizon_days)
        .map(|day| {
            price *= 1.0 + drift + (rng.f64() * 0.02 - 0.01);
            let predicted_price = round_cents(price);
            let confidence = (base_confidence - CONFIDENCE_DECAY_PER_DAY * f64::from(day))
                .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
            let half_width = predicted_price * (1.0 - confidence) * 0.5;

            ForecastPoint {
                date: first_day + Duration::days(i64::from(day)),
                predicted_price,
                confidence,
                upper_bound: round_cents(predicted_price + half_width).max(predicted_price),
                lower_bound: round_cents(predicted_price - half_width).min(predicted_price),
            }
        })
        .collect::<Vec<_>>();

    let trend = predictions
        .last()
        .map(|point| Trend::from_prices(anchor, point.predicted_price))
        .unwrap_or(Trend::Sideways);
    let confidence = if predictions.is_empty() {
        MIN_CONFIDENCE
    } else {
        predictions.iter().map(|point| point.confidence).sum::<f64>() / predictions.len() as f64
    };

    PredictionResult {
        symbol: ticker.clone(),
        current_price: anchor,
        historical_data,
        predictions,
        metrics: metrics(&mut rng, anchor),
        sentiment_weights,
        trend,
        confidence,
        last_updated: now,
    }
}

fn metrics(rng: &mut fastrand::Rng, price: f64) -> ModelMetrics {
    // Errors scale with the price level: rmse lands between 0.5% and 2.5%.
    let rmse = price * (0.005 + rng.f64() * 0.02);
    ModelMetrics {
        accuracy: 0.75 + rng.f64() * 0.15,
        mse: rmse * rmse,
        rmse,
        mae: rmse * (0.7 + rng.f64() * 0.2),
        r2: 0.6 + rng.f64() * 0.3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calculate_sentiment_weights, SentimentThresholds};
    use time::Month;

    fn ticker(raw: &str) -> Ticker {
        Ticker::parse(raw).expect("valid ticker")
    }

    fn end_date() -> Date {
        Date::from_calendar_date(2024, Month::June, 14).expect("valid date")
    }

    #[test]
    fn quote_satisfies_invariants_and_uses_ticker_name() {
        for raw in ["AAPL", "tsla", "BRK.B", "Z"] {
            let quote = quote(&ticker(raw));
            assert!(quote.current_price > 0.0);
            assert!(quote.validate().is_ok());
            assert_eq!(quote.symbol.as_str(), raw.to_ascii_uppercase());
            assert_eq!(quote.name, format!("{} Corporation", raw.to_ascii_uppercase()));
        }
    }

    #[test]
    fn quote_is_deterministic_per_ticker() {
        assert_eq!(quote(&ticker("NVDA")), quote(&ticker("nvda")));
    }

    #[test]
    fn history_is_consistent_and_ascending() {
        let bars = historical(&ticker("MSFT"), HistoryPeriod::OneMonth, end_date());

        assert_eq!(bars.len(), 31);
        assert_eq!(bars.last().map(|bar| bar.date), Some(end_date()));
        for bar in &bars {
            assert!(bar.high >= bar.open.max(bar.close), "{bar:?}");
            assert!(bar.low <= bar.open.min(bar.close), "{bar:?}");
            assert!(bar.validate().is_ok());
        }
        assert!(bars.windows(2).all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn history_ends_at_quote_price() {
        let t = ticker("AMZN");
        let bars = historical(&t, HistoryPeriod::ThreeMonths, end_date());
        let last_close = bars.last().map(|bar| bar.close).expect("bars");
        assert!((last_close - quote(&t).current_price).abs() < 0.011);
    }

    #[test]
    fn news_covers_every_label_consistently() {
        let articles = news(&ticker("TSLA"), UtcDateTime::now());
        let thresholds = SentimentThresholds::default();

        assert!(articles.len() >= 3);
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ] {
            assert!(articles.iter().any(|article| article.sentiment == label));
        }
        for article in &articles {
            assert!(article.validate().is_ok());
            assert_eq!(
                SentimentLabel::from_score(article.finbert_score, &thresholds),
                article.sentiment
            );
        }

        let weights = calculate_sentiment_weights(&articles);
        assert!((weights.positive + weights.negative + weights.neutral - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prediction_points_follow_history_and_bracket_estimates() {
        let t = ticker("GOOG");
        let bars = historical(&t, HistoryPeriod::OneMonth, end_date());
        let result = prediction(
            &t,
            quote(&t).current_price,
            bars,
            SentimentWeights::neutral_prior(),
            3,
            UtcDateTime::now(),
        );

        assert_eq!(result.predictions.len(), 3);
        assert_eq!(result.predictions[0].date, end_date() + Duration::days(1));
        assert!(result
            .predictions
            .windows(2)
            .all(|pair| pair[0].date < pair[1].date));
        for point in &result.predictions {
            assert!(point.validate().is_ok(), "{point:?}");
            assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&point.confidence));
        }
        assert!((0.0..=1.0).contains(&result.confidence));

        let last = result.predictions.last().expect("points").predicted_price;
        assert_eq!(result.trend, Trend::from_prices(result.current_price, last));
    }

    #[test]
    fn prediction_metrics_are_consistent() {
        let t = ticker("META");
        let result = prediction(
            &t,
            250.0,
            Vec::new(),
            SentimentWeights::neutral_prior(),
            5,
            UtcDateTime::now(),
        );
        let metrics = result.metrics;

        assert!((metrics.rmse * metrics.rmse - metrics.mse).abs() < 1e-9);
        assert!(metrics.mae <= metrics.rmse);
        assert!((0.0..=1.0).contains(&metrics.accuracy));
        assert!((0.0..=1.0).contains(&metrics.r2));
    }

    #[test]
    fn prediction_without_price_uses_history() {
        let t = ticker("IBM");
        let bars = historical(&t, HistoryPeriod::OneMonth, end_date());
        let last_close = bars.last().map(|bar| bar.close).expect("bars");

        let result = prediction(&t, 0.0, bars, SentimentWeights::neutral_prior(), 1, UtcDateTime::now());
        assert_eq!(result.current_price, last_close);
    }
}
