//! Hand-written fakes shared by the behavior suites.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stockcast_core::{
    synthetic, ForecastPoint, ForecastRequest, ForecastResponse, HistoricalBar, HistoryPeriod,
    HttpClient, HttpError, HttpRequest, HttpResponse, MarketDataSource, ModelMetrics, NewsArticle,
    Quote, SentimentLabel, SourceError, SourceFuture, Ticker, Trend, UtcDateTime,
};
use time::Duration as DateSpan;

pub fn ticker(raw: &str) -> Ticker {
    Ticker::parse(raw).expect("valid ticker")
}

pub fn article(id: &str, sentiment: SentimentLabel, finbert_score: f64) -> NewsArticle {
    NewsArticle {
        id: id.to_owned(),
        headline: format!("headline {id}"),
        summary: format!("summary {id}"),
        content: String::new(),
        sentiment,
        sentiment_score: 0.0,
        finbert_score,
        source: String::from("Test Wire"),
        published_at: UtcDateTime::now(),
        relevance_score: 0.5,
    }
}

/// Per-endpoint call counters.
#[derive(Debug, Default)]
pub struct CallCounts {
    quote: AtomicUsize,
    historical: AtomicUsize,
    news: AtomicUsize,
    forecast: AtomicUsize,
}

impl CallCounts {
    pub fn quote(&self) -> usize {
        self.quote.load(Ordering::SeqCst)
    }

    pub fn historical(&self) -> usize {
        self.historical.load(Ordering::SeqCst)
    }

    pub fn news(&self) -> usize {
        self.news.load(Ordering::SeqCst)
    }

    pub fn forecast(&self) -> usize {
        self.forecast.load(Ordering::SeqCst)
    }
}

/// Market data source with scripted answers.
///
/// By default every endpoint answers with well-formed data: quotes and
/// history from the synthetic generators, no news, and a forecast built
/// from the request. Individual endpoints can be failed or overridden.
pub struct ScriptedSource {
    news: Option<Vec<NewsArticle>>,
    fail_quote: bool,
    fail_historical: bool,
    fail_news: bool,
    fail_forecast: bool,
    forecast: Option<ForecastResponse>,
    latency: Duration,
    pub calls: CallCounts,
    forecast_requests: Mutex<Vec<ForecastRequest>>,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self {
            news: Some(Vec::new()),
            fail_quote: false,
            fail_historical: false,
            fail_news: false,
            fail_forecast: false,
            forecast: None,
            latency: Duration::ZERO,
            calls: CallCounts::default(),
            forecast_requests: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedSource {
    pub fn healthy() -> Self {
        Self::default()
    }

    /// Every endpoint fails.
    pub fn down() -> Self {
        Self {
            fail_quote: true,
            fail_historical: true,
            fail_news: true,
            fail_forecast: true,
            ..Self::default()
        }
    }

    pub fn with_news(mut self, articles: Vec<NewsArticle>) -> Self {
        self.news = Some(articles);
        self.fail_news = false;
        self
    }

    pub fn failing_forecast(mut self) -> Self {
        self.fail_forecast = true;
        self
    }

    /// Answer every forecast request with `response`, whatever was asked.
    pub fn with_forecast(mut self, response: ForecastResponse) -> Self {
        self.forecast = Some(response);
        self
    }

    pub fn failing_news(mut self) -> Self {
        self.fail_news = true;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn forecast_requests(&self) -> Vec<ForecastRequest> {
        self.forecast_requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Forecast the fake backend returns: +1% per day with a +/-2% band.
pub fn scripted_forecast(request: &ForecastRequest) -> ForecastResponse {
    let last = request.historical_data.last();
    let start = last
        .map(|bar| bar.date)
        .unwrap_or_else(|| UtcDateTime::now().date());
    let base = last.map(|bar| bar.close).unwrap_or(100.0);

    let predictions = (1..=request.prediction_days)
        .map(|day| {
            let price = base * (1.0 + 0.01 * f64::from(day));
            ForecastPoint {
                date: start + DateSpan::days(i64::from(day)),
                predicted_price: price,
                confidence: 0.8,
                upper_bound: price * 1.02,
                lower_bound: price * 0.98,
            }
        })
        .collect();

    ForecastResponse {
        predictions,
        metrics: ModelMetrics {
            accuracy: 0.9,
            mse: 4.0,
            rmse: 2.0,
            mae: 1.5,
            r2: 0.85,
        },
        trend: Trend::Bullish,
        confidence: 0.8,
    }
}

/// Forecast that contradicts a three-day request: two points, an inverted
/// band and confidences outside [0, 1].
pub fn inconsistent_forecast() -> ForecastResponse {
    let start = UtcDateTime::now().date();
    let point = |day: i64, price: f64| ForecastPoint {
        date: start + DateSpan::days(day),
        predicted_price: price,
        confidence: 1.7,
        upper_bound: price * 0.9,
        lower_bound: price * 1.1,
    };

    ForecastResponse {
        predictions: vec![point(1, 101.0), point(2, 102.0)],
        metrics: ModelMetrics {
            accuracy: 0.9,
            mse: 4.0,
            rmse: 2.0,
            mae: 1.5,
            r2: 0.85,
        },
        trend: Trend::Bullish,
        confidence: 3.0,
    }
}

impl MarketDataSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn quote<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, Quote> {
        self.calls.quote.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            self.pause().await;
            if self.fail_quote {
                return Err(SourceError::transport("quote endpoint down"));
            }
            let mut quote = synthetic::quote(ticker);
            quote.name = format!("{ticker} Live Inc.");
            Ok(quote)
        })
    }

    fn historical<'a>(
        &'a self,
        ticker: &'a Ticker,
        period: HistoryPeriod,
    ) -> SourceFuture<'a, Vec<HistoricalBar>> {
        self.calls.historical.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            self.pause().await;
            if self.fail_historical {
                return Err(SourceError::status(503, "/api/historical"));
            }
            Ok(synthetic::historical(ticker, period, UtcDateTime::now().date()))
        })
    }

    fn news<'a>(&'a self, _ticker: &'a Ticker) -> SourceFuture<'a, Vec<NewsArticle>> {
        self.calls.news.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            self.pause().await;
            match (&self.news, self.fail_news) {
                (Some(articles), false) => Ok(articles.clone()),
                _ => Err(SourceError::malformed("news body was not an array")),
            }
        })
    }

    fn forecast<'a>(
        &'a self,
        _ticker: &'a Ticker,
        request: &'a ForecastRequest,
    ) -> SourceFuture<'a, ForecastResponse> {
        self.calls.forecast.fetch_add(1, Ordering::SeqCst);
        self.forecast_requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request.clone());
        Box::pin(async move {
            self.pause().await;
            if self.fail_forecast {
                return Err(SourceError::status(500, "/api/predict"));
            }
            Ok(self
                .forecast
                .clone()
                .unwrap_or_else(|| scripted_forecast(request)))
        })
    }
}

/// HTTP client answering by URL path with canned responses; anything else
/// is a transport failure.
#[derive(Default)]
pub struct CannedHttpClient {
    routes: Vec<(String, HttpResponse)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl CannedHttpClient {
    pub fn route(mut self, path_fragment: &str, response: HttpResponse) -> Self {
        self.routes.push((path_fragment.to_owned(), response));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .iter()
            .find(|(fragment, _)| request.url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| HttpError::new(format!("no route for {}", request.url)));
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        Box::pin(async move { response })
    }
}
