//! Prediction Orchestrator: the single entry point a client calls for
//! quotes, news and predictions.
//!
//! It owns the caching policy (three typed caches sharing one TTL) and the
//! fallback policy: quote, history and news are replaced by synthetic data
//! individually, while a failed forecast replaces the whole prediction.
//! Every public call therefore resolves to a well-formed value.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::BackendAdapter;
use crate::cache::{CacheCategory, CacheStats, CacheStore};
use crate::config::{ModelConfig, StockcastConfig};
use crate::data_source::ForecastRequest;
use crate::http_client::HttpClient;
use crate::provider::DataProvider;
use crate::view::{Dashboard, NewsItem, PredictionView};
use crate::{
    calculate_sentiment_weights, synthetic, NewsArticle, PredictionResult, Quote, SentimentWeights,
    Ticker, UtcDateTime,
};

/// Cache-or-fetch front for the data provider and forecast backend.
///
/// Cheap to clone; clones share caches and the provider.
#[derive(Clone)]
pub struct PredictionOrchestrator {
    provider: DataProvider,
    model: Arc<ModelConfig>,
    quotes: CacheStore<Quote>,
    news: CacheStore<Vec<NewsArticle>>,
    predictions: CacheStore<PredictionResult>,
}

impl PredictionOrchestrator {
    pub fn new(provider: DataProvider, model: ModelConfig, cache_ttl: Duration) -> Self {
        Self {
            provider,
            model: Arc::new(model),
            quotes: CacheStore::new(cache_ttl),
            news: CacheStore::new(cache_ttl),
            predictions: CacheStore::new(cache_ttl),
        }
    }

    /// Orchestrator talking to the configured backend over `http_client`.
    pub fn from_config(config: &StockcastConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let adapter = BackendAdapter::new(http_client, config.api.clone());
        Self::new(
            DataProvider::new(Arc::new(adapter)),
            config.model.clone(),
            config.cache.ttl(),
        )
    }

    pub fn provider(&self) -> &DataProvider {
        &self.provider
    }

    pub async fn get_quote(&self, ticker: &Ticker) -> Arc<Quote> {
        let key = CacheCategory::Quote.key(ticker);
        if let Some(hit) = self.quotes.get(&key).await {
            tracing::debug!(key = key.as_str(), "cache hit");
            return hit;
        }
        tracing::debug!(key = key.as_str(), "cache miss");

        let provider = self.provider.clone();
        let cache = self.quotes.clone();
        let owned = ticker.clone();
        detached(
            CacheCategory::Quote,
            ticker,
            async move {
                let quote = provider
                    .fetch_quote(&owned)
                    .await
                    .or_fallback(|| synthetic::quote(&owned));
                cache.set(key, quote).await
            },
            || Arc::new(synthetic::quote(ticker)),
        )
        .await
    }

    /// Articles exactly as the source returned them (or the synthetic set).
    pub async fn get_news_articles(&self, ticker: &Ticker) -> Arc<Vec<NewsArticle>> {
        let key = CacheCategory::News.key(ticker);
        if let Some(hit) = self.news.get(&key).await {
            tracing::debug!(key = key.as_str(), "cache hit");
            return hit;
        }
        tracing::debug!(key = key.as_str(), "cache miss");

        let provider = self.provider.clone();
        let cache = self.news.clone();
        let owned = ticker.clone();
        detached(
            CacheCategory::News,
            ticker,
            async move {
                let articles = provider
                    .fetch_news_with_sentiment(&owned)
                    .await
                    .or_fallback(|| synthetic::news(&owned, UtcDateTime::now()));
                cache.set(key, articles).await
            },
            || Arc::new(synthetic::news(ticker, UtcDateTime::now())),
        )
        .await
    }

    /// News projected for display, scored by FinBERT.
    pub async fn get_news(&self, ticker: &Ticker) -> Vec<NewsItem> {
        self.get_news_articles(ticker)
            .await
            .iter()
            .map(NewsItem::from)
            .collect()
    }

    pub async fn get_prediction_result(&self, ticker: &Ticker) -> Arc<PredictionResult> {
        let key = CacheCategory::Prediction.key(ticker);
        if let Some(hit) = self.predictions.get(&key).await {
            tracing::debug!(key = key.as_str(), "cache hit");
            return hit;
        }
        tracing::debug!(key = key.as_str(), "cache miss");

        let provider = self.provider.clone();
        let model = Arc::clone(&self.model);
        let cache = self.predictions.clone();
        let owned = ticker.clone();
        detached(
            CacheCategory::Prediction,
            ticker,
            async move {
                let result = assemble_prediction(&provider, &model, &owned).await;
                cache.set(key, result).await
            },
            || Arc::new(fallback_prediction(ticker, &self.model)),
        )
        .await
    }

    pub async fn get_prediction(&self, ticker: &Ticker) -> PredictionView {
        let result = self.get_prediction_result(ticker).await;
        PredictionView::from(result.as_ref())
    }

    /// Quote, prediction and news resolved concurrently.
    pub async fn get_dashboard(&self, ticker: &Ticker) -> Dashboard {
        let (quote, prediction, news) = tokio::join!(
            self.get_quote(ticker),
            self.get_prediction(ticker),
            self.get_news(ticker),
        );
        Dashboard {
            quote: Quote::clone(&quote),
            prediction,
            news,
        }
    }

    /// Drop every cached quote, news set and prediction.
    pub async fn clear_cache(&self) {
        tokio::join!(
            self.quotes.clear(),
            self.news.clear(),
            self.predictions.clear(),
        );
        tracing::info!("cache cleared");
    }

    pub async fn cache_stats(&self) -> CacheStats {
        let (quotes, news, predictions) = tokio::join!(
            self.quotes.stats(),
            self.news.stats(),
            self.predictions.stats(),
        );
        quotes.merge(news).merge(predictions)
    }
}

/// Run `work` on its own task so it finishes (and fills the cache) even if
/// the caller stops waiting. A task that dies yields `fallback` instead.
async fn detached<T, W, F>(category: CacheCategory, ticker: &Ticker, work: W, fallback: F) -> T
where
    T: Send + 'static,
    W: Future<Output = T> + Send + 'static,
    F: FnOnce() -> T,
{
    match tokio::spawn(work).await {
        Ok(value) => value,
        Err(error) => {
            tracing::error!(
                category = category.as_str(),
                ticker = ticker.as_str(),
                "fetch task failed, serving synthetic data: {error}"
            );
            fallback()
        }
    }
}

async fn assemble_prediction(
    provider: &DataProvider,
    model: &ModelConfig,
    ticker: &Ticker,
) -> PredictionResult {
    let period = model.history_period;
    let (quote, history, news) = tokio::join!(
        provider.fetch_quote(ticker),
        provider.fetch_historical(ticker, period),
        provider.fetch_news_with_sentiment(ticker),
    );

    let now = UtcDateTime::now();
    let quote = quote.or_fallback(|| synthetic::quote(ticker));
    let historical_data =
        history.or_fallback(|| synthetic::historical(ticker, period, now.date()));
    let articles = news.or_fallback(|| synthetic::news(ticker, now));
    let sentiment_weights = calculate_sentiment_weights(&articles);

    let request = ForecastRequest {
        historical_data,
        sentiment_weights,
        model_config: model.clone(),
        prediction_days: model.prediction_days,
    };
    let forecast = provider.request_forecast(ticker, &request).await;

    match forecast {
        Ok(response) => PredictionResult {
            symbol: ticker.clone(),
            current_price: quote.current_price,
            historical_data: request.historical_data,
            predictions: response.predictions,
            metrics: response.metrics,
            sentiment_weights,
            trend: response.trend,
            confidence: response.confidence,
            last_updated: now,
        },
        Err(_) => {
            tracing::warn!(
                ticker = ticker.as_str(),
                "substituting synthetic prediction"
            );
            synthetic::prediction(
                ticker,
                quote.current_price,
                request.historical_data,
                sentiment_weights,
                model.prediction_days,
                now,
            )
        }
    }
}

fn fallback_prediction(ticker: &Ticker, model: &ModelConfig) -> PredictionResult {
    let now = UtcDateTime::now();
    let quote = synthetic::quote(ticker);
    let history = synthetic::historical(ticker, model.history_period, now.date());
    synthetic::prediction(
        ticker,
        quote.current_price,
        history,
        SentimentWeights::neutral_prior(),
        model.prediction_days,
        now,
    )
}
