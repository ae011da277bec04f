use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::data_source::{
    ForecastRequest, ForecastResponse, MarketDataSource, SourceError, SourceFuture,
};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{HistoricalBar, HistoryPeriod, NewsArticle, Quote, Ticker};

/// Adapter for the prediction backend's REST API.
///
/// Each call is a single attempt. Transport errors, non-2xx statuses and
/// bodies that fail to decode or validate all surface as [`SourceError`].
/// Forecasts are checked against their request by [`crate::DataProvider`].
#[derive(Clone)]
pub struct BackendAdapter {
    http_client: Arc<dyn HttpClient>,
    config: ApiConfig,
}

impl BackendAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: ApiConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn endpoint(&self, path: &str, ticker: &Ticker) -> String {
        format!(
            "{}/api/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path,
            urlencoding::encode(ticker.as_str())
        )
    }

    async fn execute_json<T>(&self, request: HttpRequest) -> Result<T, SourceError>
    where
        T: DeserializeOwned,
    {
        let url = request.url.clone();
        tracing::debug!(method = request.method.as_str(), url = url.as_str(), "calling backend");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| SourceError::transport(format!("{url}: {}", error.message())))?;

        if !response.is_success() {
            return Err(SourceError::status(response.status, &url));
        }

        serde_json::from_str(&response.body)
            .map_err(|error| SourceError::malformed(format!("{url}: {error}")))
    }
}

impl MarketDataSource for BackendAdapter {
    fn name(&self) -> &'static str {
        "backend"
    }

    fn quote<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, Quote> {
        Box::pin(async move {
            let request = HttpRequest::get(self.endpoint("stock", ticker))
                .with_timeout_ms(self.config.timeouts.quote_ms);
            let quote: Quote = self.execute_json(request).await?;

            quote
                .validate()
                .map_err(|error| SourceError::malformed(format!("quote: {error}")))?;
            Ok(quote)
        })
    }

    fn historical<'a>(
        &'a self,
        ticker: &'a Ticker,
        period: HistoryPeriod,
    ) -> SourceFuture<'a, Vec<HistoricalBar>> {
        Box::pin(async move {
            let url = format!("{}?period={}", self.endpoint("historical", ticker), period);
            let request =
                HttpRequest::get(url).with_timeout_ms(self.config.timeouts.historical_ms);
            let mut bars: Vec<HistoricalBar> = self.execute_json(request).await?;

            for bar in &bars {
                bar.validate()
                    .map_err(|error| SourceError::malformed(format!("bar {}: {error}", bar.date)))?;
            }
            bars.sort_by_key(|bar| bar.date);
            Ok(bars)
        })
    }

    fn news<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, Vec<NewsArticle>> {
        Box::pin(async move {
            let request = HttpRequest::get(self.endpoint("news", ticker))
                .with_timeout_ms(self.config.timeouts.news_ms);
            let articles: Vec<NewsArticle> = self.execute_json(request).await?;

            for article in &articles {
                article.validate().map_err(|error| {
                    SourceError::malformed(format!("article {}: {error}", article.id))
                })?;
            }
            Ok(articles)
        })
    }

    fn forecast<'a>(
        &'a self,
        ticker: &'a Ticker,
        request: &'a ForecastRequest,
    ) -> SourceFuture<'a, ForecastResponse> {
        Box::pin(async move {
            let body = serde_json::to_string(request)
                .map_err(|error| SourceError::malformed(format!("forecast request: {error}")))?;
            let http_request = HttpRequest::post_json(self.endpoint("predict", ticker), body)
                .with_timeout_ms(self.config.timeouts.predict_ms);
            let forecast: ForecastResponse = self.execute_json(http_request).await?;
            Ok(forecast)
        })
    }
}
