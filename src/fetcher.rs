use reqwest::{Client, Method, header};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use url::Url;

use crate::config::ScraperConfig;
use crate::utils::error::{AppError, Result};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub status: u16,
    pub final_url: String, // After redirects
    pub content_encoding: Option<String>,
    pub body: Vec<u8>,
    pub response_time_ms: u64,
}

/// Thin HTTP layer: one request per call, non-2xx surfaced as [`AppError::HttpStatus`].
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    pub async fn get(&self, url: &Url) -> Result<FetchResponse> {
        self.fetch(url, Method::GET).await
    }

    pub async fn fetch(&self, url: &Url, method: Method) -> Result<FetchResponse> {
        let start_time = Instant::now();

        let response = self
            .client
            .request(method, url.clone())
            .header(header::ACCEPT, ACCEPT_HTML)
            .header(header::ACCEPT_LANGUAGE, "en-GB,en;q=0.9")
            .header(header::ACCEPT_ENCODING, "gzip")
            .send()
            .await
            .inspect_err(|_| metrics::counter!("scraper_fetch_failures_total").increment(1))?;

        let status = response.status();
        if !status.is_success() {
            metrics::counter!("scraper_fetch_failures_total").increment(1);
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().to_string();
        let content_encoding = response
            .headers()
            .get(header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            "fetched page"
        );

        Ok(FetchResponse {
            status: status.as_u16(),
            final_url,
            content_encoding,
            body,
            response_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
