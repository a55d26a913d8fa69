use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::model::ScrapeError;
use crate::scraper::traits::Scraper;

/// Fetches paginated search-result pages from the portal. Transport-level
/// failures and unexpected statuses are retried with a fixed delay; only a
/// page that fails every attempt surfaces as an error, and the caller decides
/// whether that ends pagination.
pub struct PortalFetcher {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl PortalFetcher {
    pub fn new(config: &AppConfig) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("es-ES,es;q=0.8,en-US;q=0.5,en;q=0.3"),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        })
    }

    fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.base_url.clone()
        } else {
            format!("{}?page={}", self.base_url, page)
        }
    }
}

#[async_trait::async_trait]
impl Scraper for PortalFetcher {
    async fn fetch_page(&self, page: u32) -> Result<String, ScrapeError> {
        let url = self.page_url(page);

        for attempt in 1..=self.max_retries {
            debug!(%url, attempt, "requesting page");
            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.text().await?);
                }
                Ok(response) => {
                    warn!(status = %response.status(), %url, attempt, "unexpected status");
                }
                Err(e) => {
                    warn!(error = %e, %url, attempt, "request failed");
                }
            }
            if attempt < self.max_retries {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        Err(ScrapeError::RetriesExhausted { url, attempts: self.max_retries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_uses_the_bare_base_url() {
        let fetcher = PortalFetcher::new(&AppConfig::default()).unwrap();
        assert_eq!(fetcher.page_url(1), AppConfig::default().base_url);
    }

    #[test]
    fn later_pages_append_the_page_parameter() {
        let fetcher = PortalFetcher::new(&AppConfig::default()).unwrap();
        let url = fetcher.page_url(3);
        assert!(url.ends_with("?page=3"));
        assert!(url.starts_with(&AppConfig::default().base_url));
    }
}
