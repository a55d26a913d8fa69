use crate::model::ScrapeError;

#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<String, ScrapeError>;
}
