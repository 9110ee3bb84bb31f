use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::app::Result;
use crate::fetcher::FetchConfig;

/// Plain HTTP GET of a page's server-rendered markup
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    pub async fn get(&self, url: &str, timeout: Duration) -> Result<String> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        response.error_for_status_ref()?;

        let body = response.text().await?;
        debug!(url, len = body.len(), "Fetched page over HTTP");
        Ok(body)
    }
}
