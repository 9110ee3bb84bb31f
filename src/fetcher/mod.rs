//! Page fetching: a fast HTTP GET and a headless-browser render.
//!
//! ```text
//! URL → PageFetcher ─┬─ HttpFetcher   (server-rendered markup)
//!                    └─ ChromeRenderer (markup after page scripts ran)
//! ```
//!
//! The browser is launched on the first render and owned by exactly one
//! [`PageFetcher`]. Choosing between the two strategies is the poller's job.

mod chrome;
mod config;
mod http_fetcher;

pub use chrome::ChromeRenderer;
pub use config::FetchConfig;
pub use http_fetcher::HttpFetcher;

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use crate::app::{CourtsideError, Result};

/// Source of page markup.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a page's markup.
    ///
    /// With `wait_for_render` the page's scripts are executed before the
    /// markup is read. `timeout` bounds the whole call. An empty or
    /// implausibly short body is an error, never a success.
    async fn fetch(&self, url: &str, wait_for_render: bool, timeout: Duration) -> Result<String>;

    /// Release anything held between fetches
    async fn close(&mut self) {}
}

/// Reject bodies too short to hold a stats page
pub fn check_body(url: &str, body: String, min_len: usize) -> Result<String> {
    if body.trim().len() < min_len.max(1) {
        return Err(CourtsideError::ShortBody {
            url: url.to_string(),
            len: body.len(),
        });
    }
    Ok(body)
}

/// HTTP fetcher plus a lazily launched browser
pub struct PageFetcher {
    config: FetchConfig,
    http: HttpFetcher,
    renderer: OnceCell<ChromeRenderer>,
}

impl PageFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let http = HttpFetcher::new(&config)?;
        Ok(Self {
            config,
            http,
            renderer: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn renderer(&self) -> Result<&ChromeRenderer> {
        self.renderer
            .get_or_try_init(|| async {
                info!("Launching browser for rendered fetches");
                ChromeRenderer::launch(self.config.clone()).await
            })
            .await
    }
}

#[async_trait]
impl Fetcher for PageFetcher {
    async fn fetch(&self, url: &str, wait_for_render: bool, timeout: Duration) -> Result<String> {
        let body = if wait_for_render {
            self.renderer().await?.render(url, timeout).await?
        } else {
            self.http.get(url, timeout).await?
        };
        check_body(url, body, self.config.min_body_len)
    }

    /// Close the browser if one was launched
    async fn close(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.close().await;
        }
    }
}
