use std::future::Future;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::app::{CourtsideError, Result};
use crate::fetcher::FetchConfig;

/// Interval between checks for the render selector
const SELECTOR_POLL: Duration = Duration::from_millis(250);

/// Run `fut` until `deadline`, reporting expiry as a timeout of `timeout` on `url`
async fn within<T>(
    deadline: Instant,
    timeout: Duration,
    url: &str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout_at(deadline, fut)
        .await
        .map_err(|_| CourtsideError::Timeout(timeout, url.to_string()))?
}

/// Headless Chrome renderer for pages whose stats are filled in by scripts
pub struct ChromeRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    config: FetchConfig,
}

impl ChromeRenderer {
    /// Launch a browser with the given configuration
    pub async fn launch(config: FetchConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer");

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| CourtsideError::Render(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            CourtsideError::Render(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        debug!(headless = config.headless, "Launched browser");
        Ok(Self {
            browser,
            handler,
            config,
        })
    }

    /// Render a page and return its markup, bounded by `timeout` overall.
    /// The tab is closed on every path once it exists.
    pub async fn render(&self, url: &str, timeout: Duration) -> Result<String> {
        let deadline = Instant::now() + timeout;

        let page = within(deadline, timeout, url, async {
            self.browser
                .new_page(url)
                .await
                .map_err(|e| CourtsideError::Render(format!("Failed to create page: {}", e)))
        })
        .await?;

        let result = within(deadline, timeout, url, self.read_page(&page, url)).await;

        if let Err(e) = page.close().await {
            warn!(url, error = %e, "Failed to close page");
        }

        result
    }

    async fn read_page(&self, page: &Page, url: &str) -> Result<String> {
        page.set_user_agent(self.config.user_agent.as_str())
            .await
            .map_err(|e| CourtsideError::Render(format!("Failed to set user agent: {}", e)))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| CourtsideError::Render(format!("Navigation failed: {}", e)))?;

        if let Some(ref selector) = self.config.render_selector {
            if !self.wait_for_selector(page, selector).await {
                warn!(url, selector, "Stats widget did not appear; reading page as is");
            }
        }

        tokio::time::sleep(self.config.settle_delay()).await;

        let content = page
            .content()
            .await
            .map_err(|e| CourtsideError::Render(format!("Failed to read page content: {}", e)))?;

        debug!(url, len = content.len(), "Rendered page");
        Ok(content)
    }

    async fn wait_for_selector(&self, page: &Page, selector: &str) -> bool {
        let deadline = tokio::time::Instant::now() + self.config.selector_timeout();
        loop {
            if page.find_element(selector).await.is_ok() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(SELECTOR_POLL).await;
        }
    }

    /// Close the browser and stop its event handler
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Failed to close browser");
        }
        self.handler.abort();
    }
}
