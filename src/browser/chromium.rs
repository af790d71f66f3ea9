// src/browser/chromium.rs
//! Chrome over CDP via `chromiumoxide`, with a persistent profile directory.

use super::{BrowserSession, BrowserTab, SessionLauncher};
use crate::config::CrawlerConfig;
use crate::error::BrowserError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct ChromiumLauncher {
    user_data_dir: PathBuf,
    headless: bool,
    chrome_executable: Option<PathBuf>,
}

impl ChromiumLauncher {
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            user_data_dir: config.user_data_dir.clone(),
            headless: config.headless,
            chrome_executable: config.chrome_executable.clone(),
        }
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        tokio::fs::create_dir_all(&self.user_data_dir)
            .await
            .map_err(|e| {
                BrowserError::Launch(format!(
                    "cannot create profile directory {}: {}",
                    self.user_data_dir.display(),
                    e
                ))
            })?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(&self.user_data_dir)
            .viewport(None);
        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler stopped: {}", e);
                    break;
                }
            }
        });

        info!(
            "Browser session opened (profile: {}, headless: {})",
            self.user_data_dir.display(),
            self.headless
        );

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
        }))
    }
}

pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn new_tab(&self) -> Result<Box<dyn BrowserTab>, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::SessionUnavailable(e.to_string()))?;
        Ok(Box::new(ChromiumTab::new(page)))
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        let ChromiumSession {
            mut browser,
            handler_task,
        } = *self;

        let closed = browser
            .close()
            .await
            .map_err(|e| BrowserError::Close(e.to_string()));
        if let Err(e) = browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        handler_task.abort();
        info!("Browser session closed");
        closed.map(|_| ())
    }
}

/// Tab wrapper that closes its CDP target when closed explicitly and, if a
/// task is dropped mid-flight, from a spawned cleanup on drop.
pub struct ChromiumTab {
    page: Option<Page>,
    url: String,
    runtime: Option<tokio::runtime::Handle>,
}

impl ChromiumTab {
    fn new(page: Page) -> Self {
        Self {
            page: Some(page),
            url: "about:blank".to_string(),
            runtime: tokio::runtime::Handle::try_current().ok(),
        }
    }

    fn page(&self) -> Result<&Page, BrowserError> {
        self.page
            .as_ref()
            .ok_or_else(|| BrowserError::SessionUnavailable("tab already closed".to_string()))
    }
}

#[async_trait]
impl BrowserTab for ChromiumTab {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        self.url = url.to_string();
        let page = self.page()?;
        match tokio::time::timeout(timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BrowserError::Timeout {
                what: "navigation",
                url: url.to_string(),
                secs: timeout.as_secs(),
            }),
        }
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let page = self.page()?;
        let poll = async {
            loop {
                if page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
            }
        };
        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| BrowserError::SelectorMissing {
                selector: selector.to_string(),
                url: self.url.clone(),
            })
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.page()?
            .content()
            .await
            .map_err(|e| BrowserError::Content(e.to_string()))
    }

    async fn close(mut self: Box<Self>) -> Result<(), BrowserError> {
        match self.page.take() {
            Some(page) => page
                .close()
                .await
                .map_err(|e| BrowserError::Close(format!("{}: {}", self.url, e))),
            None => Ok(()),
        }
    }
}

impl Drop for ChromiumTab {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        let url = std::mem::take(&mut self.url);
        match &self.runtime {
            Some(runtime) => {
                runtime.spawn(async move {
                    if let Err(e) = page.close().await {
                        warn!("Tab cleanup on drop failed for {}: {}", url, e);
                    }
                });
            }
            None => warn!("Tab for {} dropped outside a runtime; leaving it to the browser", url),
        }
    }
}
