// src/testing.rs
//! Scripted in-memory browser and HTML fixtures for tests.

use crate::browser::{BrowserSession, BrowserTab, SessionLauncher};
use crate::config::CrawlerConfig;
use crate::error::BrowserError;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn test_config() -> CrawlerConfig {
    CrawlerConfig {
        base_url: "https://jobs.test".to_string(),
        navigation_timeout_secs: 5,
        selector_timeout_secs: 2,
        ..CrawlerConfig::default()
    }
}

/// Unique scratch directory under the system temp dir.
pub fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("job-crawler-{}-{}", label, uuid::Uuid::new_v4()))
}

#[derive(Debug, Clone)]
pub enum FakePage {
    Html { html: String, delay: Duration },
    /// Navigation fails immediately.
    Fail,
    /// Navigation never completes; the caller's timeout fires.
    Hang,
    /// Navigation takes the whole session down.
    KillSession,
}

impl FakePage {
    pub fn html(html: String) -> Self {
        FakePage::Html {
            html,
            delay: Duration::ZERO,
        }
    }

    pub fn slow(html: String, delay: Duration) -> Self {
        FakePage::Html { html, delay }
    }
}

#[derive(Default)]
struct BrowserState {
    pages: HashMap<String, FakePage>,
    navigations: Vec<String>,
    tabs_opened: usize,
    tabs_closed: usize,
    max_concurrent: usize,
    sessions_launched: usize,
    sessions_closed: usize,
    session_dead: bool,
    fail_launch: bool,
}

impl BrowserState {
    fn open_tabs(&self) -> usize {
        self.tabs_opened - self.tabs_closed
    }
}

/// Shared handle to the scripted browser; clones observe the same state.
#[derive(Clone, Default)]
pub struct FakeBrowser {
    state: Arc<Mutex<BrowserState>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, page: FakePage) {
        self.lock().pages.insert(url.to_string(), page);
    }

    pub fn fail_launch(&self) {
        self.lock().fail_launch = true;
    }

    pub fn launcher(&self) -> FakeLauncher {
        FakeLauncher {
            browser: self.clone(),
        }
    }

    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    pub fn open_tabs(&self) -> usize {
        self.lock().open_tabs()
    }

    pub fn tabs_opened(&self) -> usize {
        self.lock().tabs_opened
    }

    pub fn max_concurrent_tabs(&self) -> usize {
        self.lock().max_concurrent
    }

    pub fn sessions_launched(&self) -> usize {
        self.lock().sessions_launched
    }

    pub fn sessions_closed(&self) -> usize {
        self.lock().sessions_closed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct FakeLauncher {
    browser: FakeBrowser,
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let mut state = self.browser.lock();
        if state.fail_launch {
            return Err(BrowserError::Launch("chrome not installed".to_string()));
        }
        state.sessions_launched += 1;
        state.session_dead = false;
        Ok(Box::new(FakeSession {
            browser: self.browser.clone(),
        }))
    }
}

pub struct FakeSession {
    browser: FakeBrowser,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn new_tab(&self) -> Result<Box<dyn BrowserTab>, BrowserError> {
        let mut state = self.browser.lock();
        if state.session_dead {
            return Err(BrowserError::SessionUnavailable("browser crashed".to_string()));
        }
        state.tabs_opened += 1;
        let open = state.open_tabs();
        state.max_concurrent = state.max_concurrent.max(open);
        Ok(Box::new(FakeTab {
            browser: self.browser.clone(),
            url: String::new(),
            html: None,
        }))
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        self.browser.lock().sessions_closed += 1;
        Ok(())
    }
}

pub struct FakeTab {
    browser: FakeBrowser,
    url: String,
    html: Option<String>,
}

#[async_trait]
impl BrowserTab for FakeTab {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        self.url = url.to_string();
        let page = {
            let mut state = self.browser.lock();
            state.navigations.push(url.to_string());
            state.pages.get(url).cloned()
        };

        match page {
            Some(FakePage::Html { html, delay }) => {
                if delay >= timeout {
                    tokio::time::sleep(timeout).await;
                    return Err(timed_out(url, timeout));
                }
                tokio::time::sleep(delay).await;
                self.html = Some(html);
                Ok(())
            }
            Some(FakePage::Hang) => {
                tokio::time::sleep(timeout).await;
                Err(timed_out(url, timeout))
            }
            Some(FakePage::KillSession) => {
                self.browser.lock().session_dead = true;
                Err(BrowserError::SessionUnavailable("browser crashed".to_string()))
            }
            Some(FakePage::Fail) | None => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_FAILED".to_string(),
            }),
        }
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let present = self
            .html
            .as_deref()
            .map(|html| selector_present(html, selector))
            .unwrap_or(false);
        if present {
            return Ok(());
        }
        tokio::time::sleep(timeout).await;
        Err(BrowserError::SelectorMissing {
            selector: selector.to_string(),
            url: self.url.clone(),
        })
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.html
            .clone()
            .ok_or_else(|| BrowserError::Content(format!("nothing loaded in tab for {}", self.url)))
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        self.browser.lock().tabs_closed += 1;
        Ok(())
    }
}

fn timed_out(url: &str, timeout: Duration) -> BrowserError {
    BrowserError::Timeout {
        what: "navigation",
        url: url.to_string(),
        secs: timeout.as_secs(),
    }
}

fn selector_present(html: &str, selector: &str) -> bool {
    let Ok(selector) = Selector::parse(selector) else {
        return false;
    };
    Html::parse_document(html).select(&selector).next().is_some()
}

pub mod fixtures {
    pub fn listing(
        title: &str,
        href: &str,
        company: &str,
        location: &str,
        experience: &str,
        posted: &str,
    ) -> String {
        format!(
            r#"<div class="srp-jobtuple-wrapper">
  <div class="row1"><h2><a class="title" href="{href}">{title}</a></h2></div>
  <div class="row2"><a class="comp-name">{company}</a></div>
  <div class="row3">
    <span class="expwdth">{experience}</span>
    <span class="locWdth">{location}</span>
  </div>
  <div class="row6"><span class="job-post-day">{posted}</span></div>
</div>"#
        )
    }

    pub fn results_page(listings: &[String]) -> String {
        format!(
            "<html><body><div class=\"srp-jobtuple-list\">{}</div></body></html>",
            listings.join("\n")
        )
    }

    pub fn detail_page(skills: &[&str], description: &str) -> String {
        let chips: String = skills
            .iter()
            .map(|s| format!(r#"<a class="styles_chip__7YCfG"><span>{}</span></a>"#, s))
            .collect();
        format!(
            r#"<html><body>
<section class="styles_job-desc-container__txpYf">
  <div class="styles_JDC__dang-inner-html__h0K4t">{description}</div>
  <div class="styles_key-skill__GIPn_"><div>{chips}</div></div>
</section>
</body></html>"#
        )
    }
}
