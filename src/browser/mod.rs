// src/browser/mod.rs
//! Browser session seam.
//!
//! A run owns exactly one [`BrowserSession`], obtained from a
//! [`SessionLauncher`] and closed by the orchestrator on every exit path.
//! Every unit of work (the result page, each detail page) gets its own
//! [`BrowserTab`] so navigation state is never shared.

pub mod chromium;

use crate::error::BrowserError;
use async_trait::async_trait;
use std::time::Duration;

pub use chromium::{ChromiumLauncher, ChromiumSession};

#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn new_tab(&self) -> Result<Box<dyn BrowserTab>, BrowserError>;

    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

#[async_trait]
pub trait BrowserTab: Send {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Wait until `selector` matches at least one element, or fail after
    /// `timeout`.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Rendered HTML of the current document.
    async fn content(&mut self) -> Result<String, BrowserError>;

    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// Close a tab after its unit of work, on the success and the failure path
/// alike. Close failures are logged only.
pub async fn release_tab(tab: Box<dyn BrowserTab>, url: &str) {
    if let Err(e) = tab.close().await {
        tracing::warn!("Failed to close tab for {}: {}", url, e);
    }
}
