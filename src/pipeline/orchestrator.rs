// src/pipeline/orchestrator.rs
//! Drives one crawl run: open the session, walk the page range one page at
//! a time (extract, enrich, persist), close the session, then merge.

use super::dataset::PageDataset;
use super::page_merger::PageMerger;
use crate::browser::{release_tab, BrowserSession, BrowserTab, SessionLauncher};
use crate::config::CrawlerConfig;
use crate::error::{BrowserError, ScrapeError, ScrapeResult};
use crate::scraping::{DetailEnricher, ListingExtractor, LISTING_CONTAINER};
use crate::types::{PageFailure, PageSummary, RunOutcome, RunParams, RunPhase, RunReport};
use crate::utils::search_slug;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

pub struct CrawlOrchestrator {
    config: CrawlerConfig,
    launcher: Arc<dyn SessionLauncher>,
    extractor: ListingExtractor,
    enricher: DetailEnricher,
    merger: PageMerger,
}

/// Result of the page loop, before the merge.
struct PageLoop {
    pages: Vec<PageSummary>,
    failed_pages: Vec<PageFailure>,
}

impl CrawlOrchestrator {
    pub fn new(config: CrawlerConfig, launcher: Arc<dyn SessionLauncher>) -> ScrapeResult<Self> {
        Ok(Self {
            extractor: ListingExtractor::new()?,
            enricher: DetailEnricher::new(&config)?,
            merger: PageMerger::new(config.data_dir.clone()),
            config,
            launcher,
        })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// URL of result page `page` for `slug`: the bare slug for page 1,
    /// `<slug>-<page>` after that.
    pub fn page_url(&self, slug: &str, page: u32) -> ScrapeResult<Url> {
        let raw = if page <= 1 {
            format!("{}/{}", self.config.base_url, slug)
        } else {
            format!("{}/{}-{}", self.config.base_url, slug, page)
        };
        Url::parse(&raw).map_err(|e| {
            ScrapeError::Browser(BrowserError::Navigation {
                reason: format!("invalid page URL: {}", e),
                url: raw.clone(),
            })
        })
    }

    /// Run the whole pipeline for `params`.
    ///
    /// Page failures are logged and recorded in the report; the run only
    /// fails if the session cannot be acquired or lost, or if the merge
    /// finds a page missing.
    pub async fn run(&self, params: &RunParams) -> ScrapeResult<RunReport> {
        let started_at = Utc::now();
        let (start, end) = (params.start_page, params.end_page);
        if start == 0 || start > end {
            return Err(ScrapeError::InvalidPageRange { start, end });
        }

        let slug = search_slug(&params.search_query);
        let prefix = self.config.output_prefix.clone();
        info!(
            "Starting crawl for '{}' (slug {}), pages {}..={}",
            params.search_query, slug, start, end
        );
        debug!("Run phase: {}", RunPhase::Idle);

        let session = match self.launcher.launch().await {
            Ok(session) => session,
            Err(e) => {
                error!("Could not open browser session ({:?}): {}", RunOutcome::Failed, e);
                return Err(ScrapeError::SessionAcquisition(e));
            }
        };
        debug!("Run phase: {}", RunPhase::SessionOpen);

        let looped = self
            .crawl_pages(session.as_ref(), &slug, &prefix, start, end)
            .await;

        if let Err(e) = session.close().await {
            warn!("Browser session did not close cleanly: {}", e);
        }
        debug!("Run phase: {}", RunPhase::SessionClosed);

        let looped =
            looped.inspect_err(|e| error!("Crawl aborted ({:?}): {}", RunOutcome::Failed, e))?;

        debug!("Run phase: {}", RunPhase::Merging);
        let merged = self
            .merger
            .merge(&prefix, start, end)
            .await
            .inspect_err(|e| {
                error!(
                    "Run for '{}' failed at merge ({:?}): {}",
                    params.search_query,
                    RunOutcome::Failed,
                    e
                )
            })?;

        let report = RunReport {
            prefix,
            search_query: params.search_query.clone(),
            start_page: start,
            end_page: end,
            pages: looped.pages,
            failed_pages: looped.failed_pages,
            merged_path: merged.path,
            merged_records: merged.records.len(),
            outcome: RunOutcome::Done,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            "Crawl done: {} records merged, {} page(s) failed",
            report.merged_records,
            report.failed_pages.len()
        );
        Ok(report)
    }

    async fn crawl_pages(
        &self,
        session: &dyn BrowserSession,
        slug: &str,
        prefix: &str,
        start: u32,
        end: u32,
    ) -> ScrapeResult<PageLoop> {
        let mut looped = PageLoop {
            pages: Vec::new(),
            failed_pages: Vec::new(),
        };

        // A page that fails this run must show up as a gap at merge time,
        // not be filled by an earlier run's file.
        for page in start..=end {
            PageDataset::discard(&self.config.data_dir, prefix, page).await?;
        }

        for page in start..=end {
            match self.crawl_page(session, slug, prefix, page).await {
                Ok(summary) => {
                    info!("Scraped page {} ({} records)", page, summary.records);
                    looped.pages.push(summary);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Skipping page {}: {}", page, e);
                    looped.failed_pages.push(PageFailure {
                        page,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(looped)
    }

    async fn crawl_page(
        &self,
        session: &dyn BrowserSession,
        slug: &str,
        prefix: &str,
        page: u32,
    ) -> ScrapeResult<PageSummary> {
        let url = self.page_url(slug, page)?;

        debug!("Run phase: {} (page {})", RunPhase::Navigating, page);
        let mut tab = session.new_tab().await?;
        let html = self.load_results(tab.as_mut(), &url).await;
        release_tab(tab, url.as_str()).await;
        let html = html?;

        debug!("Run phase: {} (page {})", RunPhase::Extracting, page);
        let mut records = self.extractor.extract(&html, &url);

        debug!("Run phase: {} (page {})", RunPhase::Enriching, page);
        let enrichment = self.enricher.enrich(session, &mut records).await?;

        debug!("Run phase: {} (page {})", RunPhase::Persisting, page);
        let dataset = PageDataset::new(prefix, page, records);
        let path = dataset.persist(&self.config.data_dir).await?;

        Ok(PageSummary {
            page,
            records: dataset.records.len(),
            enriched: enrichment.succeeded,
            path,
        })
    }

    async fn load_results(&self, tab: &mut dyn BrowserTab, url: &Url) -> ScrapeResult<String> {
        tab.goto(url.as_str(), self.config.navigation_timeout())
            .await?;
        tab.wait_for_selector(LISTING_CONTAINER, self.config.selector_timeout())
            .await?;
        Ok(tab.content().await?)
    }
}
