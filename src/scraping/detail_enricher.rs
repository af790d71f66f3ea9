// src/scraping/detail_enricher.rs
use super::parse_selector;
use crate::browser::{release_tab, BrowserSession, BrowserTab};
use crate::config::CrawlerConfig;
use crate::error::{BrowserError, ScrapeError, ScrapeResult};
use crate::types::{Enrichment, JobListingRecord};
use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Section of a detail page holding the skills chips and description.
pub const DESCRIPTION_CONTAINER: &str = "section[class^=styles_job-desc-container]";

const KEY_SKILL: &str = r#"div[class^="styles_key-skill"] > div > a > span"#;
const DESCRIPTION_BODY: &str = "div[class^='styles_JDC__dang-inner-html']";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Records without a link.
    pub skipped: usize,
}

/// Visits each record's detail page and fills in key skills and the
/// description markup.
pub struct DetailEnricher {
    container: Selector,
    key_skill: Selector,
    body: Selector,
    navigation_timeout: Duration,
    selector_timeout: Duration,
    concurrency: Option<usize>,
}

impl DetailEnricher {
    pub fn new(config: &CrawlerConfig) -> ScrapeResult<Self> {
        Ok(Self {
            container: parse_selector(DESCRIPTION_CONTAINER)?,
            key_skill: parse_selector(KEY_SKILL)?,
            body: parse_selector(DESCRIPTION_BODY)?,
            navigation_timeout: config.navigation_timeout(),
            selector_timeout: config.selector_timeout(),
            concurrency: config.enrichment_concurrency,
        })
    }

    /// Enrich every record with a link, concurrently, in place.
    ///
    /// Each detail page is an isolated task with its own tab: a failed task
    /// leaves its record untouched and never affects the others. Record
    /// order is unchanged. The only error returned is loss of the browser
    /// session, after the successful tasks have been applied.
    pub async fn enrich(
        &self,
        session: &dyn BrowserSession,
        records: &mut [JobListingRecord],
    ) -> ScrapeResult<EnrichmentSummary> {
        let targets: Vec<(usize, String)> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.is_enrichable())
            .map(|(index, record)| (index, record.link.clone()))
            .collect();

        let mut summary = EnrichmentSummary {
            attempted: targets.len(),
            skipped: records.len() - targets.len(),
            ..Default::default()
        };
        if targets.is_empty() {
            return Ok(summary);
        }

        let width = self.concurrency.unwrap_or(targets.len()).max(1);
        debug!(
            "Enriching {} records with fan-out width {}",
            targets.len(),
            width
        );

        // `buffered` yields in submission order, whatever order tasks finish in.
        let outcomes: Vec<(usize, String, ScrapeResult<Enrichment>)> = stream::iter(targets)
            .map(|(index, link)| async move {
                let outcome = self.enrich_one(session, &link).await;
                (index, link, outcome)
            })
            .buffered(width)
            .collect()
            .await;

        let mut session_lost = None;
        for (index, link, outcome) in outcomes {
            match outcome {
                Ok(enrichment) => {
                    enrichment.apply_to(&mut records[index]);
                    summary.succeeded += 1;
                }
                Err(e) => {
                    warn!("Failed to enrich {}: {}", link, e);
                    summary.failed += 1;
                    if e.is_fatal() && session_lost.is_none() {
                        session_lost = Some(e);
                    }
                }
            }
        }

        info!(
            "Enrichment finished: {} succeeded, {} failed, {} without link",
            summary.succeeded, summary.failed, summary.skipped
        );

        match session_lost {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }

    async fn enrich_one(
        &self,
        session: &dyn BrowserSession,
        link: &str,
    ) -> ScrapeResult<Enrichment> {
        let mut tab = session.new_tab().await?;
        let outcome = self.fetch_detail(tab.as_mut(), link).await;
        release_tab(tab, link).await;
        outcome
    }

    async fn fetch_detail(&self, tab: &mut dyn BrowserTab, link: &str) -> ScrapeResult<Enrichment> {
        tab.goto(link, self.navigation_timeout).await?;
        tab.wait_for_selector(DESCRIPTION_CONTAINER, self.selector_timeout)
            .await?;
        let html = tab.content().await?;
        self.parse_detail(&html, link)
    }

    /// Pull skills and description markup out of a rendered detail page.
    pub fn parse_detail(&self, html: &str, link: &str) -> ScrapeResult<Enrichment> {
        let document = Html::parse_document(html);
        let missing = |selector: &str| {
            ScrapeError::Browser(BrowserError::SelectorMissing {
                selector: selector.to_string(),
                url: link.to_string(),
            })
        };

        let container = document
            .select(&self.container)
            .next()
            .ok_or_else(|| missing(DESCRIPTION_CONTAINER))?;

        let key_skills = container
            .select(&self.key_skill)
            .map(|chip| chip.text().collect::<String>().trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect();

        let job_description_html = container
            .select(&self.body)
            .next()
            .map(|body| body.inner_html().trim().to_string())
            .ok_or_else(|| missing(DESCRIPTION_BODY))?;

        Ok(Enrichment {
            key_skills,
            job_description_html,
        })
    }
}
