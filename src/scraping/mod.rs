// src/scraping/mod.rs
pub mod detail_enricher;
pub mod listing_extractor;

pub use detail_enricher::{DetailEnricher, EnrichmentSummary, DESCRIPTION_CONTAINER};
pub use listing_extractor::{ListingExtractor, LISTING_CONTAINER};

use crate::error::{ScrapeError, ScrapeResult};
use scraper::Selector;

pub(crate) fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|_| ScrapeError::InvalidSelector(selector.to_string()))
}
