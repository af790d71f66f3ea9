//! Job-listing acquisition: crawl paginated search results in a browser,
//! enrich each listing from its detail page, persist one JSON dataset per
//! page and merge them.

pub mod browser;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod experience;
pub mod pipeline;
pub mod scraping;
pub mod types;
pub mod utils;
pub mod web;

#[cfg(test)]
mod testing;

pub use config::CrawlerConfig;
pub use error::{BrowserError, ScrapeError, ScrapeResult};
pub use pipeline::CrawlOrchestrator;
pub use web::start_web_server;
