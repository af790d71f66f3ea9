// src/scraping/listing_extractor.rs
use super::parse_selector;
use crate::error::{ScrapeError, ScrapeResult};
use crate::experience;
use crate::types::{JobListingRecord, NOT_AVAILABLE};
use crate::utils::{clean_text, generate_listing_id};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// One job tuple on a search-results page.
pub const LISTING_CONTAINER: &str = "div.srp-jobtuple-wrapper";

const TITLE: &str = "h2 a.title";
const COMPANY: &str = "a.comp-name";
const LOCATION: &str = "span.locWdth";
const EXPERIENCE: &str = "span.expwdth";
const POST_DATE: &str = "span.job-post-day";

/// Turns a rendered search-results page into summary records.
pub struct ListingExtractor {
    container: Selector,
    title: Selector,
    company: Selector,
    location: Selector,
    experience: Selector,
    post_date: Selector,
}

impl ListingExtractor {
    pub fn new() -> ScrapeResult<Self> {
        Ok(Self {
            container: parse_selector(LISTING_CONTAINER)?,
            title: parse_selector(TITLE)?,
            company: parse_selector(COMPANY)?,
            location: parse_selector(LOCATION)?,
            experience: parse_selector(EXPERIENCE)?,
            post_date: parse_selector(POST_DATE)?,
        })
    }

    /// Extract every listing on the page in top-to-bottom order. A listing
    /// that cannot be parsed is logged and left out.
    pub fn extract(&self, html: &str, page_url: &Url) -> Vec<JobListingRecord> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();

        for (index, container) in document.select(&self.container).enumerate() {
            match self.extract_listing(index, container, page_url) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping listing on {}: {}", page_url, e),
            }
        }

        debug!("Extracted {} listings from {}", records.len(), page_url);
        records
    }

    fn extract_listing(
        &self,
        index: usize,
        container: ElementRef<'_>,
        page_url: &Url,
    ) -> ScrapeResult<JobListingRecord> {
        let title_anchor = container.select(&self.title).next();

        let title = title_anchor.and_then(element_text);
        let link = match title_anchor.and_then(|a| a.value().attr("href")) {
            Some(href) if !href.trim().is_empty() => page_url
                .join(href.trim())
                .map_err(|e| ScrapeError::ListingParse {
                    index,
                    reason: format!("bad link `{}`: {}", href, e),
                })?
                .to_string(),
            _ => String::new(),
        };
        let company = self.field(container, &self.company);

        if title.is_none() && company.is_none() && link.is_empty() {
            return Err(ScrapeError::ListingParse {
                index,
                reason: "no title, company or link".to_string(),
            });
        }

        let experience_raw = self
            .field(container, &self.experience)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let mut record = JobListingRecord {
            id: generate_listing_id(),
            title: title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            company: company.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            location: self
                .field(container, &self.location)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            experience_raw: String::new(),
            experience_min_years: None,
            experience_max_years: None,
            experience_level_tags: Default::default(),
            post_date: self
                .field(container, &self.post_date)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            link,
            key_skills: Vec::new(),
            job_description_html: String::new(),
        };
        record.set_experience(experience::normalize(&experience_raw));
        record.experience_raw = experience_raw;

        Ok(record)
    }

    fn field(&self, container: ElementRef<'_>, selector: &Selector) -> Option<String> {
        container.select(selector).next().and_then(element_text)
    }
}

fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = clean_text(&element.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use crate::types::{MaxYears, SeniorityTag};
    use std::collections::HashSet;

    fn page_url() -> Url {
        Url::parse("https://www.naukri.com/rust-jobs").unwrap()
    }

    #[test]
    fn test_extracts_fields_in_order() {
        let html = fixtures::results_page(&[
            fixtures::listing(
                "Rust Engineer",
                "/job-listings-rust-1",
                "Acme",
                "Pune",
                "3-5 Yrs",
                "1 Day Ago",
            ),
            fixtures::listing(
                "Backend Dev",
                "https://www.naukri.com/job-listings-go-2",
                "Globex",
                "Remote",
                "12+ Yrs",
                "Just Now",
            ),
        ]);
        let records = ListingExtractor::new().unwrap().extract(&html, &page_url());

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.title, "Rust Engineer");
        assert_eq!(first.company, "Acme");
        assert_eq!(first.location, "Pune");
        assert_eq!(first.post_date, "1 Day Ago");
        assert_eq!(first.link, "https://www.naukri.com/job-listings-rust-1");
        assert_eq!(first.experience_raw, "3-5 Yrs");
        assert_eq!(first.experience_min_years, Some(3));
        assert_eq!(first.experience_max_years, Some(MaxYears::Years(5)));
        assert!(first.key_skills.is_empty());
        assert!(first.job_description_html.is_empty());

        let second = &records[1];
        assert_eq!(second.title, "Backend Dev");
        assert_eq!(second.experience_max_years, Some(MaxYears::Unbounded));
        assert!(second.experience_level_tags.contains(&SeniorityTag::LeadLevel));
    }

    #[test]
    fn test_missing_fields_degrade_to_sentinel() {
        let html = fixtures::results_page(&[r#"
            <div class="srp-jobtuple-wrapper">
              <h2><a class="title" href="/job-listings-x-9">  Data
                 Engineer </a></h2>
            </div>"#
            .to_string()]);
        let records = ListingExtractor::new().unwrap().extract(&html, &page_url());

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "Data Engineer");
        assert_eq!(record.company, NOT_AVAILABLE);
        assert_eq!(record.location, NOT_AVAILABLE);
        assert_eq!(record.post_date, NOT_AVAILABLE);
        assert_eq!(record.experience_raw, NOT_AVAILABLE);
        assert_eq!(record.experience_min_years, None);
        assert!(record.experience_level_tags.is_empty());
    }

    #[test]
    fn test_listing_without_link_is_kept_summary_only() {
        let html = fixtures::results_page(&[r#"
            <div class="srp-jobtuple-wrapper">
              <a class="comp-name">Initech</a>
              <span class="expwdth">Fresher</span>
            </div>"#
            .to_string()]);
        let records = ListingExtractor::new().unwrap().extract(&html, &page_url());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company, "Initech");
        assert!(!records[0].is_enrichable());
        assert_eq!(records[0].experience_max_years, Some(MaxYears::Years(0)));
    }

    #[test]
    fn test_broken_listing_does_not_abort_page() {
        let html = fixtures::results_page(&[
            fixtures::listing("First", "/job-1", "A", "X", "1 yr", "Today"),
            r#"<div class="srp-jobtuple-wrapper"><span>sponsored</span></div>"#.to_string(),
            r#"<div class="srp-jobtuple-wrapper">
                 <h2><a class="title" href="http://[::1">Broken</a></h2>
               </div>"#
                .to_string(),
            fixtures::listing("Last", "/job-4", "B", "Y", "2 yrs", "Today"),
        ]);
        let records = ListingExtractor::new().unwrap().extract(&html, &page_url());

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Last"]);
    }

    #[test]
    fn test_ids_unique_within_page() {
        let listings: Vec<String> = (0..20)
            .map(|i| {
                fixtures::listing(
                    &format!("Job {}", i),
                    &format!("/job-{}", i),
                    "Co",
                    "City",
                    "2 yrs",
                    "Today",
                )
            })
            .collect();
        let html = fixtures::results_page(&listings);
        let records = ListingExtractor::new().unwrap().extract(&html, &page_url());

        assert_eq!(records.len(), 20);
        let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_empty_page() {
        let records = ListingExtractor::new()
            .unwrap()
            .extract("<html><body></body></html>", &page_url());
        assert!(records.is_empty());
    }
}
