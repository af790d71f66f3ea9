// src/types/job_listing.rs
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Placeholder stored when a summary field cannot be read from a listing.
pub const NOT_AVAILABLE: &str = "N/A";

/// Number written to disk for an open-ended experience range ("5+ yrs").
pub const UNBOUNDED_YEARS_SENTINEL: u32 = 999;

/// Seniority label attached to a listing.
///
/// Variant order follows the alphabetical order of the labels so that a
/// `BTreeSet<SeniorityTag>` serializes in the same order as sorted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeniorityTag {
    #[serde(rename = "Entry Level")]
    EntryLevel,
    #[serde(rename = "Fresher")]
    Fresher,
    #[serde(rename = "Junior Level")]
    JuniorLevel,
    #[serde(rename = "Lead Level")]
    LeadLevel,
    #[serde(rename = "Mid Level")]
    MidLevel,
    #[serde(rename = "Mid-Senior Level")]
    MidSeniorLevel,
    #[serde(rename = "Senior Level")]
    SeniorLevel,
}

impl SeniorityTag {
    pub fn label(&self) -> &'static str {
        match self {
            SeniorityTag::EntryLevel => "Entry Level",
            SeniorityTag::Fresher => "Fresher",
            SeniorityTag::JuniorLevel => "Junior Level",
            SeniorityTag::LeadLevel => "Lead Level",
            SeniorityTag::MidLevel => "Mid Level",
            SeniorityTag::MidSeniorLevel => "Mid-Senior Level",
            SeniorityTag::SeniorLevel => "Senior Level",
        }
    }
}

impl fmt::Display for SeniorityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Upper bound of an experience range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxYears {
    Years(u32),
    /// No upper bound ("N+ yrs"). Orders above every finite bound.
    Unbounded,
}

impl MaxYears {
    /// The number persisted in dataset files; `Unbounded` maps to 999.
    pub fn legacy_value(&self) -> u32 {
        match self {
            MaxYears::Years(n) => *n,
            MaxYears::Unbounded => UNBOUNDED_YEARS_SENTINEL,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, MaxYears::Unbounded)
    }

    pub fn admits(&self, min: u32) -> bool {
        match self {
            MaxYears::Years(n) => min <= *n,
            MaxYears::Unbounded => true,
        }
    }
}

impl Serialize for MaxYears {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.legacy_value())
    }
}

impl<'de> Deserialize<'de> for MaxYears {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        let years = u32::try_from(raw)
            .map_err(|_| de::Error::custom(format!("invalid experience bound: {}", raw)))?;
        Ok(if years == UNBOUNDED_YEARS_SENTINEL {
            MaxYears::Unbounded
        } else {
            MaxYears::Years(years)
        })
    }
}

/// Structured form of a free-text experience requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Experience {
    pub min_years: Option<u32>,
    pub max_years: Option<MaxYears>,
    pub tags: BTreeSet<SeniorityTag>,
}

/// One scraped posting, as written to the per-page and merged datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListingRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "experience")]
    pub experience_raw: String,
    pub experience_min_years: Option<u32>,
    pub experience_max_years: Option<MaxYears>,
    #[serde(default)]
    pub experience_level_tags: BTreeSet<SeniorityTag>,
    pub post_date: String,
    /// Absolute detail-page URL; empty when the listing had no usable link.
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub key_skills: Vec<String>,
    #[serde(rename = "job_description", default)]
    pub job_description_html: String,
}

impl JobListingRecord {
    pub fn experience(&self) -> Experience {
        Experience {
            min_years: self.experience_min_years,
            max_years: self.experience_max_years,
            tags: self.experience_level_tags.clone(),
        }
    }

    pub fn set_experience(&mut self, experience: Experience) {
        self.experience_min_years = experience.min_years;
        self.experience_max_years = experience.max_years;
        self.experience_level_tags = experience.tags;
    }

    /// Whether the detail page can be visited for this record.
    pub fn is_enrichable(&self) -> bool {
        !self.link.trim().is_empty()
    }

    pub fn is_enriched(&self) -> bool {
        !self.key_skills.is_empty() || !self.job_description_html.is_empty()
    }
}

/// Detail-page data gathered for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub key_skills: Vec<String>,
    pub job_description_html: String,
}

impl Enrichment {
    pub fn apply_to(self, record: &mut JobListingRecord) {
        record.key_skills = self.key_skills;
        record.job_description_html = self.job_description_html;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JobListingRecord {
        JobListingRecord {
            id: "abc123".to_string(),
            title: "Rust Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Pune".to_string(),
            experience_raw: "5+ Yrs".to_string(),
            experience_min_years: Some(5),
            experience_max_years: Some(MaxYears::Unbounded),
            experience_level_tags: [SeniorityTag::MidSeniorLevel].into_iter().collect(),
            post_date: "2 Days Ago".to_string(),
            link: "https://www.naukri.com/job-listings-rust-1".to_string(),
            key_skills: vec![],
            job_description_html: String::new(),
        }
    }

    #[test]
    fn test_record_serializes_with_dataset_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "id",
            "title",
            "company",
            "location",
            "experience",
            "experience_min_years",
            "experience_max_years",
            "post_date",
            "link",
            "key_skills",
            "job_description",
        ] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
        assert_eq!(obj["experience_max_years"], serde_json::json!(999));
        assert_eq!(
            obj["experience_level_tags"],
            serde_json::json!(["Mid-Senior Level"])
        );
    }

    #[test]
    fn test_unbounded_sentinel_reads_back_as_unbounded() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: JobListingRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.experience_max_years, Some(MaxYears::Unbounded));
        assert_ne!(MaxYears::Unbounded, MaxYears::Years(998));
    }

    #[test]
    fn test_tags_serialize_sorted() {
        let tags: BTreeSet<SeniorityTag> = [
            SeniorityTag::SeniorLevel,
            SeniorityTag::LeadLevel,
            SeniorityTag::MidLevel,
            SeniorityTag::EntryLevel,
        ]
        .into_iter()
        .collect();
        let labels: Vec<&str> = tags.iter().map(|t| t.label()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn test_enrichable_requires_link() {
        let mut record = sample();
        assert!(record.is_enrichable());
        record.link = "  ".to_string();
        assert!(!record.is_enrichable());
        assert!(!record.is_enriched());
    }
}
