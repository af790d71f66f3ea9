// src/types/report.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Parameters of one crawl run, as received from the CLI or HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParams {
    pub search_query: String,
    pub start_page: u32,
    pub end_page: u32,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            search_query: "Software Engineering Jobs".to_string(),
            start_page: 1,
            end_page: 5,
        }
    }
}

/// Phase of a run. Logged at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Idle,
    SessionOpen,
    Navigating,
    Extracting,
    Enriching,
    Persisting,
    Merging,
    SessionClosed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Idle => "idle",
            RunPhase::SessionOpen => "session-open",
            RunPhase::Navigating => "navigating",
            RunPhase::Extracting => "extracting",
            RunPhase::Enriching => "enriching",
            RunPhase::Persisting => "persisting",
            RunPhase::Merging => "merging",
            RunPhase::SessionClosed => "session-closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Done,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub page: u32,
    pub records: usize,
    pub enriched: usize,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFailure {
    pub page: u32,
    pub reason: String,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub prefix: String,
    pub search_query: String,
    pub start_page: u32,
    pub end_page: u32,
    pub pages: Vec<PageSummary>,
    pub failed_pages: Vec<PageFailure>,
    pub merged_path: PathBuf,
    pub merged_records: usize,
    pub outcome: RunOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
