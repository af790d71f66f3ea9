// src/pipeline/dataset.rs
use crate::error::{ScrapeError, ScrapeResult};
use crate::types::JobListingRecord;
use crate::utils::{page_dataset_path, write_json_pretty};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Records of one result page, addressed by `(prefix, page)`.
#[derive(Debug, Clone)]
pub struct PageDataset {
    pub prefix: String,
    pub page: u32,
    pub records: Vec<JobListingRecord>,
}

impl PageDataset {
    pub fn new(prefix: &str, page: u32, records: Vec<JobListingRecord>) -> Self {
        Self {
            prefix: prefix.to_string(),
            page,
            records,
        }
    }

    pub fn path_in(&self, data_dir: &Path) -> PathBuf {
        page_dataset_path(data_dir, &self.prefix, self.page)
    }

    /// Write the page to `<data_dir>/<prefix>_<page>.json`, replacing any
    /// earlier file for the same page.
    pub async fn persist(&self, data_dir: &Path) -> ScrapeResult<PathBuf> {
        let path = self.path_in(data_dir);
        write_json_pretty(&path, &self.records).await?;
        info!(
            "Saved {} records for page {} to {}",
            self.records.len(),
            self.page,
            path.display()
        );
        Ok(path)
    }

    /// Remove a persisted page, if any. Returns whether a file was removed.
    pub async fn discard(data_dir: &Path, prefix: &str, page: u32) -> ScrapeResult<bool> {
        let path = page_dataset_path(data_dir, prefix, page);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed earlier dataset {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ScrapeError::io(path, e)),
        }
    }

    /// Load a persisted page. A missing file is reported as
    /// [`ScrapeError::MissingPage`].
    pub async fn load(data_dir: &Path, prefix: &str, page: u32) -> ScrapeResult<Self> {
        let path = page_dataset_path(data_dir, prefix, page);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScrapeError::MissingPage { path, page });
            }
            Err(e) => return Err(ScrapeError::io(path, e)),
        };
        let records: Vec<JobListingRecord> = serde_json::from_str(&content)?;
        Ok(Self::new(prefix, page, records))
    }
}

/// Concatenation of a run's page datasets.
#[derive(Debug, Clone)]
pub struct MergedDataset {
    pub prefix: String,
    pub path: PathBuf,
    pub records: Vec<JobListingRecord>,
}
