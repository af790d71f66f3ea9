// src/pipeline/page_merger.rs
use super::dataset::{MergedDataset, PageDataset};
use crate::error::{ScrapeError, ScrapeResult};
use crate::utils::{merged_dataset_path, page_dataset_path, write_json_pretty};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Combines `<prefix>_<start>.json ..= <prefix>_<end>.json` into
/// `<prefix>_merged.json`, page order then listing order. No cross-page
/// deduplication.
pub struct PageMerger {
    data_dir: PathBuf,
}

impl PageMerger {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Fails with [`ScrapeError::MissingPage`] if any page in the range was
    /// never persisted. Nothing is written in that case.
    pub async fn merge(
        &self,
        prefix: &str,
        start_page: u32,
        end_page: u32,
    ) -> ScrapeResult<MergedDataset> {
        if start_page == 0 || start_page > end_page {
            return Err(ScrapeError::InvalidPageRange {
                start: start_page,
                end: end_page,
            });
        }

        for page in start_page..=end_page {
            let path = page_dataset_path(&self.data_dir, prefix, page);
            if !tokio::fs::try_exists(&path)
                .await
                .map_err(|e| ScrapeError::io(&path, e))?
            {
                error!("Cannot merge {}: page {} missing at {}", prefix, page, path.display());
                return Err(ScrapeError::MissingPage { path, page });
            }
        }

        let mut records = Vec::new();
        for page in start_page..=end_page {
            let dataset = PageDataset::load(&self.data_dir, prefix, page).await?;
            records.extend(dataset.records);
        }

        let path = merged_dataset_path(&self.data_dir, prefix);
        write_json_pretty(&path, &records).await?;
        info!(
            "Merged pages {}..={} of {} into {} ({} records)",
            start_page,
            end_page,
            prefix,
            path.display(),
            records.len()
        );

        Ok(MergedDataset {
            prefix: prefix.to_string(),
            path,
            records,
        })
    }
}
