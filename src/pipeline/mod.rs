// src/pipeline/mod.rs
pub mod dataset;
pub mod orchestrator;
pub mod page_merger;

pub use dataset::{MergedDataset, PageDataset};
pub use orchestrator::CrawlOrchestrator;
pub use page_merger::PageMerger;
