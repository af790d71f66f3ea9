// src/utils.rs
use crate::error::{ScrapeError, ScrapeResult};
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};

const ID_ALPHABET: &[u8] = b"_-0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ID_LENGTH: usize = 15;

/// Turn a search query into the site's URL slug: "Rust Jobs" -> "rust-jobs".
pub fn search_slug(query: &str) -> String {
    query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Collapse whitespace and line breaks of scraped text into single spaces.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Short URL-safe random identifier (15 chars over a 64-symbol alphabet).
pub fn generate_listing_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// `<dir>/<prefix>_<page>.json`
pub fn page_dataset_path(data_dir: &Path, prefix: &str, page: u32) -> PathBuf {
    data_dir.join(format!("{}_{}.json", prefix, page))
}

/// `<dir>/<prefix>_merged.json`
pub fn merged_dataset_path(data_dir: &Path, prefix: &str) -> PathBuf {
    data_dir.join(format!("{}_merged.json", prefix))
}

/// Ensure directory exists
pub async fn ensure_directory(path: &Path) -> ScrapeResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| ScrapeError::io(path, e))
}

/// Serialize `value` as 4-space indented JSON and write it, creating the
/// parent directory when needed.
pub async fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> ScrapeResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent).await?;
        }
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;

    tokio::fs::write(path, buf)
        .await
        .map_err(|e| ScrapeError::io(path, e))
}
