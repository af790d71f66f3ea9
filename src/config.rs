// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub base_url: String,
    pub data_dir: PathBuf,
    pub output_prefix: String,
    pub user_data_dir: PathBuf,
    pub chrome_executable: Option<PathBuf>,
    pub headless: bool,
    pub navigation_timeout_secs: u64,
    pub selector_timeout_secs: u64,
    /// Max detail pages fetched at once per result page. `None` means one
    /// task per listing on the page.
    pub enrichment_concurrency: Option<usize>,
    pub database_path: PathBuf,
    pub log_file: Option<PathBuf>,
    /// Environment section the settings were taken from.
    #[serde(skip)]
    pub environment: String,
    /// Config file the settings were read from, `None` for built-in defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.naukri.com".to_string(),
            data_dir: PathBuf::from("data"),
            output_prefix: "naukri_output".to_string(),
            user_data_dir: PathBuf::from("user_data"),
            chrome_executable: None,
            headless: false,
            navigation_timeout_secs: 60,
            selector_timeout_secs: 30,
            enrichment_concurrency: None,
            database_path: PathBuf::from("data/jobs.db"),
            log_file: None,
            environment: "local".to_string(),
            source: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<CrawlerConfig>,
    #[serde(default)]
    production: Option<CrawlerConfig>,
}

impl CrawlerConfig {
    /// Load configuration based on environment: `config.yaml` section,
    /// then `CRAWLER_*` overrides, then absolute paths.
    ///
    /// Runs before logging is set up, so nothing is logged here; call
    /// [`CrawlerConfig::log_summary`] once a subscriber is installed.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        let base = Self::load_from_file(Path::new("config.yaml"), &environment)?;
        base.with_env_overrides(|key| std::env::var(key).ok())?
            .resolved()
    }

    pub fn log_summary(&self) {
        info!("Crawler configuration for environment: {}", self.environment);
        match &self.source {
            Some(path) => info!("Settings read from {}", path.display()),
            None => info!("config.yaml not found, using built-in defaults"),
        }
        info!("Base URL: {}", self.base_url);
        info!("Data directory: {}", self.data_dir.display());
    }

    fn get_environment() -> String {
        std::env::var("CRAWLER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                environment: environment.to_string(),
                ..Self::default()
            });
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.environment = environment.to_string();
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }

    fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("CRAWLER_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("CRAWLER_BASE_URL") {
            self.base_url = url;
        }
        if let Some(flag) = lookup("CRAWLER_HEADLESS") {
            self.headless = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(width) = lookup("CRAWLER_CONCURRENCY") {
            let width: usize = width
                .parse()
                .with_context(|| format!("CRAWLER_CONCURRENCY must be a number, got {}", width))?;
            self.enrichment_concurrency = (width > 0).then_some(width);
        }
        if let Some(path) = lookup("CRAWLER_DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }
        Ok(self)
    }

    fn resolved(mut self) -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        for path in [
            &mut self.data_dir,
            &mut self.user_data_dir,
            &mut self.database_path,
        ] {
            if path.is_relative() {
                *path = current_dir.join(&*path);
            }
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_secs)
    }

    /// Ensure all configured directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .with_context(|| format!("Failed to create directory: {}", self.data_dir.display()))?;
        if let Some(db_parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(db_parent).await.with_context(|| {
                format!("Failed to create database directory: {}", db_parent.display())
            })?;
        }
        info!("All configured directories ensured to exist");
        Ok(())
    }
}
