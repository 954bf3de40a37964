use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file structure for stepstats.
///
/// Allows users to keep the query scope and credentials in a file instead of
/// passing them on every run. Command-line flags override file values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// GitHub query configuration
    #[serde(default)]
    pub github: GitHubConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// GitHub personal access token
    pub token: Option<String>,

    /// GitHub API base URL
    #[serde(default = "default_github_base_url")]
    pub base_url: String,

    /// Repository path (e.g., 'owner/repo')
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Only workflow runs on this branch
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Only workflow runs with this status
    #[serde(default = "default_status")]
    pub status: String,

    /// Only workflow runs created after this date (YYYY-MM-DD)
    #[serde(default = "default_created_after")]
    pub created_after: String,

    /// Workflow runs requested per page (1-100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound on workflow runs considered
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Zero-based position of the measured step
    #[serde(default = "default_step_index")]
    pub step_index: usize,

    /// Measure the step with this name instead of a fixed position
    pub step_name: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_github_base_url(),
            repo: default_repo(),
            branch: default_branch(),
            status: default_status(),
            created_after: default_created_after(),
            page_size: default_page_size(),
            max_items: default_max_items(),
            step_index: default_step_index(),
            step_name: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_github_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_repo() -> String {
    "mathworks/ci-configuration-examples".to_string()
}

fn default_branch() -> String {
    "hourly".to_string()
}

fn default_status() -> String {
    "success".to_string()
}

fn default_created_after() -> String {
    "2023-04-12".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_max_items() -> usize {
    1000
}

fn default_step_index() -> usize {
    2
}

fn default_timeout_secs() -> u64 {
    30
}

const CONFIG_CANDIDATES: [&str; 4] = [
    "stepstats.toml",
    "stepstats.json",
    "stepstats.yaml",
    "stepstats.yml",
];

impl GitHubConfig {
    pub fn created_after_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.created_after, "%Y-%m-%d").with_context(|| {
            format!(
                "created-after must be a YYYY-MM-DD date, got '{}'",
                self.created_after
            )
        })
    }

    /// Checks values a request would otherwise fail on much later.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.page_size) {
            bail!("page-size must be between 1 and 100, got {}", self.page_size);
        }
        if self.max_items == 0 {
            bail!("max-items must be at least 1");
        }
        if self.timeout_secs == 0 {
            bail!("timeout-secs must be at least 1");
        }
        if self.step_name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            bail!("step-name must not be empty");
        }
        self.created_after_date()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./stepstats.toml
    /// 3. ./stepstats.json
    /// 4. ./stepstats.yaml
    /// 5. ./stepstats.yml
    /// 6. `<user config dir>/stepstats/stepstats.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        for candidate in &CONFIG_CANDIDATES {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            return Self::load_from_path(&path);
        }

        Ok(Self::default())
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stepstats").join("stepstats.toml"))
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }
}
