use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Token;
use crate::config::{Config, GitHubConfig, OutputFormat};
use crate::insights::DurationInsights;
use crate::output;
use crate::providers::{GitHubProvider, PageLimits, RunFilter, StepSelector};

#[derive(Parser)]
#[command(name = "stepstats")]
#[command(
    author,
    version,
    about = "GitHub Actions step duration statistics per runner OS",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./stepstats.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect step durations from GitHub Actions workflow runs
    Github(GitHubArgs),
}

#[derive(Args, Debug, Default)]
struct GitHubArgs {
    #[arg(short, long, env = "GIT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub API base URL
    #[arg(short, long)]
    url: Option<String>,

    /// Repository in owner/repo form
    #[arg(short, long)]
    repo: Option<String>,

    #[arg(short, long)]
    branch: Option<String>,

    /// Workflow run status filter
    #[arg(short, long)]
    status: Option<String>,

    /// Only runs created after this date (YYYY-MM-DD)
    #[arg(long)]
    created_after: Option<String>,

    /// Workflow runs per page (1-100)
    #[arg(long)]
    page_size: Option<usize>,

    /// Upper bound on workflow runs considered
    #[arg(long)]
    max_items: Option<usize>,

    /// Zero-based position of the measured step
    #[arg(long, conflicts_with = "step_name")]
    step_index: Option<usize>,

    /// Measure the first step with this exact name
    #[arg(long)]
    step_name: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl GitHubArgs {
    /// Applies command-line values over the configuration file.
    fn merge_into(&self, config: &mut GitHubConfig) {
        if let Some(url) = &self.url {
            config.base_url.clone_from(url);
        }
        if let Some(repo) = &self.repo {
            config.repo.clone_from(repo);
        }
        if let Some(branch) = &self.branch {
            config.branch.clone_from(branch);
        }
        if let Some(status) = &self.status {
            config.status.clone_from(status);
        }
        if let Some(created_after) = &self.created_after {
            config.created_after.clone_from(created_after);
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(max_items) = self.max_items {
            config.max_items = max_items;
        }
        if let Some(step_index) = self.step_index {
            config.step_index = step_index;
            config.step_name = None;
        }
        if let Some(step_name) = &self.step_name {
            config.step_name = Some(step_name.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
    }
}

fn step_selector(config: &GitHubConfig) -> StepSelector {
    match &config.step_name {
        Some(name) => StepSelector::Named(name.clone()),
        None => StepSelector::Position(config.step_index),
    }
}

impl Cli {
    async fn execute_github(&self, args: &GitHubArgs, mut config: Config) -> Result<()> {
        args.merge_into(&mut config.github);
        config
            .github
            .validate()
            .context("Invalid GitHub configuration")?;

        let github = &config.github;
        let token = Token::resolve(args.token.as_deref(), github.token.as_deref())?;

        info!("Collecting step durations for repository: {}", github.repo);

        let filter = RunFilter {
            branch: github.branch.clone(),
            status: github.status.clone(),
            created_after: github.created_after_date()?,
        };
        let provider = GitHubProvider::new(
            &github.base_url,
            &github.repo,
            filter,
            token,
            Duration::from_secs(github.timeout_secs),
        )?;

        let limits = PageLimits {
            page_size: github.page_size,
            max_items: github.max_items,
        };
        let insights = provider
            .collect_insights(limits, &step_selector(github))
            .await?;

        self.emit(&insights, &config)
    }

    fn emit(&self, insights: &DurationInsights, config: &Config) -> Result<()> {
        let format = self.format.unwrap_or(config.output.format);
        let pretty = self.pretty || config.output.pretty;

        match (format, &self.output) {
            (OutputFormat::Summary, None) => output::print_summary(insights),
            (OutputFormat::Summary, Some(path)) => {
                // The rendered summary is for terminals; files get JSON
                write_json(insights, pretty, path)?;
            }
            (OutputFormat::Json, None) => println!("{}", to_json(insights, pretty)?),
            (OutputFormat::Json, Some(path)) => write_json(insights, pretty, path)?,
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Github(args) => self.execute_github(args, config).await,
        }
    }
}

fn to_json(insights: &DurationInsights, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(insights)?
    } else {
        serde_json::to_string(insights)?
    };
    Ok(json)
}

fn write_json(insights: &DurationInsights, pretty: bool, path: &Path) -> Result<()> {
    std::fs::write(path, to_json(insights, pretty)?)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!("Insights written to: {}", path.display());
    Ok(())
}
