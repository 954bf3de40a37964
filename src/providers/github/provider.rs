use std::time::Duration;

use chrono::Utc;
use log::info;

use crate::auth::Token;
use crate::error::{Result, StepStatsError};
use crate::insights::{BucketSummary, DurationInsights};
use crate::output::PhaseProgress;
use crate::statistics::Statistics;

use super::aggregator::{collect_samples, PageLimits, SampleSets};
use super::classifier::{OsBucket, StepSelector};
use super::client::{GitHubClient, RunFilter};

/// Provider for collecting step-duration insights from GitHub Actions.
pub struct GitHubProvider {
    /// GitHub API client
    client: GitHubClient,
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
}

impl GitHubProvider {
    /// Create a new GitHub Actions provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL
    /// * `repo_path` - Repository path in format "owner/repo"
    /// * `filter` - Branch, status and creation-date scope of the run listing
    /// * `token` - GitHub personal access token
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the repository path is not `owner/repo` or the
    /// HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        repo_path: &str,
        filter: RunFilter,
        token: Token,
        timeout: Duration,
    ) -> Result<Self> {
        let (owner, repo) = split_repo_path(repo_path)?;
        let client = GitHubClient::new(base_url, repo_path, filter, token, timeout)?;

        Ok(Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Collect step durations and summarize them per OS bucket.
    ///
    /// # Errors
    ///
    /// Returns the first transport, HTTP status, decode, timestamp or
    /// missing-step error; no partial report is produced.
    pub async fn collect_insights(
        &self,
        limits: PageLimits,
        selector: &StepSelector,
    ) -> Result<DurationInsights> {
        info!(
            "Collecting {selector} durations for {}/{} (up to {} pages of {})",
            self.owner,
            self.repo,
            limits.max_pages(),
            limits.page_size
        );

        let progress = PhaseProgress::start_phase_1(limits.max_pages());
        let sets = collect_samples(&self.client, limits, selector).await?;
        let progress = progress.finish_phase_1_start_phase_2(sets.runs, sets.jobs);

        let insights = self.convert_to_insights(&sets, selector);
        progress.finish_phase_2();

        Ok(insights)
    }

    fn convert_to_insights(&self, sets: &SampleSets, selector: &StepSelector) -> DurationInsights {
        let buckets = OsBucket::ALL
            .into_iter()
            .map(|bucket| {
                let samples = sets.samples(bucket);
                BucketSummary {
                    label: bucket.label().to_string(),
                    marker: bucket.marker().to_string(),
                    samples: samples.len(),
                    statistics: Statistics::from_samples(samples),
                }
            })
            .collect();

        DurationInsights {
            provider: "GitHub Actions".to_string(),
            repository: format!("{}/{}", self.owner, self.repo),
            collected_at: Utc::now(),
            step: selector.to_string(),
            pages_fetched: sets.pages,
            total_runs: sets.runs,
            total_jobs: sets.jobs,
            excluded_jobs: sets.excluded_jobs,
            unrecognized_jobs: sets.unrecognized_jobs,
            negative_durations: sets.negative_durations,
            missing_jobs: sets.missing_jobs,
            buckets,
        }
    }
}

/// Splits `owner/repo`, rejecting anything else.
pub fn split_repo_path(repo_path: &str) -> Result<(&str, &str)> {
    match repo_path.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => Ok((*owner, *repo)),
        _ => Err(StepStatsError::Config(format!(
            "Repository path must be in format 'owner/repo', got '{repo_path}'"
        ))),
    }
}
