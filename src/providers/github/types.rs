use serde::{Deserialize, Serialize};

/// Response from the workflow-run listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunsResponse {
    /// Number of runs matching the query across all pages
    pub total_count: u64,
    /// Runs on the requested page
    #[serde(default)]
    pub workflow_runs: Vec<GitHubWorkflowRun>,
}

/// Response from a run's job listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowJobsResponse {
    pub total_count: u64,
    #[serde(default)]
    pub jobs: Vec<GitHubJob>,
}

/// GitHub Actions workflow run.
///
/// Only the fields needed to reach the run's jobs are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubWorkflowRun {
    /// Unique identifier for the workflow run
    pub id: u64,
    /// API URL listing the jobs of this run
    pub jobs_url: String,
}

/// Job within a GitHub Actions workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubJob {
    /// Unique identifier for the job
    pub id: u64,
    /// Name of the job, including any matrix suffix (e.g. "build (ubuntu-22.04)")
    pub name: String,
    /// Status of the job
    pub status: String,
    /// Conclusion of the job
    pub conclusion: Option<String>,
    /// When the job started
    pub started_at: Option<String>,
    /// When the job completed
    pub completed_at: Option<String>,
    /// Steps in this job, in execution order
    #[serde(default)]
    pub steps: Vec<GitHubStep>,
    /// Labels for the runner
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Step within a GitHub Actions job.
///
/// Timestamps are kept as the raw strings from the API and parsed when a
/// duration is needed, so a format change surfaces as a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubStep {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    #[serde(default)]
    pub number: u32,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}
