use std::fmt;

use super::duration::step_duration;
use super::types::{GitHubJob, GitHubStep};
use crate::error::{Result, StepStatsError};

/// Jobs whose name contains this marker ran the older build variant and are
/// left out of the statistics.
pub const EXCLUDED_VARIANT_MARKER: &str = "build-v1";

/// Runner operating system a job's duration is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsBucket {
    MacOs,
    Windows,
    Ubuntu,
}

impl OsBucket {
    /// Buckets in report order.
    pub const ALL: [OsBucket; 3] = [OsBucket::MacOs, OsBucket::Windows, OsBucket::Ubuntu];

    /// Case-sensitive substring of the job name that selects this bucket.
    pub fn marker(self) -> &'static str {
        match self {
            OsBucket::MacOs => "macos-12",
            OsBucket::Windows => "windows-2022",
            OsBucket::Ubuntu => "ubuntu-22.04",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OsBucket::MacOs => "macOS",
            OsBucket::Windows => "Windows",
            OsBucket::Ubuntu => "Ubuntu",
        }
    }

    /// First bucket (in report order) whose marker appears in `job_name`.
    pub fn from_job_name(job_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|bucket| job_name.contains(bucket.marker()))
    }
}

impl fmt::Display for OsBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which step of a job is measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepSelector {
    /// Zero-based position in the job's step list.
    Position(usize),
    /// First step with exactly this name.
    Named(String),
}

impl Default for StepSelector {
    fn default() -> Self {
        StepSelector::Position(2)
    }
}

impl StepSelector {
    pub fn select<'a>(&self, steps: &'a [GitHubStep]) -> Option<&'a GitHubStep> {
        match self {
            StepSelector::Position(index) => steps.get(*index),
            StepSelector::Named(name) => steps.iter().find(|step| step.name == *name),
        }
    }
}

impl fmt::Display for StepSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepSelector::Position(index) => write!(f, "step #{}", index + 1),
            StepSelector::Named(name) => write!(f, "step named '{name}'"),
        }
    }
}

/// Outcome of routing one job.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Older build variant; nothing measured.
    Excluded,
    /// Measured step duration (seconds) and the bucket it belongs to.
    Bucket(OsBucket, f64),
    /// Measured, but the job name matches no known OS marker.
    Unrecognized(f64),
}

/// Classifies a job and measures its selected step.
///
/// Excluded jobs are rejected before any step is looked at. For every other
/// job the selected step must exist and carry valid timestamps; either
/// failure aborts the whole collection.
pub fn classify(job: &GitHubJob, selector: &StepSelector) -> Result<Classification> {
    if job.name.contains(EXCLUDED_VARIANT_MARKER) {
        return Ok(Classification::Excluded);
    }

    let step = selector
        .select(&job.steps)
        .ok_or_else(|| StepStatsError::StepNotFound {
            job: job.name.clone(),
            step: selector.to_string(),
        })?;

    let duration = step_duration(step)?;

    Ok(match OsBucket::from_job_name(&job.name) {
        Some(bucket) => Classification::Bucket(bucket, duration),
        None => Classification::Unrecognized(duration),
    })
}
