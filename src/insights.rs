use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::statistics::Statistics;

/// Step-duration report for one repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationInsights {
    pub provider: String,
    pub repository: String,
    pub collected_at: DateTime<Utc>,
    /// Which step of each job was measured (e.g. "step #3")
    pub step: String,
    pub pages_fetched: usize,
    pub total_runs: usize,
    pub total_jobs: usize,
    pub excluded_jobs: usize,
    pub unrecognized_jobs: usize,
    pub negative_durations: usize,
    /// Jobs reported by a run but absent from its job listing
    pub missing_jobs: usize,
    /// One entry per OS bucket, in report order
    pub buckets: Vec<BucketSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSummary {
    pub label: String,
    pub marker: String,
    pub samples: usize,
    /// `None` when the bucket collected no samples
    pub statistics: Option<Statistics>,
}
