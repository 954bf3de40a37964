use indexmap::IndexMap;
use log::{debug, info, warn};

use super::classifier::{classify, Classification, OsBucket, StepSelector};
use super::types::{WorkflowJobsResponse, WorkflowRunsResponse};
use crate::error::Result;

/// The two listing endpoints the aggregation walks.
#[allow(async_fn_in_trait)]
pub trait WorkflowSource {
    /// One page (1-based) of the filtered workflow-run listing.
    async fn workflow_runs(&self, per_page: usize, page: usize) -> Result<WorkflowRunsResponse>;

    /// The jobs behind a run's `jobs_url`.
    async fn jobs(&self, jobs_url: &str) -> Result<WorkflowJobsResponse>;
}

/// Paging bounds for the run listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Runs requested per page
    pub page_size: usize,
    /// Upper bound on runs considered; caps the number of pages requested
    pub max_items: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_items: 1000,
        }
    }
}

impl PageLimits {
    pub fn max_pages(&self) -> usize {
        self.max_items.div_ceil(self.page_size.max(1))
    }
}

/// Duration samples per OS bucket plus bookkeeping about skipped jobs.
#[derive(Debug, Clone)]
pub struct SampleSets {
    samples: IndexMap<OsBucket, Vec<f64>>,
    pub pages: usize,
    pub runs: usize,
    pub jobs: usize,
    pub excluded_jobs: usize,
    pub unrecognized_jobs: usize,
    pub negative_durations: usize,
    /// Jobs a run reported in `total_count` but the listing never returned
    pub missing_jobs: usize,
}

impl Default for SampleSets {
    fn default() -> Self {
        Self {
            samples: OsBucket::ALL.into_iter().map(|b| (b, Vec::new())).collect(),
            pages: 0,
            runs: 0,
            jobs: 0,
            excluded_jobs: 0,
            unrecognized_jobs: 0,
            negative_durations: 0,
            missing_jobs: 0,
        }
    }
}

impl SampleSets {
    pub fn samples(&self, bucket: OsBucket) -> &[f64] {
        self.samples
            .get(&bucket)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Buckets and their samples in report order.
    pub fn iter(&self) -> impl Iterator<Item = (OsBucket, &[f64])> {
        self.samples.iter().map(|(b, s)| (*b, s.as_slice()))
    }

    pub fn total_samples(&self) -> usize {
        self.iter().map(|(_, samples)| samples.len()).sum()
    }

    /// Records one classified job.
    ///
    /// Negative durations are dropped so that every stored sample stays
    /// non-negative.
    pub fn record(&mut self, job_name: &str, classification: Classification) {
        self.jobs += 1;

        match classification {
            Classification::Excluded => {
                debug!("Skipping excluded job '{job_name}'");
                self.excluded_jobs += 1;
            }
            Classification::Bucket(bucket, seconds) if seconds < 0.0 => {
                warn!(
                    "Job '{job_name}' ({bucket}) has a negative step duration ({seconds}s); dropping it"
                );
                self.negative_durations += 1;
            }
            Classification::Bucket(bucket, seconds) => {
                debug!("Job '{job_name}' -> {bucket}: {seconds}s");
                self.samples.entry(bucket).or_default().push(seconds);
            }
            Classification::Unrecognized(_) => {
                let markers: Vec<&str> = OsBucket::ALL.iter().map(|b| b.marker()).collect();
                warn!(
                    "Job '{job_name}' matches none of the OS markers {{{}}}; dropping its duration",
                    markers.join(", ")
                );
                self.unrecognized_jobs += 1;
            }
        }
    }
}

/// Walks the run listing page by page and collects step durations.
///
/// Stops after `limits.max_pages()` pages, or earlier as soon as a page
/// reports a `total_count` of zero. Every job of every run is classified
/// with `selector`. The first fetch, decode, timestamp or missing-step error
/// aborts the walk and nothing collected so far is returned.
pub async fn collect_samples<S>(
    source: &S,
    limits: PageLimits,
    selector: &StepSelector,
) -> Result<SampleSets>
where
    S: WorkflowSource,
{
    let mut sets = SampleSets::default();
    let max_pages = limits.max_pages();

    for page in 1..=max_pages {
        let runs = source.workflow_runs(limits.page_size, page).await?;
        if runs.total_count == 0 {
            debug!("Page {page} reported no runs, stopping");
            break;
        }

        sets.pages += 1;
        debug!(
            "Page {page}/{max_pages}: {} runs (total {})",
            runs.workflow_runs.len(),
            runs.total_count
        );

        for run in &runs.workflow_runs {
            let response = source.jobs(&run.jobs_url).await?;
            sets.runs += 1;
            debug!("Run {}: {} jobs", run.id, response.jobs.len());

            let listed = response.jobs.len() as u64;
            if response.total_count > listed {
                let missing = response.total_count - listed;
                warn!(
                    "Run {} reported {} jobs but only {listed} were listed; {missing} left out",
                    run.id, response.total_count
                );
                sets.missing_jobs += missing as usize;
            }

            for job in &response.jobs {
                let classification = classify(job, selector)?;
                sets.record(&job.name, classification);
            }
        }
    }

    info!(
        "Collected {} samples from {} jobs in {} runs",
        sets.total_samples(),
        sets.jobs,
        sets.runs
    );

    Ok(sets)
}
