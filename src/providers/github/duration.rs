use chrono::{DateTime, FixedOffset};

use super::types::GitHubStep;
use crate::error::{Result, StepStatsError};

/// Elapsed seconds between two RFC 3339 timestamps.
///
/// `completed_at` is expected to be after `started_at`, but this is not
/// checked: a negative value is returned as is and left to the caller.
#[allow(clippy::cast_precision_loss)]
pub fn elapsed_seconds(started_at: &str, completed_at: &str) -> Result<f64> {
    let start = parse_timestamp(started_at)?;
    let end = parse_timestamp(completed_at)?;

    Ok((end - start).num_milliseconds() as f64 / 1000.0)
}

/// Duration of a finished step in seconds.
pub fn step_duration(step: &GitHubStep) -> Result<f64> {
    let started_at = step
        .started_at
        .as_deref()
        .ok_or_else(|| StepStatsError::MissingTimestamp {
            step: step.name.clone(),
            field: "started_at",
        })?;
    let completed_at = step
        .completed_at
        .as_deref()
        .ok_or_else(|| StepStatsError::MissingTimestamp {
            step: step.name.clone(),
            field: "completed_at",
        })?;

    elapsed_seconds(started_at, completed_at)
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|source| StepStatsError::TimestampParse {
        value: value.to_string(),
        source,
    })
}
