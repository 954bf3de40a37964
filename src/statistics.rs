use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Descriptive statistics for a set of duration samples, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl Statistics {
    /// Computes statistics over `samples`.
    ///
    /// Returns `None` for an empty sample set, since none of the values are
    /// defined there. The standard deviation is the Bessel-corrected sample
    /// standard deviation (divisor `n - 1`); a single sample has a standard
    /// deviation of zero.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| cmp_f64(*a, *b));

        let mean = mean(&sorted);

        Some(Self {
            mean,
            median: median_of_sorted(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            std_dev: sample_std_dev(&sorted, mean),
        })
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let len = sorted.len();
    if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    } else {
        sorted[len / 2]
    }
}

#[allow(clippy::cast_precision_loss)]
fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let sum_of_squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_of_squares / (values.len() - 1) as f64).sqrt()
}
