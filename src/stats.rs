//! Aggregation of per-iteration scores.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided 99.9% Student's t critical value; NaN for zero degrees of freedom.
fn t_critical(degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom == 0 {
        return f64::NAN;
    }
    StudentsT::new(0.0, 1.0, degrees_of_freedom as f64)
        .map(|t| t.inverse_cdf(0.9995))
        .unwrap_or(f64::NAN)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub samples: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    /// Half-width of the 99.9% confidence interval; NaN below two samples.
    pub error: f64,
}

impl Summary {
    /// Summarize `scores`; `None` when there is nothing to summarize.
    pub fn of(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let n = scores.len();
        let mean = scores.iter().sum::<f64>() / n as f64;
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let std_dev = if n < 2 {
            0.0
        } else {
            let variance =
                scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        };
        let error = if n < 2 {
            f64::NAN
        } else {
            t_critical(n - 1) * std_dev / (n as f64).sqrt()
        };

        Some(Self {
            samples: n,
            mean,
            min,
            max,
            std_dev,
            error,
        })
    }
}
