//! Statistics for a sensor over the current window
//!
//! Provides min/max, mean, standard deviation, and RMS over the finite values
//! of a series. NaN cells are skipped.

/// Statistics for one series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesStatistics {
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Mean value
    pub mean: f64,
    /// Standard deviation (population)
    pub std_dev: f64,
    /// Root mean square
    pub rms: f64,
    /// Number of finite samples
    pub count: usize,
    /// Number of samples that were NaN or infinite
    pub missing: usize,
}

impl SeriesStatistics {
    /// Calculate statistics from a slice of values
    pub fn from_values(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let missing = values.len() - finite.len();

        if finite.is_empty() {
            return Self {
                missing,
                ..Default::default()
            };
        }

        let count = finite.len();

        let min = finite.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let sum: f64 = finite.iter().sum();
        let mean = sum / count as f64;

        let variance: f64 = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        let std_dev = variance.sqrt();

        // RMS: sqrt(mean of squares)
        let sum_of_squares: f64 = finite.iter().map(|v| v * v).sum();
        let rms = (sum_of_squares / count as f64).sqrt();

        Self {
            min,
            max,
            mean,
            std_dev,
            rms,
            count,
            missing,
        }
    }

    /// Get the peak-to-peak range
    pub fn peak_to_peak(&self) -> f64 {
        self.max - self.min
    }

    /// Check if this is a valid (non-empty) statistics
    pub fn is_valid(&self) -> bool {
        self.count > 0
    }
}
