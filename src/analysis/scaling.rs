//! Dual-axis normalization
//!
//! Sensors with very different units share one y axis. The main-axis sensors
//! define a [`MainRange`]; auxiliary sensors are mean-centered and squeezed into
//! a band around its center, and AV overlays are mapped onto its extremes.

/// Value range of the main-axis sensors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MainRange {
    pub min: f64,
    pub max: f64,
}

impl MainRange {
    /// Min and max over all finite values, `None` if there are none
    pub fn from_series<'a, I>(series: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        let mut range: Option<Self> = None;
        for values in series {
            for &v in values.iter().filter(|v| v.is_finite()) {
                range = Some(match range {
                    None => Self { min: v, max: v },
                    Some(r) => Self {
                        min: r.min.min(v),
                        max: r.max.max(v),
                    },
                });
            }
        }
        range
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Largest deviation an aux series is scaled to
    pub fn quarter(&self) -> f64 {
        (self.max - self.min) / 8.0
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Mean of the finite values
pub fn nan_mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Rescale an auxiliary series onto the main range.
///
/// The series is centered on its mean and scaled so its largest absolute
/// deviation equals [`MainRange::quarter`], then shifted to the center. A
/// constant series sits flat on the center. NaN stays NaN.
pub fn normalize_aux(values: &[f64], range: &MainRange) -> Vec<f64> {
    let Some(mean) = nan_mean(values) else {
        return vec![f64::NAN; values.len()];
    };

    let max_dev = values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| (v - mean).abs())
        .fold(0.0, f64::max);

    let center = range.center();
    let quarter = range.quarter();

    values
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                f64::NAN
            } else if max_dev == 0.0 {
                center
            } else {
                center + (v - mean) * quarter / max_dev
            }
        })
        .collect()
}

/// Map AV levels {-1, 0, 1} onto the main range: min, center, max.
pub fn overlay_av(levels: &[i8], range: &MainRange) -> Vec<f64> {
    let center = range.center();
    let half = range.span() / 2.0;
    levels
        .iter()
        .map(|&level| center + f64::from(level) * half)
        .collect()
}
