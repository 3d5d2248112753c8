use crate::error::SimError;

/// Histogram-derived view of a terminal-price ensemble, shaped for the two
/// curves a chart consumer draws: smoothed density and cumulative
/// distribution, both against bin midpoints.
#[derive(Clone, Debug)]
pub struct DistributionSummary {
    /// `bin_count + 1` ascending edges spanning `[min, max]` of the ensemble.
    pub bin_edges: Vec<f64>,
    /// Smoothed per-bin probability mass, `bin_count` long, non-negative.
    pub density: Vec<f64>,
    /// Running sum of the unsmoothed density; non-decreasing, ends at ~1.0.
    pub cumulative: Vec<f64>,
}

impl DistributionSummary {
    /// Bin centers, the x-axis for both curves.
    pub fn midpoints(&self) -> Vec<f64> {
        self.bin_edges
            .windows(2)
            .map(|e| 0.5 * (e[0] + e[1]))
            .collect()
    }

    /// Midpoint of the first bin whose cumulative probability reaches `q`.
    pub fn quantile(&self, q: f64) -> Option<f64> {
        let idx = self.cumulative.iter().position(|&c| c >= q)?;
        Some(self.midpoints()[idx])
    }
}

fn histogram_density(ensemble: &[f64], bin_count: usize, lo: f64, hi: f64) -> (Vec<f64>, Vec<f64>) {
    let width = (hi - lo) / bin_count as f64;
    let mut counts = vec![0u64; bin_count];
    for &price in ensemble {
        // The maximum lands exactly on the last edge; fold it into the last
        // bin so every sample is counted.
        let idx = (((price - lo) / width) as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    let edges = (0..=bin_count).map(|i| lo + i as f64 * width).collect();
    let total = ensemble.len() as f64;
    let density = counts.iter().map(|&c| c as f64 / total).collect();
    (edges, density)
}

/// Centered moving average with output length equal to input length. Boundary
/// bins average over the in-range overlap only, so edge mass is not diluted
/// by zero padding.
fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.is_empty() {
        return values.to_vec();
    }
    let n = values.len();
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(window / 2);
            let hi = (i + (window - 1) / 2).min(n - 1);
            let span = &values[lo..=hi];
            span.iter().sum::<f64>() / span.len() as f64
        })
        .collect()
}

/// Bins a terminal-price ensemble into `bin_count` equal-width bins and
/// derives the smoothed density and cumulative distribution.
///
/// The cumulative distribution is the running sum of the raw (unsmoothed)
/// density, so it always reaches 1.0 at the last bin regardless of the
/// smoothing applied to the displayed density. An ensemble with fewer than
/// two distinct values has zero bin width and is rejected as degenerate.
pub fn summarize(
    ensemble: &[f64],
    bin_count: usize,
    smoothing_window: usize,
) -> Result<DistributionSummary, SimError> {
    assert!(bin_count > 0, "bin_count must be positive");

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &price in ensemble {
        lo = lo.min(price);
        hi = hi.max(price);
    }
    if ensemble.len() < 2 || !(hi > lo) {
        return Err(SimError::NumericDegeneracy);
    }

    let (bin_edges, raw_density) = histogram_density(ensemble, bin_count, lo, hi);

    let mut cumulative = Vec::with_capacity(raw_density.len());
    let mut acc = 0.0;
    for &mass in &raw_density {
        acc += mass;
        cumulative.push(acc);
    }

    Ok(DistributionSummary {
        bin_edges,
        density: moving_average(&raw_density, smoothing_window),
        cumulative,
    })
}
