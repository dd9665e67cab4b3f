// src/data_analysis/histogram.rs
//
// Bin counting and sample-percentile helpers shared by the histogram panels
// and the joint posterior plot. Only finite values are binned.

use crate::types::PlotError;

/// Binned counts over `edges` (length `counts.len() + 1`).
#[derive(Debug, Clone)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<f64>,
}

impl Histogram {
    /// Bin `data` into `bins` equal-width bins.
    ///
    /// `range` defaults to the finite data extent; a zero-width extent is
    /// padded so a single repeated value still produces a drawable bar.
    /// Values outside the range are left out; the upper edge is inclusive
    /// in the last bin.
    pub fn compute(
        data: &[f64],
        bins: usize,
        range: Option<(f64, f64)>,
    ) -> Result<Histogram, PlotError> {
        if bins == 0 {
            return Err(PlotError::Degenerate("histogram needs at least 1 bin".to_string()));
        }
        let finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Err(PlotError::Degenerate(
                "histogram input has no finite values".to_string(),
            ));
        }

        let (mut lo, mut hi) = match range {
            Some((lo, hi)) => (lo, hi),
            None => {
                let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (lo, hi)
            }
        };
        if hi < lo {
            std::mem::swap(&mut lo, &mut hi);
        }
        if hi - lo < 1e-12 {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0.0f64; bins];
        for &v in &finite {
            if v < lo || v > hi {
                continue;
            }
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1.0;
        }
        let edges = (0..=bins).map(|i| lo + i as f64 * width).collect();
        Ok(Histogram { edges, counts })
    }

    /// Reverse-cumulative, normalized view: each bin holds the fraction of
    /// the binned sample at or above the bin's left edge.
    pub fn reverse_cumulative_normalized(&self) -> Histogram {
        let total: f64 = self.counts.iter().sum();
        let mut acc = 0.0;
        let mut counts = vec![0.0f64; self.counts.len()];
        for i in (0..self.counts.len()).rev() {
            acc += self.counts[i];
            counts[i] = if total > 0.0 { acc / total } else { 0.0 };
        }
        Histogram {
            edges: self.edges.clone(),
            counts,
        }
    }

    pub fn max_count(&self) -> f64 {
        self.counts.iter().copied().fold(0.0, f64::max)
    }
}

/// Linearly interpolated percentile, `p` in [0, 100].
pub fn percentile(data: &[f64], p: f64) -> Result<f64, PlotError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(PlotError::Degenerate(format!(
            "percentile {p} outside [0, 100]"
        )));
    }
    let mut sorted: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Err(PlotError::Degenerate(
            "percentile of an empty sample".to_string(),
        ));
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn median(data: &[f64]) -> Result<f64, PlotError> {
    percentile(data, 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_land_in_expected_bins() {
        let data = [0.5, 1.5, 1.6, 3.9];
        let h = Histogram::compute(&data, 4, Some((0.0, 4.0))).unwrap();
        assert_eq!(h.counts, vec![1.0, 2.0, 0.0, 1.0]);
        assert_eq!(h.edges.len(), 5);
    }

    #[test]
    fn upper_edge_is_inclusive() {
        let data = [4.0];
        let h = Histogram::compute(&data, 4, Some((0.0, 4.0))).unwrap();
        assert_eq!(h.counts[3], 1.0);
    }

    #[test]
    fn degenerate_extent_is_padded() {
        let data = [2.0, 2.0, 2.0];
        let h = Histogram::compute(&data, 5, None).unwrap();
        assert_eq!(h.counts.iter().sum::<f64>() as usize, 3);
    }

    #[test]
    fn reverse_cumulative_fractions() {
        let data = [0.5, 1.5, 2.5, 3.5];
        let h = Histogram::compute(&data, 4, Some((0.0, 4.0))).unwrap();
        let c = h.reverse_cumulative_normalized();
        assert_eq!(c.counts, vec![1.0, 0.75, 0.5, 0.25]);
    }

    #[test]
    fn percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(median(&data).unwrap(), 3.0);
        assert!((percentile(&data, 25.0).unwrap() - 2.0).abs() < 1e-12);
        assert!((percentile(&data, 90.0).unwrap() - 4.6).abs() < 1e-12);
    }

    #[test]
    fn empty_sample_is_rejected() {
        assert!(Histogram::compute(&[], 10, None).is_err());
        assert!(median(&[f64::NAN]).is_err());
    }
}

// src/data_analysis/histogram.rs
