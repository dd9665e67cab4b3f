// src/data_analysis/bces.rs
//
// BCES linear regression (Bivariate Correlated Errors and intrinsic Scatter,
// Akritas & Bershady 1996). Four slope estimators are computed side by side:
// OLS(Y|X), OLS(X|Y), their bisector, and the orthogonal fit. Parameter
// variances come from the influence-function expansion; `bcesp` wraps the
// estimator in a paired bootstrap.

use ndarray::Array1;
use rand::Rng;

use crate::types::{BcesMethod, LinearFit, PlotError};

/// Minimum sample size for a meaningful line fit.
pub const MIN_FIT_POINTS: usize = 2;

/// Results of a BCES regression for all four method variants, indexed by
/// `BcesMethod::index()`.
#[derive(Debug, Clone)]
pub struct BcesResult {
    pub slope: [f64; 4],
    pub intercept: [f64; 4],
    pub slope_err: [f64; 4],
    pub intercept_err: [f64; 4],
    pub cov_ab: [f64; 4],
}

impl BcesResult {
    /// Pull out the five scalar fit quantities for one method.
    pub fn select(&self, method: BcesMethod) -> LinearFit {
        let i = method.index();
        LinearFit {
            slope: self.slope[i],
            intercept: self.intercept[i],
            slope_err: self.slope_err[i],
            intercept_err: self.intercept_err[i],
            cov_ab: self.cov_ab[i],
        }
    }

    fn is_finite(&self) -> bool {
        self.slope.iter().all(|v| v.is_finite())
            && self.intercept.iter().all(|v| v.is_finite())
            && self.slope_err.iter().all(|v| v.is_finite())
            && self.intercept_err.iter().all(|v| v.is_finite())
            && self.cov_ab.iter().all(|v| v.is_finite())
    }
}

/// Check that the four measurement arrays (and the optional covariance
/// array) are paired element-wise and long enough to fit.
pub fn validate_samples(
    x: &Array1<f64>,
    xerr: &Array1<f64>,
    y: &Array1<f64>,
    yerr: &Array1<f64>,
    cerr: &Array1<f64>,
) -> Result<(), PlotError> {
    let n = x.len();
    for (what, len) in [
        ("y values", y.len()),
        ("x errors", xerr.len()),
        ("y errors", yerr.len()),
        ("xy error covariance", cerr.len()),
    ] {
        if len != n {
            return Err(PlotError::LengthMismatch {
                what,
                expected: n,
                got: len,
            });
        }
    }
    if n < MIN_FIT_POINTS {
        return Err(PlotError::TooFewPoints {
            got: n,
            need: MIN_FIT_POINTS,
        });
    }
    Ok(())
}

fn mean(v: &Array1<f64>) -> f64 {
    v.sum() / v.len() as f64
}

// Biased (1/n) variance and covariance, matching the estimator's moment
// definitions.
fn var(v: &Array1<f64>, v_av: f64) -> f64 {
    v.iter().map(|a| (a - v_av).powi(2)).sum::<f64>() / v.len() as f64
}

fn covar(u: &Array1<f64>, u_av: f64, v: &Array1<f64>, v_av: f64) -> f64 {
    u.iter()
        .zip(v.iter())
        .map(|(a, b)| (a - u_av) * (b - v_av))
        .sum::<f64>()
        / u.len() as f64
}

/// Single-pass BCES estimate on the given sample.
///
/// `xerr`/`yerr` are per-point standard deviations; `cerr` is the per-point
/// covariance between the two error sources (zeros when independent).
/// Degenerate samples (no X spread beyond the measurement errors, or a
/// vanishing error-corrected covariance) are rejected rather than returning
/// NaN quietly.
pub fn bces(
    x: &Array1<f64>,
    xerr: &Array1<f64>,
    y: &Array1<f64>,
    yerr: &Array1<f64>,
    cerr: &Array1<f64>,
) -> Result<BcesResult, PlotError> {
    validate_samples(x, xerr, y, yerr, cerr)?;
    let n = x.len() as f64;

    // Error moments.
    let sig11 = xerr.iter().map(|e| e * e).sum::<f64>() / n;
    let sig22 = yerr.iter().map(|e| e * e).sum::<f64>() / n;
    let sig12 = cerr.sum() / n;

    // Sample moments.
    let x_av = mean(x);
    let y_av = mean(y);
    let x_var = var(x, x_av);
    let y_var = var(y, y_av);
    let cov_xy = covar(x, x_av, y, y_av);

    let denom_yx = x_var - sig11;
    let denom_xy = cov_xy - sig12;

    // The four slopes.
    let mut b = [0.0f64; 4];
    b[0] = denom_xy / denom_yx;
    b[1] = (y_var - sig22) / denom_xy;
    b[2] = (b[0] * b[1] - 1.0 + ((1.0 + b[0] * b[0]) * (1.0 + b[1] * b[1])).sqrt())
        / (b[0] + b[1]);
    let sign = if cov_xy < 0.0 { -1.0 } else { 1.0 };
    b[3] = 0.5 * ((b[1] - 1.0 / b[0]) + sign * (4.0 + (b[1] - 1.0 / b[0]).powi(2)).sqrt());

    let mut a = [0.0f64; 4];
    for i in 0..4 {
        a[i] = y_av - b[i] * x_av;
    }

    // Influence functions xi for each slope estimator, and zeta for the
    // intercepts; their sample variances give the parameter variances.
    let npts = x.len();
    let mut xi: [Array1<f64>; 4] = [
        Array1::zeros(npts),
        Array1::zeros(npts),
        Array1::zeros(npts),
        Array1::zeros(npts),
    ];
    for j in 0..npts {
        let resid0 = y[j] - b[0] * x[j] - a[0];
        let resid1 = y[j] - b[1] * x[j] - a[1];
        xi[0][j] = ((x[j] - x_av) * resid0 + b[0] * xerr[j] * xerr[j] - cerr[j]) / denom_yx;
        xi[1][j] = ((y[j] - y_av) * resid1 - (yerr[j] * yerr[j] - b[1] * cerr[j])) / denom_xy;
    }
    let bis_norm = (b[0] + b[1]) * ((1.0 + b[0] * b[0]) * (1.0 + b[1] * b[1])).sqrt();
    let ort_norm = (4.0 + (b[1] - 1.0 / b[0]).powi(2)).sqrt();
    for j in 0..npts {
        xi[2][j] = xi[0][j] * (1.0 + b[1] * b[1]) * b[2] / bis_norm
            + xi[1][j] * (1.0 + b[0] * b[0]) * b[2] / bis_norm;
        xi[3][j] = xi[0][j] * b[3] / (b[0] * b[0] * ort_norm) + xi[1][j] * b[3] / ort_norm;
    }

    let mut slope_err = [0.0f64; 4];
    let mut intercept_err = [0.0f64; 4];
    let mut cov_ab = [0.0f64; 4];
    for i in 0..4 {
        let zeta: Array1<f64> = Array1::from_iter(
            (0..npts).map(|j| y[j] - b[i] * x[j] - x_av * xi[i][j]),
        );
        let xi_av = mean(&xi[i]);
        let zeta_av = mean(&zeta);
        slope_err[i] = (var(&xi[i], xi_av) / n).sqrt();
        intercept_err[i] = (var(&zeta, zeta_av) / n).sqrt();
        cov_ab[i] = covar(&xi[i], xi_av, &zeta, zeta_av) / n;
    }

    let result = BcesResult {
        slope: b,
        intercept: a,
        slope_err,
        intercept_err,
        cov_ab,
    };
    if !result.is_finite() {
        return Err(PlotError::Degenerate(
            "BCES estimate is not finite (no X spread beyond the measurement errors?)"
                .to_string(),
        ));
    }
    Ok(result)
}

/// Paired-bootstrap BCES fit.
///
/// Resamples the points (with their errors) `nboot` times with replacement,
/// runs the estimator on each replicate and reports the replicate mean as
/// the fit, the replicate scatter as the parameter errors and the replicate
/// slope/intercept covariance as `cov_ab`. Degenerate replicates (e.g. a
/// resample that drew a single point n times) are skipped.
pub fn bcesp<R: Rng>(
    x: &Array1<f64>,
    xerr: &Array1<f64>,
    y: &Array1<f64>,
    yerr: &Array1<f64>,
    cerr: &Array1<f64>,
    nboot: usize,
    rng: &mut R,
) -> Result<BcesResult, PlotError> {
    validate_samples(x, xerr, y, yerr, cerr)?;
    if nboot == 0 {
        return Err(PlotError::Degenerate(
            "bootstrap resample count must be positive".to_string(),
        ));
    }
    let n = x.len();

    let mut slopes: Vec<[f64; 4]> = Vec::with_capacity(nboot);
    let mut intercepts: Vec<[f64; 4]> = Vec::with_capacity(nboot);
    for _ in 0..nboot {
        let idx: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
        let rx = Array1::from_iter(idx.iter().map(|&j| x[j]));
        let rxe = Array1::from_iter(idx.iter().map(|&j| xerr[j]));
        let ry = Array1::from_iter(idx.iter().map(|&j| y[j]));
        let rye = Array1::from_iter(idx.iter().map(|&j| yerr[j]));
        let rce = Array1::from_iter(idx.iter().map(|&j| cerr[j]));
        match bces(&rx, &rxe, &ry, &rye, &rce) {
            Ok(est) => {
                slopes.push(est.slope);
                intercepts.push(est.intercept);
            }
            Err(_) => continue,
        }
    }

    let kept = slopes.len();
    if kept < 2 {
        return Err(PlotError::Degenerate(format!(
            "only {kept} of {nboot} bootstrap replicates produced a finite fit"
        )));
    }
    if kept < nboot {
        eprintln!(
            "Warning: skipped {} of {} degenerate bootstrap replicates",
            nboot - kept,
            nboot
        );
    }
    let kf = kept as f64;

    let mut result = BcesResult {
        slope: [0.0; 4],
        intercept: [0.0; 4],
        slope_err: [0.0; 4],
        intercept_err: [0.0; 4],
        cov_ab: [0.0; 4],
    };
    for i in 0..4 {
        let b_av = slopes.iter().map(|s| s[i]).sum::<f64>() / kf;
        let a_av = intercepts.iter().map(|s| s[i]).sum::<f64>() / kf;
        let b_var = slopes.iter().map(|s| (s[i] - b_av).powi(2)).sum::<f64>() / kf;
        let a_var = intercepts
            .iter()
            .map(|s| (s[i] - a_av).powi(2))
            .sum::<f64>()
            / kf;
        let ab_cov = slopes
            .iter()
            .zip(intercepts.iter())
            .map(|(s, t)| (s[i] - b_av) * (t[i] - a_av))
            .sum::<f64>()
            / kf;
        result.slope[i] = b_av;
        result.intercept[i] = a_av;
        result.slope_err[i] = b_var.sqrt();
        result.intercept_err[i] = a_var.sqrt();
        result.cov_ab[i] = ab_cov;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn zero_errs(n: usize) -> Array1<f64> {
        Array1::zeros(n)
    }

    #[test]
    fn perfect_line_recovers_slope_for_all_methods() {
        let x = array![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = array![1.0, 3.0, 5.0, 7.0, 9.0];
        let z = zero_errs(5);
        let est = bces(&x, &z, &y, &z, &z).unwrap();
        for i in 0..4 {
            assert!(
                (est.slope[i] - 2.0).abs() < 1e-9,
                "method {i}: slope {}",
                est.slope[i]
            );
            assert!((est.intercept[i] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn bootstrap_fit_matches_known_slope() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = array![2.1, 3.9, 6.2, 7.8, 10.1];
        let z = zero_errs(5);
        let mut rng = StdRng::seed_from_u64(42);
        let est = bcesp(&x, &z, &y, &z, &z, 1000, &mut rng).unwrap();
        let fit = est.select(BcesMethod::Orthogonal);
        assert!((fit.slope - 2.0).abs() < 0.15, "slope {}", fit.slope);
        assert!(fit.intercept.abs() < 0.5, "intercept {}", fit.intercept);
    }

    #[test]
    fn two_points_still_fit() {
        let x = array![0.0, 1.0];
        let y = array![0.5, 2.5];
        let z = zero_errs(2);
        let est = bces(&x, &z, &y, &z, &z).unwrap();
        assert!((est.slope[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn one_point_is_rejected() {
        let x = array![1.0];
        let y = array![2.0];
        let z = zero_errs(1);
        let err = bces(&x, &z, &y, &z, &z).unwrap_err();
        assert!(matches!(err, PlotError::TooFewPoints { got: 1, need: 2 }));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![1.0, 2.0];
        let z3 = zero_errs(3);
        let err = bces(&x, &z3, &y, &z3, &z3).unwrap_err();
        assert!(matches!(err, PlotError::LengthMismatch { .. }));
    }

    #[test]
    fn constant_x_is_degenerate() {
        let x = array![2.0, 2.0, 2.0, 2.0];
        let y = array![1.0, 2.0, 3.0, 4.0];
        let z = zero_errs(4);
        assert!(bces(&x, &z, &y, &z, &z).is_err());
    }
}

// src/data_analysis/bces.rs
