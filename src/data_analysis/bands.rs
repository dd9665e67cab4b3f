// src/data_analysis/bands.rs
//
// Confidence and prediction bands around a fitted model. The analytic
// variants propagate the parameter covariance through the model with a
// numerical gradient and scale by a Student-t quantile; the Monte-Carlo
// variant samples parameter space directly and is the more stable choice
// when the gradient is ill-conditioned.
//
// Convention note, deliberate and preserved from the originating analysis
// code: `confband_nl`/`predband_nl` take the confidence level as a
// probability mass in (0,1), while `confband_mc` takes a standard-deviation
// count. The two are NOT interchangeable.

use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::types::{Band, LinearFit, PlotError};

/// The linear model `f(p, x) = p[0] * x + p[1]` used throughout the
/// fit-and-band family.
pub fn linear_model(params: &[f64], x: f64) -> f64 {
    params[0] * x + params[1]
}

// Central-difference gradient of the model with respect to its parameters,
// evaluated at one abscissa.
fn param_gradient<F>(model: &F, params: &[f64], x: f64) -> Vec<f64>
where
    F: Fn(&[f64], f64) -> f64,
{
    let mut grad = Vec::with_capacity(params.len());
    let mut p = params.to_vec();
    for k in 0..params.len() {
        let h = (params[k].abs() * 1e-6).max(1e-8);
        p[k] = params[k] + h;
        let hi = model(&p, x);
        p[k] = params[k] - h;
        let lo = model(&p, x);
        p[k] = params[k];
        grad.push((hi - lo) / (2.0 * h));
    }
    grad
}

fn t_quantile(conf: f64, dof: f64) -> Result<f64, PlotError> {
    if !(0.0 < conf && conf < 1.0) {
        return Err(PlotError::Degenerate(format!(
            "confidence level {conf} must be a probability in (0,1)"
        )));
    }
    let alpha = 1.0 - conf;
    let t = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| PlotError::Degenerate(format!("Student-t with {dof} dof: {e}")))?;
    Ok(t.inverse_cdf(1.0 - alpha / 2.0))
}

fn check_band_inputs(
    xdata: &Array1<f64>,
    ydata: &Array1<f64>,
    npar: usize,
) -> Result<f64, PlotError> {
    if ydata.len() != xdata.len() {
        return Err(PlotError::LengthMismatch {
            what: "y values",
            expected: xdata.len(),
            got: ydata.len(),
        });
    }
    let dof = xdata.len() as f64 - npar as f64;
    if dof < 1.0 {
        return Err(PlotError::TooFewPoints {
            got: xdata.len(),
            need: npar + 1,
        });
    }
    Ok(dof)
}

/// Analytic confidence band around `model` fitted to `(xdata, ydata)`.
///
/// `params` is the fitted parameter vector and `covm` its covariance matrix
/// (`npar` x `npar`). The band half-width at each grid point is
/// `t(1-a/2, n-npar) * sqrt(g' C g)` with `g` the parameter gradient of the
/// model there. `conf` is a probability mass in (0,1), default 0.683 at the
/// call sites (1 sigma under normality).
pub fn confband_nl<F>(
    xdata: &Array1<f64>,
    ydata: &Array1<f64>,
    model: F,
    params: &[f64],
    covm: &Array2<f64>,
    conf: f64,
    grid: &Array1<f64>,
) -> Result<Band, PlotError>
where
    F: Fn(&[f64], f64) -> f64,
{
    let dof = check_band_inputs(xdata, ydata, params.len())?;
    let tval = t_quantile(conf, dof)?;

    let mut lower = Array1::zeros(grid.len());
    let mut upper = Array1::zeros(grid.len());
    for (j, &xg) in grid.iter().enumerate() {
        let yg = model(params, xg);
        let g = param_gradient(&model, params, xg);
        let mut varpred = 0.0;
        for (k, gk) in g.iter().enumerate() {
            for (l, gl) in g.iter().enumerate() {
                varpred += gk * gl * covm[[k, l]];
            }
        }
        let dy = tval * varpred.max(0.0).sqrt();
        lower[j] = yg - dy;
        upper[j] = yg + dy;
    }
    Ok(Band {
        x: grid.clone(),
        lower,
        upper,
    })
}

/// Analytic prediction band: like `confband_nl` but widened by the residual
/// scatter, so it brackets a future individual observation rather than the
/// fitted line.
pub fn predband_nl<F>(
    xdata: &Array1<f64>,
    ydata: &Array1<f64>,
    model: F,
    params: &[f64],
    covm: &Array2<f64>,
    conf: f64,
    grid: &Array1<f64>,
) -> Result<Band, PlotError>
where
    F: Fn(&[f64], f64) -> f64,
{
    let dof = check_band_inputs(xdata, ydata, params.len())?;
    let tval = t_quantile(conf, dof)?;

    // Residual variance of the sample about the fitted model.
    let ss: f64 = xdata
        .iter()
        .zip(ydata.iter())
        .map(|(&x, &y)| (y - model(params, x)).powi(2))
        .sum();
    let resid_var = ss / dof;

    let mut lower = Array1::zeros(grid.len());
    let mut upper = Array1::zeros(grid.len());
    for (j, &xg) in grid.iter().enumerate() {
        let yg = model(params, xg);
        let g = param_gradient(&model, params, xg);
        let mut varpred = 0.0;
        for (k, gk) in g.iter().enumerate() {
            for (l, gl) in g.iter().enumerate() {
                varpred += gk * gl * covm[[k, l]];
            }
        }
        let dy = tval * (varpred.max(0.0) + resid_var).sqrt();
        lower[j] = yg - dy;
        upper[j] = yg + dy;
    }
    Ok(Band {
        x: grid.clone(),
        lower,
        upper,
    })
}

/// Monte-Carlo confidence band for a fitted straight line.
///
/// Draws `nsamples` (slope, intercept) pairs from the bivariate normal
/// described by the fit's covariance and brackets the line at each grid
/// point with `mean +/- sigmas * std` of the sampled ordinates. `sigmas` is
/// a standard-deviation count, NOT a probability (contrast `confband_nl`).
pub fn confband_mc<R: Rng>(
    grid: &Array1<f64>,
    fit: &LinearFit,
    nsamples: usize,
    sigmas: f64,
    rng: &mut R,
) -> Result<Band, PlotError> {
    if nsamples < 2 {
        return Err(PlotError::Degenerate(
            "Monte-Carlo band needs at least 2 parameter samples".to_string(),
        ));
    }
    if sigmas <= 0.0 {
        return Err(PlotError::Degenerate(format!(
            "sigma count {sigmas} must be positive"
        )));
    }

    // Cholesky factor of the 2x2 parameter covariance.
    let va = fit.slope_err.powi(2);
    let vb = fit.intercept_err.powi(2);
    let (l11, l21) = if va > 0.0 {
        (va.sqrt(), fit.cov_ab / va.sqrt())
    } else {
        (0.0, 0.0)
    };
    let l22 = (vb - l21 * l21).max(0.0).sqrt();

    let m = grid.len();
    let mut sum = vec![0.0f64; m];
    let mut sumsq = vec![0.0f64; m];
    for _ in 0..nsamples {
        let z1: f64 = rng.sample(StandardNormal);
        let z2: f64 = rng.sample(StandardNormal);
        let slope = fit.slope + l11 * z1;
        let intercept = fit.intercept + l21 * z1 + l22 * z2;
        for (j, &xg) in grid.iter().enumerate() {
            let y = slope * xg + intercept;
            sum[j] += y;
            sumsq[j] += y * y;
        }
    }

    let nf = nsamples as f64;
    let mut lower = Array1::zeros(m);
    let mut upper = Array1::zeros(m);
    for j in 0..m {
        let mean = sum[j] / nf;
        let var = (sumsq[j] / nf - mean * mean).max(0.0);
        let dy = sigmas * var.sqrt();
        lower[j] = mean - dy;
        upper[j] = mean + dy;
    }
    Ok(Band {
        x: grid.clone(),
        lower,
        upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_fit() -> LinearFit {
        LinearFit {
            slope: 2.0,
            intercept: 0.0,
            slope_err: 0.1,
            intercept_err: 0.2,
            cov_ab: 0.0,
        }
    }

    #[test]
    fn analytic_band_brackets_the_line() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = array![2.1, 3.9, 6.2, 7.8, 10.1];
        let fit = sample_fit();
        let grid = Array1::linspace(1.0, 5.0, 50);
        let band = confband_nl(
            &x,
            &y,
            linear_model,
            &[fit.slope, fit.intercept],
            &fit.cov_matrix(),
            0.683,
            &grid,
        )
        .unwrap();
        for (j, &xg) in band.x.iter().enumerate() {
            let yline = fit.eval(xg);
            assert!(band.lower[j] <= yline && yline <= band.upper[j]);
        }
    }

    #[test]
    fn prediction_band_is_wider_than_confidence_band() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = array![2.1, 3.9, 6.2, 7.8, 10.1];
        let fit = sample_fit();
        let grid = Array1::linspace(1.0, 5.0, 20);
        let p = [fit.slope, fit.intercept];
        let c = fit.cov_matrix();
        let cb = confband_nl(&x, &y, linear_model, &p, &c, 0.68, &grid).unwrap();
        let pb = predband_nl(&x, &y, linear_model, &p, &c, 0.68, &grid).unwrap();
        for j in 0..grid.len() {
            assert!(pb.upper[j] - pb.lower[j] > cb.upper[j] - cb.lower[j]);
        }
    }

    #[test]
    fn mc_band_brackets_the_line() {
        let fit = sample_fit();
        let grid = Array1::linspace(0.0, 10.0, 30);
        let mut rng = StdRng::seed_from_u64(7);
        let band = confband_mc(&grid, &fit, 10_000, 1.0, &mut rng).unwrap();
        for (j, &xg) in band.x.iter().enumerate() {
            let yline = fit.eval(xg);
            // MC mean wobbles around the line; allow a small tolerance.
            assert!(band.lower[j] - 1e-2 <= yline && yline <= band.upper[j] + 1e-2);
        }
    }

    #[test]
    fn probability_and_sigma_conventions_diverge() {
        // Same numeric argument, different meanings: 0.954 as a probability
        // mass maps to ~2 sigma through the t quantile, while 0.954 as a
        // sigma count stays below 1 sigma. The analytic band must therefore
        // come out strictly wider.
        let x = Array1::linspace(0.0, 9.0, 60);
        let y: Array1<f64> = x.mapv(|v| 2.0 * v);
        let fit = sample_fit();
        let grid = Array1::linspace(1.0, 9.0, 10);
        let analytic = confband_nl(
            &x,
            &y,
            linear_model,
            &[fit.slope, fit.intercept],
            &fit.cov_matrix(),
            0.954,
            &grid,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mc = confband_mc(&grid, &fit, 10_000, 0.954, &mut rng).unwrap();
        for j in 0..grid.len() {
            let w_analytic = analytic.upper[j] - analytic.lower[j];
            let w_mc = mc.upper[j] - mc.lower[j];
            assert!(
                w_analytic > 1.5 * w_mc,
                "at x={}: analytic width {w_analytic} vs mc width {w_mc}",
                grid[j]
            );
        }
    }

    #[test]
    fn confidence_outside_unit_interval_is_rejected() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![1.0, 2.0, 3.0];
        let fit = sample_fit();
        let grid = Array1::linspace(1.0, 3.0, 5);
        let r = confband_nl(
            &x,
            &y,
            linear_model,
            &[fit.slope, fit.intercept],
            &fit.cov_matrix(),
            1.5,
            &grid,
        );
        assert!(r.is_err());
    }

    #[test]
    fn too_few_points_for_band_is_rejected() {
        // Two points fit a line but leave no residual degrees of freedom.
        let x = array![1.0, 2.0];
        let y = array![1.0, 2.0];
        let fit = sample_fit();
        let grid = Array1::linspace(1.0, 2.0, 5);
        let r = confband_nl(
            &x,
            &y,
            linear_model,
            &[fit.slope, fit.intercept],
            &fit.cov_matrix(),
            0.683,
            &grid,
        );
        assert!(matches!(r, Err(PlotError::TooFewPoints { .. })));
    }
}

// src/data_analysis/bands.rs
