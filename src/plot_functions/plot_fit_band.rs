// src/plot_functions/plot_fit_band.rs
//
// Best-fit-line overlays: BCES regression plus confidence and/or prediction
// bands drawn onto a caller-prepared chart. All validation and band
// computation happens before the first artist is added, so a bad input
// never leaves a half-drawn figure.

use std::error::Error;

use ndarray::Array1;
use ndarray_stats::QuantileExt;
use plotters::style::RGBColor;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{
    COLOR_CONF_BAND, COLOR_FIT_LINE, COLOR_PRED_BAND, DEFAULT_CONF_LEVEL, DEFAULT_CONF_SIGMAS,
    DEFAULT_GRID_POINTS, DEFAULT_NBOOT, LINE_WIDTH_PLOT, MC_BAND_SAMPLES,
};
use crate::data_analysis::bands::{confband_mc, confband_nl, linear_model, predband_nl};
use crate::data_analysis::bces::{bcesp, validate_samples};
use crate::plot_framework::{draw_band, draw_polyline, Chart2d};
use crate::types::{BcesMethod, LinearFit, PlotError};

/// Paired measurements with per-point uncertainties for a BCES fit.
///
/// `cerr` is the per-point covariance between the X and Y errors; `None`
/// means independent errors.
#[derive(Debug, Clone)]
pub struct FitData {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub xerr: Array1<f64>,
    pub yerr: Array1<f64>,
    pub cerr: Option<Array1<f64>>,
}

impl FitData {
    /// Samples with independent errors.
    pub fn new(x: Array1<f64>, y: Array1<f64>, xerr: Array1<f64>, yerr: Array1<f64>) -> Self {
        FitData {
            x,
            y,
            xerr,
            yerr,
            cerr: None,
        }
    }

    fn cerr_or_zeros(&self) -> Array1<f64> {
        match &self.cerr {
            Some(c) => c.clone(),
            None => Array1::zeros(self.x.len()),
        }
    }

    pub fn validate(&self) -> Result<(), PlotError> {
        validate_samples(&self.x, &self.xerr, &self.y, &self.yerr, &self.cerr_or_zeros())
    }
}

/// Options for the fit-and-band family.
///
/// `conf` follows the convention of the function it is passed to: the
/// analytic-band functions (`fit_conf`, `fit_conf_pred`, `fit_pred`,
/// `plot_linfit`, `fit_points`) read it as a probability mass in (0,1),
/// while `fit_conf_mc` reads it as a standard-deviation count. The two
/// meanings are inherited from the originating analysis conventions and are
/// deliberately not unified; use `FitOptions::for_mc()` for the MC default.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Bootstrap resamples for the BCES fit.
    pub nboot: usize,
    /// Which regression variant to report and draw.
    pub method: BcesMethod,
    /// Confidence level (probability) or sigma count, per the note above.
    pub conf: f64,
    pub line_color: RGBColor,
    pub band_color: RGBColor,
    /// Prediction-band color, used by `fit_conf_pred` and `fit_pred`.
    pub pred_color: RGBColor,
    pub stroke_width: u32,
    /// Explicit evaluation grid; defaults to 100 evenly spaced points over
    /// the observed X range.
    pub grid: Option<Array1<f64>>,
    /// Draw the band in front of the line (and of anything drawn later in
    /// the same pass) instead of behind it.
    pub front: bool,
    /// Seed for the bootstrap/MC sampling; `None` uses OS entropy.
    pub seed: Option<u64>,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            nboot: DEFAULT_NBOOT,
            method: BcesMethod::Orthogonal,
            conf: DEFAULT_CONF_LEVEL,
            line_color: *COLOR_FIT_LINE,
            band_color: *COLOR_CONF_BAND,
            pred_color: *COLOR_PRED_BAND,
            stroke_width: LINE_WIDTH_PLOT,
            grid: None,
            front: false,
            seed: None,
        }
    }
}

impl FitOptions {
    /// Defaults for `fit_conf_mc`, where `conf` counts standard deviations.
    pub fn for_mc() -> Self {
        FitOptions {
            conf: DEFAULT_CONF_SIGMAS,
            ..FitOptions::default()
        }
    }
}

/// Evaluation grid, best-fit ordinates, and confidence-band bounds from
/// `fit_points`, for composition into a larger custom figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FitBandPoints {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

fn run_bces(data: &FitData, opts: &FitOptions, rng: &mut StdRng) -> Result<LinearFit, PlotError> {
    let cerr = data.cerr_or_zeros();
    let est = bcesp(
        &data.x,
        &data.xerr,
        &data.y,
        &data.yerr,
        &cerr,
        opts.nboot,
        rng,
    )?;
    Ok(est.select(opts.method))
}

// 100 evenly spaced points across the observed X range, unless the caller
// supplied an explicit grid.
fn eval_grid(x: &Array1<f64>, opts: &FitOptions) -> Result<Array1<f64>, PlotError> {
    if let Some(grid) = &opts.grid {
        return Ok(grid.clone());
    }
    let lo = *x
        .min()
        .map_err(|e| PlotError::Degenerate(format!("X range: {e}")))?;
    let hi = *x
        .max()
        .map_err(|e| PlotError::Degenerate(format!("X range: {e}")))?;
    Ok(Array1::linspace(lo, hi, DEFAULT_GRID_POINTS))
}

fn draw_fit_line(
    chart: &mut Chart2d,
    grid: &Array1<f64>,
    fit: &LinearFit,
    opts: &FitOptions,
) -> Result<(), Box<dyn Error>> {
    let xs: Vec<f64> = grid.to_vec();
    let y: Vec<f64> = grid.iter().map(|&x| fit.eval(x)).collect();
    draw_polyline(chart, &xs, &y, opts.line_color, opts.stroke_width)
}

/// BCES fit plus best-fit line and analytic confidence band.
///
/// Returns the five scalar fit quantities for the selected method; as a side
/// effect adds one line artist and one filled-band artist to `chart`.
/// `opts.conf` is a probability mass (default 0.683, 1 sigma).
pub fn fit_conf(
    chart: &mut Chart2d,
    data: &FitData,
    opts: &FitOptions,
) -> Result<LinearFit, Box<dyn Error>> {
    data.validate()?;
    let mut rng = make_rng(opts.seed);
    let fit = run_bces(data, opts, &mut rng)?;
    let grid = eval_grid(&data.x, opts)?;
    let band = confband_nl(
        &data.x,
        &data.y,
        linear_model,
        &[fit.slope, fit.intercept],
        &fit.cov_matrix(),
        opts.conf,
        &grid,
    )?;

    if opts.front {
        draw_fit_line(chart, &grid, &fit, opts)?;
        draw_band(chart, &band, opts.band_color)?;
    } else {
        draw_band(chart, &band, opts.band_color)?;
        draw_fit_line(chart, &grid, &fit, opts)?;
    }
    Ok(fit)
}

/// BCES fit plus best-fit line and Monte-Carlo confidence band.
///
/// More stable than `fit_conf` when the analytic gradient propagation is
/// ill-conditioned. `opts.conf` here is a standard-deviation count (default
/// 1.0), NOT a probability; see `FitOptions::for_mc`.
pub fn fit_conf_mc(
    chart: &mut Chart2d,
    data: &FitData,
    opts: &FitOptions,
) -> Result<LinearFit, Box<dyn Error>> {
    data.validate()?;
    let mut rng = make_rng(opts.seed);
    let fit = run_bces(data, opts, &mut rng)?;
    let grid = eval_grid(&data.x, opts)?;
    let band = confband_mc(&grid, &fit, MC_BAND_SAMPLES, opts.conf, &mut rng)?;

    if opts.front {
        draw_fit_line(chart, &grid, &fit, opts)?;
        draw_band(chart, &band, opts.band_color)?;
    } else {
        draw_band(chart, &band, opts.band_color)?;
        draw_fit_line(chart, &grid, &fit, opts)?;
    }
    Ok(fit)
}

/// BCES fit plus best-fit line, prediction band (wider) and confidence band
/// (narrower). `opts.conf` is a probability mass.
pub fn fit_conf_pred(
    chart: &mut Chart2d,
    data: &FitData,
    opts: &FitOptions,
) -> Result<LinearFit, Box<dyn Error>> {
    data.validate()?;
    let mut rng = make_rng(opts.seed);
    let fit = run_bces(data, opts, &mut rng)?;
    let grid = eval_grid(&data.x, opts)?;
    let params = [fit.slope, fit.intercept];
    let covm = fit.cov_matrix();
    let pred = predband_nl(&data.x, &data.y, linear_model, &params, &covm, opts.conf, &grid)?;
    let conf = confband_nl(&data.x, &data.y, linear_model, &params, &covm, opts.conf, &grid)?;

    // Prediction band first so the narrower confidence band stays visible.
    if opts.front {
        draw_fit_line(chart, &grid, &fit, opts)?;
        draw_band(chart, &pred, opts.pred_color)?;
        draw_band(chart, &conf, opts.band_color)?;
    } else {
        draw_band(chart, &pred, opts.pred_color)?;
        draw_band(chart, &conf, opts.band_color)?;
        draw_fit_line(chart, &grid, &fit, opts)?;
    }
    Ok(fit)
}

/// BCES fit plus best-fit line and prediction band only.
pub fn fit_pred(
    chart: &mut Chart2d,
    data: &FitData,
    opts: &FitOptions,
) -> Result<LinearFit, Box<dyn Error>> {
    data.validate()?;
    let mut rng = make_rng(opts.seed);
    let fit = run_bces(data, opts, &mut rng)?;
    let grid = eval_grid(&data.x, opts)?;
    let band = predband_nl(
        &data.x,
        &data.y,
        linear_model,
        &[fit.slope, fit.intercept],
        &fit.cov_matrix(),
        opts.conf,
        &grid,
    )?;

    if opts.front {
        draw_fit_line(chart, &grid, &fit, opts)?;
        draw_band(chart, &band, opts.pred_color)?;
    } else {
        draw_band(chart, &band, opts.pred_color)?;
        draw_fit_line(chart, &grid, &fit, opts)?;
    }
    Ok(fit)
}

/// Draw the line and confidence band for an externally obtained fit (e.g. a
/// Bayesian regression), skipping the BCES step. `x`/`y` are the samples
/// the fit came from; they anchor the band's degrees of freedom and the
/// default grid. `opts.conf` is a probability mass; `opts.nboot`,
/// `opts.method` and `opts.seed` are unused here.
pub fn plot_linfit(
    chart: &mut Chart2d,
    x: &Array1<f64>,
    y: &Array1<f64>,
    fit: &LinearFit,
    opts: &FitOptions,
) -> Result<(), Box<dyn Error>> {
    if y.len() != x.len() {
        return Err(PlotError::LengthMismatch {
            what: "y values",
            expected: x.len(),
            got: y.len(),
        }
        .into());
    }
    let grid = eval_grid(x, opts)?;
    let band = confband_nl(
        x,
        y,
        linear_model,
        &[fit.slope, fit.intercept],
        &fit.cov_matrix(),
        opts.conf,
        &grid,
    )?;

    if opts.front {
        draw_fit_line(chart, &grid, fit, opts)?;
        draw_band(chart, &band, opts.band_color)?;
    } else {
        draw_band(chart, &band, opts.band_color)?;
        draw_fit_line(chart, &grid, fit, opts)?;
    }
    Ok(())
}

/// Non-drawing variant: BCES fit plus analytic confidence band, returned as
/// plain sequences (grid, fitted ordinates, lower bound, upper bound) for
/// composition into a larger custom figure.
pub fn fit_points(data: &FitData, opts: &FitOptions) -> Result<FitBandPoints, PlotError> {
    data.validate()?;
    let mut rng = make_rng(opts.seed);
    let fit = run_bces(data, opts, &mut rng)?;
    let grid = eval_grid(&data.x, opts)?;
    let band = confband_nl(
        &data.x,
        &data.y,
        linear_model,
        &[fit.slope, fit.intercept],
        &fit.cov_matrix(),
        opts.conf,
        &grid,
    )?;
    let y = grid.mapv(|x| fit.eval(x));
    Ok(FitBandPoints {
        x: grid,
        y,
        lower: band.lower,
        upper: band.upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_data() -> FitData {
        FitData::new(
            array![1.0, 2.0, 3.0, 4.0, 5.0],
            array![2.1, 3.9, 6.2, 7.8, 10.1],
            Array1::zeros(5),
            Array1::zeros(5),
        )
    }

    fn seeded_opts() -> FitOptions {
        FitOptions {
            seed: Some(1234),
            ..FitOptions::default()
        }
    }

    #[test]
    fn fit_points_brackets_the_line() {
        let pts = fit_points(&sample_data(), &seeded_opts()).unwrap();
        assert_eq!(pts.x.len(), DEFAULT_GRID_POINTS);
        for j in 0..pts.x.len() {
            assert!(pts.lower[j] <= pts.y[j] && pts.y[j] <= pts.upper[j]);
        }
    }

    #[test]
    fn fit_points_is_deterministic_under_a_seed() {
        let a = fit_points(&sample_data(), &seeded_opts()).unwrap();
        let b = fit_points(&sample_data(), &seeded_opts()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn explicit_grid_is_echoed_back() {
        let grid = Array1::linspace(0.0, 10.0, 25);
        let opts = FitOptions {
            grid: Some(grid.clone()),
            ..seeded_opts()
        };
        let pts = fit_points(&sample_data(), &opts).unwrap();
        assert_eq!(pts.x, grid);
    }

    #[test]
    fn recovered_slope_is_close_to_two() {
        let pts = fit_points(&sample_data(), &seeded_opts()).unwrap();
        // Slope from the returned line points.
        let n = pts.x.len();
        let slope = (pts.y[n - 1] - pts.y[0]) / (pts.x[n - 1] - pts.x[0]);
        assert!((slope - 2.0).abs() < 0.15, "slope {slope}");
        let intercept = pts.y[0] - slope * pts.x[0];
        assert!(intercept.abs() < 0.5, "intercept {intercept}");
    }

    #[test]
    fn mismatched_inputs_fail_before_fitting() {
        let data = FitData::new(
            array![1.0, 2.0, 3.0],
            array![1.0, 2.0],
            Array1::zeros(3),
            Array1::zeros(3),
        );
        assert!(matches!(
            fit_points(&data, &seeded_opts()),
            Err(PlotError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn single_point_fails() {
        let data = FitData::new(
            array![1.0],
            array![2.0],
            Array1::zeros(1),
            Array1::zeros(1),
        );
        assert!(matches!(
            fit_points(&data, &seeded_opts()),
            Err(PlotError::TooFewPoints { .. })
        ));
    }

    #[test]
    fn mc_defaults_use_sigma_convention() {
        let opts = FitOptions::for_mc();
        assert_eq!(opts.conf, DEFAULT_CONF_SIGMAS);
        assert_eq!(FitOptions::default().conf, DEFAULT_CONF_LEVEL);
    }
}

// src/plot_functions/plot_fit_band.rs
