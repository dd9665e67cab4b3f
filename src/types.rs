// src/types.rs

use ndarray::{array, Array1, Array2};
use thiserror::Error;

/// Invalid-input and delegated-computation failures.
///
/// Everything here is fatal to the call that produced it: nothing is retried
/// and no partial rendering happens once validation fails.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("array length mismatch: expected {expected} elements, got {got} ({what})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("not enough data points for a fit: got {got}, need at least {need}")]
    TooFewPoints { got: usize, need: usize },

    #[error("unknown BCES method '{0}' (recognized: yx, xy, bis, ort)")]
    UnknownMethod(String),

    #[error("colormap needs at least 2 anchor colors, got {0}")]
    BadAnchors(usize),

    #[error("colormap positions invalid: {0}")]
    BadPositions(String),

    #[error("degenerate input: {0}")]
    Degenerate(String),
}

/// The BCES regression method variants, in the fixed order the estimator
/// reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcesMethod {
    /// Ordinary least squares of Y on X.
    YOnX,
    /// Ordinary least squares of X on Y.
    XOnY,
    /// Bisector of the two OLS lines.
    Bisector,
    /// Orthogonal regression (perpendicular residuals).
    Orthogonal,
}

impl BcesMethod {
    /// Index of this method in the four-method result arrays.
    pub fn index(self) -> usize {
        match self {
            BcesMethod::YOnX => 0,
            BcesMethod::XOnY => 1,
            BcesMethod::Bisector => 2,
            BcesMethod::Orthogonal => 3,
        }
    }

    /// Resolve a short method name. Unrecognized names are an error, never a
    /// silent default.
    pub fn from_name(name: &str) -> Result<Self, PlotError> {
        match name {
            "yx" => Ok(BcesMethod::YOnX),
            "xy" => Ok(BcesMethod::XOnY),
            "bis" => Ok(BcesMethod::Bisector),
            "ort" => Ok(BcesMethod::Orthogonal),
            other => Err(PlotError::UnknownMethod(other.to_string())),
        }
    }
}

/// Best-fit line `y = slope * x + intercept` with parameter uncertainties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub slope_err: f64,
    pub intercept_err: f64,
    /// Covariance between slope and intercept.
    pub cov_ab: f64,
}

impl LinearFit {
    /// Evaluate the fitted line at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// 2x2 parameter covariance matrix, (slope, intercept) ordering.
    pub fn cov_matrix(&self) -> Array2<f64> {
        array![
            [self.slope_err.powi(2), self.cov_ab],
            [self.cov_ab, self.intercept_err.powi(2)]
        ]
    }
}

/// Shaded region between `lower` and `upper`, evaluated at `x`.
///
/// All three arrays have the same length; lifecycle is compute once, draw
/// once, discard.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub x: Array1<f64>,
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
}


// src/types.rs
