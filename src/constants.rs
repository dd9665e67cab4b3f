// src/constants.rs

// Import specific colors needed
use plotters::style::colors::full_palette::{AMBER, BLUE, GREEN, GREY, RED};
use plotters::style::RGBColor;

// Not present in plotters' Material palette; standard CSS khaki.
const KHAKI: RGBColor = RGBColor(240, 230, 140);

// Default figure dimensions for callers that let the crate create the surface.
pub const PLOT_WIDTH: u32 = 1024;
pub const PLOT_HEIGHT: u32 = 768;

// Font sizes.
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 15;
pub const FONT_SIZE_LEGEND: i32 = 15;
pub const FONT_SIZE_POINT_LABEL: i32 = 13;

// Fit-and-band defaults.
pub const DEFAULT_NBOOT: usize = 1000; // bootstrap resamples for the BCES fit
pub const DEFAULT_GRID_POINTS: usize = 100; // evaluation grid across the X range
pub const DEFAULT_CONF_LEVEL: f64 = 0.683; // probability mass, 1 sigma under normality
pub const DEFAULT_CONF_SIGMAS: f64 = 1.0; // MC band width in standard deviations
pub const MC_BAND_SAMPLES: usize = 10_000; // parameter draws for the MC band

// Opacity of shaded confidence/prediction regions.
pub const BAND_ALPHA: f64 = 0.3;

// Histogram defaults.
pub const DEFAULT_HIST_BINS: usize = 10;
pub const DEFAULT_CUMHIST_BINS: usize = 50;
pub const JOINT_IMAGE_BINS: usize = 40;
pub const JOINT_MARGINAL_BINS: usize = 20;

// Percentiles bracketing the central 68.3% of a sample (1 sigma).
pub const SIGMA_LOW_PERCENTILE: f64 = 15.87;
pub const SIGMA_HIGH_PERCENTILE: f64 = 84.13;

// --- Plot Color Assignments ---
pub const COLOR_FIT_LINE: &RGBColor = &RED;
pub const COLOR_CONF_BAND: &RGBColor = &GREY;
pub const COLOR_PRED_BAND: &RGBColor = &KHAKI;
pub const COLOR_HIST_PANEL_1: &RGBColor = &BLUE;
pub const COLOR_HIST_PANEL_2: &RGBColor = &RED;
pub const COLOR_HIST_PANEL_3: &RGBColor = &AMBER;
pub const COLOR_HIST_PANEL_4: &RGBColor = &GREEN;
pub const COLOR_MARGINAL_X: RGBColor = RGBColor(173, 216, 230); // light blue
pub const COLOR_MARGINAL_Y: RGBColor = RGBColor(255, 255, 224); // light yellow

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_REFERENCE: u32 = 2;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// Dashed reference lines are drawn as this many segments across the axis.
pub const DASH_SEGMENTS: usize = 20;

// src/constants.rs
