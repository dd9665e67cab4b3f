// src/plot_framework.rs

use plotters::backend::BitMapBackend;
use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::element::{Circle, PathElement, Polygon, Text};
use plotters::series::LineSeries;
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;

use crate::constants::{BAND_ALPHA, DASH_SEGMENTS, FONT_SIZE_POINT_LABEL, LINE_WIDTH_PLOT};
use crate::types::{Band, PlotError};

/// The 2-D chart every drawing helper mutates. The caller owns figure and
/// axis setup; these helpers only add artists.
pub type Chart2d<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Style of a reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Shade the region between a band's lower and upper bounds.
pub fn draw_band(chart: &mut Chart2d, band: &Band, color: RGBColor) -> Result<(), Box<dyn Error>> {
    if band.lower.len() != band.x.len() || band.upper.len() != band.x.len() {
        return Err(PlotError::LengthMismatch {
            what: "band bounds",
            expected: band.x.len(),
            got: band.lower.len().min(band.upper.len()),
        }
        .into());
    }
    let mut pts: Vec<(f64, f64)> = band
        .x
        .iter()
        .zip(band.upper.iter())
        .map(|(&x, &u)| (x, u))
        .collect();
    pts.extend(
        band.x
            .iter()
            .zip(band.lower.iter())
            .rev()
            .map(|(&x, &l)| (x, l)),
    );
    chart.draw_series(std::iter::once(Polygon::new(
        pts,
        color.mix(BAND_ALPHA).filled(),
    )))?;
    Ok(())
}

/// Draw a polyline through `(x, y)` pairs.
pub fn draw_polyline(
    chart: &mut Chart2d,
    x: &[f64],
    y: &[f64],
    color: RGBColor,
    stroke_width: u32,
) -> Result<(), Box<dyn Error>> {
    if y.len() != x.len() {
        return Err(PlotError::LengthMismatch {
            what: "line ordinates",
            expected: x.len(),
            got: y.len(),
        }
        .into());
    }
    chart.draw_series(LineSeries::new(
        x.iter().zip(y.iter()).map(|(&a, &b)| (a, b)),
        color.stroke_width(stroke_width),
    ))?;
    Ok(())
}

/// Vertical reference line spanning the current Y range.
pub fn draw_vline(
    chart: &mut Chart2d,
    x: f64,
    style: LineStyle,
    color: RGBColor,
    stroke_width: u32,
) -> Result<(), Box<dyn Error>> {
    let y_range = chart.plotting_area().get_y_range();
    let (y0, y1) = (y_range.start, y_range.end);
    match style {
        LineStyle::Solid => {
            chart.draw_series(LineSeries::new(
                vec![(x, y0), (x, y1)],
                color.stroke_width(stroke_width),
            ))?;
        }
        LineStyle::Dashed => {
            // Dash by drawing alternating short segments.
            let seg = (y1 - y0) / (DASH_SEGMENTS as f64 * 2.0);
            for i in 0..DASH_SEGMENTS {
                let s = y0 + (i as f64 * 2.0) * seg;
                chart.draw_series(LineSeries::new(
                    vec![(x, s), (x, (s + seg).min(y1))],
                    color.stroke_width(stroke_width),
                ))?;
            }
        }
    }
    Ok(())
}

/// Horizontal reference line spanning the current X range.
pub fn draw_hline(
    chart: &mut Chart2d,
    y: f64,
    style: LineStyle,
    color: RGBColor,
    stroke_width: u32,
) -> Result<(), Box<dyn Error>> {
    let x_range = chart.plotting_area().get_x_range();
    let (x0, x1) = (x_range.start, x_range.end);
    match style {
        LineStyle::Solid => {
            chart.draw_series(LineSeries::new(
                vec![(x0, y), (x1, y)],
                color.stroke_width(stroke_width),
            ))?;
        }
        LineStyle::Dashed => {
            let seg = (x1 - x0) / (DASH_SEGMENTS as f64 * 2.0);
            for i in 0..DASH_SEGMENTS {
                let s = x0 + (i as f64 * 2.0) * seg;
                chart.draw_series(LineSeries::new(
                    vec![(s, y), ((s + seg).min(x1), y)],
                    color.stroke_width(stroke_width),
                ))?;
            }
        }
    }
    Ok(())
}

/// Scatter with x/y error bars from `(nominal, sigma)` pairs, the shape an
/// uncertainty-propagation package hands back for derived quantities.
pub fn draw_error_bars(
    chart: &mut Chart2d,
    x: &[(f64, f64)],
    y: &[(f64, f64)],
    color: RGBColor,
    marker_size: u32,
) -> Result<(), Box<dyn Error>> {
    if y.len() != x.len() {
        return Err(PlotError::LengthMismatch {
            what: "error-bar ordinates",
            expected: x.len(),
            got: y.len(),
        }
        .into());
    }
    for (&(xv, xs), &(yv, ys)) in x.iter().zip(y.iter()) {
        if xs > 0.0 {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(xv - xs, yv), (xv + xs, yv)],
                color.stroke_width(LINE_WIDTH_PLOT),
            )))?;
        }
        if ys > 0.0 {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(xv, yv - ys), (xv, yv + ys)],
                color.stroke_width(LINE_WIDTH_PLOT),
            )))?;
        }
        chart.draw_series(std::iter::once(Circle::new(
            (xv, yv),
            marker_size,
            color.filled(),
        )))?;
    }
    Ok(())
}

/// Draw one text label per data point.
pub fn draw_labels(
    chart: &mut Chart2d,
    x: &[f64],
    y: &[f64],
    labels: &[&str],
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    if y.len() != x.len() || labels.len() != x.len() {
        return Err(PlotError::LengthMismatch {
            what: "label positions",
            expected: x.len(),
            got: y.len().min(labels.len()),
        }
        .into());
    }
    let style = ("sans-serif", FONT_SIZE_POINT_LABEL)
        .into_font()
        .color(&color);
    chart.draw_series(
        x.iter()
            .zip(y.iter())
            .zip(labels.iter())
            .map(|((&xv, &yv), &s)| Text::new(s.to_string(), (xv, yv), style.clone())),
    )?;
    Ok(())
}


// src/plot_framework.rs
