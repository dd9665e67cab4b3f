// src/plot_functions/plot_joint.rs
//
// Joint distribution of two samples: a binned density image in the main
// panel with marginal histograms along the top and right edges, the layout
// used for inspecting 2-D posteriors from an MCMC run.

use std::error::Error;

use plotters::backend::BitMapBackend;
use plotters::chart::ChartBuilder;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::element::Rectangle;
use plotters::style::colors::{BLACK, WHITE};
use plotters::style::Color;

use crate::colormap::{grayscale_cmap, ColorMap};
use crate::constants::{
    COLOR_MARGINAL_X, COLOR_MARGINAL_Y, FONT_SIZE_AXIS_LABEL, JOINT_IMAGE_BINS,
    JOINT_MARGINAL_BINS, LINE_WIDTH_REFERENCE, SIGMA_HIGH_PERCENTILE, SIGMA_LOW_PERCENTILE,
};
use crate::data_analysis::histogram::{median, percentile, Histogram};
use crate::plot_framework::{draw_hline, draw_vline, LineStyle};
use crate::types::PlotError;

/// Options for the joint plot. The colormap defaults to grayscale (white
/// for empty cells, black for the densest).
#[derive(Debug, Clone)]
pub struct JointOptions {
    pub x_label: String,
    pub y_label: String,
    pub cmap: Option<ColorMap>,
    pub image_bins: usize,
    pub marginal_bins: usize,
    /// Overlay median (solid) and central 68.3% bounds (dashed) for each
    /// sample on its marginal histogram.
    pub show_medians: bool,
}

impl Default for JointOptions {
    fn default() -> Self {
        JointOptions {
            x_label: String::new(),
            y_label: String::new(),
            cmap: None,
            image_bins: JOINT_IMAGE_BINS,
            marginal_bins: JOINT_MARGINAL_BINS,
            show_medians: true,
        }
    }
}

/// Counts of `(x, y)` pairs on a regular 2-D grid.
struct DensityGrid {
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
    /// Row-major, `counts[iy * nx + ix]`.
    counts: Vec<f64>,
    nx: usize,
    ny: usize,
}

impl DensityGrid {
    fn compute(x: &[f64], y: &[f64], bins: usize) -> Result<DensityGrid, PlotError> {
        // Reuse the 1-D binning for the edges, then count pairs.
        let hx = Histogram::compute(x, bins, None)?;
        let hy = Histogram::compute(y, bins, None)?;
        let (x_lo, x_hi) = (hx.edges[0], hx.edges[bins]);
        let (y_lo, y_hi) = (hy.edges[0], hy.edges[bins]);
        let wx = (x_hi - x_lo) / bins as f64;
        let wy = (y_hi - y_lo) / bins as f64;

        let mut counts = vec![0.0f64; bins * bins];
        for (&xv, &yv) in x.iter().zip(y.iter()) {
            if !xv.is_finite() || !yv.is_finite() {
                continue;
            }
            if xv < x_lo || xv > x_hi || yv < y_lo || yv > y_hi {
                continue;
            }
            let ix = (((xv - x_lo) / wx) as usize).min(bins - 1);
            let iy = (((yv - y_lo) / wy) as usize).min(bins - 1);
            counts[iy * bins + ix] += 1.0;
        }
        Ok(DensityGrid {
            x_edges: hx.edges,
            y_edges: hy.edges,
            counts,
            nx: bins,
            ny: bins,
        })
    }

    fn max_count(&self) -> f64 {
        self.counts.iter().copied().fold(0.0, f64::max)
    }
}

/// Joint density image of two equal-length samples with marginal
/// histograms. The main panel occupies the lower-left three quarters of
/// the area; the top strip shows the X marginal and the right strip the Y
/// marginal, axes aligned with the main panel.
pub fn plot_joint(
    area: &DrawingArea<BitMapBackend, Shift>,
    x: &[f64],
    y: &[f64],
    opts: &JointOptions,
) -> Result<(), Box<dyn Error>> {
    if y.len() != x.len() {
        return Err(PlotError::LengthMismatch {
            what: "joint samples",
            expected: x.len(),
            got: y.len(),
        }
        .into());
    }

    // All the numerics happen before any drawing.
    let grid = DensityGrid::compute(x, y, opts.image_bins)?;
    let hx = Histogram::compute(x, opts.marginal_bins, None)?;
    let hy = Histogram::compute(y, opts.marginal_bins, None)?;
    let stats = if opts.show_medians {
        Some((
            median(x)?,
            percentile(x, SIGMA_LOW_PERCENTILE)?,
            percentile(x, SIGMA_HIGH_PERCENTILE)?,
            median(y)?,
            percentile(y, SIGMA_LOW_PERCENTILE)?,
            percentile(y, SIGMA_HIGH_PERCENTILE)?,
        ))
    } else {
        None
    };

    let grayscale;
    let cmap = match &opts.cmap {
        Some(c) => c,
        None => {
            grayscale = grayscale_cmap();
            &grayscale
        }
    };

    let (x_lo, x_hi) = (grid.x_edges[0], grid.x_edges[grid.nx]);
    let (y_lo, y_hi) = (grid.y_edges[0], grid.y_edges[grid.ny]);

    let (w, h) = area.dim_in_pixel();
    // Main panel gets 3/4 of each dimension; marginals take the rest.
    let panes = area.split_by_breakpoints([w * 3 / 4], [h / 4]);
    let top_pane = &panes[0];
    let main_pane = &panes[2];
    let side_pane = &panes[3];

    // Main density image.
    {
        let mut chart = ChartBuilder::on(main_pane)
            .margin(5)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(&opts.x_label)
            .y_desc(&opts.y_label)
            .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
            .draw()?;

        let max = grid.max_count().max(1.0);
        chart.draw_series((0..grid.ny).flat_map(|iy| {
            let grid = &grid;
            (0..grid.nx).map(move |ix| {
                let c = cmap.eval_continuous(grid.counts[iy * grid.nx + ix] / max);
                Rectangle::new(
                    [
                        (grid.x_edges[ix], grid.y_edges[iy]),
                        (grid.x_edges[ix + 1], grid.y_edges[iy + 1]),
                    ],
                    c.filled(),
                )
            })
        }))?;
    }

    // X marginal along the top, sharing the main panel's X range. The Y
    // label area matches the main panel so the axes line up.
    {
        let mut chart = ChartBuilder::on(top_pane)
            .margin(5)
            .x_label_area_size(0)
            .y_label_area_size(50)
            .build_cartesian_2d(x_lo..x_hi, 0.0..hx.max_count() * 1.1)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .disable_y_axis()
            .draw()?;
        chart.draw_series(hx.counts.iter().enumerate().map(|(i, &c)| {
            Rectangle::new(
                [(hx.edges[i], 0.0), (hx.edges[i + 1], c)],
                COLOR_MARGINAL_X.mix(0.8).filled(),
            )
        }))?;
        chart.draw_series(hx.counts.iter().enumerate().map(|(i, &c)| {
            Rectangle::new([(hx.edges[i], 0.0), (hx.edges[i + 1], c)], BLACK)
        }))?;

        if let Some((mx, xlo, xhi, _, _, _)) = stats {
            draw_vline(&mut chart, mx, LineStyle::Solid, BLACK, LINE_WIDTH_REFERENCE)?;
            draw_vline(&mut chart, xlo, LineStyle::Dashed, BLACK, LINE_WIDTH_REFERENCE)?;
            draw_vline(&mut chart, xhi, LineStyle::Dashed, BLACK, LINE_WIDTH_REFERENCE)?;
        }
    }

    // Y marginal along the right, bars growing horizontally.
    {
        let mut chart = ChartBuilder::on(side_pane)
            .margin(5)
            .x_label_area_size(40)
            .y_label_area_size(0)
            .build_cartesian_2d(0.0..hy.max_count() * 1.1, y_lo..y_hi)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .disable_y_axis()
            .draw()?;
        chart.draw_series(hy.counts.iter().enumerate().map(|(i, &c)| {
            Rectangle::new(
                [(0.0, hy.edges[i]), (c, hy.edges[i + 1])],
                COLOR_MARGINAL_Y.mix(0.8).filled(),
            )
        }))?;
        chart.draw_series(hy.counts.iter().enumerate().map(|(i, &c)| {
            Rectangle::new([(0.0, hy.edges[i]), (c, hy.edges[i + 1])], BLACK)
        }))?;

        if let Some((_, _, _, my, ylo, yhi)) = stats {
            draw_hline(&mut chart, my, LineStyle::Solid, BLACK, LINE_WIDTH_REFERENCE)?;
            draw_hline(&mut chart, ylo, LineStyle::Dashed, BLACK, LINE_WIDTH_REFERENCE)?;
            draw_hline(&mut chart, yhi, LineStyle::Dashed, BLACK, LINE_WIDTH_REFERENCE)?;
        }
    }

    // The corner pane stays empty.
    panes[1].fill(&WHITE)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::drawing::IntoDrawingArea;

    #[test]
    fn density_grid_counts_every_pair() {
        let x = [0.1, 0.9, 0.5, 0.5];
        let y = [0.1, 0.9, 0.5, 0.5];
        let g = DensityGrid::compute(&x, &y, 4).unwrap();
        assert_eq!(g.counts.iter().sum::<f64>() as usize, 4);
        assert_eq!(g.max_count() as usize, 2);
    }

    #[test]
    fn density_grid_skips_non_finite_pairs() {
        let x = [0.0, 1.0, f64::NAN];
        let y = [0.0, 1.0, 0.5];
        let g = DensityGrid::compute(&x, &y, 2).unwrap();
        assert_eq!(g.counts.iter().sum::<f64>() as usize, 2);
    }

    #[test]
    fn mismatched_samples_are_rejected() {
        let mut buf = vec![0u8; 100 * 100 * 3];
        let root =
            plotters::prelude::BitMapBackend::with_buffer(&mut buf, (100, 100)).into_drawing_area();
        let r = plot_joint(&root, &[1.0, 2.0], &[1.0], &JointOptions::default());
        assert!(r.is_err());
    }
}

// src/plot_functions/plot_joint.rs
