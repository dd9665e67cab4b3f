// src/plot_functions/plot_histograms.rs
//
// Filled histogram panels: a single panel, 2-4 stacked panels sharing the
// X axis (optionally the Y axis), the reverse-cumulative variant, and three
// fully independent panels. The caller owns the drawing area (and its
// background fill); these functions only split it and add artists.

use std::error::Error;

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::element::{PathElement, Rectangle};
use plotters::style::colors::{BLACK, WHITE};
use plotters::style::{Color, RGBColor};

use crate::constants::{
    COLOR_HIST_PANEL_1, COLOR_HIST_PANEL_2, COLOR_HIST_PANEL_3, COLOR_HIST_PANEL_4,
    DEFAULT_CUMHIST_BINS, DEFAULT_HIST_BINS, FONT_SIZE_AXIS_LABEL, FONT_SIZE_LEGEND,
    LINE_WIDTH_LEGEND, LINE_WIDTH_REFERENCE,
};
use crate::data_analysis::histogram::Histogram;
use crate::plot_framework::{calculate_range, draw_vline, LineStyle};
use crate::types::PlotError;

/// One histogram panel: the sample, its legend label, cosmetics, and
/// optional vertical reference lines (solid and dashed).
#[derive(Debug, Clone)]
pub struct HistPanel {
    pub data: Vec<f64>,
    pub label: String,
    pub color: RGBColor,
    pub bins: usize,
    pub line: Option<f64>,
    pub line_dashed: Option<f64>,
}

impl HistPanel {
    pub fn new(data: Vec<f64>, label: &str) -> Self {
        HistPanel {
            data,
            label: label.to_string(),
            color: *COLOR_HIST_PANEL_1,
            bins: DEFAULT_HIST_BINS,
            line: None,
            line_dashed: None,
        }
    }

    pub fn with_color(mut self, color: RGBColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }
}

/// Default panel palette, in the order panels are stacked.
pub fn panel_color(idx: usize) -> RGBColor {
    match idx % 4 {
        0 => *COLOR_HIST_PANEL_1,
        1 => *COLOR_HIST_PANEL_2,
        2 => *COLOR_HIST_PANEL_3,
        _ => *COLOR_HIST_PANEL_4,
    }
}

/// Layout options shared by the histogram figures.
#[derive(Debug, Clone, Default)]
pub struct HistOptions {
    /// Displayed X range for all panels; `None` derives it from the data
    /// with padding.
    pub x_range: Option<(f64, f64)>,
    /// Binning range applied to every panel (the bins themselves); `None`
    /// bins each panel over its own extent.
    pub hist_range: Option<(f64, f64)>,
    pub x_label: String,
    /// `None` picks "Number" (or the cumulative fraction label).
    pub y_label: Option<String>,
    /// Share the Y scale across panels.
    pub share_y: bool,
}

fn data_extent(panels: &[HistPanel]) -> Result<(f64, f64), PlotError> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for p in panels {
        for &v in &p.data {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return Err(PlotError::Degenerate(
            "histogram panels contain no finite values".to_string(),
        ));
    }
    Ok(calculate_range(lo, hi))
}

#[allow(clippy::too_many_arguments)]
fn draw_hist_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    hist: &Histogram,
    panel: &HistPanel,
    x_range: (f64, f64),
    y_max: f64,
    x_label: &str,
    y_label: &str,
    show_x_labels: bool,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .margin(5)
        .x_label_area_size(if show_x_labels { 40 } else { 10 })
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.0..x_range.1, 0.0..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc(y_label)
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL));
    if show_x_labels {
        mesh.x_desc(x_label);
    } else {
        mesh.disable_x_axis();
    }
    mesh.draw()?;

    // Filled step bars.
    let color = panel.color;
    chart
        .draw_series(hist.counts.iter().enumerate().map(|(i, &c)| {
            Rectangle::new(
                [(hist.edges[i], 0.0), (hist.edges[i + 1], c)],
                color.mix(0.6).filled(),
            )
        }))?
        .label(&panel.label)
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
        });

    if !panel.label.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_LEGEND))
            .draw()?;
    }

    if let Some(v) = panel.line {
        draw_vline(&mut chart, v, LineStyle::Solid, BLACK, LINE_WIDTH_REFERENCE)?;
    }
    if let Some(v) = panel.line_dashed {
        draw_vline(&mut chart, v, LineStyle::Dashed, BLACK, LINE_WIDTH_REFERENCE)?;
    }
    Ok(())
}

/// Single filled histogram with an axis label.
pub fn plot_hist(
    area: &DrawingArea<BitMapBackend, Shift>,
    panel: &HistPanel,
    opts: &HistOptions,
) -> Result<(), Box<dyn Error>> {
    let hist = Histogram::compute(&panel.data, panel.bins, opts.hist_range)?;
    let x_range = match opts.x_range {
        Some(r) => r,
        None => calculate_range(hist.edges[0], hist.edges[hist.edges.len() - 1]),
    };
    let y_label = opts.y_label.clone().unwrap_or_else(|| "Number".to_string());
    draw_hist_panel(
        area,
        &hist,
        panel,
        x_range,
        hist.max_count() * 1.1,
        &opts.x_label,
        &y_label,
        true,
    )
}

/// 2-4 histogram panels stacked vertically, sharing the X range; only the
/// bottom panel carries the X axis labels.
pub fn plot_stacked_hists(
    area: &DrawingArea<BitMapBackend, Shift>,
    panels: &[HistPanel],
    opts: &HistOptions,
) -> Result<(), Box<dyn Error>> {
    if !(2..=4).contains(&panels.len()) {
        return Err(PlotError::Degenerate(format!(
            "stacked layout supports 2 to 4 panels, got {}",
            panels.len()
        ))
        .into());
    }

    // Bin everything before touching the surface; a bad panel must not
    // leave a partially drawn figure.
    let hists: Vec<Histogram> = panels
        .iter()
        .map(|p| Histogram::compute(&p.data, p.bins, opts.hist_range))
        .collect::<Result<_, _>>()?;

    let x_range = match opts.x_range {
        Some(r) => r,
        None => data_extent(panels)?,
    };
    let shared_y_max = hists.iter().map(Histogram::max_count).fold(0.0, f64::max) * 1.1;
    let y_label = opts.y_label.clone().unwrap_or_else(|| "Number".to_string());

    let sub_areas = area.split_evenly((panels.len(), 1));
    for (i, (panel, hist)) in panels.iter().zip(hists.iter()).enumerate() {
        let y_max = if opts.share_y {
            shared_y_max
        } else {
            hist.max_count() * 1.1
        };
        let last = i == panels.len() - 1;
        draw_hist_panel(
            &sub_areas[i],
            hist,
            panel,
            x_range,
            y_max,
            &opts.x_label,
            &y_label,
            last,
        )?;
    }
    Ok(())
}

/// Stacked reverse-cumulative histograms: each panel shows the fraction of
/// its sample at or above x. Panel `bins` defaults are coarser here, so
/// `DEFAULT_CUMHIST_BINS` is applied when a panel still has the plain
/// histogram default.
pub fn plot_cumulative_hists(
    area: &DrawingArea<BitMapBackend, Shift>,
    panels: &[HistPanel],
    opts: &HistOptions,
) -> Result<(), Box<dyn Error>> {
    if !(2..=4).contains(&panels.len()) {
        return Err(PlotError::Degenerate(format!(
            "stacked layout supports 2 to 4 panels, got {}",
            panels.len()
        ))
        .into());
    }

    let hists: Vec<Histogram> = panels
        .iter()
        .map(|p| {
            let bins = if p.bins == DEFAULT_HIST_BINS {
                DEFAULT_CUMHIST_BINS
            } else {
                p.bins
            };
            Histogram::compute(&p.data, bins, opts.hist_range)
                .map(|h| h.reverse_cumulative_normalized())
        })
        .collect::<Result<_, _>>()?;

    let x_range = match opts.x_range {
        Some(r) => r,
        None => data_extent(panels)?,
    };
    let y_label = opts
        .y_label
        .clone()
        .unwrap_or_else(|| "N(>x)/N".to_string());

    let sub_areas = area.split_evenly((panels.len(), 1));
    for (i, (panel, hist)) in panels.iter().zip(hists.iter()).enumerate() {
        let last = i == panels.len() - 1;
        // Normalized fractions top out at 1.
        draw_hist_panel(
            &sub_areas[i],
            hist,
            panel,
            x_range,
            1.05,
            &opts.x_label,
            &y_label,
            last,
        )?;
    }
    Ok(())
}

/// Three stacked histograms with fully independent axes (no shared X
/// range), each labeled with its own legend.
pub fn plot_hists_x(
    area: &DrawingArea<BitMapBackend, Shift>,
    panels: &[HistPanel; 3],
    opts: &HistOptions,
) -> Result<(), Box<dyn Error>> {
    let hists: Vec<Histogram> = panels
        .iter()
        .map(|p| Histogram::compute(&p.data, p.bins, None))
        .collect::<Result<_, _>>()?;

    let y_label = opts.y_label.clone().unwrap_or_else(|| "Number".to_string());
    let sub_areas = area.split_evenly((3, 1));
    for (i, (panel, hist)) in panels.iter().zip(hists.iter()).enumerate() {
        let x_range = calculate_range(hist.edges[0], hist.edges[hist.edges.len() - 1]);
        draw_hist_panel(
            &sub_areas[i],
            hist,
            panel,
            x_range,
            hist.max_count() * 1.1,
            &opts.x_label,
            &y_label,
            true,
        )?;
    }
    Ok(())
}

// src/plot_functions/plot_histograms.rs
