// tests/panel_render_test.rs

// Render the histogram panel layouts and the joint plot into in-memory
// buffers and verify artists were drawn.

use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use astroplot::plot_functions::plot_histograms::{
    panel_color, plot_cumulative_hists, plot_hist, plot_hists_x, plot_stacked_hists, HistOptions,
    HistPanel,
};
use astroplot::plot_functions::plot_joint::{plot_joint, JointOptions};

const W: u32 = 600;
const H: u32 = 600;

fn gaussian_sample(n: usize, mean: f64, sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let z: f64 = rng.sample(StandardNormal);
            mean + sigma * z
        })
        .collect()
}

fn non_white_pixels(buf: &[u8]) -> usize {
    buf.chunks(3).filter(|p| *p != [255u8, 255, 255]).count()
}

fn render<F>(draw: F) -> Vec<u8>
where
    F: FnOnce(
        &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    ) -> Result<(), Box<dyn std::error::Error>>,
{
    let mut buf = vec![0u8; (W * H * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (W, H)).into_drawing_area();
        root.fill(&WHITE).unwrap();
        draw(&root).unwrap();
        root.present().unwrap();
    }
    buf
}

#[test]
fn test_single_hist_renders() {
    let panel = HistPanel::new(gaussian_sample(500, 0.0, 1.0, 1), "sample");
    let opts = HistOptions {
        x_label: "value".to_string(),
        ..HistOptions::default()
    };
    let buf = render(|root| plot_hist(root, &panel, &opts));
    assert!(non_white_pixels(&buf) > 1000);
}

#[test]
fn test_stacked_hists_share_x_range() {
    let panels: Vec<HistPanel> = (0..3)
        .map(|i| {
            HistPanel::new(
                gaussian_sample(300, i as f64, 1.0, 10 + i as u64),
                &format!("run {i}"),
            )
            .with_color(panel_color(i))
        })
        .collect();
    let opts = HistOptions {
        x_label: "value".to_string(),
        share_y: true,
        ..HistOptions::default()
    };
    let buf = render(|root| plot_stacked_hists(root, &panels, &opts));
    assert!(non_white_pixels(&buf) > 1000);
}

#[test]
fn test_stacked_hists_reject_bad_panel_count() {
    let one = vec![HistPanel::new(vec![1.0, 2.0, 3.0], "only")];
    let mut buf = vec![0u8; (W * H * 3) as usize];
    let root = BitMapBackend::with_buffer(&mut buf, (W, H)).into_drawing_area();
    assert!(plot_stacked_hists(&root, &one, &HistOptions::default()).is_err());
    assert!(plot_cumulative_hists(&root, &one, &HistOptions::default()).is_err());
}

#[test]
fn test_cumulative_hists_render() {
    let panels = vec![
        HistPanel::new(gaussian_sample(400, 0.0, 1.0, 2), "a"),
        HistPanel::new(gaussian_sample(400, 0.5, 1.5, 3), "b").with_color(panel_color(1)),
    ];
    let opts = HistOptions {
        x_label: "flux".to_string(),
        ..HistOptions::default()
    };
    let buf = render(|root| plot_cumulative_hists(root, &panels, &opts));
    assert!(non_white_pixels(&buf) > 1000);
}

#[test]
fn test_independent_hists_render() {
    let panels = [
        HistPanel::new(gaussian_sample(200, 0.0, 1.0, 4), "x"),
        HistPanel::new(gaussian_sample(200, 100.0, 5.0, 5), "y").with_color(panel_color(1)),
        HistPanel::new(gaussian_sample(200, -40.0, 0.1, 6), "z").with_color(panel_color(2)),
    ];
    let buf = render(|root| plot_hists_x(root, &panels, &HistOptions::default()));
    assert!(non_white_pixels(&buf) > 1000);
}

#[test]
fn test_reference_lines_add_pixels() {
    let data = gaussian_sample(500, 0.0, 1.0, 7);
    let plain = HistPanel::new(data.clone(), "sample");
    let mut with_lines = HistPanel::new(data, "sample");
    with_lines.line = Some(0.0);
    with_lines.line_dashed = Some(1.0);
    let opts = HistOptions::default();
    let a = render(|root| plot_hist(root, &plain, &opts));
    let b = render(|root| plot_hist(root, &with_lines, &opts));
    assert!(non_white_pixels(&b) > non_white_pixels(&a));
}

#[test]
fn test_error_bars_and_labels_render() {
    use astroplot::plot_framework::{draw_error_bars, draw_labels};
    let x = [(1.0, 0.2), (2.0, 0.1), (3.0, 0.3)];
    let y = [(2.0, 0.4), (4.1, 0.2), (5.9, 0.5)];
    let buf = render(|root| {
        let mut chart = ChartBuilder::on(root)
            .margin(5)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..4.0, 0.0..7.0)?;
        chart.configure_mesh().draw()?;
        draw_error_bars(&mut chart, &x, &y, BLUE, 3)?;
        draw_labels(
            &mut chart,
            &[1.0, 2.0, 3.0],
            &[2.5, 4.6, 6.4],
            &["NGC 1275", "M 87", "Cyg A"],
            BLACK,
        )?;
        Ok(())
    });
    assert!(non_white_pixels(&buf) > 200);
}

#[test]
fn test_joint_plot_renders() {
    let x = gaussian_sample(2000, 1.0, 0.3, 8);
    let mut rng = StdRng::seed_from_u64(9);
    let y: Vec<f64> = x
        .iter()
        .map(|&v| {
            let z: f64 = rng.sample(StandardNormal);
            2.0 * v + 0.1 * z
        })
        .collect();
    let opts = JointOptions {
        x_label: "slope".to_string(),
        y_label: "intercept".to_string(),
        ..JointOptions::default()
    };
    let buf = render(|root| plot_joint(root, &x, &y, &opts));
    // Density image plus two marginals covers a large share of the surface.
    assert!(non_white_pixels(&buf) > 5000);
}

#[test]
fn test_joint_plot_with_wolfram_cmap() {
    let x = gaussian_sample(1000, 0.0, 1.0, 11);
    let y = gaussian_sample(1000, 0.0, 1.0, 12);
    let opts = JointOptions {
        cmap: Some(astroplot::colormap::wolfram_cmap()),
        show_medians: false,
        ..JointOptions::default()
    };
    let buf = render(|root| plot_joint(root, &x, &y, &opts));
    assert!(non_white_pixels(&buf) > 5000);
}

// tests/panel_render_test.rs
