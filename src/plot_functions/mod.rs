// src/plot_functions/mod.rs

pub mod plot_fit_band;
pub mod plot_histograms;
pub mod plot_joint;

// src/plot_functions/mod.rs
