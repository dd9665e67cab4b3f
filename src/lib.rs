// src/lib.rs - Library interface for the plotting convenience functions

pub mod colormap;
pub mod constants;
pub mod data_analysis;
pub mod plot_framework;
pub mod plot_functions;
pub mod types;

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// src/lib.rs
