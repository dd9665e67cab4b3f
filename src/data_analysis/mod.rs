// src/data_analysis/mod.rs

pub mod bands;
pub mod bces;
pub mod histogram;

// src/data_analysis/mod.rs
