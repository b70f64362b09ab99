// src/filters/mod.rs
//! Sample-by-sample filters for running designed coefficients over signals

pub mod fir;
pub mod iir;

pub use fir::*;
pub use iir::*;
