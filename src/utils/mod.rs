// src/utils/mod.rs
//! Shared helpers for the design modules

pub mod validation;

pub use validation::ParameterValidator;
