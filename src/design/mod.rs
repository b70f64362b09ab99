// src/design/mod.rs
//! Filter coefficient design
//!
//! - [`poles_zeros`]: transfer functions from root locations, stability check
//! - [`desired_response`]: sampled target magnitude masks
//! - [`least_squares`]: linear-phase FIR fitting (plain and weighted)
//! - [`notch`]: second-order notch sections
//! - [`response`]: frequency response of designed coefficients

pub mod desired_response;
pub mod least_squares;
pub mod notch;
pub mod poles_zeros;
pub mod response;

pub use desired_response::*;
pub use least_squares::*;
pub use notch::*;
pub use poles_zeros::*;
pub use response::*;

use crate::error::{DesignError, DesignErrorBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Frequency band layout of a design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterBand {
    /// Pass below the passband edge
    Lowpass,
    /// Pass above the passband edge
    Highpass,
    /// Pass between two edges
    Bandpass,
    /// Reject between two edges
    Bandstop,
}

impl fmt::Display for FilterBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterBand::Lowpass => "lowpass",
            FilterBand::Highpass => "highpass",
            FilterBand::Bandpass => "bandpass",
            FilterBand::Bandstop => "bandstop",
        };
        f.write_str(name)
    }
}

impl FromStr for FilterBand {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lowpass" => Ok(FilterBand::Lowpass),
            "highpass" => Ok(FilterBand::Highpass),
            "bandpass" => Ok(FilterBand::Bandpass),
            "bandstop" => Ok(FilterBand::Bandstop),
            _ => Err(DesignErrorBuilder::new("design", "parse_filter_band")
                .invalid_specification("band", &format!("invalid filter type '{}'", s))),
        }
    }
}

/// IIR transfer function coefficients
///
/// `b` is the numerator, highest power first. `a` is the denominator without its
/// leading 1. A pure-gain system (order 0) is stored as `b = [gain]`, `a = [1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    /// Numerator coefficients
    pub b: Vec<f64>,
    /// Denominator coefficients after the leading 1
    pub a: Vec<f64>,
}

impl TransferFunction {
    /// Polynomial order of the system
    pub fn order(&self) -> usize {
        self.b.len().saturating_sub(1)
    }

    /// True when the system is a pure gain
    pub fn is_gain_only(&self) -> bool {
        self.order() == 0
    }

    /// Full denominator including the leading 1
    pub fn denominator(&self) -> Vec<f64> {
        if self.is_gain_only() {
            return vec![1.0];
        }
        std::iter::once(1.0).chain(self.a.iter().copied()).collect()
    }

    /// True if any pole lies outside the unit circle
    pub fn is_unstable(&self) -> bool {
        if self.is_gain_only() {
            return false;
        }
        is_unstable(&self.a)
    }
}
