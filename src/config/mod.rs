// src/config/mod.rs
//! Design configuration bundles
//!
//! A [`DesignConfig`] gathers the parameters of one mask, one least-squares fit and one
//! notch section so designs can be driven from TOML files and environment overrides
//! (see [`ConfigLoader`]).

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use crate::design::{design_ls, design_notch, desired_response, DesiredResponseSpec, FilterBand, TransferFunction};
use crate::error::{DesignErrorBuilder, DesignResult};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Complete design configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DesignConfig {
    /// Desired-response mask
    #[serde(default)]
    pub response: DesiredResponseSpec,

    /// Least-squares fit of the mask
    #[serde(default)]
    pub least_squares: LeastSquaresConfig,

    /// Notch section
    #[serde(default)]
    pub notch: NotchConfig,
}

/// Least-squares FIR settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LeastSquaresConfig {
    /// Number of taps; even values are raised to the next odd one
    #[serde(default = "defaults::fir_order")]
    pub order: usize,

    /// Per-frequency weights; `None` selects the unweighted solver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

/// Notch section settings, all in Hz
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NotchConfig {
    /// Rejected frequency
    #[serde(default = "defaults::notch_center_freq")]
    pub center_freq: f64,

    /// Sampling rate of the filtered signal
    #[serde(default = "defaults::notch_sample_rate")]
    pub sample_rate: f64,

    /// Width of the rejected band
    #[serde(default = "defaults::notch_bandwidth")]
    pub bandwidth: f64,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::design;

    pub fn fir_order() -> usize { design::DEFAULT_FIR_ORDER }

    pub fn notch_center_freq() -> f64 { design::DEFAULT_NOTCH_CENTER_HZ }
    pub fn notch_sample_rate() -> f64 { design::DEFAULT_NOTCH_SAMPLE_RATE_HZ }
    pub fn notch_bandwidth() -> f64 { design::DEFAULT_NOTCH_BANDWIDTH_HZ }
}

impl Default for LeastSquaresConfig {
    fn default() -> Self {
        Self {
            order: defaults::fir_order(),
            weights: None,
        }
    }
}

impl Default for NotchConfig {
    fn default() -> Self {
        Self {
            center_freq: defaults::notch_center_freq(),
            sample_rate: defaults::notch_sample_rate(),
            bandwidth: defaults::notch_bandwidth(),
        }
    }
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            response: DesiredResponseSpec::default(),
            least_squares: LeastSquaresConfig::default(),
            notch: NotchConfig::default(),
        }
    }
}

impl LeastSquaresConfig {
    /// Fit taps to `mask` with the configured order and weights
    pub fn design(&self, mask: ArrayView1<'_, f64>) -> DesignResult<Vec<f64>> {
        let weights = self.weights.as_deref().map(ArrayView1::from);
        design_ls(self.order, mask, weights)
    }
}

impl NotchConfig {
    /// Second-order notch for the configured frequencies
    pub fn design(&self) -> DesignResult<TransferFunction> {
        design_notch(self.center_freq, self.sample_rate, self.bandwidth)
    }
}

impl DesignConfig {
    /// Validate configuration consistency
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let response = &self.response;

        if response.samples == 0 {
            errors.push("Response mask needs at least one frequency sample".to_string());
        }
        if !(response.sample_rate > 0.0) {
            errors.push(format!(
                "Response sample rate ({} Hz) must be greater than zero",
                response.sample_rate
            ));
        }

        // Check band edges vs Nyquist
        let nyquist = response.nyquist();
        let mut edges = vec![("pass_edge", response.pass_edge), ("stop_edge", response.stop_edge)];
        if matches!(response.band, FilterBand::Bandpass | FilterBand::Bandstop) && response.bandwidth == 0.0 {
            edges.push(("pass_edge2", response.pass_edge2));
            edges.push(("stop_edge2", response.stop_edge2));
        }
        for (name, edge) in edges {
            if !(edge >= 0.0 && edge <= nyquist) {
                errors.push(format!(
                    "Response {} ({} Hz) must lie within 0..={} Hz",
                    name, edge, nyquist
                ));
            }
        }

        // Check least-squares order vs mask length
        let order = self.least_squares.order;
        if order > constants::design::MAX_FIR_ORDER {
            errors.push(format!(
                "FIR order {} exceeds the maximum of {}",
                order,
                constants::design::MAX_FIR_ORDER
            ));
        }
        let odd_order = if order % 2 == 0 { order + 1 } else { order };
        let unique = (odd_order + 1) / 2;
        if unique > response.samples {
            errors.push(format!(
                "FIR order {} needs {} frequency samples, mask has {}",
                order, unique, response.samples
            ));
        }
        if let Some(weights) = &self.least_squares.weights {
            if weights.len() != response.samples {
                errors.push(format!(
                    "Least-squares weights ({}) must match the mask length ({})",
                    weights.len(),
                    response.samples
                ));
            }
            if weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
                errors.push("Least-squares weights must be finite and non-negative".to_string());
            }
        }

        // Check notch against its own sample rate
        let notch = &self.notch;
        if !(notch.sample_rate > 0.0) {
            errors.push(format!("Notch sample rate ({} Hz) must be greater than zero", notch.sample_rate));
        } else {
            if !(notch.center_freq >= 0.0 && notch.center_freq < notch.sample_rate / 2.0) {
                errors.push(format!(
                    "Notch frequency ({} Hz) must be less than Nyquist frequency ({} Hz)",
                    notch.center_freq,
                    notch.sample_rate / 2.0
                ));
            }
            if !(notch.bandwidth > 0.0 && notch.bandwidth < notch.sample_rate) {
                errors.push(format!(
                    "Notch bandwidth ({} Hz) must lie between 0 and the sample rate ({} Hz)",
                    notch.bandwidth, notch.sample_rate
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, reporting every problem in one `Configuration` error
    pub fn validate(&self) -> DesignResult<()> {
        self.validate_consistency().map_err(|errors| {
            DesignErrorBuilder::new("config", "validate").configuration(&errors.join("; "))
        })
    }

    /// Generate the configured desired-response mask
    pub fn design_response(&self) -> DesignResult<Array1<f64>> {
        desired_response(&self.response)
    }

    /// Generate the configured mask and fit FIR taps to it
    pub fn design_fir(&self) -> DesignResult<Vec<f64>> {
        self.validate()?;
        let mask = self.design_response()?;
        let taps = self.least_squares.design(mask.view())?;
        debug!(band = %self.response.band, taps = taps.len(), "designed FIR from configuration");
        Ok(taps)
    }

    /// Design the configured notch section
    pub fn design_notch(&self) -> DesignResult<TransferFunction> {
        self.validate()?;
        self.notch.design()
    }
}
