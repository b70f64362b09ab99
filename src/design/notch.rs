// src/design/notch.rs
//! Second-order notch sections
//!
//! Zeros sit on the unit circle at the notch frequency, poles at the same angle with
//! radius `1 - bandwidth / sample_rate`. Narrower bandwidths push the poles toward the
//! zeros and sharpen the notch.

use super::{roots_to_transfer_function, TransferFunction};
use crate::error::DesignResult;
use crate::utils::validation::ParameterValidator;
use num_complex::Complex64;
use std::f64::consts::PI;
use tracing::{debug, warn};

const COMPONENT: &str = "notch";

/// Pole radius of a notch with the given bandwidth
pub fn notch_pole_radius(sample_rate: f64, bandwidth: f64) -> f64 {
    1.0 - bandwidth / sample_rate
}

/// Design a notch section centred on `center_freq`
///
/// All frequencies are in Hz. The bandwidth is not range-checked: a bandwidth larger
/// than `sample_rate` places the poles at negative radius and one of `2 * sample_rate`
/// or more puts them outside the unit circle. Check the result with
/// [`TransferFunction::is_unstable`].
pub fn design_notch(center_freq: f64, sample_rate: f64, bandwidth: f64) -> DesignResult<TransferFunction> {
    let validator = ParameterValidator::new(COMPONENT, "design_notch");
    validator.finite("center_freq", center_freq)?;
    validator.positive("sample_rate", sample_rate)?;
    validator.finite("bandwidth", bandwidth)?;

    let omega = 2.0 * PI * center_freq / sample_rate;
    let zero = Complex64::from_polar(1.0, omega);
    let radius = notch_pole_radius(sample_rate, bandwidth);
    let pole = zero * radius;

    if radius.abs() >= 1.0 {
        warn!(center_freq, sample_rate, bandwidth, radius, "notch poles are not inside the unit circle");
    }

    let tf = roots_to_transfer_function(&[pole, pole.conj()], &[zero, zero.conj()], 1.0)?;
    debug!(center_freq, sample_rate, bandwidth, radius, "designed notch section");
    Ok(tf)
}
