// src/design/response.rs
//! Frequency response of designed coefficients
//!
//! `H(ω) = B(e^{jω}) / A(e^{jω})` is evaluated at `ω_k = π k / n`, the same grid the
//! least-squares solver fits on. Both polynomials are transformed with a `2n`-point FFT
//! after folding coefficients beyond `2n` back onto the FFT length, so the samples are
//! exact for any coefficient count.

use crate::error::{DesignErrorBuilder, DesignResult, DesignStage};
use crate::utils::validation::ParameterValidator;
use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use tracing::debug;

const COMPONENT: &str = "response";

/// Complex response at `n` frequencies in `[0, π)`
///
/// `b` is the numerator and `a` the full denominator (leading 1 included), both
/// highest power first. Use `&[1.0]` as the denominator for FIR taps.
pub fn frequency_response(b: &[f64], a: &[f64], n: usize) -> DesignResult<Vec<Complex64>> {
    let validator = ParameterValidator::new(COMPONENT, "frequency_response");
    if n == 0 {
        return Err(validator.reject("n", "at least one frequency point is required"));
    }
    if b.is_empty() {
        return Err(validator.reject("b", "numerator must not be empty"));
    }
    if a.is_empty() {
        return Err(validator.reject("a", "denominator must not be empty"));
    }
    for &c in b.iter().chain(a.iter()) {
        validator.finite("coefficients", c)?;
    }

    let size = 2 * n;
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(size);

    let mut numerator = folded(b, size);
    let mut denominator = folded(a, size);
    fft.process(&mut numerator);
    fft.process(&mut denominator);

    let mut response = Vec::with_capacity(n);
    for (k, (num, den)) in numerator.iter().zip(denominator.iter()).take(n).enumerate() {
        if den.norm() == 0.0 {
            return Err(DesignErrorBuilder::new(COMPONENT, "frequency_response").design_failure(
                DesignStage::FrequencyResponse,
                &format!("denominator vanishes at frequency index {}", k),
            ));
        }
        response.push(num / den);
    }

    debug!(points = n, numerator = b.len(), denominator = a.len(), "evaluated frequency response");
    Ok(response)
}

/// Magnitude `|H(ω_k)|` at `n` frequencies in `[0, π)`
pub fn magnitude_response(b: &[f64], a: &[f64], n: usize) -> DesignResult<Vec<f64>> {
    Ok(frequency_response(b, a, n)?.iter().map(|h| h.norm()).collect())
}

// x[m mod size] summed, so a size-point DFT samples the full DTFT
fn folded(coeffs: &[f64], size: usize) -> Vec<Complex64> {
    let mut buffer = vec![Complex64::new(0.0, 0.0); size];
    for (m, &c) in coeffs.iter().enumerate() {
        buffer[m % size].re += c;
    }
    buffer
}
