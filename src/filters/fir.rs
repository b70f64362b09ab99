// src/filters/fir.rs
//! FIR (Finite Impulse Response) digital filters

use crate::error::DesignResult;
use crate::utils::validation::ParameterValidator;

/// FIR filter over a circular delay line
#[derive(Debug, Clone)]
pub struct FirFilter {
    coefficients: Vec<f64>,
    delay_line: Vec<f64>,
    index: usize,
}

impl FirFilter {
    /// Create FIR filter from taps
    pub fn new(coefficients: Vec<f64>) -> DesignResult<Self> {
        let validator = ParameterValidator::new("fir_filter", "new");
        if coefficients.is_empty() {
            return Err(validator.reject("coefficients", "taps must not be empty"));
        }
        for &c in &coefficients {
            validator.finite("coefficients", c)?;
        }

        Ok(Self {
            delay_line: vec![0.0; coefficients.len()],
            coefficients,
            index: 0,
        })
    }

    /// Process single sample
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let length = self.coefficients.len();
        self.delay_line[self.index] = input;

        let mut output = 0.0;
        for (i, c) in self.coefficients.iter().enumerate() {
            let delay_index = (self.index + length - i) % length;
            output += c * self.delay_line[delay_index];
        }

        self.index = (self.index + 1) % length;
        output
    }

    /// Process a block of samples
    pub fn process(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.delay_line.fill(0.0);
        self.index = 0;
    }

    /// Get filter length
    pub fn length(&self) -> usize {
        self.coefficients.len()
    }

    /// Get coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{design_ls, desired_response, DesiredResponseSpec};
    use std::f64::consts::PI;

    #[test]
    fn test_fir_processing() {
        let mut filter = FirFilter::new(vec![0.5, 0.5]).unwrap();
        assert_eq!(filter.process_sample(1.0), 0.5);
        assert_eq!(filter.process_sample(1.0), 1.0);
        assert_eq!(filter.length(), 2);
    }

    #[test]
    fn test_impulse_returns_taps() {
        let taps = vec![0.1, 0.2, 0.4, 0.2, 0.1];
        let mut filter = FirFilter::new(taps.clone()).unwrap();
        let mut impulse = vec![0.0; 5];
        impulse[0] = 1.0;
        assert_eq!(filter.process(&impulse), taps);

        filter.reset();
        assert_eq!(filter.process(&impulse), taps);
    }

    #[test]
    fn test_designed_lowpass_passes_low_tones() {
        let spec = DesiredResponseSpec::lowpass(512, 1000.0, 3.0, 100.0, 150.0);
        let mask = desired_response(&spec).unwrap();
        let taps = design_ls(63, mask.view(), None).unwrap();
        let mut filter = FirFilter::new(taps).unwrap();

        let amplitude = |filter: &mut FirFilter, freq: f64| {
            filter.reset();
            let signal: Vec<f64> = (0..2000).map(|n| (2.0 * PI * freq * n as f64 / 1000.0).sin()).collect();
            let output = filter.process(&signal);
            output[1000..].iter().fold(0.0_f64, |m, x| m.max(x.abs()))
        };

        assert!((amplitude(&mut filter, 20.0) - 1.0).abs() < 0.1);
        assert!(amplitude(&mut filter, 300.0) < 0.1);
    }

    #[test]
    fn test_invalid_taps() {
        assert!(FirFilter::new(vec![]).is_err());
        assert!(FirFilter::new(vec![1.0, f64::INFINITY]).is_err());
    }
}
