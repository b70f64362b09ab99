// src/filters/iir.rs
//! IIR (Infinite Impulse Response) digital filters

use crate::design::TransferFunction;
use crate::error::DesignResult;
use crate::utils::validation::ParameterValidator;

/// IIR filter in direct form I
#[derive(Debug, Clone)]
pub struct IirFilter {
    b: Vec<f64>,
    a: Vec<f64>, // full denominator, a[0] == 1
    x_history: Vec<f64>,
    y_history: Vec<f64>,
}

impl IirFilter {
    /// Create filter from a designed transfer function
    pub fn new(tf: &TransferFunction) -> DesignResult<Self> {
        Self::from_coefficients(tf.b.clone(), tf.denominator())
    }

    /// Create filter from numerator and full denominator coefficients
    pub fn from_coefficients(b: Vec<f64>, a: Vec<f64>) -> DesignResult<Self> {
        let validator = ParameterValidator::new("iir_filter", "from_coefficients");
        if b.is_empty() {
            return Err(validator.reject("b", "numerator must not be empty"));
        }
        match a.first() {
            None => return Err(validator.reject("a", "denominator must not be empty")),
            Some(&lead) if lead == 0.0 => {
                return Err(validator.reject("a", "leading denominator coefficient must be non-zero"))
            }
            Some(_) => {}
        }
        for &c in b.iter().chain(a.iter()) {
            validator.finite("coefficients", c)?;
        }

        Ok(Self {
            x_history: vec![0.0; b.len()],
            y_history: vec![0.0; a.len()],
            b,
            a,
        })
    }

    /// Process single sample
    pub fn process_sample(&mut self, input: f64) -> f64 {
        self.x_history.rotate_right(1);
        self.x_history[0] = input;

        let mut output: f64 = self.b.iter().zip(&self.x_history).map(|(b, x)| b * x).sum();

        // y_history[i - 1] holds y[n - i]
        for i in 1..self.a.len() {
            output -= self.a[i] * self.y_history[i - 1];
        }
        output /= self.a[0];

        self.y_history.rotate_right(1);
        self.y_history[0] = output;

        output
    }

    /// Process a block of samples
    pub fn process(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.x_history.fill(0.0);
        self.y_history.fill(0.0);
    }

    /// Get filter order
    pub fn order(&self) -> usize {
        self.a.len().max(self.b.len()) - 1
    }
}
