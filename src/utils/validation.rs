// src/utils/validation.rs
//! Parameter validation shared by the design operations
//!
//! Checks run before any numerical work starts, so a failing call never returns a
//! partial result. Every failure is an `InvalidSpecification` tagged with the
//! component and operation that performed the check.

use crate::error::{DesignError, DesignErrorBuilder, DesignResult};

/// Validator bound to the component/operation that reports its failures
#[derive(Debug, Clone, Copy)]
pub struct ParameterValidator<'a> {
    component: &'a str,
    operation: &'a str,
}

impl<'a> ParameterValidator<'a> {
    /// Validator whose errors name `component::operation`
    pub fn new(component: &'a str, operation: &'a str) -> Self {
        Self { component, operation }
    }

    /// Build an `InvalidSpecification` error for `parameter`
    pub fn reject(&self, parameter: &str, reason: &str) -> DesignError {
        DesignErrorBuilder::new(self.component, self.operation).invalid_specification(parameter, reason)
    }

    /// Value must be a finite number
    pub fn finite(&self, parameter: &str, value: f64) -> DesignResult<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(self.reject(parameter, &format!("must be finite, got {}", value)))
        }
    }

    /// Value must be finite and >= 0
    pub fn non_negative(&self, parameter: &str, value: f64) -> DesignResult<()> {
        self.finite(parameter, value)?;
        if value < 0.0 {
            return Err(self.reject(parameter, &format!("must not be negative, got {}", value)));
        }
        Ok(())
    }

    /// Value must be finite and > 0
    pub fn positive(&self, parameter: &str, value: f64) -> DesignResult<()> {
        self.finite(parameter, value)?;
        if value <= 0.0 {
            return Err(self.reject(parameter, &format!("must be greater than zero, got {}", value)));
        }
        Ok(())
    }

    /// Value must not exceed `limit`
    pub fn at_most(&self, parameter: &str, value: f64, limit: f64, limit_name: &str) -> DesignResult<()> {
        if value > limit {
            return Err(self.reject(
                parameter,
                &format!("{} exceeds the {} of {}", value, limit_name, limit),
            ));
        }
        Ok(())
    }

    /// `lower` must not be greater than `upper`
    pub fn ordered(&self, lower: (&str, f64), upper: (&str, f64)) -> DesignResult<()> {
        if lower.1 > upper.1 {
            return Err(self.reject(
                lower.0,
                &format!("{} ({}) must not be greater than {} ({})", lower.0, lower.1, upper.0, upper.1),
            ));
        }
        Ok(())
    }
}
