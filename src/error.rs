// src/error.rs
//! Unified error handling for filter design
//!
//! Every design operation reports failures through [`DesignError`]. Errors carry an
//! [`ErrorContext`] naming the component and operation that raised them so that a
//! failing parameter can be traced back through a chain of design calls.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Unified error type for the filter design core
#[derive(Error, Debug, Clone)]
pub enum DesignError {
    /// Malformed or out-of-range design parameters
    #[error("[INPUT] Invalid specification for `{parameter}`: {reason} ({context})")]
    InvalidSpecification {
        /// Offending parameter name
        parameter: String,
        /// What was wrong with it
        reason: String,
        /// Where it was rejected
        context: ErrorContext,
    },

    /// The numerical design could not be completed
    #[error("[DESIGN] {stage} failure: {reason} ({context})")]
    DesignFailure {
        /// Stage that failed
        stage: DesignStage,
        /// Failure description
        reason: String,
        /// Where it failed
        context: ErrorContext,
    },

    /// Configuration bundle errors
    #[error("[CONFIG] Configuration error in {component}: {reason} ({context})")]
    Configuration {
        /// Configuration section or loader component
        component: String,
        /// Failure description
        reason: String,
        /// Where it was raised
        context: ErrorContext,
    },
}

/// Numerical stages for failure tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignStage {
    /// Multiplying out poles and zeros
    RootExpansion,
    /// Companion matrix eigenvalues
    RootFinding,
    /// Desired-response mask assembly
    ResponseMask,
    /// Unweighted normal equations
    LeastSquares,
    /// Weighted normal equations
    WeightedLeastSquares,
    /// FFT evaluation of a transfer function
    FrequencyResponse,
}

impl fmt::Display for DesignStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DesignStage::RootExpansion => "root expansion",
            DesignStage::RootFinding => "root finding",
            DesignStage::ResponseMask => "response mask",
            DesignStage::LeastSquares => "least squares",
            DesignStage::WeightedLeastSquares => "weighted least squares",
            DesignStage::FrequencyResponse => "frequency response",
        };
        f.write_str(name)
    }
}

/// Error context for debugging and analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// Module that raised the error
    pub component: String,
    /// Operation within the component
    pub operation: String,
    /// Source file, when built with [`error_context!`]
    pub file: Option<&'static str>,
    /// Source line, when built with [`error_context!`]
    pub line: Option<u32>,
    /// Free-form diagnostic values
    pub additional_info: HashMap<String, String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            file: None,
            line: None,
            additional_info: HashMap::new(),
        }
    }

    /// Create error context with file and line information
    pub fn with_location(component: &str, operation: &str, file: &'static str, line: u32) -> Self {
        let mut context = Self::new(component, operation);
        context.file = Some(file);
        context.line = Some(line);
        context
    }

    /// Add additional information to the context
    pub fn add_info<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.component, self.operation)?;
        if let (Some(file), Some(line)) = (self.file, self.line) {
            write!(f, " at {}:{}", file, line)?;
        }
        Ok(())
    }
}

/// Macro for creating error context with file and line info
#[macro_export]
macro_rules! error_context {
    ($component:expr, $operation:expr) => {
        $crate::error::ErrorContext::with_location($component, $operation, file!(), line!())
    };
}

impl DesignError {
    /// Context attached to this error
    pub fn context(&self) -> &ErrorContext {
        match self {
            DesignError::InvalidSpecification { context, .. }
            | DesignError::DesignFailure { context, .. }
            | DesignError::Configuration { context, .. } => context,
        }
    }

    /// True for malformed-input errors
    pub fn is_invalid_specification(&self) -> bool {
        matches!(self, DesignError::InvalidSpecification { .. })
    }

    /// True for numerical failures
    pub fn is_design_failure(&self) -> bool {
        matches!(self, DesignError::DesignFailure { .. })
    }
}

/// Result type alias for design operations
pub type DesignResult<T> = Result<T, DesignError>;

/// Error builder for convenient error construction
pub struct DesignErrorBuilder {
    context: ErrorContext,
}

impl DesignErrorBuilder {
    /// Builder with a plain context for `component::operation`
    pub fn new(component: &str, operation: &str) -> Self {
        Self::at(ErrorContext::new(component, operation))
    }

    /// Start from an existing context, usually one built with [`error_context!`]
    pub fn at(context: ErrorContext) -> Self {
        Self { context }
    }

    /// Attach a key/value pair to the error context
    pub fn info<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.context = self.context.add_info(key, value);
        self
    }

    /// Malformed input error for `parameter`
    pub fn invalid_specification(self, parameter: &str, reason: &str) -> DesignError {
        DesignError::InvalidSpecification {
            parameter: parameter.to_string(),
            reason: reason.to_string(),
            context: self.context,
        }
    }

    /// Numerical failure at `stage`
    pub fn design_failure(self, stage: DesignStage, reason: &str) -> DesignError {
        DesignError::DesignFailure {
            stage,
            reason: reason.to_string(),
            context: self.context,
        }
    }

    /// Configuration error for the context's component
    pub fn configuration(self, reason: &str) -> DesignError {
        DesignError::Configuration {
            component: self.context.component.clone(),
            reason: reason.to_string(),
            context: self.context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_creation() {
        let context = ErrorContext::new("least_squares", "design_ls");
        assert_eq!(context.component, "least_squares");
        assert_eq!(context.operation, "design_ls");
        assert!(context.file.is_none());
    }

    #[test]
    fn test_error_context_macro_records_location() {
        let context = error_context!("notch", "design_notch");
        assert_eq!(context.file, Some(file!()));
        assert!(context.line.is_some());
        assert!(context.to_string().starts_with("notch::design_notch at "));
    }

    #[test]
    fn test_error_builder() {
        let err = DesignErrorBuilder::new("desired_response", "lowpass")
            .invalid_specification("pass_edge", "must not exceed the stop edge");

        match &err {
            DesignError::InvalidSpecification { parameter, reason, context } => {
                assert_eq!(parameter, "pass_edge");
                assert_eq!(reason, "must not exceed the stop edge");
                assert_eq!(context.operation, "lowpass");
            }
            _ => panic!("Expected invalid specification error"),
        }
        assert!(err.is_invalid_specification());
        assert!(!err.is_design_failure());
    }

    #[test]
    fn test_error_display() {
        let err = DesignErrorBuilder::new("least_squares", "design_ls")
            .design_failure(DesignStage::LeastSquares, "normal matrix is singular");

        let display = format!("{}", err);
        assert!(display.contains("least squares failure"));
        assert!(display.contains("singular"));
        assert!(display.contains("least_squares::design_ls"));
    }

    #[test]
    fn test_additional_info() {
        let context = ErrorContext::new("c", "o").add_info("samples", "4");
        assert_eq!(context.additional_info.get("samples").map(String::as_str), Some("4"));

        let err = DesignErrorBuilder::at(error_context!("c", "o"))
            .info("order", "7")
            .configuration("bad");
        assert_eq!(err.context().additional_info.get("order").map(String::as_str), Some("7"));
        assert!(err.context().line.is_some());
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DesignError>();
    }
}
