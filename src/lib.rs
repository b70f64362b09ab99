//! Filter-Designer: digital filter coefficient design
//!
//! This library computes coefficients for discrete-time filters. It features:
//!
//! - Transfer functions from explicit pole/zero placement, with a stability check
//! - Desired magnitude-response masks for lowpass, highpass, bandpass and bandstop designs
//! - Least-squares and weighted least-squares linear-phase FIR fitting
//! - Second-order notch sections
//! - Frequency-response evaluation and sample-by-sample filters for checking designs
//! - TOML configuration with environment overrides
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use filter_designer::design::{design_ls, design_notch, desired_response, DesiredResponseSpec};
//!
//! fn main() -> Result<(), filter_designer::DesignError> {
//!     // 1000-point lowpass mask, 2 Hz sampling, 40 dB stopband
//!     let spec = DesiredResponseSpec::lowpass(1000, 2.0, 2.0, 0.2, 0.3);
//!     let mask = desired_response(&spec)?;
//!     let taps = design_ls(31, mask.view(), None)?;
//!     println!("{} taps", taps.len());
//!
//!     // 60 Hz notch at 500 Hz sampling
//!     let notch = design_notch(60.0, 500.0, 2.0)?;
//!     assert!(!notch.is_unstable());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod design;
pub mod error;
pub mod filters;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigLoader, DesignConfig};
pub use design::{
    design_ls, design_ls_batch, design_notch, design_wls, desired_response, frequency_response,
    is_unstable, roots_to_transfer_function, DesiredResponseSpec, FilterBand, TransferFunction,
};
pub use error::{DesignError, DesignResult, DesignStage, ErrorContext};
pub use filters::{FirFilter, IirFilter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Digital filter coefficient design".to_string(),
        features: vec![
            "Pole-zero synthesis".to_string(),
            "Desired-response masks".to_string(),
            "Least-squares FIR design".to_string(),
            "Notch sections".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
