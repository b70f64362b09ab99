// src/config/constants.rs
//! Design defaults and numerical tolerances

/// Filter design constants
pub mod design {
    /// Frequency samples in a default mask
    pub const DEFAULT_RESPONSE_SAMPLES: usize = 1024;
    /// Stopband level of 10^-2
    pub const DEFAULT_STOPBAND_DECADES: f64 = 2.0;
    /// Normalised sampling rate, so edges read as fractions of Nyquist
    pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 2.0;
    /// Default lowpass passband edge
    pub const DEFAULT_PASS_EDGE_HZ: f64 = 0.2;
    /// Default lowpass stopband edge
    pub const DEFAULT_STOP_EDGE_HZ: f64 = 0.3;

    /// Default least-squares tap count
    pub const DEFAULT_FIR_ORDER: usize = 31;
    /// Largest tap count accepted from configuration
    pub const MAX_FIR_ORDER: usize = 4095;

    /// Mains interference frequency
    pub const DEFAULT_NOTCH_CENTER_HZ: f64 = 60.0;
    /// Default notch sampling rate
    pub const DEFAULT_NOTCH_SAMPLE_RATE_HZ: f64 = 500.0;
    /// Default notch width
    pub const DEFAULT_NOTCH_BANDWIDTH_HZ: f64 = 2.0;

    /// Imaginary part tolerated in expanded coefficients, relative to the largest
    /// coefficient magnitude
    pub const IMAGINARY_RESIDUE_TOLERANCE: f64 = 1e-9;
    /// Conjugate matching tolerance, relative to max(|root|, 1)
    pub const CONJUGATE_TOLERANCE: f64 = 1e-9;
}

/// File system paths
pub mod paths {
    /// System-wide configuration file
    pub const SYSTEM_CONFIG_PATH: &str = "/etc/filter-designer/config.toml";
    /// Per-user configuration directory, relative to the home directory
    pub const USER_CONFIG_DIR: &str = ".config/filter-designer";
    /// Configuration file looked up in the working directory
    pub const LOCAL_CONFIG_FILE: &str = "filter_design.toml";
    /// Bundled default configuration
    pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
    /// Extension of configuration files
    pub const CONFIG_EXTENSION: &str = ".toml";
}

/// Environment overrides
pub mod env {
    /// Prefix of environment variables that override configuration keys
    pub const ENV_PREFIX: &str = "FILTER_DESIGN_";
}

/// Validation constants
pub mod validation {
    /// Configuration files larger than this are refused (1MB)
    pub const MAX_CONFIG_FILE_SIZE_BYTES: usize = 1_048_576;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_consistency() {
        assert!(design::DEFAULT_PASS_EDGE_HZ < design::DEFAULT_STOP_EDGE_HZ);
        assert!(design::DEFAULT_STOP_EDGE_HZ <= design::DEFAULT_SAMPLE_RATE_HZ / 2.0);
        assert!(design::DEFAULT_FIR_ORDER % 2 == 1);
        assert!(design::DEFAULT_FIR_ORDER <= design::MAX_FIR_ORDER);
        assert!((design::DEFAULT_FIR_ORDER + 1) / 2 <= design::DEFAULT_RESPONSE_SAMPLES);
    }

    #[test]
    fn test_notch_defaults() {
        assert!(design::DEFAULT_NOTCH_CENTER_HZ < design::DEFAULT_NOTCH_SAMPLE_RATE_HZ / 2.0);
        assert!(design::DEFAULT_NOTCH_BANDWIDTH_HZ > 0.0);
        assert!(design::DEFAULT_NOTCH_BANDWIDTH_HZ < design::DEFAULT_NOTCH_SAMPLE_RATE_HZ);
    }

    #[test]
    fn test_tolerances_are_small() {
        assert!(design::IMAGINARY_RESIDUE_TOLERANCE > 0.0 && design::IMAGINARY_RESIDUE_TOLERANCE < 1e-6);
        assert!(design::CONJUGATE_TOLERANCE > 0.0 && design::CONJUGATE_TOLERANCE < 1e-6);
        assert!(env::ENV_PREFIX.ends_with('_'));
    }
}
