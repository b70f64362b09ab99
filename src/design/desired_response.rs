// src/design/desired_response.rs
//! Desired magnitude-response masks
//!
//! A mask samples the target magnitude over the normalized frequency axis `[0, π)`.
//! Band edges are given in Hz and converted to sample counts proportionally to the
//! Nyquist frequency, truncating each count. Passbands are flat at 1, stopbands flat at
//! `10^(-stopband_decades)`, transitions are linear ramps.

use super::FilterBand;
use crate::config::constants::design as defaults;
use crate::error::{DesignErrorBuilder, DesignResult, DesignStage};
use crate::utils::validation::ParameterValidator;
use ndarray::{concatenate, Array1, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

const COMPONENT: &str = "desired_response";

/// Parameters of a desired-response mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredResponseSpec {
    /// Number of frequency samples in the mask
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Sampling frequency in Hz
    pub sample_rate: f64,

    /// Stopband attenuation in decades (`attenuation = 10^-stopband_decades`)
    #[serde(default = "default_stopband_decades")]
    pub stopband_decades: f64,

    /// Passband edge in Hz (centre frequency in bandwidth mode)
    pub pass_edge: f64,

    /// Stopband edge in Hz
    pub stop_edge: f64,

    /// Passband width in Hz; zero selects the explicit-edge bandpass layout
    #[serde(default)]
    pub bandwidth: f64,

    /// Upper passband edge in Hz (band designs only)
    #[serde(default)]
    pub pass_edge2: f64,

    /// Upper stopband edge in Hz (band designs only)
    #[serde(default)]
    pub stop_edge2: f64,

    /// Band layout of the mask
    pub band: FilterBand,
}

fn default_samples() -> usize {
    defaults::DEFAULT_RESPONSE_SAMPLES
}

fn default_stopband_decades() -> f64 {
    defaults::DEFAULT_STOPBAND_DECADES
}

impl Default for DesiredResponseSpec {
    fn default() -> Self {
        Self::lowpass(
            defaults::DEFAULT_RESPONSE_SAMPLES,
            defaults::DEFAULT_SAMPLE_RATE_HZ,
            defaults::DEFAULT_STOPBAND_DECADES,
            defaults::DEFAULT_PASS_EDGE_HZ,
            defaults::DEFAULT_STOP_EDGE_HZ,
        )
    }
}

impl DesiredResponseSpec {
    /// Lowpass passing up to `pass_edge` and attenuating from `stop_edge`
    pub fn lowpass(samples: usize, sample_rate: f64, stopband_decades: f64, pass_edge: f64, stop_edge: f64) -> Self {
        Self::edges(FilterBand::Lowpass, samples, sample_rate, stopband_decades, pass_edge, stop_edge)
    }

    /// Highpass attenuating up to `stop_edge` and passing from `pass_edge`
    pub fn highpass(samples: usize, sample_rate: f64, stopband_decades: f64, pass_edge: f64, stop_edge: f64) -> Self {
        Self::edges(FilterBand::Highpass, samples, sample_rate, stopband_decades, pass_edge, stop_edge)
    }

    /// Bandpass with explicit lower and upper edges
    pub fn bandpass(
        samples: usize,
        sample_rate: f64,
        stopband_decades: f64,
        (stop_edge, pass_edge): (f64, f64),
        (pass_edge2, stop_edge2): (f64, f64),
    ) -> Self {
        Self {
            pass_edge2,
            stop_edge2,
            ..Self::edges(FilterBand::Bandpass, samples, sample_rate, stopband_decades, pass_edge, stop_edge)
        }
    }

    /// Bandstop with explicit lower and upper edges
    pub fn bandstop(
        samples: usize,
        sample_rate: f64,
        stopband_decades: f64,
        (pass_edge, stop_edge): (f64, f64),
        (stop_edge2, pass_edge2): (f64, f64),
    ) -> Self {
        Self {
            pass_edge2,
            stop_edge2,
            ..Self::edges(FilterBand::Bandstop, samples, sample_rate, stopband_decades, pass_edge, stop_edge)
        }
    }

    /// Bandpass centred at `center` with a passband `bandwidth` Hz wide
    pub fn bandpass_centered(
        samples: usize,
        sample_rate: f64,
        stopband_decades: f64,
        center: f64,
        stop_edge: f64,
        bandwidth: f64,
    ) -> Self {
        Self {
            bandwidth,
            ..Self::edges(FilterBand::Bandpass, samples, sample_rate, stopband_decades, center, stop_edge)
        }
    }

    /// Bandstop centred at `center` with a stopband `bandwidth` Hz wide
    pub fn bandstop_centered(
        samples: usize,
        sample_rate: f64,
        stopband_decades: f64,
        center: f64,
        pass_edge: f64,
        bandwidth: f64,
    ) -> Self {
        Self {
            bandwidth,
            ..Self::edges(FilterBand::Bandstop, samples, sample_rate, stopband_decades, pass_edge, center)
        }
    }

    fn edges(
        band: FilterBand,
        samples: usize,
        sample_rate: f64,
        stopband_decades: f64,
        pass_edge: f64,
        stop_edge: f64,
    ) -> Self {
        Self {
            samples,
            sample_rate,
            stopband_decades,
            pass_edge,
            stop_edge,
            bandwidth: 0.0,
            pass_edge2: 0.0,
            stop_edge2: 0.0,
            band,
        }
    }

    /// Nyquist frequency in Hz
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Linear stopband level
    pub fn attenuation(&self) -> f64 {
        10f64.powf(-self.stopband_decades)
    }
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    name: &'static str,
    hz: f64,
}

/// Bandpass edge set; bandstop designs pass their edges with the roles swapped
#[derive(Debug, Clone, Copy)]
struct BandEdges {
    pass: Edge,
    stop: Edge,
    pass2: Edge,
    stop2: Edge,
    bandwidth: f64,
}

/// Mask sizing shared by every layout
#[derive(Debug, Clone, Copy)]
struct Grid {
    samples: i64,
    nyquist: f64,
    attenuation: f64,
}

impl Grid {
    /// Truncated sample count of a band `width_hz` wide
    fn count(&self, width_hz: f64) -> i64 {
        (self.samples as f64 * width_hz / self.nyquist).trunc() as i64
    }

    fn flat(&self, value: f64, count: i64) -> Array1<f64> {
        Array1::from_elem(count.max(0) as usize, value)
    }

    fn ramp(&self, start: f64, end: f64, count: i64) -> Array1<f64> {
        Array1::linspace(start, end, count.max(0) as usize)
    }
}

/// Build the sampled target magnitude response for `spec`
pub fn desired_response(spec: &DesiredResponseSpec) -> DesignResult<Array1<f64>> {
    let validator = ParameterValidator::new(COMPONENT, "desired_response");
    validate_common(spec, &validator)?;

    let grid = Grid {
        samples: spec.samples as i64,
        nyquist: spec.nyquist(),
        attenuation: spec.attenuation(),
    };

    let mask = match spec.band {
        FilterBand::Lowpass => lowpass(spec, &grid)?,
        FilterBand::Highpass => highpass(spec, &grid)?,
        FilterBand::Bandpass => {
            let edges = BandEdges {
                pass: Edge { name: "pass_edge", hz: spec.pass_edge },
                stop: Edge { name: "stop_edge", hz: spec.stop_edge },
                pass2: Edge { name: "pass_edge2", hz: spec.pass_edge2 },
                stop2: Edge { name: "stop_edge2", hz: spec.stop_edge2 },
                bandwidth: spec.bandwidth,
            };
            bandpass(&edges, &grid)?
        }
        FilterBand::Bandstop => {
            let edges = BandEdges {
                pass: Edge { name: "stop_edge", hz: spec.stop_edge },
                stop: Edge { name: "pass_edge", hz: spec.pass_edge },
                pass2: Edge { name: "stop_edge2", hz: spec.stop_edge2 },
                stop2: Edge { name: "pass_edge2", hz: spec.pass_edge2 },
                bandwidth: spec.bandwidth,
            };
            bandpass(&edges, &grid)?.mapv(|v| 1.0 - v)
        }
    };

    debug!(
        band = %spec.band,
        requested = spec.samples,
        produced = mask.len(),
        attenuation = grid.attenuation,
        "generated desired response"
    );
    Ok(mask)
}

fn validate_common(spec: &DesiredResponseSpec, validator: &ParameterValidator<'_>) -> DesignResult<()> {
    if spec.samples == 0 {
        return Err(validator.reject("samples", "at least one frequency sample is required"));
    }
    validator.positive("sample_rate", spec.sample_rate)?;
    validator.non_negative("stopband_decades", spec.stopband_decades)?;

    let nyquist = spec.nyquist();
    for (name, hz) in [
        ("pass_edge", spec.pass_edge),
        ("stop_edge", spec.stop_edge),
        ("pass_edge2", spec.pass_edge2),
        ("stop_edge2", spec.stop_edge2),
    ] {
        validator.non_negative(name, hz)?;
        validator.at_most(name, hz, nyquist, "Nyquist frequency")?;
    }
    validator.non_negative("bandwidth", spec.bandwidth)
}

fn lowpass(spec: &DesiredResponseSpec, grid: &Grid) -> DesignResult<Array1<f64>> {
    ParameterValidator::new(COMPONENT, "lowpass")
        .ordered(("pass_edge", spec.pass_edge), ("stop_edge", spec.stop_edge))?;

    let pass = grid.count(spec.pass_edge);
    let trans = grid.count(spec.stop_edge - spec.pass_edge);
    let stop = grid.samples - pass - trans;

    join(
        "lowpass",
        &[
            grid.flat(1.0, pass),
            grid.ramp(1.0, grid.attenuation, trans),
            grid.flat(grid.attenuation, stop),
        ],
    )
}

fn highpass(spec: &DesiredResponseSpec, grid: &Grid) -> DesignResult<Array1<f64>> {
    ParameterValidator::new(COMPONENT, "highpass")
        .ordered(("stop_edge", spec.stop_edge), ("pass_edge", spec.pass_edge))?;

    let stop = grid.count(spec.stop_edge);
    let trans = grid.count(spec.pass_edge - spec.stop_edge);
    let pass = grid.samples - stop - trans;

    join(
        "highpass",
        &[
            grid.flat(grid.attenuation, stop),
            grid.ramp(grid.attenuation, 1.0, trans),
            grid.flat(1.0, pass),
        ],
    )
}

fn bandpass(edges: &BandEdges, grid: &Grid) -> DesignResult<Array1<f64>> {
    if edges.bandwidth == 0.0 {
        bandpass_explicit(edges, grid)
    } else {
        bandpass_centered(edges, grid)
    }
}

fn bandpass_explicit(edges: &BandEdges, grid: &Grid) -> DesignResult<Array1<f64>> {
    let validator = ParameterValidator::new(COMPONENT, "bandpass");
    let BandEdges { pass, stop, pass2, stop2, .. } = *edges;

    if pass2.hz == 0.0 || stop2.hz == 0.0 {
        let missing = if pass2.hz == 0.0 { pass2.name } else { stop2.name };
        return Err(validator.reject(
            missing,
            "no parameters given for the second cut-off frequencies; give a bandwidth or both second edges",
        ));
    }
    validator.ordered((stop.name, stop.hz), (pass.name, pass.hz))?;
    validator.ordered((pass2.name, pass2.hz), (stop2.name, stop2.hz))?;
    validator.ordered((pass.name, pass.hz), (pass2.name, pass2.hz))?;

    let stop1_len = grid.count(stop.hz);
    let trans1_len = grid.count(pass.hz - stop.hz);
    let pass_len = grid.count(pass2.hz - pass.hz);
    let trans2_len = grid.count(stop2.hz - pass2.hz);
    let stop2_len = trailing_stopband(grid.samples - stop1_len - trans1_len - pass_len - trans2_len);

    join(
        "bandpass",
        &[
            grid.flat(grid.attenuation, stop1_len),
            grid.ramp(grid.attenuation, 1.0, trans1_len),
            grid.flat(1.0, pass_len),
            grid.ramp(1.0, grid.attenuation, trans2_len),
            grid.flat(grid.attenuation, stop2_len),
        ],
    )
}

fn bandpass_centered(edges: &BandEdges, grid: &Grid) -> DesignResult<Array1<f64>> {
    let validator = ParameterValidator::new(COMPONENT, "bandpass_centered");
    let center = edges.pass.hz;
    let stop = edges.stop;
    let half = edges.bandwidth / 2.0;
    let low = center - half;
    let high = center + half;

    if stop.hz >= low && stop.hz <= high {
        return Err(validator.reject(
            stop.name,
            &format!("{} Hz lies inside the passband [{}, {}] Hz", stop.hz, low, high),
        ));
    }
    if edges.bandwidth >= 2.0 * grid.nyquist {
        return Ok(grid.flat(1.0, grid.samples));
    }

    let trans = (stop.hz - high).max(low - stop.hz);
    let slope = (1.0 - grid.attenuation) / trans;

    let stop1_len = grid.count(low - trans).max(0);
    let trans1_len = if low - trans >= 0.0 {
        grid.count(trans)
    } else {
        grid.count(low).max(0)
    };
    let pass_len = grid
        .count(edges.bandwidth - (half - center).max(0.0))
        .min(grid.samples - trans1_len - stop1_len)
        .max(0);
    let trans2_len = grid
        .count(trans)
        .min(grid.samples - stop1_len - trans1_len - pass_len)
        .max(0);
    let stop2_len = trailing_stopband(grid.samples - stop1_len - trans1_len - pass_len - trans2_len);

    // Ramp ends follow the common slope so both transitions stay parallel.
    // A passband past either band edge would push the ramp end above unity.
    let start = (1.0 - low * slope).max(grid.attenuation).min(1.0);
    let end = (1.0 - (grid.nyquist - high) * slope).max(grid.attenuation).min(1.0);

    join(
        "bandpass_centered",
        &[
            grid.flat(grid.attenuation, stop1_len),
            grid.ramp(start, 1.0, trans1_len),
            grid.flat(1.0, pass_len),
            grid.ramp(1.0, end, trans2_len),
            grid.flat(grid.attenuation, stop2_len),
        ],
    )
}

/// Length of the upper stopband of a band design.
///
/// Only a non-positive remainder is kept and then floored at zero, so the upper
/// stopband is never filled and band masks can end short of the requested length.
fn trailing_stopband(remaining: i64) -> i64 {
    if remaining > 0 {
        debug!(shortfall = remaining, "band mask ends short of the requested sample count");
    }
    remaining.min(0).max(0)
}

fn join(operation: &str, segments: &[Array1<f64>]) -> DesignResult<Array1<f64>> {
    let views: Vec<_> = segments.iter().map(|s| s.view()).collect();
    concatenate(Axis(0), &views).map_err(|e| {
        DesignErrorBuilder::new(COMPONENT, operation).design_failure(DesignStage::ResponseMask, &e.to_string())
    })
}
