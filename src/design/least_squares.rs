// src/design/least_squares.rs
//! Least-squares design of linear-phase FIR filters
//!
//! The one-sided coefficients `h[0..L]` of a Type-I filter are fitted to the desired
//! amplitude sampled at `ω_i = π i / samples` by solving the normal equations with an
//! explicit inverse. The returned impulse response is the mirrored, odd-length
//! sequence `[h[L-1], …, h[1], h[0], h[1], …, h[L-1]]`.

use crate::error::{DesignErrorBuilder, DesignResult, DesignStage};
use crate::utils::validation::ParameterValidator;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;
use std::f64::consts::PI;
use tracing::debug;

const COMPONENT: &str = "least_squares";

/// Design a linear-phase FIR filter by least squares
///
/// With `weights` the weighted solver [`design_wls`] is used. Even orders are raised
/// to the next odd order.
pub fn design_ls(
    order: usize,
    desired: ArrayView1<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
) -> DesignResult<Vec<f64>> {
    if let Some(weights) = weights {
        return design_wls(order, desired, weights);
    }

    let problem = CosineBasis::new(order, desired, "design_ls", DesignStage::LeastSquares)?;
    let ft = problem.basis.transpose();
    let normal = &ft * &problem.basis;
    let inverse = problem.invert(normal)?;

    let h = (inverse * ft) * &problem.target;
    problem.finish(h)
}

/// Design a linear-phase FIR filter by weighted least squares
///
/// `weights` holds one non-negative emphasis value per frequency sample.
pub fn design_wls(
    order: usize,
    desired: ArrayView1<'_, f64>,
    weights: ArrayView1<'_, f64>,
) -> DesignResult<Vec<f64>> {
    if weights.len() != desired.len() {
        return Err(DesignErrorBuilder::new(COMPONENT, "design_wls").design_failure(
            DesignStage::WeightedLeastSquares,
            &format!("{} weights for {} frequency samples", weights.len(), desired.len()),
        ));
    }
    let validator = ParameterValidator::new(COMPONENT, "design_wls");
    for &w in weights.iter() {
        validator.non_negative("weights", w)?;
    }

    let problem = CosineBasis::new(order, desired, "design_wls", DesignStage::WeightedLeastSquares)?;

    // Fᵗ·W, scaling column i of Fᵗ by w_i
    let mut ftw = problem.basis.transpose();
    for (mut column, &w) in ftw.column_iter_mut().zip(weights.iter()) {
        column *= w;
    }
    let normal = &ftw * &problem.basis;
    let inverse = problem.invert(normal)?;

    let h = (inverse * ftw) * &problem.target;
    problem.finish(h)
}

/// Design several filters of the same order in parallel
pub fn design_ls_batch(order: usize, masks: &[Array1<f64>]) -> Vec<DesignResult<Vec<f64>>> {
    masks
        .par_iter()
        .map(|mask| design_ls(order, mask.view(), None))
        .collect()
}

/// Cosine basis of a Type-I linear-phase fit
struct CosineBasis {
    basis: DMatrix<f64>,
    target: DVector<f64>,
    unique: usize,
    operation: &'static str,
    stage: DesignStage,
}

impl CosineBasis {
    fn new(
        order: usize,
        desired: ArrayView1<'_, f64>,
        operation: &'static str,
        stage: DesignStage,
    ) -> DesignResult<Self> {
        let validator = ParameterValidator::new(COMPONENT, operation);
        for &d in desired.iter() {
            validator.finite("desired", d)?;
        }

        let order = if order % 2 == 0 { order + 1 } else { order };
        let unique = (order + 1) / 2;
        let samples = desired.len();
        if samples < unique {
            return Err(DesignErrorBuilder::new(COMPONENT, operation).design_failure(
                stage,
                &format!(
                    "{} frequency samples cannot determine {} coefficients",
                    samples, unique
                ),
            ));
        }

        let basis = DMatrix::from_fn(samples, unique, |i, k| {
            let omega = PI * i as f64 / samples as f64;
            let value = 2.0 * (omega * k as f64).cos();
            // DC tap is not paired
            if k == 0 {
                value / 2.0
            } else {
                value
            }
        });
        let target = DVector::from_iterator(samples, desired.iter().copied());

        debug!(operation, order, unique, samples, "built cosine basis");
        Ok(Self { basis, target, unique, operation, stage })
    }

    fn invert(&self, normal: DMatrix<f64>) -> DesignResult<DMatrix<f64>> {
        normal.try_inverse().ok_or_else(|| {
            DesignErrorBuilder::at(crate::error_context!(COMPONENT, self.operation))
                .info("samples", self.basis.nrows().to_string())
                .info("coefficients", self.unique.to_string())
                .design_failure(self.stage, "normal equations are singular")
        })
    }

    fn finish(&self, h: DVector<f64>) -> DesignResult<Vec<f64>> {
        if h.iter().any(|c| !c.is_finite()) {
            return Err(DesignErrorBuilder::new(COMPONENT, self.operation)
                .design_failure(self.stage, "solution is not finite; the system is ill-conditioned"));
        }
        let taps: Vec<f64> = h
            .iter()
            .rev()
            .take(self.unique - 1)
            .chain(h.iter())
            .copied()
            .collect();
        debug!(operation = self.operation, taps = taps.len(), "designed linear-phase FIR");
        Ok(taps)
    }
}
