// src/design/poles_zeros.rs
//! Pole-zero placement and stability checking
//!
//! Transfer functions are expanded from explicit root locations with complex
//! arithmetic and returned as real coefficient sequences. Roots are found as the
//! eigenvalues of the polynomial's companion matrix.

use super::TransferFunction;
use crate::config::constants::design::{CONJUGATE_TOLERANCE, IMAGINARY_RESIDUE_TOLERANCE};
use crate::error::{DesignErrorBuilder, DesignResult, DesignStage};
use crate::utils::validation::ParameterValidator;
use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::{debug, warn};

const COMPONENT: &str = "poles_zeros";

/// Expand `∏(x - r_i)` into polynomial coefficients, lowest power first
pub fn polynomial_from_roots(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i + 1] += c;
            next[i] -= root * c;
        }
        coeffs = next;
    }
    coeffs
}

/// Roots of a real polynomial given highest power first
///
/// Fails if the leading coefficient is zero. A constant polynomial has no roots.
pub fn polynomial_roots(coeffs: &[f64]) -> DesignResult<Vec<Complex64>> {
    if coeffs.len() < 2 {
        return Ok(Vec::new());
    }
    if coeffs[0] == 0.0 {
        return Err(DesignErrorBuilder::new(COMPONENT, "polynomial_roots")
            .design_failure(DesignStage::RootFinding, "leading coefficient must be non-zero"));
    }
    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(DesignErrorBuilder::new(COMPONENT, "polynomial_roots")
            .design_failure(DesignStage::RootFinding, "coefficients must be finite"));
    }

    let roots = companion(coeffs).complex_eigenvalues();
    Ok(roots.iter().copied().collect())
}

fn companion(coeffs: &[f64]) -> DMatrix<f64> {
    let n = coeffs.len() - 1;
    let lead = coeffs[0];
    DMatrix::from_fn(n, n, |i, j| {
        if i == 0 {
            -coeffs[j + 1] / lead
        } else if i == j + 1 {
            1.0
        } else {
            0.0
        }
    })
}

/// Build transfer function coefficients from pole and zero locations
///
/// Roots are expected in conjugate pairs; the imaginary part of the expanded
/// coefficients is discarded (a warning is logged when it is not negligible).
/// With no roots at all the result is the pure gain `b = [gain]`, `a = [1]`.
pub fn roots_to_transfer_function(
    poles: &[Complex64],
    zeros: &[Complex64],
    gain: f64,
) -> DesignResult<TransferFunction> {
    let validator = ParameterValidator::new(COMPONENT, "roots_to_transfer_function");
    validator.finite("gain", gain)?;
    if poles.iter().any(|p| !p.re.is_finite() || !p.im.is_finite()) {
        return Err(validator.reject("poles", "pole locations must be finite"));
    }
    if zeros.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(validator.reject("zeros", "zero locations must be finite"));
    }

    let order = poles.len().max(zeros.len());
    if order == 0 {
        debug!(gain, "pure gain transfer function");
        return Ok(TransferFunction { b: vec![gain], a: vec![1.0] });
    }
    if zeros.len() > poles.len() {
        return Err(validator.reject(
            "zeros",
            &format!(
                "{} zeros but only {} poles gives an improper transfer function",
                zeros.len(),
                poles.len()
            ),
        ));
    }

    let mut b = highest_power_first(&polynomial_from_roots(zeros), order);
    let mut a = highest_power_first(&polynomial_from_roots(poles), order);

    let lead = a[0];
    for c in b.iter_mut() {
        *c = *c * gain / lead;
    }
    for c in a.iter_mut() {
        *c /= lead;
    }

    if b.iter().chain(a.iter()).any(|c| !c.re.is_finite() || !c.im.is_finite()) {
        return Err(DesignErrorBuilder::new(COMPONENT, "roots_to_transfer_function")
            .info("order", order.to_string())
            .design_failure(DesignStage::RootExpansion, "expanded coefficients overflow"));
    }

    let residue = b.iter().chain(a.iter()).map(|c| c.im.abs()).fold(0.0, f64::max);
    let scale = b.iter().chain(a.iter()).map(|c| c.re.abs()).fold(1.0, f64::max);
    if residue > IMAGINARY_RESIDUE_TOLERANCE * scale {
        warn!(residue, "discarding imaginary coefficient residue; roots are not conjugate-paired");
    }

    let tf = TransferFunction {
        b: b.iter().map(|c| c.re).collect(),
        a: a[1..].iter().map(|c| c.re).collect(),
    };
    debug!(order, poles = poles.len(), zeros = zeros.len(), "expanded roots to transfer function");
    Ok(tf)
}

/// Same as [`roots_to_transfer_function`], rejecting root sets that are not conjugate-paired
pub fn roots_to_transfer_function_checked(
    poles: &[Complex64],
    zeros: &[Complex64],
    gain: f64,
) -> DesignResult<TransferFunction> {
    validate_conjugate_pairs("poles", poles)?;
    validate_conjugate_pairs("zeros", zeros)?;
    roots_to_transfer_function(poles, zeros, gain)
}

/// Check that every complex root has a matching conjugate
pub fn validate_conjugate_pairs(parameter: &str, roots: &[Complex64]) -> DesignResult<()> {
    let mut matched = vec![false; roots.len()];
    for i in 0..roots.len() {
        if matched[i] {
            continue;
        }
        let root = roots[i];
        let tolerance = CONJUGATE_TOLERANCE * root.norm().max(1.0);
        matched[i] = true;
        if root.im.abs() <= tolerance {
            continue;
        }
        let partner = (i + 1..roots.len())
            .find(|&j| !matched[j] && (roots[j] - root.conj()).norm() <= tolerance);
        match partner {
            Some(j) => matched[j] = true,
            None => {
                return Err(ParameterValidator::new(COMPONENT, "validate_conjugate_pairs").reject(
                    parameter,
                    &format!("root {} has no conjugate partner", root),
                ));
            }
        }
    }
    Ok(())
}

/// True if the denominator has a root outside the unit circle
///
/// `denominator_tail` excludes the leading 1. A root of magnitude exactly 1 counts
/// as stable. Non-finite coefficients are reported as unstable.
pub fn is_unstable(denominator_tail: &[f64]) -> bool {
    let coeffs: Vec<f64> = std::iter::once(1.0).chain(denominator_tail.iter().copied()).collect();
    match polynomial_roots(&coeffs) {
        Ok(roots) => {
            let largest = roots.iter().map(|r| r.norm()).fold(0.0, f64::max);
            largest > 1.0
        }
        Err(_) => true,
    }
}

fn highest_power_first(coeffs: &[Complex64], order: usize) -> Vec<Complex64> {
    let mut padded = coeffs.to_vec();
    padded.resize(order + 1, Complex64::new(0.0, 0.0));
    padded.reverse();
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn test_polynomial_from_roots() {
        let coeffs = polynomial_from_roots(&[Complex64::new(1.0, 0.0), Complex64::new(2.0, 0.0)]);
        let re: Vec<f64> = coeffs.iter().map(|c| c.re).collect();
        assert_close(&re, &[2.0, -3.0, 1.0]);
    }

    #[test]
    fn test_polynomial_roots() {
        let mut roots: Vec<f64> = polynomial_roots(&[1.0, -3.0, 2.0])
            .unwrap()
            .iter()
            .map(|r| r.re)
            .collect();
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((roots[0] - 1.0).abs() < 1e-9);
        assert!((roots[1] - 2.0).abs() < 1e-9);

        assert!(polynomial_roots(&[3.0]).unwrap().is_empty());
        assert!(polynomial_roots(&[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_gain_only() {
        let tf = roots_to_transfer_function(&[], &[], 5.0).unwrap();
        assert_eq!(tf.b, vec![5.0]);
        assert_eq!(tf.a, vec![1.0]);
    }

    #[test]
    fn test_conjugate_pair_expansion() {
        let r = 0.9;
        let w = PI / 4.0;
        let p = Complex64::from_polar(r, w);
        let z = Complex64::from_polar(1.0, w);
        let tf = roots_to_transfer_function(&[p, p.conj()], &[z, z.conj()], 2.0).unwrap();

        assert_close(&tf.b, &[2.0, -4.0 * w.cos(), 2.0]);
        assert_close(&tf.a, &[-2.0 * r * w.cos(), r * r]);
        assert_eq!(tf.b.len(), tf.a.len() + 1);
    }

    #[test]
    fn test_fewer_zeros_pads_high_order_side() {
        let tf = roots_to_transfer_function(
            &[Complex64::new(0.5, 0.0), Complex64::new(-0.25, 0.0)],
            &[Complex64::new(1.0, 0.0)],
            1.0,
        )
        .unwrap();
        assert_close(&tf.b, &[0.0, 1.0, -1.0]);
        assert_close(&tf.a, &[-0.25, -0.125]);
    }

    #[test]
    fn test_overflowing_expansion_fails() {
        let huge = vec![Complex64::new(1e200, 0.0); 2];
        let err = roots_to_transfer_function(&huge, &[], 1.0).unwrap_err();
        assert!(err.is_design_failure());
    }

    #[test]
    fn test_more_zeros_than_poles_is_rejected() {
        let err = roots_to_transfer_function(&[], &[Complex64::new(0.5, 0.0)], 1.0).unwrap_err();
        assert!(err.is_invalid_specification());
    }

    #[test]
    fn test_unpaired_roots_keep_real_part() {
        let p = Complex64::new(0.0, 0.5);
        let tf = roots_to_transfer_function(&[p], &[], 1.0).unwrap();
        // x - 0.5j, imaginary part discarded
        assert_close(&tf.b, &[0.0, 1.0]);
        assert_close(&tf.a, &[0.0]);

        assert!(roots_to_transfer_function_checked(&[p], &[], 1.0).is_err());
    }

    #[test]
    fn test_validate_conjugate_pairs() {
        let z = Complex64::new(0.3, 0.4);
        assert!(validate_conjugate_pairs("poles", &[z, Complex64::new(0.2, 0.0), z.conj()]).is_ok());
        assert!(validate_conjugate_pairs("poles", &[z, z]).is_err());
        assert!(validate_conjugate_pairs("poles", &[]).is_ok());
    }

    #[test]
    fn test_is_unstable() {
        assert!(!is_unstable(&[-0.5]));
        assert!(is_unstable(&[-1.5]));
        assert!(!is_unstable(&[0.0, 0.81]));
        assert!(is_unstable(&[0.0, 1.21]));
        assert!(!is_unstable(&[]));
        assert!(is_unstable(&[f64::NAN]));
    }
}
