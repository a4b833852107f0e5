//! Lagrange coefficients for threshold secret reconstruction and signing.
//!
//! Spark's multisig committee sizes are small (tens of players at most), so
//! these are computed directly from the player index set rather than via an
//! FFT evaluation domain the way the teacher's PVSS code does for its much
//! larger committees — same mathematical object, simpler implementation for
//! the scale this crate targets.

use crate::algebra::scalar::Scalar;
use crate::error::{Result, SparkError};

/// Computes `λ_i(0)` for every `i` in `indices`, where `λ_i` is the unique
/// degree-`|indices|-1` Lagrange basis polynomial that is `1` at `i` and `0`
/// at every other index in the set, evaluated at `x = 0`.
///
/// Indices are one-based player identifiers, per `spec.md` §5.
pub fn lagrange_coefficients_at_zero(indices: &[u32]) -> Result<Vec<Scalar>> {
    if indices.is_empty() {
        return Err(SparkError::ShapeMismatch(
            "cannot compute Lagrange coefficients for an empty index set".into(),
        ));
    }
    let xs: Vec<Scalar> = indices.iter().map(|&i| Scalar::from_u64(i as u64)).collect();

    let mut coeffs = Vec::with_capacity(xs.len());
    for (i, &xi) in xs.iter().enumerate() {
        let mut num = Scalar::one();
        let mut den = Scalar::one();
        for (j, &xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            // λ_i(0) = Π_{j≠i} (0 - x_j) / (x_i - x_j)
            num *= Scalar::zero() - xj;
            den *= xi - xj;
        }
        let den_inv = den.invert().map_err(|_| {
            SparkError::ShapeMismatch("duplicate player index in Lagrange index set".into())
        })?;
        coeffs.push(num * den_inv);
    }
    Ok(coeffs)
}
