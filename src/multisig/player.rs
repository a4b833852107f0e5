//! Threshold-committee bookkeeping shared across key generation,
//! precomputation, and signing (`spec.md` §4.10, §5).

use crate::algebra::{lagrange_coefficients_at_zero, Scalar};
use crate::error::{Result, SparkError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdConfig {
    pub threshold: u32,
    pub num_players: u32,
}

impl ThresholdConfig {
    pub fn new(threshold: u32, num_players: u32) -> Result<Self> {
        if threshold == 0 || threshold > num_players {
            return Err(SparkError::OutOfRange(
                "threshold must be in 1..=num_players".into(),
            ));
        }
        Ok(ThresholdConfig {
            threshold,
            num_players,
        })
    }
}

/// Lagrange coefficients `λ_α(0)` for a signer set `I`, in the same order as
/// `signer_ids`. Thin wrapper so `keygen`/`sign` call sites don't re-derive
/// the indices-to-coefficients mapping independently.
pub fn lagrange_for(signer_ids: &[u32]) -> Result<Vec<Scalar>> {
    lagrange_coefficients_at_zero(signer_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_threshold_above_committee_size() {
        assert!(ThresholdConfig::new(4, 3).is_err());
        assert!(ThresholdConfig::new(0, 3).is_err());
        assert!(ThresholdConfig::new(2, 3).is_ok());
    }
}
