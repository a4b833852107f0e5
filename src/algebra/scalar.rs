//! Scalars modulo the Ristretto/Ed25519 group order ℓ.
//!
//! Thin newtype over `curve25519_dalek::scalar::Scalar` so the rest of the
//! crate can refer to "the scalar field" by one name, the way the teacher
//! (`aptos-dkg`) wraps `blstrs::Scalar` behind its own module boundaries.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use curve25519_dalek::scalar::Scalar as DalekScalar;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::algebra::hash::hash_to_scalar as hash_to_scalar_raw;
use crate::constants::SCALAR_NUM_BYTES;
use crate::error::{Result, SparkError};

#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct Scalar(pub(crate) DalekScalar);

impl Scalar {
    pub fn zero() -> Self {
        Scalar(DalekScalar::ZERO)
    }

    pub fn one() -> Self {
        Scalar(DalekScalar::ONE)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == DalekScalar::ZERO
    }

    /// Samples a uniform, nonzero scalar. Every call draws fresh randomness;
    /// per `spec.md` §5, nonces and witnesses must never be reused.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let s = DalekScalar::random(rng);
            if s != DalekScalar::ZERO {
                return Scalar(s);
            }
        }
    }

    /// Builds a scalar from a little-endian `u64`, useful for representing
    /// small integers (player indices, coin values) in the scalar field.
    pub fn from_u64(v: u64) -> Self {
        Scalar(DalekScalar::from(v))
    }

    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(SparkError::InvalidWitness(
                "cannot invert the zero scalar".into(),
            ));
        }
        Ok(Scalar(self.0.invert()))
    }

    /// Computes `self^exp` via square-and-multiply. Used for the Chaum-style
    /// proofs' `c^(i+1)` challenge powers.
    pub fn pow(&self, exp: u64) -> Self {
        let mut result = DalekScalar::ONE;
        let mut base = self.0;
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result *= base;
            }
            base *= base;
            e >>= 1;
        }
        Scalar(result)
    }

    pub fn to_bytes(&self) -> [u8; SCALAR_NUM_BYTES] {
        self.0.to_bytes()
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SCALAR_NUM_BYTES {
            return Err(SparkError::ShapeMismatch(format!(
                "expected {SCALAR_NUM_BYTES} bytes for a scalar, got {}",
                bytes.len()
            )));
        }
        let mut buf = [0u8; SCALAR_NUM_BYTES];
        buf.copy_from_slice(bytes);
        let candidate = DalekScalar::from_canonical_bytes(buf);
        if candidate.is_some().into() {
            Ok(Scalar(candidate.unwrap()))
        } else {
            Err(SparkError::OutOfRange(
                "scalar encoding is not canonical".into(),
            ))
        }
    }

    /// Hashes a label and a sequence of encoded inputs to a scalar, per
    /// `spec.md` §6's `hash_to_scalar(label, …) -> Scalar`.
    pub fn hash_to_scalar(label: &[u8], parts: &[&[u8]]) -> Self {
        hash_to_scalar_raw(label, parts)
    }
}

impl From<DalekScalar> for Scalar {
    fn from(s: DalekScalar) -> Self {
        Scalar(s)
    }
}

impl From<Scalar> for DalekScalar {
    fn from(s: Scalar) -> Self {
        s.0
    }
}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 + rhs.0)
    }
}

impl AddAssign for Scalar {
    fn add_assign(&mut self, rhs: Scalar) {
        self.0 += rhs.0;
    }
}

impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 - rhs.0)
    }
}

impl SubAssign for Scalar {
    fn sub_assign(&mut self, rhs: Scalar) {
        self.0 -= rhs.0;
    }
}

impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 * rhs.0)
    }
}

impl MulAssign for Scalar {
    fn mul_assign(&mut self, rhs: Scalar) {
        self.0 *= rhs.0;
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar(-self.0)
    }
}

impl Sum for Scalar {
    fn sum<I: Iterator<Item = Scalar>>(iter: I) -> Self {
        iter.fold(Scalar::zero(), |a, b| a + b)
    }
}

impl std::fmt::Debug for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scalar({})", hex::encode(self.to_bytes()))
    }
}
