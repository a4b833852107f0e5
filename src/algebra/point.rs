//! Curve points in the Ristretto encoding of the Ed25519 / curve25519 group.
//!
//! Ristretto gives a clean prime-order group of order ℓ without cofactor
//! bookkeeping, which is what `spec.md` §1/§6 mean by "the Ed25519 group" —
//! the same choice the `frost-ristretto255` crate in this retrieval pack
//! makes for the same reason.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::traits::{Identity, VartimeMultiscalarMul};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::hash::hash_to_point as hash_to_point_raw;
use crate::algebra::scalar::Scalar;
use crate::constants::POINT_NUM_BYTES;
use crate::error::{Result, SparkError};

#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point(pub(crate) RistrettoPoint);

impl Point {
    pub fn identity() -> Self {
        Point(RistrettoPoint::identity())
    }

    /// The standard Ristretto basepoint, exposed for callers that want a
    /// nothing-up-my-sleeve base distinct from the protocol's `F`/`G`/`H`/`U`.
    pub fn basepoint() -> Self {
        Point(RISTRETTO_BASEPOINT_POINT)
    }

    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Point(RistrettoPoint::random(rng))
    }

    /// Hashes a label and a sequence of encoded inputs onto the curve, per
    /// `spec.md` §6's `hash_to_point(label, …) -> Point`.
    pub fn hash_to_point(label: &[u8], parts: &[&[u8]]) -> Self {
        hash_to_point_raw(label, parts)
    }

    pub fn to_bytes(&self) -> [u8; POINT_NUM_BYTES] {
        self.0.compress().to_bytes()
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != POINT_NUM_BYTES {
            return Err(SparkError::ShapeMismatch(format!(
                "expected {POINT_NUM_BYTES} bytes for a point, got {}",
                bytes.len()
            )));
        }
        let mut buf = [0u8; POINT_NUM_BYTES];
        buf.copy_from_slice(bytes);
        CompressedRistretto(buf)
            .decompress()
            .map(Point)
            .ok_or_else(|| SparkError::OutOfRange("point is not a valid curve encoding".into()))
    }

    /// Computes `Σ scalars[i] · points[i]` using a multi-scalar multiplication,
    /// per `spec.md` §6's `multiexp(scalars, points) -> Point`.
    pub fn multiexp(scalars: &[Scalar], points: &[Point]) -> Result<Self> {
        if scalars.len() != points.len() {
            return Err(SparkError::ShapeMismatch(format!(
                "multiexp: {} scalars but {} points",
                scalars.len(),
                points.len()
            )));
        }
        let dalek_scalars = scalars.iter().map(|s| s.0);
        let dalek_points = points.iter().map(|p| p.0);
        Ok(Point(RistrettoPoint::vartime_multiscalar_mul(
            dalek_scalars,
            dalek_points,
        )))
    }
}

impl From<RistrettoPoint> for Point {
    fn from(p: RistrettoPoint) -> Self {
        Point(p)
    }
}

impl From<Point> for RistrettoPoint {
    fn from(p: Point) -> Self {
        p.0
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.0 += rhs.0;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point(-self.0)
    }
}

impl Mul<Scalar> for Point {
    type Output = Point;
    fn mul(self, rhs: Scalar) -> Point {
        Point(self.0 * rhs.0)
    }
}

impl Mul<Point> for Scalar {
    type Output = Point;
    fn mul(self, rhs: Point) -> Point {
        Point(self.0 * rhs.0)
    }
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point({})", hex::encode(self.to_bytes()))
    }
}
