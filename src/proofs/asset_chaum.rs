//! Aggregated asset-Chaum equality argument (`spec.md` §4.4, `asset_chaum`).
//!
//! Proves that a vector of Pedersen-style commitments `C[i] = x[i]·F +
//! y[i]·G + z·H` all share the same `H`-coefficient `z`, without revealing
//! any `x[i]`, `y[i]`, or `z`.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::{Point, Scalar};
use crate::constants::DOM_SEP_ASSET_CHAUM;
use crate::error::{Result, SparkError};
use crate::transcript::SparkTranscript;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetChaumStatement {
    pub f: Point,
    pub g: Point,
    pub h: Point,
    pub commitments: Vec<Point>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetChaumProof {
    pub a: Point,
    pub b: Point,
    pub tx: Scalar,
    pub ty: Scalar,
    pub tz: Scalar,
    pub ux: Scalar,
    pub uy: Scalar,
}

fn transcript_for(stmt: &AssetChaumStatement) -> Transcript {
    let mut t = Transcript::spark_new(DOM_SEP_ASSET_CHAUM);
    t.append_point(b"f", &stmt.f);
    t.append_point(b"g", &stmt.g);
    t.append_point(b"h", &stmt.h);
    t.append_points(b"commitments", &stmt.commitments);
    t
}

pub fn prove<R: RngCore + CryptoRng>(
    stmt: &AssetChaumStatement,
    x: &[Scalar],
    y: &[Scalar],
    z: Scalar,
    rng: &mut R,
) -> Result<AssetChaumProof> {
    let n = stmt.commitments.len();
    if n < 2 {
        return Err(SparkError::ShapeMismatch(
            "asset_chaum: need at least 2 commitments".into(),
        ));
    }
    if x.len() != n || y.len() != n {
        return Err(SparkError::ShapeMismatch(
            "asset_chaum: witness vectors must match commitment count".into(),
        ));
    }
    for i in 0..n {
        if stmt.commitments[i] != stmt.f * x[i] + stmt.g * y[i] + stmt.h * z {
            return Err(SparkError::InvalidWitness(format!(
                "asset_chaum: commitment {i} does not open under the given witness"
            )));
        }
    }

    let rx = Scalar::random(rng);
    let ry = Scalar::random(rng);
    let rz = Scalar::random(rng);
    let sx = Scalar::random(rng);
    let sy = Scalar::random(rng);

    let a = stmt.f * rx + stmt.g * ry + stmt.h * rz;
    let b = stmt.f * sx + stmt.g * sy;

    let mut t = transcript_for(stmt);
    t.append_point(b"a", &a);
    t.append_point(b"b", &b);
    let c = t.challenge_scalar(b"c");

    let tx = rx + c * x[0];
    let ty = ry + c * y[0];
    let tz = rz + c * z;

    let mut ux = sx;
    let mut uy = sy;
    for i in 1..n {
        let c_pow = c.pow(i as u64);
        ux += c_pow * (x[i] - x[0]);
        uy += c_pow * (y[i] - y[0]);
    }

    Ok(AssetChaumProof {
        a,
        b,
        tx,
        ty,
        tz,
        ux,
        uy,
    })
}

pub fn verify(stmt: &AssetChaumStatement, proof: &AssetChaumProof) -> Result<()> {
    let n = stmt.commitments.len();
    if n < 2 {
        return Err(SparkError::ShapeMismatch(
            "asset_chaum: need at least 2 commitments".into(),
        ));
    }

    let mut t = transcript_for(stmt);
    t.append_point(b"a", &proof.a);
    t.append_point(b"b", &proof.b);
    let c = t.challenge_scalar(b"c");

    let lhs1 = stmt.f * proof.tx + stmt.g * proof.ty + stmt.h * proof.tz;
    let rhs1 = stmt.commitments[0] * c + proof.a;
    if lhs1 != rhs1 {
        return Err(SparkError::VerificationFailed(
            "asset_chaum: representation of C[0] does not hold".into(),
        ));
    }

    let mut sum = Point::identity();
    for i in 1..n {
        let c_pow = c.pow(i as u64);
        sum += (stmt.commitments[i] - stmt.commitments[0]) * c_pow;
    }
    let lhs2 = stmt.f * proof.ux + stmt.g * proof.uy;
    let rhs2 = proof.b + sum;
    if lhs2 != rhs2 {
        return Err(SparkError::VerificationFailed(
            "asset_chaum: shared H-coefficient equality does not hold".into(),
        ));
    }
    Ok(())
}
