//! Modified Chaum proof (`spec.md` §4.5, `chaum`) — the heart of spend
//! authorization.
//!
//! Proves, for a context scalar `m` and row vectors `S`, `T` of length `n`,
//! simultaneous knowledge of `x, y, z` such that every row is a
//! representation `S[i] = x[i]·F + y[i]·G + z[i]·H` *and* satisfies the tag
//! equation `U = x[i]·T[i] + y[i]·G`, reusing `x[i]` across both equations.
//!
//! The verification equations are shared with `multisig::sign`, which
//! produces the same proof shape via a distributed protocol but starts its
//! challenge powers at `c^0` instead of `c^1` (`spec.md` §9) — see
//! [`verify_with_power_offset`].

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::{Point, Scalar};
use crate::constants::DOM_SEP_MODIFIED_CHAUM;
use crate::error::{Result, SparkError};
use crate::transcript::SparkTranscript;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaumStatement {
    pub f: Point,
    pub g: Point,
    pub h: Point,
    pub u: Point,
    pub context: Scalar,
    pub s: Vec<Point>,
    pub t: Vec<Point>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaumProof {
    pub a1: Point,
    pub a2: Vec<Point>,
    pub t1: Vec<Scalar>,
    pub t2: Scalar,
    pub t3: Scalar,
}

fn check_shape(stmt: &ChaumStatement) -> Result<usize> {
    let n = stmt.s.len();
    if n == 0 {
        return Err(SparkError::ShapeMismatch(
            "modified chaum: empty row vectors".into(),
        ));
    }
    if stmt.t.len() != n {
        return Err(SparkError::ShapeMismatch(
            "modified chaum: S and T must have equal length".into(),
        ));
    }
    Ok(n)
}

pub(crate) fn transcript_for(stmt: &ChaumStatement) -> Transcript {
    let mut t = Transcript::spark_new(DOM_SEP_MODIFIED_CHAUM);
    t.append_point(b"f", &stmt.f);
    t.append_point(b"g", &stmt.g);
    t.append_point(b"h", &stmt.h);
    t.append_point(b"u", &stmt.u);
    t.append_scalar(b"m", &stmt.context);
    t.append_points(b"s", &stmt.s);
    t.append_points(b"t", &stmt.t);
    t
}

/// Single-party prover. Challenge powers start at `c^1` (row `i` uses
/// `c^(i+1)`), per `spec.md` §4.5.
pub fn prove<R: RngCore + CryptoRng>(
    stmt: &ChaumStatement,
    x: &[Scalar],
    y: &[Scalar],
    z: &[Scalar],
    rng: &mut R,
) -> Result<ChaumProof> {
    let n = check_shape(stmt)?;
    if x.len() != n || y.len() != n || z.len() != n {
        return Err(SparkError::ShapeMismatch(
            "modified chaum: witness vectors must match row count".into(),
        ));
    }
    for i in 0..n {
        if stmt.s[i] != stmt.f * x[i] + stmt.g * y[i] + stmt.h * z[i] {
            return Err(SparkError::InvalidWitness(format!(
                "modified chaum: row {i} fails S-representation"
            )));
        }
        if stmt.u != stmt.t[i] * x[i] + stmt.g * y[i] {
            return Err(SparkError::InvalidWitness(format!(
                "modified chaum: row {i} fails tag equation"
            )));
        }
    }

    let r: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();
    let s: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();
    let t_blind = Scalar::random(rng);

    let mut a1 = stmt.h * t_blind;
    let mut a2 = Vec::with_capacity(n);
    for i in 0..n {
        a1 += stmt.f * r[i] + stmt.g * s[i];
        a2.push(stmt.t[i] * r[i] + stmt.g * s[i]);
    }

    let mut transcript = transcript_for(stmt);
    transcript.append_point(b"a1", &a1);
    transcript.append_points(b"a2", &a2);
    let c = transcript.challenge_scalar(b"c");

    let mut t1 = Vec::with_capacity(n);
    let mut t2 = Scalar::zero();
    let mut t3 = t_blind;
    for i in 0..n {
        let power = c.pow(i as u64 + 1);
        t1.push(r[i] + power * x[i]);
        t2 += s[i] + power * y[i];
        t3 += power * z[i];
    }

    Ok(ChaumProof { a1, a2, t1, t2, t3 })
}

/// Verifies a proof produced with challenge powers starting at `c^1`.
pub fn verify(stmt: &ChaumStatement, proof: &ChaumProof) -> Result<()> {
    verify_with_power_offset(stmt, proof, 1)
}

/// Shared verification core. `power_offset` is `1` for the single-party
/// prover above and `0` for signatures produced by `multisig::sign`.
pub fn verify_with_power_offset(
    stmt: &ChaumStatement,
    proof: &ChaumProof,
    power_offset: u64,
) -> Result<()> {
    let n = check_shape(stmt)?;
    if proof.a2.len() != n || proof.t1.len() != n {
        return Err(SparkError::ShapeMismatch(
            "modified chaum: proof shape does not match statement".into(),
        ));
    }

    let mut transcript = transcript_for(stmt);
    transcript.append_point(b"a1", &proof.a1);
    transcript.append_points(b"a2", &proof.a2);
    let c = transcript.challenge_scalar(b"c");

    let mut lhs1 = proof.a1;
    let mut rhs1_f_sum = Point::identity();
    let mut lhs2 = Point::identity();
    let mut rhs2_t_sum = Point::identity();
    for i in 0..n {
        let power = c.pow(i as u64 + power_offset);
        lhs1 += stmt.s[i] * power;
        rhs1_f_sum += stmt.f * proof.t1[i];
        lhs2 += proof.a2[i] + stmt.u * power;
        rhs2_t_sum += stmt.t[i] * proof.t1[i];
    }
    let rhs1 = stmt.g * proof.t2 + stmt.h * proof.t3 + rhs1_f_sum;
    if lhs1 != rhs1 {
        return Err(SparkError::VerificationFailed(
            "modified chaum: S-representation equation failed".into(),
        ));
    }

    let rhs2 = stmt.g * proof.t2 + rhs2_t_sum;
    if lhs2 != rhs2 {
        return Err(SparkError::VerificationFailed(
            "modified chaum: tag equation failed".into(),
        ));
    }
    Ok(())
}
