//! Schnorr proof of knowledge of a discrete logarithm (`spec.md` §4.2).
//!
//! Used directly for Janus protection inside `coin` and for balance proofs
//! inside `transactions::stake`, and generalized to three shared-witness
//! bases by `proofs::pay` for payout transactions.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::{Point, Scalar};
use crate::constants::DOM_SEP_SCHNORR;
use crate::error::{Result, SparkError};
use crate::transcript::SparkTranscript;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchnorrStatement {
    pub generator: Point,
    pub y: Point,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchnorrProof {
    pub a: Point,
    pub t: Scalar,
}

fn transcript_for(context: &[u8], stmt: &SchnorrStatement) -> Transcript {
    let mut t = Transcript::spark_new(DOM_SEP_SCHNORR);
    t.append_bytes(b"context", context);
    t.append_point(b"generator", &stmt.generator);
    t.append_point(b"y", &stmt.y);
    t
}

/// Proves knowledge of `x` with `stmt.y = x * stmt.generator`.
///
/// `context` binds the proof to whatever statement-specific data the caller
/// wants included in the challenge (a coin fingerprint, a transaction id);
/// it is absorbed before any proof-specific elements.
pub fn prove<R: RngCore + CryptoRng>(
    context: &[u8],
    stmt: &SchnorrStatement,
    x: Scalar,
    rng: &mut R,
) -> Result<SchnorrProof> {
    if stmt.y != stmt.generator * x {
        return Err(SparkError::InvalidWitness(
            "schnorr: y != x * generator".into(),
        ));
    }
    let r = Scalar::random(rng);
    let a = stmt.generator * r;

    let mut t = transcript_for(context, stmt);
    t.append_point(b"a", &a);
    let c = t.challenge_scalar(b"c");

    let t_resp = r + c * x;
    Ok(SchnorrProof { a, t: t_resp })
}

pub fn verify(context: &[u8], stmt: &SchnorrStatement, proof: &SchnorrProof) -> Result<()> {
    let mut t = transcript_for(context, stmt);
    t.append_point(b"a", &proof.a);
    let c = t.challenge_scalar(b"c");

    let lhs = stmt.generator * proof.t;
    let rhs = proof.a + stmt.y * c;
    if lhs == rhs {
        Ok(())
    } else {
        Err(SparkError::VerificationFailed("schnorr".into()))
    }
}
