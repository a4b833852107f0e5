//! Pay proof for payout transactions (`spec.md` §4.11, concretized in
//! `SPEC_FULL.md` §4.11 since the Python `pay.py` module was not part of the
//! retrieved source set).
//!
//! A direct generalization of the §4.2 Schnorr PoK to three bases sharing a
//! single witness `k`, the same "one witness, several equations" shape
//! `proofs::chaum` already uses for `x[i]` across the S-representation and
//! the tag equation.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::{Point, Scalar};
use crate::constants::DOM_SEP_PAYOUT;
use crate::error::{Result, SparkError};
use crate::transcript::SparkTranscript;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayStatement {
    pub q0: Point,
    pub q1: Point,
    pub f: Point,
    pub k: Point,
    pub k_der: Point,
    pub k_div: Point,
    pub context: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayProof {
    pub a0: Point,
    pub a1: Point,
    pub a2: Point,
    pub t: Scalar,
}

fn transcript_for(stmt: &PayStatement) -> Transcript {
    let mut t = Transcript::spark_new(DOM_SEP_PAYOUT);
    t.append_point(b"q0", &stmt.q0);
    t.append_point(b"q1", &stmt.q1);
    t.append_point(b"f", &stmt.f);
    t.append_point(b"k", &stmt.k);
    t.append_point(b"k_der", &stmt.k_der);
    t.append_point(b"k_div", &stmt.k_div);
    t.append_bytes(b"context", &stmt.context);
    t
}

pub fn prove<R: RngCore + CryptoRng>(
    stmt: &PayStatement,
    k: Scalar,
    rng: &mut R,
) -> Result<PayProof> {
    if stmt.k != stmt.q0 * k || stmt.k_der != stmt.q1 * k || stmt.k_div != stmt.f * k {
        return Err(SparkError::InvalidWitness(
            "pay: k does not open K, K_der, and K_div consistently".into(),
        ));
    }
    let r = Scalar::random(rng);
    let a0 = stmt.q0 * r;
    let a1 = stmt.q1 * r;
    let a2 = stmt.f * r;

    let mut t = transcript_for(stmt);
    t.append_point(b"a0", &a0);
    t.append_point(b"a1", &a1);
    t.append_point(b"a2", &a2);
    let c = t.challenge_scalar(b"c");

    let resp = r + c * k;
    Ok(PayProof { a0, a1, a2, t: resp })
}

pub fn verify(stmt: &PayStatement, proof: &PayProof) -> Result<()> {
    let mut t = transcript_for(stmt);
    t.append_point(b"a0", &proof.a0);
    t.append_point(b"a1", &proof.a1);
    t.append_point(b"a2", &proof.a2);
    let c = t.challenge_scalar(b"c");

    let ok0 = stmt.q0 * proof.t == proof.a0 + stmt.k * c;
    let ok1 = stmt.q1 * proof.t == proof.a1 + stmt.k_der * c;
    let ok2 = stmt.f * proof.t == proof.a2 + stmt.k_div * c;
    if ok0 && ok1 && ok2 {
        Ok(())
    } else {
        Err(SparkError::VerificationFailed("pay".into()))
    }
}
