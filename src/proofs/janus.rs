//! Janus protection (`spec.md` §4.7's "Janus proof" requirement, described in
//! §4.5's prose: "proves k is the same scalar used in K across the address's
//! Q0/Q1 generators, preventing Janus attacks where a sender splits different
//! k's across the two components").
//!
//! A generalized Schnorr proof of one witness `k` shared by `K = k·Q0` and
//! `K_der = k·Q1` — the same "one witness, several bases" shape as
//! `proofs::pay`, specialized to two bases. `Q2` is absorbed into the
//! transcript so the proof is bound to the coin's complete, unmixed
//! `(Q0, Q1, Q2)` triple rather than just the `(Q0, Q1)` pair; a sender who
//! mixed components from two different `PublicAddress` values would produce
//! a proof that a verifier recomputing `Q2` from its own view key would
//! reject.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::{Point, Scalar};
use crate::constants::DOM_SEP_JANUS;
use crate::error::{Result, SparkError};
use crate::transcript::SparkTranscript;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanusStatement {
    pub q0: Point,
    pub q1: Point,
    pub q2: Point,
    pub k: Point,
    pub k_der: Point,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanusProof {
    pub a0: Point,
    pub a1: Point,
    pub t: Scalar,
}

fn transcript_for(stmt: &JanusStatement) -> Transcript {
    let mut t = Transcript::spark_new(DOM_SEP_JANUS);
    t.append_point(b"q0", &stmt.q0);
    t.append_point(b"q1", &stmt.q1);
    t.append_point(b"q2", &stmt.q2);
    t.append_point(b"k", &stmt.k);
    t.append_point(b"k_der", &stmt.k_der);
    t
}

pub fn prove<R: RngCore + CryptoRng>(
    stmt: &JanusStatement,
    k: Scalar,
    rng: &mut R,
) -> Result<JanusProof> {
    if stmt.k != stmt.q0 * k || stmt.k_der != stmt.q1 * k {
        return Err(SparkError::InvalidWitness(
            "janus: k does not open K and K_der consistently".into(),
        ));
    }
    let r = Scalar::random(rng);
    let a0 = stmt.q0 * r;
    let a1 = stmt.q1 * r;

    let mut t = transcript_for(stmt);
    t.append_point(b"a0", &a0);
    t.append_point(b"a1", &a1);
    let c = t.challenge_scalar(b"c");

    let resp = r + c * k;
    Ok(JanusProof { a0, a1, t: resp })
}

pub fn verify(stmt: &JanusStatement, proof: &JanusProof) -> Result<()> {
    let mut t = transcript_for(stmt);
    t.append_point(b"a0", &proof.a0);
    t.append_point(b"a1", &proof.a1);
    let c = t.challenge_scalar(b"c");

    let ok0 = stmt.q0 * proof.t == proof.a0 + stmt.k * c;
    let ok1 = stmt.q1 * proof.t == proof.a1 + stmt.k_der * c;
    if ok0 && ok1 {
        Ok(())
    } else {
        Err(SparkError::VerificationFailed("janus".into()))
    }
}
