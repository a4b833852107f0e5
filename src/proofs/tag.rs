//! Tag-correspondence proof (`spec.md` §4.3, `tag_proof`).
//!
//! Proves that the same pair `(x, y)` represents both `S = x·F + y·G` and
//! `U = x·T + y·G` without revealing `x` or `y`.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::{Point, Scalar};
use crate::constants::DOM_SEP_TAG_CORRESPONDENCE;
use crate::error::{Result, SparkError};
use crate::transcript::SparkTranscript;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStatement {
    pub f: Point,
    pub g: Point,
    pub u: Point,
    pub context: Vec<u8>,
    pub s: Point,
    pub t: Point,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagProof {
    pub a1: Point,
    pub a2: Point,
    pub t1: Scalar,
    pub t2: Scalar,
}

fn transcript_for(stmt: &TagStatement) -> Transcript {
    let mut tr = Transcript::spark_new(DOM_SEP_TAG_CORRESPONDENCE);
    tr.append_point(b"f", &stmt.f);
    tr.append_point(b"g", &stmt.g);
    tr.append_point(b"u", &stmt.u);
    tr.append_bytes(b"context", &stmt.context);
    tr.append_point(b"s", &stmt.s);
    tr.append_point(b"t", &stmt.t);
    tr
}

pub fn prove<R: RngCore + CryptoRng>(
    stmt: &TagStatement,
    x: Scalar,
    y: Scalar,
    rng: &mut R,
) -> Result<TagProof> {
    if stmt.s != stmt.f * x + stmt.g * y || stmt.u != stmt.t * x + stmt.g * y {
        return Err(SparkError::InvalidWitness(
            "tag_proof: witness does not satisfy S = xF+yG or U = xT+yG".into(),
        ));
    }
    let r = Scalar::random(rng);
    let s = Scalar::random(rng);
    let a1 = stmt.f * r + stmt.g * s;
    let a2 = stmt.t * r + stmt.g * s;

    let mut tr = transcript_for(stmt);
    tr.append_point(b"a1", &a1);
    tr.append_point(b"a2", &a2);
    let c = tr.challenge_scalar(b"c");

    let t1 = r + c * x;
    let t2 = s + c * y;
    Ok(TagProof { a1, a2, t1, t2 })
}

pub fn verify(stmt: &TagStatement, proof: &TagProof) -> Result<()> {
    let mut tr = transcript_for(stmt);
    tr.append_point(b"a1", &proof.a1);
    tr.append_point(b"a2", &proof.a2);
    let c = tr.challenge_scalar(b"c");

    let ok1 = stmt.f * proof.t1 + stmt.g * proof.t2 == proof.a1 + stmt.s * c;
    let ok2 = stmt.t * proof.t1 + stmt.g * proof.t2 == proof.a2 + stmt.u * c;
    if ok1 && ok2 {
        Ok(())
    } else {
        Err(SparkError::VerificationFailed("tag_proof".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn setup(rng: &mut OsRng) -> (TagStatement, Scalar, Scalar) {
        let f = Point::hash_to_point(b"tag F", &[]);
        let g = Point::hash_to_point(b"tag G", &[]);
        let t_gen = Point::hash_to_point(b"tag T", &[]);
        let x = Scalar::random(rng);
        let y = Scalar::random(rng);
        let s = f * x + g * y;
        let u = t_gen * x + g * y;
        (
            TagStatement {
                f,
                g,
                u,
                context: b"ctx".to_vec(),
                s,
                t: t_gen,
            },
            x,
            y,
        )
    }

    #[test]
    fn round_trips() {
        let mut rng = OsRng;
        let (stmt, x, y) = setup(&mut rng);
        let proof = prove(&stmt, x, y, &mut rng).unwrap();
        verify(&stmt, &proof).unwrap();
    }

    #[test]
    fn rejects_mismatched_statement() {
        let mut rng = OsRng;
        let (stmt, x, y) = setup(&mut rng);
        let proof = prove(&stmt, x, y, &mut rng).unwrap();
        let mut tampered = stmt.clone();
        tampered.context = b"other".to_vec();
        assert!(verify(&tampered, &proof).is_err());
    }
}
