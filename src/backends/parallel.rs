//! One-of-many ("parallel") membership backend (`spec.md` §1/§6: "a
//! one-of-many / parallel membership argument; black-boxed as
//! `parallel.prove/verify`").
//!
//! A production deployment plugs in a logarithmic-size Groth–Kohlweiss-style
//! one-of-many proof over a `(n, m)`-shaped cover set. That construction is
//! explicitly out of scope per `spec.md` §1; this crate defines the
//! interface as [`ParallelBackend`] and ships a flat, linear-size reference
//! implementation ([`OrProofBackend`]) — an `N`-way generalization of the
//! two-branch CDS OR proof in `backends::range_proof` — so
//! `transactions::stake` can be built and tested end-to-end.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::{Point, Scalar};
use crate::error::{Result, SparkError};
use crate::transcript::SparkTranscript;

/// Proves that `target` is a blinding-only re-randomization of exactly one
/// entry of `cover`: `cover[l] - target = w·h` for a secret index `l` and
/// blinding `w`, without revealing `l`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelStatement {
    pub h: Point,
    pub cover: Vec<Point>,
    pub target: Point,
}

pub trait ParallelBackend {
    type Proof: Clone + std::fmt::Debug + Serialize;

    fn prove<R: RngCore + CryptoRng>(
        stmt: &ParallelStatement,
        index: usize,
        w: Scalar,
        rng: &mut R,
    ) -> Result<Self::Proof>;

    fn verify(stmt: &ParallelStatement, proof: &Self::Proof) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrProof {
    a: Vec<Point>,
    c: Vec<Scalar>,
    t: Vec<Scalar>,
}

pub struct OrProofBackend;

fn transcript_for(stmt: &ParallelStatement) -> Transcript {
    let mut t = Transcript::spark_new(b"Parallel membership");
    t.append_point(b"h", &stmt.h);
    t.append_points(b"cover", &stmt.cover);
    t.append_point(b"target", &stmt.target);
    t
}

impl ParallelBackend for OrProofBackend {
    type Proof = OrProof;

    fn prove<R: RngCore + CryptoRng>(
        stmt: &ParallelStatement,
        index: usize,
        w: Scalar,
        rng: &mut R,
    ) -> Result<Self::Proof> {
        let n = stmt.cover.len();
        if n == 0 {
            return Err(SparkError::ShapeMismatch(
                "parallel: empty cover set".into(),
            ));
        }
        if index >= n {
            return Err(SparkError::OutOfRange(
                "parallel: witness index out of bounds".into(),
            ));
        }
        let diff_l = stmt.cover[index] - stmt.target;
        if diff_l != stmt.h * w {
            return Err(SparkError::InvalidWitness(
                "parallel: cover[index] - target is not w*h".into(),
            ));
        }

        let mut a = vec![Point::identity(); n];
        let mut c = vec![Scalar::zero(); n];
        let mut t = vec![Scalar::zero(); n];

        // Simulate every branch but `index`.
        for i in 0..n {
            if i == index {
                continue;
            }
            let fake_c = Scalar::random(rng);
            let fake_t = Scalar::random(rng);
            let diff_i = stmt.cover[i] - stmt.target;
            a[i] = stmt.h * fake_t - diff_i * fake_c;
            c[i] = fake_c;
            t[i] = fake_t;
        }

        let k = Scalar::random(rng);
        a[index] = stmt.h * k;

        let mut tr = transcript_for(stmt);
        tr.append_points(b"a", &a);
        let overall_c = tr.challenge_scalar(b"c");

        let others_sum: Scalar = c.iter().enumerate().filter(|(i, _)| *i != index).map(|(_, &ci)| ci).sum();
        let real_c = overall_c - others_sum;
        let real_t = k + real_c * w;
        c[index] = real_c;
        t[index] = real_t;

        Ok(OrProof { a, c, t })
    }

    fn verify(stmt: &ParallelStatement, proof: &Self::Proof) -> Result<()> {
        let n = stmt.cover.len();
        if n == 0 {
            return Err(SparkError::ShapeMismatch(
                "parallel: empty cover set".into(),
            ));
        }
        if proof.a.len() != n || proof.c.len() != n || proof.t.len() != n {
            return Err(SparkError::ShapeMismatch(
                "parallel: proof shape does not match cover set size".into(),
            ));
        }

        let mut tr = transcript_for(stmt);
        tr.append_points(b"a", &proof.a);
        let overall_c = tr.challenge_scalar(b"c");

        let sum_c: Scalar = proof.c.iter().copied().sum();
        if sum_c != overall_c {
            return Err(SparkError::VerificationFailed(
                "parallel: challenge shares do not sum to the transcript challenge".into(),
            ));
        }

        for i in 0..n {
            let diff_i = stmt.cover[i] - stmt.target;
            if stmt.h * proof.t[i] != proof.a[i] + diff_i * proof.c[i] {
                return Err(SparkError::VerificationFailed(format!(
                    "parallel: branch {i} equation failed"
                )));
            }
        }
        Ok(())
    }
}
