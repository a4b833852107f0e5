//! Nonce precomputation (`spec.md` §4.10, "Precomputation").
//!
//! Each player generates a batch of nonce pairs ahead of any signing
//! session and broadcasts only the public commitments. Secrets are kept on
//! a stack and popped exactly once per witness row consumed in `sign` —
//! `spec.md` §5's "Nonces MUST be popped" and §8's "Nonce hygiene" property
//! both hinge on real removal, not the reference Python's read-without-
//! remove indexing (see `SPEC_FULL.md` §4.10).

use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::{Point, Scalar};
use crate::error::{Result, SparkError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoncePair {
    pub d: Scalar,
    pub e: Scalar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceCommitment {
    pub d_point: Point,
    pub e_point: Point,
}

/// Generates `count` fresh nonce pairs and their public commitments.
pub fn generate<R: RngCore + CryptoRng>(
    count: usize,
    g: Point,
    rng: &mut R,
) -> (Vec<NoncePair>, Vec<NonceCommitment>) {
    let mut secrets = Vec::with_capacity(count);
    let mut public = Vec::with_capacity(count);
    for _ in 0..count {
        let d = Scalar::random(rng);
        let e = Scalar::random(rng);
        secrets.push(NoncePair { d, e });
        public.push(NonceCommitment {
            d_point: g * d,
            e_point: g * e,
        });
    }
    (secrets, public)
}

/// A player's private nonce stack. `sign` pops exactly one pair per witness
/// row it consumes.
#[derive(Clone, Debug, Default)]
pub struct NonceStack {
    pairs: Vec<NoncePair>,
}

impl NonceStack {
    pub fn new(pairs: Vec<NoncePair>) -> Self {
        NonceStack { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pop(&mut self) -> Result<NoncePair> {
        self.pairs
            .pop()
            .ok_or_else(|| SparkError::ProtocolViolation("nonce stack exhausted".into()))
    }
}
