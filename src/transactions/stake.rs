//! StakeTransaction (`spec.md` §4.11).
//!
//! Spends a recovered, delegated coin anonymously within a cover set of
//! `n^m` candidate coins. The parallel membership proof is run once, over a
//! single combined cover vector `S[i] + lambda*C[i]` for a Fiat-Shamir
//! `lambda`, rather than as two separate one-of-many proofs over the S- and
//! C-family commitments — a standard random-linear-combination batching of
//! two instances of the same index `l`, safe because the backend is
//! black-boxed per `spec.md` §1 and each instance alone already hides `l`.

use std::collections::HashSet;

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::address::{FullViewKey, SpendKey};
use crate::algebra::{Point, Scalar};
use crate::backends::parallel::{OrProof, OrProofBackend, ParallelBackend, ParallelStatement};
use crate::coin::{Coin, CoinDelegation, RecoveredCoin};
use crate::constants::{DOM_SEP_SPARK_CHALLENGE, DOM_SEP_STAKE_COVER, DST_STAKE_PROOF, DST_VAL1};
use crate::error::{Result, SparkError};
use crate::proofs::chaum::{self, ChaumProof, ChaumStatement};
use crate::proofs::schnorr::{self, SchnorrProof, SchnorrStatement};
use crate::transcript::SparkTranscript;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeParameters {
    pub f: Point,
    pub g: Point,
    pub h: Point,
    pub u: Point,
    pub value_bytes: u8,
    pub n: u32,
    pub m: u32,
    pub stake: u64,
}

impl StakeParameters {
    pub fn new(
        f: Point,
        g: Point,
        h: Point,
        u: Point,
        value_bytes: u8,
        n: u32,
        m: u32,
        stake: u64,
    ) -> Result<Self> {
        if n == 0 || m == 0 {
            return Err(SparkError::OutOfRange(
                "stake parameters: n and m must both be at least 1".into(),
            ));
        }
        Ok(StakeParameters {
            f,
            g,
            h,
            u,
            value_bytes,
            n,
            m,
            stake,
        })
    }

    fn cover_size(&self) -> Result<usize> {
        (self.n as u64)
            .checked_pow(self.m)
            .map(|v| v as usize)
            .ok_or_else(|| SparkError::OutOfRange("stake parameters: n^m overflows".into()))
    }

    fn max_value_exclusive(&self) -> u128 {
        1u128 << (8 * self.value_bytes as u32)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakeTransaction {
    /// Fingerprints of every coin in the cover set, in order.
    pub cover: Vec<[u8; 32]>,
    pub fee: u64,
    pub s1: Point,
    pub c1: Point,
    pub t: Point,
    pub parallel_proof: OrProof,
    pub balance_proof: SchnorrProof,
    pub chaum_proof: ChaumProof,
}

fn cover_points(inputs: &[Coin]) -> (Vec<Point>, Vec<Point>) {
    let s = inputs.iter().map(|c| c.s).collect();
    let c = inputs.iter().map(|c| c.c).collect();
    (s, c)
}

fn combine_cover(
    h: Point,
    fingerprints: &[[u8; 32]],
    cover_s: &[Point],
    cover_c: &[Point],
    s1: Point,
    c1: Point,
) -> (ParallelStatement, Scalar) {
    let mut t = Transcript::spark_new(DOM_SEP_STAKE_COVER);
    t.append_point(b"h", &h);
    for fp in fingerprints {
        t.append_bytes(b"fingerprint", fp);
    }
    t.append_point(b"s1", &s1);
    t.append_point(b"c1", &c1);
    let lambda = t.challenge_scalar(b"lambda");

    let cover: Vec<Point> = cover_s
        .iter()
        .zip(cover_c.iter())
        .map(|(&s, &c)| s + c * lambda)
        .collect();
    let target = s1 + c1 * lambda;
    (ParallelStatement { h, cover, target }, lambda)
}

fn stake_challenge(
    fingerprints: &[[u8; 32]],
    fee: u64,
    s1: Point,
    c1: Point,
    t: Point,
    parallel_proof: &OrProof,
    balance_proof: &SchnorrProof,
) -> Result<Scalar> {
    let parallel_bytes = bcs::to_bytes(parallel_proof)
        .map_err(|e| SparkError::TypeMismatch(format!("serializing parallel proof: {e}")))?;
    let balance_bytes = bcs::to_bytes(balance_proof)
        .map_err(|e| SparkError::TypeMismatch(format!("serializing balance proof: {e}")))?;

    let mut tr = Transcript::spark_new(DOM_SEP_SPARK_CHALLENGE);
    tr.append_bytes(b"label", DST_STAKE_PROOF);
    for fp in fingerprints {
        tr.append_bytes(b"fingerprint", fp);
    }
    tr.append_u64(b"fee", fee);
    tr.append_point(b"s1", &s1);
    tr.append_point(b"c1", &c1);
    tr.append_point(b"t", &t);
    tr.append_bytes(b"parallel_proof", &parallel_bytes);
    tr.append_bytes(b"balance_proof", &balance_bytes);
    Ok(tr.challenge_scalar(b"mu"))
}

impl StakeTransaction {
    /// Spends `inputs[l]` (already recovered and delegated under
    /// `delegation.id`) anonymously within the `n^m`-sized cover set
    /// `inputs`.
    #[allow(clippy::too_many_arguments)]
    pub fn construct<R: RngCore + CryptoRng>(
        params: &StakeParameters,
        fvk: &FullViewKey,
        spend: &SpendKey,
        inputs: &[Coin],
        l: usize,
        fee: u64,
        recovered: &RecoveredCoin,
        delegation: &CoinDelegation,
        rng: &mut R,
    ) -> Result<Self> {
        let cover_size = params.cover_size()?;
        if inputs.len() != cover_size {
            return Err(SparkError::ShapeMismatch(format!(
                "stake: cover set has {} coins, expected n^m = {cover_size}",
                inputs.len()
            )));
        }
        if l >= inputs.len() {
            return Err(SparkError::OutOfRange(
                "stake: spend index is out of bounds for the cover set".into(),
            ));
        }
        if (fee as u128) >= params.max_value_exclusive() {
            return Err(SparkError::OutOfRange(format!(
                "fee {fee} does not fit in {} bytes",
                params.value_bytes
            )));
        }

        let fingerprints: Vec<[u8; 32]> = inputs.iter().map(Coin::fingerprint).collect();
        let (cover_s, cover_c) = cover_points(inputs);

        let s1 = delegation.s1_point;
        let c1 = delegation.c1_point;
        let t = recovered.tag;

        let (parallel_stmt, lambda) =
            combine_cover(params.h, &fingerprints, &cover_s, &cover_c, s1, c1);
        let w = delegation.s1_prime + lambda * delegation.c1;
        let parallel_proof = OrProofBackend::prove(&parallel_stmt, l, w, rng)?;

        let b_st =
            c1 - params.g * Scalar::from_u64(fee) - params.g * Scalar::from_u64(params.stake);
        let c1_prime = Scalar::hash_to_scalar(
            DST_VAL1,
            &[
                &delegation.id,
                &recovered.s.to_bytes(),
                &fvk.s1.to_bytes(),
                &fvk.s2.to_bytes(),
            ],
        );
        let balance_proof = schnorr::prove(
            b"stake balance",
            &SchnorrStatement {
                generator: params.h,
                y: b_st,
            },
            c1_prime,
            rng,
        )?;

        let mu = stake_challenge(&fingerprints, fee, s1, c1, t, &parallel_proof, &balance_proof)?;
        let chaum_stmt = ChaumStatement {
            f: params.f,
            g: params.g,
            h: params.h,
            u: params.u,
            context: mu,
            s: vec![s1],
            t: vec![t],
        };
        let chaum_proof = chaum::prove(
            &chaum_stmt,
            &[recovered.s],
            &[spend.r],
            &[-delegation.s1_prime],
            rng,
        )?;

        Ok(StakeTransaction {
            cover: fingerprints,
            fee,
            s1,
            c1,
            t,
            parallel_proof,
            balance_proof,
            chaum_proof,
        })
    }

    /// Verifies cover integrity, parallel membership, the modified-Chaum tag
    /// proof, and the balance Schnorr proof, then checks and records tag
    /// uniqueness against `seen_tags`.
    pub fn verify(
        &self,
        params: &StakeParameters,
        inputs: &[Coin],
        seen_tags: &mut HashSet<[u8; 32]>,
    ) -> Result<()> {
        let cover_size = params.cover_size()?;
        if inputs.len() != cover_size {
            return Err(SparkError::ShapeMismatch(format!(
                "stake: cover set has {} coins, expected n^m = {cover_size}",
                inputs.len()
            )));
        }
        let fingerprints: Vec<[u8; 32]> = inputs.iter().map(Coin::fingerprint).collect();
        if fingerprints != self.cover {
            return Err(SparkError::ShapeMismatch(
                "stake: provided cover set does not match the published fingerprints".into(),
            ));
        }
        if (self.fee as u128) >= params.max_value_exclusive() {
            return Err(SparkError::OutOfRange(format!(
                "fee {} does not fit in {} bytes",
                self.fee, params.value_bytes
            )));
        }

        let tag_bytes = self.t.to_bytes();
        if seen_tags.contains(&tag_bytes) {
            return Err(SparkError::DuplicateTag);
        }

        let (cover_s, cover_c) = cover_points(inputs);
        let (parallel_stmt, _lambda) =
            combine_cover(params.h, &fingerprints, &cover_s, &cover_c, self.s1, self.c1);
        OrProofBackend::verify(&parallel_stmt, &self.parallel_proof)?;

        let b_st = self.c1
            - params.g * Scalar::from_u64(self.fee)
            - params.g * Scalar::from_u64(params.stake);
        schnorr::verify(
            b"stake balance",
            &SchnorrStatement {
                generator: params.h,
                y: b_st,
            },
            &self.balance_proof,
        )?;

        let mu = stake_challenge(
            &fingerprints,
            self.fee,
            self.s1,
            self.c1,
            self.t,
            &self.parallel_proof,
            &self.balance_proof,
        )?;
        let chaum_stmt = ChaumStatement {
            f: params.f,
            g: params.g,
            h: params.h,
            u: params.u,
            context: mu,
            s: vec![self.s1],
            t: vec![self.t],
        };
        chaum::verify(&chaum_stmt, &self.chaum_proof)?;

        seen_tags.insert(tag_bytes);
        Ok(())
    }
}
