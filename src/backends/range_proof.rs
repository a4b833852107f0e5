//! Range-proof backend (`spec.md` §1/§6: "Bulletproofs+, black-boxed as
//! `prove(statement, witness) -> π`, `verify([statements],[proofs])`").
//!
//! A real deployment plugs in an actual Bulletproofs+ circuit; this crate
//! defines the interface as [`RangeProofBackend`] and ships one concrete,
//! much simpler reference implementation ([`BitDecompositionBackend`]) so
//! `coin::Coin` can be built and tested end-to-end without that dependency,
//! which is explicitly out of scope per `spec.md` §1.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::{Point, Scalar};
use crate::error::{Result, SparkError};
use crate::transcript::SparkTranscript;

/// A statement that some commitment `c = value·value_base + blinding·blind_base`
/// encodes a `value` with at most `bits` bits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeStatement {
    pub value_base: Point,
    pub blind_base: Point,
    pub commitment: Point,
    pub bits: u32,
}

pub trait RangeProofBackend {
    type Proof: Clone + std::fmt::Debug + Serialize;

    fn prove<R: RngCore + CryptoRng>(
        stmt: &RangeStatement,
        value: u64,
        blinding: Scalar,
        rng: &mut R,
    ) -> Result<Self::Proof>;

    fn verify(stmt: &RangeStatement, proof: &Self::Proof) -> Result<()>;
}

/// One Schnorr "OR" proof that a bit commitment opens to 0 or to 1, CDS-style
/// (Cramer-Damgård-Schoenmakers): one branch is proved honestly, the other is
/// simulated, and the two challenge shares are forced to sum to the overall
/// Fiat-Shamir challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitProof {
    a0: Point,
    a1: Point,
    c0: Scalar,
    c1: Scalar,
    t0: Scalar,
    t1: Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitDecompositionProof {
    bit_commitments: Vec<Point>,
    bit_proofs: Vec<BitProof>,
}

/// Reference range-proof backend: decomposes the value into `bits` Pedersen
/// bit commitments on `(value_base, blind_base)` whose weighted sum
/// reconstructs the statement's commitment, each proved to open to 0 or 1.
pub struct BitDecompositionBackend;

fn bit_transcript(stmt: &RangeStatement, index: u32) -> Transcript {
    let mut t = Transcript::spark_new(b"Range bit");
    t.append_point(b"value_base", &stmt.value_base);
    t.append_point(b"blind_base", &stmt.blind_base);
    t.append_u64(b"index", index as u64);
    t
}

fn prove_bit<R: RngCore + CryptoRng>(
    stmt: &RangeStatement,
    index: u32,
    bit: bool,
    c_i: Point,
    r_i: Scalar,
    rng: &mut R,
) -> BitProof {
    let h = stmt.blind_base;
    let g = stmt.value_base;

    let (a0, a1, c0, c1, t0, t1);
    if !bit {
        // Real branch is "b=0": C_i = r_i*H. Simulate branch "b=1".
        let k0 = Scalar::random(rng);
        let real_a0 = h * k0;
        let fake_c1 = Scalar::random(rng);
        let fake_t1 = Scalar::random(rng);
        let fake_a1 = h * fake_t1 - (c_i - g) * fake_c1;

        let mut t = bit_transcript(stmt, index);
        t.append_point(b"a0", &real_a0);
        t.append_point(b"a1", &fake_a1);
        let c = t.challenge_scalar(b"c");
        let real_c0 = c - fake_c1;
        let real_t0 = k0 + real_c0 * r_i;

        a0 = real_a0;
        a1 = fake_a1;
        c0 = real_c0;
        c1 = fake_c1;
        t0 = real_t0;
        t1 = fake_t1;
    } else {
        // Real branch is "b=1": C_i - G = r_i*H. Simulate branch "b=0".
        let k1 = Scalar::random(rng);
        let real_a1 = h * k1;
        let fake_c0 = Scalar::random(rng);
        let fake_t0 = Scalar::random(rng);
        let fake_a0 = h * fake_t0 - c_i * fake_c0;

        let mut t = bit_transcript(stmt, index);
        t.append_point(b"a0", &fake_a0);
        t.append_point(b"a1", &real_a1);
        let c = t.challenge_scalar(b"c");
        let real_c1 = c - fake_c0;
        let real_t1 = k1 + real_c1 * r_i;

        a0 = fake_a0;
        a1 = real_a1;
        c0 = fake_c0;
        c1 = real_c1;
        t0 = fake_t0;
        t1 = real_t1;
    }

    BitProof {
        a0,
        a1,
        c0,
        c1,
        t0,
        t1,
    }
}

fn verify_bit(stmt: &RangeStatement, index: u32, c_i: Point, proof: &BitProof) -> Result<()> {
    let h = stmt.blind_base;
    let g = stmt.value_base;

    let mut t = bit_transcript(stmt, index);
    t.append_point(b"a0", &proof.a0);
    t.append_point(b"a1", &proof.a1);
    let c = t.challenge_scalar(b"c");

    if proof.c0 + proof.c1 != c {
        return Err(SparkError::VerificationFailed(format!(
            "range proof: bit {index} challenge shares do not sum to the transcript challenge"
        )));
    }
    if h * proof.t0 != proof.a0 + c_i * proof.c0 {
        return Err(SparkError::VerificationFailed(format!(
            "range proof: bit {index} branch 0 equation failed"
        )));
    }
    if h * proof.t1 != proof.a1 + (c_i - g) * proof.c1 {
        return Err(SparkError::VerificationFailed(format!(
            "range proof: bit {index} branch 1 equation failed"
        )));
    }
    Ok(())
}

impl RangeProofBackend for BitDecompositionBackend {
    type Proof = BitDecompositionProof;

    fn prove<R: RngCore + CryptoRng>(
        stmt: &RangeStatement,
        value: u64,
        blinding: Scalar,
        rng: &mut R,
    ) -> Result<Self::Proof> {
        if stmt.bits == 0 || stmt.bits > 64 {
            return Err(SparkError::OutOfRange(
                "range proof: bit width must be in 1..=64".into(),
            ));
        }
        if stmt.bits < 64 && value >= (1u64 << stmt.bits) {
            return Err(SparkError::InvalidWitness(format!(
                "range proof: value {value} does not fit in {} bits",
                stmt.bits
            )));
        }

        let mut blinding_shares = Vec::with_capacity(stmt.bits as usize);
        let mut running = Scalar::zero();
        for i in 0..stmt.bits {
            if i + 1 == stmt.bits {
                // Last share absorbs whatever remains so the weighted sum
                // reconstructs `blinding` exactly.
                let weight = Scalar::from_u64(1u64 << i);
                let weight_inv = weight.invert()?;
                let share = (blinding - running) * weight_inv;
                blinding_shares.push(share);
            } else {
                let share = Scalar::random(rng);
                running += share * Scalar::from_u64(1u64 << i);
                blinding_shares.push(share);
            }
        }

        let mut bit_commitments = Vec::with_capacity(stmt.bits as usize);
        let mut bit_proofs = Vec::with_capacity(stmt.bits as usize);
        for i in 0..stmt.bits {
            let bit = (value >> i) & 1 == 1;
            let r_i = blinding_shares[i as usize];
            let b_i = if bit { Scalar::one() } else { Scalar::zero() };
            let c_i = stmt.value_base * b_i + stmt.blind_base * r_i;
            bit_proofs.push(prove_bit(stmt, i, bit, c_i, r_i, rng));
            bit_commitments.push(c_i);
        }

        // Sanity self-check, per the "never produce a bad proof" policy.
        let weighted_sum = bit_commitments
            .iter()
            .enumerate()
            .fold(Point::identity(), |acc, (i, &c_i)| {
                acc + c_i * Scalar::from_u64(1u64 << i)
            });
        if weighted_sum != stmt.commitment {
            return Err(SparkError::InvalidWitness(
                "range proof: bit decomposition does not reconstruct the commitment".into(),
            ));
        }

        Ok(BitDecompositionProof {
            bit_commitments,
            bit_proofs,
        })
    }

    fn verify(stmt: &RangeStatement, proof: &Self::Proof) -> Result<()> {
        if proof.bit_commitments.len() != stmt.bits as usize
            || proof.bit_proofs.len() != stmt.bits as usize
        {
            return Err(SparkError::ShapeMismatch(
                "range proof: wrong number of bit commitments".into(),
            ));
        }
        let weighted_sum = proof.bit_commitments.iter().enumerate().fold(
            Point::identity(),
            |acc, (i, &c_i)| acc + c_i * Scalar::from_u64(1u64 << i),
        );
        if weighted_sum != stmt.commitment {
            return Err(SparkError::VerificationFailed(
                "range proof: bit commitments do not reconstruct the statement commitment".into(),
            ));
        }
        for (i, (c_i, bit_proof)) in proof
            .bit_commitments
            .iter()
            .zip(proof.bit_proofs.iter())
            .enumerate()
        {
            verify_bit(stmt, i as u32, *c_i, bit_proof)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn round_trips_in_range_value() {
        let mut rng = OsRng;
        let value_base = Point::hash_to_point(b"range G", &[]);
        let blind_base = Point::hash_to_point(b"range H", &[]);
        let value = 12345u64;
        let blinding = Scalar::random(&mut rng);
        let commitment = value_base * Scalar::from_u64(value) + blind_base * blinding;
        let stmt = RangeStatement {
            value_base,
            blind_base,
            commitment,
            bits: 32,
        };
        let proof = BitDecompositionBackend::prove(&stmt, value, blinding, &mut rng).unwrap();
        BitDecompositionBackend::verify(&stmt, &proof).unwrap();
    }

    #[test]
    fn rejects_out_of_range_value() {
        let mut rng = OsRng;
        let value_base = Point::hash_to_point(b"range G2", &[]);
        let blind_base = Point::hash_to_point(b"range H2", &[]);
        let value = 1u64 << 10;
        let blinding = Scalar::random(&mut rng);
        let commitment = value_base * Scalar::from_u64(value) + blind_base * blinding;
        let stmt = RangeStatement {
            value_base,
            blind_base,
            commitment,
            bits: 8,
        };
        assert!(BitDecompositionBackend::prove(&stmt, value, blinding, &mut rng).is_err());
    }

    #[test]
    fn rejects_tampered_bit_proof() {
        let mut rng = OsRng;
        let value_base = Point::hash_to_point(b"range G3", &[]);
        let blind_base = Point::hash_to_point(b"range H3", &[]);
        let value = 7u64;
        let blinding = Scalar::random(&mut rng);
        let commitment = value_base * Scalar::from_u64(value) + blind_base * blinding;
        let stmt = RangeStatement {
            value_base,
            blind_base,
            commitment,
            bits: 8,
        };
        let mut proof = BitDecompositionBackend::prove(&stmt, value, blinding, &mut rng).unwrap();
        proof.bit_proofs[0].t0 += Scalar::one();
        assert!(BitDecompositionBackend::verify(&stmt, &proof).is_err());
    }
}
