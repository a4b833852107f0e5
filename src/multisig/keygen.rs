//! Pedersen-VSS distributed key generation with a NIZK proof of knowledge of
//! each player's constant term (`spec.md` §4.10, step "Key generation").
//!
//! Two rounds: round 1 broadcasts Feldman commitments and a Schnorr PoK of
//! the constant coefficient; round 2 privately distributes polynomial
//! evaluations, each independently checkable against round 1's commitments.
//! A final aggregation step sums the per-player shares into the committee's
//! secret (`r_β`), the group public key `D`, and the aggregated view-key
//! components `s1`, `s2`.

use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::algebra::{Point, Scalar};
use crate::constants::{DST_MULTISIG_KEYGEN, DST_SPARK_S1, DST_SPARK_S2};
use crate::error::{Result, SparkError};

/// What a player broadcasts in round 1. The polynomial coefficients
/// themselves stay private to the player that sampled them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeygenRound1 {
    pub player: u32,
    pub coefficient_commitments: Vec<Point>,
    pub pok_r: Point,
    pub pok_mu: Scalar,
    pub s1_share: Scalar,
    pub s2_share: Scalar,
}

/// Samples a degree-`(threshold-1)` polynomial and produces the round-1
/// broadcast, returning the private coefficients alongside it (round 2 needs
/// them to compute this player's shares for every other player).
pub fn round1<R: RngCore + CryptoRng>(
    player: u32,
    threshold: u32,
    g: Point,
    rng: &mut R,
) -> (Vec<Scalar>, KeygenRound1) {
    let coefficients: Vec<Scalar> = (0..threshold).map(|_| Scalar::random(rng)).collect();
    let commitments: Vec<Point> = coefficients.iter().map(|&a| g * a).collect();

    let k = Scalar::random(rng);
    let r = g * k;
    let c = Scalar::hash_to_scalar(
        DST_MULTISIG_KEYGEN,
        &[
            &player.to_le_bytes(),
            &commitments[0].to_bytes(),
            &r.to_bytes(),
        ],
    );
    let mu = k + c * coefficients[0];

    let msg = KeygenRound1 {
        player,
        coefficient_commitments: commitments,
        pok_r: r,
        pok_mu: mu,
        s1_share: Scalar::random(rng),
        s2_share: Scalar::random(rng),
    };
    (coefficients, msg)
}

/// Verifies another player's round-1 proof of knowledge of their constant
/// term, per `spec.md` §4.10 step 2: `μ·G − c·C_α[0] = R`.
pub fn verify_round1(msg: &KeygenRound1, g: Point) -> Result<()> {
    if msg.coefficient_commitments.is_empty() {
        return Err(SparkError::ShapeMismatch(
            "keygen round 1: empty coefficient commitment vector".into(),
        ));
    }
    let c = Scalar::hash_to_scalar(
        DST_MULTISIG_KEYGEN,
        &[
            &msg.player.to_le_bytes(),
            &msg.coefficient_commitments[0].to_bytes(),
            &msg.pok_r.to_bytes(),
        ],
    );
    if g * msg.pok_mu - msg.coefficient_commitments[0] * c != msg.pok_r {
        return Err(SparkError::VerificationFailed(format!(
            "keygen: player {} failed its round-1 proof of knowledge",
            msg.player
        )));
    }
    Ok(())
}

/// Evaluates this player's private polynomial at `beta`, producing the
/// share `r̂_{α→β}` sent privately to player `beta` in round 2.
pub fn round2_share(coefficients: &[Scalar], beta: u32) -> Scalar {
    let x = Scalar::from_u64(beta as u64);
    let mut power = Scalar::one();
    let mut acc = Scalar::zero();
    for &a_j in coefficients {
        acc += a_j * power;
        power *= x;
    }
    acc
}

/// Checks a received `r̂_{α→β}` against the sender's round-1 commitments:
/// `r̂·G = Σ_j β^j·C_α[j]`.
pub fn verify_round2_share(share: Scalar, beta: u32, round1: &KeygenRound1, g: Point) -> Result<()> {
    let x = Scalar::from_u64(beta as u64);
    let mut power = Scalar::one();
    let mut expected = Point::identity();
    for &c_j in &round1.coefficient_commitments {
        expected += c_j * power;
        power *= x;
    }
    if g * share != expected {
        return Err(SparkError::VerificationFailed(format!(
            "keygen: share from player {} failed its Feldman check",
            round1.player
        )));
    }
    Ok(())
}

/// This committee member's total secret share `r_β = Σ_α r̂_{α→β}`, the
/// group's public key `D = Σ_α C_α[0]`, and the aggregated view-key
/// components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSecret {
    pub id: u32,
    pub r: Scalar,
    pub group_public: Point,
    pub s1: Scalar,
    pub s2: Scalar,
}

/// The public verification share `R_α = r_α·G`, independently derivable by
/// anyone who has seen every player's round-1 broadcast — used by `sign` to
/// check a player's partial signature contribution.
pub fn player_public_share(alpha: u32, round1_msgs: &[KeygenRound1]) -> Point {
    let x = Scalar::from_u64(alpha as u64);
    let mut total = Point::identity();
    for msg in round1_msgs {
        let mut power = Scalar::one();
        for &c_j in &msg.coefficient_commitments {
            total += c_j * power;
            power *= x;
        }
    }
    total
}

/// Finalizes key generation for `player`, given every round-1 broadcast and
/// the shares this player privately received in round 2 (one per other
/// player, in the same order as `round1_msgs`).
pub fn finalize(player: u32, received_shares: &[Scalar], round1_msgs: &[KeygenRound1]) -> Result<PlayerSecret> {
    if received_shares.len() != round1_msgs.len() {
        return Err(SparkError::ShapeMismatch(
            "keygen: received share count does not match round-1 broadcast count".into(),
        ));
    }
    let r = received_shares.iter().copied().sum();
    let group_public = round1_msgs
        .iter()
        .fold(Point::identity(), |acc, m| acc + m.coefficient_commitments[0]);

    let mut s1_inputs: Vec<[u8; 32]> = round1_msgs.iter().map(|m| m.s1_share.to_bytes()).collect();
    s1_inputs.sort();
    let s1 = Scalar::hash_to_scalar(
        DST_SPARK_S1,
        &s1_inputs.iter().map(|b| b.as_slice()).collect::<Vec<_>>(),
    );

    let mut s2_inputs: Vec<[u8; 32]> = round1_msgs.iter().map(|m| m.s2_share.to_bytes()).collect();
    s2_inputs.sort();
    let s2 = Scalar::hash_to_scalar(
        DST_SPARK_S2,
        &s2_inputs.iter().map(|b| b.as_slice()).collect::<Vec<_>>(),
    );

    Ok(PlayerSecret {
        id: player,
        r,
        group_public,
        s1,
        s2,
    })
}
