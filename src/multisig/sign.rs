//! Two-round FROST-style threshold signing over a modified-Chaum statement
//! (`spec.md` §4.10, "Signing"). The committee's DKG-shared secret only
//! covers the statement's `G`-coefficient (`y`); the per-row spend-witness
//! scalars `x`/`z` are supplied directly by whoever is driving the session
//! (the same custodians who already ran `Coin::recover` to learn them), so
//! only `t2` is actually assembled from per-player partial shares — the only
//! quantity `spec.md` §4.10 describes a "Partial t2_α" for.
//!
//! The resulting `(A1, A2, t1, t2, t3)` tuple is exactly a
//! [`crate::proofs::chaum::ChaumProof`], verified with the same equations as
//! the single-party prover but starting challenge powers at `c^0` instead of
//! `c^1` — see [`crate::proofs::chaum::verify_with_power_offset`].

use crate::algebra::{Point, Scalar};
use crate::constants::{DST_MULTISIG_F_T, DST_MULTISIG_H, DST_MULTISIG_NONCE_HASH};
use crate::error::{Result, SparkError};
use crate::multisig::player::lagrange_for;
use crate::multisig::precompute::{NonceCommitment, NonceStack};
use crate::proofs::chaum::{transcript_for, ChaumProof, ChaumStatement};
use crate::transcript::SparkTranscript;

/// A committee member's state needed to contribute to one signing session:
/// their share of the DKG secret, their public verification share
/// (`R_α = r_α·G`, from `keygen::player_public_share`), and their nonce
/// stack (mutated in place — `sign` pops exactly one pair per row).
pub struct SigningPlayer {
    pub id: u32,
    pub r: Scalar,
    pub public_share: Point,
    pub nonces: NonceStack,
}

fn row_binder(
    stmt: &ChaumStatement,
    row: usize,
    signer_ids: &[u32],
    commitments: &[NonceCommitment],
) -> Scalar {
    let mut parts: Vec<Vec<u8>> = Vec::new();
    parts.push(stmt.context.to_bytes().to_vec());
    parts.push(stmt.s[row].to_bytes().to_vec());
    parts.push(stmt.t[row].to_bytes().to_vec());
    for id in signer_ids {
        parts.push(id.to_le_bytes().to_vec());
    }
    for c in commitments {
        parts.push(c.d_point.to_bytes().to_vec());
        parts.push(c.e_point.to_bytes().to_vec());
    }
    let refs: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
    Scalar::hash_to_scalar(DST_MULTISIG_NONCE_HASH, &refs)
}

/// Runs a full signing session in-process: computes the public nonce
/// binders, the Fiat-Shamir challenge, every player's partial `t2`
/// contribution, and aggregates the result into a `ChaumProof`.
///
/// `nonce_commitments[u]` holds one public `(D, E)` pair per signer in
/// `signer_ids` order, for row `u`; `signers` must be in that same order and
/// each player's nonce stack must have the matching secret pairs on top, in
/// row order, so that popping once per row yields the nonce whose public
/// commitment was already broadcast for that row.
pub fn sign(
    stmt: &ChaumStatement,
    x: &[Scalar],
    z: &[Scalar],
    signer_ids: &[u32],
    nonce_commitments: &[Vec<NonceCommitment>],
    signers: &mut [SigningPlayer],
) -> Result<ChaumProof> {
    let n = stmt.s.len();
    if stmt.t.len() != n {
        return Err(SparkError::ShapeMismatch(
            "multisig sign: S and T must have equal length".into(),
        ));
    }
    if x.len() != n || z.len() != n {
        return Err(SparkError::ShapeMismatch(
            "multisig sign: witness vectors must match row count".into(),
        ));
    }
    if nonce_commitments.len() != n {
        return Err(SparkError::ShapeMismatch(
            "multisig sign: one nonce-commitment row per statement row is required".into(),
        ));
    }
    if signers.len() != signer_ids.len() {
        return Err(SparkError::ShapeMismatch(
            "multisig sign: signer state must match the signer-id list".into(),
        ));
    }
    for (player, &id) in signers.iter().zip(signer_ids.iter()) {
        if player.id != id {
            return Err(SparkError::ShapeMismatch(
                "multisig sign: signer state is not ordered like signer_ids".into(),
            ));
        }
    }
    for row in nonce_commitments {
        if row.len() != signer_ids.len() {
            return Err(SparkError::ShapeMismatch(
                "multisig sign: each row needs one nonce commitment per signer".into(),
            ));
        }
    }

    let lambda = lagrange_for(signer_ids)?;

    let rho: Vec<Scalar> = (0..n)
        .map(|u| row_binder(stmt, u, signer_ids, &nonce_commitments[u]))
        .collect();
    let rho_ft: Vec<Scalar> = rho
        .iter()
        .map(|r| Scalar::hash_to_scalar(DST_MULTISIG_F_T, &[&r.to_bytes()]))
        .collect();
    let rho_h: Vec<Scalar> = rho
        .iter()
        .map(|r| Scalar::hash_to_scalar(DST_MULTISIG_H, &[&r.to_bytes()]))
        .collect();

    let mut a1 = Point::identity();
    let mut a2 = Vec::with_capacity(n);
    for u in 0..n {
        let nonce_sum = nonce_commitments[u]
            .iter()
            .fold(Point::identity(), |acc, c| acc + c.d_point + c.e_point * rho[u]);
        a1 += stmt.f * rho_ft[u] + stmt.h * rho_h[u] + nonce_sum;
        a2.push(stmt.t[u] * rho_ft[u] + nonce_sum);
    }

    let mut transcript = transcript_for(stmt);
    transcript.append_point(b"a1", &a1);
    transcript.append_points(b"a2", &a2);
    let c = transcript.challenge_scalar(b"c");

    let t1: Vec<Scalar> = (0..n)
        .map(|u| rho_ft[u] + c.pow(u as u64) * x[u])
        .collect();
    let t3: Scalar = (0..n)
        .map(|u| rho_h[u] + c.pow(u as u64) * z[u])
        .sum();

    // Pop every player's nonces for every row before checking anything: a
    // forged partial signature from one player must never leave a later
    // player's nonces unconsumed, or those nonces could be handed out again
    // for a different statement.
    let mut popped: Vec<Vec<_>> = Vec::with_capacity(signers.len());
    let mut pop_err = None;
    for player in signers.iter_mut() {
        let mut rows = Vec::with_capacity(n);
        for _ in 0..n {
            match player.nonces.pop() {
                Ok(pair) => rows.push(pair),
                Err(e) => {
                    pop_err.get_or_insert(e);
                    break;
                }
            }
        }
        popped.push(rows);
    }
    if let Some(e) = pop_err {
        return Err(e);
    }

    let mut t2 = Scalar::zero();
    let mut verify_err = None;
    for (k, (player, &lambda_alpha)) in signers.iter().zip(lambda.iter()).enumerate() {
        let mut partial = Scalar::zero();
        let mut expected = Point::identity();
        for u in 0..n {
            let pair = popped[k][u];
            let power = c.pow(u as u64);
            partial += pair.d + rho[u] * pair.e + lambda_alpha * player.r * power;
            let nc = &nonce_commitments[u][k];
            expected += nc.d_point + nc.e_point * rho[u] + player.public_share * (lambda_alpha * power);
        }
        if stmt.g * partial != expected {
            verify_err.get_or_insert_with(|| {
                SparkError::VerificationFailed(format!(
                    "multisig sign: player {} produced an inconsistent partial signature",
                    player.id
                ))
            });
            continue;
        }
        t2 += partial;
    }
    if let Some(e) = verify_err {
        return Err(e);
    }

    Ok(ChaumProof {
        a1,
        a2,
        t1,
        t2,
        t3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multisig::keygen::{finalize, player_public_share, round1, round2_share, verify_round1, verify_round2_share};
    use crate::multisig::precompute::{generate, NonceStack};
    use crate::proofs::chaum::verify_with_power_offset;
    use rand::rngs::OsRng;

    #[test]
    fn two_of_three_committee_produces_a_verifiable_signature() {
        let mut rng = OsRng;
        let f = Point::hash_to_point(b"multisig F", &[]);
        let g = Point::hash_to_point(b"multisig G", &[]);
        let h = Point::hash_to_point(b"multisig H", &[]);

        let threshold = 2u32;
        let ids = [1u32, 2, 3];
        let mut private_coeffs = Vec::new();
        let mut broadcasts = Vec::new();
        for &id in &ids {
            let (coeffs, msg) = round1(id, threshold, g, &mut rng);
            private_coeffs.push(coeffs);
            broadcasts.push(msg);
        }
        for msg in &broadcasts {
            verify_round1(msg, g).unwrap();
        }
        let mut secrets = Vec::new();
        for &player in &ids {
            let mut received = Vec::new();
            for (sender_idx, _) in ids.iter().enumerate() {
                let share = round2_share(&private_coeffs[sender_idx], player);
                verify_round2_share(share, player, &broadcasts[sender_idx], g).unwrap();
                received.push(share);
            }
            secrets.push(finalize(player, &received, &broadcasts).unwrap());
        }

        // The committee's actual shared secret is the sum of every player's
        // constant term, reconstructible from any 2-of-3 subset of `r`
        // shares via Lagrange interpolation — not any individual player's
        // view-key share.
        let n = 2usize;
        let signer_ids_for_y = [1u32, 2];
        let lambda_for_y = lagrange_for(&signer_ids_for_y).unwrap();
        let y = lambda_for_y[0] * secrets[0].r + lambda_for_y[1] * secrets[1].r;
        let x: Vec<Scalar> = (0..n).map(|i| Scalar::from_u64(1000 + i as u64)).collect();
        let z: Vec<Scalar> = (0..n).map(|i| Scalar::from_u64(2000 + i as u64)).collect();
        let u_point = Point::hash_to_point(b"multisig U", &[]);
        let t: Vec<Point> = x
            .iter()
            .map(|&xi| (u_point - g * y) * xi.invert().unwrap())
            .collect();
        let s: Vec<Point> = (0..n)
            .map(|i| f * x[i] + g * y + h * z[i])
            .collect();

        let stmt = ChaumStatement {
            f,
            g,
            h,
            u: u_point,
            context: Scalar::from_u64(55),
            s,
            t,
        };

        let signer_ids = [1u32, 2];
        let mut nonce_secrets = Vec::new();
        let mut nonce_commitments_per_signer = Vec::new();
        for _ in &signer_ids {
            let (secrets_n, commitments_n) = generate(n, g, &mut rng);
            nonce_secrets.push(secrets_n);
            nonce_commitments_per_signer.push(commitments_n);
        }
        // Rows are popped in order, so push the stack with row (n-1) on top.
        let mut players: Vec<SigningPlayer> = signer_ids
            .iter()
            .enumerate()
            .map(|(k, &id)| {
                let secret = secrets.iter().find(|s| s.id == id).unwrap();
                let mut pairs = nonce_secrets[k].clone();
                pairs.reverse();
                SigningPlayer {
                    id,
                    r: secret.r,
                    public_share: player_public_share(id, &broadcasts),
                    nonces: NonceStack::new(pairs),
                }
            })
            .collect();

        let nonce_commitments: Vec<Vec<NonceCommitment>> = (0..n)
            .map(|row| {
                (0..signer_ids.len())
                    .map(|k| nonce_commitments_per_signer[k][row])
                    .collect()
            })
            .collect();

        let proof = sign(&stmt, &x, &z, &signer_ids, &nonce_commitments, &mut players).unwrap();
        verify_with_power_offset(&stmt, &proof, 0).unwrap();

        for player in &players {
            assert!(player.nonces.is_empty());
        }
    }

    #[test]
    fn a_forged_middle_player_still_drains_every_later_players_nonces() {
        let mut rng = OsRng;
        let f = Point::hash_to_point(b"multisig forged F", &[]);
        let g = Point::hash_to_point(b"multisig forged G", &[]);
        let h = Point::hash_to_point(b"multisig forged H", &[]);

        let threshold = 3u32;
        let ids = [1u32, 2, 3];
        let mut private_coeffs = Vec::new();
        let mut broadcasts = Vec::new();
        for &id in &ids {
            let (coeffs, msg) = round1(id, threshold, g, &mut rng);
            private_coeffs.push(coeffs);
            broadcasts.push(msg);
        }
        for msg in &broadcasts {
            verify_round1(msg, g).unwrap();
        }
        let mut secrets = Vec::new();
        for &player in &ids {
            let mut received = Vec::new();
            for (sender_idx, _) in ids.iter().enumerate() {
                let share = round2_share(&private_coeffs[sender_idx], player);
                verify_round2_share(share, player, &broadcasts[sender_idx], g).unwrap();
                received.push(share);
            }
            secrets.push(finalize(player, &received, &broadcasts).unwrap());
        }

        let n = 2usize;
        let signer_ids = [1u32, 2, 3];
        let lambda_for_y = lagrange_for(&signer_ids).unwrap();
        let y = lambda_for_y[0] * secrets[0].r
            + lambda_for_y[1] * secrets[1].r
            + lambda_for_y[2] * secrets[2].r;
        let x: Vec<Scalar> = (0..n).map(|i| Scalar::from_u64(3000 + i as u64)).collect();
        let z: Vec<Scalar> = (0..n).map(|i| Scalar::from_u64(4000 + i as u64)).collect();
        let u_point = Point::hash_to_point(b"multisig forged U", &[]);
        let t: Vec<Point> = x
            .iter()
            .map(|&xi| (u_point - g * y) * xi.invert().unwrap())
            .collect();
        let s: Vec<Point> = (0..n)
            .map(|i| f * x[i] + g * y + h * z[i])
            .collect();

        let stmt = ChaumStatement {
            f,
            g,
            h,
            u: u_point,
            context: Scalar::from_u64(77),
            s,
            t,
        };

        let mut nonce_secrets = Vec::new();
        let mut nonce_commitments_per_signer = Vec::new();
        for _ in &signer_ids {
            let (secrets_n, commitments_n) = generate(n, g, &mut rng);
            nonce_secrets.push(secrets_n);
            nonce_commitments_per_signer.push(commitments_n);
        }
        let mut players: Vec<SigningPlayer> = signer_ids
            .iter()
            .enumerate()
            .map(|(k, &id)| {
                let secret = secrets.iter().find(|s| s.id == id).unwrap();
                let mut pairs = nonce_secrets[k].clone();
                pairs.reverse();
                SigningPlayer {
                    id,
                    r: secret.r,
                    public_share: player_public_share(id, &broadcasts),
                    nonces: NonceStack::new(pairs),
                }
            })
            .collect();

        // Forge the middle signer's local share of `r` without touching its
        // broadcast public share, so its partial-signature check fails while
        // the players on either side of it remain honest.
        players[1].r += Scalar::from_u64(1);

        let nonce_commitments: Vec<Vec<NonceCommitment>> = (0..n)
            .map(|row| {
                (0..signer_ids.len())
                    .map(|k| nonce_commitments_per_signer[k][row])
                    .collect()
            })
            .collect();

        assert!(sign(&stmt, &x, &z, &signer_ids, &nonce_commitments, &mut players).is_err());

        // Every player's nonces — including signer 3, ordered after the
        // forged signer 2 — must be fully consumed regardless.
        for player in &players {
            assert!(player.nonces.is_empty());
        }
    }
}
