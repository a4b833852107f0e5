//! Hashing into the scalar field and onto the curve.
//!
//! Both `hash_to_scalar` and `hash_to_point` absorb a domain-separation label
//! followed by an ordered sequence of already-encoded byte strings, then
//! squeeze 64 bytes out of SHA3-512 and reduce into the target space. Using a
//! wide (512-bit) output before reduction keeps the bias from the reduction
//! negligible, the same technique `curve25519-dalek`'s own
//! `Scalar::from_bytes_mod_order_wide` is built for.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar as DalekScalar;
use sha3::{Digest, Sha3_512};

use crate::algebra::point::Point;
use crate::algebra::scalar::Scalar;

/// Absorbs a label and a sequence of byte strings, each length-prefixed so
/// that `(a, bc)` and `(ab, c)` never collide.
fn wide_digest(label: &[u8], parts: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Sha3_512::new();
    hasher.update((label.len() as u64).to_le_bytes());
    hasher.update(label);
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 64];
    out.copy_from_slice(&digest);
    out
}

/// Hashes a label and a sequence of encoded inputs to a uniformly distributed
/// scalar modulo the group order ℓ.
pub fn hash_to_scalar(label: &[u8], parts: &[&[u8]]) -> Scalar {
    let wide = wide_digest(label, parts);
    Scalar::from(DalekScalar::from_bytes_mod_order_wide(&wide))
}

/// Hashes a label and a sequence of encoded inputs to 32 raw bytes, for
/// deriving symmetric keys (AEAD keys, stream-cipher keys) rather than group
/// elements — these must not be reduced modulo the group order.
pub fn hash_to_bytes32(label: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let wide = wide_digest(label, parts);
    let mut out = [0u8; 32];
    out.copy_from_slice(&wide[..32]);
    out
}

/// Hashes a label and a sequence of encoded inputs onto the curve via the
/// Ristretto `from_uniform_bytes` map (itself built on Elligator2).
pub fn hash_to_point(label: &[u8], parts: &[&[u8]]) -> Point {
    let mut hasher = Sha3_512::new();
    hasher.update((label.len() as u64).to_le_bytes());
    hasher.update(label);
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    // Ristretto's uniform map wants 64 bytes; draw a second block from a
    // domain-separated continuation of the same hash so a single SHA3-512
    // call's 64-byte output isn't silently reused for two different points.
    let first = hasher.finalize();
    let mut second_hasher = Sha3_512::new();
    second_hasher.update(b"hash_to_point continuation");
    second_hasher.update(first.as_slice());
    let second = second_hasher.finalize();

    let mut wide = [0u8; 64];
    wide[..32].copy_from_slice(&first[..32]);
    wide[32..].copy_from_slice(&second[..32]);

    Point::from(RistrettoPoint::from_uniform_bytes(&wide))
}
