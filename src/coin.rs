//! Coin construction, identification, recovery, and delegation (`spec.md`
//! §4.7-§4.9).
//!
//! A `Coin` carries whichever fields its [`CoinType`] calls for: STANDARD
//! hides both recipient and value behind a range proof, a Janus proof and an
//! AEAD ciphertext; MINT hides only the recipient; PAYOUT hides neither and
//! carries no proof beyond the modified-Chaum spend authorization produced
//! elsewhere. `construct`/`identify`/`recover`/`delegate` below mirror that
//! one procedure per lifecycle stage.

use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::address::{FullViewKey, IncomingViewKey};
use crate::aead::{aead_decrypt, aead_encrypt};
use crate::algebra::{hash_to_bytes32, Point, Scalar};
use crate::backends::range_proof::{
    BitDecompositionBackend, BitDecompositionProof, RangeProofBackend, RangeStatement,
};
use crate::constants::{
    AD_MINT_RECIPIENT_DATA, AD_SPEND_RECIPIENT_DATA, DST_AEAD, DST_COIN_FINGERPRINT, DST_SER,
    DST_SER1, DST_VAL, DST_VAL1, DST_VIEW_TAG,
};
use crate::error::{Result, SparkError};
use crate::proofs::janus::{self, JanusProof, JanusStatement};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinType {
    Standard = 0,
    Mint = 1,
    Payout = 2,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinParameters {
    pub f: Point,
    pub g: Point,
    pub h: Point,
    pub u: Point,
    pub value_bytes: u8,
    pub memo_bytes: u16,
}

impl CoinParameters {
    fn max_value_exclusive(&self) -> u128 {
        1u128 << (8 * self.value_bytes as u32)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Coin {
    pub variant: CoinType,
    /// The recovery key `K = k·Q0`.
    pub k: Point,
    /// Serial-number commitment `S = H("ser", K_der)·F + Q2`.
    pub s: Point,
    /// Value commitment `C = value·G + H("val", K_der)·H`.
    pub c: Point,
    /// Plaintext value, present for MINT and PAYOUT; hidden behind
    /// `ciphertext` for STANDARD.
    pub value: Option<u64>,
    /// Present only for STANDARD, over `c` with bit width `8·value_bytes`.
    pub range_proof: Option<BitDecompositionProof>,
    /// Present for STANDARD and MINT; absent for PAYOUT, whose deterministic
    /// `k` needs no Janus protection since the recipient is already known.
    pub janus_proof: Option<JanusProof>,
    /// AEAD ciphertext: value‖memo for STANDARD, memo alone for MINT, absent
    /// for PAYOUT.
    pub ciphertext: Option<Vec<u8>>,
    pub view_tag: u8,
}

pub struct IdentifiedCoin {
    pub index: u64,
    pub diversifier: Vec<u8>,
    pub value: u64,
    pub memo: String,
    pub k_der: Point,
}

pub struct RecoveredCoin {
    pub identified: IdentifiedCoin,
    /// The reconstructed serial-number scalar.
    pub s: Scalar,
    /// The linkability tag `T = s⁻¹·(U − D)`.
    pub tag: Point,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinDelegation {
    pub id: Vec<u8>,
    pub s1_prime: Scalar,
    pub s1_point: Point,
    /// `H("val", K_der) − c1'`, not `c1'` itself; see `spec.md` §4.9 / §9.
    pub c1: Scalar,
    pub c1_point: Point,
}

fn encode_value(value: u64, value_bytes: u8) -> Vec<u8> {
    value.to_le_bytes()[..value_bytes as usize].to_vec()
}

fn decode_value(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

fn encode_memo(memo: &str, memo_bytes: u16) -> Result<Vec<u8>> {
    let raw = memo.as_bytes();
    if raw.len() > memo_bytes as usize {
        return Err(SparkError::OutOfRange(format!(
            "memo is {} bytes, budget is {memo_bytes}",
            raw.len()
        )));
    }
    let mut padded = raw.to_vec();
    padded.resize(memo_bytes as usize, 0);
    Ok(padded)
}

fn decode_memo(bytes: &[u8]) -> Result<String> {
    let trimmed_len = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8(bytes[..trimmed_len].to_vec())
        .map_err(|_| SparkError::NotMine)
}

fn view_tag_byte(k_der: &Point) -> u8 {
    hash_to_bytes32(DST_VIEW_TAG, &[&k_der.to_bytes()])[0]
}

fn serial_f_coefficient(k_der: &Point) -> Scalar {
    Scalar::hash_to_scalar(DST_SER, &[&k_der.to_bytes()])
}

fn value_h_coefficient(k_der: &Point) -> Scalar {
    Scalar::hash_to_scalar(DST_VAL, &[&k_der.to_bytes()])
}

fn aead_key(k_der: &Point) -> [u8; 32] {
    hash_to_bytes32(DST_AEAD, &[&k_der.to_bytes()])
}

impl Coin {
    /// Builds a coin addressed to `address`, per `spec.md` §4.7.
    ///
    /// `k` must be `Some` for PAYOUT (the deterministic scalar the sender and
    /// recipient both compute independently) and is sampled fresh otherwise;
    /// supplying `k` for STANDARD/MINT is an error, since those variants'
    /// unlinkability depends on `k` being unpredictable.
    pub fn construct<R: RngCore + CryptoRng>(
        params: &CoinParameters,
        address: &crate::address::PublicAddress,
        variant: CoinType,
        value: u64,
        memo: &str,
        k: Option<Scalar>,
        rng: &mut R,
    ) -> Result<Self> {
        if (value as u128) >= params.max_value_exclusive() {
            return Err(SparkError::OutOfRange(format!(
                "value {value} does not fit in {} bytes",
                params.value_bytes
            )));
        }
        let k = match (variant, k) {
            (CoinType::Payout, Some(k)) => k,
            (CoinType::Payout, None) => {
                return Err(SparkError::InvalidWitness(
                    "payout coins require a deterministic k".into(),
                ))
            }
            (_, Some(_)) => {
                return Err(SparkError::InvalidWitness(
                    "only payout coins take a caller-supplied k".into(),
                ))
            }
            (_, None) => Scalar::random(rng),
        };

        let k_point = address.q0 * k;
        let k_der = address.q1 * k;
        let s = params.f * serial_f_coefficient(&k_der) + address.q2;
        let c = params.g * Scalar::from_u64(value) + params.h * value_h_coefficient(&k_der);

        let range_proof = if matches!(variant, CoinType::Standard) {
            let stmt = RangeStatement {
                value_base: params.g,
                blind_base: params.h,
                commitment: c,
                bits: 8 * params.value_bytes as u32,
            };
            Some(BitDecompositionBackend::prove(
                &stmt,
                value,
                value_h_coefficient(&k_der),
                rng,
            )?)
        } else {
            None
        };

        let janus_proof = if matches!(variant, CoinType::Standard | CoinType::Mint) {
            let stmt = JanusStatement {
                q0: address.q0,
                q1: address.q1,
                q2: address.q2,
                k: k_point,
                k_der,
            };
            Some(janus::prove(&stmt, k, rng)?)
        } else {
            None
        };

        let ciphertext = match variant {
            CoinType::Standard => {
                let mut plaintext = encode_value(value, params.value_bytes);
                plaintext.extend(encode_memo(memo, params.memo_bytes)?);
                Some(aead_encrypt(
                    &aead_key(&k_der),
                    &plaintext,
                    AD_SPEND_RECIPIENT_DATA,
                )?)
            }
            CoinType::Mint => {
                let plaintext = encode_memo(memo, params.memo_bytes)?;
                Some(aead_encrypt(
                    &aead_key(&k_der),
                    &plaintext,
                    AD_MINT_RECIPIENT_DATA,
                )?)
            }
            CoinType::Payout => None,
        };

        let exposed_value = match variant {
            CoinType::Standard => None,
            CoinType::Mint | CoinType::Payout => Some(value),
        };

        Ok(Coin {
            variant,
            k: k_point,
            s,
            c,
            value: exposed_value,
            range_proof,
            janus_proof,
            ciphertext,
            view_tag: view_tag_byte(&k_der),
        })
    }

    /// A hash over this coin's publishable fields, used as its identity in
    /// downstream transcripts (the Pay proof's context, a stake transaction's
    /// cover set).
    pub fn fingerprint(&self) -> [u8; 32] {
        let variant_byte = [self.variant as u8];
        let value_bytes = self.value.map(|v| v.to_le_bytes()).unwrap_or_default();
        let empty: Vec<u8> = Vec::new();
        let ciphertext = self.ciphertext.as_deref().unwrap_or(&empty);
        hash_to_bytes32(
            DST_COIN_FINGERPRINT,
            &[
                &variant_byte,
                &self.k.to_bytes(),
                &self.s.to_bytes(),
                &self.c.to_bytes(),
                &value_bytes,
                ciphertext,
                &[self.view_tag],
            ],
        )
    }

    /// Publicly verifies a PAYOUT coin against a claimed opening `(address,
    /// k)`, without the Pay proof — anyone who is told `k` can run this
    /// directly, since PAYOUT coins carry no Janus protection to defeat.
    /// Used by `transactions::payout` test scenarios and by any third party
    /// handed `k` out of band.
    pub fn verify_payout(
        &self,
        params: &CoinParameters,
        address: &PublicAddress,
        k: Scalar,
    ) -> Result<()> {
        if !matches!(self.variant, CoinType::Payout) {
            return Err(SparkError::TypeMismatch(
                "verify_payout: coin is not a PAYOUT coin".into(),
            ));
        }
        let value = self
            .value
            .ok_or_else(|| SparkError::TypeMismatch("payout coin is missing its value".into()))?;
        if (value as u128) >= params.max_value_exclusive() {
            return Err(SparkError::OutOfRange(format!(
                "value {value} does not fit in {} bytes",
                params.value_bytes
            )));
        }
        if self.k != address.q0 * k {
            return Err(SparkError::VerificationFailed(
                "payout: recovery key does not open under k".into(),
            ));
        }
        let k_der = address.q1 * k;
        if self.s != params.f * serial_f_coefficient(&k_der) + address.q2 {
            return Err(SparkError::VerificationFailed(
                "payout: serial commitment does not open under k".into(),
            ));
        }
        if self.c != params.g * Scalar::from_u64(value) + params.h * value_h_coefficient(&k_der) {
            return Err(SparkError::VerificationFailed(
                "payout: value commitment does not open under k".into(),
            ));
        }
        Ok(())
    }
}

impl IncomingViewKey {
    /// Tests whether `coin` is addressed to this view key, per `spec.md`
    /// §4.8. `diversifier_lookahead` bounds the search over candidate address
    /// indices used to recover which `Q2` produced the coin's `S`; callers
    /// scanning a wallet typically pass a small constant (e.g. a few hundred)
    /// rather than the full index space.
    pub fn identify(
        &self,
        params: &CoinParameters,
        coin: &Coin,
        diversifier_lookahead: u64,
    ) -> Result<IdentifiedCoin> {
        let k_der = self.s1 * coin.k;
        if view_tag_byte(&k_der) != coin.view_tag {
            return Err(SparkError::NotMine);
        }
        let q2_candidate = coin.s - params.f * serial_f_coefficient(&k_der);

        let mut matched = None;
        for i in 0..diversifier_lookahead {
            let candidate = match self.derive_address(i) {
                Ok(addr) => addr,
                Err(_) => break,
            };
            if candidate.q2 == q2_candidate {
                matched = Some(candidate);
                break;
            }
        }
        let address = matched.ok_or(SparkError::NotMine)?;

        if matches!(coin.variant, CoinType::Standard | CoinType::Mint) {
            let janus_proof = coin.janus_proof.as_ref().ok_or(SparkError::NotMine)?;
            let stmt = JanusStatement {
                q0: address.q0,
                q1: address.q1,
                q2: address.q2,
                k: coin.k,
                k_der,
            };
            janus::verify(&stmt, janus_proof).map_err(|_| SparkError::NotMine)?;
        }

        let (value, memo) = match coin.variant {
            CoinType::Standard => {
                let ciphertext = coin.ciphertext.as_ref().ok_or(SparkError::NotMine)?;
                let plaintext = aead_decrypt(
                    &aead_key(&k_der),
                    ciphertext,
                    AD_SPEND_RECIPIENT_DATA,
                )?;
                if plaintext.len() != params.value_bytes as usize + params.memo_bytes as usize {
                    return Err(SparkError::NotMine);
                }
                let value = decode_value(&plaintext[..params.value_bytes as usize]);
                let memo = decode_memo(&plaintext[params.value_bytes as usize..])?;
                (value, memo)
            }
            CoinType::Mint => {
                let ciphertext = coin.ciphertext.as_ref().ok_or(SparkError::NotMine)?;
                let plaintext =
                    aead_decrypt(&aead_key(&k_der), ciphertext, AD_MINT_RECIPIENT_DATA)?;
                let memo = decode_memo(&plaintext)?;
                let value = coin.value.ok_or(SparkError::NotMine)?;
                (value, memo)
            }
            CoinType::Payout => {
                let value = coin.value.ok_or(SparkError::NotMine)?;
                (value, String::new())
            }
        };

        let expected_c = params.g * Scalar::from_u64(value) + params.h * value_h_coefficient(&k_der);
        if expected_c != coin.c {
            return Err(SparkError::NotMine);
        }

        if matches!(coin.variant, CoinType::Standard) {
            let range_proof = coin.range_proof.as_ref().ok_or(SparkError::NotMine)?;
            let stmt = RangeStatement {
                value_base: params.g,
                blind_base: params.h,
                commitment: coin.c,
                bits: 8 * params.value_bytes as u32,
            };
            BitDecompositionBackend::verify(&stmt, range_proof).map_err(|_| SparkError::NotMine)?;
        }

        Ok(IdentifiedCoin {
            index: address.index,
            diversifier: address.diversifier,
            value,
            memo,
            k_der,
        })
    }
}

impl FullViewKey {
    /// Recovers the spend-side secrets behind an already-identified coin,
    /// per `spec.md` §4.9.
    pub fn recover(
        &self,
        params: &CoinParameters,
        identified: IdentifiedCoin,
    ) -> Result<RecoveredCoin> {
        let q2_hash = Scalar::hash_to_scalar(
            crate::constants::DST_Q2,
            &[&self.s1.to_bytes(), &identified.index.to_le_bytes()],
        );
        let s = serial_f_coefficient(&identified.k_der) + q2_hash + self.s2;
        let s_inv = s.invert()?;
        let tag = (params.u - self.d) * s_inv;
        Ok(RecoveredCoin {
            identified,
            s,
            tag,
        })
    }
}

/// Binds a recovered coin's `(s, value)` to a public `id`, per `spec.md`
/// §4.9.
pub fn delegate(
    params: &CoinParameters,
    fvk: &FullViewKey,
    recovered: &RecoveredCoin,
    id: &[u8],
) -> CoinDelegation {
    let s = recovered.s;
    let value = recovered.identified.value;
    let context: &[&[u8]] = &[id, &s.to_bytes(), &fvk.s1.to_bytes(), &fvk.s2.to_bytes()];
    let s1_prime = Scalar::hash_to_scalar(DST_SER1, context);
    let c1_prime = Scalar::hash_to_scalar(DST_VAL1, context);

    let s1_point = params.f * s - params.h * s1_prime + fvk.d;
    let c1_point = params.g * Scalar::from_u64(value) + params.h * c1_prime;
    let c1 = value_h_coefficient(&recovered.identified.k_der) - c1_prime;

    CoinDelegation {
        id: id.to_vec(),
        s1_prime,
        s1_point,
        c1,
        c1_point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{AddressParameters, SpendKey};
    use rand::rngs::OsRng;

    fn test_params() -> CoinParameters {
        CoinParameters {
            f: Point::hash_to_point(b"coin F", &[]),
            g: Point::hash_to_point(b"coin G", &[]),
            h: Point::hash_to_point(b"coin H", &[]),
            u: Point::hash_to_point(b"coin U", &[]),
            value_bytes: 8,
            memo_bytes: 16,
        }
    }

    fn test_address_params() -> AddressParameters {
        AddressParameters::new(
            Point::hash_to_point(b"addr F", &[]),
            Point::hash_to_point(b"addr G", &[]),
            8,
        )
        .unwrap()
    }

    #[test]
    fn standard_coin_round_trips_through_identify_and_recover() {
        let mut rng = OsRng;
        let spend_key = SpendKey::random(test_address_params(), &mut rng);
        let fvk = spend_key.to_full_view_key();
        let ivk = fvk.to_incoming_view_key();
        let address = ivk.derive_address(3).unwrap();

        let params = test_params();
        let coin = Coin::construct(
            &params,
            &address,
            CoinType::Standard,
            1234,
            "hello",
            None,
            &mut rng,
        )
        .unwrap();

        let identified = ivk.identify(&params, &coin, 16).unwrap();
        assert_eq!(identified.value, 1234);
        assert_eq!(identified.memo, "hello");
        assert_eq!(identified.index, 3);

        let recovered = fvk.recover(&params, identified).unwrap();
        assert_ne!(recovered.tag, Point::identity());
    }

    #[test]
    fn mint_coin_round_trips() {
        let mut rng = OsRng;
        let spend_key = SpendKey::random(test_address_params(), &mut rng);
        let fvk = spend_key.to_full_view_key();
        let ivk = fvk.to_incoming_view_key();
        let address = ivk.derive_address(0).unwrap();

        let params = test_params();
        let coin = Coin::construct(
            &params,
            &address,
            CoinType::Mint,
            999,
            "memo",
            None,
            &mut rng,
        )
        .unwrap();

        let identified = ivk.identify(&params, &coin, 4).unwrap();
        assert_eq!(identified.value, 999);
        assert_eq!(identified.memo, "memo");
    }

    #[test]
    fn payout_coin_requires_deterministic_k_and_round_trips() {
        let mut rng = OsRng;
        let spend_key = SpendKey::random(test_address_params(), &mut rng);
        let fvk = spend_key.to_full_view_key();
        let ivk = fvk.to_incoming_view_key();
        let address = ivk.derive_address(7).unwrap();

        let params = test_params();
        assert!(Coin::construct(
            &params,
            &address,
            CoinType::Payout,
            5,
            "",
            None,
            &mut rng,
        )
        .is_err());

        let k = Scalar::hash_to_scalar(b"deterministic payout k", &[]);
        let coin = Coin::construct(
            &params,
            &address,
            CoinType::Payout,
            5,
            "",
            Some(k),
            &mut rng,
        )
        .unwrap();
        let identified = ivk.identify(&params, &coin, 8).unwrap();
        assert_eq!(identified.value, 5);
    }

    #[test]
    fn verify_payout_checks_the_claimed_opening() {
        let mut rng = OsRng;
        let spend_key = SpendKey::random(test_address_params(), &mut rng);
        let fvk = spend_key.to_full_view_key();
        let ivk = fvk.to_incoming_view_key();
        let address = ivk.derive_address(5).unwrap();

        let params = test_params();
        let k = Scalar::hash_to_scalar(b"payout_k", &[]);
        let coin = Coin::construct(&params, &address, CoinType::Payout, 77, "", Some(k), &mut rng)
            .unwrap();

        coin.verify_payout(&params, &address, k).unwrap();
        assert!(coin.verify_payout(&params, &address, k + Scalar::one()).is_err());

        let other_address = ivk.derive_address(6).unwrap();
        assert!(coin.verify_payout(&params, &other_address, k).is_err());
    }

    #[test]
    fn identify_skips_fast_on_a_tampered_view_tag() {
        let mut rng = OsRng;
        let spend_key = SpendKey::random(test_address_params(), &mut rng);
        let fvk = spend_key.to_full_view_key();
        let ivk = fvk.to_incoming_view_key();
        let address = ivk.derive_address(4).unwrap();

        let params = test_params();
        let mut coin = Coin::construct(
            &params,
            &address,
            CoinType::Standard,
            42,
            "hello",
            None,
            &mut rng,
        )
        .unwrap();

        // Corrupt both the view tag and the ciphertext: if the view-tag
        // check did not short-circuit, the corrupted ciphertext would still
        // fail AEAD decryption (also NotMine), so this alone would not prove
        // the short-circuit fires. The tag flip is the property under test;
        // the ciphertext corruption just documents that the scan never
        // needed to reach it.
        coin.view_tag ^= 0xFF;
        coin.ciphertext.as_mut().unwrap()[0] ^= 0xFF;

        assert!(matches!(
            ivk.identify(&params, &coin, 16),
            Err(SparkError::NotMine)
        ));
    }

    #[test]
    fn identify_fails_for_a_foreign_view_key() {
        let mut rng = OsRng;
        let owner_spend_key = SpendKey::random(test_address_params(), &mut rng);
        let owner_fvk = owner_spend_key.to_full_view_key();
        let owner_ivk = owner_fvk.to_incoming_view_key();
        let address = owner_ivk.derive_address(1).unwrap();

        let params = test_params();
        let coin = Coin::construct(
            &params,
            &address,
            CoinType::Standard,
            42,
            "",
            None,
            &mut rng,
        )
        .unwrap();

        let stranger_spend_key = SpendKey::random(test_address_params(), &mut rng);
        let stranger_ivk = stranger_spend_key.to_full_view_key().to_incoming_view_key();
        assert!(stranger_ivk.identify(&params, &coin, 16).is_err());
    }

    #[test]
    fn delegation_binds_value_to_an_id() {
        let mut rng = OsRng;
        let spend_key = SpendKey::random(test_address_params(), &mut rng);
        let fvk = spend_key.to_full_view_key();
        let ivk = fvk.to_incoming_view_key();
        let address = ivk.derive_address(2).unwrap();

        let params = test_params();
        let coin = Coin::construct(
            &params,
            &address,
            CoinType::Standard,
            10,
            "",
            None,
            &mut rng,
        )
        .unwrap();
        let identified = ivk.identify(&params, &coin, 8).unwrap();
        let recovered = fvk.recover(&params, identified).unwrap();

        let delegation_a = delegate(&params, &fvk, &recovered, b"transaction-a");
        let delegation_b = delegate(&params, &fvk, &recovered, b"transaction-b");
        assert_ne!(delegation_a.s1_point, delegation_b.s1_point);
    }
}
