//! PayoutTransaction (`spec.md` §4.11).
//!
//! Sender and recipient already agree on the `PublicAddress` and the
//! disclosed `value`; the coin's recovery scalar `k` is supplied rather than
//! sampled (the PAYOUT branch of `Coin::construct`), so both sides can
//! derive it deterministically from whatever shared context identifies this
//! payout (e.g. the id of the transaction that authorized it) without a
//! private channel. The Pay proof then binds `k` to `K`, `K_der`, and
//! `K_div` under the recipient's `Q0`/`Q1`/`F`.

use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::address::PublicAddress;
use crate::algebra::{Point, Scalar};
use crate::coin::{Coin, CoinParameters, CoinType};
use crate::error::{Result, SparkError};
use crate::proofs::pay::{self, PayProof, PayStatement};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutParameters {
    pub f: Point,
    pub g: Point,
    pub h: Point,
    pub u: Point,
    pub value_bytes: u8,
    pub memo_bytes: u16,
}

impl PayoutParameters {
    fn coin_params(&self) -> CoinParameters {
        CoinParameters {
            f: self.f,
            g: self.g,
            h: self.h,
            u: self.u,
            value_bytes: self.value_bytes,
            memo_bytes: self.memo_bytes,
        }
    }

    fn max_value_exclusive(&self) -> u128 {
        1u128 << (8 * self.value_bytes as u32)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PayoutTransaction {
    pub address: PublicAddress,
    pub output: Coin,
    pub value: u64,
    pub k_der: Point,
    pub k_div: Point,
    pub proof: PayProof,
}

impl PayoutTransaction {
    /// Builds a payout to `address` for `value`, using the caller-supplied
    /// deterministic `k`.
    pub fn construct<R: RngCore + CryptoRng>(
        params: &PayoutParameters,
        address: &PublicAddress,
        value: u64,
        k: Scalar,
        rng: &mut R,
    ) -> Result<Self> {
        if (value as u128) >= params.max_value_exclusive() {
            return Err(SparkError::OutOfRange(format!(
                "value {value} does not fit in {} bytes",
                params.value_bytes
            )));
        }
        let coin_params = params.coin_params();
        let output = Coin::construct(
            &coin_params,
            address,
            CoinType::Payout,
            value,
            "",
            Some(k),
            rng,
        )?;

        let k_der = address.q1 * k;
        let k_div = params.f * k;
        let stmt = PayStatement {
            q0: address.q0,
            q1: address.q1,
            f: params.f,
            k: output.k,
            k_der,
            k_div,
            context: output.fingerprint().to_vec(),
        };
        let proof = pay::prove(&stmt, k, rng)?;

        Ok(PayoutTransaction {
            address: address.clone(),
            output,
            value,
            k_der,
            k_div,
            proof,
        })
    }

    /// Re-verifies the Pay proof and the disclosed value's range.
    pub fn verify(&self, params: &PayoutParameters) -> Result<()> {
        if (self.value as u128) >= params.max_value_exclusive() {
            return Err(SparkError::OutOfRange(format!(
                "value {} does not fit in {} bytes",
                self.value, params.value_bytes
            )));
        }
        let stmt = PayStatement {
            q0: self.address.q0,
            q1: self.address.q1,
            f: params.f,
            k: self.output.k,
            k_der: self.k_der,
            k_div: self.k_div,
            context: self.output.fingerprint().to_vec(),
        };
        pay::verify(&stmt, &self.proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{AddressParameters, SpendKey};
    use rand::rngs::OsRng;

    fn test_params() -> PayoutParameters {
        PayoutParameters {
            f: Point::hash_to_point(b"payout F", &[]),
            g: Point::hash_to_point(b"payout G", &[]),
            h: Point::hash_to_point(b"payout H", &[]),
            u: Point::hash_to_point(b"payout U", &[]),
            value_bytes: 4,
            memo_bytes: 32,
        }
    }

    #[test]
    fn round_trips_and_verifies() {
        let mut rng = OsRng;
        let address_params = AddressParameters::new(
            Point::hash_to_point(b"payout addr F", &[]),
            Point::hash_to_point(b"payout addr G", &[]),
            8,
        )
        .unwrap();
        let spend_key = SpendKey::random(address_params, &mut rng);
        let address = spend_key
            .to_full_view_key()
            .to_incoming_view_key()
            .derive_address(0)
            .unwrap();

        let params = test_params();
        let k = Scalar::hash_to_scalar(b"payout_k", &[]);
        let value = 12345u64;
        let tx = PayoutTransaction::construct(&params, &address, value, k, &mut rng).unwrap();
        tx.verify(&params).unwrap();

        tx.output.verify_payout(&tx_coin_params(&params), &address, k).unwrap();
        assert!(tx
            .output
            .verify_payout(&tx_coin_params(&params), &address, k + Scalar::one())
            .is_err());
    }

    fn tx_coin_params(params: &PayoutParameters) -> CoinParameters {
        params.coin_params()
    }

    #[test]
    fn rejects_tampered_proof() {
        let mut rng = OsRng;
        let address_params = AddressParameters::new(
            Point::hash_to_point(b"payout addr F2", &[]),
            Point::hash_to_point(b"payout addr G2", &[]),
            8,
        )
        .unwrap();
        let spend_key = SpendKey::random(address_params, &mut rng);
        let address = spend_key
            .to_full_view_key()
            .to_incoming_view_key()
            .derive_address(1)
            .unwrap();

        let params = test_params();
        let k = Scalar::hash_to_scalar(b"payout_k2", &[]);
        let mut tx = PayoutTransaction::construct(&params, &address, 1, k, &mut rng).unwrap();
        tx.proof.t += Scalar::one();
        assert!(tx.verify(&params).is_err());
    }
}
