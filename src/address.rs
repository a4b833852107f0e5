//! Hierarchical address derivation (`spec.md` §3, §4.6):
//! `SpendKey -> FullViewKey -> IncomingViewKey -> PublicAddress`.

use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::aead::stream_cipher_apply;
use crate::algebra::{hash_to_bytes32, Point, Scalar};
use crate::constants::{DST_Q2, DST_SPARK_D, DST_SPARK_DIV};
use crate::error::{Result, SparkError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParameters {
    pub f: Point,
    pub g: Point,
    pub index_bytes: u8,
}

impl AddressParameters {
    pub fn new(f: Point, g: Point, index_bytes: u8) -> Result<Self> {
        if index_bytes == 0 || index_bytes > 8 {
            return Err(SparkError::OutOfRange(
                "address parameters: index_bytes must be in 1..=8".into(),
            ));
        }
        Ok(AddressParameters { f, g, index_bytes })
    }

    fn max_index_exclusive(&self) -> u64 {
        if self.index_bytes == 8 {
            u64::MAX
        } else {
            1u64 << (8 * self.index_bytes as u32)
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Zeroize)]
pub struct SpendKey {
    #[zeroize(skip)]
    pub params: AddressParameters,
    pub s1: Scalar,
    pub s2: Scalar,
    pub r: Scalar,
}

impl SpendKey {
    pub fn random<R: RngCore + CryptoRng>(params: AddressParameters, rng: &mut R) -> Self {
        SpendKey {
            params,
            s1: Scalar::random(rng),
            s2: Scalar::random(rng),
            r: Scalar::random(rng),
        }
    }

    pub fn to_full_view_key(&self) -> FullViewKey {
        let d = self.params.g * self.r;
        let p2 = self.params.f * self.s2 + d;
        FullViewKey {
            params: self.params.clone(),
            s1: self.s1,
            s2: self.s2,
            d,
            p2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullViewKey {
    pub params: AddressParameters,
    pub s1: Scalar,
    pub s2: Scalar,
    pub d: Point,
    pub p2: Point,
}

impl FullViewKey {
    pub fn to_incoming_view_key(&self) -> IncomingViewKey {
        IncomingViewKey {
            params: self.params.clone(),
            s1: self.s1,
            p2: self.p2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingViewKey {
    pub params: AddressParameters,
    pub s1: Scalar,
    pub p2: Point,
}

fn diversifier_key(s1: Scalar) -> [u8; 32] {
    hash_to_bytes32(DST_SPARK_D, &[&s1.to_bytes()])
}

impl IncomingViewKey {
    /// Derives `PublicAddress(i)`, per `spec.md` §4.6.
    pub fn derive_address(&self, i: u64) -> Result<PublicAddress> {
        if i >= self.params.max_index_exclusive() {
            return Err(SparkError::OutOfRange(format!(
                "address index {i} does not fit in {} bytes",
                self.params.index_bytes
            )));
        }
        let index_bytes = &i.to_le_bytes()[..self.params.index_bytes as usize];
        let key = diversifier_key(self.s1);
        let d = stream_cipher_apply(&key, index_bytes);

        let q0 = Point::hash_to_point(DST_SPARK_DIV, &[&d]);
        let q1 = self.s1 * q0;
        let q2 = Scalar::hash_to_scalar(DST_Q2, &[&self.s1.to_bytes(), &i.to_le_bytes()])
            * self.params.f
            + self.p2;

        Ok(PublicAddress {
            params: self.params.clone(),
            index: i,
            diversifier: d,
            q0,
            q1,
            q2,
        })
    }

    /// Inverts the diversifier stream cipher to recover the index `i`
    /// encrypted in `d`. The cipher is self-inverse so this call is
    /// identical in shape to the forward derivation above.
    pub fn get_index(&self, d: &[u8]) -> Result<u64> {
        if d.len() != self.params.index_bytes as usize {
            return Err(SparkError::ShapeMismatch(format!(
                "diversifier is {} bytes, expected {}",
                d.len(),
                self.params.index_bytes
            )));
        }
        let key = diversifier_key(self.s1);
        let recovered = stream_cipher_apply(&key, d);
        let mut buf = [0u8; 8];
        buf[..recovered.len()].copy_from_slice(&recovered);
        Ok(u64::from_le_bytes(buf))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAddress {
    pub params: AddressParameters,
    pub index: u64,
    pub diversifier: Vec<u8>,
    pub q0: Point,
    pub q1: Point,
    pub q2: Point,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn test_params() -> AddressParameters {
        AddressParameters::new(
            Point::hash_to_point(b"F_test", &[]),
            Point::hash_to_point(b"G_test", &[]),
            8,
        )
        .unwrap()
    }

    #[test]
    fn get_index_inverts_derive_address() {
        let params = test_params();
        let s1 = Scalar::hash_to_scalar(b"s1_test", &[]);
        let ivk = IncomingViewKey {
            params,
            s1,
            p2: Point::identity(),
        };
        let i = 0x0123_4567_89AB_CDEFu64;
        let addr = ivk.derive_address(i).unwrap();
        assert_eq!(ivk.get_index(&addr.diversifier).unwrap(), i);
    }

    #[test]
    fn full_round_trip_from_spend_key() {
        let mut rng = OsRng;
        let params = test_params();
        let spend_key = SpendKey::random(params, &mut rng);
        let fvk = spend_key.to_full_view_key();
        let ivk = fvk.to_incoming_view_key();
        let addr = ivk.derive_address(42).unwrap();
        assert_eq!(ivk.get_index(&addr.diversifier).unwrap(), 42);
        assert_eq!(addr.q1, ivk.s1 * Point::hash_to_point(DST_SPARK_DIV, &[&addr.diversifier]));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let params = AddressParameters::new(
            Point::hash_to_point(b"F_small", &[]),
            Point::hash_to_point(b"G_small", &[]),
            1,
        )
        .unwrap();
        let ivk = IncomingViewKey {
            params,
            s1: Scalar::hash_to_scalar(b"s1_small", &[]),
            p2: Point::identity(),
        };
        assert!(ivk.derive_address(256).is_err());
        assert!(ivk.derive_address(255).is_ok());
    }
}
