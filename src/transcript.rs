//! Domain-separated Fiat–Shamir transcripts.
//!
//! An extension trait over `merlin::Transcript`, the same shape the teacher
//! uses in `utils/fiat_shamir.rs` and `pvss/scrape/fiat_shamir.rs` — free
//! functions there, a trait here so call sites read as `t.append_point(...)`
//! chains instead of threading the transcript through free functions.

use curve25519_dalek::scalar::Scalar as DalekScalar;
use merlin::Transcript;

use crate::algebra::{Point, Scalar};

pub trait SparkTranscript {
    fn spark_new(label: &'static [u8]) -> Self;
    fn append_point(&mut self, label: &'static [u8], point: &Point);
    fn append_points(&mut self, label: &'static [u8], points: &[Point]);
    fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar);
    fn append_u64(&mut self, label: &'static [u8], value: u64);
    fn append_bytes(&mut self, label: &'static [u8], bytes: &[u8]);

    /// Draws a uniformly distributed, guaranteed-nonzero challenge scalar.
    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar;
}

impl SparkTranscript for Transcript {
    fn spark_new(label: &'static [u8]) -> Self {
        Transcript::new(label)
    }

    fn append_point(&mut self, label: &'static [u8], point: &Point) {
        self.append_message(label, &point.to_bytes());
    }

    fn append_points(&mut self, label: &'static [u8], points: &[Point]) {
        self.append_u64(label, points.len() as u64);
        for p in points {
            self.append_message(b"point", &p.to_bytes());
        }
    }

    fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar) {
        self.append_message(label, &scalar.to_bytes());
    }

    fn append_u64(&mut self, label: &'static [u8], value: u64) {
        Transcript::append_message(self, label, &value.to_le_bytes());
    }

    fn append_bytes(&mut self, label: &'static [u8], bytes: &[u8]) {
        self.append_u64(label, bytes.len() as u64);
        self.append_message(b"bytes", bytes);
    }

    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar {
        let mut counter: u32 = 0;
        loop {
            let mut buf = [0u8; 64];
            let mut fork = self.clone();
            if counter > 0 {
                fork.append_u64(b"challenge retry", counter as u64);
            }
            fork.challenge_bytes(label, &mut buf);
            let candidate = Scalar::from(DalekScalar::from_bytes_mod_order_wide(&buf));
            if !candidate.is_zero() {
                return candidate;
            }
            counter += 1;
        }
    }
}
