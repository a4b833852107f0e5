//! Spark: a privacy-preserving transaction protocol built on Ristretto
//! (`spec.md` §1). This crate implements the cryptographic core — address
//! derivation, coin construction/identification/recovery/delegation, the
//! sigma-protocol proof systems, threshold signing, and the payout/stake
//! transaction types that compose them — without any network, wallet-storage,
//! or consensus layer around it.

pub mod address;
pub mod aead;
pub mod algebra;
pub mod backends;
pub mod coin;
pub mod constants;
pub mod error;
pub mod generators;
pub mod multisig;
pub mod proofs;
pub mod transactions;
pub mod transcript;

pub use error::{Result, SparkError};
