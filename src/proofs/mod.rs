//! Sigma-protocol proof systems (`spec.md` §4.1-4.5, §4.11).

pub mod asset_chaum;
pub mod chaum;
pub mod janus;
pub mod pay;
pub mod schnorr;
pub mod tag;
