//! The error taxonomy from `spec.md` §7.
//!
//! All prover-side self-checks that fail return [`SparkError::InvalidWitness`]
//! immediately, before any randomness is sampled or any proof is produced.
//! Verifiers return [`SparkError::VerificationFailed`] only after every check
//! has run. `Coin::identify` failing is an expected, non-exceptional outcome
//! for a coin that isn't addressed to the caller — callers are expected to
//! treat [`SparkError::NotMine`] as a fast skip in a scanning loop, not as a
//! logged failure.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SparkError {
    /// The caller supplied an argument of the wrong algebraic kind (e.g. a
    /// scalar where a point was expected).
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The caller supplied vectors of mismatched length.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// An integer value overflowed its declared byte width, a memo exceeded
    /// its declared byte budget, or a diversifier index exceeded the allowed
    /// lookahead.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// A prover asserted a statement that its witness does not satisfy. The
    /// proof is never produced in this case.
    #[error("witness does not satisfy the statement: {0}")]
    InvalidWitness(String),

    /// A verification equation did not hold. Used uniformly across every
    /// proof system in this crate.
    #[error("verification failed: {0}")]
    VerificationFailed(String),

    /// Coin identification failed: AEAD tag mismatch, diversifier lookup
    /// miss, view-tag miss, or value-commitment mismatch. Not a fatal error —
    /// a fast, expected negative result when scanning coins you don't own.
    #[error("coin does not belong to this view key")]
    NotMine,

    /// A stake transaction's tag has been seen before.
    #[error("duplicate tag")]
    DuplicateTag,

    /// A multisig neighbor sent an out-of-round or malformed message.
    #[error("multisig protocol violation: {0}")]
    ProtocolViolation(String),
}

pub type Result<T> = std::result::Result<T, SparkError>;
