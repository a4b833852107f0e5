//! FROST-style threshold signing over the modified Chaum proof (`spec.md`
//! §4.10).

pub mod keygen;
pub mod player;
pub mod precompute;
pub mod sign;
