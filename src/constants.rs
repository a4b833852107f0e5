//! Domain-separation tags and fixed sizes used throughout the crate.
//!
//! Every label here is byte-for-byte as specified in `spec.md` §6. Keeping them
//! in one place makes it easy to audit that no two proof systems accidentally
//! share a domain separator.

/// Label for the generator `F`.
pub const DST_F: &[u8] = b"F";
/// Label for the generator `G`.
pub const DST_G: &[u8] = b"G";
/// Label for the generator `H`.
pub const DST_H: &[u8] = b"H";
/// Label for the generator `U`.
pub const DST_U: &[u8] = b"U";

/// Key-derivation label for the diversifier stream-cipher key.
pub const DST_SPARK_D: &[u8] = b"Spark d";
/// Hash-to-point label for the per-address divisor base shared by `Q0`
/// (`Q0 = hash_to_point(d)`) and its scalar multiple `Q1 = s1·Q0`.
pub const DST_SPARK_DIV: &[u8] = b"Spark div";
/// Hash-to-scalar label for the `Q2` address component, both at derivation
/// (`address::derive_address`) and at recovery (`coin::recover`). spec.md's
/// §6 tag inventory also lists "Spark Q2" alongside this one, but every
/// formula that actually computes `Q2` — both in the address data model and
/// in serial-number recovery — spells the literal tag "Q2"; see DESIGN.md.
pub const DST_Q2: &[u8] = b"Q2";
/// Transcript domain separator for the Janus proof (`proofs::janus`).
pub const DOM_SEP_JANUS: &[u8] = b"Q0";

/// Hash-to-scalar label for the serial number's `F`-coefficient, `H("ser", K_der)`.
pub const DST_SER: &[u8] = b"ser";
/// Hash-to-scalar label for the value commitment's `H`-coefficient, `H("val", K_der)`.
pub const DST_VAL: &[u8] = b"val";
/// Key-derivation label for the AEAD key, `H("aead", K_der)`.
pub const DST_AEAD: &[u8] = b"aead";
/// Key-derivation label for the fast-scan view tag byte.
pub const DST_VIEW_TAG: &[u8] = b"Spark view tag";
/// Label for a coin's Fiat-Shamir fingerprint (its `__repr__` identity).
pub const DST_COIN_FINGERPRINT: &[u8] = b"Spark coin";
/// Hash-to-scalar label for the delegation's `S`-side re-randomization scalar.
pub const DST_SER1: &[u8] = b"ser1";
/// Hash-to-scalar label for the delegation's `C`-side re-randomization scalar.
pub const DST_VAL1: &[u8] = b"val1";

/// AEAD associated data for MINT coins.
pub const AD_MINT_RECIPIENT_DATA: &[u8] = b"Mint recipient data";
/// AEAD associated data for STANDARD coins.
pub const AD_SPEND_RECIPIENT_DATA: &[u8] = b"Spend recipient data";

/// Transcript domain separator for the modified Chaum argument.
pub const DOM_SEP_MODIFIED_CHAUM: &[u8] = b"Modified Chaum";
/// Transcript domain separator for the asset-Chaum argument.
pub const DOM_SEP_ASSET_CHAUM: &[u8] = b"Asset Chaum";
/// Transcript domain separator for the tag-correspondence argument.
pub const DOM_SEP_TAG_CORRESPONDENCE: &[u8] = b"Tag correspondence";
/// Transcript domain separator for the Schnorr proof of knowledge.
pub const DOM_SEP_SCHNORR: &[u8] = b"Schnorr";
/// Transcript domain separator for the payout Pay proof.
pub const DOM_SEP_PAYOUT: &[u8] = b"Payout";

/// Hash-to-scalar label for multisig key-generation's proof of knowledge.
pub const DST_MULTISIG_KEYGEN: &[u8] = b"Spark multisig keygen";
/// Hash-to-scalar label for multisig nonce binder `rho_FT`.
pub const DST_MULTISIG_F_T: &[u8] = b"Spark multisig F/T";
/// Hash-to-scalar label for multisig nonce binder `rho_H`.
pub const DST_MULTISIG_H: &[u8] = b"Spark multisig H";
/// Hash-to-scalar label for the per-row multisig nonce hash.
pub const DST_MULTISIG_NONCE_HASH: &[u8] = b"Spark multisig nonce hash";
/// Hash-to-scalar label for aggregating incoming-view-key shares.
pub const DST_SPARK_S1: &[u8] = b"Spark s1";
/// Hash-to-scalar label for aggregating full-view-key shares.
pub const DST_SPARK_S2: &[u8] = b"Spark s2";
/// Transcript domain separator for the aggregated multisig signing challenge.
pub const DOM_SEP_SPARK_CHALLENGE: &[u8] = b"Spark challenge";
/// Hash-to-scalar label for the stake transaction's aggregate proof challenge `mu`,
/// binding the cover set, fee, S1/C1/T, and the parallel/balance proofs together
/// before the modified-Chaum tag proof is computed.
pub const DST_STAKE_PROOF: &[u8] = b"Spark stake proof";
/// Transcript domain separator for the random linear combination that lets a
/// stake transaction run a single parallel membership proof over the S- and
/// C-family cover vectors at once (`transactions::stake`).
pub const DOM_SEP_STAKE_COVER: &[u8] = b"Spark stake cover";

/// Number of bytes in a canonical compressed Ristretto point encoding.
pub const POINT_NUM_BYTES: usize = 32;
/// Number of bytes in a canonical scalar encoding.
pub const SCALAR_NUM_BYTES: usize = 32;
/// Number of bytes in the AEAD authentication tag (Poly1305).
pub const AEAD_TAG_NUM_BYTES: usize = 16;
/// Number of bytes in the AEAD / stream-cipher nonce.
pub const NONCE_NUM_BYTES: usize = 24;
/// Size in bytes of the fast-scan view tag.
pub const VIEW_TAG_NUM_BYTES: usize = 1;
