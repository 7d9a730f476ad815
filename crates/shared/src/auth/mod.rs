// Authentication primitives
//
// Layered bottom-up: big-number arithmetic, the SHA-256 digest helpers, the
// password hashing pipeline, and the SRP proof engine on top.

pub mod big_number;
pub mod crypto_hash;
pub mod password_hash;
pub mod srp;

pub use big_number::{ArithmeticError, BigNumber};
pub use crypto_hash::{sha256, xor_digests, Sha256Hash};
pub use password_hash::{
    nested_password_hash, salted_hash, stretched_password_hash, KdfError, STRETCH_ITERATIONS,
};
pub use srp::{
    compute_proof, compute_proof_with_secret, ClientProof, PasswordAlgo, ServerChallenge,
    SrpError, MODULUS_BYTES,
};
