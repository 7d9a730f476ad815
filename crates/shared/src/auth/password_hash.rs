// Password hashing pipeline
//
// The account service never sees the password itself; the SRP secret is
// derived from a layered hash: a salted digest, a nested salted digest, and
// a deliberately slow PBKDF2 stretching pass keyed by the nested digest.

use hmac::Hmac;
use sha2::Sha512;
use thiserror::Error;

use super::crypto_hash::sha256;

/// PBKDF2 iteration count used by the stretched hash
pub const STRETCH_ITERATIONS: u32 = 100_000;

/// Length of the intermediate PBKDF2-derived key
const STRETCHED_KEY_LEN: usize = 64;

/// Errors from the key-stretching primitive. Not retryable: the inputs are
/// deterministic, so a failed derivation fails again.
#[derive(Debug, Error)]
pub enum KdfError {
    #[error("key stretching failed: {0}")]
    Stretch(String),
}

/// Salted digest: H(salt || data || salt)
pub fn salted_hash(data: &[u8], salt: &[u8]) -> [u8; 32] {
    sha256(&[salt, data, salt])
}

/// Nested salted digest of the password: SH(SH(password, salt1), salt2)
pub fn nested_password_hash(password: &str, salt1: &[u8], salt2: &[u8]) -> [u8; 32] {
    let inner = salted_hash(password.as_bytes(), salt1);
    salted_hash(&inner, salt2)
}

/// Stretched password hash: PBKDF2-HMAC-SHA512 over the nested digest with
/// `salt1`, then a final salted digest with `salt2`.
///
/// This is the one deliberately slow step in the pipeline; callers on a
/// latency-sensitive path should run it on a blocking worker.
pub fn stretched_password_hash(
    password: &str,
    salt1: &[u8],
    salt2: &[u8],
) -> Result<[u8; 32], KdfError> {
    let nested = nested_password_hash(password, salt1, salt2);
    let mut derived = [0u8; STRETCHED_KEY_LEN];
    pbkdf2::pbkdf2::<Hmac<Sha512>>(&nested, salt1, STRETCH_ITERATIONS, &mut derived)
        .map_err(|e| KdfError::Stretch(e.to_string()))?;
    Ok(salted_hash(&derived, salt2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_encoding::HEXLOWER;

    fn salt1() -> Vec<u8> {
        (1u8..=16).collect()
    }

    fn salt2() -> Vec<u8> {
        (101u8..=116).collect()
    }

    const PASSWORD: &str = "correct horse battery staple";

    #[test]
    fn test_salted_hash_known_vector() {
        let digest = salted_hash(b"data", b"salt");
        assert_eq!(
            HEXLOWER.encode(&digest),
            "7cc313eac54580dbb018d74335246e3ec832142fe35dc52f3627620c4438ebd6"
        );
    }

    #[test]
    fn test_salted_hash_salt_surrounds_data() {
        assert_eq!(salted_hash(b"data", b"salt"), sha256(&[b"salt", b"data", b"salt"]));
    }

    #[test]
    fn test_nested_hash_known_vector() {
        let digest = nested_password_hash(PASSWORD, &salt1(), &salt2());
        assert_eq!(
            HEXLOWER.encode(&digest),
            "8be479b83156420c414f8b8403eccb25dbdbe35071be5982ca4840d75bdb44d8"
        );
    }

    #[test]
    fn test_stretched_hash_known_vector() {
        let digest = stretched_password_hash(PASSWORD, &salt1(), &salt2()).unwrap();
        assert_eq!(
            HEXLOWER.encode(&digest),
            "221f60c61a072617ba93faaa7cb6175297db42bff861144d47a6ba93b057d485"
        );
    }

    #[test]
    fn test_stretched_hash_deterministic() {
        let a = stretched_password_hash(PASSWORD, &salt1(), &salt2()).unwrap();
        let b = stretched_password_hash(PASSWORD, &salt1(), &salt2()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stretched_hash_avalanche() {
        let reference = stretched_password_hash(PASSWORD, &salt1(), &salt2()).unwrap();

        let mut flipped_salt1 = salt1();
        flipped_salt1[0] ^= 0x01;
        assert_ne!(
            reference,
            stretched_password_hash(PASSWORD, &flipped_salt1, &salt2()).unwrap()
        );

        let mut flipped_salt2 = salt2();
        flipped_salt2[15] ^= 0x80;
        assert_ne!(
            reference,
            stretched_password_hash(PASSWORD, &salt1(), &flipped_salt2).unwrap()
        );

        assert_ne!(
            reference,
            stretched_password_hash("correct horse battery stapl3", &salt1(), &salt2()).unwrap()
        );
    }
}
