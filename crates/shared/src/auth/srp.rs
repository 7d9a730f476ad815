// SRP - Secure Remote Password client proof
//
// Implements the account service's SRP variant for two-factor password
// verification. The server supplies fresh algorithm parameters and an
// ephemeral public value per attempt; the client answers with its own
// ephemeral public value and a proof digest, never the password.

use data_encoding::HEXLOWER;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::big_number::{ArithmeticError, BigNumber};
use super::crypto_hash::{sha256, xor_digests, Sha256Hash};
use super::password_hash::{stretched_password_hash, KdfError};

/// Width of a serialized group element: 2048 bits
pub const MODULUS_BYTES: usize = 256;

/// Password algorithm parameters supplied by the server per attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordAlgo {
    /// Group generator (small; serialized as a single byte on the wire)
    pub g: u32,
    /// Group modulus, big-endian, exactly 256 bytes
    pub p: Vec<u8>,
    pub salt1: Vec<u8>,
    pub salt2: Vec<u8>,
}

/// A password challenge fetched from the server.
///
/// Valid for a single verification attempt: the `srp_id`/`srp_b` pair is
/// never reused, so callers must fetch a fresh challenge before any retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerChallenge {
    pub srp_id: i64,
    /// Server ephemeral public value, big-endian
    pub srp_b: Vec<u8>,
    pub current_algo: Option<PasswordAlgo>,
}

/// The client's answer to a password challenge. Produced once, submitted
/// exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProof {
    /// Client ephemeral public value, fixed-width hex of the padded value
    #[serde(rename = "A")]
    pub a: String,
    /// Proof digest, hex
    #[serde(rename = "M1")]
    pub m1: String,
    /// Challenge identifier, echoed back
    pub srp_id: i64,
}

/// Errors from proof computation
#[derive(Debug, Error)]
pub enum SrpError {
    #[error("password challenge carries no algorithm parameters")]
    MissingParameters,
    #[error("malformed challenge parameter: {0}")]
    MalformedParameters(&'static str),
    #[error(transparent)]
    KeyDerivation(#[from] KdfError),
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

/// Compute the client proof for `challenge`, drawing the 256-byte private
/// exponent from the thread-local CSPRNG.
pub fn compute_proof(password: &str, challenge: &ServerChallenge) -> Result<ClientProof, SrpError> {
    let mut secret = [0u8; MODULUS_BYTES];
    rand::thread_rng().fill_bytes(&mut secret);
    compute_proof_with_secret(password, challenge, &secret)
}

/// Compute the client proof with an explicit private exponent.
///
/// The private exponent must be fresh randomness for every real attempt;
/// this entry point exists so a fixed exponent can be injected when the
/// output has to be reproducible.
pub fn compute_proof_with_secret(
    password: &str,
    challenge: &ServerChallenge,
    secret: &[u8; MODULUS_BYTES],
) -> Result<ClientProof, SrpError> {
    let algo = challenge
        .current_algo
        .as_ref()
        .ok_or(SrpError::MissingParameters)?;

    if algo.p.len() != MODULUS_BYTES || algo.p[0] == 0 {
        return Err(SrpError::MalformedParameters("p"));
    }
    let g_byte = u8::try_from(algo.g)
        .ok()
        .filter(|g| *g >= 2)
        .ok_or(SrpError::MalformedParameters("g"))?;

    let p = BigNumber::from_bytes_be(&algo.p);
    if challenge.srp_b.is_empty() || challenge.srp_b.len() > MODULUS_BYTES {
        return Err(SrpError::MalformedParameters("srp_b"));
    }
    let b_pub = BigNumber::from_bytes_be(&challenge.srp_b);
    if b_pub.is_zero() || b_pub.inner() >= p.inner() {
        return Err(SrpError::MalformedParameters("srp_b"));
    }

    let g = BigNumber::from_u32(algo.g);

    // x = int(PH2(password, salt1, salt2))
    let x = BigNumber::from_bytes_be(&stretched_password_hash(
        password,
        &algo.salt1,
        &algo.salt2,
    )?);

    // A = g^a mod p
    let a = BigNumber::from_bytes_be(secret);
    let a_pub = g.mod_exp(&a, &p)?;
    let a_padded = pad_2048(&a_pub)?;

    // k = H(p || g), with g as a single byte
    let k = BigNumber::from_bytes_be(&sha256(&[algo.p.as_slice(), &[g_byte]]));

    // u = H(pad2048(A) || B), B hashed exactly as the server sent it
    let u = BigNumber::from_bytes_be(&sha256(&[
        a_padded.as_slice(),
        challenge.srp_b.as_slice(),
    ]));

    // v = g^x mod p
    let v = g.mod_exp(&x, &p)?;

    // S = (B - k*v mod p + p)^((a + u*x) mod (p-1)) mod p
    // Adding p before the subtraction keeps the intermediate non-negative.
    let kv = &(&k * &v) % &p;
    let base = &(&(&b_pub + &p) - &kv) % &p;
    let p_minus_one = &p - &BigNumber::from_u32(1);
    let exponent = &(&a + &(&u * &x)) % &p_minus_one;
    let s = base.mod_exp(&exponent, &p)?;
    let s_padded = pad_2048(&s)?;

    // M1 = H((H(p) xor H(g)) || H(salt1) || H(salt2) || pad2048(A) || B || H(pad2048(S)))
    let h_p = sha256(&[algo.p.as_slice()]);
    let h_g = sha256(&[&[g_byte][..]]);
    let mut sha = Sha256Hash::new();
    sha.update_data_bytes(&xor_digests(&h_p, &h_g));
    sha.update_data_bytes(&sha256(&[algo.salt1.as_slice()]));
    sha.update_data_bytes(&sha256(&[algo.salt2.as_slice()]));
    sha.update_data_bytes(&a_padded);
    sha.update_data_bytes(&challenge.srp_b);
    sha.update_data_bytes(&sha256(&[s_padded.as_slice()]));
    sha.finalize();

    Ok(ClientProof {
        a: HEXLOWER.encode(&a_padded),
        m1: HEXLOWER.encode(sha.get_digest()),
        srp_id: challenge.srp_id,
    })
}

/// Left-zero-pad a group element to exactly 256 bytes
fn pad_2048(value: &BigNumber) -> Result<Vec<u8>, SrpError> {
    if value.num_bytes() > MODULUS_BYTES {
        return Err(SrpError::MalformedParameters("group element overflow"));
    }
    Ok(value.to_bytes_be(MODULUS_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 3526 group 14 modulus, a 2048-bit safe prime.
    const GROUP_2048_HEX: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1\
        29024E088A67CC74020BBEA63B139B22514A08798E3404DD\
        EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245\
        E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
        EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D\
        C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F\
        83655D23DCA3AD961C62F356208552BB9ED529077096966D\
        670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
        E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9\
        DE2BCBF6955817183995497CEA956AE515D2261898FA0510\
        15728E5A8AACAA68FFFFFFFFFFFFFFFF";

    // Server ephemeral for the fixture below, computed as k*v + g^b mod p
    // from a fixed server secret.
    const FIXTURE_B_HEX: &str = "a136513452ae9ba70b0f58baa8ddcd49ad3987b7b7be6c11\
        3bc6adbe878529b0474b1e0e8d03facfa8b7cc981fed5d2c\
        cab32de70c803679c04e07d5a71f72840a3bf90d0915bc0c\
        ad8da5841b98d6ade9c51063beb2aea6538744ee901b6815\
        aec3a6f4cd90d6387253c80541a93d9ac6de832b675eb9bc\
        1f071f14bb8045bcae3f2715471f8fd598a980996444af5f\
        8a11d3f1e27ccec4bfab188059ecc9cb65047133df454cbd\
        21f6c544fa30cfd6f525008600a77001f98ace0bcebc0466\
        b1cae0ca6569f0880372ddc4e3de28624ea0a4e11345d5c4\
        286f404ce4a09bd7449e03490fc9733a3e5fda28e3b83c8b\
        da3289c9685b4c4fcdd0c54f9d6fb953";

    const FIXTURE_A_HEX: &str = "dd78f191b1cb9f201ddd417cae70a01625aa73f1627bd879\
        bd164b95bd3002dce4a4d7f34c06f00d5a10e0b698985fe8\
        88fdfe47d6e8c5d47e7f61a3af69a1e46c6e714ffaff41db\
        1e9e48a9be2e9409580411bef65d54970c9559a6986780db\
        8bd7c0fc15d1e640d91761e76c1e5a339ffc63f5505928b9\
        38a22e448999007e1e4586d3d7ca702c97a0636161534150\
        3da86c8db189f342f458422649f88f5dd000ddb0a8f00883\
        76eda32789c6a2bf9dd9f9df055d90893d322b5f57598e9a\
        958d90af5e1a830dbe10d353c0eb6e14c08ed23204cb9315\
        d3a939d4baca9fb95a35eae32b838891655d714d2e2ac656\
        ac3e4a49fcc37b0440db474acec8a79d";

    const FIXTURE_M1_HEX: &str =
        "ff3f13614083eb6ec71ff5c28d801b032c305e9927d70bc57b4eede7fd36927f";

    const FIXTURE_PASSWORD: &str = "correct horse battery staple";
    const FIXTURE_SRP_ID: i64 = 0x1122334455667788;

    fn fixture_secret() -> [u8; MODULUS_BYTES] {
        let mut secret = [0u8; MODULUS_BYTES];
        for (i, byte) in secret.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(7).wrapping_add(3);
        }
        secret
    }

    fn fixture_algo() -> PasswordAlgo {
        PasswordAlgo {
            g: 3,
            p: BigNumber::from_hex_str(GROUP_2048_HEX)
                .unwrap()
                .to_bytes_be(MODULUS_BYTES),
            salt1: (1u8..=16).collect(),
            salt2: (101u8..=116).collect(),
        }
    }

    fn fixture_challenge() -> ServerChallenge {
        ServerChallenge {
            srp_id: FIXTURE_SRP_ID,
            srp_b: HEXLOWER.decode(FIXTURE_B_HEX.as_bytes()).unwrap(),
            current_algo: Some(fixture_algo()),
        }
    }

    #[test]
    fn test_proof_matches_reference_vector() {
        let challenge = fixture_challenge();
        let proof =
            compute_proof_with_secret(FIXTURE_PASSWORD, &challenge, &fixture_secret()).unwrap();

        assert_eq!(proof.a, FIXTURE_A_HEX);
        assert_eq!(proof.m1, FIXTURE_M1_HEX);
        assert_eq!(proof.srp_id, FIXTURE_SRP_ID);
    }

    #[test]
    fn test_proof_reproducible_with_same_secret() {
        let challenge = fixture_challenge();
        let first =
            compute_proof_with_secret(FIXTURE_PASSWORD, &challenge, &fixture_secret()).unwrap();
        let second =
            compute_proof_with_secret(FIXTURE_PASSWORD, &challenge, &fixture_secret()).unwrap();
        assert_eq!(first.a, second.a);
        assert_eq!(first.m1, second.m1);
    }

    #[test]
    fn test_proof_has_fixed_width() {
        let challenge = fixture_challenge();
        let proof = compute_proof(FIXTURE_PASSWORD, &challenge).unwrap();
        assert_eq!(proof.a.len(), MODULUS_BYTES * 2);
        assert_eq!(proof.m1.len(), 64);
    }

    #[test]
    fn test_missing_algo_rejected() {
        let mut challenge = fixture_challenge();
        challenge.current_algo = None;
        let result = compute_proof_with_secret(FIXTURE_PASSWORD, &challenge, &fixture_secret());
        assert!(matches!(result, Err(SrpError::MissingParameters)));
    }

    #[test]
    fn test_short_modulus_rejected() {
        let mut challenge = fixture_challenge();
        challenge.current_algo.as_mut().unwrap().p.truncate(255);
        let result = compute_proof_with_secret(FIXTURE_PASSWORD, &challenge, &fixture_secret());
        assert!(matches!(result, Err(SrpError::MalformedParameters("p"))));
    }

    #[test]
    fn test_wide_generator_rejected() {
        let mut challenge = fixture_challenge();
        challenge.current_algo.as_mut().unwrap().g = 300;
        let result = compute_proof_with_secret(FIXTURE_PASSWORD, &challenge, &fixture_secret());
        assert!(matches!(result, Err(SrpError::MalformedParameters("g"))));
    }

    #[test]
    fn test_peer_value_out_of_range_rejected() {
        let mut challenge = fixture_challenge();
        challenge.srp_b = vec![0u8; 16];
        let result = compute_proof_with_secret(FIXTURE_PASSWORD, &challenge, &fixture_secret());
        assert!(matches!(result, Err(SrpError::MalformedParameters("srp_b"))));

        // B == p is not below the modulus either.
        let mut challenge = fixture_challenge();
        challenge.srp_b = challenge.current_algo.as_ref().unwrap().p.clone();
        let result = compute_proof_with_secret(FIXTURE_PASSWORD, &challenge, &fixture_secret());
        assert!(matches!(result, Err(SrpError::MalformedParameters("srp_b"))));
    }

    #[test]
    fn test_proof_wire_field_names() {
        let challenge = fixture_challenge();
        let proof =
            compute_proof_with_secret(FIXTURE_PASSWORD, &challenge, &fixture_secret()).unwrap();
        let value = serde_json::to_value(&proof).unwrap();
        assert!(value.get("A").is_some());
        assert!(value.get("M1").is_some());
        assert_eq!(value.get("srp_id").unwrap().as_i64(), Some(FIXTURE_SRP_ID));
    }
}
