// CryptoHash - SHA-256 digest wrapper
//
// Every digest in the password-proof pipeline is SHA-256; the stretched
// password hash additionally drives PBKDF2 (see password_hash.rs).

use digest::Digest;

/// SHA-256 hash wrapper with an explicit update/finalize lifecycle
#[derive(Clone)]
pub struct Sha256Hash {
    hasher: sha2::Sha256,
    digest: [u8; 32],
}

impl Default for Sha256Hash {
    fn default() -> Self {
        Self::new()
    }
}

impl Sha256Hash {
    pub const DIGEST_LENGTH: usize = 32;

    pub fn new() -> Self {
        Sha256Hash {
            hasher: sha2::Sha256::new(),
            digest: [0u8; 32],
        }
    }

    /// Re-initialize the hasher
    pub fn initialize(&mut self) {
        self.hasher = sha2::Sha256::new();
    }

    /// Update with raw bytes
    pub fn update_data_bytes(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Update with a string
    pub fn update_data(&mut self, data: &str) {
        self.hasher.update(data.as_bytes());
    }

    /// Finalize the hash computation
    pub fn finalize(&mut self) {
        let result = self.hasher.clone().finalize();
        self.digest.copy_from_slice(&result);
    }

    /// Get the computed digest
    pub fn get_digest(&self) -> &[u8; 32] {
        &self.digest
    }

    pub const fn get_length() -> usize {
        Self::DIGEST_LENGTH
    }
}

/// One-shot SHA-256 over the concatenation of `parts`
pub fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut sha = Sha256Hash::new();
    for part in parts {
        sha.update_data_bytes(part);
    }
    sha.finalize();
    *sha.get_digest()
}

/// Byte-wise XOR of two digests
pub fn xor_digests(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = a[i] ^ b[i];
    }
    out
}
