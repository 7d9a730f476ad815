// BigNumber - Large integer arithmetic wrapper
//
// The SRP exchange works on 2048-bit group elements, so every value here is
// an arbitrary-precision unsigned integer. The account service serializes
// group elements big-endian; import/export helpers pad to a minimum width so
// wire values keep their fixed size.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

/// Errors from modular arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("modulus must be positive")]
    NonPositiveModulus,
}

/// BigNumber wraps num-bigint's BigUint for the SRP group arithmetic.
#[derive(Debug, Clone)]
pub struct BigNumber {
    bn: BigUint,
}

impl Default for BigNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl BigNumber {
    /// Create a new BigNumber initialized to zero
    pub fn new() -> Self {
        BigNumber { bn: BigUint::zero() }
    }

    /// Create from a u32 value
    pub fn from_u32(val: u32) -> Self {
        BigNumber { bn: BigUint::from(val) }
    }

    /// Create from big-endian binary data
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        BigNumber {
            bn: BigUint::from_bytes_be(bytes),
        }
    }

    /// Parse from a hex string (big-endian)
    pub fn from_hex_str(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        if hex.is_empty() {
            return None;
        }
        BigUint::parse_bytes(hex.as_bytes(), 16).map(|bn| BigNumber { bn })
    }

    /// Check if the number is zero
    pub fn is_zero(&self) -> bool {
        self.bn.is_zero()
    }

    /// Modular exponentiation: self^exponent mod modulus.
    ///
    /// Right-to-left binary ladder: the base is reduced modulo `modulus`
    /// up front, then for each exponent bit (least significant first) the
    /// accumulator multiplies in the running base when the bit is set, the
    /// base is squared, and the exponent shifts right one bit.
    ///
    /// Returns zero when `modulus == 1`. A zero modulus is an error; the
    /// unsigned representation rules out negative moduli.
    pub fn mod_exp(
        &self,
        exponent: &BigNumber,
        modulus: &BigNumber,
    ) -> Result<BigNumber, ArithmeticError> {
        if modulus.bn.is_zero() {
            return Err(ArithmeticError::NonPositiveModulus);
        }
        if modulus.bn.is_one() {
            return Ok(BigNumber::new());
        }

        let m = &modulus.bn;
        let mut result = BigUint::one();
        let mut base = &self.bn % m;
        let mut exp = exponent.bn.clone();

        while !exp.is_zero() {
            if exp.bit(0) {
                result = &result * &base % m;
            }
            base = &base * &base % m;
            exp >>= 1u32;
        }

        Ok(BigNumber { bn: result })
    }

    /// Get the number of bytes needed to represent this number
    pub fn num_bytes(&self) -> usize {
        let bits = self.bn.bits() as usize;
        bits.div_ceil(8)
    }

    /// Get as a u32 value
    pub fn as_u32(&self) -> u32 {
        use num_traits::ToPrimitive;
        self.bn.to_u32().unwrap_or(0)
    }

    /// Convert to a big-endian byte array, left-zero-padded to min_size
    pub fn to_bytes_be(&self, min_size: usize) -> Vec<u8> {
        let be_bytes = self.bn.to_bytes_be();
        let length = if min_size > be_bytes.len() {
            min_size
        } else {
            be_bytes.len()
        };

        let mut result = vec![0u8; length];
        let padding_offset = length - be_bytes.len();
        result[padding_offset..].copy_from_slice(&be_bytes);
        result
    }

    /// Convert to hex string (uppercase)
    pub fn as_hex_str(&self) -> String {
        if self.bn.is_zero() {
            return "0".to_string();
        }
        format!("{:X}", self.bn)
    }

    /// Get a reference to the inner BigUint
    pub fn inner(&self) -> &BigUint {
        &self.bn
    }
}

// Arithmetic operator implementations

impl std::ops::Add for &BigNumber {
    type Output = BigNumber;
    fn add(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: &self.bn + &rhs.bn,
        }
    }
}

impl std::ops::Sub for &BigNumber {
    type Output = BigNumber;
    fn sub(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: if self.bn >= rhs.bn {
                &self.bn - &rhs.bn
            } else {
                BigUint::zero()
            },
        }
    }
}

impl std::ops::Mul for &BigNumber {
    type Output = BigNumber;
    fn mul(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: &self.bn * &rhs.bn,
        }
    }
}

impl std::ops::Rem for &BigNumber {
    type Output = BigNumber;
    fn rem(self, rhs: &BigNumber) -> BigNumber {
        BigNumber {
            bn: &self.bn % &rhs.bn,
        }
    }
}

impl PartialEq for BigNumber {
    fn eq(&self, other: &Self) -> bool {
        self.bn == other.bn
    }
}

impl Eq for BigNumber {}
