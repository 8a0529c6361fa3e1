//! Fixed-size digest value shared by SHA-256 and HMAC-SHA-256.

use crate::CryptoError;

/// Digest size in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Compression block size in bytes.
pub const BLOCK_SIZE: usize = 64;

const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// A 32-byte SHA-256 digest or HMAC-SHA-256 tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Digest(pub [u8; DIGEST_SIZE]);

impl Digest {
    /// Creates from raw bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Converts to lower-case hex.
    pub fn to_hex(&self) -> [u8; DIGEST_SIZE * 2] {
        let mut hex = [0u8; DIGEST_SIZE * 2];
        for (i, &byte) in self.0.iter().enumerate() {
            hex[i * 2] = HEX_CHARS[(byte >> 4) as usize];
            hex[i * 2 + 1] = HEX_CHARS[(byte & 0x0f) as usize];
        }
        hex
    }

    /// Parses 64 hex digits (either case).
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let hex = hex.as_bytes();
        if hex.len() != DIGEST_SIZE * 2 {
            return Err(CryptoError::InvalidHex);
        }

        let mut bytes = [0u8; DIGEST_SIZE];
        for (i, pair) in hex.chunks_exact(2).enumerate() {
            bytes[i] = (nibble(pair[0])? << 4) | nibble(pair[1])?;
        }
        Ok(Self(bytes))
    }

    /// Compares every byte, with no early exit on the first mismatch.
    pub fn ct_eq(&self, other: &Digest) -> bool {
        let mut diff = 0u8;
        for (x, y) in self.0.iter().zip(other.0.iter()) {
            diff |= x ^ y;
        }
        diff == 0
    }
}

fn nibble(c: u8) -> Result<u8, CryptoError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(CryptoError::InvalidHex),
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_SIZE] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Display for Digest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
