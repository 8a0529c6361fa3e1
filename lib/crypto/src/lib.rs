//! # msgdigest
//!
//! Streaming SHA-256 and HMAC-SHA-256 that digest either flat byte slices
//! or byte ranges of a segmented buffer, without ever gathering the range
//! into one contiguous allocation.
//!
//! ## Algorithms
//!
//! - **SHA-256**: FIPS 180-4, 256-bit output
//! - **HMAC-SHA256**: RFC 2104 over SHA-256
//!
//! ## Design
//!
//! - Pure Rust, `no_std`
//! - Start / Update / Finish lifecycle on every engine
//! - Segmented sources are read through a narrow copy-range trait
//!   ([`SegmentedRead`]) in small stack-sized chunks
//! - No dynamic allocation in core operations
//!
//! ## Usage
//!
//! ```rust
//! use msgdigest::{HmacSha256, Sha256};
//!
//! let mut sha = Sha256::new();
//! sha.update(b"abc");
//! assert_eq!(
//!     sha.finish().to_string(),
//!     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
//! );
//!
//! let tag = HmacSha256::mac(b"Jefe", b"what do ya want for nothing?");
//! assert!(HmacSha256::verify(b"Jefe", b"what do ya want for nothing?", &tag));
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod digest;
pub mod hmac;
#[cfg(feature = "alloc")]
pub mod message;
pub mod segment;
pub mod sha256;

pub use digest::{Digest, BLOCK_SIZE, DIGEST_SIZE};
pub use hmac::HmacSha256;
#[cfg(feature = "alloc")]
pub use message::{MessageBuffer, MessageConfig};
pub use segment::{Digester, SegmentReader, SegmentedRead, DEFAULT_CHUNK_SIZE};
pub use sha256::Sha256;

/// Hash trait for consistent interface.
pub trait Hash {
    /// Output size in bytes.
    const OUTPUT_SIZE: usize;

    /// Create a started hasher.
    fn new() -> Self;

    /// Update the hasher with data.
    fn update(&mut self, data: &[u8]);

    /// Finalize and return the digest.
    fn finalize(self) -> Digest;

    /// One-shot hash.
    fn hash(data: &[u8]) -> Digest
    where
        Self: Sized,
    {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}

/// MAC trait
pub trait Mac {
    /// Output size in bytes
    const OUTPUT_SIZE: usize;

    /// Creates a started MAC keyed with `key`
    fn new(key: &[u8]) -> Self;

    /// Updates the MAC with data
    fn update(&mut self, data: &[u8]);

    /// Finalizes and returns the MAC tag
    fn finalize(self) -> Digest;

    /// One-shot MAC function
    fn mac(key: &[u8], data: &[u8]) -> Digest
    where
        Self: Sized,
    {
        let mut mac = Self::new(key);
        mac.update(data);
        mac.finalize()
    }

    /// Verifies a MAC tag without early exit on the first differing byte
    fn verify(key: &[u8], data: &[u8], tag: &Digest) -> bool
    where
        Self: Sized,
    {
        Self::mac(key, data).ct_eq(tag)
    }
}

/// Crypto errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// Requested range runs past the end of the segmented source
    RangeOutOfBounds {
        /// Starting offset of the request
        offset: usize,
        /// Requested length
        len: usize,
        /// Bytes actually held by the source
        available: usize,
    },
    /// Source copied fewer bytes than its reported length promised
    ShortRead {
        /// Offset of the failed read
        offset: usize,
    },
    /// Hex string is not exactly 64 hex digits
    InvalidHex,
    /// Message buffer configuration rejected
    InvalidConfig,
}

impl core::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CryptoError::RangeOutOfBounds { offset, len, available } => write!(
                f,
                "Range {}..{} out of bounds for source of {} bytes",
                offset,
                offset.saturating_add(*len),
                available
            ),
            CryptoError::ShortRead { offset } => write!(f, "Short read at offset {}", offset),
            CryptoError::InvalidHex => write!(f, "Invalid hex digest"),
            CryptoError::InvalidConfig => write!(f, "Invalid message buffer configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CryptoError {}

/// Securely zeroes memory
pub(crate) fn secure_zero(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        // SAFETY: `byte` is a valid, aligned, exclusive reference.
        unsafe {
            core::ptr::write_volatile(byte, 0);
        }
    }
    core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
}
