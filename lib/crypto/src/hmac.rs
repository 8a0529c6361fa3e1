//! HMAC Implementation
//!
//! HMAC-SHA256 (RFC 2104) built from two SHA-256 passes. The inner hash is
//! streamed through `update`; the outer pad is kept aside until `finish`.

use crate::digest::{Digest, BLOCK_SIZE, DIGEST_SIZE};
use crate::segment::{Digester, SegmentReader, SegmentedRead, DEFAULT_CHUNK_SIZE};
use crate::sha256::Sha256;
use crate::{secure_zero, CryptoError, Mac};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// HMAC-SHA256.
#[derive(Clone)]
pub struct HmacSha256 {
    inner: Sha256,
    outer_key_pad: [u8; BLOCK_SIZE],
}

impl HmacSha256 {
    /// Create a new HMAC-SHA256 keyed with `key`, ready for `update`.
    pub fn new(key: &[u8]) -> Self {
        let mut hmac = Self {
            inner: Sha256::new(),
            outer_key_pad: [0u8; BLOCK_SIZE],
        };
        hmac.start(key);
        hmac
    }

    /// Re-key and reset. Keys longer than one block are hashed first.
    pub fn start(&mut self, key: &[u8]) {
        let mut key_block = [0u8; BLOCK_SIZE];

        if key.len() > BLOCK_SIZE {
            let mut hasher = Sha256::new();
            hasher.update(key);
            key_block[..DIGEST_SIZE].copy_from_slice(hasher.finish().as_bytes());
        } else {
            key_block[..key.len()].copy_from_slice(key);
        }

        let mut inner_key_pad = [IPAD; BLOCK_SIZE];
        for (pad, byte) in inner_key_pad.iter_mut().zip(key_block.iter()) {
            *pad ^= byte;
        }

        self.outer_key_pad = [OPAD; BLOCK_SIZE];
        for (pad, byte) in self.outer_key_pad.iter_mut().zip(key_block.iter()) {
            *pad ^= byte;
        }

        self.inner.start();
        self.inner.update(&inner_key_pad);

        secure_zero(&mut key_block);
        secure_zero(&mut inner_key_pad);
    }

    /// Update with message data.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Update with `len` bytes of `source` starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range runs past the end of `source`; see
    /// [`Sha256::update_from`].
    pub fn update_from<S: SegmentedRead + ?Sized>(&mut self, source: &S, offset: usize, len: usize) {
        if let Err(err) = self.try_update_from(source, offset, len) {
            panic!("HmacSha256::update_from: {}", err);
        }
    }

    /// Fallible form of [`HmacSha256::update_from`].
    pub fn try_update_from<S: SegmentedRead + ?Sized>(
        &mut self,
        source: &S,
        offset: usize,
        len: usize,
    ) -> Result<(), CryptoError> {
        SegmentReader::<S, DEFAULT_CHUNK_SIZE>::new(source, offset, len)?.feed(&mut self.inner)
    }

    /// Finalize and return the 32-byte MAC.
    ///
    /// `start` must be called again before reuse.
    pub fn finish(&mut self) -> Digest {
        let inner_hash = self.inner.finish();

        let mut outer = Sha256::new();
        outer.update(&self.outer_key_pad);
        outer.update(inner_hash.as_bytes());
        outer.finish()
    }

    /// One-shot HMAC.
    pub fn mac(key: &[u8], data: &[u8]) -> Digest {
        let mut hmac = Self::new(key);
        hmac.update(data);
        hmac.finish()
    }

    /// Recompute the tag over `data` and compare it with `tag`.
    pub fn verify(key: &[u8], data: &[u8], tag: &Digest) -> bool {
        Self::mac(key, data).ct_eq(tag)
    }
}

impl Drop for HmacSha256 {
    fn drop(&mut self) {
        secure_zero(&mut self.outer_key_pad);
    }
}

impl Mac for HmacSha256 {
    const OUTPUT_SIZE: usize = DIGEST_SIZE;

    fn new(key: &[u8]) -> Self {
        HmacSha256::new(key)
    }

    fn update(&mut self, data: &[u8]) {
        HmacSha256::update(self, data)
    }

    fn finalize(mut self) -> Digest {
        self.finish()
    }
}

impl Digester for HmacSha256 {
    fn update(&mut self, data: &[u8]) {
        HmacSha256::update(self, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_jefe() {
        let mut hmac = HmacSha256::new(b"Jefe");
        hmac.update(b"what do ya want for nothing?");
        let expected = [
            0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e,
            0x6a, 0x04, 0x24, 0x26, 0x08, 0x95, 0x75, 0xc7,
            0x5a, 0x00, 0x3f, 0x08, 0x9d, 0x27, 0x39, 0x83,
            0x9d, 0xec, 0x58, 0xb9, 0x64, 0xec, 0x38, 0x43,
        ];
        assert_eq!(hmac.finish().0, expected);
    }

    #[test]
    fn test_hmac_empty_key_and_data() {
        // HMAC-SHA256("", "")
        let expected =
            Digest::from_hex("b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad")
                .unwrap();
        assert_eq!(HmacSha256::mac(b"", b""), expected);
    }

    #[test]
    fn test_block_sized_key_is_not_hashed() {
        // A 64-byte key is used as-is; hashing it first would give a
        // different tag.
        let key = [0x42u8; 64];
        let hashed_key = Sha256::digest(&key);
        assert_ne!(
            HmacSha256::mac(&key, b"data"),
            HmacSha256::mac(hashed_key.as_bytes(), b"data")
        );

        // A 65-byte key is replaced by its digest.
        let long_key = [0x42u8; 65];
        let long_hashed = Sha256::digest(&long_key);
        assert_eq!(
            HmacSha256::mac(&long_key, b"data"),
            HmacSha256::mac(long_hashed.as_bytes(), b"data")
        );
    }

    #[test]
    fn test_restart_with_new_key() {
        let mut hmac = HmacSha256::new(b"first key");
        hmac.update(b"ignored message");
        let _ = hmac.finish();

        hmac.start(b"Jefe");
        hmac.update(b"what do ya ");
        hmac.update(b"want for nothing?");
        assert_eq!(hmac.finish(), HmacSha256::mac(b"Jefe", b"what do ya want for nothing?"));
    }

    #[test]
    fn test_verify() {
        let tag = HmacSha256::mac(b"key", b"message");
        assert!(HmacSha256::verify(b"key", b"message", &tag));
        assert!(!HmacSha256::verify(b"key", b"messagf", &tag));
        assert!(!HmacSha256::verify(b"kez", b"message", &tag));
        assert!(<HmacSha256 as Mac>::verify(b"key", b"message", &tag));
    }

    #[test]
    fn test_segmented_update_matches_flat() {
        let source: &[u8] = b"HelloHi ThereThere!";
        let key = [0x0bu8; 20];

        let mut hmac = HmacSha256::new(&key);
        hmac.update_from(source, 5, 8);
        assert_eq!(hmac.finish(), HmacSha256::mac(&key, b"Hi There"));
    }

    #[test]
    fn test_try_update_from_out_of_range() {
        let source: &[u8] = b"Hello";
        let mut hmac = HmacSha256::new(b"key");
        assert!(matches!(
            hmac.try_update_from(source, 4, 2),
            Err(CryptoError::RangeOutOfBounds { .. })
        ));
        // Nothing was absorbed
        assert_eq!(hmac.finish(), HmacSha256::mac(b"key", b""));
    }
}
