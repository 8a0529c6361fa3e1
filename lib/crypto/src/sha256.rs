//! SHA-256 Implementation
//!
//! Pure Rust SHA-256 hash function (FIPS 180-4) with a Start / Update /
//! Finish lifecycle. Every entry point, one-shot helpers included, runs
//! through the same `update` path, so splitting input across calls never
//! changes the digest.

use crate::digest::{Digest, BLOCK_SIZE, DIGEST_SIZE};
use crate::segment::{Digester, SegmentReader, SegmentedRead, DEFAULT_CHUNK_SIZE};
use crate::{CryptoError, Hash};

/// SHA-256 hasher.
#[derive(Clone)]
pub struct Sha256 {
    state: [u32; 8],
    buffer: [u8; BLOCK_SIZE],
    buffer_len: usize,
    total_len: u64,
    started: bool,
}

impl Sha256 {
    /// Initial hash values (first 32 bits of fractional parts of square roots of first 8 primes).
    const H: [u32; 8] = [
        0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a,
        0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
    ];

    /// Round constants (first 32 bits of fractional parts of cube roots of first 64 primes).
    const K: [u32; 64] = [
        0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5,
        0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
        0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3,
        0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
        0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc,
        0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
        0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7,
        0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
        0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13,
        0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
        0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3,
        0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
        0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5,
        0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
        0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208,
        0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
    ];

    /// Create a started SHA-256 hasher.
    pub const fn new() -> Self {
        Self {
            state: Self::H,
            buffer: [0u8; BLOCK_SIZE],
            buffer_len: 0,
            total_len: 0,
            started: true,
        }
    }

    /// Reset to the initial state, discarding anything absorbed so far.
    pub fn start(&mut self) {
        self.state = Self::H;
        self.buffer = [0u8; BLOCK_SIZE];
        self.buffer_len = 0;
        self.total_len = 0;
        self.started = true;
    }

    /// Bytes absorbed since the last `start`.
    pub fn total_len(&self) -> u64 {
        self.total_len
    }

    /// Whether the hasher is between `start` and `finish`.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Process a 64-byte block.
    fn compress(&mut self, block: &[u8]) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);

        // Parse block into 16 32-bit words
        let mut w = [0u32; 64];
        for (i, chunk) in block.chunks_exact(4).enumerate() {
            w[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        // Extend to 64 words
        for i in 16..64 {
            let s0 = w[i - 15].rotate_right(7) ^ w[i - 15].rotate_right(18) ^ (w[i - 15] >> 3);
            let s1 = w[i - 2].rotate_right(17) ^ w[i - 2].rotate_right(19) ^ (w[i - 2] >> 10);
            w[i] = w[i - 16]
                .wrapping_add(s0)
                .wrapping_add(w[i - 7])
                .wrapping_add(s1);
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = self.state;

        for i in 0..64 {
            let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
            let ch = (e & f) ^ ((!e) & g);
            let temp1 = h
                .wrapping_add(s1)
                .wrapping_add(ch)
                .wrapping_add(Self::K[i])
                .wrapping_add(w[i]);
            let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
            let maj = (a & b) ^ (a & c) ^ (b & c);
            let temp2 = s0.wrapping_add(maj);

            h = g;
            g = f;
            f = e;
            e = d.wrapping_add(temp1);
            d = c;
            c = b;
            b = a;
            a = temp1.wrapping_add(temp2);
        }

        for (word, value) in self.state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
            *word = word.wrapping_add(value);
        }
    }

    /// Update the hasher with input data.
    pub fn update(&mut self, data: &[u8]) {
        debug_assert!(self.started, "Sha256::update called before start");

        self.total_len = self.total_len.wrapping_add(data.len() as u64);

        let mut data = data;

        // Fill buffer first
        if self.buffer_len > 0 {
            let space = BLOCK_SIZE - self.buffer_len;
            if data.len() < space {
                self.buffer[self.buffer_len..self.buffer_len + data.len()].copy_from_slice(data);
                self.buffer_len += data.len();
                return;
            }
            self.buffer[self.buffer_len..].copy_from_slice(&data[..space]);
            let block = self.buffer;
            self.compress(&block);
            data = &data[space..];
            self.buffer_len = 0;
        }

        let mut blocks = data.chunks_exact(BLOCK_SIZE);
        for block in &mut blocks {
            self.compress(block);
        }

        let remainder = blocks.remainder();
        self.buffer[..remainder.len()].copy_from_slice(remainder);
        self.buffer_len = remainder.len();
    }

    /// Update with `len` bytes of `source` starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds `source.len()` or the source
    /// cannot deliver the bytes it reports. Nothing is hashed in the
    /// first case.
    pub fn update_from<S: SegmentedRead + ?Sized>(&mut self, source: &S, offset: usize, len: usize) {
        if let Err(err) = self.try_update_from(source, offset, len) {
            panic!("Sha256::update_from: {}", err);
        }
    }

    /// Fallible form of [`Sha256::update_from`].
    pub fn try_update_from<S: SegmentedRead + ?Sized>(
        &mut self,
        source: &S,
        offset: usize,
        len: usize,
    ) -> Result<(), CryptoError> {
        SegmentReader::<S, DEFAULT_CHUNK_SIZE>::new(source, offset, len)?.feed(self)
    }

    /// Apply padding and return the digest.
    ///
    /// The hasher must be restarted with [`Sha256::start`] before reuse.
    pub fn finish(&mut self) -> Digest {
        debug_assert!(self.started, "Sha256::finish called before start");

        let total_bits = self.total_len.wrapping_mul(8);

        // Append 0x80
        self.buffer[self.buffer_len] = 0x80;
        self.buffer_len += 1;

        // No room for the 8-byte length: pad out and compress an extra block
        if self.buffer_len > BLOCK_SIZE - 8 {
            self.buffer[self.buffer_len..].fill(0);
            let block = self.buffer;
            self.compress(&block);
            self.buffer_len = 0;
        }

        self.buffer[self.buffer_len..BLOCK_SIZE - 8].fill(0);
        self.buffer[BLOCK_SIZE - 8..].copy_from_slice(&total_bits.to_be_bytes());
        let block = self.buffer;
        self.compress(&block);

        let mut result = [0u8; DIGEST_SIZE];
        for (out, word) in result.chunks_exact_mut(4).zip(self.state.iter()) {
            out.copy_from_slice(&word.to_be_bytes());
        }

        self.buffer_len = 0;
        self.started = false;
        Digest(result)
    }

    /// One-shot hash function.
    pub fn digest(data: &[u8]) -> Digest {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finish()
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hash for Sha256 {
    const OUTPUT_SIZE: usize = DIGEST_SIZE;

    fn new() -> Self {
        Sha256::new()
    }

    fn update(&mut self, data: &[u8]) {
        Sha256::update(self, data)
    }

    fn finalize(mut self) -> Digest {
        self.finish()
    }
}

impl Digester for Sha256 {
    fn update(&mut self, data: &[u8]) {
        Sha256::update(self, data)
    }
}
