//! # Segmented Sources
//!
//! Feeds a byte range of a segmented buffer into a streaming digester.
//!
//! The buffer itself is owned elsewhere. The only capability required of
//! it is [`SegmentedRead::read_bytes`]: copy a bounded range into a
//! caller-provided flat slice. [`SegmentReader`] pulls the range through
//! a `CHUNK`-byte stack array, so memory use stays fixed no matter how
//! long the range is or how the source lays out its segments.
//!
//! ```text
//!  source:  [ seg 0 ][ seg 1 ][ seg 2 ]...
//!                 |<----- offset..offset+len ----->|
//!  scratch:       [CHUNK] -> update() -> [CHUNK] -> update() -> ...
//! ```

use crate::CryptoError;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Chunk size used by `update_from` on the hashers.
pub const DEFAULT_CHUNK_SIZE: usize = 16;

/// Read access to a logically contiguous, possibly segmented, byte sequence.
pub trait SegmentedRead {
    /// Total content length in bytes.
    fn len(&self) -> usize;

    /// Whether the source holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies up to `buf.len()` bytes starting at `offset` into `buf`.
    ///
    /// Returns the number of bytes copied, 0 when `offset` is at or past
    /// the end.
    fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> usize;
}

impl SegmentedRead for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> usize {
        if offset >= <[u8]>::len(self) {
            return 0;
        }
        let count = core::cmp::min(buf.len(), <[u8]>::len(self) - offset);
        buf[..count].copy_from_slice(&self[offset..offset + count]);
        count
    }
}

#[cfg(feature = "alloc")]
impl SegmentedRead for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> usize {
        self.as_slice().read_bytes(offset, buf)
    }
}

/// Anything with a streaming `update`.
pub trait Digester {
    /// Absorbs `data`.
    fn update(&mut self, data: &[u8]);
}

impl<D: Digester + ?Sized> Digester for &mut D {
    fn update(&mut self, data: &[u8]) {
        (**self).update(data)
    }
}

/// A validated byte range of a segmented source.
pub struct SegmentReader<'a, S: ?Sized, const CHUNK: usize = DEFAULT_CHUNK_SIZE> {
    source: &'a S,
    offset: usize,
    remaining: usize,
}

impl<'a, S: SegmentedRead + ?Sized, const CHUNK: usize> SegmentReader<'a, S, CHUNK> {
    const NONZERO_CHUNK: () = assert!(CHUNK > 0, "SegmentReader chunk size must be non-zero");

    /// Creates a reader over `len` bytes of `source` starting at `offset`.
    ///
    /// Fails with `RangeOutOfBounds` if the range does not lie within
    /// `source.len()`.
    pub fn new(source: &'a S, offset: usize, len: usize) -> Result<Self, CryptoError> {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO_CHUNK;

        let available = source.len();
        let in_bounds = offset.checked_add(len).map_or(false, |end| end <= available);
        if !in_bounds {
            #[cfg(feature = "logging")]
            log::warn!(
                "segment range {}+{} exceeds source length {}",
                offset,
                len,
                available
            );
            return Err(CryptoError::RangeOutOfBounds { offset, len, available });
        }

        Ok(Self {
            source,
            offset,
            remaining: len,
        })
    }

    /// Bytes not yet fed.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Feeds the whole range into `digester`, one chunk at a time.
    pub fn feed<D: Digester + ?Sized>(mut self, digester: &mut D) -> Result<(), CryptoError> {
        let mut scratch = [0u8; CHUNK];

        #[cfg(feature = "logging")]
        log::trace!(
            "feeding {} bytes from offset {} in {}-byte chunks",
            self.remaining,
            self.offset,
            CHUNK
        );

        while self.remaining > 0 {
            let want = core::cmp::min(CHUNK, self.remaining);
            let got = self.source.read_bytes(self.offset, &mut scratch[..want]);
            if got == 0 {
                #[cfg(feature = "logging")]
                log::warn!("segment source returned no bytes at offset {}", self.offset);
                return Err(CryptoError::ShortRead { offset: self.offset });
            }

            digester.update(&scratch[..got]);
            self.offset += got;
            self.remaining -= got;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every chunk it is handed.
    struct Recorder {
        bytes: [u8; 64],
        len: usize,
        calls: usize,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                bytes: [0u8; 64],
                len: 0,
                calls: 0,
            }
        }
    }

    impl Digester for Recorder {
        fn update(&mut self, data: &[u8]) {
            self.bytes[self.len..self.len + data.len()].copy_from_slice(data);
            self.len += data.len();
            self.calls += 1;
        }
    }

    /// Source that reports more bytes than it can deliver.
    struct Liar;

    impl SegmentedRead for Liar {
        fn len(&self) -> usize {
            10
        }

        fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> usize {
            if offset >= 4 {
                return 0;
            }
            let count = core::cmp::min(buf.len(), 4 - offset);
            buf[..count].fill(0xee);
            count
        }
    }

    #[test]
    fn test_slice_read_bytes() {
        let data: &[u8] = b"HelloWorld";
        let mut buf = [0u8; 4];
        assert_eq!(data.read_bytes(3, &mut buf), 4);
        assert_eq!(&buf, b"loWo");
        assert_eq!(data.read_bytes(8, &mut buf), 2);
        assert_eq!(&buf[..2], b"ld");
        assert_eq!(data.read_bytes(10, &mut buf), 0);
        assert_eq!(data.read_bytes(usize::MAX, &mut buf), 0);
    }

    #[test]
    fn test_feed_exact_range() {
        let data: &[u8] = b"HelloabcdefghijklmnopqrstuvwxyzThere!";
        let mut rec = Recorder::new();
        SegmentReader::<[u8], 4>::new(data, 5, 26)
            .unwrap()
            .feed(&mut rec)
            .unwrap();
        assert_eq!(&rec.bytes[..rec.len], b"abcdefghijklmnopqrstuvwxyz");
        // 26 bytes in 4-byte chunks
        assert_eq!(rec.calls, 7);
    }

    #[test]
    fn test_zero_length_range_feeds_nothing() {
        let data: &[u8] = b"Hello";
        let mut rec = Recorder::new();
        let reader = SegmentReader::<[u8], DEFAULT_CHUNK_SIZE>::new(data, 5, 0).unwrap();
        assert_eq!(reader.remaining(), 0);
        reader.feed(&mut rec).unwrap();
        assert_eq!(rec.calls, 0);
    }

    #[test]
    fn test_range_out_of_bounds() {
        let data: &[u8] = b"Hello";
        let err = SegmentReader::<[u8], DEFAULT_CHUNK_SIZE>::new(data, 3, 3).err();
        assert_eq!(
            err,
            Some(CryptoError::RangeOutOfBounds { offset: 3, len: 3, available: 5 })
        );
        // offset + len overflow is out of bounds too
        assert!(SegmentReader::<[u8], DEFAULT_CHUNK_SIZE>::new(data, 1, usize::MAX).is_err());
    }

    #[test]
    fn test_short_read_reported() {
        let mut rec = Recorder::new();
        let result = SegmentReader::<Liar, 3>::new(&Liar, 0, 10).unwrap().feed(&mut rec);
        assert_eq!(result, Err(CryptoError::ShortRead { offset: 4 }));
        assert_eq!(rec.len, 4);
    }
}
