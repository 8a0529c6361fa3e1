//! # Message Buffers
//!
//! A growable byte sequence stored as a chain of fixed-capacity segments,
//! the shape network stacks use for packet payloads. Appending never moves
//! bytes already written, and nothing here ever joins the segments into
//! one flat allocation.
//!
//! The first segment can reserve head room (as a packet buffer would for
//! headers), so segment boundaries are deliberately not multiples of
//! `segment_size` from the caller's point of view.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::segment::SegmentedRead;
use crate::CryptoError;

/// Message buffer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageConfig {
    /// Capacity of every segment in bytes
    pub segment_size: usize,
    /// Bytes of the first segment held back from payload
    pub head_reserved: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            segment_size: 128,
            head_reserved: 0,
        }
    }
}

struct Segment {
    data: Box<[u8]>,
    start: usize,
    len: usize,
}

impl Segment {
    fn new(size: usize, start: usize) -> Self {
        Self {
            data: vec![0u8; size].into_boxed_slice(),
            start,
            len: 0,
        }
    }

    fn bytes(&self) -> &[u8] {
        &self.data[self.start..self.start + self.len]
    }

    fn space(&self) -> usize {
        self.data.len() - self.start - self.len
    }
}

/// Segmented byte buffer.
pub struct MessageBuffer {
    config: MessageConfig,
    segments: Vec<Segment>,
    len: usize,
}

impl MessageBuffer {
    /// Creates an empty buffer with the default configuration.
    pub fn new() -> Self {
        Self {
            config: MessageConfig::default(),
            segments: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty buffer with `config`.
    pub fn with_config(config: MessageConfig) -> Result<Self, CryptoError> {
        if config.segment_size == 0 || config.head_reserved >= config.segment_size {
            return Err(CryptoError::InvalidConfig);
        }
        Ok(Self {
            config,
            segments: Vec::new(),
            len: 0,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MessageConfig {
        &self.config
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of segments allocated.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Iterates over the filled part of each segment, in order.
    pub fn segments(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.segments.iter().map(Segment::bytes)
    }

    /// Appends `data` at the end, growing the chain as needed.
    pub fn append(&mut self, data: &[u8]) {
        let mut data = data;

        while !data.is_empty() {
            let needs_segment = self.segments.last().map_or(true, |seg| seg.space() == 0);
            if needs_segment {
                let start = if self.segments.is_empty() {
                    self.config.head_reserved
                } else {
                    0
                };
                self.segments.push(Segment::new(self.config.segment_size, start));
            }

            let Some(seg) = self.segments.last_mut() else {
                break;
            };
            let count = core::cmp::min(seg.space(), data.len());
            let at = seg.start + seg.len;
            seg.data[at..at + count].copy_from_slice(&data[..count]);
            seg.len += count;
            self.len += count;
            data = &data[count..];
        }
    }

    /// Copies bytes starting at `offset` into `buf`; returns the count copied.
    pub fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> usize {
        if offset >= self.len {
            return 0;
        }

        let mut copied = 0;
        let mut skip = offset;

        for seg in &self.segments {
            let bytes = seg.bytes();
            if skip >= bytes.len() {
                skip -= bytes.len();
                continue;
            }

            let count = core::cmp::min(bytes.len() - skip, buf.len() - copied);
            buf[copied..copied + count].copy_from_slice(&bytes[skip..skip + count]);
            copied += count;
            skip = 0;

            if copied == buf.len() {
                break;
            }
        }

        copied
    }

    /// Drops all content and segments.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.len = 0;
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentedRead for MessageBuffer {
    fn len(&self) -> usize {
        MessageBuffer::len(self)
    }

    fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> usize {
        MessageBuffer::read_bytes(self, offset, buf)
    }
}
