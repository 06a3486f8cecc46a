//! Append-only bit buffer for encoded frame bits.
//!
//! One [`BitWriter`] is owned per encoder session. Backends append each
//! frame's bits in arrival order; the packetizer drains the accumulated
//! content into an output packet and resets the buffer without giving up
//! its capacity.
//!
//! Bits are packed MSB-first: the first bit appended lands in the high
//! bit of the first byte. A partial final byte is zero-padded when the
//! content is written out.

/// Growable MSB-first bit buffer, reset (not reallocated) after each drain.
#[derive(Debug)]
pub struct BitWriter {
    bytes: Vec<u8>,
    /// Number of valid bits in the last byte of `bytes`, 1..=8.
    /// 8 means the last byte is full (also the empty-buffer state).
    bit_pos: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            bit_pos: 8,
        }
    }

    /// Append the low `nbits` of `value`, MSB-first. `nbits` must be <= 32.
    pub fn pack(&mut self, value: u32, nbits: u32) {
        debug_assert!(nbits <= 32);
        let mut remaining = nbits;
        while remaining > 0 {
            if self.bit_pos == 8 {
                self.bytes.push(0);
                self.bit_pos = 0;
            }
            let free = 8 - self.bit_pos;
            let take = free.min(remaining);
            let mask = ((1u16 << take) as u8).wrapping_sub(1);
            let shifted = ((value >> (remaining - take)) as u8) & mask;
            let last = self.bytes.len() - 1;
            self.bytes[last] |= shifted << (free - take);
            self.bit_pos += take;
            remaining -= take;
        }
    }

    /// Append whole bytes. Fast path when the buffer is byte-aligned;
    /// otherwise each byte is packed across the boundary.
    pub fn extend_bytes(&mut self, data: &[u8]) {
        if self.bit_pos == 8 {
            self.bytes.extend_from_slice(data);
        } else {
            for &b in data {
                self.pack(b as u32, 8);
            }
        }
    }

    /// Total number of bits appended since the last reset.
    pub fn bit_len(&self) -> usize {
        if self.bytes.is_empty() {
            0
        } else {
            (self.bytes.len() - 1) * 8 + self.bit_pos as usize
        }
    }

    /// Bytes needed to hold the content (partial final byte rounded up).
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Copy the content into `out` without consuming it.
    ///
    /// Returns the number of bytes written. The caller must provide at
    /// least [`byte_len`](Self::byte_len) bytes; any partial final byte
    /// is already zero-padded in storage.
    pub fn write_to(&self, out: &mut [u8]) -> usize {
        let len = self.bytes.len();
        out[..len].copy_from_slice(&self.bytes);
        len
    }

    /// Logical reset: content is discarded, capacity is retained.
    pub fn reset(&mut self) {
        self.bytes.clear();
        self.bit_pos = 8;
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
