//! Frames-per-packet accumulation and timestamp bookkeeping.
//!
//! Many container formats carry more than one codec frame per packet to
//! amortize per-packet overhead. The [`Packetizer`] accumulates a fixed
//! number of encoded frames (1 to 8) in its bit buffer, then drains them
//! as one packet with a presentation timestamp in the sample-rate time
//! base.
//!
//! ## Timestamps
//!
//! A running sample counter (`next_pts`) advances by one whole packet's
//! worth of samples on each emission. The emitted timestamp is offset by
//! the codec's algorithmic delay (lookahead), so the first packet of a
//! stream with lookahead has a negative pts:
//!
//! ```text
//! pts      = next_pts - lookahead
//! next_pts += samples_in_packet
//! ```
//!
//! ## End of stream
//!
//! The final partial packet is padded with one [`FrameTerminator`] per
//! unused frame slot, a fixed-width filler code decoders read as "no more
//! frames in this packet". Padding happens only in [`finalize`]
//! (true end of stream), never on intermediate flushes.
//!
//! [`finalize`]: Packetizer::finalize

use crate::bits::BitWriter;
use crate::error::{EncoderError, Result};

/// Valid range for frames accumulated per output packet.
pub const MIN_FRAMES_PER_PACKET: usize = 1;
pub const MAX_FRAMES_PER_PACKET: usize = 8;

/// Fixed-width filler code used to pad unused frame slots in the final
/// packet of a stream. Codec-specific: Speex packs code 15 in 5 bits,
/// G.711 uses its 8-bit silence byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTerminator {
    pub code: u32,
    /// Width of the code in bits, 1..=32.
    pub width: u32,
}

/// A drained packet: `len` bytes were written to the caller's output
/// buffer, presented at `pts` (sample-rate time base).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub len: usize,
    pub pts: i64,
}

/// Accumulates encoded frames into fixed-size packets.
///
/// Backends append each frame's bits via [`bits_mut`](Self::bits_mut),
/// then the caller reports the frame with
/// [`submit_frame`](Self::submit_frame). Every `frames_per_packet`-th
/// frame completes a packet, which is drained into the caller's buffer.
///
/// All calls are synchronous and complete before returning; a session's
/// packetizer must not be shared across threads without external
/// serialization.
#[derive(Debug)]
pub struct Packetizer {
    frames_per_packet: usize,
    lookahead: usize,
    terminator: FrameTerminator,
    /// Frames accumulated toward the current packet, 0..frames_per_packet.
    frame_count: usize,
    /// Samples (per channel) accumulated toward the current packet.
    sample_count: usize,
    /// Next presentation timestamp, in the sample-rate time base.
    next_pts: i64,
    /// Timestamp of a completed packet still waiting to be drained
    /// (set when the caller's buffer was too small).
    pending_pts: Option<i64>,
    finished: bool,
    bits: BitWriter,
}

impl Packetizer {
    /// Create a packetizer for a fixed frames-per-packet count and
    /// codec lookahead (both immutable for the session).
    pub fn new(
        frames_per_packet: usize,
        lookahead: usize,
        terminator: FrameTerminator,
    ) -> Result<Self> {
        if !(MIN_FRAMES_PER_PACKET..=MAX_FRAMES_PER_PACKET).contains(&frames_per_packet) {
            return Err(EncoderError::InvalidFramesPerPacket(frames_per_packet));
        }
        tracing::debug!(frames_per_packet, lookahead, "packetizer created");
        Ok(Self {
            frames_per_packet,
            lookahead,
            terminator,
            frame_count: 0,
            sample_count: 0,
            next_pts: 0,
            pending_pts: None,
            finished: false,
            bits: BitWriter::new(),
        })
    }

    /// The session-owned bit buffer backends append frame bits to.
    pub fn bits_mut(&mut self) -> &mut BitWriter {
        &mut self.bits
    }

    /// Frames accumulated toward the packet currently being built.
    pub fn frames_pending(&self) -> usize {
        self.frame_count
    }

    /// Next presentation timestamp (before lookahead offset).
    pub fn next_pts(&self) -> i64 {
        self.next_pts
    }

    /// Whether [`finalize`](Self::finalize) has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Report one encoded frame of `frame_samples` samples (per channel)
    /// whose bits are already in the bit buffer.
    ///
    /// Returns `Ok(Some(packet))` when this frame completes a packet, in
    /// which case the packet bytes have been written to `out`.
    /// `Ok(None)` means the frame was accumulated and nothing is ready.
    ///
    /// Errors:
    /// - [`EncoderError::SessionFinished`] after [`finalize`](Self::finalize).
    /// - [`EncoderError::PacketPending`] while a completed packet awaits
    ///   [`drain_pending`](Self::drain_pending).
    /// - [`EncoderError::OutputBufferTooSmall`] when the completed packet
    ///   does not fit `out`; the frame stays counted, retry the drain.
    pub fn submit_frame(&mut self, frame_samples: usize, out: &mut [u8]) -> Result<Option<Packet>> {
        debug_assert!(frame_samples > 0);
        if self.finished {
            return Err(EncoderError::SessionFinished);
        }
        if self.pending_pts.is_some() {
            return Err(EncoderError::PacketPending);
        }

        self.frame_count += 1;
        self.sample_count += frame_samples;

        if self.frame_count == self.frames_per_packet {
            self.complete_packet();
            return self.drain_pending(out);
        }
        Ok(None)
    }

    /// Flush the stream at end of input. Call exactly once.
    ///
    /// A pending partial packet is padded with one terminator marker per
    /// unused frame slot and emitted; with no partial packet pending
    /// (including a repeated call on already-clean state) this returns
    /// `Ok(None)`.
    pub fn finalize(&mut self, out: &mut [u8]) -> Result<Option<Packet>> {
        if self.pending_pts.is_some() {
            return Err(EncoderError::PacketPending);
        }
        self.finished = true;

        if self.frame_count == 0 {
            return Ok(None);
        }

        // Terminator codes for the unused frame slots in the last packet.
        while self.frame_count < self.frames_per_packet {
            self.bits.pack(self.terminator.code, self.terminator.width);
            self.frame_count += 1;
        }
        self.complete_packet();
        self.drain_pending(out)
    }

    /// Drain a completed packet into `out`.
    ///
    /// Normally invoked internally by [`submit_frame`](Self::submit_frame)
    /// and [`finalize`](Self::finalize); callers use it directly only to
    /// retry after [`EncoderError::OutputBufferTooSmall`]. The retry
    /// yields byte-identical content with the same pts. Returns
    /// `Ok(None)` when nothing is pending.
    pub fn drain_pending(&mut self, out: &mut [u8]) -> Result<Option<Packet>> {
        let Some(pts) = self.pending_pts else {
            return Ok(None);
        };

        let needed = self.bits.byte_len();
        if out.len() < needed {
            tracing::trace!(needed, capacity = out.len(), "packet drain deferred");
            return Err(EncoderError::OutputBufferTooSmall {
                needed,
                capacity: out.len(),
            });
        }

        let len = self.bits.write_to(out);
        self.bits.reset();
        self.pending_pts = None;

        tracing::trace!(len, pts, "packet drained");
        Ok(Some(Packet { len, pts }))
    }

    /// Close out the current packet: compute its pts, advance the sample
    /// counter, and reset the per-packet counters. The bit buffer holds
    /// the packet bytes until [`drain_pending`](Self::drain_pending)
    /// succeeds.
    fn complete_packet(&mut self) {
        let pts = self.next_pts - self.lookahead as i64;
        self.next_pts += self.sample_count as i64;
        self.frame_count = 0;
        self.sample_count = 0;
        self.pending_pts = Some(pts);
    }
}
