//! Codec backends behind the [`FrameEncoder`] capability trait.
//!
//! The packetization layer never talks to a concrete codec library.
//! Each wrapped backend implements [`FrameEncoder`] once: encode one
//! frame of interleaved PCM samples, appending the frame's bits to the
//! session bit buffer. Frame bits are positional within a packet, so
//! append order is significant.
//!
//! ## Supported backends
//!
//! | Codec | Module | Status |
//! |-------|--------|--------|
//! | G.711 (A-law / µ-law) | [`g711`] | Implemented |
//! | Speex (libspeex FFI)  | [`speex`] | Planned |
//!
//! ## Implementing a new backend
//!
//! 1. Create a new module (e.g. `codec/opus.rs`)
//! 2. Implement `FrameEncoder` for your type
//! 3. Hand a boxed instance to [`crate::session::EncoderSession::new`]

pub mod g711;
pub mod speex;

use crate::bits::BitWriter;
use crate::error::Result;
use crate::packetizer::FrameTerminator;

/// One wrapped codec backend: encodes fixed-size frames of PCM into
/// the session bit buffer.
///
/// All metadata is fixed once the backend is constructed; the session
/// layer reads it exactly once at configuration time.
pub trait FrameEncoder: Send {
    /// Encode one frame of interleaved 16-bit PCM, appending its bits
    /// to `bits`.
    ///
    /// `samples` holds exactly [`frame_size`](Self::frame_size) samples
    /// per channel; the session layer has already validated the length.
    fn encode(&mut self, samples: &[i16], bits: &mut BitWriter) -> Result<()>;

    /// Samples per channel per frame (the codec's scheduling granularity).
    fn frame_size(&self) -> usize;

    /// Algorithmic delay in samples: how far the codec looks ahead before
    /// a frame's real audio is represented in the bitstream. Subtracted
    /// from packet timestamps by the packetizer.
    fn lookahead(&self) -> usize;

    /// Nominal bitrate in bits per second, all channels included.
    fn bitrate(&self) -> u32;

    /// Filler code the packetizer packs for each unused frame slot in
    /// the final packet of a stream.
    fn terminator(&self) -> FrameTerminator;

    /// Codec name for logging and container stream headers.
    fn codec_name(&self) -> &'static str;

    /// Container extradata: a self-describing header blob the muxer
    /// stores once per stream so decoders can configure themselves.
    fn header_packet(&self) -> Vec<u8>;
}
