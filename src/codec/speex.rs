//! Speex backend (libspeex FFI), planned.
//!
//! Speex is the codec this packetization model was designed around:
//! its frames are positional within a packet and the bitstream defines
//! a 5-bit terminator code (value 15) for "no more frames in this
//! packet", which is exactly the [`FrameTerminator`] the packetizer
//! packs when padding the final packet.
//!
//! Key parameters of the wrapper:
//!
//! - **Band modes**: the sample rate selects the mode:
//!   narrowband (8 kHz), wideband (16 kHz), ultra-wideband (32 kHz).
//! - **Lookahead**: queried from the encoder state after init and fed to
//!   the packetizer as the algorithmic delay.
//! - **Rate control**: VBR by float quality, CBR by bitrate, CBR by
//!   integer quality, or ABR; complexity 0..=10 trades speed for quality
//!   without affecting bitrate.
//! - **Header**: the stream header struct serializes to the container
//!   extradata blob.
//!
//! ## Implementation plan
//!
//! Will follow the same pattern as [`super::g711::G711Encoder`]:
//! - Own the encoder state and bind the native bitwriter to the session
//!   [`BitWriter`](crate::bits::BitWriter) via a byte-aligned copy per
//!   frame.
//! - Implement [`super::FrameEncoder`], mapping
//!   [`EncoderConfig`](crate::config::EncoderConfig) fields onto the
//!   library's control calls at construction.
//! - Report `FrameTerminator { code: 15, width: 5 }`.
//!
//! [`FrameTerminator`]: crate::packetizer::FrameTerminator
