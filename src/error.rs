//! Error types for the encoder packetization library.

/// Errors that can occur in the encoder packetization library.
///
/// Variants map to specific failure modes across the stack:
///
/// - **Configuration**: [`InvalidChannelCount`](Self::InvalidChannelCount),
///   [`UnsupportedSampleRate`](Self::UnsupportedSampleRate),
///   [`InvalidFramesPerPacket`](Self::InvalidFramesPerPacket),
///   [`InvalidComplexity`](Self::InvalidComplexity),
///   [`InvalidQuality`](Self::InvalidQuality).
/// - **Encoding**: [`FrameSizeMismatch`](Self::FrameSizeMismatch).
/// - **Packetization**: [`OutputBufferTooSmall`](Self::OutputBufferTooSmall),
///   [`PacketPending`](Self::PacketPending),
///   [`SessionFinished`](Self::SessionFinished).
/// - **Registry**: [`SessionNotFound`](Self::SessionNotFound).
#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    /// Only mono and stereo input is supported.
    #[error("invalid channel count: {0} (only mono and stereo are supported)")]
    InvalidChannelCount(u32),

    /// Sample rate does not map to a supported band mode.
    #[error("sample rate of {0} Hz is not supported; resample to 8, 16, or 32 kHz")]
    UnsupportedSampleRate(u32),

    /// frames_per_packet outside the 1..=8 range.
    #[error("invalid frames per packet: {0} (valid range is 1 to 8)")]
    InvalidFramesPerPacket(usize),

    /// Encoding complexity outside the 0..=10 range.
    #[error("invalid complexity: {0} (valid range is 0 to 10)")]
    InvalidComplexity(u32),

    /// Constant-quality value outside the 0..=10 range.
    #[error("invalid quality: {0} (valid range is 0 to 10)")]
    InvalidQuality(u32),

    /// Input slice length is not exactly one frame of samples.
    #[error("frame size mismatch: expected {expected} samples, got {got}")]
    FrameSizeMismatch { expected: usize, got: usize },

    /// A completed packet does not fit the caller-provided output buffer.
    ///
    /// Recoverable: call
    /// [`Packetizer::drain_pending`](crate::Packetizer::drain_pending) with
    /// at least `needed` bytes of capacity. The frame is already counted;
    /// do not resubmit it.
    #[error("output buffer too small: packet needs {needed} bytes, capacity is {capacity}")]
    OutputBufferTooSmall { needed: usize, capacity: usize },

    /// A completed packet is still waiting to be drained
    /// (after [`OutputBufferTooSmall`](Self::OutputBufferTooSmall));
    /// no new frames may be submitted until it is.
    #[error("a completed packet is pending drain")]
    PacketPending,

    /// The stream was already finalized; no further frames are accepted.
    #[error("encoder session already finalized")]
    SessionFinished,

    /// No session with the given ID exists in the
    /// [`SessionRegistry`](crate::session::SessionRegistry).
    #[error("session not found: {0}")]
    SessionNotFound(String),
}

/// Convenience alias for `Result<T, EncoderError>`.
pub type Result<T> = std::result::Result<T, EncoderError>;
