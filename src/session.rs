//! Encoder session lifecycle and registry.
//!
//! An encoder session is created once, after configuration is fixed, and
//! destroyed when the stream ends. It wires a codec backend to a
//! packetizer and drives the per-frame flow:
//!
//! ```text
//! new(config, backend)   -> session (validates config, captures extradata)
//! encode_frame(samples)  -> Option<Packet>   (repeat per input frame)
//! finish()               -> Option<Packet>   (once, at end of stream)
//! drop                   -> any un-finished partial packet is discarded
//! ```
//!
//! A session is single-threaded and synchronous; the
//! [`SessionRegistry`] serializes shared access with a per-session lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::codec::FrameEncoder;
use crate::config::{EncoderConfig, RateControl};
use crate::error::{EncoderError, Result};
use crate::packetizer::{Packet, Packetizer};

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// One encoder session: a codec backend plus its packetizer.
pub struct EncoderSession {
    /// Unique session identifier (16-char hex string).
    id: String,
    config: EncoderConfig,
    encoder: Box<dyn FrameEncoder>,
    packetizer: Packetizer,
    extradata: Vec<u8>,
}

impl EncoderSession {
    /// Create a session from a validated configuration and a backend.
    ///
    /// The packetizer is built from the backend's lookahead and
    /// terminator, the container extradata is captured, and the
    /// effective parameters are logged at debug level.
    pub fn new(mut config: EncoderConfig, encoder: Box<dyn FrameEncoder>) -> Result<Self> {
        config.validate()?;

        let packetizer = Packetizer::new(
            config.frames_per_packet,
            encoder.lookahead(),
            encoder.terminator(),
        )?;
        let extradata = encoder.header_packet();
        let id = format!("{:016X}", SESSION_COUNTER.fetch_add(1, Ordering::SeqCst));

        let session = Self {
            id,
            config,
            encoder,
            packetizer,
            extradata,
        };
        session.log_params();
        Ok(session)
    }

    /// Debug dump of the effective encoding parameters.
    fn log_params(&self) {
        let config = &self.config;
        match config.rate_control {
            RateControl::Vbr { quality } => {
                tracing::debug!(rate_control = "VBR", quality, "rate control")
            }
            RateControl::Cbr { bitrate } | RateControl::Abr { bitrate } => {
                tracing::debug!(rate_control = config.rate_control.name(), bitrate, "rate control")
            }
            RateControl::ConstantQuality { quality } => {
                tracing::debug!(rate_control = "CBR", quality, "rate control")
            }
        }
        tracing::debug!(
            session_id = %self.id,
            codec = self.encoder.codec_name(),
            channels = config.channels,
            band = config.band().map(|b| b.name()).unwrap_or("unknown"),
            sample_rate = config.sample_rate,
            bitrate = self.encoder.bitrate(),
            complexity = config.complexity,
            frame_size = self.encoder.frame_size(),
            frames_per_packet = config.frames_per_packet,
            packet_samples = self.encoder.frame_size() * config.frames_per_packet,
            lookahead = self.encoder.lookahead(),
            "encoder session created"
        );
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Container extradata (stream header) for the muxer.
    pub fn extradata(&self) -> &[u8] {
        &self.extradata
    }

    /// Samples per channel the caller must supply to each
    /// [`encode_frame`](Self::encode_frame) call.
    pub fn frame_size(&self) -> usize {
        self.encoder.frame_size()
    }

    /// Encode one frame of interleaved PCM and submit it to the
    /// packetizer.
    ///
    /// `samples` must hold exactly `frame_size() * channels` samples.
    /// Returns `Ok(Some(packet))` when the frame completes a packet
    /// (written to `out`), `Ok(None)` while accumulating.
    pub fn encode_frame(&mut self, samples: &[i16], out: &mut [u8]) -> Result<Option<Packet>> {
        let expected = self.encoder.frame_size() * self.config.channels as usize;
        if samples.len() != expected {
            return Err(EncoderError::FrameSizeMismatch {
                expected,
                got: samples.len(),
            });
        }
        self.encoder.encode(samples, self.packetizer.bits_mut())?;
        self.packetizer
            .submit_frame(self.encoder.frame_size(), out)
    }

    /// Flush the stream at end of input; call once, after the last frame.
    ///
    /// Emits the final padded packet if a partial one is pending.
    pub fn finish(&mut self, out: &mut [u8]) -> Result<Option<Packet>> {
        self.packetizer.finalize(out)
    }

    /// Retry draining a completed packet after
    /// [`EncoderError::OutputBufferTooSmall`].
    pub fn retry_drain(&mut self, out: &mut [u8]) -> Result<Option<Packet>> {
        self.packetizer.drain_pending(out)
    }
}

/// Thread-safe registry of active encoder sessions.
///
/// Backed by `parking_lot::RwLock` for fast concurrent reads; each
/// session carries its own `Mutex` because encoding mutates it. One
/// session equals one logical stream; all frame submissions for a
/// session go through its lock.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Arc<Mutex<EncoderSession>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and register it, returning the shared handle.
    pub fn create_session(
        &self,
        config: EncoderConfig,
        encoder: Box<dyn FrameEncoder>,
    ) -> Result<Arc<Mutex<EncoderSession>>> {
        let session = EncoderSession::new(config, encoder)?;
        let id = session.id().to_string();
        let session = Arc::new(Mutex::new(session));
        self.sessions.write().insert(id.clone(), session.clone());

        let total = self.sessions.read().len();
        tracing::debug!(session_id = %id, total_sessions = total, "session registered");
        Ok(session)
    }

    /// Look up a session by ID.
    pub fn get_session(&self, id: &str) -> Option<Arc<Mutex<EncoderSession>>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove and return a session by ID.
    ///
    /// Tearing a session down without [`EncoderSession::finish`] discards
    /// any pending partial packet.
    pub fn remove_session(&self, id: &str) -> Result<Arc<Mutex<EncoderSession>>> {
        let removed = self.sessions.write().remove(id);
        match removed {
            Some(session) => {
                let total = self.sessions.read().len();
                tracing::debug!(session_id = %id, total_sessions = total, "session removed");
                Ok(session)
            }
            None => Err(EncoderError::SessionNotFound(id.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::g711::{G711Encoder, Law};

    fn make_session(frames_per_packet: usize) -> EncoderSession {
        let config = EncoderConfig {
            frames_per_packet,
            ..Default::default()
        };
        let encoder = G711Encoder::new(Law::ULaw, 1, 8000).unwrap();
        EncoderSession::new(config, Box::new(encoder)).unwrap()
    }

    #[test]
    fn session_ids_are_unique() {
        let a = make_session(1);
        let b = make_session(1);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().len(), 16);
    }

    #[test]
    fn extradata_captured_at_init() {
        let session = make_session(1);
        assert_eq!(&session.extradata()[..4], b"G711");
    }

    #[test]
    fn encode_frame_validates_length() {
        let mut session = make_session(1);
        let mut out = [0u8; 512];
        let short = vec![0i16; 10];
        assert!(matches!(
            session.encode_frame(&short, &mut out),
            Err(EncoderError::FrameSizeMismatch {
                expected: 160,
                got: 10
            })
        ));
    }

    #[test]
    fn stereo_frame_length_includes_channels() {
        let config = EncoderConfig {
            channels: 2,
            ..Default::default()
        };
        let encoder = G711Encoder::new(Law::ULaw, 2, 8000).unwrap();
        let mut session = EncoderSession::new(config, Box::new(encoder)).unwrap();
        let mut out = [0u8; 512];

        let mono_frame = vec![0i16; 160];
        assert!(session.encode_frame(&mono_frame, &mut out).is_err());

        let stereo_frame = vec![0i16; 320];
        let pkt = session
            .encode_frame(&stereo_frame, &mut out)
            .unwrap()
            .expect("single frame per packet");
        assert_eq!(pkt.len, 320);
        // pts advances by samples per channel, not interleaved samples.
        let pkt2 = session.encode_frame(&stereo_frame, &mut out).unwrap().unwrap();
        assert_eq!(pkt2.pts, 160);
    }

    #[test]
    fn invalid_config_rejected_at_creation() {
        let config = EncoderConfig {
            frames_per_packet: 0,
            ..Default::default()
        };
        let encoder = G711Encoder::new(Law::ALaw, 1, 8000).unwrap();
        assert!(EncoderSession::new(config, Box::new(encoder)).is_err());
    }

    #[test]
    fn registry_create_get_remove() {
        let registry = SessionRegistry::new();
        let encoder = G711Encoder::new(Law::ALaw, 1, 8000).unwrap();
        let session = registry
            .create_session(EncoderConfig::default(), Box::new(encoder))
            .unwrap();
        let id = session.lock().id().to_string();

        assert_eq!(registry.len(), 1);
        assert!(registry.get_session(&id).is_some());

        registry.remove_session(&id).unwrap();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.remove_session(&id),
            Err(EncoderError::SessionNotFound(_))
        ));
    }
}
