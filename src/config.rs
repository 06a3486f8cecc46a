//! Encoder session configuration.
//!
//! All fields are fixed for the lifetime of a session. The host supplies
//! a validated [`EncoderConfig`] once at session creation; there is no
//! mid-stream reconfiguration.

use crate::error::{EncoderError, Result};
use crate::packetizer::{MAX_FRAMES_PER_PACKET, MIN_FRAMES_PER_PACKET};

/// Default encoding complexity when the host does not specify one.
pub const DEFAULT_COMPLEXITY: u32 = 3;

/// Default quality for constant-quality rate control.
pub const DEFAULT_CBR_QUALITY: u32 = 8;

/// Band mode, selected by sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// 8 kHz.
    Narrowband,
    /// 16 kHz.
    Wideband,
    /// 32 kHz.
    UltraWideband,
}

impl Band {
    /// Map a sample rate to its band mode.
    pub fn from_sample_rate(sample_rate: u32) -> Result<Self> {
        match sample_rate {
            8000 => Ok(Band::Narrowband),
            16000 => Ok(Band::Wideband),
            32000 => Ok(Band::UltraWideband),
            other => Err(EncoderError::UnsupportedSampleRate(other)),
        }
    }

    /// The sample rate this band operates at.
    pub fn sample_rate(self) -> u32 {
        match self {
            Band::Narrowband => 8000,
            Band::Wideband => 16000,
            Band::UltraWideband => 32000,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Band::Narrowband => "narrowband",
            Band::Wideband => "wideband",
            Band::UltraWideband => "ultra-wideband",
        }
    }
}

/// Rate-control method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateControl {
    /// Variable bitrate, driven by a quality value 0.0..=10.0
    /// (out-of-range values are clamped).
    Vbr { quality: f32 },
    /// Constant bitrate in bits per second.
    Cbr { bitrate: u32 },
    /// Constant bitrate chosen by an integer quality value 0..=10;
    /// the backend derives the actual bitrate.
    ConstantQuality { quality: u32 },
    /// Average bitrate in bits per second.
    Abr { bitrate: u32 },
}

impl RateControl {
    pub fn name(&self) -> &'static str {
        match self {
            RateControl::Vbr { .. } => "VBR",
            RateControl::Cbr { .. } => "CBR",
            RateControl::ConstantQuality { .. } => "CBR",
            RateControl::Abr { .. } => "ABR",
        }
    }
}

impl Default for RateControl {
    fn default() -> Self {
        RateControl::ConstantQuality {
            quality: DEFAULT_CBR_QUALITY,
        }
    }
}

/// Immutable per-session encoder configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderConfig {
    /// Channel count; mono (1) or stereo (2).
    pub channels: u32,
    /// Input sample rate in Hz; must map to a [`Band`].
    pub sample_rate: u32,
    /// Rate-control method and its parameter.
    pub rate_control: RateControl,
    /// Encoding complexity 0..=10. Higher is better quality at the cost
    /// of speed; does not affect bitrate.
    pub complexity: u32,
    /// Number of encoded frames per output packet, 1..=8. Larger values
    /// reduce container overhead at the cost of latency.
    pub frames_per_packet: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 8000,
            rate_control: RateControl::default(),
            complexity: DEFAULT_COMPLEXITY,
            frames_per_packet: 1,
        }
    }
}

impl EncoderConfig {
    /// Validate all fields, normalizing the VBR quality into 0.0..=10.0.
    pub fn validate(&mut self) -> Result<()> {
        if !(1..=2).contains(&self.channels) {
            return Err(EncoderError::InvalidChannelCount(self.channels));
        }
        Band::from_sample_rate(self.sample_rate)?;
        if !(MIN_FRAMES_PER_PACKET..=MAX_FRAMES_PER_PACKET).contains(&self.frames_per_packet) {
            return Err(EncoderError::InvalidFramesPerPacket(self.frames_per_packet));
        }
        if self.complexity > 10 {
            return Err(EncoderError::InvalidComplexity(self.complexity));
        }
        match &mut self.rate_control {
            RateControl::Vbr { quality } => {
                *quality = quality.clamp(0.0, 10.0);
            }
            RateControl::ConstantQuality { quality } => {
                if *quality > 10 {
                    return Err(EncoderError::InvalidQuality(*quality));
                }
            }
            RateControl::Cbr { .. } | RateControl::Abr { .. } => {}
        }
        Ok(())
    }

    /// The band mode this configuration selects. Only valid after
    /// [`validate`](Self::validate).
    pub fn band(&self) -> Result<Band> {
        Band::from_sample_rate(self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let mut config = EncoderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.band().unwrap(), Band::Narrowband);
    }

    #[test]
    fn band_mapping() {
        assert_eq!(Band::from_sample_rate(8000).unwrap(), Band::Narrowband);
        assert_eq!(Band::from_sample_rate(16000).unwrap(), Band::Wideband);
        assert_eq!(Band::from_sample_rate(32000).unwrap(), Band::UltraWideband);
        assert!(matches!(
            Band::from_sample_rate(44100),
            Err(EncoderError::UnsupportedSampleRate(44100))
        ));
    }

    #[test]
    fn band_round_trip() {
        for band in [Band::Narrowband, Band::Wideband, Band::UltraWideband] {
            assert_eq!(Band::from_sample_rate(band.sample_rate()).unwrap(), band);
        }
    }

    #[test]
    fn rejects_invalid_channels() {
        let mut config = EncoderConfig {
            channels: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EncoderError::InvalidChannelCount(0))
        ));
        config.channels = 3;
        assert!(matches!(
            config.validate(),
            Err(EncoderError::InvalidChannelCount(3))
        ));
    }

    #[test]
    fn rejects_invalid_frames_per_packet() {
        let mut config = EncoderConfig {
            frames_per_packet: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        config.frames_per_packet = 9;
        assert!(config.validate().is_err());
        config.frames_per_packet = 8;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_invalid_complexity_and_quality() {
        let mut config = EncoderConfig {
            complexity: 11,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EncoderError::InvalidComplexity(11))
        ));

        let mut config = EncoderConfig {
            rate_control: RateControl::ConstantQuality { quality: 11 },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EncoderError::InvalidQuality(11))
        ));
    }

    #[test]
    fn vbr_quality_is_clamped() {
        let mut config = EncoderConfig {
            rate_control: RateControl::Vbr { quality: 12.5 },
            ..Default::default()
        };
        config.validate().unwrap();
        assert_eq!(config.rate_control, RateControl::Vbr { quality: 10.0 });

        config.rate_control = RateControl::Vbr { quality: -1.0 };
        config.validate().unwrap();
        assert_eq!(config.rate_control, RateControl::Vbr { quality: 0.0 });
    }
}
