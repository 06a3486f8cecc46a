use super::FrameEncoder;
use crate::bits::BitWriter;
use crate::error::{EncoderError, Result};
use crate::packetizer::FrameTerminator;

/// Default frame size in samples per channel. G.711 itself has no frame
/// structure; 160 samples (20 ms at 8 kHz) is the conventional framing
/// used by RTP and most containers.
pub const DEFAULT_FRAME_SIZE: usize = 160;

const ALAW_CLIP: i32 = 0x7F7B;
const ULAW_CLIP: i32 = 32635;
const ULAW_BIAS: i32 = 0x84;

/// G.711 companding law (ITU-T G.711).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Law {
    /// A-law, used in E1 regions. Silence byte 0xD5.
    ALaw,
    /// µ-law, used in T1 regions. Silence byte 0xFF.
    ULaw,
}

impl Law {
    /// The byte a linear zero sample compands to. Used as the terminator
    /// filler for padded frame slots, so padding decodes as silence.
    pub fn silence_byte(self) -> u8 {
        match self {
            Law::ALaw => linear_to_alaw(0),
            Law::ULaw => linear_to_ulaw(0),
        }
    }
}

/// Compand a linear 16-bit sample to A-law (ITU-T G.711).
///
/// The 13-bit magnitude is quantized into a sign bit, 3-bit segment, and
/// 4-bit mantissa; even bits are inverted for transmission (the 0x55
/// mask). The sign bit is set for non-negative samples, so linear zero
/// compands to 0xD5.
pub fn linear_to_alaw(sample: i16) -> u8 {
    let sign: u8 = if sample >= 0 { 0x80 } else { 0x00 };
    let mut magnitude = (sample as i32).abs();
    if magnitude > ALAW_CLIP {
        magnitude = ALAW_CLIP;
    }
    // A-law quantizes 13-bit magnitudes.
    magnitude >>= 3;

    let alaw = if magnitude < 32 {
        sign | (magnitude >> 1) as u8
    } else {
        // Segment s covers magnitudes [1 << (s + 4), 1 << (s + 5)).
        let mut segment: u8 = 7;
        for s in (1u8..8).rev() {
            if magnitude >= 1 << (s + 4) {
                segment = s;
                break;
            }
        }
        let mantissa = ((magnitude >> segment) & 0x0F) as u8;
        sign | (segment << 4) | mantissa
    };

    alaw ^ 0x55
}

/// Compand a linear 16-bit sample to µ-law (ITU-T G.711).
///
/// The magnitude is biased by 0x84, quantized into a sign bit, 3-bit
/// segment, and 4-bit mantissa, and bitwise complemented for
/// transmission, so linear zero compands to 0xFF.
pub fn linear_to_ulaw(sample: i16) -> u8 {
    let sign: u8 = if sample < 0 { 0x80 } else { 0x00 };
    let mut magnitude = (sample as i32).abs();
    if magnitude > ULAW_CLIP {
        magnitude = ULAW_CLIP;
    }
    magnitude += ULAW_BIAS;

    // Segment s covers biased magnitudes with the leading 1 at bit s + 7.
    let mut segment: u8 = 0;
    for s in (0u8..8).rev() {
        if magnitude >= 1 << (s + 7) {
            segment = s;
            break;
        }
    }
    let mantissa = ((magnitude >> (segment + 3)) & 0x0F) as u8;

    !(sign | (segment << 4) | mantissa)
}

/// G.711 backend: one companded byte per sample, zero lookahead,
/// 64 kbit/s per channel at 8 kHz.
#[derive(Debug)]
pub struct G711Encoder {
    law: Law,
    channels: u32,
    sample_rate: u32,
    frame_size: usize,
}

impl G711Encoder {
    /// Create a G.711 backend. G.711 is defined for 8 kHz; mono and
    /// stereo input are accepted.
    pub fn new(law: Law, channels: u32, sample_rate: u32) -> Result<Self> {
        if !(1..=2).contains(&channels) {
            return Err(EncoderError::InvalidChannelCount(channels));
        }
        if sample_rate != 8000 {
            return Err(EncoderError::UnsupportedSampleRate(sample_rate));
        }
        Ok(Self {
            law,
            channels,
            sample_rate,
            frame_size: DEFAULT_FRAME_SIZE,
        })
    }

    pub fn law(&self) -> Law {
        self.law
    }
}

impl FrameEncoder for G711Encoder {
    fn encode(&mut self, samples: &[i16], bits: &mut BitWriter) -> Result<()> {
        match self.law {
            Law::ALaw => {
                for &s in samples {
                    bits.pack(linear_to_alaw(s) as u32, 8);
                }
            }
            Law::ULaw => {
                for &s in samples {
                    bits.pack(linear_to_ulaw(s) as u32, 8);
                }
            }
        }
        Ok(())
    }

    fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// G.711 is memoryless: no lookahead.
    fn lookahead(&self) -> usize {
        0
    }

    /// 8 bits per sample per channel.
    fn bitrate(&self) -> u32 {
        self.sample_rate * 8 * self.channels
    }

    fn terminator(&self) -> FrameTerminator {
        FrameTerminator {
            code: self.law.silence_byte() as u32,
            width: 8,
        }
    }

    fn codec_name(&self) -> &'static str {
        match self.law {
            Law::ALaw => "pcm_alaw",
            Law::ULaw => "pcm_mulaw",
        }
    }

    /// 16-byte extradata blob: magic, version, law, channels,
    /// sample rate (LE), frame size (LE), trailing reserved bytes zero.
    fn header_packet(&self) -> Vec<u8> {
        let mut header = Vec::with_capacity(16);
        header.extend_from_slice(b"G711");
        header.push(1); // header version
        header.push(match self.law {
            Law::ALaw => 0,
            Law::ULaw => 1,
        });
        header.push(self.channels as u8);
        header.push(0);
        header.extend_from_slice(&self.sample_rate.to_le_bytes());
        header.extend_from_slice(&(self.frame_size as u32).to_le_bytes());
        header
    }
}
