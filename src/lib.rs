pub mod bits;
pub mod codec;
pub mod config;
pub mod error;
pub mod packetizer;
pub mod session;

pub use bits::BitWriter;
pub use codec::FrameEncoder;
pub use config::{Band, EncoderConfig, RateControl};
pub use error::{EncoderError, Result};
pub use packetizer::{FrameTerminator, Packet, Packetizer};
pub use session::{EncoderSession, SessionRegistry};
