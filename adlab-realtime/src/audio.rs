//! PCM audio formats and chunk conversion.
//!
//! The capture side works in 32-bit float frames; the wire and playback
//! sides work in little-endian PCM16. Conversions live here so the session
//! driver and transport never touch sample math.

use crate::error::LiveError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// A PCM audio format: sample rate, channel count, 16-bit samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioFormat {
    /// 16 kHz mono PCM16, the capture format.
    pub fn pcm16_16khz() -> Self {
        Self { sample_rate: 16_000, channels: 1 }
    }

    /// 24 kHz mono PCM16, the playback format.
    pub fn pcm16_24khz() -> Self {
        Self { sample_rate: 24_000, channels: 1 }
    }

    /// Bytes of PCM16 data per second of audio.
    pub fn bytes_per_second(&self) -> u32 {
        self.sample_rate * self.channels as u32 * 2
    }
}

/// A chunk of PCM16 audio with its format.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioChunk {
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Convert a float frame in `[-1.0, 1.0]` to a PCM16 capture chunk.
    /// Out-of-range samples are clamped, not wrapped.
    pub fn from_f32_frame(samples: &[f32], format: AudioFormat) -> Self {
        let mut data = Vec::with_capacity(samples.len() * 2);
        for &sample in samples {
            let scaled = (sample * 32768.0).clamp(-32768.0, 32767.0) as i16;
            data.extend_from_slice(&scaled.to_le_bytes());
        }
        Self { data, format }
    }

    /// Base64 encode the raw bytes for the wire.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }

    /// Decode a base64 payload from the wire.
    pub fn from_base64(encoded: &str, format: AudioFormat) -> Result<Self, LiveError> {
        let data = BASE64
            .decode(encoded)
            .map_err(|e| LiveError::audio(format!("invalid base64 audio payload: {e}")))?;
        Ok(Self { data, format })
    }

    /// Playback duration of this chunk in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.data.len() as f64 / self.format.bytes_per_second() as f64
    }
}
