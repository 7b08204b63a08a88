//! PCM bit-depth conversion for the 8-bit PWM audio output.
//!
//! The output stage takes one unsigned byte per sample. 8-bit WAV payloads
//! are already unsigned and pass through; 16-bit payloads are signed
//! little-endian and are offset to unsigned before keeping the high byte:
//!
//! ```text
//! out = (sample as u16 + 0x8000) >> 8
//! ```
//!
//! A trailing odd byte in a 16-bit payload is not a whole sample and is
//! dropped.

use crate::wav::WavError;

/// Offset mapping signed 16-bit onto unsigned 16-bit.
const SIGNED_16_OFFSET: u16 = 0x8000;

/// Sample encoding of a WAV payload that the output path can convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PcmEncoding {
    /// Unsigned 8-bit, copied unchanged.
    U8,
    /// Signed 16-bit little-endian, reduced to its high byte.
    S16Le,
}

impl PcmEncoding {
    /// Pick the encoding for a `bits_per_sample` header value.
    ///
    /// # Errors
    ///
    /// [`WavError::UnsupportedBitDepth`] for anything but 8 or 16.
    pub fn from_bits_per_sample(bits: u16) -> Result<Self, WavError> {
        match bits {
            8 => Ok(Self::U8),
            16 => Ok(Self::S16Le),
            other => Err(WavError::UnsupportedBitDepth(other)),
        }
    }

    /// Input bytes per sample.
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::S16Le => 2,
        }
    }

    /// Output length for `input_len` payload bytes.
    pub const fn downscaled_len(self, input_len: usize) -> usize {
        match self {
            Self::U8 => input_len,
            Self::S16Le => input_len / 2,
        }
    }
}

/// Reduce one signed 16-bit sample to unsigned 8-bit.
pub fn downscale_s16(sample: i16) -> u8 {
    let unsigned = u16::from_le_bytes(sample.to_le_bytes()).wrapping_add(SIGNED_16_OFFSET);
    let [high, _] = unsigned.to_be_bytes();
    high
}

/// Convert as many whole samples of `input` as fit into `out`.
///
/// Returns the number of bytes written. The number of input bytes consumed
/// is `written * encoding.bytes_per_sample()`.
pub fn downscale_into(input: &[u8], encoding: PcmEncoding, out: &mut [u8]) -> usize {
    match encoding {
        PcmEncoding::U8 => {
            let n = input.len().min(out.len());
            if let (Some(dst), Some(src)) = (out.get_mut(..n), input.get(..n)) {
                dst.copy_from_slice(src);
            }
            n
        }
        PcmEncoding::S16Le => out
            .iter_mut()
            .zip(input.chunks_exact(2))
            .map(|(dst, pair)| {
                *dst = match pair {
                    [lo, hi] => downscale_s16(i16::from_le_bytes([*lo, *hi])),
                    _ => 0x80,
                };
            })
            .count(),
    }
}
