//! RIFF/WAVE container view.
//!
//! The file is kept exactly as it arrived over the serial link; a
//! [`WavDescriptor`] is a bounds-checked view over those bytes that decodes
//! each field on access. Nothing is copied except the 4-byte tags returned
//! for display.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! [0..4]    riff             b"RIFF"
//! [4..8]    overall_size     u32  (file length - 8)
//! [8..12]   wave             b"WAVE"
//! [12..16]  fmt marker       b"fmt "
//! [16..20]  fmt_chunk_size   u32  (16 for plain PCM, 18/40 with extensions)
//! [20..22]  format_type      u16  (1 = PCM)
//! [22..24]  channels         u16
//! [24..28]  sample_rate      u32
//! [28..32]  byte_rate        u32
//! [32..34]  block_align      u16
//! [34..36]  bits_per_sample  u16
//! [20+fmt_chunk_size ..]     b"data", data_chunk_size u32, PCM payload
//! ```
//!
//! The data sub-header position depends on `fmt_chunk_size`; it is never
//! assumed to be the canonical 16.

use crate::bytes::{le_u16, le_u32, tag_at};

/// Length of the RIFF header chunk: tag, size, form type.
pub const RIFF_HEADER_LEN: usize = 12;

/// Length of a chunk header: 4-byte marker + 4-byte size.
pub const CHUNK_HEADER_LEN: usize = 8;

/// Size of the plain PCM `fmt ` chunk body.
pub const CANONICAL_FMT_CHUNK_SIZE: u32 = 16;

/// End of the fixed-position format fields (`bits_per_sample` ends here).
pub const FORMAT_FIELDS_END: usize = 36;

/// Header length of a file with a canonical `fmt ` chunk (44 bytes).
pub const CANONICAL_HEADER_LEN: usize = 44;

/// Bytes of the header that `overall_size` does not count (`RIFF` + size).
const UNCOUNTED_PREFIX_LEN: u32 = 8;

/// Bytes of the RIFF header already received when `overall_size` is decoded
/// and that `overall_size` does count (the `WAVE` tag).
const COUNTED_HEADER_LEN: u32 = 4;

mod offset {
    pub const RIFF: usize = 0;
    pub const OVERALL_SIZE: usize = 4;
    pub const WAVE: usize = 8;
    pub const FMT_MARKER: usize = 12;
    pub const FMT_CHUNK_SIZE: usize = 16;
    pub const FORMAT_TYPE: usize = 20;
    pub const CHANNELS: usize = 22;
    pub const SAMPLE_RATE: usize = 24;
    pub const BYTE_RATE: usize = 28;
    pub const BLOCK_ALIGN: usize = 32;
    pub const BITS_PER_SAMPLE: usize = 34;
}

/// Errors raised while viewing a buffer as a WAV container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WavError {
    /// The buffer ends before a header field the layout requires.
    #[error("container truncated: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes needed to reach the end of the required field.
        needed: usize,
        /// Bytes actually present.
        available: usize,
    },
    /// The first tag is not `RIFF`.
    #[error("missing RIFF tag")]
    BadRiffTag,
    /// The form type is not `WAVE`.
    #[error("missing WAVE tag")]
    BadWaveTag,
    /// `overall_size` is too small to cover the `WAVE` tag.
    #[error("declared size {overall_size} is smaller than the RIFF header")]
    SizeTooSmall {
        /// Declared `overall_size`.
        overall_size: u32,
    },
    /// `data_chunk_size` runs past the end of the buffer.
    #[error("payload {offset}+{len} exceeds buffer of {available} bytes")]
    PayloadOutOfBounds {
        /// Payload start.
        offset: usize,
        /// Declared payload length.
        len: usize,
        /// Buffer length.
        available: usize,
    },
    /// Bit depth the output path cannot convert.
    #[error("unsupported bit depth {0}")]
    UnsupportedBitDepth(u16),
}

/// Number of bytes that follow the 12-byte RIFF header on the wire.
///
/// `overall_size` counts everything after the `RIFF` tag and the size field
/// itself, including the 4-byte `WAVE` tag that has already been received
/// with the header, so the remainder is `overall_size - 4`.
pub fn body_len_after_header(header: &[u8]) -> Result<usize, WavError> {
    let overall_size = le_u32(header, offset::OVERALL_SIZE).ok_or(WavError::Truncated {
        needed: RIFF_HEADER_LEN,
        available: header.len(),
    })?;
    let body = overall_size
        .checked_sub(COUNTED_HEADER_LEN)
        .ok_or(WavError::SizeTooSmall { overall_size })?;
    usize::try_from(body).map_err(|_| WavError::SizeTooSmall { overall_size })
}

/// Zero-copy view of a WAV file held in memory.
///
/// Construction checks that every fixed header field and the data sub-header
/// lie inside the buffer; the accessors are then infallible. Tags are *not*
/// validated by [`parse`](Self::parse); call [`check_tags`](Self::check_tags)
/// when the caller wants to reject non-WAV input.
#[derive(Debug, Clone, Copy)]
pub struct WavDescriptor<'a> {
    bytes: &'a [u8],
    data_header: usize,
}

impl<'a> WavDescriptor<'a> {
    /// View `bytes` as a WAV container.
    ///
    /// # Errors
    ///
    /// [`WavError::Truncated`] if the buffer ends before the format fields or
    /// before the end of the data sub-header.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, WavError> {
        let truncated = |needed: usize| WavError::Truncated {
            needed,
            available: bytes.len(),
        };
        if bytes.len() < FORMAT_FIELDS_END {
            return Err(truncated(FORMAT_FIELDS_END));
        }
        let fmt_chunk_size = le_u32(bytes, offset::FMT_CHUNK_SIZE)
            .ok_or_else(|| truncated(FORMAT_FIELDS_END))?;
        let data_header = usize::try_from(fmt_chunk_size)
            .ok()
            .and_then(|size| offset::FORMAT_TYPE.checked_add(size))
            .ok_or_else(|| truncated(usize::MAX))?;
        let data_offset = data_header
            .checked_add(CHUNK_HEADER_LEN)
            .ok_or_else(|| truncated(usize::MAX))?;
        if bytes.len() < data_offset {
            return Err(truncated(data_offset));
        }
        Ok(Self { bytes, data_header })
    }

    /// Reject buffers whose tags are not `RIFF` / `WAVE`.
    pub fn check_tags(&self) -> Result<(), WavError> {
        if &self.riff_tag() != b"RIFF" {
            return Err(WavError::BadRiffTag);
        }
        if &self.wave_tag() != b"WAVE" {
            return Err(WavError::BadWaveTag);
        }
        Ok(())
    }

    // In-bounds for every offset below FORMAT_FIELDS_END and for the data
    // sub-header: checked once in `parse`.
    fn u16_at(&self, at: usize) -> u16 {
        le_u16(self.bytes, at).unwrap_or(0)
    }

    fn u32_at(&self, at: usize) -> u32 {
        le_u32(self.bytes, at).unwrap_or(0)
    }

    fn tag(&self, at: usize) -> [u8; 4] {
        tag_at(self.bytes, at).unwrap_or([0; 4])
    }

    /// `RIFF` tag bytes.
    pub fn riff_tag(&self) -> [u8; 4] {
        self.tag(offset::RIFF)
    }

    /// File length minus the 8 bytes of `RIFF` tag and size field.
    pub fn overall_size(&self) -> u32 {
        self.u32_at(offset::OVERALL_SIZE)
    }

    /// `WAVE` form-type bytes.
    pub fn wave_tag(&self) -> [u8; 4] {
        self.tag(offset::WAVE)
    }

    /// `fmt ` chunk marker bytes.
    pub fn fmt_chunk_marker(&self) -> [u8; 4] {
        self.tag(offset::FMT_MARKER)
    }

    /// Declared `fmt ` chunk body size.
    pub fn fmt_chunk_size(&self) -> u32 {
        self.u32_at(offset::FMT_CHUNK_SIZE)
    }

    /// Audio format code (1 = integer PCM).
    pub fn format_type(&self) -> u16 {
        self.u16_at(offset::FORMAT_TYPE)
    }

    /// Interleaved channel count.
    pub fn channel_count(&self) -> u16 {
        self.u16_at(offset::CHANNELS)
    }

    /// Frames per second.
    pub fn sample_rate(&self) -> u32 {
        self.u32_at(offset::SAMPLE_RATE)
    }

    /// Bytes per second.
    pub fn byte_rate(&self) -> u32 {
        self.u32_at(offset::BYTE_RATE)
    }

    /// Bytes per interleaved frame.
    pub fn block_align(&self) -> u16 {
        self.u16_at(offset::BLOCK_ALIGN)
    }

    /// Bits per sample.
    pub fn bits_per_sample(&self) -> u16 {
        self.u16_at(offset::BITS_PER_SAMPLE)
    }

    /// `data` chunk marker bytes.
    pub fn data_chunk_marker(&self) -> [u8; 4] {
        self.tag(self.data_header)
    }

    /// Declared payload length in bytes.
    #[allow(clippy::arithmetic_side_effects)] // Safety: data_header + 8 <= bytes.len(), checked in parse
    pub fn data_chunk_size(&self) -> u32 {
        self.u32_at(self.data_header + 4)
    }

    /// Offset of the first payload byte:
    /// `12 + 8 + fmt_chunk_size + 8`.
    #[allow(clippy::arithmetic_side_effects)] // Safety: cannot overflow, checked in parse
    pub fn data_offset(&self) -> usize {
        self.data_header + CHUNK_HEADER_LEN
    }

    /// Total file length implied by `overall_size`.
    pub fn declared_file_len(&self) -> u64 {
        u64::from(self.overall_size()).saturating_add(u64::from(UNCOUNTED_PREFIX_LEN))
    }

    /// Narrow the view to the file length `overall_size` declares.
    ///
    /// Bytes past the declared end are not part of this file (stale data from
    /// an earlier, longer upload), so [`payload`](Self::payload) must not
    /// reach them. A buffer shorter than the declared length is left as is.
    ///
    /// # Errors
    ///
    /// [`WavError::Truncated`] if the declared length ends before the data
    /// sub-header.
    pub fn within_declared_len(self) -> Result<Self, WavError> {
        match usize::try_from(self.declared_file_len()) {
            Ok(declared) if declared < self.bytes.len() => {
                Self::parse(self.bytes.get(..declared).unwrap_or_default())
            }
            _ => Ok(self),
        }
    }

    /// The PCM payload, `data_chunk_size` bytes starting at [`data_offset`](Self::data_offset).
    ///
    /// # Errors
    ///
    /// [`WavError::PayloadOutOfBounds`] if the declared size runs past the buffer.
    pub fn payload(&self) -> Result<&'a [u8], WavError> {
        let offset = self.data_offset();
        let len = usize::try_from(self.data_chunk_size()).unwrap_or(usize::MAX);
        let out_of_bounds = WavError::PayloadOutOfBounds {
            offset,
            len,
            available: self.bytes.len(),
        };
        let end = offset.checked_add(len).ok_or(out_of_bounds)?;
        self.bytes.get(offset..end).ok_or(out_of_bounds)
    }

    /// The whole underlying buffer.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}
