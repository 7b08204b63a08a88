//! Software sine tone generator.
//!
//! Produces one buffer of 8-bit samples packed into the word layout the
//! audio stream FIFO expects, ready to be replayed in a loop by the DMA
//! engine.
//!
//! # Sample formula
//!
//! ```text
//! t = s / sample_rate
//! y = (A · sin(2π · f · t) + A) · (127 / A)        ∈ [0, 254]
//! ```
//!
//! # Word packing
//!
//! The PWM output consumes the least-significant byte of each 16-bit FIFO
//! half first, so every group of four samples `s0 s1 s2 s3` is stored as two
//! words in reverse-pair order:
//!
//! ```text
//! word[0] = (s3 << 8) | s2
//! word[1] = (s1 << 8) | s0
//! ```
//!
//! # Length
//!
//! Generation stops at `sample_count` samples or once elapsed time reaches
//! the period bound, whichever comes first. Time advances by one unit per
//! packed group of four samples, and the bound is `sample_rate / frequency`
//! units. For the reference 96 kHz / 2 kHz tone that is 48 groups = 192
//! samples = four whole cycles, so the buffer loops without a seam.
//!
//! The bound is exact only when `frequency` divides `sample_rate`; other
//! pairs truncate to the integer quotient.

use core::f64::consts::PI;

use platform::config::{NATIVE_BUFFER_BYTES, NATIVE_BUFFER_WORDS, TRANSFER_WORD_BYTES};

/// Samples packed into one group (two transfer words).
pub const SAMPLES_PER_GROUP: usize = 4;

/// Largest tone that fits the native DMA buffer: two samples per word.
#[allow(clippy::arithmetic_side_effects)] // Safety: 128 * 2, evaluated at compile time
pub const MAX_TONE_SAMPLES: usize = NATIVE_BUFFER_WORDS * 2;

/// Full-scale value of the unsigned 8-bit output at the waveform peak half.
const HALF_SCALE: f64 = 127.0;

/// Errors rejecting tone parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneError {
    /// Frequency of 0 Hz.
    #[error("tone frequency must be non-zero")]
    ZeroFrequency,
    /// Sample rate of 0 Hz.
    #[error("sample rate must be non-zero")]
    ZeroSampleRate,
    /// Frequency above the sample rate leaves an empty period.
    #[error("frequency {frequency_hz} Hz exceeds sample rate {sample_rate_hz} Hz")]
    EmptyPeriod {
        /// Requested frequency.
        frequency_hz: u32,
        /// Requested sample rate.
        sample_rate_hz: u32,
    },
    /// Amplitude is zero, negative or not finite.
    #[error("amplitude must be positive and finite")]
    InvalidAmplitude,
    /// More samples than the native buffer holds.
    #[error("{requested} samples exceed the {max}-sample buffer")]
    TooManySamples {
        /// Requested sample count.
        requested: usize,
        /// Capacity in samples.
        max: usize,
    },
}

/// Tone generator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneConfig {
    /// Amplitude in arbitrary units; cancels out of the output scale.
    pub amplitude: f32,
    /// Tone frequency in Hz.
    pub frequency_hz: u32,
    /// Output sample rate in Hz.
    pub sample_rate_hz: u32,
    /// Upper bound on generated samples.
    pub sample_count: usize,
}

impl ToneConfig {
    /// Reference tone: 2 kHz at 96 kHz, 256-sample budget, amplitude 2.0.
    pub const fn reference() -> Self {
        Self {
            amplitude: 2.0,
            frequency_hz: 2_000,
            sample_rate_hz: 96_000,
            sample_count: MAX_TONE_SAMPLES,
        }
    }

    /// Period bound in four-sample groups: `sample_rate / frequency`.
    pub fn period_groups(&self) -> Result<u32, ToneError> {
        if self.sample_rate_hz == 0 {
            return Err(ToneError::ZeroSampleRate);
        }
        let groups = self
            .sample_rate_hz
            .checked_div(self.frequency_hz)
            .ok_or(ToneError::ZeroFrequency)?;
        if groups == 0 {
            return Err(ToneError::EmptyPeriod {
                frequency_hz: self.frequency_hz,
                sample_rate_hz: self.sample_rate_hz,
            });
        }
        Ok(groups)
    }

    /// Generate the tone described by this configuration.
    pub fn generate(&self) -> Result<ToneBuffer, ToneError> {
        generate_tone(
            self.amplitude,
            self.frequency_hz,
            self.sample_rate_hz,
            self.sample_count,
        )
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self::reference()
    }
}

/// A generated tone in transfer layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneBuffer {
    bytes: heapless::Vec<u8, NATIVE_BUFFER_BYTES>,
    samples: usize,
}

impl ToneBuffer {
    fn new() -> Self {
        Self {
            bytes: heapless::Vec::new(),
            samples: 0,
        }
    }

    fn push_words(&mut self, words: [u32; 2]) -> Result<(), ToneError> {
        for word in words {
            self.bytes
                .extend_from_slice(&word.to_le_bytes())
                .map_err(|_| ToneError::TooManySamples {
                    requested: self.samples,
                    max: MAX_TONE_SAMPLES,
                })?;
        }
        Ok(())
    }

    /// Bytes to hand to the DMA engine.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when no complete group was generated.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Length in 32-bit transfer words.
    #[allow(clippy::arithmetic_side_effects)] // Safety: divisor is a non-zero constant
    pub fn word_count(&self) -> usize {
        self.bytes.len() / TRANSFER_WORD_BYTES
    }

    /// Number of samples the generator loop produced.
    pub fn sample_count(&self) -> usize {
        self.samples
    }

    /// Transfer words, decoded back from the byte layout.
    pub fn words(&self) -> impl Iterator<Item = u32> + '_ {
        self.bytes
            .chunks_exact(TRANSFER_WORD_BYTES)
            .filter_map(|chunk| chunk.try_into().ok().map(u32::from_le_bytes))
    }
}

/// One 8-bit sample of the offset sine at index `sample`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // y ∈ [0, 254] by construction
#[allow(clippy::arithmetic_side_effects)] // f64 arithmetic does not trap
pub fn sample_value(amplitude: f32, frequency_hz: u32, sample_rate_hz: u32, sample: usize) -> u8 {
    let a = f64::from(amplitude);
    let t = sample as f64 / f64::from(sample_rate_hz);
    let y = (a * libm::sin(2.0 * PI * f64::from(frequency_hz) * t) + a) * (HALF_SCALE / a);
    y as u8
}

/// Pack four samples into two transfer words (reverse-pair order).
#[allow(clippy::arithmetic_side_effects)] // Safety: u8 << 8 fits in u32
pub fn pack_group(group: [u8; 4]) -> [u32; 2] {
    let [s0, s1, s2, s3] = group.map(u32::from);
    [(s3 << 8) | s2, (s1 << 8) | s0]
}

/// Generate one buffer of sine tone.
///
/// # Errors
///
/// Rejects zero frequency or sample rate, a frequency above the sample rate,
/// a non-positive amplitude, and more samples than [`MAX_TONE_SAMPLES`].
#[allow(clippy::arithmetic_side_effects)] // Safety: index < sample_count <= 256, elapsed <= period
#[allow(clippy::indexing_slicing)] // Safety: sample % 4 < group.len()
pub fn generate_tone(
    amplitude: f32,
    frequency_hz: u32,
    sample_rate_hz: u32,
    sample_count: usize,
) -> Result<ToneBuffer, ToneError> {
    if !(amplitude.is_finite() && amplitude > 0.0) {
        return Err(ToneError::InvalidAmplitude);
    }
    if sample_count > MAX_TONE_SAMPLES {
        return Err(ToneError::TooManySamples {
            requested: sample_count,
            max: MAX_TONE_SAMPLES,
        });
    }
    let period = ToneConfig {
        amplitude,
        frequency_hz,
        sample_rate_hz,
        sample_count,
    }
    .period_groups()?;

    let mut buffer = ToneBuffer::new();
    let mut group = [0u8; SAMPLES_PER_GROUP];
    let mut elapsed = 0u32;

    for sample in 0..sample_count {
        if elapsed >= period {
            break;
        }
        let slot = sample % SAMPLES_PER_GROUP;
        group[slot] = sample_value(amplitude, frequency_hz, sample_rate_hz, sample);
        buffer.samples += 1;
        if slot == SAMPLES_PER_GROUP - 1 {
            buffer.push_words(pack_group(group))?;
            elapsed += 1;
        }
    }

    Ok(buffer)
}
