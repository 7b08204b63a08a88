//! Audio payload handling: RIFF/WAVE container view, software tone synthesis
//! and PCM bit-depth downscaling.
//!
//! Everything here is pure, `no_std` and allocation-free so it runs unchanged
//! on the target and in host tests.
//!
//! # Modules
//!
//! - [`bytes`]: little-endian field assembly shared by every binary layout
//! - [`wav`]: zero-copy [`WavDescriptor`] over a received file buffer
//! - [`tone`]: sine tone packed into the audio FIFO's word layout
//! - [`pcm`]: 16-bit to 8-bit downscaling for the PWM audio output

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

pub mod bytes;
pub mod pcm;
pub mod tone;
pub mod wav;

// Top-level re-exports for convenience
pub use pcm::{downscale_into, PcmEncoding};
pub use tone::{generate_tone, ToneBuffer, ToneConfig, ToneError};
pub use wav::{WavDescriptor, WavError};
