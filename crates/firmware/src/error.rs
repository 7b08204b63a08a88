//! Mode-level errors.
//!
//! Every variant is non-fatal: the controller logs it, runs the mode's
//! cleanup and falls back to `Paused`.

use playback::{ToneError, WavError};

use crate::transfer::TransferError;

/// Why a mode activation ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeError {
    /// No file buffer was provided at startup.
    #[error("file buffer is not available")]
    NullBuffer,
    /// The file buffer does not hold a received WAV file.
    #[error("must receive a WAV file before playing")]
    NoWavLoaded,
    /// A DMA transfer failed.
    #[error("transfer failed: {0}")]
    Transfer(TransferError),
    /// The serial link reported a read error.
    #[error("serial link read failed")]
    Link,
    /// The serial link reached end of stream before the file was complete.
    #[error("serial link closed after {received} of {expected} bytes")]
    LinkClosed {
        /// Bytes of the current read that did arrive.
        received: usize,
        /// Bytes the read asked for.
        expected: usize,
    },
    /// The received bytes are not a playable WAV container.
    #[error("invalid WAV file: {0}")]
    Wav(WavError),
    /// The tone parameters were rejected.
    #[error("tone generation failed: {0}")]
    Tone(ToneError),
    /// The announced file does not fit the file buffer.
    #[error("WAV file of {needed} bytes exceeds the {capacity}-byte buffer")]
    FileTooLarge {
        /// Header plus announced body length.
        needed: usize,
        /// File buffer length.
        capacity: usize,
    },
}

impl From<TransferError> for ModeError {
    fn from(e: TransferError) -> Self {
        ModeError::Transfer(e)
    }
}

impl From<WavError> for ModeError {
    fn from(e: WavError) -> Self {
        ModeError::Wav(e)
    }
}

impl From<ToneError> for ModeError {
    fn from(e: ToneError) -> Self {
        ModeError::Tone(e)
    }
}
