//! Controller timing and behaviour configuration.

use embassy_time::Duration;
use playback::ToneConfig;

use crate::mode::Mode;

/// Size of the staging buffer used to stream downscaled WAV payloads.
///
/// Eight native DMA buffers; each streamed transfer is at most this long.
#[allow(clippy::arithmetic_side_effects)] // Safety: 512 * 8, evaluated at compile time
pub const STAGING_BUFFER_BYTES: usize = platform::config::NATIVE_BUFFER_BYTES * 8;

/// Knobs for [`ModeController`](crate::ModeController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// Mode entered before the first input sample.
    pub boot_mode: Mode,
    /// Wait after selecting `ReceiveWavFile`, before the link is reset.
    pub receive_settle: Duration,
    /// Wait between generating the tone and the first transfer.
    pub tone_start_delay: Duration,
    /// Wait after the last playback transfer, before resetting the engine.
    pub playback_drain: Duration,
    /// Wait after a failed bring-up before entering the control loop.
    pub init_failure_pause: Duration,
    /// Poll budget for every DMA busy-wait (`None` = unbounded).
    pub poll_budget: Option<u32>,
    /// Software tone parameters.
    pub tone: ToneConfig,
}

impl ControllerConfig {
    /// Timings of the reference board.
    pub const fn reference() -> Self {
        Self {
            boot_mode: Mode::Paused,
            receive_settle: Duration::from_secs(1),
            tone_start_delay: Duration::from_millis(10),
            playback_drain: Duration::from_secs(2),
            init_failure_pause: Duration::from_secs(1),
            poll_budget: None,
            tone: ToneConfig::reference(),
        }
    }

    /// Same timings with every delay set to zero (host tests, simulator).
    pub const fn without_delays() -> Self {
        Self {
            receive_settle: Duration::from_ticks(0),
            tone_start_delay: Duration::from_ticks(0),
            playback_drain: Duration::from_ticks(0),
            init_failure_pause: Duration::from_ticks(0),
            ..Self::reference()
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::reference()
    }
}
