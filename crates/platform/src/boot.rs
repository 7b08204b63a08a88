//! Bring-up error reporting.
//!
//! Peripheral bring-up (config lookup, driver init, GPIO direction setup,
//! interrupt masking) happens in board-specific startup code before the
//! controller is built. That code reports its outcome with [`InitError`] so
//! the controller can log it and decide how to continue.

/// Peripheral bring-up failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// No hardware configuration for the DMA device id.
    #[error("no hardware configuration found for AXI DMA with device id {device_id}")]
    DmaConfigNotFound {
        /// Device id that was looked up.
        device_id: u16,
    },
    /// DMA driver initialisation returned a failure status.
    #[error("initialization of AXI DMA failed with status {status}")]
    DmaInitFailed {
        /// Raw driver status code.
        status: i32,
    },
    /// The DMA core was synthesised in scatter-gather mode; only simple mode is supported.
    #[error("DMA device configured in scatter-gather mode")]
    ScatterGatherMode,
    /// An AXI GPIO block could not be initialised.
    #[error("GPIO device {device_id} failed to initialise")]
    GpioInitFailed {
        /// Device id of the GPIO block.
        device_id: u16,
    },
    /// The UART Lite could not be initialised.
    #[error("UART device failed to initialise")]
    UartInitFailed,
}
