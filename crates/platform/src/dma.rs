//! DMA abstraction layer
//!
//! Models an AXI DMA engine in simple (direct register) mode: one transfer in
//! flight per direction, completion signalled through the channel status
//! register, no interrupts.
//!
//! | Direction          | AXI DMA channel | Status register   |
//! |--------------------|-----------------|-------------------|
//! | `MemoryToDevice`   | MM2S (TX)       | `TX_OFFSET + SR`  |
//! | `DeviceToMemory`   | S2MM (RX)       | `RX_OFFSET + SR`  |
//!
//! The engine only *starts* transfers. Waiting for completion, cache
//! maintenance and error inspection are orchestrated one layer up
//! (`firmware::transfer::TransferChannel`), which keeps this trait small
//! enough to fake in tests.

/// Direction of a DMA transfer; selects the channel and its status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferDirection {
    /// Peripheral stream into memory (S2MM channel).
    DeviceToMemory,
    /// Memory into the peripheral stream (MM2S channel).
    MemoryToDevice,
}

impl TransferDirection {
    /// Short channel name as printed in AXI DMA documentation.
    pub const fn channel_name(self) -> &'static str {
        match self {
            Self::DeviceToMemory => "S2MM",
            Self::MemoryToDevice => "MM2S",
        }
    }
}

/// Reasons the engine refuses to start a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// A transfer is already in flight on the requested channel.
    #[error("channel busy")]
    Busy,
    /// Length is zero or exceeds the engine's buffer length register width.
    #[error("transfer length {len} outside 1..={max}")]
    LengthTooLarge {
        /// Requested length in bytes.
        len: usize,
        /// Maximum simple-transfer length in bytes.
        max: usize,
    },
    /// The channel is halted (not reset or not configured).
    #[error("channel halted")]
    Halted,
}

/// AXI DMA engine in simple mode.
///
/// Implementations talk to the hardware registers directly; they never block.
/// The buffer passed to `start_*` must stay borrowed until the caller has
/// observed `!is_busy(direction)`. The firmware `TransferChannel` does this by
/// holding the borrow for the whole blocking call.
pub trait DmaEngine {
    /// Request a soft reset of both channels.
    fn reset(&mut self);

    /// `true` once the reset requested by [`reset`](Self::reset) completed.
    fn is_reset_done(&self) -> bool;

    /// Kick off a memory→device transfer of the whole of `buffer`.
    fn start_send(&mut self, buffer: &[u8]) -> Result<(), DmaError>;

    /// Kick off a device→memory transfer filling the whole of `buffer`.
    fn start_receive(&mut self, buffer: &mut [u8]) -> Result<(), DmaError>;

    /// `true` while the channel for `direction` still has a transfer in flight.
    fn is_busy(&self, direction: TransferDirection) -> bool;

    /// `true` if the channel status register reports an error
    /// (`DMAIntErr | DMASlvErr | DMADecErr`).
    fn has_error(&self, direction: TransferDirection) -> bool;

    /// Largest length accepted by a single simple transfer, in bytes.
    fn max_transfer_len(&self) -> usize {
        crate::config::AXI_DMA_MAX_TRANSFER_LEN
    }
}
