//! Blocking DMA transfer channel.
//!
//! Wraps a simple-mode [`DmaEngine`] and the [`DataCache`] so every transfer
//! is bracketed by the required cache maintenance:
//!
//! ```text
//! send:    flush → kick off MM2S → poll busy → check MM2S error
//! receive: flush → kick off S2MM → poll busy → flush → check S2MM error
//! reset:   reset → poll reset-done
//! ```
//!
//! Compiler fences keep buffer accesses from being reordered across the
//! kickoff and the completion poll.
//!
//! Polling is a plain busy-wait. A poll budget can bound it; the default is
//! unbounded, matching hardware that always completes or latches an error.

use core::sync::atomic::{compiler_fence, Ordering};

use platform::{DataCache, DmaEngine, DmaError, TransferDirection};

/// Failure of a single DMA transfer or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// The engine rejected the transfer request.
    #[error("DMA kickoff failed: {0}")]
    KickoffFailed(DmaError),
    /// The engine latched an error status for this direction after completion.
    #[error("DMA {} channel reported an error", .0.channel_name())]
    HardwareFault(TransferDirection),
    /// The poll budget ran out before the engine went idle.
    #[error("DMA did not complete within the poll budget")]
    PollBudgetExhausted,
}

impl From<DmaError> for TransferError {
    fn from(e: DmaError) -> Self {
        TransferError::KickoffFailed(e)
    }
}

/// Blocking send/receive over a DMA engine.
pub struct TransferChannel<D, C> {
    dma: D,
    cache: C,
    poll_budget: Option<u32>,
}

impl<D: DmaEngine, C: DataCache> TransferChannel<D, C> {
    /// Channel with unbounded completion polling.
    pub fn new(dma: D, cache: C) -> Self {
        Self {
            dma,
            cache,
            poll_budget: None,
        }
    }

    /// Bound every busy-wait to `budget` polls (`None` = unbounded).
    pub fn with_poll_budget(mut self, budget: Option<u32>) -> Self {
        self.poll_budget = budget;
        self
    }

    /// Change the poll budget in place.
    pub fn set_poll_budget(&mut self, budget: Option<u32>) {
        self.poll_budget = budget;
    }

    /// Transmit `buffer` to the device and wait for completion.
    ///
    /// `buffer` is only read.
    pub fn send(&mut self, buffer: &[u8]) -> Result<(), TransferError> {
        self.cache.flush_range(buffer);
        compiler_fence(Ordering::Release);
        self.dma.start_send(buffer)?;
        self.wait_idle(TransferDirection::MemoryToDevice)?;
        compiler_fence(Ordering::Acquire);
        self.check_status(TransferDirection::MemoryToDevice)
    }

    /// Fill `buffer` from the device and wait for completion.
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<(), TransferError> {
        self.cache.flush_range(buffer);
        compiler_fence(Ordering::Release);
        self.dma.start_receive(buffer)?;
        self.wait_idle(TransferDirection::DeviceToMemory)?;
        compiler_fence(Ordering::Acquire);
        self.cache.flush_range(buffer);
        self.check_status(TransferDirection::DeviceToMemory)
    }

    /// Send `buffer` as consecutive transfers no longer than the engine limit.
    ///
    /// Returns the number of transfers issued. Stops at the first failure.
    pub fn send_chunked(&mut self, buffer: &[u8]) -> Result<usize, TransferError> {
        let mut transfers = 0usize;
        for chunk in buffer.chunks(self.dma.max_transfer_len().max(1)) {
            self.send(chunk)?;
            transfers = transfers.saturating_add(1);
        }
        Ok(transfers)
    }

    /// Reset the engine and wait for the reset to finish.
    pub fn reset(&mut self) -> Result<(), TransferError> {
        self.dma.reset();
        let dma = &self.dma;
        spin_while(self.poll_budget, || !dma.is_reset_done())
    }

    /// Longest single transfer the engine accepts.
    pub fn max_transfer_len(&self) -> usize {
        self.dma.max_transfer_len()
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &D {
        &self.dma
    }

    /// The wrapped cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    fn wait_idle(&self, direction: TransferDirection) -> Result<(), TransferError> {
        let dma = &self.dma;
        spin_while(self.poll_budget, || dma.is_busy(direction))
    }

    fn check_status(&self, direction: TransferDirection) -> Result<(), TransferError> {
        if self.dma.has_error(direction) {
            Err(TransferError::HardwareFault(direction))
        } else {
            Ok(())
        }
    }
}

/// Spin while `busy()` holds, giving up after `budget` polls if one is set.
fn spin_while(budget: Option<u32>, mut busy: impl FnMut() -> bool) -> Result<(), TransferError> {
    let mut polls = 0u32;
    while busy() {
        if budget.is_some_and(|limit| polls >= limit) {
            return Err(TransferError::PollBudgetExhausted);
        }
        polls = polls.saturating_add(1);
        core::hint::spin_loop();
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use platform::mocks::{MockCache, MockDma};

    fn channel(dma: MockDma) -> TransferChannel<MockDma, MockCache> {
        TransferChannel::new(dma, MockCache::new())
    }

    #[test]
    fn test_send_flushes_and_waits() {
        let mut ch = channel(MockDma::new().with_busy_polls(3));
        ch.send(&[1, 2, 3, 4]).unwrap();
        assert_eq!(ch.engine().sent(), &[vec![1, 2, 3, 4]]);
        assert_eq!(ch.cache().flushes(), &[4]);
    }

    #[test]
    fn test_receive_flushes_twice() {
        let mut dma = MockDma::new();
        dma.queue_receive_data(&[9, 8, 7]);
        let mut ch = channel(dma);
        let mut buf = [0u8; 3];
        ch.receive(&mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7]);
        assert_eq!(ch.cache().flushes(), &[3, 3]);
    }

    #[test]
    fn test_kickoff_rejection() {
        let mut dma = MockDma::new();
        dma.reject_next_kickoff(DmaError::Halted);
        let mut ch = channel(dma);
        assert_eq!(
            ch.send(&[0; 4]),
            Err(TransferError::KickoffFailed(DmaError::Halted))
        );
    }

    #[test]
    fn test_hardware_fault_leaves_buffer_intact() {
        let mut dma = MockDma::new();
        dma.set_error(TransferDirection::MemoryToDevice);
        let mut ch = channel(dma);
        let buffer = [0xA5u8; 8];
        assert_eq!(
            ch.send(&buffer),
            Err(TransferError::HardwareFault(TransferDirection::MemoryToDevice))
        );
        assert_eq!(buffer, [0xA5; 8]);
    }

    #[test]
    fn test_poll_budget_exhausted() {
        let mut ch = channel(MockDma::new().with_busy_polls(10)).with_poll_budget(Some(4));
        assert_eq!(ch.send(&[0; 4]), Err(TransferError::PollBudgetExhausted));
    }

    #[test]
    fn test_unbounded_budget_outlasts_long_busy() {
        let mut ch = channel(MockDma::new().with_busy_polls(10_000));
        assert!(ch.send(&[0; 4]).is_ok());
    }

    #[test]
    fn test_send_chunked_respects_limit() {
        let mut ch = channel(MockDma::new().with_max_transfer_len(4));
        let data: Vec<u8> = (0..10).collect();
        assert_eq!(ch.send_chunked(&data).unwrap(), 3);
        let sizes: Vec<usize> = ch.engine().sent().iter().map(Vec::len).collect();
        assert_eq!(sizes, [4, 4, 2]);
        assert_eq!(ch.engine().sent_bytes(), data);
    }

    #[test]
    fn test_reset_waits_for_done() {
        let mut ch = channel(MockDma::new().with_reset_polls(5));
        ch.reset().unwrap();
        assert_eq!(ch.engine().reset_count(), 1);
    }

    #[test]
    fn test_reset_budget() {
        let mut ch = channel(MockDma::new().with_reset_polls(5)).with_poll_budget(Some(2));
        assert_eq!(ch.reset(), Err(TransferError::PollBudgetExhausted));
    }
}
