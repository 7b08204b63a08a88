//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests and in the desktop simulator.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects)] // test doubles: counters cannot overflow in practice

use core::cell::Cell;
use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_io::{ErrorKind, ErrorType, Read};

use crate::*;

/// Mock AXI DMA engine.
///
/// Records every buffer sent, serves canned bytes to receives, and lets tests
/// script busy time, error bits and kickoff rejections.
pub struct MockDma {
    sent: Vec<Vec<u8>>,
    receive_data: VecDeque<u8>,
    busy_polls: u32,
    tx_busy_left: Cell<u32>,
    rx_busy_left: Cell<u32>,
    reset_polls: u32,
    reset_left: Cell<u32>,
    tx_error: bool,
    rx_error: bool,
    fault_on_send: Option<usize>,
    reject_next: Option<DmaError>,
    max_transfer_len: usize,
    reset_count: usize,
    kickoff_count: usize,
}

impl MockDma {
    /// Create an idle engine that completes every transfer on the first poll.
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            receive_data: VecDeque::new(),
            busy_polls: 0,
            tx_busy_left: Cell::new(0),
            rx_busy_left: Cell::new(0),
            reset_polls: 0,
            reset_left: Cell::new(0),
            tx_error: false,
            rx_error: false,
            fault_on_send: None,
            reject_next: None,
            max_transfer_len: crate::config::AXI_DMA_MAX_TRANSFER_LEN,
            reset_count: 0,
            kickoff_count: 0,
        }
    }

    /// Report busy for `polls` status reads after every kickoff.
    pub fn with_busy_polls(mut self, polls: u32) -> Self {
        self.busy_polls = polls;
        self
    }

    /// Report reset-in-progress for `polls` reads after every reset.
    pub fn with_reset_polls(mut self, polls: u32) -> Self {
        self.reset_polls = polls;
        self
    }

    /// Override the maximum simple-transfer length.
    pub fn with_max_transfer_len(mut self, len: usize) -> Self {
        self.max_transfer_len = len;
        self
    }

    /// Queue bytes that the next receive transfers will deliver.
    pub fn queue_receive_data(&mut self, data: &[u8]) {
        self.receive_data.extend(data.iter().copied());
    }

    /// Latch the error bit on a channel until the next reset.
    pub fn set_error(&mut self, direction: TransferDirection) {
        match direction {
            TransferDirection::MemoryToDevice => self.tx_error = true,
            TransferDirection::DeviceToMemory => self.rx_error = true,
        }
    }

    /// Latch the MM2S error bit when the `index`-th send (0-based) completes.
    pub fn fail_send_at(&mut self, index: usize) {
        self.fault_on_send = Some(index);
    }

    /// Reject the next kickoff with `error`.
    pub fn reject_next_kickoff(&mut self, error: DmaError) {
        self.reject_next = Some(error);
    }

    /// Every buffer handed to a successful send, in order.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// All sent bytes concatenated.
    pub fn sent_bytes(&self) -> Vec<u8> {
        self.sent.concat()
    }

    /// Number of resets requested.
    pub fn reset_count(&self) -> usize {
        self.reset_count
    }

    /// Number of accepted kickoffs (both directions).
    pub fn kickoff_count(&self) -> usize {
        self.kickoff_count
    }

    fn check_kickoff(&mut self, len: usize) -> Result<(), DmaError> {
        if let Some(error) = self.reject_next.take() {
            return Err(error);
        }
        if len == 0 || len > self.max_transfer_len {
            return Err(DmaError::LengthTooLarge {
                len,
                max: self.max_transfer_len,
            });
        }
        self.kickoff_count += 1;
        Ok(())
    }
}

impl Default for MockDma {
    fn default() -> Self {
        Self::new()
    }
}

impl DmaEngine for MockDma {
    fn reset(&mut self) {
        self.reset_count += 1;
        self.tx_error = false;
        self.rx_error = false;
        self.tx_busy_left.set(0);
        self.rx_busy_left.set(0);
        self.reset_left.set(self.reset_polls);
    }

    fn is_reset_done(&self) -> bool {
        let left = self.reset_left.get();
        if left == 0 {
            true
        } else {
            self.reset_left.set(left - 1);
            false
        }
    }

    fn start_send(&mut self, buffer: &[u8]) -> Result<(), DmaError> {
        if self.tx_busy_left.get() > 0 {
            return Err(DmaError::Busy);
        }
        self.check_kickoff(buffer.len())?;
        if self.fault_on_send == Some(self.sent.len()) {
            self.tx_error = true;
        }
        self.sent.push(buffer.to_vec());
        self.tx_busy_left.set(self.busy_polls);
        Ok(())
    }

    fn start_receive(&mut self, buffer: &mut [u8]) -> Result<(), DmaError> {
        if self.rx_busy_left.get() > 0 {
            return Err(DmaError::Busy);
        }
        self.check_kickoff(buffer.len())?;
        for slot in buffer.iter_mut() {
            *slot = self.receive_data.pop_front().unwrap_or(0);
        }
        self.rx_busy_left.set(self.busy_polls);
        Ok(())
    }

    fn is_busy(&self, direction: TransferDirection) -> bool {
        let counter = match direction {
            TransferDirection::MemoryToDevice => &self.tx_busy_left,
            TransferDirection::DeviceToMemory => &self.rx_busy_left,
        };
        let left = counter.get();
        if left == 0 {
            false
        } else {
            counter.set(left - 1);
            true
        }
    }

    fn has_error(&self, direction: TransferDirection) -> bool {
        match direction {
            TransferDirection::MemoryToDevice => self.tx_error,
            TransferDirection::DeviceToMemory => self.rx_error,
        }
    }

    fn max_transfer_len(&self) -> usize {
        self.max_transfer_len
    }
}

/// Mock data cache that logs every flushed region length.
#[derive(Debug, Default)]
pub struct MockCache {
    flushes: Vec<usize>,
}

impl MockCache {
    /// Create an empty flush log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lengths of every flushed region, in call order.
    pub fn flushes(&self) -> &[usize] {
        &self.flushes
    }
}

impl DataCache for MockCache {
    fn flush_range(&mut self, region: &[u8]) {
        self.flushes.push(region.len());
    }
}

/// Mock input GPIO block with a scripted sequence of samples.
///
/// Each read of [`GpioChannel::Buttons`] advances to the next scripted
/// `(buttons, switches)` frame; once the script is exhausted the last frame
/// is held.
#[derive(Debug, Default)]
pub struct MockGpio {
    frames: VecDeque<(u8, u16)>,
    current: (u8, u16),
    reads: usize,
}

impl MockGpio {
    /// Create an input block that reads all zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input block that replays `frames` of button levels.
    pub fn with_buttons(frames: &[u8]) -> Self {
        let mut gpio = Self::new();
        for &buttons in frames {
            gpio.push_frame(buttons, 0);
        }
        gpio
    }

    /// Append one `(buttons, switches)` frame to the script.
    pub fn push_frame(&mut self, buttons: u8, switches: u16) {
        self.frames.push_back((buttons, switches));
    }

    /// Number of button-channel reads so far.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Frames not yet consumed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl DiscreteInput for MockGpio {
    fn read(&mut self, channel: GpioChannel) -> u32 {
        match channel {
            GpioChannel::Buttons => {
                self.reads += 1;
                if let Some(frame) = self.frames.pop_front() {
                    self.current = frame;
                }
                u32::from(self.current.0)
            }
            GpioChannel::Switches => u32::from(self.current.1),
        }
    }
}

/// Mock UART link fed from a byte queue.
///
/// Delivers at most `chunk` bytes per read. A read first spins through any
/// scripted wait polls, the way a blocking UART driver polls an empty FIFO.
/// Reading past the end of the queue fails with [`ErrorKind::BrokenPipe`] so
/// tests never spin forever, or returns `Ok(0)` (end of stream) for a link
/// built with [`closing`](Self::closing).
#[derive(Debug)]
pub struct MockSerial {
    data: VecDeque<u8>,
    chunk: usize,
    fifo_resets: usize,
    wait_polls: usize,
    waited: usize,
    eof_at_end: bool,
}

impl MockSerial {
    /// Create a link that will deliver `data`, one byte per read.
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.iter().copied().collect(),
            chunk: 1,
            fifo_resets: 0,
            wait_polls: 0,
            waited: 0,
            eof_at_end: false,
        }
    }

    /// Make the first read wait through `polls` empty FIFO polls before
    /// delivering anything.
    pub fn with_wait_polls(mut self, polls: usize) -> Self {
        self.wait_polls = polls;
        self
    }

    /// Deliver up to `chunk` bytes per read.
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }

    /// Report end of stream (`Ok(0)`) instead of an error once drained.
    pub fn closing(mut self) -> Self {
        self.eof_at_end = true;
        self
    }

    /// Append more bytes to the link.
    pub fn push(&mut self, data: &[u8]) {
        self.data.extend(data.iter().copied());
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Empty FIFO polls spent inside `read` so far.
    pub fn waited_polls(&self) -> usize {
        self.waited
    }

    /// Number of FIFO resets requested.
    pub fn fifo_resets(&self) -> usize {
        self.fifo_resets
    }
}

impl ErrorType for MockSerial {
    type Error = ErrorKind;
}

impl Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.waited += core::mem::take(&mut self.wait_polls);
        if self.data.is_empty() {
            return if self.eof_at_end {
                Ok(0)
            } else {
                Err(ErrorKind::BrokenPipe)
            };
        }
        let count = buf.len().min(self.chunk).min(self.data.len());
        for slot in buf.iter_mut().take(count) {
            *slot = self.data.pop_front().unwrap_or(0);
        }
        Ok(count)
    }
}

impl SerialLink for MockSerial {
    fn reset_fifos(&mut self) {
        self.fifo_resets += 1;
    }
}

/// Mock blocking delay that records requested durations instead of sleeping.
#[derive(Debug, Default)]
pub struct MockDelay {
    delays_ns: Vec<u64>,
}

impl MockDelay {
    /// Create an empty delay log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested delay in nanoseconds, in call order.
    pub fn delays_ns(&self) -> &[u64] {
        &self.delays_ns
    }

    /// Sum of all requested delays in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.delays_ns.iter().sum::<u64>() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ns.push(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.delays_ns.push(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ns.push(u64::from(ms) * 1_000_000);
    }
}
