//! Peripheral abstraction layer
//!
//! Byte-serial link (AXI UART Lite) used to stream WAV files into RAM.
//! Wraps the `embedded-io` blocking `Read` trait with the one extra operation
//! the UART Lite core needs: clearing its receive FIFO.

use embedded_io::Read;

/// Blocking byte-serial link.
///
/// `read` follows the `embedded-io` contract: it blocks until at least one
/// byte is available and returns `Ok(0)` only at end of stream (or for an
/// empty buffer). A UART Lite driver therefore polls its status register
/// inside `read` rather than reporting an empty FIFO as `Ok(0)`; waiting for
/// the sender stalls there, without a timeout.
pub trait SerialLink: Read {
    /// Drop any bytes already sitting in the receive and transmit FIFOs.
    fn reset_fifos(&mut self);
}
