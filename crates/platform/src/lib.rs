//! Hardware Abstraction Layer (HAL) for the DMA audio demo board
//!
//! This crate provides trait-based abstractions for every peripheral the
//! firmware touches, enabling development and testing without the physical
//! Nexys A7 board.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate, mode controller)
//!         ↓
//! Feature Layer (playback crate, WAV view and tone synthesis)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (AXI DMA, AXI GPIO, AXI UART Lite, MicroBlaze D-cache)
//! ```
//!
//! # Capabilities
//!
//! - [`DmaEngine`] - Simple-mode (non scatter-gather) AXI DMA with two channels
//! - [`DataCache`] - Cache maintenance around DMA transfers
//! - [`DiscreteInput`] - Buttons and switches on the input GPIO block
//! - [`SerialLink`] - Byte-serial link used for WAV ingestion
//! - Blocking delays come from [`embedded_hal::delay::DelayNs`]
//!
//! # Features
//!
//! - `std`: Enable standard library support and the [`mocks`] module
//! - `defmt`: Enable `defmt::Format` derives on all platform types
//!
//! # Example
//!
//! ```no_run
//! use platform::{DmaEngine, TransferDirection};
//!
//! fn wait_idle<D: DmaEngine>(dma: &D) {
//!     while dma.is_busy(TransferDirection::MemoryToDevice) {
//!         core::hint::spin_loop();
//!     }
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod boot;
pub mod cache;
pub mod config;
pub mod dma;
pub mod gpio;
pub mod peripheral;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export the capability traits
pub use cache::DataCache;
pub use dma::{DmaEngine, DmaError, TransferDirection};
pub use gpio::{Button, DiscreteInput, GpioChannel};
pub use peripheral::SerialLink;

// Re-export bring-up error types
pub use boot::InitError;
