//! DMA Audio Demo Firmware
//!
//! Mode-driven audio firmware for a soft-core board with an AXI DMA engine
//! feeding a PWM audio output. Buttons select between a software sine tone,
//! receiving a WAV file over the UART, and playing the received file.
//!
//! # Architecture
//!
//! ```text
//! ModeController (controller)
//!     ├── InputSampler (input)      buttons/switches → edge snapshots
//!     ├── TransferChannel (transfer) blocking DMA send/receive
//!     └── playback crate            WAV view, tone synthesis, downscaling
//!         ↓
//! Platform HAL (DmaEngine, DataCache, DiscreteInput, SerialLink, DelayNs)
//! ```
//!
//! Everything is single-threaded: one control loop, blocking busy-wait
//! transfers, no interrupts. Exclusive access to the shared file buffer is
//! expressed by the controller owning the only `&mut` to it.
//!
//! # Features
//!
//! - `defmt` - Log through defmt on the target
//! - `emulator` - Desktop simulator: mocks, std time driver, tracing output
//! - `std` - Enable standard library (for the simulator and testing)
//!
//! # Examples
//!
//! ```bash
//! RUST_LOG=firmware=debug cargo run -p firmware --example desktop_sim --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

#[macro_use]
mod log;

pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod mode;
pub mod transfer;

// Re-export key types
pub use config::ControllerConfig;
pub use controller::ModeController;
pub use error::ModeError;
pub use input::{InputSampler, InputSnapshot};
pub use mode::Mode;
pub use transfer::{TransferChannel, TransferError};
