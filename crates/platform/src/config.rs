//! Application configuration and constants
//!
//! This module defines central configuration values used across the
//! application. Sizes and limits below match the reference hardware design
//! (Nexys A7-100T, AXI DMA in simple mode, 128 MB DDR2).

/// The application name
pub const APP_NAME: &str = "DMA Audio Demo";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Startup banner printed before bring-up.
pub const fn banner() -> &'static str {
    "DMA Audio Demo - entering main"
}

// ── DMA ──────────────────────────────────────────────────────────────────────

/// Width of one transfer word consumed by the audio stream FIFO, in bytes.
pub const TRANSFER_WORD_BYTES: usize = 4;

/// Native DMA buffer size in 32-bit words.
///
/// The tone generator's buffer and the silence buffer sent when leaving tone
/// mode are both this size.
pub const NATIVE_BUFFER_WORDS: usize = 128;

/// Native DMA buffer size in bytes (128 words × 4 bytes = 512 bytes).
#[allow(clippy::arithmetic_side_effects)] // Safety: compile-time constant
pub const NATIVE_BUFFER_BYTES: usize = NATIVE_BUFFER_WORDS * TRANSFER_WORD_BYTES;

/// Maximum length of one AXI DMA simple transfer.
///
/// The buffer length register is 23 bits wide in the reference design.
pub const AXI_DMA_MAX_TRANSFER_LEN: usize = 0x7F_FFFF;

// ── Memory ───────────────────────────────────────────────────────────────────

/// Capacity of the shared WAV file buffer in DDR (just under 8 MiB).
pub const FILE_BUFFER_CAPACITY: usize = 0x7F_FFFF;

