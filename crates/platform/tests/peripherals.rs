//! Contract tests for the platform capability types and configuration constants.

#![allow(clippy::assertions_on_constants)]

use platform::config::{
    AXI_DMA_MAX_TRANSFER_LEN, FILE_BUFFER_CAPACITY, NATIVE_BUFFER_BYTES, NATIVE_BUFFER_WORDS,
};
use platform::cache::NoCache;
use platform::{Button, DataCache, GpioChannel, TransferDirection};

// ── Buttons ──────────────────────────────────────────────────────────────────

#[test]
fn button_masks_match_board_bit_positions() {
    assert_eq!(Button::Center.mask(), 0x01);
    assert_eq!(Button::Up.mask(), 0x02);
    assert_eq!(Button::Left.mask(), 0x04);
    assert_eq!(Button::Right.mask(), 0x08);
    assert_eq!(Button::Down.mask(), 0x10);
}

#[test]
fn button_is_set_in_checks_only_its_bit() {
    assert!(Button::Left.is_set_in(0x0C));
    assert!(Button::Right.is_set_in(0x0C));
    assert!(!Button::Center.is_set_in(0x0C));
}

#[test]
fn gpio_channel_widths() {
    assert_eq!(GpioChannel::Buttons.width_mask(), 0xFF);
    assert_eq!(GpioChannel::Switches.width_mask(), 0xFFFF);
    assert_eq!(GpioChannel::Buttons.number(), 1);
    assert_eq!(GpioChannel::Switches.number(), 2);
}

// ── Config ───────────────────────────────────────────────────────────────────

#[test]
fn native_buffer_is_128_words() {
    assert_eq!(NATIVE_BUFFER_WORDS, 128);
    assert_eq!(NATIVE_BUFFER_BYTES, 512);
}

#[test]
fn file_buffer_fits_one_simple_transfer() {
    assert!(FILE_BUFFER_CAPACITY <= AXI_DMA_MAX_TRANSFER_LEN);
}

#[test]
fn direction_channel_names() {
    assert_eq!(TransferDirection::MemoryToDevice.channel_name(), "MM2S");
    assert_eq!(TransferDirection::DeviceToMemory.channel_name(), "S2MM");
}

#[test]
fn no_cache_accepts_any_region() {
    let mut cache = NoCache;
    cache.flush_range(&[]);
    cache.flush_range(&[0; 64]);
}
