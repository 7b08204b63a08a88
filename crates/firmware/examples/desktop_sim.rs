//! Desktop simulator
//!
//! Runs the mode controller against the platform mocks with a scripted button
//! sequence: tone, stop, receive a synthesized 16-bit WAV over the mock link,
//! then replay it. Delays are real (embassy-time std driver).
//!
//! Run with: RUST_LOG=firmware=debug cargo run -p firmware --example desktop_sim --features emulator

#![allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]

use std::f64::consts::TAU;

use embassy_time::Delay;
use firmware::{ControllerConfig, InputSampler, ModeController, TransferChannel};
use platform::config::FILE_BUFFER_CAPACITY;
use platform::cache::NoCache;
use platform::mocks::{MockDma, MockGpio, MockSerial};
use tracing_subscriber::EnvFilter;

/// 50 ms of a 440 Hz sine at 8 kHz, 16-bit mono.
fn synth_wav() -> Vec<u8> {
    let rate = 8_000u32;
    let pcm: Vec<u8> = (0..rate / 20)
        .flat_map(|n| {
            let t = f64::from(n) / f64::from(rate);
            let s = ((t * 440.0 * TAU).sin() * f64::from(i16::MAX)) as i16;
            s.to_le_bytes()
        })
        .collect();

    let mut file = Vec::with_capacity(44 + pcm.len());
    file.extend_from_slice(b"RIFF");
    file.extend_from_slice(&(36 + pcm.len() as u32).to_le_bytes());
    file.extend_from_slice(b"WAVE");
    file.extend_from_slice(b"fmt ");
    file.extend_from_slice(&16u32.to_le_bytes());
    file.extend_from_slice(&1u16.to_le_bytes());
    file.extend_from_slice(&1u16.to_le_bytes());
    file.extend_from_slice(&rate.to_le_bytes());
    file.extend_from_slice(&(rate * 2).to_le_bytes());
    file.extend_from_slice(&2u16.to_le_bytes());
    file.extend_from_slice(&16u16.to_le_bytes());
    file.extend_from_slice(b"data");
    file.extend_from_slice(&(pcm.len() as u32).to_le_bytes());
    file.extend_from_slice(&pcm);
    file
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Tone for three transfers, stop with BTNU, receive with BTNL, replay with BTNR.
    let mut gpio = MockGpio::new();
    for buttons in [0x10, 0x10, 0x10, 0x02, 0x00, 0x04, 0x00, 0x08, 0x00] {
        gpio.push_frame(buttons, 0);
    }

    let wav = synth_wav();
    let serial = MockSerial::new(&wav).with_chunk(16).with_wait_polls(8);
    let dma = MockDma::new().with_busy_polls(4).with_max_transfer_len(256);

    let mut file = vec![0u8; FILE_BUFFER_CAPACITY];
    let mut controller = ModeController::new(
        TransferChannel::new(dma, NoCache),
        InputSampler::new(gpio),
        serial,
        Delay,
        Some(&mut file),
        ControllerConfig::default(),
    );
    controller.report_init(Ok(()));

    while controller.sampler().gpio().remaining() > 0 {
        controller.step();
    }

    let engine = controller.channel().engine();
    tracing::info!(
        transfers = engine.sent().len(),
        bytes = engine.sent_bytes().len(),
        resets = engine.reset_count(),
        "simulation finished in {}",
        controller.mode()
    );
}
