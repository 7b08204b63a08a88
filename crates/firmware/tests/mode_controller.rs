//! Mode controller integration tests: transitions, mode bodies and failure
//! paths, all driven through the platform mocks.
// Integration test file: unwrap/indexing/arithmetic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]
//!
//! Run with: cargo test -p firmware --test mode_controller

use firmware::{ControllerConfig, InputSampler, Mode, ModeController, TransferChannel};
use platform::mocks::{MockCache, MockDelay, MockDma, MockGpio, MockSerial};
use platform::{DmaEngine, InitError, TransferDirection};

type Controller<'a> = ModeController<'a, MockDma, MockCache, MockGpio, MockSerial, MockDelay>;

fn controller<'a>(
    dma: MockDma,
    gpio: MockGpio,
    serial: MockSerial,
    file: Option<&'a mut [u8]>,
    config: ControllerConfig,
) -> Controller<'a> {
    ModeController::new(
        TransferChannel::new(dma, MockCache::new()),
        InputSampler::new(gpio),
        serial,
        MockDelay::new(),
        file,
        config,
    )
}

/// Canonical PCM file with a 16-byte `fmt ` chunk.
fn wav_file(bits: u16, payload: &[u8]) -> Vec<u8> {
    let mut file = Vec::new();
    file.extend_from_slice(b"RIFF");
    file.extend_from_slice(&(36 + payload.len() as u32).to_le_bytes());
    file.extend_from_slice(b"WAVE");
    file.extend_from_slice(b"fmt ");
    file.extend_from_slice(&16u32.to_le_bytes());
    file.extend_from_slice(&1u16.to_le_bytes());
    file.extend_from_slice(&1u16.to_le_bytes());
    file.extend_from_slice(&8_000u32.to_le_bytes());
    file.extend_from_slice(&(8_000 * u32::from(bits / 8)).to_le_bytes());
    file.extend_from_slice(&(bits / 8).to_le_bytes());
    file.extend_from_slice(&bits.to_le_bytes());
    file.extend_from_slice(b"data");
    file.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    file.extend_from_slice(payload);
    file
}

fn s16_payload(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

// ─── Transitions ─────────────────────────────────────────────────────────────

#[test]
fn paused_without_input_does_nothing() {
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x00]),
        MockSerial::new(&[]),
        None,
        ControllerConfig::default(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert!(ctl.channel().engine().sent().is_empty());
    assert_eq!(ctl.delay().total_ms(), 0);
}

#[test]
fn unmapped_buttons_cause_no_transition() {
    let mut buf = vec![0u8; 64];
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x02, 0x00, 0x20, 0x00, 0x40, 0x00, 0x80]),
        MockSerial::new(&[]),
        Some(&mut buf),
        ControllerConfig::default(),
    );
    for _ in 0..7 {
        assert_eq!(ctl.step(), Mode::Paused);
    }
    assert_eq!(ctl.channel().engine().kickoff_count(), 0);
    assert_eq!(ctl.serial().fifo_resets(), 0);
}

#[test]
fn lowest_mapped_button_wins() {
    // 0x0C = Left | Right: receive wins over play, so the link is reset.
    let mut buf = vec![0u8; 64];
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x0C]),
        MockSerial::new(&[]),
        Some(&mut buf),
        ControllerConfig::without_delays(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.serial().fifo_resets(), 1);
}

#[test]
fn hardware_tone_mode_is_a_no_op() {
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x00]),
        MockSerial::new(&[]),
        None,
        ControllerConfig::default(),
    );
    ctl.set_mode(Mode::HardwareToneGen);
    assert_eq!(ctl.step(), Mode::HardwareToneGen);
    assert_eq!(ctl.channel().engine().kickoff_count(), 0);
    assert_eq!(ctl.channel().engine().reset_count(), 0);
    assert!(ctl.delay().delays_ns().is_empty());
}

// ─── Software tone ───────────────────────────────────────────────────────────

#[test]
fn tone_loops_until_any_button_then_silences() {
    let mut ctl = controller(
        MockDma::new().with_busy_polls(2),
        MockGpio::with_buttons(&[0x10, 0x10, 0x10, 0x02]),
        MockSerial::new(&[]),
        None,
        ControllerConfig::default(),
    );
    assert_eq!(ctl.step(), Mode::Paused);

    let sent = ctl.channel().engine().sent();
    assert_eq!(sent.len(), 4, "three tone buffers plus silence");
    assert!(sent[..3].iter().all(|b| b.len() == 384));
    assert_eq!(sent[3], vec![0u8; 512]);
    assert_eq!(ctl.channel().engine().reset_count(), 1);
    assert_eq!(ctl.delay().delays_ns(), &[10_000_000]);

    // The stopping edge was consumed; the held button does not re-trigger.
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.channel().engine().sent().len(), 4);
}

#[test]
fn tone_stops_on_hardware_fault_without_retry() {
    let mut dma = MockDma::new();
    dma.fail_send_at(1);
    let mut ctl = controller(
        dma,
        MockGpio::with_buttons(&[0x10]),
        MockSerial::new(&[]),
        None,
        ControllerConfig::without_delays(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    // tone, faulted tone, then the silence attempt before the reset.
    assert_eq!(ctl.channel().engine().sent().len(), 3);
    assert_eq!(ctl.channel().engine().reset_count(), 1);
    assert!(!ctl.channel().engine().has_error(TransferDirection::MemoryToDevice));
}

#[test]
fn boot_mode_runs_before_first_edge() {
    let config = ControllerConfig {
        boot_mode: Mode::SoftwareToneGen,
        ..ControllerConfig::without_delays()
    };
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x00, 0x01]),
        MockSerial::new(&[]),
        None,
        config,
    );
    assert_eq!(ctl.mode(), Mode::SoftwareToneGen);
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.channel().engine().sent().len(), 2);
}

// ─── Receive + play ──────────────────────────────────────────────────────────

#[test]
fn receive_then_play_downscales_16_bit() {
    let file = wav_file(16, &s16_payload(&[i16::MIN, 0, i16::MAX, -1]));
    let mut buf = vec![0u8; 256];
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x04]),
        MockSerial::new(&file).with_chunk(5).with_wait_polls(3),
        Some(&mut buf),
        ControllerConfig::default(),
    );
    assert_eq!(ctl.step(), Mode::Paused);

    assert_eq!(ctl.serial().fifo_resets(), 1);
    assert_eq!(ctl.serial().remaining(), 0);
    assert_eq!(ctl.serial().waited_polls(), 3);
    assert_eq!(ctl.file_len(), file.len());
    assert_eq!(ctl.channel().engine().sent_bytes(), vec![0x00, 0x80, 0xFF, 0x7F]);
    assert_eq!(ctl.channel().engine().reset_count(), 1);
    // 1 s settle after the edge, 2 s drain after the stream.
    assert_eq!(ctl.delay().total_ms(), 3_000);
    assert_eq!(&ctl.file().unwrap()[..file.len()], &file[..]);
}

#[test]
fn play_replays_received_file() {
    let file = wav_file(8, &[10, 20, 30]);
    let mut buf = vec![0u8; 128];
    buf[..file.len()].copy_from_slice(&file);
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x08, 0x00, 0x08]),
        MockSerial::new(&[]),
        Some(&mut buf),
        ControllerConfig::without_delays(),
    );
    ctl.step();
    ctl.step();
    ctl.step();
    assert_eq!(ctl.channel().engine().sent_bytes(), vec![10, 20, 30, 10, 20, 30]);
    assert_eq!(ctl.serial().fifo_resets(), 0);
}

#[test]
fn play_streams_in_chunks_of_max_transfer_len() {
    let payload: Vec<u8> = (1..=10).collect();
    let file = wav_file(8, &payload);
    let mut buf = vec![0u8; 128];
    buf[..file.len()].copy_from_slice(&file);
    let mut ctl = controller(
        MockDma::new().with_max_transfer_len(4),
        MockGpio::with_buttons(&[0x08]),
        MockSerial::new(&[]),
        Some(&mut buf),
        ControllerConfig::without_delays(),
    );
    ctl.step();
    let sizes: Vec<usize> = ctl.channel().engine().sent().iter().map(Vec::len).collect();
    assert_eq!(sizes, [4, 4, 2]);
    assert_eq!(ctl.channel().engine().sent_bytes(), payload);
}

#[test]
fn play_without_received_file_is_rejected() {
    let mut buf = vec![0u8; 128];
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x08]),
        MockSerial::new(&[]),
        Some(&mut buf),
        ControllerConfig::default(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.channel().engine().kickoff_count(), 0);
    assert_eq!(ctl.channel().engine().reset_count(), 0);
    assert_eq!(ctl.delay().total_ms(), 0);
}

#[test]
fn play_rejects_unsupported_bit_depth() {
    let file = wav_file(24, &[0; 6]);
    let mut buf = vec![0u8; 128];
    buf[..file.len()].copy_from_slice(&file);
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x08]),
        MockSerial::new(&[]),
        Some(&mut buf),
        ControllerConfig::without_delays(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.channel().engine().kickoff_count(), 0);
}

#[test]
fn play_hardware_fault_resets_and_pauses() {
    let file = wav_file(8, &[1, 2, 3, 4, 5, 6]);
    let mut buf = vec![0u8; 128];
    buf[..file.len()].copy_from_slice(&file);
    let mut dma = MockDma::new().with_max_transfer_len(2);
    dma.fail_send_at(0);
    let mut ctl = controller(
        dma,
        MockGpio::with_buttons(&[0x08]),
        MockSerial::new(&[]),
        Some(&mut buf),
        ControllerConfig::default(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.channel().engine().sent().len(), 1, "no retry after the fault");
    assert_eq!(ctl.channel().engine().reset_count(), 1);
    assert_eq!(ctl.delay().total_ms(), 0, "drain delay skipped on failure");
}

#[test]
fn missing_file_buffer_aborts_receive_and_play() {
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x04, 0x00, 0x08]),
        MockSerial::new(&[1, 2, 3]),
        None,
        ControllerConfig::default(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.serial().fifo_resets(), 0);
    assert_eq!(ctl.serial().remaining(), 3);
    assert_eq!(ctl.channel().engine().kickoff_count(), 0);
    // Only the receive settle delay ran.
    assert_eq!(ctl.delay().total_ms(), 1_000);
}

#[test]
fn oversized_file_is_refused_and_marked_empty() {
    let file = wav_file(8, &[0x55; 100]);
    let mut buf = vec![0u8; 64];
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x04]),
        MockSerial::new(&file).with_chunk(16),
        Some(&mut buf),
        ControllerConfig::without_delays(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.file().unwrap()[0], 0);
    assert_eq!(ctl.serial().remaining(), file.len() - 12);
    assert_eq!(ctl.channel().engine().kickoff_count(), 0);
}

#[test]
fn link_failure_mid_body_leaves_no_file() {
    let file = wav_file(8, &[1, 2, 3, 4]);
    let mut buf = vec![0u8; 128];
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x04, 0x00, 0x08]),
        MockSerial::new(&file[..30]),
        Some(&mut buf),
        ControllerConfig::without_delays(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.file().unwrap()[0], 0);
    // Play afterwards refuses the partial file.
    ctl.step();
    ctl.step();
    assert_eq!(ctl.channel().engine().kickoff_count(), 0);
}

#[test]
fn play_never_reads_past_the_received_file() {
    // Honest overall_size, but data_chunk_size claims 40 bytes of a 4-byte payload.
    let mut file = wav_file(8, &[1, 2, 3, 4]);
    file[40..44].copy_from_slice(&40u32.to_le_bytes());
    let mut buf = vec![0x77u8; 256];
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x04]),
        MockSerial::new(&file).with_chunk(16),
        Some(&mut buf),
        ControllerConfig::without_delays(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.file_len(), 48);
    assert!(ctl.channel().engine().sent_bytes().is_empty());
    assert_eq!(ctl.channel().engine().kickoff_count(), 0);
}

#[test]
fn short_received_file_ignores_stale_buffer_contents() {
    // A complete earlier upload sits in the buffer.
    let stale = wav_file(8, &[9; 32]);
    let mut buf = vec![0u8; 256];
    buf[..stale.len()].copy_from_slice(&stale);

    // New upload announces only 16 body bytes: it ends inside the format fields.
    let mut short = stale[..28].to_vec();
    short[4..8].copy_from_slice(&20u32.to_le_bytes());

    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x04, 0x00, 0x08]),
        MockSerial::new(&short).with_chunk(8),
        Some(&mut buf),
        ControllerConfig::without_delays(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.file_len(), 28);
    assert_eq!(ctl.serial().remaining(), 0);
    // Replaying later still refuses the truncated file.
    ctl.step();
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.channel().engine().kickoff_count(), 0);
    assert_eq!(ctl.channel().engine().reset_count(), 0);
}

#[test]
fn end_of_stream_mid_body_aborts_instead_of_waiting() {
    let file = wav_file(8, &[1, 2, 3, 4]);
    let mut buf = vec![0u8; 128];
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x04]),
        MockSerial::new(&file[..40]).with_chunk(8).closing(),
        Some(&mut buf),
        ControllerConfig::without_delays(),
    );
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.file().unwrap()[0], 0);
    assert_eq!(ctl.file_len(), 0);
    assert_eq!(ctl.channel().engine().kickoff_count(), 0);
}

// ─── Bring-up ────────────────────────────────────────────────────────────────

#[test]
fn init_failure_pauses_then_continues() {
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::with_buttons(&[0x10, 0x01]),
        MockSerial::new(&[]),
        None,
        ControllerConfig::default(),
    );
    ctl.report_init(Err(InitError::DmaConfigNotFound { device_id: 0 }));
    assert_eq!(ctl.delay().total_ms(), 1_000);
    // Degraded, but the loop still runs.
    assert_eq!(ctl.step(), Mode::Paused);
    assert_eq!(ctl.channel().engine().sent().len(), 2);
}

#[test]
fn init_success_does_not_pause() {
    let mut ctl = controller(
        MockDma::new(),
        MockGpio::new(),
        MockSerial::new(&[]),
        None,
        ControllerConfig::default(),
    );
    ctl.report_init(Ok(()));
    assert!(ctl.delay().delays_ns().is_empty());
}
