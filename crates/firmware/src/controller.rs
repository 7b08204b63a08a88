//! Mode controller: the firmware's control loop.
//!
//! Each [`step`](ModeController::step) samples the inputs once, applies at
//! most one transition, then runs the current mode's body to completion:
//!
//! ```text
//! Paused / HardwareToneGen  nothing
//! SoftwareToneGen           loop tone until any button rises, then silence + reset
//! ReceiveWavFile            header + body over the link, dump header, play
//! PlayWavFile               downscale and stream the payload, drain, reset
//! ```
//!
//! Every body other than the idle ones ends in `Paused`, whether it finished
//! or failed. Transfer failures are never retried within an activation.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use platform::config::NATIVE_BUFFER_BYTES;
use platform::{DataCache, DiscreteInput, DmaEngine, InitError, SerialLink};
use playback::bytes::tag_str;
use playback::wav::{body_len_after_header, RIFF_HEADER_LEN};
use playback::{downscale_into, PcmEncoding, WavDescriptor};

use crate::config::{ControllerConfig, STAGING_BUFFER_BYTES};
use crate::error::ModeError;
use crate::input::InputSampler;
use crate::mode::Mode;
use crate::transfer::{TransferChannel, TransferError};

/// Zero buffer sent when leaving tone mode to flush the audio FIFO.
static SILENCE: [u8; NATIVE_BUFFER_BYTES] = [0; NATIVE_BUFFER_BYTES];

/// Owns every peripheral and the shared file buffer, and runs the modes.
///
/// On the target the controller should live in a `static` (it carries a
/// staging buffer of [`STAGING_BUFFER_BYTES`]).
pub struct ModeController<'buf, D, C, G, S, T> {
    mode: Mode,
    channel: TransferChannel<D, C>,
    input: InputSampler<G>,
    serial: S,
    delay: T,
    file: Option<&'buf mut [u8]>,
    file_len: usize,
    staging: [u8; STAGING_BUFFER_BYTES],
    config: ControllerConfig,
}

impl<'buf, D, C, G, S, T> ModeController<'buf, D, C, G, S, T>
where
    D: DmaEngine,
    C: DataCache,
    G: DiscreteInput,
    S: SerialLink,
    T: DelayNs,
{
    /// Build a controller in `config.boot_mode`.
    ///
    /// `file` is the shared WAV buffer; `None` makes the receive and play
    /// modes abort with [`ModeError::NullBuffer`]. A preloaded buffer is
    /// trusted up to its full length until the first receive replaces it.
    pub fn new(
        mut channel: TransferChannel<D, C>,
        input: InputSampler<G>,
        serial: S,
        delay: T,
        file: Option<&'buf mut [u8]>,
        config: ControllerConfig,
    ) -> Self {
        channel.set_poll_budget(config.poll_budget);
        let file_len = file.as_deref().map_or(0, <[u8]>::len);
        Self {
            mode: config.boot_mode,
            channel,
            input,
            serial,
            delay,
            file,
            file_len,
            staging: [0; STAGING_BUFFER_BYTES],
            config,
        }
    }

    /// Log the bring-up outcome. A failure is followed by a pause, then the
    /// caller enters the control loop anyway with whatever did come up.
    pub fn report_init(&mut self, result: Result<(), InitError>) {
        info!("{}", platform::config::banner());
        info!("{} v{}", platform::config::APP_NAME, platform::config::APP_VERSION);
        match result {
            Ok(()) => info!("peripherals initialized"),
            Err(e) => {
                error!("bring-up failed: {}", e);
                self.pause(self.config.init_failure_pause);
            }
        }
    }

    /// Run the control loop forever.
    pub fn run(&mut self) -> ! {
        info!("entering control loop in {}", self.mode);
        loop {
            self.step();
        }
    }

    /// One control loop iteration. Returns the mode after the body ran.
    pub fn step(&mut self) -> Mode {
        let snapshot = self.input.sample();
        if let Some(next) = Mode::selected_by(snapshot.button_rising) {
            if next != self.mode {
                info!("mode {} -> {}", self.mode, next);
            }
            self.mode = next;
            if next == Mode::ReceiveWavFile {
                self.pause(self.config.receive_settle);
            }
        }
        self.run_mode();
        self.mode
    }

    /// Run the current mode's body once.
    pub fn run_mode(&mut self) {
        let mode = self.mode;
        if mode.is_idle() {
            return;
        }
        info!("entering {}", mode);
        let outcome = match mode {
            Mode::SoftwareToneGen => self.run_software_tone(),
            Mode::ReceiveWavFile => self.run_receive_wav(),
            Mode::PlayWavFile => self.run_play_wav(),
            Mode::Paused | Mode::HardwareToneGen => Ok(()),
        };
        match outcome {
            Ok(()) => info!("{} finished", mode),
            Err(e) => error!("{} aborted: {}", mode, e),
        }
        self.mode = Mode::Paused;
    }

    fn run_software_tone(&mut self) -> Result<(), ModeError> {
        let tone = self.config.tone.generate()?;
        debug!("tone: {} samples, {} bytes", tone.sample_count(), tone.len());
        self.pause(self.config.tone_start_delay);

        let result = loop {
            if let Err(e) = self.channel.send(tone.as_bytes()) {
                break Err(ModeError::from(e));
            }
            if self.input.sample().any_button_pressed() {
                break Ok(());
            }
        };

        if let Err(e) = self.channel.send(&SILENCE) {
            warn!("silence transfer failed: {}", e);
        }
        self.reset_channel();
        result
    }

    fn run_play_wav(&mut self) -> Result<(), ModeError> {
        let file = self.file.as_deref().ok_or(ModeError::NullBuffer)?;
        let received = file.get(..self.file_len).unwrap_or_default();
        if received.first().copied().unwrap_or(0) == 0 {
            return Err(ModeError::NoWavLoaded);
        }
        let wav = WavDescriptor::parse(received)?.within_declared_len()?;
        let encoding = PcmEncoding::from_bits_per_sample(wav.bits_per_sample())?;
        let payload = wav.payload()?;
        info!(
            "playing {} payload bytes, {} bit, {} Hz",
            payload.len(),
            wav.bits_per_sample(),
            wav.sample_rate()
        );

        let result = stream_downscaled(&mut self.channel, &mut self.staging, payload, encoding);
        let result = match result {
            Ok(sent) => {
                debug!("streamed {} output bytes", sent);
                self.pause(self.config.playback_drain);
                Ok(())
            }
            Err(e) => Err(ModeError::from(e)),
        };
        self.reset_channel();
        result
    }

    fn run_receive_wav(&mut self) -> Result<(), ModeError> {
        let file = self.file.as_deref_mut().ok_or(ModeError::NullBuffer)?;
        self.serial.reset_fifos();
        info!("waiting for WAV file on the serial link");
        match receive_file(&mut self.serial, file) {
            Ok(len) => {
                info!("received {} bytes", len);
                self.file_len = len;
                log_header(file.get(..len).unwrap_or_default());
            }
            Err(e) => {
                // Never leave a partial file behind for the play mode.
                if let Some(first) = file.first_mut() {
                    *first = 0;
                }
                self.file_len = 0;
                return Err(e);
            }
        }
        self.run_play_wav()
    }

    fn reset_channel(&mut self) {
        if let Err(e) = self.channel.reset() {
            error!("DMA reset failed: {}", e);
        }
    }

    fn pause(&mut self, duration: Duration) {
        let us = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
        if us > 0 {
            self.delay.delay_us(us);
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Force the current mode; the body runs on the next [`run_mode`](Self::run_mode).
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// The transfer channel.
    pub fn channel(&self) -> &TransferChannel<D, C> {
        &self.channel
    }

    /// The input sampler.
    pub fn sampler(&self) -> &InputSampler<G> {
        &self.input
    }

    /// The serial link.
    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// The delay provider.
    pub fn delay(&self) -> &T {
        &self.delay
    }

    /// The shared file buffer, if one was provided.
    pub fn file(&self) -> Option<&[u8]> {
        self.file.as_deref()
    }

    /// Length of the file the play mode will read: the last received file,
    /// the whole preloaded buffer before any receive, or 0 after a failed one.
    pub fn file_len(&self) -> usize {
        self.file_len
    }

    /// Active configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

/// Read exactly `buf.len()` bytes. Each read blocks until data arrives;
/// `Ok(0)` is end of stream.
fn recv_exact<S: SerialLink>(serial: &mut S, buf: &mut [u8]) -> Result<(), ModeError> {
    let expected = buf.len();
    let mut remaining = buf;
    while !remaining.is_empty() {
        let n = serial.read(remaining).map_err(|_| ModeError::Link)?;
        if n == 0 {
            return Err(ModeError::LinkClosed {
                received: expected.saturating_sub(remaining.len()),
                expected,
            });
        }
        let rest = core::mem::take(&mut remaining);
        remaining = rest.get_mut(n..).unwrap_or_default();
    }
    Ok(())
}

/// Receive the RIFF header, then the body it announces. Returns the file length.
fn receive_file<S: SerialLink>(serial: &mut S, file: &mut [u8]) -> Result<usize, ModeError> {
    let capacity = file.len();
    let header = file.get_mut(..RIFF_HEADER_LEN).ok_or(ModeError::FileTooLarge {
        needed: RIFF_HEADER_LEN,
        capacity,
    })?;
    recv_exact(serial, header)?;
    let body_len = body_len_after_header(header)?;

    let total = RIFF_HEADER_LEN.saturating_add(body_len);
    let body = file
        .get_mut(RIFF_HEADER_LEN..total)
        .ok_or(ModeError::FileTooLarge {
            needed: total,
            capacity,
        })?;
    debug!("header announces {} more bytes", body_len);
    recv_exact(serial, body)?;
    Ok(total)
}

/// Downscale `payload` through `staging` and send it, one chunk per transfer.
///
/// Returns the number of output bytes sent.
fn stream_downscaled<D: DmaEngine, C: DataCache>(
    channel: &mut TransferChannel<D, C>,
    staging: &mut [u8],
    payload: &[u8],
    encoding: PcmEncoding,
) -> Result<usize, TransferError> {
    let window = staging.len().min(channel.max_transfer_len()).max(1);
    let mut sent = 0usize;
    for input in payload.chunks(window.saturating_mul(encoding.bytes_per_sample())) {
        let out = staging.get_mut(..window).unwrap_or_default();
        let written = downscale_into(input, encoding, out);
        let Some(chunk) = out.get(..written) else {
            break;
        };
        if chunk.is_empty() {
            continue;
        }
        channel.send(chunk)?;
        sent = sent.saturating_add(written);
    }
    Ok(sent)
}

/// Dump every header field of a received file.
fn log_header(file: &[u8]) {
    let wav = match WavDescriptor::parse(file) {
        Ok(wav) => wav,
        Err(e) => {
            warn!("header not readable: {}", e);
            return;
        }
    };
    info!("riff tag: {}", tag_str(&wav.riff_tag()));
    info!("overall size: {}", wav.overall_size());
    info!("wave tag: {}", tag_str(&wav.wave_tag()));
    info!("fmt marker: {}", tag_str(&wav.fmt_chunk_marker()));
    info!("fmt chunk size: {}", wav.fmt_chunk_size());
    info!("format type: {}", wav.format_type());
    info!("channels: {}", wav.channel_count());
    info!("sample rate: {}", wav.sample_rate());
    info!("byte rate: {}", wav.byte_rate());
    info!("block align: {}", wav.block_align());
    info!("bits per sample: {}", wav.bits_per_sample());
    info!("data marker: {}", tag_str(&wav.data_chunk_marker()));
    info!("data chunk size: {}", wav.data_chunk_size());
    if wav.check_tags().is_err() {
        warn!("file does not carry RIFF/WAVE tags");
    }
}
