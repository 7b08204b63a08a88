//! Button and switch sampling with edge detection.
//!
//! The input GPIO block is polled once per control loop iteration. Each
//! sample is compared against the previous one to derive edges:
//!
//! ```text
//! rising  =  current & !previous
//! falling = !current &  previous
//! ```
//!
//! The previous sample starts all-zero, so a button already held at boot
//! reports a rising edge on the first poll.

use platform::{Button, DiscreteInput, GpioChannel};

/// One poll of the input block plus the edges relative to the previous poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    /// Button levels (channel 1).
    pub buttons: u8,
    /// Switch levels (channel 2).
    pub switches: u16,
    /// Buttons that went 0 → 1.
    pub button_rising: u8,
    /// Buttons that went 1 → 0.
    pub button_falling: u8,
    /// Switches that went 0 → 1.
    pub switch_rising: u16,
    /// Switches that went 1 → 0.
    pub switch_falling: u16,
}

impl InputSnapshot {
    /// Snapshot following `previous` for the given raw levels.
    pub const fn next(previous: &InputSnapshot, buttons: u8, switches: u16) -> Self {
        Self {
            buttons,
            switches,
            button_rising: buttons & !previous.buttons,
            button_falling: !buttons & previous.buttons,
            switch_rising: switches & !previous.switches,
            switch_falling: !switches & previous.switches,
        }
    }

    /// `true` if `button` went down in this sample.
    pub const fn pressed(&self, button: Button) -> bool {
        button.is_set_in(self.button_rising)
    }

    /// `true` if any button went down in this sample.
    pub const fn any_button_pressed(&self) -> bool {
        self.button_rising != 0
    }
}

/// Polls a [`DiscreteInput`] and keeps the previous snapshot for edge detection.
pub struct InputSampler<G> {
    gpio: G,
    previous: InputSnapshot,
}

impl<G: DiscreteInput> InputSampler<G> {
    /// Wrap an input block. The first sample compares against all-zero.
    pub fn new(gpio: G) -> Self {
        Self {
            gpio,
            previous: InputSnapshot::default(),
        }
    }

    /// Read both channels, compute edges and retain the result.
    pub fn sample(&mut self) -> InputSnapshot {
        let buttons = read_masked::<u8>(&mut self.gpio, GpioChannel::Buttons);
        let switches = read_masked::<u16>(&mut self.gpio, GpioChannel::Switches);
        let snapshot = InputSnapshot::next(&self.previous, buttons, switches);
        self.previous = snapshot;
        snapshot
    }

    /// The snapshot from the most recent [`sample`](Self::sample).
    pub fn previous(&self) -> &InputSnapshot {
        &self.previous
    }

    /// The wrapped input block.
    pub fn gpio(&self) -> &G {
        &self.gpio
    }
}

/// Read `channel` and narrow it to the channel's width.
fn read_masked<T: TryFrom<u32> + Default>(gpio: &mut impl DiscreteInput, channel: GpioChannel) -> T {
    T::try_from(gpio.read(channel) & channel.width_mask()).unwrap_or_default()
}
