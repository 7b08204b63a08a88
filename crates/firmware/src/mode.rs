//! Operating modes and the button-driven transition table.
//!
//! Transitions fire on button *rising* edges only, at most one per control
//! loop iteration. When several mapped buttons rise in the same sample the
//! lowest mapped bit wins:
//!
//! | Edge          | Button | Next mode         | Extra            |
//! |---------------|--------|-------------------|------------------|
//! | bit 0 (0x01)  | BTNC   | `Paused`          |                  |
//! | bit 2 (0x04)  | BTNL   | `ReceiveWavFile`  | settle delay     |
//! | bit 3 (0x08)  | BTNR   | `PlayWavFile`     |                  |
//! | bit 4 (0x10)  | BTND   | `SoftwareToneGen` |                  |
//!
//! BTNU (0x02) and bits 5-7 are unmapped. No button selects
//! `HardwareToneGen`; it exists as a placeholder and does nothing.

use core::fmt;

use platform::Button;

/// Operating mode of the controller. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Idle; the control loop only samples inputs.
    #[default]
    Paused,
    /// Placeholder for a hardware tone path. No-op.
    HardwareToneGen,
    /// Loop a synthesized sine tone until any button is pressed.
    SoftwareToneGen,
    /// Receive a WAV file over the serial link, then play it.
    ReceiveWavFile,
    /// Play the WAV file already in the file buffer.
    PlayWavFile,
}

/// Button-to-mode table in priority order.
const TRANSITIONS: [(Button, Mode); 4] = [
    (Button::Center, Mode::Paused),
    (Button::Left, Mode::ReceiveWavFile),
    (Button::Right, Mode::PlayWavFile),
    (Button::Down, Mode::SoftwareToneGen),
];

impl Mode {
    /// Mode selected by this sample's button rising edges, if any.
    pub fn selected_by(button_rising: u8) -> Option<Mode> {
        TRANSITIONS
            .iter()
            .find(|(button, _)| button.is_set_in(button_rising))
            .map(|&(_, mode)| mode)
    }

    /// Mode after applying `button_rising`; unchanged when no mapped bit rose.
    pub fn next(self, button_rising: u8) -> Mode {
        Self::selected_by(button_rising).unwrap_or(self)
    }

    /// `true` for modes whose body does nothing.
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Paused | Self::HardwareToneGen)
    }

    /// Short name for log output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::HardwareToneGen => "hw tone",
            Self::SoftwareToneGen => "sw tone",
            Self::ReceiveWavFile => "receive wav",
            Self::PlayWavFile => "play wav",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
