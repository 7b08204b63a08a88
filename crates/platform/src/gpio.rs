//! Discrete input abstraction
//!
//! The input GPIO block exposes two channels:
//!
//! | Channel | Width  | Signals                         |
//! |---------|--------|---------------------------------|
//! | 1       | 8 bit  | Push buttons (active high)      |
//! | 2       | 16 bit | Slide switches                  |

/// Input GPIO channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioChannel {
    /// Channel 1: push buttons.
    Buttons,
    /// Channel 2: slide switches.
    Switches,
}

impl GpioChannel {
    /// 1-based channel number used by the AXI GPIO register map.
    pub const fn number(self) -> u8 {
        match self {
            Self::Buttons => 1,
            Self::Switches => 2,
        }
    }

    /// Mask of the bits that exist on this channel.
    pub const fn width_mask(self) -> u32 {
        match self {
            Self::Buttons => 0xFF,
            Self::Switches => 0xFFFF,
        }
    }
}

/// Raw read of a discrete input channel.
///
/// No error path: an unresponsive block reads as all zero.
pub trait DiscreteInput {
    /// Read the current level of every bit on `channel`.
    fn read(&mut self, channel: GpioChannel) -> u32;
}

/// Push buttons on the board, by bit position on channel 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Button {
    /// BTNC: bit 0.
    Center = 0x01,
    /// BTNU: bit 1.
    Up = 0x02,
    /// BTNL: bit 2.
    Left = 0x04,
    /// BTNR: bit 3.
    Right = 0x08,
    /// BTND: bit 4.
    Down = 0x10,
}

impl Button {
    /// Bit mask of this button on the buttons channel.
    pub const fn mask(self) -> u8 {
        self as u8
    }

    /// `true` if this button's bit is set in `bits`.
    pub const fn is_set_in(self, bits: u8) -> bool {
        bits & self.mask() != 0
    }
}
