//! Board Pinout Tables
//!
//! Every supported controller board maps the firmware's logical signals
//! ("socket 1 step", "input 3") to a pin number, and each pin number to a
//! physical port and bit of the motion MCU. Both tables are immutable and
//! selected at build time through [`crate::config::BOARD`].
//!
//! ```text
//! LogicalPin ──(assignments)──► PinNumber ──(pins)──► PhysicalPin { port, bit, capability }
//! ```
//!
//! A logical signal may be unassigned (negative pin number), and an
//! assigned number may have no physical pin on a board revision. The
//! latter is a null pin: accepted, but it drives nothing.

mod due;
mod g2v9;
mod sbv300;

use crate::error::{Error, Result};

pub use due::{DUE_PINS, GSHIELD, GSHIELD_ASSIGNMENTS};
pub use g2v9::{FIN_ASSIGNMENTS, G2V9D, G2V9D_PINS, G2V9I, G2V9I_PINS};
pub use sbv300::{SBV300, SBV300_ASSIGNMENTS, SBV300_PINS};

/// Pin number as used in the assignment tables; negative means unassigned
pub type PinNumber = i16;

/// Marker for a logical signal with no pin
pub const UNASSIGNED: PinNumber = -1;

/// Highest motor socket number
pub const MAX_SOCKETS: u8 = 6;

/// Highest digital input number
pub const MAX_INPUTS: u8 = 12;

/// Per-socket motor signals
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum MotorSignal {
    /// Driver SPI slave select
    SpiSlaveSelect,
    /// Driver interrupt line
    Interrupt,
    /// Step pulse
    Step,
    /// Direction
    Dir,
    /// Driver enable
    Enable,
    /// Microstep select bit 0
    Microstep0,
    /// Microstep select bit 1
    Microstep1,
    /// Microstep select bit 2
    Microstep2,
    /// Current reference (PWM)
    Vref,
}

/// A signal the firmware uses, independent of the board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum LogicalPin {
    /// Serial receive
    SerialRx,
    /// Serial transmit
    SerialTx,
    /// I2C data
    I2cSda,
    /// I2C clock
    I2cScl,
    /// SPI clock
    SpiSck,
    /// SPI data in
    SpiMiso,
    /// SPI data out
    SpiMosi,
    /// Kinen bus sync line
    KinenSync,
    /// Debug output 1..=4
    Debug(u8),
    /// A motor socket signal
    Motor {
        /// Socket number, 1..=6
        socket: u8,
        /// Which signal of the socket
        signal: MotorSignal,
    },
    /// Digital input 1..=12
    Input(u8),
    /// Spindle on/off
    SpindleEnable,
    /// Spindle direction
    SpindleDir,
    /// Spindle speed PWM
    SpindlePwm,
    /// Secondary spindle PWM
    SpindlePwm2,
    /// Coolant on/off
    CoolantEnable,
    /// SD card presence
    SdCardDetect,
    /// Safety interlock input
    InterlockIn,
    /// USB receive LED
    LedUsbRx,
    /// USB transmit LED
    LedUsbTx,
    /// Grbl-compatible reset button
    GrblReset,
    /// Grbl-compatible feedhold button
    GrblFeedHold,
    /// Grbl-compatible cycle start button
    GrblCycleStart,
    /// Grbl-compatible common driver enable
    GrblCommonEnable,
}

impl LogicalPin {
    /// Signal of a motor socket
    #[must_use]
    pub const fn motor(socket: u8, signal: MotorSignal) -> Self {
        Self::Motor { socket, signal }
    }

    /// Step signal of a socket
    #[must_use]
    pub const fn step(socket: u8) -> Self {
        Self::motor(socket, MotorSignal::Step)
    }

    /// Direction signal of a socket
    #[must_use]
    pub const fn dir(socket: u8) -> Self {
        Self::motor(socket, MotorSignal::Dir)
    }
}

/// I/O port of the motion MCU
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Port {
    /// PIOA
    A,
    /// PIOB
    B,
    /// PIOC
    C,
    /// PIOD
    D,
}

/// Timer block feeding a PWM-capable pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum TimerKind {
    /// Timer/counter channel (TC)
    Tc,
    /// Dedicated PWM controller channel
    Pwm,
}

/// Timer output line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum TimerChannel {
    /// TIOA / PWMH
    A,
    /// TIOB / PWML
    B,
}

/// Peripheral multiplexer selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Peripheral {
    /// Peripheral A
    A,
    /// Peripheral B
    B,
}

/// PWM routing of a pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct PwmOutput {
    /// Timer block type
    pub timer: TimerKind,
    /// Timer number
    pub index: u8,
    /// Output line
    pub channel: TimerChannel,
    /// Multiplexer selection
    pub peripheral: Peripheral,
    /// Output is the complementary (inverted) line
    pub inverted: bool,
}

/// Special function a physical pin can take over
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum PinCapability {
    /// Plain GPIO
    Gpio,
    /// PWM output
    Pwm(PwmOutput),
    /// Hardware SPI chip select with its CS index
    SpiChipSelect(u8),
    /// SPI clock or data line
    SpiData,
}

/// One pin of the motion MCU
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct PhysicalPin {
    /// Board pin number
    pub number: PinNumber,
    /// Port
    pub port: Port,
    /// Bit within the port, 0..=31
    pub bit: u8,
    /// Special function
    pub capability: PinCapability,
}

impl PhysicalPin {
    /// Plain GPIO pin
    #[must_use]
    pub const fn gpio(number: PinNumber, port: Port, bit: u8) -> Self {
        Self { number, port, bit, capability: PinCapability::Gpio }
    }

    /// Same pin routed to a PWM output
    #[must_use]
    pub const fn pwm(
        self,
        timer: TimerKind,
        index: u8,
        channel: TimerChannel,
        peripheral: Peripheral,
        inverted: bool,
    ) -> Self {
        Self {
            capability: PinCapability::Pwm(PwmOutput { timer, index, channel, peripheral, inverted }),
            ..self
        }
    }

    /// Same pin as a hardware SPI chip select
    #[must_use]
    pub const fn spi_cs(self, cs: u8) -> Self {
        Self { capability: PinCapability::SpiChipSelect(cs), ..self }
    }

    /// Same pin as an SPI clock or data line
    #[must_use]
    pub const fn spi_data(self) -> Self {
        Self { capability: PinCapability::SpiData, ..self }
    }

    /// Bit mask within the port register
    #[must_use]
    pub const fn mask(&self) -> u32 {
        1 << self.bit
    }

    /// PWM routing, if any
    #[must_use]
    pub const fn pwm_output(&self) -> Option<PwmOutput> {
        match self.capability {
            PinCapability::Pwm(output) => Some(output),
            _ => None,
        }
    }
}

/// A logical signal and the pin number it is wired to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct Assignment {
    /// Signal
    pub logical: LogicalPin,
    /// Pin number, or [`UNASSIGNED`]
    pub number: PinNumber,
}

/// Table entry constructor
#[must_use]
pub const fn assign(logical: LogicalPin, number: PinNumber) -> Assignment {
    Assignment { logical, number }
}

/// The complete pinout of one board
#[derive(Debug)]
pub struct BoardPinout {
    /// Board name for logs
    pub name: &'static str,
    /// Populated motor sockets, numbered from 1
    pub motor_count: u8,
    /// Logical signal to pin number; signals not listed are unassigned
    pub assignments: &'static [Assignment],
    /// Pin number to port/bit
    pub pins: &'static [PhysicalPin],
}

impl BoardPinout {
    /// Pin number of a signal, [`UNASSIGNED`] if it has none
    #[must_use]
    pub fn pin_number(&self, logical: LogicalPin) -> PinNumber {
        self.assignments
            .iter()
            .find(|a| a.logical == logical)
            .map_or(UNASSIGNED, |a| a.number)
    }

    /// Physical pin behind a pin number
    #[must_use]
    pub fn physical(&self, number: PinNumber) -> Option<&'static PhysicalPin> {
        if number < 0 {
            return None;
        }
        let pins: &'static [PhysicalPin] = self.pins;
        pins.iter().find(|p| p.number == number)
    }

    /// Physical pin a signal drives, `None` for unassigned or null pins
    #[must_use]
    pub fn resolve(&self, logical: LogicalPin) -> Option<&'static PhysicalPin> {
        self.physical(self.pin_number(logical))
    }

    /// Signals with a pin number
    pub fn assigned(&self) -> impl Iterator<Item = Assignment> + '_ {
        self.assignments.iter().copied().filter(|a| a.number >= 0)
    }

    /// Assigned signals whose number has no physical pin (null pins)
    pub fn unresolved(&self) -> impl Iterator<Item = Assignment> + '_ {
        self.assigned().filter(|a| self.physical(a.number).is_none())
    }

    /// Physical pins that are hardware SPI chip selects
    pub fn spi_chip_selects(&self) -> impl Iterator<Item = &'static PhysicalPin> + '_ {
        let pins: &'static [PhysicalPin] = self.pins;
        pins.iter().filter(|p| matches!(p.capability, PinCapability::SpiChipSelect(_)))
    }

    /// Signals the motion core cannot run without
    pub fn required(&self) -> impl Iterator<Item = LogicalPin> {
        (1..=self.motor_count).flat_map(|socket| [LogicalPin::step(socket), LogicalPin::dir(socket)])
    }

    /// Check the table: required signals resolve, nothing is wired twice
    ///
    /// # Errors
    ///
    /// [`Error::PinMissing`] for the first required signal that is
    /// unassigned or has no physical pin; [`Error::PinConflict`] for the
    /// first two signals sharing a pin number or a port/bit.
    pub fn validate(&self) -> Result<()> {
        for logical in self.required() {
            if self.resolve(logical).is_none() {
                return Err(Error::PinMissing(logical));
            }
        }

        let assigned = self.assignments.iter().filter(|a| a.number >= 0);
        for (i, first) in assigned.clone().enumerate() {
            let first_pin = self.physical(first.number);
            for second in assigned.clone().skip(i + 1) {
                if first.number == second.number {
                    return Err(Error::PinConflict(first.logical, second.logical));
                }
                if let (Some(a), Some(b)) = (first_pin, self.physical(second.number)) {
                    if a.port == b.port && a.bit == b.bit {
                        return Err(Error::PinConflict(first.logical, second.logical));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Supported boards
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum BoardId {
    /// Arduino Due with the gShield
    GShield,
    /// ShopBot SBV300
    Sbv300,
    /// G2 v9i
    G2v9i,
    /// G2 v9d (SAM3X8C)
    G2v9d,
}

impl BoardId {
    /// Every board, in feature-precedence order
    pub const ALL: [Self; 4] = [Self::G2v9d, Self::G2v9i, Self::Sbv300, Self::GShield];

    /// Static pinout of the board
    #[must_use]
    pub fn pinout(self) -> &'static BoardPinout {
        match self {
            Self::GShield => &GSHIELD,
            Self::Sbv300 => &SBV300,
            Self::G2v9i => &G2V9I,
            Self::G2v9d => &G2V9D,
        }
    }

    /// Board name
    #[must_use]
    pub fn name(self) -> &'static str {
        self.pinout().name
    }
}

/// Pinout selected for this build
#[must_use]
pub fn active() -> &'static BoardPinout {
    crate::config::BOARD.pinout()
}
