//! Unified error type for the controller support layer.
//!
//! No `alloc`: every variant carries only fixed-size data so the enum stays
//! `Copy` and can be logged with `defmt` on target.

use crate::board::LogicalPin;
use crate::machine::{Axis, ProfileField};

/// Top-level error type used across the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Error {
    // Buffers
    /// Destination buffer too small for the record being written.
    BufferTooSmall {
        /// Bytes the record needs.
        needed: usize,
        /// Bytes available.
        available: usize,
    },

    // USB
    /// GET_DESCRIPTOR asked for a type this device does not serve.
    UnknownDescriptor(u8),
    /// String descriptor index out of range.
    UnknownString(u8),
    /// Setup or class request payload has the wrong length.
    BadRequestLength,
    /// Class request code not handled by the CDC function.
    UnsupportedRequest(u8),
    /// Line coding carried an invalid stop-bit code.
    InvalidStopBits(u8),
    /// Line coding carried an invalid parity code.
    InvalidParity(u8),
    /// Line coding carried an unsupported data-bit count.
    InvalidDataBits(u8),

    // Pinout
    /// A logical pin the firmware requires is unassigned or has no physical pin.
    PinMissing(LogicalPin),
    /// Two logical pins resolve to the same pin number.
    PinConflict(LogicalPin, LogicalPin),

    // Machine profile
    /// A motor setting is out of range.
    InvalidMotorSetting {
        /// Motor number, 1-based.
        motor: u8,
        /// Which setting failed.
        field: ProfileField,
    },
    /// An axis setting is out of range.
    InvalidAxisSetting {
        /// Axis the setting belongs to.
        axis: Axis,
        /// Which setting failed.
        field: ProfileField,
    },
    /// Homing input outside the available digital inputs.
    InvalidHomingInput(Axis),

    // Drivers
    /// A transaction is already in flight.
    Busy,
    /// Driver used before `init`.
    NotReady,
    /// Bus transfer failed.
    Transfer,

    // Generic
    /// Hardware did not respond within the poll budget.
    Timeout,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
