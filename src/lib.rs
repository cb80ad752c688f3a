//! G2 Motion Controller Firmware Library
//!
//! Hardware description and peripheral layer of a G2/TinyG2 CNC motion
//! controller: USB descriptors and CDC serial state, board pinout tables,
//! machine profiles, the chip unique ID and drivers for the TWI/SPI
//! peripherals. The motion planner and G-code interpreter consume what this
//! crate provides.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION (main.rs)                     │
//! │  USB serial tasks  │  Heartbeat  │  Boot-time validation     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   DATA / PROTOCOL LAYER                      │
//! │  USB descriptors + CDC  │  Board pinouts  │  Machine profiles│
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  I2C bus  │  EEPROM  │  Pressure sensors  │  LEDs  │  UID    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything above the HAL is plain data and state machines and builds on
//! the host with `--no-default-features --features std`.

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;
#[cfg(feature = "embedded")]
pub use embassy_usb;

/// Hardware Abstraction Layer
///
/// Host MCU glue on embassy-stm32.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral Drivers
///
/// Message-based drivers for TWI/SPI peripherals.
pub mod drivers;

/// USB Subsystem
///
/// Descriptors, CDC ACM state and the embassy-usb device.
pub mod usb;

/// Board pinout tables
pub mod board;

/// Machine profiles
pub mod machine;

/// Chip unique identifier
pub mod unique_id;

/// Error type shared by all modules
pub mod error;

/// System configuration and constants
pub mod config;

pub use error::{Error, Result};

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::board::{BoardId, BoardPinout, LogicalPin};
    pub use crate::config::*;
    pub use crate::error::{Error, Result};
    pub use crate::machine::{Axis, MachineId, MachineProfile};

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // HAL traits
    pub use embedded_hal::digital::OutputPin;
    pub use embedded_hal_async::i2c::I2c;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
