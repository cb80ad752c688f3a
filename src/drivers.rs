//! Peripheral Drivers
//!
//! Drivers for external ICs on the TWI and SPI buses. They do not own a bus:
//! each request returns a message for the bus layer to execute, and the bus
//! reports back through the driver's `complete`. A driver holds one message
//! in flight at a time and refuses new work until it completes.

pub mod eeprom;
pub mod pressure;

use heapless::Vec;

/// Largest TWI write payload, one EEPROM page
pub const TWI_PAYLOAD: usize = crate::config::EEPROM_PAGE_SIZE;

/// Completion handler, called with `true` when the transfer worked
pub type Handler = fn(bool);

/// Transfer direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Direction {
    /// Write to the device
    Tx,
    /// Read from the device
    Rx,
}

/// One TWI (I2C) transaction
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct TwiMessage {
    /// 7-bit device address
    pub device: u8,
    /// Internal register address, sent big-endian ahead of the data
    pub internal_address: Option<u16>,
    /// Transfer direction
    pub direction: Direction,
    /// Bytes to read or write
    pub len: usize,
    /// Write payload; empty for reads
    pub tx: Vec<u8, TWI_PAYLOAD>,
}

impl TwiMessage {
    /// Read `len` bytes
    #[must_use]
    pub const fn read(device: u8, internal_address: Option<u16>, len: usize) -> Self {
        Self { device, internal_address, direction: Direction::Rx, len, tx: Vec::new() }
    }

    /// Write `data`
    ///
    /// # Errors
    ///
    /// `BufferTooSmall` when `data` exceeds [`TWI_PAYLOAD`].
    pub fn write(device: u8, internal_address: Option<u16>, data: &[u8]) -> crate::Result<Self> {
        let tx = Vec::from_slice(data)
            .map_err(|()| crate::Error::BufferTooSmall { needed: data.len(), available: TWI_PAYLOAD })?;
        Ok(Self { device, internal_address, direction: Direction::Tx, len: data.len(), tx })
    }

    /// Internal address bytes, big-endian
    #[must_use]
    pub fn address_bytes(&self) -> Option<[u8; 2]> {
        self.internal_address.map(u16::to_be_bytes)
    }
}

/// One full-duplex SPI transaction; the device sees zeros on MOSI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct SpiMessage {
    /// Bytes to clock in
    pub len: usize,
}

/// A bus transaction requested by a driver
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Transfer {
    /// TWI transaction
    Twi(TwiMessage),
    /// SPI transaction
    Spi(SpiMessage),
}
