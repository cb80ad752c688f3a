//! I2C (TWI) Bus
//!
//! Executes the [`TwiMessage`]s the drivers hand out, on the embassy-stm32
//! async I2C driver with DMA, and reports the outcome back to the driver.

use defmt::warn;
use embassy_stm32::i2c::{Error as I2cError, I2c};
use embassy_stm32::mode::Async;
use heapless::Vec;

use crate::drivers::eeprom::Eeprom;
use crate::drivers::pressure::HoneywellSsc;
use crate::drivers::{Direction, Transfer, TwiMessage, TWI_PAYLOAD};
use crate::error::{Error, Result};

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Settings EEPROM
    pub const EEPROM: Self = Self(crate::config::EEPROM_I2C_ADDR);

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// I2C bus owned by the driver service loop
pub struct I2cBus<'d> {
    i2c: I2c<'d, Async>,
}

impl<'d> I2cBus<'d> {
    /// Wrap an initialized peripheral
    #[must_use]
    pub fn new(i2c: I2c<'d, Async>) -> Self {
        Self { i2c }
    }

    /// Run one message; reads land in `rx`
    ///
    /// # Errors
    ///
    /// `BufferTooSmall` when `rx` is shorter than the read and `Transfer`
    /// when the bus reports an error.
    pub async fn execute(&mut self, message: &TwiMessage, rx: &mut [u8]) -> Result<usize> {
        let addr = I2cAddress::new(message.device).addr();
        let outcome = match message.direction {
            Direction::Tx => {
                let mut frame: Vec<u8, { TWI_PAYLOAD + 2 }> = Vec::new();
                if let Some(bytes) = message.address_bytes() {
                    let _ = frame.extend_from_slice(&bytes);
                }
                frame
                    .extend_from_slice(&message.tx)
                    .map_err(|()| Error::BufferTooSmall { needed: message.len + 2, available: frame.capacity() })?;
                self.i2c.write(addr, &frame).await
            }
            Direction::Rx => {
                let available = rx.len();
                let buf = rx
                    .get_mut(..message.len)
                    .ok_or(Error::BufferTooSmall { needed: message.len, available })?;
                match message.address_bytes() {
                    Some(bytes) => self.i2c.write_read(addr, &bytes, buf).await,
                    None => self.i2c.read(addr, buf).await,
                }
            }
        };
        outcome.map_err(|e: I2cError| {
            warn!("I2C {} failed: {}", I2cAddress::new(message.device), e);
            Error::Transfer
        })?;
        Ok(message.len)
    }

    /// Run an EEPROM message and complete it
    ///
    /// # Errors
    ///
    /// As [`I2cBus::execute`]; the driver has been completed either way.
    pub async fn service_eeprom(&mut self, eeprom: &mut Eeprom, message: &TwiMessage, rx: &mut [u8]) -> Result<usize> {
        let result = self.execute(message, rx).await;
        eeprom.complete(result.is_ok());
        result
    }

    /// Run a transfer the sensor handed out and complete it
    ///
    /// An SPI transfer cannot run here; it is completed as failed so the
    /// sensor does not stay busy.
    pub async fn service_ssc(&mut self, sensor: &mut HoneywellSsc, transfer: Transfer) {
        let Transfer::Twi(message) = transfer else {
            warn!("SSC transfer is not for the I2C bus");
            sensor.cancel();
            return;
        };
        let mut rx = [0u8; crate::drivers::pressure::FRAME_LEN];
        let worked = self.execute(&message, &mut rx).await.is_ok();
        sensor.complete(worked, &rx);
    }
}
