//! TWI EEPROM (24-series, 2-byte internal address)

use super::{Handler, TwiMessage};
use crate::error::{Error, Result};

/// EEPROM on the TWI bus
#[derive(Debug)]
pub struct Eeprom {
    device: u8,
    transmitting: bool,
    inited: bool,
    handler: Option<Handler>,
}

impl Eeprom {
    /// Driver for the chip at `device`; call [`Eeprom::init`] before use
    #[must_use]
    pub const fn new(device: u8) -> Self {
        Self { device, transmitting: false, inited: false, handler: None }
    }

    /// Enable transfers
    pub fn init(&mut self) {
        self.inited = true;
    }

    /// Device address
    #[must_use]
    pub const fn device(&self) -> u8 {
        self.device
    }

    /// A transfer is in flight
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.transmitting
    }

    /// Handler run after every completed transfer
    pub fn set_handler(&mut self, handler: Handler) {
        self.handler = Some(handler);
    }

    fn claim(&mut self) -> Result<()> {
        if !self.inited {
            return Err(Error::NotReady);
        }
        if self.transmitting {
            return Err(Error::Busy);
        }
        self.transmitting = true;
        Ok(())
    }

    /// Write `data` at `address`
    ///
    /// # Errors
    ///
    /// `NotReady` before `init`, `Busy` while a transfer is in flight and
    /// `BufferTooSmall` for more than one page of data.
    pub fn store(&mut self, address: u16, data: &[u8]) -> Result<TwiMessage> {
        let message = TwiMessage::write(self.device, Some(address), data)?;
        self.claim()?;
        Ok(message)
    }

    /// [`Eeprom::store`], replacing the completion handler
    ///
    /// # Errors
    ///
    /// As [`Eeprom::store`].
    pub fn store_with(&mut self, address: u16, data: &[u8], handler: Handler) -> Result<TwiMessage> {
        self.handler = Some(handler);
        self.store(address, data)
    }

    /// Read `len` bytes at `address`
    ///
    /// # Errors
    ///
    /// `NotReady` before `init` and `Busy` while a transfer is in flight.
    pub fn load(&mut self, address: u16, len: usize) -> Result<TwiMessage> {
        self.claim()?;
        Ok(TwiMessage::read(self.device, Some(address), len))
    }

    /// [`Eeprom::load`], replacing the completion handler
    ///
    /// # Errors
    ///
    /// As [`Eeprom::load`].
    pub fn load_with(&mut self, address: u16, len: usize, handler: Handler) -> Result<TwiMessage> {
        self.handler = Some(handler);
        self.load(address, len)
    }

    /// Bus callback once the message has finished
    pub fn complete(&mut self, worked: bool) {
        self.transmitting = false;
        if let Some(handler) = self.handler {
            handler(worked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::Direction;

    #[test]
    fn refuses_before_init() {
        let mut eeprom = Eeprom::new(0x50);
        assert_eq!(eeprom.load(0, 4), Err(Error::NotReady));
        assert!(!eeprom.is_busy());
    }

    #[test]
    fn load_message_carries_address() {
        let mut eeprom = Eeprom::new(0x50);
        eeprom.init();
        let msg = eeprom.load(0x1234, 8).unwrap();
        assert_eq!(msg.direction, Direction::Rx);
        assert_eq!(msg.address_bytes(), Some([0x12, 0x34]));
        assert_eq!(msg.len, 8);
    }
}
