//! Hardware Abstraction Layer
//!
//! Host MCU glue on embassy-stm32 (STM32G474): the TWI bus that runs the
//! driver messages, the USB activity LEDs and the chip unique ID.

pub mod gpio;
pub mod i2c;

use crate::unique_id::UniqueId;

/// Chip unique ID from the STM32 96-bit UID, widened to four words
#[must_use]
pub fn chip_unique_id() -> UniqueId {
    let uid = embassy_stm32::uid::uid();
    let mut words = [0u32; 4];
    for (word, chunk) in words.iter_mut().zip(uid.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    UniqueId::from_words(words)
}
