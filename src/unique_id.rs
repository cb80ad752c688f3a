//! Chip Unique Identifier
//!
//! SAM3X parts expose a 128-bit unique ID through the flash controller
//! (EEFC): a Start Read Unique Identifier command maps the ID over the
//! start of flash until Stop Read Unique Identifier restores it. The ID is
//! formatted as lowercase hex for the USB serial number and the system ID.

use heapless::String;

use crate::config::{EEFC_POLL_LIMIT, SYS_ID_DIGITS, SYS_ID_LEN, UNIQUE_ID_STRING_LEN};
use crate::error::{Error, Result};

/// EEFC registers and flash window
mod eefc {
    /// Flash Ready bit in EEFC_FSR
    pub const FSR_FRDY: u32 = 1;
    /// Start Read Unique Identifier
    pub const CMD_STUI: u32 = 0x0E;
    /// Stop Read Unique Identifier
    pub const CMD_SPUI: u32 = 0x0F;
    /// Write key, bits 31:24 of EEFC_FCR
    pub const KEY: u32 = 0x5A;
    /// Flash address the ID appears at
    pub const UID_ADDRESS: u32 = 0x0008_0000;

    pub const fn fcr(command: u32) -> u32 {
        (KEY << 24) | command
    }
}

pub use eefc::UID_ADDRESS;

/// Access to the flash controller
pub trait EefcRegisters {
    /// EEFC_FSR
    fn status(&mut self) -> u32;
    /// Write EEFC_FCR
    fn command(&mut self, fcr: u32);
    /// Read the flash word at `address`
    fn read_word(&mut self, address: u32) -> u32;
}

fn wait_ready<R: EefcRegisters>(regs: &mut R, ready: bool) -> Result<()> {
    for _ in 0..EEFC_POLL_LIMIT {
        if (regs.status() & eefc::FSR_FRDY != 0) == ready {
            return Ok(());
        }
    }
    Err(Error::Timeout)
}

/// Run the EEFC read sequence
///
/// # Errors
///
/// `Timeout` when the controller does not change state within
/// [`EEFC_POLL_LIMIT`] status reads.
pub fn read_unique_id<R: EefcRegisters>(regs: &mut R) -> Result<UniqueId> {
    wait_ready(regs, true)?;
    regs.command(eefc::fcr(eefc::CMD_STUI));
    wait_ready(regs, false)?;

    let mut words = [0u32; 4];
    for (address, word) in (eefc::UID_ADDRESS..).step_by(4).zip(words.iter_mut()) {
        *word = regs.read_word(address);
    }

    regs.command(eefc::fcr(eefc::CMD_SPUI));
    wait_ready(regs, true)?;
    Ok(UniqueId::from_words(words))
}

/// 128-bit unique identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct UniqueId {
    words: [u32; 4],
}

impl UniqueId {
    /// From the four ID words, `d0` first
    #[must_use]
    pub const fn from_words(words: [u32; 4]) -> Self {
        Self { words }
    }

    /// Raw words
    #[must_use]
    pub const fn words(&self) -> [u32; 4] {
        self.words
    }

    /// Nibble `i` of the string form: low nibble of `d0` first, then `d1`
    #[must_use]
    pub const fn nibble(&self, i: usize) -> u8 {
        let word = if i >= 8 { self.words[1] } else { self.words[0] };
        #[allow(clippy::cast_possible_truncation)]
        let nibble = ((word >> ((i % 8) * 4)) & 0xF) as u8;
        nibble
    }

    /// 16 lowercase hex digits
    #[must_use]
    pub fn hex_string(&self) -> String<UNIQUE_ID_STRING_LEN> {
        let mut out = String::new();
        for i in 0..UNIQUE_ID_STRING_LEN {
            let _ = out.push(hex_digit(self.nibble(i)));
        }
        out
    }

    /// First `N` hex digits, dashed every four
    #[must_use]
    pub fn system_id<const N: usize>(&self) -> String<SYS_ID_LEN> {
        let mut out = String::new();
        for (i, c) in self.hex_string().chars().take(N).enumerate() {
            if i > 0 && i % 4 == 0 {
                let _ = out.push('-');
            }
            let _ = out.push(c);
        }
        out
    }

    /// System ID with the configured digit count
    #[must_use]
    pub fn sys_id(&self) -> String<SYS_ID_LEN> {
        self.system_id::<SYS_ID_DIGITS>()
    }
}

const fn hex_digit(nibble: u8) -> char {
    if nibble < 0xA {
        (b'0' + nibble) as char
    } else {
        (b'a' + nibble - 0xA) as char
    }
}

/// Reads the ID once and keeps it
#[derive(Debug, Default)]
pub struct UniqueIdCache {
    id: Option<UniqueId>,
}

impl UniqueIdCache {
    /// Empty cache
    #[must_use]
    pub const fn new() -> Self {
        Self { id: None }
    }

    /// Cached ID, reading it on first use
    ///
    /// # Errors
    ///
    /// As [`read_unique_id`]; a failed read is retried on the next call.
    pub fn get<R: EefcRegisters>(&mut self, regs: &mut R) -> Result<UniqueId> {
        if let Some(id) = self.id {
            return Ok(id);
        }
        let id = read_unique_id(regs)?;
        self.id = Some(id);
        Ok(id)
    }

    /// Cached ID without touching the hardware
    #[must_use]
    pub const fn cached(&self) -> Option<UniqueId> {
        self.id
    }

    /// Latch an ID obtained elsewhere
    pub fn set(&mut self, id: UniqueId) {
        self.id = Some(id);
    }
}
