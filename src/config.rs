//! System configuration and hardware constants
//!
//! Compile-time constants for the controller: USB identity, serial-port
//! defaults, system ID formatting and the build-time board and machine
//! selection. Everything here is fixed at build time.

use crate::board::BoardId;
use crate::machine::MachineId;

/// USB vendor ID (OpenMoko community VID block)
pub const USB_VID: u16 = 0x1d50;

/// USB product ID assigned to TinyG v2
pub const USB_PID: u16 = 0x606d;

/// Manufacturer string (string index 1)
pub const USB_MANUFACTURER: &str = "Synthetos";

/// Product string (string index 2)
pub const USB_PRODUCT: &str = "TinyG v2";

/// Device release number, encoded as BCD in `bcdDevice`
pub const DEVICE_VERSION: f32 = 1.0;

/// Board draws its power from its own supply
pub const USB_SELF_POWERED: bool = true;

/// Remote wakeup is not supported
pub const USB_REMOTE_WAKEUP: bool = false;

/// Maximum bus current requested in the configuration descriptor
pub const USB_MAX_POWER_MA: u16 = 500;

/// Control endpoint (EP0) packet size
pub const USB_CONTROL_PACKET_SIZE: u8 = 64;

/// Bulk endpoint packet size at high speed
pub const USB_BULK_PACKET_SIZE: u16 = 512;

/// Bulk endpoint packet size at full speed, as on the host peripheral
pub const USB_FULL_SPEED_PACKET_SIZE: u16 = 64;

/// CDC notification endpoint packet size
pub const USB_NOTIFICATION_PACKET_SIZE: u16 = 64;

/// Number of CDC ACM serial functions on the composite device
pub const USB_SERIAL_PORTS: usize = 2;

/// Default line rate reported before the host sets one
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// Line rate that arms the bootloader reset when DTR drops
pub const BOOTLOADER_TOUCH_BAUD: u32 = 1_200;

/// Delay between the 1200 baud touch and the reset, in milliseconds
pub const BOOTLOADER_RESET_DELAY_MS: u64 = 250;

/// Number of unique-ID characters shown in the system ID
pub const SYS_ID_DIGITS: usize = 12;

/// Length of the full hex unique-ID string
pub const UNIQUE_ID_STRING_LEN: usize = 16;

/// Buffer length for the dashed system ID (digits plus separators)
pub const SYS_ID_LEN: usize = 24;

/// Poll budget for flash controller ready waits
pub const EEFC_POLL_LIMIT: u32 = 100_000;

/// Settings EEPROM I2C address
pub const EEPROM_I2C_ADDR: u8 = 0x50;

/// Settings EEPROM page size in bytes
pub const EEPROM_PAGE_SIZE: usize = 32;

/// Honeywell SSC pressure sensor I2C address
pub const PRESSURE_I2C_ADDR: u8 = 0x28;

/// Pressure sensor range, psi (10-90 % transfer function)
pub const PRESSURE_RANGE_PSI: (f32, f32) = (-1.0, 1.0);

/// Pressure sampling period in milliseconds
pub const PRESSURE_SAMPLE_MS: u64 = 100;

/// I2C bus frequency for the settings EEPROM
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// CDC read chunk size used by the serial tasks
pub const SERIAL_BUFFER_SIZE: usize = 64;

/// Pinout compiled into this build
pub const BOARD: BoardId = if cfg!(feature = "board-g2v9d") {
    BoardId::G2v9d
} else if cfg!(feature = "board-g2v9i") {
    BoardId::G2v9i
} else if cfg!(feature = "board-sbv300") {
    BoardId::Sbv300
} else {
    BoardId::GShield
};

/// Machine profile compiled into this build
pub const MACHINE: MachineId = if cfg!(feature = "machine-shapeoko2") {
    MachineId::Shapeoko2
} else if cfg!(feature = "machine-zen7x12") {
    MachineId::Zen7x12
} else if cfg!(feature = "machine-othermill") {
    MachineId::Othermill
} else {
    MachineId::Default
};

/// Host-board pin assignments
#[cfg(feature = "embedded")]
pub mod pins {
    //! Pins of the embassy host board that carries the USB and EEPROM
    //! peripherals. The CNC-side pinout lives in [`crate::board`].

    use embassy_stm32::peripherals;

    /// Heartbeat LED
    pub type LedStatus = peripherals::PA5;

    /// USB receive activity LED
    pub type LedUsbRx = peripherals::PB0;

    /// USB transmit activity LED
    pub type LedUsbTx = peripherals::PB1;

    /// I2C1 SCL (settings EEPROM, pressure sensor)
    pub type I2c1Scl = peripherals::PB8;

    /// I2C1 SDA (settings EEPROM, pressure sensor)
    pub type I2c1Sda = peripherals::PB9;

    /// USB D+
    pub type UsbDp = peripherals::PA12;

    /// USB D-
    pub type UsbDm = peripherals::PA11;
}

/// DMA channels serving the I2C bus
#[cfg(feature = "embedded")]
pub mod dma {
    use embassy_stm32::peripherals;

    /// I2C1 TX
    pub type I2c1Tx = peripherals::DMA1_CH1;

    /// I2C1 RX
    pub type I2c1Rx = peripherals::DMA1_CH2;
}
