//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test config_tests

use g2_firmware::board::BoardId;
use g2_firmware::config::*;
use g2_firmware::machine::MachineId;
use g2_firmware::usb::UsbSpeed;

// =============================================================================
// USB Identity Tests
// =============================================================================

#[test]
fn usb_identity() {
    assert_eq!(USB_VID, 0x1d50);
    assert_eq!(USB_PID, 0x606d);
    assert_eq!(USB_MANUFACTURER, "Synthetos");
    assert_eq!(USB_PRODUCT, "TinyG v2");
}

#[test]
fn usb_power_within_bus_limit() {
    // Configuration descriptor encodes power in 2 mA units in one byte
    assert!(USB_MAX_POWER_MA <= 510);
}

#[test]
fn usb_packet_sizes_legal() {
    // EP0 may be 8, 16, 32 or 64 bytes
    assert!(matches!(USB_CONTROL_PACKET_SIZE, 8 | 16 | 32 | 64));
    assert_eq!(USB_BULK_PACKET_SIZE, 512);
    assert_eq!(USB_FULL_SPEED_PACKET_SIZE, 64);
    assert!(USB_NOTIFICATION_PACKET_SIZE <= 64);
}

#[test]
fn bulk_endpoints_use_configured_sizes() {
    assert_eq!(UsbSpeed::Full.bulk_packet_size(), USB_FULL_SPEED_PACKET_SIZE);
    assert_eq!(UsbSpeed::High.bulk_packet_size(), USB_BULK_PACKET_SIZE);
}

#[test]
fn two_serial_ports() {
    assert_eq!(USB_SERIAL_PORTS, 2);
}

// =============================================================================
// Serial Configuration Tests
// =============================================================================

#[test]
fn bootloader_touch_differs_from_default() {
    assert_ne!(DEFAULT_BAUD_RATE, BOOTLOADER_TOUCH_BAUD);
    assert_eq!(BOOTLOADER_TOUCH_BAUD, 1200);
}

#[test]
fn serial_buffer_holds_full_speed_packet() {
    assert!(SERIAL_BUFFER_SIZE >= usize::from(USB_FULL_SPEED_PACKET_SIZE));
}

// =============================================================================
// System ID Tests
// =============================================================================

#[test]
fn system_id_fits_buffer() {
    let dashes = (SYS_ID_DIGITS - 1) / 4;
    assert!(SYS_ID_DIGITS + dashes <= SYS_ID_LEN);
    assert!(SYS_ID_DIGITS <= UNIQUE_ID_STRING_LEN);
}

// =============================================================================
// I2C Configuration Tests
// =============================================================================

#[test]
fn i2c_frequency_valid() {
    // Standard I2C speeds: 100kHz, 400kHz, 1MHz
    assert!(I2C_FREQUENCY_HZ == 100_000 || I2C_FREQUENCY_HZ == 400_000 || I2C_FREQUENCY_HZ == 1_000_000);
}

#[test]
fn eeprom_address_in_24_series_range() {
    assert_eq!(EEPROM_I2C_ADDR & 0x78, 0x50);
}

#[test]
fn pressure_sensor_settings() {
    let (min, max) = PRESSURE_RANGE_PSI;
    assert!(min < max);
    assert!(PRESSURE_I2C_ADDR < 0x80);
    assert_ne!(PRESSURE_I2C_ADDR, EEPROM_I2C_ADDR);
}

// =============================================================================
// Build Selection Tests
// =============================================================================

#[test]
fn default_build_selection() {
    // Tests run without board or machine features
    assert_eq!(BOARD, BoardId::GShield);
    assert_eq!(MACHINE, MachineId::Default);
}
