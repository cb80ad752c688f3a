//! USB Descriptor Tests
//!
//! Byte layout of the standard records and GET_DESCRIPTOR answers.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test descriptor_tests

use g2_firmware::error::Error;
use g2_firmware::usb::cdc::CdcFunction;
use g2_firmware::usb::descriptor::{
    write_language_descriptor, write_string_descriptor, ConfigAttributes, DescriptorType, Direction, RequestKind,
    Recipient, SetupPacket, StandardRequest,
};
use g2_firmware::usb::hid::{hid_interface, HidDescriptor, PROTOCOL_NONE, SUBCLASS_NONE};
use g2_firmware::usb::msc::MscFunction;
use g2_firmware::usb::{UsbDescriptors, UsbSettings, UsbSpeed};

fn descriptors() -> UsbDescriptors {
    UsbDescriptors::new(UsbSettings::TINYG2, "0123456789abcdef", UsbSpeed::High)
}

fn get(d: &UsbDescriptors, kind: u8, index: u8, w_length: u16) -> Vec<u8> {
    let mut buf = [0u8; 256];
    let len = d.get_descriptor(kind, index, w_length, &mut buf).unwrap();
    buf[..len].to_vec()
}

// =============================================================================
// Device Descriptor Tests
// =============================================================================

#[test]
fn device_descriptor_bytes() {
    let bytes = get(&descriptors(), 0x01, 0, 0xFFFF);
    assert_eq!(
        bytes,
        [
            18, 0x01, // bLength, DEVICE
            0x10, 0x01, // bcdUSB 1.10
            0xEF, 0x02, 0x01, // IAD composite class triple
            64,   // bMaxPacketSize0
            0x50, 0x1d, // idVendor
            0x6d, 0x60, // idProduct
            0x00, 0x01, // bcdDevice 1.00
            1, 2, 3, // string indices
            1, // bNumConfigurations
        ]
    );
}

#[test]
fn device_qualifier_mirrors_device() {
    let bytes = get(&descriptors(), 0x06, 0, 0xFFFF);
    assert_eq!(bytes, [10, 0x06, 0x10, 0x01, 0xEF, 0x02, 0x01, 64, 1, 0]);
}

#[test]
fn device_descriptor_truncated_to_w_length() {
    // Hosts first ask for 8 bytes to learn bMaxPacketSize0
    let bytes = get(&descriptors(), 0x01, 0, 8);
    assert_eq!(bytes.len(), 8);
    assert_eq!(bytes[7], 64);
}

// =============================================================================
// Configuration Descriptor Tests
// =============================================================================

#[test]
fn configuration_header() {
    let bytes = get(&descriptors(), 0x02, 0, 9);
    let total = 9 + 2 * (CdcFunction::DESCRIPTOR_LEN + 8);
    assert_eq!(bytes[0], 9);
    assert_eq!(bytes[1], 0x02);
    assert_eq!(usize::from(u16::from_le_bytes([bytes[2], bytes[3]])), total);
    assert_eq!(bytes[4], 4, "two interfaces per serial port");
    assert_eq!(bytes[5], 1);
    assert_eq!(bytes[7], 0xC0, "self-powered, no remote wakeup");
    assert_eq!(bytes[8], 250, "500 mA in 2 mA units");
}

#[test]
fn configuration_length_matches_header() {
    let bytes = get(&descriptors(), 0x02, 0, 0xFFFF);
    assert_eq!(bytes.len(), usize::from(u16::from_le_bytes([bytes[2], bytes[3]])));
}

#[test]
fn configuration_records_chain() {
    // Walking bLength must land exactly on the end of the buffer
    let bytes = get(&descriptors(), 0x02, 0, 0xFFFF);
    let mut pos = 0;
    let mut types = Vec::new();
    while pos < bytes.len() {
        let len = usize::from(bytes[pos]);
        assert!(len >= 2);
        types.push(bytes[pos + 1]);
        pos += len;
    }
    assert_eq!(pos, bytes.len());
    assert_eq!(types.iter().filter(|&&t| t == 0x0B).count(), 2);
    assert_eq!(types.iter().filter(|&&t| t == 0x04).count(), 4);
    assert_eq!(types.iter().filter(|&&t| t == 0x05).count(), 6);
    assert_eq!(types.iter().filter(|&&t| t == 0x24).count(), 6);
}

#[test]
fn endpoints_numbered_per_port() {
    let bytes = get(&descriptors(), 0x02, 0, 0xFFFF);
    let mut pos = 0;
    let mut endpoints = Vec::new();
    while pos < bytes.len() {
        if bytes[pos + 1] == 0x05 {
            endpoints.push((bytes[pos + 2], bytes[pos + 3], u16::from_le_bytes([bytes[pos + 4], bytes[pos + 5]])));
        }
        pos += usize::from(bytes[pos]);
    }
    assert_eq!(
        endpoints,
        [(0x81, 0x03, 64), (0x02, 0x02, 512), (0x83, 0x02, 512), (0x84, 0x03, 64), (0x05, 0x02, 512), (0x86, 0x02, 512)]
    );
}

#[test]
fn other_speed_uses_full_speed_packets() {
    let bytes = get(&descriptors(), 0x07, 0, 0xFFFF);
    assert_eq!(bytes[1], 0x07);
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos + 1] == 0x05 && bytes[pos + 3] == 0x02 {
            assert_eq!(u16::from_le_bytes([bytes[pos + 4], bytes[pos + 5]]), 64);
        }
        pos += usize::from(bytes[pos]);
    }
}

#[test]
fn union_descriptor_names_interfaces() {
    let bytes = get(&descriptors(), 0x02, 0, 0xFFFF);
    let unions: Vec<_> = bytes
        .windows(5)
        .filter(|w| w[0] == 5 && w[1] == 0x24 && w[2] == 0x06)
        .map(|w| (w[3], w[4]))
        .collect();
    assert_eq!(unions, [(0, 1), (2, 3)]);
}

// =============================================================================
// String Descriptor Tests
// =============================================================================

#[test]
fn language_table() {
    assert_eq!(get(&descriptors(), 0x03, 0, 0xFF), [4, 0x03, 0x09, 0x04]);
}

#[test]
fn manufacturer_string_utf16() {
    let bytes = get(&descriptors(), 0x03, 1, 0xFF);
    assert_eq!(bytes[0] as usize, 2 + 2 * "Synthetos".len());
    assert_eq!(&bytes[2..6], &[b'S', 0, b'y', 0]);
}

#[test]
fn serial_number_string() {
    let bytes = get(&descriptors(), 0x03, 3, 0xFF);
    let text: String = bytes[2..].chunks(2).map(|c| char::from(c[0])).collect();
    assert_eq!(text, "0123456789abcdef");
}

#[test]
fn unknown_string_index() {
    let mut buf = [0u8; 64];
    assert_eq!(descriptors().get_descriptor(0x03, 9, 64, &mut buf), Err(Error::UnknownString(9)));
}

#[test]
fn unknown_descriptor_type() {
    let mut buf = [0u8; 64];
    assert_eq!(descriptors().get_descriptor(0x22, 0, 64, &mut buf), Err(Error::UnknownDescriptor(0x22)));
}

#[test]
fn string_descriptor_needs_room() {
    let mut buf = [0u8; 4];
    assert_eq!(
        write_string_descriptor("TinyG v2", &mut buf),
        Err(Error::BufferTooSmall { needed: 18, available: 4 })
    );
}

#[test]
fn language_descriptor_multiple_ids() {
    let mut buf = [0u8; 8];
    let len = write_language_descriptor(&[0x0409, 0x0407], &mut buf).unwrap();
    assert_eq!(&buf[..len], &[6, 0x03, 0x09, 0x04, 0x07, 0x04]);
}

#[test]
fn long_serial_is_cut() {
    let long = "x".repeat(64);
    let d = UsbDescriptors::new(UsbSettings::TINYG2, &long, UsbSpeed::Full);
    assert_eq!(d.serial_number().len(), 32);
}

// =============================================================================
// Setup Packet Tests
// =============================================================================

#[test]
fn setup_packet_get_descriptor() {
    let setup = SetupPacket::parse(&[0x80, 0x06, 0x00, 0x01, 0x00, 0x00, 0x12, 0x00]);
    assert_eq!(setup.direction, Direction::In);
    assert_eq!(setup.kind, RequestKind::Standard);
    assert_eq!(setup.recipient, Recipient::Device);
    assert_eq!(setup.standard_request(), Some(StandardRequest::GetDescriptor));
    assert_eq!(setup.descriptor_selector(), (0x01, 0x00));
    assert_eq!(setup.length, 18);

    let mut buf = [0u8; 64];
    assert_eq!(descriptors().answer(&setup, &mut buf), Ok(18));
}

#[test]
fn answer_rejects_other_requests() {
    let set_address = SetupPacket::parse(&[0x00, 0x05, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00]);
    let mut buf = [0u8; 64];
    assert_eq!(descriptors().answer(&set_address, &mut buf), Err(Error::UnsupportedRequest(0x05)));
}

#[test]
fn answer_into_short_buffer() {
    let setup = SetupPacket::parse(&[0x80, 0x06, 0x00, 0x01, 0x00, 0x00, 0x12, 0x00]);
    let mut buf = [0u8; 8];
    assert_eq!(descriptors().answer(&setup, &mut buf), Err(Error::BufferTooSmall { needed: 18, available: 8 }));
}

// =============================================================================
// HID and Mass Storage Tests
// =============================================================================

#[test]
fn hid_class_descriptor() {
    assert_eq!(HidDescriptor::new(63).to_bytes(), [9, 0x21, 0x11, 0x01, 0, 1, 0x22, 63, 0]);
    let iface = hid_interface(2, 1, SUBCLASS_NONE, PROTOCOL_NONE).to_bytes();
    assert_eq!(iface, [9, 0x04, 2, 0, 1, 0x03, 0, 0, 0]);
}

#[test]
fn msc_bulk_only_interface() {
    let msc = MscFunction { interface: 4, first_endpoint: 7 };
    assert_eq!(msc.interface_descriptor().to_bytes(), [9, 0x04, 4, 0, 2, 0x08, 0x06, 0x50, 0]);
    assert_eq!(msc.data_in_endpoint(UsbSpeed::Full).to_bytes(), [7, 0x05, 0x87, 0x02, 64, 0, 0]);
    assert_eq!(msc.data_out_endpoint(UsbSpeed::High).to_bytes(), [7, 0x05, 0x08, 0x02, 0x00, 0x02, 0]);
    assert!(MscFunction::is_class_request(0xFE));
    assert!(!MscFunction::is_class_request(0x20));
}

#[test]
fn descriptor_type_codes() {
    assert_eq!(DescriptorType::from_u8(0x0B), Some(DescriptorType::InterfaceAssociation));
    assert_eq!(DescriptorType::from_u8(0x09), None);
    assert_eq!(ConfigAttributes { self_powered: false, remote_wakeup: true }.bits(), 0xA0);
}
