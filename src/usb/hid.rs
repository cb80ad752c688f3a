//! USB HID class descriptor and request codes

use crate::error::Result;
use crate::usb::descriptor::{class, copy_record, usb_bcd, Descriptor, DescriptorType, InterfaceDescriptor};

/// HID class release advertised in `bcdHID`
pub const HID_VERSION: f32 = 1.11;

/// No boot-interface subclass
pub const SUBCLASS_NONE: u8 = 0x00;
/// Boot-interface subclass
pub const SUBCLASS_BOOT: u8 = 0x01;

/// Boot protocol: none
pub const PROTOCOL_NONE: u8 = 0x00;
/// Boot protocol: keyboard
pub const PROTOCOL_KEYBOARD: u8 = 0x01;
/// Boot protocol: mouse
pub const PROTOCOL_MOUSE: u8 = 0x02;

/// HID class request codes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum HidRequest {
    /// GET_REPORT
    GetReport = 0x01,
    /// GET_IDLE
    GetIdle = 0x02,
    /// GET_PROTOCOL
    GetProtocol = 0x03,
    /// SET_REPORT
    SetReport = 0x09,
    /// SET_IDLE
    SetIdle = 0x0A,
    /// SET_PROTOCOL
    SetProtocol = 0x0B,
}

impl HidRequest {
    /// Decode a class request code
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::GetReport),
            0x02 => Some(Self::GetIdle),
            0x03 => Some(Self::GetProtocol),
            0x09 => Some(Self::SetReport),
            0x0A => Some(Self::SetIdle),
            0x0B => Some(Self::SetProtocol),
            _ => None,
        }
    }
}

/// HID class descriptor with a single report descriptor (9 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HidDescriptor {
    /// `bcdHID`
    pub hid_version: u16,
    /// `bCountryCode`
    pub country_code: u8,
    /// `wDescriptorLength` of the report descriptor
    pub report_length: u16,
}

impl HidDescriptor {
    /// Descriptor for a report of `report_length` bytes, no country code
    #[must_use]
    pub fn new(report_length: u16) -> Self {
        Self { hid_version: usb_bcd(HID_VERSION), country_code: 0, report_length }
    }

    /// Serialize to the wire layout
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 9] {
        let bcd = self.hid_version.to_le_bytes();
        let len = self.report_length.to_le_bytes();
        [
            9,
            DescriptorType::Hid as u8,
            bcd[0],
            bcd[1],
            self.country_code,
            1,
            DescriptorType::HidReport as u8,
            len[0],
            len[1],
        ]
    }
}

impl Descriptor for HidDescriptor {
    const LENGTH: usize = 9;

    fn write_to(&self, buf: &mut [u8]) -> Result<usize> {
        copy_record(buf, &self.to_bytes())
    }
}

/// Interface descriptor for a HID function with `num_endpoints` endpoints
#[must_use]
pub const fn hid_interface(interface_number: u8, num_endpoints: u8, subclass: u8, protocol: u8) -> InterfaceDescriptor {
    InterfaceDescriptor {
        interface_number,
        alternate_setting: 0,
        num_endpoints,
        interface_class: class::HID,
        interface_subclass: subclass,
        interface_protocol: protocol,
        string_index: 0,
    }
}
