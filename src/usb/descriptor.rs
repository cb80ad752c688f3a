//! USB 2.0 Standard Descriptors
//!
//! Fixed-layout descriptor records serialized little-endian, plus the
//! standard setup-packet decoding needed to answer GET_DESCRIPTOR.
//!
//! Every record starts with `bLength` and `bDescriptorType`. Records are
//! built once at startup and serialized into caller-provided buffers, so
//! nothing here allocates.

use crate::error::{Error, Result};

/// Descriptor type codes (`bDescriptorType`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum DescriptorType {
    /// Device descriptor
    Device = 0x01,
    /// Configuration descriptor
    Configuration = 0x02,
    /// String descriptor
    String = 0x03,
    /// Interface descriptor
    Interface = 0x04,
    /// Endpoint descriptor
    Endpoint = 0x05,
    /// Device qualifier (high-speed capable devices)
    DeviceQualifier = 0x06,
    /// Other-speed configuration
    OtherSpeedConfiguration = 0x07,
    /// Interface power
    InterfacePower = 0x08,
    /// Interface association
    InterfaceAssociation = 0x0B,
    /// HID class descriptor
    Hid = 0x21,
    /// HID report descriptor
    HidReport = 0x22,
    /// Class-specific interface descriptor
    ClassInterface = 0x24,
    /// Class-specific endpoint descriptor
    ClassEndpoint = 0x25,
}

impl DescriptorType {
    /// Decode a descriptor type byte
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Device),
            0x02 => Some(Self::Configuration),
            0x03 => Some(Self::String),
            0x04 => Some(Self::Interface),
            0x05 => Some(Self::Endpoint),
            0x06 => Some(Self::DeviceQualifier),
            0x07 => Some(Self::OtherSpeedConfiguration),
            0x08 => Some(Self::InterfacePower),
            0x0B => Some(Self::InterfaceAssociation),
            0x21 => Some(Self::Hid),
            0x22 => Some(Self::HidReport),
            0x24 => Some(Self::ClassInterface),
            0x25 => Some(Self::ClassEndpoint),
            _ => None,
        }
    }
}

/// Device and interface class codes used by this firmware
pub mod class {
    //! `bDeviceClass` / `bInterfaceClass` values

    /// Class defined per interface
    pub const PER_INTERFACE: u8 = 0x00;
    /// Communications device class
    pub const COMMUNICATIONS: u8 = 0x02;
    /// Human interface device
    pub const HID: u8 = 0x03;
    /// Mass storage
    pub const MASS_STORAGE: u8 = 0x08;
    /// CDC data interface
    pub const CDC_DATA: u8 = 0x0A;
    /// Miscellaneous (used with interface association)
    pub const MISCELLANEOUS: u8 = 0xEF;
    /// Vendor specific
    pub const VENDOR_SPECIFIC: u8 = 0xFF;

    /// Subclass for interface-association composites
    pub const IAD_SUBCLASS: u8 = 0x02;
    /// Protocol for interface-association composites
    pub const IAD_PROTOCOL: u8 = 0x01;
}

/// String descriptor indices
pub mod string_index {
    //! Fixed string indices referenced by the device descriptor

    /// Language ID table
    pub const LANGUAGE: u8 = 0;
    /// Manufacturer name
    pub const MANUFACTURER: u8 = 1;
    /// Product name
    pub const PRODUCT: u8 = 2;
    /// Serial number
    pub const SERIAL_NUMBER: u8 = 3;
}

/// US English language ID
pub const LANGUAGE_ID_EN_US: u16 = 0x0409;

/// Convert a decimal release number to BCD (`2.0` -> `0x0200`)
///
/// Digits are tens, ones, tenths and hundredths, one nibble each.
#[must_use]
pub fn usb_bcd(version: f32) -> u16 {
    if version <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let hundredths = (version * 100.0 + 0.5) as u32;
    let digit = |div: u32| ((hundredths / div) % 10) as u16;
    (digit(1000) << 12) | (digit(100) << 8) | (digit(10) << 4) | digit(1)
}

/// A descriptor record with a fixed serialized size
pub trait Descriptor {
    /// Serialized length in bytes (`bLength`)
    const LENGTH: usize;

    /// Serialize into the start of `buf`, returning the bytes written
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `buf` is shorter than
    /// [`Self::LENGTH`].
    fn write_to(&self, buf: &mut [u8]) -> Result<usize>;
}

pub(crate) fn copy_record(buf: &mut [u8], bytes: &[u8]) -> Result<usize> {
    let available = buf.len();
    let out = buf
        .get_mut(..bytes.len())
        .ok_or(Error::BufferTooSmall { needed: bytes.len(), available })?;
    out.copy_from_slice(bytes);
    Ok(bytes.len())
}

/// Standard device descriptor (18 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// `bcdUSB`
    pub usb_version: u16,
    /// `bDeviceClass`
    pub device_class: u8,
    /// `bDeviceSubClass`
    pub device_subclass: u8,
    /// `bDeviceProtocol`
    pub device_protocol: u8,
    /// `bMaxPacketSize0`
    pub max_packet_size0: u8,
    /// `idVendor`
    pub vendor_id: u16,
    /// `idProduct`
    pub product_id: u16,
    /// `bcdDevice`
    pub device_version: u16,
    /// `iManufacturer`
    pub manufacturer_index: u8,
    /// `iProduct`
    pub product_index: u8,
    /// `iSerialNumber`
    pub serial_number_index: u8,
    /// `bNumConfigurations`
    pub num_configurations: u8,
}

impl DeviceDescriptor {
    /// Serialize to the wire layout
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 18] {
        let usb = self.usb_version.to_le_bytes();
        let vid = self.vendor_id.to_le_bytes();
        let pid = self.product_id.to_le_bytes();
        let dev = self.device_version.to_le_bytes();
        [
            18,
            DescriptorType::Device as u8,
            usb[0],
            usb[1],
            self.device_class,
            self.device_subclass,
            self.device_protocol,
            self.max_packet_size0,
            vid[0],
            vid[1],
            pid[0],
            pid[1],
            dev[0],
            dev[1],
            self.manufacturer_index,
            self.product_index,
            self.serial_number_index,
            self.num_configurations,
        ]
    }

    /// Device qualifier matching this device descriptor
    #[must_use]
    pub const fn qualifier(&self) -> DeviceQualifierDescriptor {
        DeviceQualifierDescriptor {
            usb_version: self.usb_version,
            device_class: self.device_class,
            device_subclass: self.device_subclass,
            device_protocol: self.device_protocol,
            max_packet_size0: self.max_packet_size0,
            num_configurations: self.num_configurations,
        }
    }
}

impl Descriptor for DeviceDescriptor {
    const LENGTH: usize = 18;

    fn write_to(&self, buf: &mut [u8]) -> Result<usize> {
        copy_record(buf, &self.to_bytes())
    }
}

/// Device qualifier descriptor (10 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceQualifierDescriptor {
    /// `bcdUSB`
    pub usb_version: u16,
    /// `bDeviceClass`
    pub device_class: u8,
    /// `bDeviceSubClass`
    pub device_subclass: u8,
    /// `bDeviceProtocol`
    pub device_protocol: u8,
    /// `bMaxPacketSize0`
    pub max_packet_size0: u8,
    /// `bNumConfigurations`
    pub num_configurations: u8,
}

impl DeviceQualifierDescriptor {
    /// Serialize to the wire layout
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 10] {
        let usb = self.usb_version.to_le_bytes();
        [
            10,
            DescriptorType::DeviceQualifier as u8,
            usb[0],
            usb[1],
            self.device_class,
            self.device_subclass,
            self.device_protocol,
            self.max_packet_size0,
            self.num_configurations,
            0,
        ]
    }
}

impl Descriptor for DeviceQualifierDescriptor {
    const LENGTH: usize = 10;

    fn write_to(&self, buf: &mut [u8]) -> Result<usize> {
        copy_record(buf, &self.to_bytes())
    }
}

/// `bmAttributes` of a configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfigAttributes {
    /// Device has its own supply
    pub self_powered: bool,
    /// Device can signal remote wakeup
    pub remote_wakeup: bool,
}

impl ConfigAttributes {
    /// Reserved bit, always set
    pub const RESERVED: u8 = 0x80;
    /// Self-powered bit
    pub const SELF_POWERED: u8 = 0x40;
    /// Remote wakeup bit
    pub const REMOTE_WAKEUP: u8 = 0x20;

    /// Encoded attribute byte
    #[must_use]
    pub const fn bits(self) -> u8 {
        let mut bits = Self::RESERVED;
        if self.self_powered {
            bits |= Self::SELF_POWERED;
        }
        if self.remote_wakeup {
            bits |= Self::REMOTE_WAKEUP;
        }
        bits
    }
}

/// Configuration descriptor header (9 bytes)
///
/// `total_length` covers the header and every descriptor that follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigurationDescriptor {
    /// `wTotalLength`
    pub total_length: u16,
    /// `bNumInterfaces`
    pub num_interfaces: u8,
    /// `bConfigurationValue`
    pub configuration_value: u8,
    /// `iConfiguration`
    pub string_index: u8,
    /// `bmAttributes`
    pub attributes: ConfigAttributes,
    /// Requested bus current in mA, halved on the wire
    pub max_power_ma: u16,
}

impl ConfigurationDescriptor {
    /// Serialize with the given type byte (configuration or other-speed)
    #[must_use]
    pub const fn to_bytes_as(&self, kind: DescriptorType) -> [u8; 9] {
        let total = self.total_length.to_le_bytes();
        #[allow(clippy::cast_possible_truncation)]
        let max_power = {
            let units = self.max_power_ma >> 1;
            if units > 0xFF {
                0xFF
            } else {
                units as u8
            }
        };
        [
            9,
            kind as u8,
            total[0],
            total[1],
            self.num_interfaces,
            self.configuration_value,
            self.string_index,
            self.attributes.bits(),
            max_power,
        ]
    }

    /// Serialize as a standard configuration descriptor
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 9] {
        self.to_bytes_as(DescriptorType::Configuration)
    }
}

impl Descriptor for ConfigurationDescriptor {
    const LENGTH: usize = 9;

    fn write_to(&self, buf: &mut [u8]) -> Result<usize> {
        copy_record(buf, &self.to_bytes())
    }
}

/// Interface descriptor (9 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    /// `bInterfaceNumber`
    pub interface_number: u8,
    /// `bAlternateSetting`
    pub alternate_setting: u8,
    /// `bNumEndpoints`
    pub num_endpoints: u8,
    /// `bInterfaceClass`
    pub interface_class: u8,
    /// `bInterfaceSubClass`
    pub interface_subclass: u8,
    /// `bInterfaceProtocol`
    pub interface_protocol: u8,
    /// `iInterface`
    pub string_index: u8,
}

impl InterfaceDescriptor {
    /// Serialize to the wire layout
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 9] {
        [
            9,
            DescriptorType::Interface as u8,
            self.interface_number,
            self.alternate_setting,
            self.num_endpoints,
            self.interface_class,
            self.interface_subclass,
            self.interface_protocol,
            self.string_index,
        ]
    }
}

impl Descriptor for InterfaceDescriptor {
    const LENGTH: usize = 9;

    fn write_to(&self, buf: &mut [u8]) -> Result<usize> {
        copy_record(buf, &self.to_bytes())
    }
}

/// Interface association descriptor (8 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterfaceAssociationDescriptor {
    /// `bFirstInterface`
    pub first_interface: u8,
    /// `bInterfaceCount`
    pub interface_count: u8,
    /// `bFunctionClass`
    pub function_class: u8,
    /// `bFunctionSubClass`
    pub function_subclass: u8,
    /// `bFunctionProtocol`
    pub function_protocol: u8,
    /// `iFunction`
    pub string_index: u8,
}

impl InterfaceAssociationDescriptor {
    /// Serialize to the wire layout
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 8] {
        [
            8,
            DescriptorType::InterfaceAssociation as u8,
            self.first_interface,
            self.interface_count,
            self.function_class,
            self.function_subclass,
            self.function_protocol,
            self.string_index,
        ]
    }
}

impl Descriptor for InterfaceAssociationDescriptor {
    const LENGTH: usize = 8;

    fn write_to(&self, buf: &mut [u8]) -> Result<usize> {
        copy_record(buf, &self.to_bytes())
    }
}

/// Endpoint transfer direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Host to device
    Out,
    /// Device to host
    In,
}

/// Endpoint transfer type (`bmAttributes` bits 0..1)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TransferType {
    /// Control
    Control = 0,
    /// Isochronous
    Isochronous = 1,
    /// Bulk
    Bulk = 2,
    /// Interrupt
    Interrupt = 3,
}

/// Isochronous synchronization type (`bmAttributes` bits 2..3)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SyncType {
    /// No synchronization
    #[default]
    None = 0,
    /// Asynchronous
    Asynchronous = 1,
    /// Adaptive
    Adaptive = 2,
    /// Synchronous
    Synchronous = 3,
}

/// Isochronous usage type (`bmAttributes` bits 4..5)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum UsageType {
    /// Data endpoint
    #[default]
    Data = 0,
    /// Feedback endpoint
    Feedback = 1,
    /// Implicit feedback data endpoint
    ImplicitFeedback = 2,
}

/// Endpoint descriptor (7 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Endpoint number, 1..=15
    pub number: u8,
    /// Transfer direction
    pub direction: Direction,
    /// Transfer type
    pub transfer_type: TransferType,
    /// Synchronization type
    pub sync_type: SyncType,
    /// Usage type
    pub usage_type: UsageType,
    /// `wMaxPacketSize`
    pub max_packet_size: u16,
    /// `bInterval`
    pub interval: u8,
}

impl EndpointDescriptor {
    /// Direction bit in `bEndpointAddress`
    pub const DIRECTION_IN: u8 = 0x80;

    /// Endpoint with default sync and usage type
    #[must_use]
    pub const fn new(
        number: u8,
        direction: Direction,
        transfer_type: TransferType,
        max_packet_size: u16,
        interval: u8,
    ) -> Self {
        Self {
            number,
            direction,
            transfer_type,
            sync_type: SyncType::None,
            usage_type: UsageType::Data,
            max_packet_size,
            interval,
        }
    }

    /// `bEndpointAddress`: number with the IN bit when device-to-host
    #[must_use]
    pub const fn address(&self) -> u8 {
        match self.direction {
            Direction::In => (self.number & 0x0F) | Self::DIRECTION_IN,
            Direction::Out => self.number & 0x0F,
        }
    }

    /// `bmAttributes`
    #[must_use]
    pub const fn attributes(&self) -> u8 {
        (self.transfer_type as u8) | ((self.sync_type as u8) << 2) | ((self.usage_type as u8) << 4)
    }

    /// Serialize to the wire layout
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 7] {
        let size = self.max_packet_size.to_le_bytes();
        [
            7,
            DescriptorType::Endpoint as u8,
            self.address(),
            self.attributes(),
            size[0],
            size[1],
            self.interval,
        ]
    }
}

impl Descriptor for EndpointDescriptor {
    const LENGTH: usize = 7;

    fn write_to(&self, buf: &mut [u8]) -> Result<usize> {
        copy_record(buf, &self.to_bytes())
    }
}

/// Write the string-zero descriptor listing supported language IDs
///
/// # Errors
///
/// Returns [`Error::BufferTooSmall`] if the table does not fit.
pub fn write_language_descriptor(languages: &[u16], buf: &mut [u8]) -> Result<usize> {
    let len = 2 + languages.len() * 2;
    if buf.len() < len || len > 0xFF {
        return Err(Error::BufferTooSmall { needed: len, available: buf.len() });
    }
    #[allow(clippy::cast_possible_truncation)]
    {
        buf[0] = len as u8;
    }
    buf[1] = DescriptorType::String as u8;
    for (chunk, id) in buf[2..len].chunks_exact_mut(2).zip(languages) {
        chunk.copy_from_slice(&id.to_le_bytes());
    }
    Ok(len)
}

/// Write a UTF-16LE string descriptor
///
/// Characters outside the basic multilingual plane are emitted as
/// surrogate pairs.
///
/// # Errors
///
/// Returns [`Error::BufferTooSmall`] if the encoded string does not fit in
/// `buf` or exceeds the 255-byte descriptor limit.
pub fn write_string_descriptor(text: &str, buf: &mut [u8]) -> Result<usize> {
    let len = 2 + text.encode_utf16().count() * 2;
    if buf.len() < len || len > 0xFF {
        return Err(Error::BufferTooSmall { needed: len, available: buf.len() });
    }
    #[allow(clippy::cast_possible_truncation)]
    {
        buf[0] = len as u8;
    }
    buf[1] = DescriptorType::String as u8;
    for (chunk, unit) in buf[2..len].chunks_exact_mut(2).zip(text.encode_utf16()) {
        chunk.copy_from_slice(&unit.to_le_bytes());
    }
    Ok(len)
}

/// Sequential writer for a configuration descriptor and its sub-descriptors
///
/// The header is written first with a zero total length; [`finish`]
/// patches `wTotalLength` once every record is in place.
///
/// [`finish`]: ConfigurationWriter::finish
pub struct ConfigurationWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ConfigurationWriter<'a> {
    /// Start a configuration, writing the header
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if the header does not fit.
    pub fn new(buf: &'a mut [u8], header: &ConfigurationDescriptor, kind: DescriptorType) -> Result<Self> {
        let pos = copy_record(buf, &header.to_bytes_as(kind))?;
        Ok(Self { buf, pos })
    }

    /// Append a standard descriptor
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if the record does not fit.
    pub fn push<D: Descriptor>(&mut self, descriptor: &D) -> Result<()> {
        self.pos += descriptor.write_to(&mut self.buf[self.pos..])?;
        Ok(())
    }

    /// Append raw bytes (class-specific descriptors)
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if the bytes do not fit.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.pos += copy_record(&mut self.buf[self.pos..], bytes)?;
        Ok(())
    }

    /// Bytes written so far
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pos
    }

    /// True until the header has been written
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// Patch `wTotalLength` and return the total size
    #[must_use]
    pub fn finish(self) -> usize {
        #[allow(clippy::cast_possible_truncation)]
        let total = (self.pos as u16).to_le_bytes();
        self.buf[2..4].copy_from_slice(&total);
        self.pos
    }
}

/// Standard request codes (`bRequest`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum StandardRequest {
    /// GET_STATUS
    GetStatus = 0,
    /// CLEAR_FEATURE
    ClearFeature = 1,
    /// SET_FEATURE
    SetFeature = 3,
    /// SET_ADDRESS
    SetAddress = 5,
    /// GET_DESCRIPTOR
    GetDescriptor = 6,
    /// SET_DESCRIPTOR
    SetDescriptor = 7,
    /// GET_CONFIGURATION
    GetConfiguration = 8,
    /// SET_CONFIGURATION
    SetConfiguration = 9,
    /// GET_INTERFACE
    GetInterface = 10,
    /// SET_INTERFACE
    SetInterface = 11,
    /// SYNCH_FRAME
    SynchFrame = 12,
}

impl StandardRequest {
    /// Decode a standard request code
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::GetStatus),
            1 => Some(Self::ClearFeature),
            3 => Some(Self::SetFeature),
            5 => Some(Self::SetAddress),
            6 => Some(Self::GetDescriptor),
            7 => Some(Self::SetDescriptor),
            8 => Some(Self::GetConfiguration),
            9 => Some(Self::SetConfiguration),
            10 => Some(Self::GetInterface),
            11 => Some(Self::SetInterface),
            12 => Some(Self::SynchFrame),
            _ => None,
        }
    }
}

/// `bmRequestType` bits 5..6
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    /// Standard request
    Standard,
    /// Class request
    Class,
    /// Vendor request
    Vendor,
    /// Reserved encoding
    Reserved,
}

/// `bmRequestType` bits 0..4
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    /// Device
    Device,
    /// Interface
    Interface,
    /// Endpoint
    Endpoint,
    /// Other
    Other,
    /// Reserved encoding
    Reserved,
}

/// Decoded 8-byte setup packet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetupPacket {
    /// Data stage direction
    pub direction: Direction,
    /// Request kind
    pub kind: RequestKind,
    /// Request recipient
    pub recipient: Recipient,
    /// `bRequest`
    pub request: u8,
    /// `wValue`
    pub value: u16,
    /// `wIndex`
    pub index: u16,
    /// `wLength`
    pub length: u16,
}

impl SetupPacket {
    /// Decode the wire form
    #[must_use]
    pub const fn parse(raw: &[u8; 8]) -> Self {
        let request_type = raw[0];
        let direction = if request_type & 0x80 != 0 { Direction::In } else { Direction::Out };
        let kind = match (request_type >> 5) & 0x03 {
            0 => RequestKind::Standard,
            1 => RequestKind::Class,
            2 => RequestKind::Vendor,
            _ => RequestKind::Reserved,
        };
        let recipient = match request_type & 0x1F {
            0 => Recipient::Device,
            1 => Recipient::Interface,
            2 => Recipient::Endpoint,
            3 => Recipient::Other,
            _ => Recipient::Reserved,
        };
        Self {
            direction,
            kind,
            recipient,
            request: raw[1],
            value: u16::from_le_bytes([raw[2], raw[3]]),
            index: u16::from_le_bytes([raw[4], raw[5]]),
            length: u16::from_le_bytes([raw[6], raw[7]]),
        }
    }

    /// Standard request code, if this is a standard request
    #[must_use]
    pub const fn standard_request(&self) -> Option<StandardRequest> {
        match self.kind {
            RequestKind::Standard => StandardRequest::from_u8(self.request),
            _ => None,
        }
    }

    /// Descriptor type and index from a GET_DESCRIPTOR `wValue`
    #[must_use]
    pub const fn descriptor_selector(&self) -> (u8, u8) {
        let bytes = self.value.to_be_bytes();
        (bytes[0], bytes[1])
    }
}
