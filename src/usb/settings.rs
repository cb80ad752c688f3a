//! Device identity and GET_DESCRIPTOR lookup
//!
//! `UsbDescriptors` holds everything the control endpoint needs to answer
//! a GET_DESCRIPTOR request: the identity from [`crate::config`], the
//! serial-port layout and the serial-number string. It is built once at
//! startup and never changes.

use heapless::String;

use crate::config;
use crate::error::{Error, Result};
use crate::usb::cdc::{CompositeConfiguration, UsbSpeed};
use crate::usb::descriptor::{
    copy_record, string_index, write_language_descriptor, write_string_descriptor, ConfigAttributes,
    DescriptorType, DeviceDescriptor, SetupPacket, StandardRequest, LANGUAGE_ID_EN_US,
};

/// Largest serial-number string kept
pub const SERIAL_NUMBER_CAPACITY: usize = 32;

/// Scratch space for one serialized descriptor
const SCRATCH_LEN: usize = 256;

/// USB identity of the device
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UsbSettings {
    /// `idVendor`
    pub vendor_id: u16,
    /// `idProduct`
    pub product_id: u16,
    /// Release number, BCD encoded on the wire
    pub device_version: f32,
    /// Configuration attributes
    pub attributes: ConfigAttributes,
    /// Requested bus current
    pub max_power_ma: u16,
    /// Manufacturer string
    pub manufacturer: &'static str,
    /// Product string
    pub product: &'static str,
}

impl UsbSettings {
    /// Identity compiled from [`crate::config`]
    pub const TINYG2: Self = Self {
        vendor_id: config::USB_VID,
        product_id: config::USB_PID,
        device_version: config::DEVICE_VERSION,
        attributes: ConfigAttributes {
            self_powered: config::USB_SELF_POWERED,
            remote_wakeup: config::USB_REMOTE_WAKEUP,
        },
        max_power_ma: config::USB_MAX_POWER_MA,
        manufacturer: config::USB_MANUFACTURER,
        product: config::USB_PRODUCT,
    };
}

impl Default for UsbSettings {
    fn default() -> Self {
        Self::TINYG2
    }
}

/// The dual-serial layout this firmware exposes
pub type SerialConfiguration = CompositeConfiguration<{ config::USB_SERIAL_PORTS }>;

/// Answers GET_DESCRIPTOR requests for the device
pub struct UsbDescriptors {
    settings: UsbSettings,
    configuration: SerialConfiguration,
    serial_number: String<SERIAL_NUMBER_CAPACITY>,
    speed: UsbSpeed,
}

impl UsbDescriptors {
    /// Build the descriptor set; a serial longer than the capacity is cut
    #[must_use]
    pub fn new(settings: UsbSettings, serial_number: &str, speed: UsbSpeed) -> Self {
        let mut serial = String::new();
        for c in serial_number.chars() {
            if serial.push(c).is_err() {
                break;
            }
        }
        Self {
            configuration: SerialConfiguration::new(settings.attributes, settings.max_power_ma),
            settings,
            serial_number: serial,
            speed,
        }
    }

    /// Identity in use
    #[must_use]
    pub const fn settings(&self) -> &UsbSettings {
        &self.settings
    }

    /// Serial-port layout
    #[must_use]
    pub const fn configuration(&self) -> &SerialConfiguration {
        &self.configuration
    }

    /// Serial-number string (string index 3)
    #[must_use]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Record the speed the bus came up at
    pub fn set_speed(&mut self, speed: UsbSpeed) {
        self.speed = speed;
    }

    /// The device descriptor
    #[must_use]
    pub fn device_descriptor(&self) -> DeviceDescriptor {
        self.configuration.device_descriptor(
            self.settings.vendor_id,
            self.settings.product_id,
            self.settings.device_version,
            config::USB_CONTROL_PACKET_SIZE,
        )
    }

    /// Serialize the descriptor selected by `descriptor_type`/`index`
    ///
    /// At most `w_length` bytes are written, as the host asked.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownDescriptor`] or [`Error::UnknownString`] for a
    /// selector this device does not serve, and [`Error::BufferTooSmall`] if
    /// `buf` cannot hold the truncated answer.
    pub fn get_descriptor(&self, descriptor_type: u8, index: u8, w_length: u16, buf: &mut [u8]) -> Result<usize> {
        let mut scratch = [0u8; SCRATCH_LEN];
        let len = match DescriptorType::from_u8(descriptor_type) {
            Some(DescriptorType::Device) => copy_record(&mut scratch, &self.device_descriptor().to_bytes())?,
            Some(DescriptorType::DeviceQualifier) => {
                copy_record(&mut scratch, &self.device_descriptor().qualifier().to_bytes())?
            }
            Some(kind @ (DescriptorType::Configuration | DescriptorType::OtherSpeedConfiguration)) => {
                self.configuration.write_configuration(&mut scratch, self.speed, kind)?
            }
            Some(DescriptorType::String) => self.write_string(index, &mut scratch)?,
            _ => return Err(Error::UnknownDescriptor(descriptor_type)),
        };
        let len = len.min(usize::from(w_length));
        copy_record(buf, &scratch[..len])
    }

    /// Answer a standard GET_DESCRIPTOR setup packet
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedRequest`] for anything but GET_DESCRIPTOR, else
    /// as [`Self::get_descriptor`].
    pub fn answer(&self, setup: &SetupPacket, buf: &mut [u8]) -> Result<usize> {
        if setup.standard_request() != Some(StandardRequest::GetDescriptor) {
            return Err(Error::UnsupportedRequest(setup.request));
        }
        let (descriptor_type, index) = setup.descriptor_selector();
        self.get_descriptor(descriptor_type, index, setup.length, buf)
    }

    fn write_string(&self, index: u8, buf: &mut [u8]) -> Result<usize> {
        match index {
            string_index::LANGUAGE => write_language_descriptor(&[LANGUAGE_ID_EN_US], buf),
            string_index::MANUFACTURER => write_string_descriptor(self.settings.manufacturer, buf),
            string_index::PRODUCT => write_string_descriptor(self.settings.product, buf),
            string_index::SERIAL_NUMBER => write_string_descriptor(&self.serial_number, buf),
            _ => Err(Error::UnknownString(index)),
        }
    }
}
