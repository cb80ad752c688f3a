//! USB CDC ACM (Serial) Descriptors and Control State
//!
//! Builds the class-specific descriptors for one or more virtual serial
//! ports and tracks per-port line coding and control-line state driven by
//! the host's class requests.

use crate::config::{
    BOOTLOADER_RESET_DELAY_MS, BOOTLOADER_TOUCH_BAUD, DEFAULT_BAUD_RATE, USB_BULK_PACKET_SIZE,
    USB_FULL_SPEED_PACKET_SIZE, USB_NOTIFICATION_PACKET_SIZE,
};
use crate::error::{Error, Result};
use crate::usb::descriptor::{
    class, usb_bcd, ConfigAttributes, ConfigurationDescriptor, ConfigurationWriter, DescriptorType,
    DeviceDescriptor, Direction, EndpointDescriptor, InterfaceAssociationDescriptor, InterfaceDescriptor,
    Recipient, RequestKind, SetupPacket, TransferType,
};

/// ACM subclass
pub const ACM_SUBCLASS: u8 = 0x02;
/// AT command protocol (V.250)
pub const AT_COMMAND_PROTOCOL: u8 = 0x01;
/// Data interface subclass
pub const DATA_SUBCLASS: u8 = 0x00;
/// Data interface protocol
pub const DATA_PROTOCOL: u8 = 0x00;

/// CDC specification release carried in the header functional descriptor
pub const CDC_VERSION: f32 = 1.10;

/// `bcdUSB` advertised by serial-only devices
pub const SERIAL_USB_VERSION: f32 = 1.1;

/// Notification endpoint polling interval (ms)
pub const NOTIFICATION_INTERVAL: u8 = 0xFF;

/// Bulk data endpoint polling interval
pub const DATA_INTERVAL: u8 = 0x05;

/// ACM capabilities: line coding/state requests and SEND_BREAK
pub const ACM_CAPABILITIES: u8 = 0x06;

/// Functional descriptor subtypes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FunctionalSubtype {
    /// Header
    Header = 0x00,
    /// Call management
    CallManagement = 0x01,
    /// Abstract control management
    AbstractControl = 0x02,
    /// Union
    Union = 0x06,
}

/// Header functional descriptor (5 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderFunctional {
    /// `bcdCDC`
    pub cdc_version: u16,
}

impl HeaderFunctional {
    /// Serialize to the wire layout
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 5] {
        let bcd = self.cdc_version.to_le_bytes();
        [5, DescriptorType::ClassInterface as u8, FunctionalSubtype::Header as u8, bcd[0], bcd[1]]
    }
}

impl Default for HeaderFunctional {
    fn default() -> Self {
        Self { cdc_version: usb_bcd(CDC_VERSION) }
    }
}

/// Call management functional descriptor (5 bytes)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallManagementFunctional {
    /// `bmCapabilities`
    pub capabilities: u8,
    /// `bDataInterface`
    pub data_interface: u8,
}

impl CallManagementFunctional {
    /// Serialize to the wire layout
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 5] {
        [
            5,
            DescriptorType::ClassInterface as u8,
            FunctionalSubtype::CallManagement as u8,
            self.capabilities,
            self.data_interface,
        ]
    }
}

/// Abstract control management functional descriptor (4 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcmFunctional {
    /// `bmCapabilities`
    pub capabilities: u8,
}

impl AcmFunctional {
    /// Serialize to the wire layout
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 4] {
        [4, DescriptorType::ClassInterface as u8, FunctionalSubtype::AbstractControl as u8, self.capabilities]
    }
}

impl Default for AcmFunctional {
    fn default() -> Self {
        Self { capabilities: ACM_CAPABILITIES }
    }
}

/// Union functional descriptor (5 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnionFunctional {
    /// Control (master) interface
    pub control_interface: u8,
    /// Data (slave) interface
    pub data_interface: u8,
}

impl UnionFunctional {
    /// Union of a control interface and the data interface right after it
    #[must_use]
    pub const fn new(control_interface: u8) -> Self {
        Self { control_interface, data_interface: control_interface + 1 }
    }

    /// Serialize to the wire layout
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 5] {
        [
            5,
            DescriptorType::ClassInterface as u8,
            FunctionalSubtype::Union as u8,
            self.control_interface,
            self.data_interface,
        ]
    }
}

/// Bus speed the descriptors are generated for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UsbSpeed {
    /// 12 Mbit/s
    Full,
    /// 480 Mbit/s
    #[default]
    High,
}

impl UsbSpeed {
    /// The speed described by an other-speed configuration
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Full => Self::High,
            Self::High => Self::Full,
        }
    }

    /// Largest bulk packet at this speed
    #[must_use]
    pub const fn bulk_packet_size(self) -> u16 {
        match self {
            Self::Full => USB_FULL_SPEED_PACKET_SIZE,
            Self::High => USB_BULK_PACKET_SIZE,
        }
    }
}

/// One ACM serial function: a control and a data interface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CdcFunction {
    /// Control interface number; the data interface follows it
    pub first_interface: u8,
    /// Notification endpoint number; bulk OUT and IN follow it
    pub first_endpoint: u8,
}

impl CdcFunction {
    /// Interfaces consumed by one function
    pub const INTERFACES: u8 = 2;
    /// Endpoints consumed by one function
    pub const ENDPOINTS: u8 = 3;
    /// Descriptor bytes of one function, without the IAD
    pub const DESCRIPTOR_LEN: usize = 9 + 5 + 4 + 5 + 7 + 9 + 7 + 7;

    /// Interface association grouping both interfaces
    #[must_use]
    pub const fn association(&self) -> InterfaceAssociationDescriptor {
        InterfaceAssociationDescriptor {
            first_interface: self.first_interface,
            interface_count: Self::INTERFACES,
            function_class: class::COMMUNICATIONS,
            function_subclass: ACM_SUBCLASS,
            function_protocol: AT_COMMAND_PROTOCOL,
            string_index: 0,
        }
    }

    /// Communications class interface
    #[must_use]
    pub const fn control_interface(&self) -> InterfaceDescriptor {
        InterfaceDescriptor {
            interface_number: self.first_interface,
            alternate_setting: 0,
            num_endpoints: 1,
            interface_class: class::COMMUNICATIONS,
            interface_subclass: ACM_SUBCLASS,
            interface_protocol: AT_COMMAND_PROTOCOL,
            string_index: 0,
        }
    }

    /// Data class interface
    #[must_use]
    pub const fn data_interface(&self) -> InterfaceDescriptor {
        InterfaceDescriptor {
            interface_number: self.first_interface + 1,
            alternate_setting: 0,
            num_endpoints: 2,
            interface_class: class::CDC_DATA,
            interface_subclass: DATA_SUBCLASS,
            interface_protocol: DATA_PROTOCOL,
            string_index: 0,
        }
    }

    /// Interrupt IN endpoint carrying SERIAL_STATE notifications
    #[must_use]
    pub const fn notification_endpoint(&self) -> EndpointDescriptor {
        EndpointDescriptor::new(
            self.first_endpoint,
            Direction::In,
            TransferType::Interrupt,
            USB_NOTIFICATION_PACKET_SIZE,
            NOTIFICATION_INTERVAL,
        )
    }

    /// Bulk OUT endpoint (host to device)
    #[must_use]
    pub const fn data_out_endpoint(&self, speed: UsbSpeed) -> EndpointDescriptor {
        EndpointDescriptor::new(
            self.first_endpoint + 1,
            Direction::Out,
            TransferType::Bulk,
            speed.bulk_packet_size(),
            DATA_INTERVAL,
        )
    }

    /// Bulk IN endpoint (device to host)
    #[must_use]
    pub const fn data_in_endpoint(&self, speed: UsbSpeed) -> EndpointDescriptor {
        EndpointDescriptor::new(
            self.first_endpoint + 2,
            Direction::In,
            TransferType::Bulk,
            speed.bulk_packet_size(),
            DATA_INTERVAL,
        )
    }

    /// Append this function's descriptors
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if the writer runs out of space.
    pub fn write(&self, writer: &mut ConfigurationWriter<'_>, with_association: bool, speed: UsbSpeed) -> Result<()> {
        if with_association {
            writer.push(&self.association())?;
        }
        writer.push(&self.control_interface())?;
        writer.push_bytes(&HeaderFunctional::default().to_bytes())?;
        writer.push_bytes(&AcmFunctional::default().to_bytes())?;
        writer.push_bytes(&UnionFunctional::new(self.first_interface).to_bytes())?;
        writer.push(&self.notification_endpoint())?;
        writer.push(&self.data_interface())?;
        writer.push(&self.data_out_endpoint(speed))?;
        writer.push(&self.data_in_endpoint(speed))?;
        Ok(())
    }
}

/// A configuration made only of ACM serial functions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositeConfiguration<const N: usize> {
    functions: [CdcFunction; N],
    attributes: ConfigAttributes,
    max_power_ma: u16,
}

impl<const N: usize> CompositeConfiguration<N> {
    /// Lay out `N` functions from interface 0 and endpoint 1
    #[must_use]
    pub const fn new(attributes: ConfigAttributes, max_power_ma: u16) -> Self {
        let mut functions = [CdcFunction { first_interface: 0, first_endpoint: 1 }; N];
        let mut i = 0;
        while i < N {
            #[allow(clippy::cast_possible_truncation)]
            let slot = i as u8;
            functions[i] = CdcFunction {
                first_interface: slot * CdcFunction::INTERFACES,
                first_endpoint: 1 + slot * CdcFunction::ENDPOINTS,
            };
            i += 1;
        }
        Self { functions, attributes, max_power_ma }
    }

    /// The serial functions in interface order
    #[must_use]
    pub const fn functions(&self) -> &[CdcFunction; N] {
        &self.functions
    }

    /// True when more than one function shares the device
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        N > 1
    }

    /// `bNumInterfaces`
    #[must_use]
    pub const fn num_interfaces(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)]
        let n = N as u8;
        n * CdcFunction::INTERFACES
    }

    /// `wTotalLength` of the configuration
    #[must_use]
    pub const fn total_length(&self) -> usize {
        let per_function = if self.is_composite() {
            CdcFunction::DESCRIPTOR_LEN + 8
        } else {
            CdcFunction::DESCRIPTOR_LEN
        };
        9 + N * per_function
    }

    /// Configuration header for this layout
    #[must_use]
    pub const fn header(&self) -> ConfigurationDescriptor {
        #[allow(clippy::cast_possible_truncation)]
        let total_length = self.total_length() as u16;
        ConfigurationDescriptor {
            total_length,
            num_interfaces: self.num_interfaces(),
            configuration_value: 1,
            string_index: 0,
            attributes: self.attributes,
            max_power_ma: self.max_power_ma,
        }
    }

    /// Device descriptor: per-interface class for one port, IAD class otherwise
    #[must_use]
    pub fn device_descriptor(&self, vendor_id: u16, product_id: u16, device_version: f32, max_packet_size0: u8) -> DeviceDescriptor {
        let (device_class, device_subclass, device_protocol) = if self.is_composite() {
            (class::MISCELLANEOUS, class::IAD_SUBCLASS, class::IAD_PROTOCOL)
        } else {
            (class::PER_INTERFACE, 0, 0)
        };
        DeviceDescriptor {
            usb_version: usb_bcd(SERIAL_USB_VERSION),
            device_class,
            device_subclass,
            device_protocol,
            max_packet_size0,
            vendor_id,
            product_id,
            device_version: usb_bcd(device_version),
            manufacturer_index: crate::usb::descriptor::string_index::MANUFACTURER,
            product_index: crate::usb::descriptor::string_index::PRODUCT,
            serial_number_index: crate::usb::descriptor::string_index::SERIAL_NUMBER,
            num_configurations: 1,
        }
    }

    /// Serialize the full configuration
    ///
    /// `kind` selects a configuration or other-speed configuration; the
    /// latter describes the endpoints at `speed.other()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `buf` cannot hold
    /// [`Self::total_length`] bytes.
    pub fn write_configuration(&self, buf: &mut [u8], speed: UsbSpeed, kind: DescriptorType) -> Result<usize> {
        let speed = match kind {
            DescriptorType::OtherSpeedConfiguration => speed.other(),
            _ => speed,
        };
        let mut writer = ConfigurationWriter::new(buf, &self.header(), kind)?;
        for function in &self.functions {
            function.write(&mut writer, self.is_composite(), speed)?;
        }
        Ok(writer.finish())
    }
}

/// CDC class request codes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CdcRequest {
    /// SEND_ENCAPSULATED_COMMAND
    SendEncapsulatedCommand = 0x00,
    /// GET_ENCAPSULATED_RESPONSE
    GetEncapsulatedResponse = 0x01,
    /// SET_LINE_CODING
    SetLineCoding = 0x20,
    /// GET_LINE_CODING
    GetLineCoding = 0x21,
    /// SET_CONTROL_LINE_STATE
    SetControlLineState = 0x22,
    /// SEND_BREAK
    SendBreak = 0x23,
}

impl CdcRequest {
    /// Decode a class request code
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::SendEncapsulatedCommand),
            0x01 => Some(Self::GetEncapsulatedResponse),
            0x20 => Some(Self::SetLineCoding),
            0x21 => Some(Self::GetLineCoding),
            0x22 => Some(Self::SetControlLineState),
            0x23 => Some(Self::SendBreak),
            _ => None,
        }
    }
}

/// SERIAL_STATE notification code
pub const NOTIFICATION_SERIAL_STATE: u8 = 0x20;

/// Line coding (baud rate, framing)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCoding {
    /// Baud rate
    pub baud_rate: u32,
    /// Stop bits
    pub stop_bits: StopBits,
    /// Parity
    pub parity: Parity,
    /// Data bits (5, 6, 7, 8, 16)
    pub data_bits: u8,
}

impl LineCoding {
    /// Wire size of the structure
    pub const LENGTH: usize = 7;

    /// Decode the 7-byte wire form
    ///
    /// # Errors
    ///
    /// Rejects a short payload and unknown stop-bit, parity or data-bit
    /// values.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let raw: &[u8; 7] = raw
            .get(..Self::LENGTH)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(Error::BadRequestLength)?;
        let stop_bits = StopBits::from_u8(raw[4]).ok_or(Error::InvalidStopBits(raw[4]))?;
        let parity = Parity::from_u8(raw[5]).ok_or(Error::InvalidParity(raw[5]))?;
        let data_bits = match raw[6] {
            bits @ (5..=8 | 16) => bits,
            bits => return Err(Error::InvalidDataBits(bits)),
        };
        Ok(Self {
            baud_rate: u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            stop_bits,
            parity,
            data_bits,
        })
    }

    /// Encode to the 7-byte wire form
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 7] {
        let rate = self.baud_rate.to_le_bytes();
        [rate[0], rate[1], rate[2], rate[3], self.stop_bits as u8, self.parity as u8, self.data_bits]
    }
}

impl Default for LineCoding {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            stop_bits: StopBits::One,
            parity: Parity::None,
            data_bits: 8,
        }
    }
}

/// Stop bits configuration (`bCharFormat`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum StopBits {
    /// One stop bit
    #[default]
    One = 0,
    /// One and a half stop bits
    OnePointFive = 1,
    /// Two stop bits
    Two = 2,
}

impl StopBits {
    /// Decode `bCharFormat`
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::One),
            1 => Some(Self::OnePointFive),
            2 => Some(Self::Two),
            _ => None,
        }
    }
}

/// Parity configuration (`bParityType`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Parity {
    /// No parity
    #[default]
    None = 0,
    /// Odd parity
    Odd = 1,
    /// Even parity
    Even = 2,
    /// Mark parity
    Mark = 3,
    /// Space parity
    Space = 4,
}

impl Parity {
    /// Decode `bParityType`
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Odd),
            2 => Some(Self::Even),
            3 => Some(Self::Mark),
            4 => Some(Self::Space),
            _ => None,
        }
    }
}

/// DTR/RTS control signals from SET_CONTROL_LINE_STATE
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlLineState {
    /// Data Terminal Ready
    pub dtr: bool,
    /// Request To Send
    pub rts: bool,
}

impl ControlLineState {
    /// Decode from the request's `wValue`
    #[must_use]
    pub const fn from_value(value: u16) -> Self {
        Self { dtr: value & 0x01 != 0, rts: value & 0x02 != 0 }
    }

    /// Encode back into `wValue` form
    #[must_use]
    pub const fn bits(self) -> u16 {
        (self.dtr as u16) | ((self.rts as u16) << 1)
    }

    /// Host has the port open (RTS asserted)
    #[must_use]
    pub const fn connected(&self) -> bool {
        self.rts
    }
}

/// UART state bits reported in a SERIAL_STATE notification
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerialState {
    /// Carrier detect (bRxCarrier)
    pub dcd: bool,
    /// Data set ready (bTxCarrier)
    pub dsr: bool,
    /// Break detected
    pub break_detected: bool,
    /// Ring signal
    pub ring: bool,
    /// Framing error
    pub framing_error: bool,
    /// Parity error
    pub parity_error: bool,
    /// Receive overrun
    pub overrun: bool,
}

impl SerialState {
    /// Encoded `UART State` bitmap
    #[must_use]
    pub const fn bits(&self) -> u16 {
        (self.dcd as u16)
            | ((self.dsr as u16) << 1)
            | ((self.break_detected as u16) << 2)
            | ((self.ring as u16) << 3)
            | ((self.framing_error as u16) << 4)
            | ((self.parity_error as u16) << 5)
            | ((self.overrun as u16) << 6)
    }

    /// Full 10-byte notification for the given control interface
    #[must_use]
    pub const fn notification(&self, interface: u8) -> [u8; 10] {
        let state = self.bits().to_le_bytes();
        [0xA1, NOTIFICATION_SERIAL_STATE, 0, 0, interface, 0, 2, 0, state[0], state[1]]
    }
}

/// What a handled class request changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CdcEvent {
    /// Host replaced the line coding
    LineCoding(LineCoding),
    /// Host changed DTR/RTS
    LineState(ControlLineState),
    /// Port closed at the touch rate: reset into the bootloader after the delay
    BootloaderReset {
        /// Delay before resetting
        delay_ms: u64,
    },
    /// Host requested a break of the given duration
    Break(u16),
}

/// Per-port state answering CDC class requests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CdcSerialState {
    line_coding: LineCoding,
    line_state: ControlLineState,
}

impl CdcSerialState {
    /// Fresh state at the default line coding
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current line coding
    #[must_use]
    pub const fn line_coding(&self) -> LineCoding {
        self.line_coding
    }

    /// Current control lines
    #[must_use]
    pub const fn line_state(&self) -> ControlLineState {
        self.line_state
    }

    /// DTR as last set by the host
    #[must_use]
    pub const fn dtr(&self) -> bool {
        self.line_state.dtr
    }

    /// RTS as last set by the host
    #[must_use]
    pub const fn rts(&self) -> bool {
        self.line_state.rts
    }

    /// Apply a line-coding change reported by the USB stack
    pub fn set_line_coding(&mut self, coding: LineCoding) {
        self.line_coding = coding;
    }

    /// Apply a control-line change, returning a reset event on a 1200 baud touch
    ///
    /// Reopening the port afterwards does not cancel a pending reset.
    pub fn set_line_state(&mut self, state: ControlLineState) -> CdcEvent {
        self.line_state = state;
        if self.line_coding.baud_rate == BOOTLOADER_TOUCH_BAUD && !state.dtr {
            CdcEvent::BootloaderReset { delay_ms: BOOTLOADER_RESET_DELAY_MS }
        } else {
            CdcEvent::LineState(state)
        }
    }

    /// Handle a host-to-device class request and its data stage
    ///
    /// # Errors
    ///
    /// Non-class requests and unknown codes are [`Error::UnsupportedRequest`];
    /// a bad line-coding payload is reported as its decode error.
    pub fn control_out(&mut self, setup: &SetupPacket, data: &[u8]) -> Result<CdcEvent> {
        if setup.kind != RequestKind::Class || setup.direction != Direction::Out {
            return Err(Error::UnsupportedRequest(setup.request));
        }
        match CdcRequest::from_u8(setup.request) {
            Some(CdcRequest::SetLineCoding) => {
                let coding = LineCoding::parse(data)?;
                self.set_line_coding(coding);
                Ok(CdcEvent::LineCoding(coding))
            }
            Some(CdcRequest::SetControlLineState) => {
                Ok(self.set_line_state(ControlLineState::from_value(setup.value)))
            }
            Some(CdcRequest::SendBreak) => Ok(CdcEvent::Break(setup.value)),
            _ => Err(Error::UnsupportedRequest(setup.request)),
        }
    }

    /// Answer a device-to-host class request, returning the bytes written
    ///
    /// # Errors
    ///
    /// Only GET_LINE_CODING is answered; `buf` must hold 7 bytes.
    pub fn control_in(&self, setup: &SetupPacket, buf: &mut [u8]) -> Result<usize> {
        if setup.kind != RequestKind::Class || setup.direction != Direction::In {
            return Err(Error::UnsupportedRequest(setup.request));
        }
        match CdcRequest::from_u8(setup.request) {
            Some(CdcRequest::GetLineCoding) => {
                let bytes = self.line_coding.to_bytes();
                let len = bytes.len().min(usize::from(setup.length));
                crate::usb::descriptor::copy_record(buf, &bytes[..len])
            }
            _ => Err(Error::UnsupportedRequest(setup.request)),
        }
    }
}

/// Line state of every serial function, routed by control interface
///
/// Fed each class request as the control pipe sees it, so a DTR drop at
/// the touch rate is caught even when the host reopens right after.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CdcPorts<const N: usize> {
    interfaces: [u8; N],
    ports: [CdcSerialState; N],
}

impl<const N: usize> CdcPorts<N> {
    /// One port per function of `configuration`
    #[must_use]
    pub fn new(configuration: &CompositeConfiguration<N>) -> Self {
        let functions = configuration.functions();
        Self {
            interfaces: core::array::from_fn(|i| functions[i].first_interface),
            ports: [CdcSerialState::new(); N],
        }
    }

    /// Port whose control interface is `interface`
    #[must_use]
    pub fn port_for(&self, interface: u16) -> Option<usize> {
        self.interfaces.iter().position(|&i| u16::from(i) == interface)
    }

    /// State of port `index`
    #[must_use]
    pub fn port(&self, index: usize) -> Option<&CdcSerialState> {
        self.ports.get(index)
    }

    /// Back to the default coding with all lines low, as after a bus reset
    pub fn reset(&mut self) {
        self.ports = [CdcSerialState::new(); N];
    }

    /// Apply a host-to-device request, returning the port it addressed
    ///
    /// Requests for other interfaces and recipients give `None`.
    pub fn control_out(&mut self, setup: &SetupPacket, data: &[u8]) -> Option<(usize, Result<CdcEvent>)> {
        if setup.recipient != Recipient::Interface {
            return None;
        }
        let index = self.port_for(setup.index & 0xFF)?;
        Some((index, self.ports[index].control_out(setup, data)))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LineCoding {
    fn format(&self, f: defmt::Formatter) {
        let parity = match self.parity {
            Parity::None => "N",
            Parity::Odd => "O",
            Parity::Even => "E",
            Parity::Mark => "M",
            Parity::Space => "S",
        };
        let stop = match self.stop_bits {
            StopBits::One => "1",
            StopBits::OnePointFive => "1.5",
            StopBits::Two => "2",
        };
        defmt::write!(f, "{} {}{}{}", self.baud_rate, self.data_bits, parity, stop);
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ControlLineState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "DTR={} RTS={}", self.dtr, self.rts);
    }
}
