//! USB Mass Storage (bulk-only transport) descriptors

use crate::usb::cdc::UsbSpeed;
use crate::usb::descriptor::{class, Direction, EndpointDescriptor, InterfaceDescriptor, TransferType};

/// SCSI transparent command set
pub const SUBCLASS_SCSI: u8 = 0x06;

/// Bulk-only transport
pub const PROTOCOL_BULK_ONLY: u8 = 0x50;

/// Bulk-only mass storage reset
pub const REQUEST_RESET: u8 = 0xFF;

/// Get max LUN
pub const REQUEST_GET_MAX_LUN: u8 = 0xFE;

/// A bulk-only mass storage function
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MscFunction {
    /// Interface number
    pub interface: u8,
    /// Bulk IN endpoint number; bulk OUT is the next one
    pub first_endpoint: u8,
}

impl MscFunction {
    /// Interface descriptor
    #[must_use]
    pub const fn interface_descriptor(&self) -> InterfaceDescriptor {
        InterfaceDescriptor {
            interface_number: self.interface,
            alternate_setting: 0,
            num_endpoints: 2,
            interface_class: class::MASS_STORAGE,
            interface_subclass: SUBCLASS_SCSI,
            interface_protocol: PROTOCOL_BULK_ONLY,
            string_index: 0,
        }
    }

    /// Bulk IN endpoint
    #[must_use]
    pub const fn data_in_endpoint(&self, speed: UsbSpeed) -> EndpointDescriptor {
        EndpointDescriptor::new(self.first_endpoint, Direction::In, TransferType::Bulk, speed.bulk_packet_size(), 0)
    }

    /// Bulk OUT endpoint
    #[must_use]
    pub const fn data_out_endpoint(&self, speed: UsbSpeed) -> EndpointDescriptor {
        EndpointDescriptor::new(self.first_endpoint + 1, Direction::Out, TransferType::Bulk, speed.bulk_packet_size(), 0)
    }

    /// True for the two class requests the transport defines
    #[must_use]
    pub const fn is_class_request(request: u8) -> bool {
        matches!(request, REQUEST_RESET | REQUEST_GET_MAX_LUN)
    }
}
