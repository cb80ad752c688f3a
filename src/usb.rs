//! USB Subsystem
//!
//! Descriptor records and class state for the controller's USB port:
//! - two CDC ACM serial functions (G-code/JSON channel and a second data channel)
//! - HID and mass-storage class descriptors
//! - GET_DESCRIPTOR lookup keyed by the build's identity
//!
//! The embassy-usb device that carries the serial ports on target lives in
//! [`device`].

pub mod cdc;
pub mod descriptor;
pub mod hid;
pub mod msc;
pub mod settings;

#[cfg(feature = "embedded")]
pub mod device;

pub use cdc::{CdcSerialState, CompositeConfiguration, LineCoding, UsbSpeed};
pub use settings::{UsbDescriptors, UsbSettings};
