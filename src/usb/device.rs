//! embassy-usb device for the two serial ports
//!
//! The device carries the identity from [`UsbDescriptors`] and two CDC ACM
//! functions grouped by interface associations. [`LineWatch`] sees every
//! line-coding and control-line request as the control pipe takes it, so
//! the 1200 baud touch resets the board however quickly the host reopens.

use defmt::{debug, info, warn};
use embassy_stm32::peripherals::USB;
use embassy_stm32::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::control::{OutResponse, Recipient as UsbRecipient, Request, RequestType};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use static_cell::StaticCell;

use super::cdc::{CdcEvent, CdcPorts};
use super::descriptor::{Direction, Recipient, RequestKind, SetupPacket};
use super::{UsbDescriptors, UsbSpeed};
use crate::config::{SERIAL_BUFFER_SIZE, USB_SERIAL_PORTS};

/// USB driver on the STM32 full-speed peripheral
pub type UsbDriver = Driver<'static, USB>;

/// One serial function
pub type SerialClass = CdcAcmClass<'static, UsbDriver>;

/// Which direction the last traffic went
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub enum Activity {
    /// Host to device
    Rx,
    /// Device to host
    Tx,
}

/// Queued by the port tasks on traffic; drives the USB LEDs
pub static USB_ACTIVITY: Channel<CriticalSectionRawMutex, Activity, 4> = Channel::new();

static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 0]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static LINE_WATCH: StaticCell<LineWatch> = StaticCell::new();
static SERIAL_STATES: StaticCell<[State<'static>; USB_SERIAL_PORTS]> = StaticCell::new();
static SERIAL_NUMBER: StaticCell<heapless::String<{ super::settings::SERIAL_NUMBER_CAPACITY }>> =
    StaticCell::new();

/// The built device and its ports
pub struct SerialDevice {
    /// Runs the control pipe; must be polled by its own task
    pub device: UsbDevice<'static, UsbDriver>,
    /// CDC ACM functions in interface order
    pub ports: [SerialClass; USB_SERIAL_PORTS],
}

/// embassy-usb configuration for the identity in `descriptors`
#[must_use]
pub fn usb_config(descriptors: &UsbDescriptors, serial_number: &'static str) -> Config<'static> {
    let settings = descriptors.settings();
    let device = descriptors.device_descriptor();

    let mut config = Config::new(settings.vendor_id, settings.product_id);
    config.manufacturer = Some(settings.manufacturer);
    config.product = Some(settings.product);
    config.serial_number = Some(serial_number);
    config.device_release = device.device_version;
    config.device_class = device.device_class;
    config.device_sub_class = device.device_subclass;
    config.device_protocol = device.device_protocol;
    config.composite_with_iads = descriptors.configuration().is_composite();
    config.max_packet_size_0 = device.max_packet_size0;
    config.max_power = settings.max_power_ma;
    config.self_powered = settings.attributes.self_powered;
    config.supports_remote_wakeup = settings.attributes.remote_wakeup;
    config
}

/// Build the device; call once
#[must_use]
pub fn build(driver: UsbDriver, descriptors: &UsbDescriptors) -> SerialDevice {
    let mut serial = heapless::String::new();
    let _ = serial.push_str(descriptors.serial_number());
    let serial = SERIAL_NUMBER.init(serial);

    let mut builder = Builder::new(
        driver,
        usb_config(descriptors, serial.as_str()),
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        MSOS_DESCRIPTOR.init([]),
        CONTROL_BUF.init([0; 64]),
    );

    // Ahead of the classes so it sees their requests first
    builder.handler(LINE_WATCH.init(LineWatch::new(descriptors)));

    let packet_size = UsbSpeed::Full.bulk_packet_size();
    let [first, second] = SERIAL_STATES.init([State::new(), State::new()]);
    let ports = [
        CdcAcmClass::new(&mut builder, first, packet_size),
        CdcAcmClass::new(&mut builder, second, packet_size),
    ];

    info!(
        "USB {:04x}:{:04x} serial {}, {} ports",
        descriptors.settings().vendor_id,
        descriptors.settings().product_id,
        descriptors.serial_number(),
        USB_SERIAL_PORTS
    );
    SerialDevice { device: builder.build(), ports }
}

/// Port and reset delay of a 1200 baud touch, raised by [`LineWatch`]
static BOOTLOADER_TOUCH: Signal<CriticalSectionRawMutex, (usize, u64)> = Signal::new();

/// Follows class requests on the serial control interfaces
///
/// Registered ahead of the ACM classes and always declines, so the classes
/// still answer every request.
pub struct LineWatch {
    ports: CdcPorts<USB_SERIAL_PORTS>,
}

impl LineWatch {
    /// Watch the functions laid out in `descriptors`
    #[must_use]
    pub fn new(descriptors: &UsbDescriptors) -> Self {
        Self { ports: CdcPorts::new(descriptors.configuration()) }
    }
}

impl Handler for LineWatch {
    fn reset(&mut self) {
        self.ports.reset();
    }

    fn control_out(&mut self, req: Request, data: &[u8]) -> Option<OutResponse> {
        if req.request_type != RequestType::Class || req.recipient != UsbRecipient::Interface {
            return None;
        }
        let setup = SetupPacket {
            direction: Direction::Out,
            kind: RequestKind::Class,
            recipient: Recipient::Interface,
            request: req.request,
            value: req.value,
            index: req.index,
            length: req.length,
        };
        match self.ports.control_out(&setup, data) {
            Some((port, Ok(CdcEvent::BootloaderReset { delay_ms }))) => BOOTLOADER_TOUCH.signal((port, delay_ms)),
            Some((port, Ok(CdcEvent::LineCoding(coding)))) => info!("USB serial {} line coding {}", port, coding),
            Some((port, Err(e))) => debug!("USB serial {} request 0x{:02x}: {}", port, req.request, e),
            Some((_, Ok(_))) | None => {}
        }
        None
    }
}

/// Reset into the bootloader once a port is touched at 1200 baud
pub async fn bootloader_watch() -> ! {
    let (port, delay_ms) = BOOTLOADER_TOUCH.wait().await;
    warn!("USB serial {} touched at 1200 baud, resetting in {} ms", port, delay_ms);
    Timer::after_millis(delay_ms).await;
    cortex_m::peripheral::SCB::sys_reset()
}

fn note(activity: Activity) {
    // LED flashes are best effort
    let _ = USB_ACTIVITY.try_send(activity);
}

/// Service one serial port forever, echoing what the host sends
pub async fn run_port(mut class: SerialClass, index: usize) -> ! {
    let mut buf = [0u8; SERIAL_BUFFER_SIZE];

    loop {
        class.wait_connection().await;
        info!("USB serial {} configured", index);

        loop {
            let n = match class.read_packet(&mut buf).await {
                Ok(0) => continue,
                Ok(n) => n,
                Err(EndpointError::BufferOverflow) => {
                    warn!("USB serial {} packet overflow", index);
                    continue;
                }
                Err(EndpointError::Disabled) => break,
            };
            note(Activity::Rx);

            match class.write_packet(&buf[..n]).await {
                Ok(()) => note(Activity::Tx),
                Err(EndpointError::BufferOverflow) => warn!("USB serial {} write overflow", index),
                Err(EndpointError::Disabled) => break,
            }
        }
        info!("USB serial {} disconnected", index);
    }
}
