//! G2 Motion Controller Main Application
//!
//! Entry point for the controller firmware. Validates the compiled-in board
//! and machine tables, brings up the USB serial ports and spawns the
//! background tasks.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_stm32::usb::Driver;
use embassy_stm32::{bind_interrupts, peripherals, usb};
use {defmt_rtt as _, panic_probe as _};

use g2_firmware::drivers::eeprom::Eeprom;
use g2_firmware::drivers::pressure::{HoneywellSsc, PressureSensor, PressureUnits, SscBus, SscRange};
use g2_firmware::hal::gpio::{LedState, StatusLed, UsbLeds};
use g2_firmware::config::{dma, pins};
use g2_firmware::hal::i2c::I2cBus;
use g2_firmware::prelude::*;
use g2_firmware::usb::device::{self, Activity, SerialClass, UsbDriver, USB_ACTIVITY};
use g2_firmware::usb::{UsbDescriptors, UsbSettings, UsbSpeed};

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    I2C1_EV => embassy_stm32::i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => embassy_stm32::i2c::ErrorInterruptHandler<peripherals::I2C1>;
    USB_LP => usb::InterruptHandler<peripherals::USB>;
});

/// Log and check the compiled-in board and machine
fn check_tables() {
    let board = BOARD.pinout();
    match board.validate() {
        Ok(()) => info!("Board {}: {} motors, {} pins assigned", board.name, board.motor_count, board.assigned().count()),
        Err(e) => error!("Board {} pin table invalid: {}", board.name, e),
    }

    let unresolved = board.unresolved().count();
    if unresolved > 0 {
        warn!("Board {}: {} assignments have no physical pin", board.name, unresolved);
    }

    let profile = MACHINE.profile();
    match profile.validate() {
        Ok(()) => info!("Machine profile {}", profile.name),
        Err(e) => error!("Machine profile {} invalid: {}", profile.name, e),
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("G2 controller firmware v{}", env!("CARGO_PKG_VERSION"));

    let mut config = embassy_stm32::Config::default();
    {
        use embassy_stm32::rcc::{mux, Hsi48Config};
        config.rcc.hsi48 = Some(Hsi48Config { sync_from_usb: true });
        config.rcc.mux.clk48sel = mux::Clk48sel::HSI48;
    }
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");
    check_tables();

    let unique_id = g2_firmware::hal::chip_unique_id();
    info!("System ID {}", unique_id.sys_id().as_str());

    let status: pins::LedStatus = p.PA5;
    let usb_rx: pins::LedUsbRx = p.PB0;
    let usb_tx: pins::LedUsbTx = p.PB1;
    let led = StatusLed::new(Output::new(status, Level::Low, Speed::Low));
    let usb_leds = UsbLeds::new(Output::new(usb_rx, Level::Low, Speed::Low), Output::new(usb_tx, Level::Low, Speed::Low));

    let scl: pins::I2c1Scl = p.PB8;
    let sda: pins::I2c1Sda = p.PB9;
    let tx_dma: dma::I2c1Tx = p.DMA1_CH1;
    let rx_dma: dma::I2c1Rx = p.DMA1_CH2;
    let i2c = I2c::new(p.I2C1, scl, sda, Irqs, tx_dma, rx_dma, Hertz(I2C_FREQUENCY_HZ), Default::default());
    info!("I2C1 initialized at {} Hz", I2C_FREQUENCY_HZ);

    let descriptors = UsbDescriptors::new(UsbSettings::TINYG2, unique_id.hex_string().as_str(), UsbSpeed::Full);
    let dp: pins::UsbDp = p.PA12;
    let dm: pins::UsbDm = p.PA11;
    let driver = Driver::new(p.USB, Irqs, dp, dm);
    let device::SerialDevice { device, ports } = device::build(driver, &descriptors);
    let [primary, secondary] = ports;

    spawner.spawn(usb_task(device)).unwrap();
    spawner.spawn(serial_task(primary, 0)).unwrap();
    spawner.spawn(serial_task(secondary, 1)).unwrap();
    spawner.spawn(bootloader_task()).unwrap();
    spawner.spawn(usb_led_task(usb_leds)).unwrap();
    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(twi_task(I2cBus::new(i2c))).unwrap();

    info!("Tasks spawned");
}

/// Runs the USB control pipe
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

/// Services one CDC ACM port
#[embassy_executor::task(pool_size = 2)]
async fn serial_task(class: SerialClass, index: usize) -> ! {
    device::run_port(class, index).await
}

/// Resets the board after a 1200 baud touch
#[embassy_executor::task]
async fn bootloader_task() -> ! {
    device::bootloader_watch().await
}

/// Flashes the USB LEDs on traffic
#[embassy_executor::task]
async fn usb_led_task(mut leds: UsbLeds<'static>) -> ! {
    loop {
        match select(USB_ACTIVITY.receive(), Timer::after(Duration::from_millis(10))).await {
            Either::First(Activity::Rx) => leds.rx.pulse(),
            Either::First(Activity::Tx) => leds.tx.pulse(),
            Either::Second(()) => {}
        }
        leds.update();
    }
}

/// Reads the settings EEPROM header, then samples the pressure sensor
#[embassy_executor::task]
async fn twi_task(mut bus: I2cBus<'static>) {
    let mut eeprom = Eeprom::new(EEPROM_I2C_ADDR);
    eeprom.init();
    eeprom.set_handler(|worked| {
        if !worked {
            warn!("EEPROM transfer failed");
        }
    });

    let mut header = [0u8; 4];
    match eeprom.load(0, header.len()) {
        Ok(message) => match bus.service_eeprom(&mut eeprom, &message, &mut header).await {
            Ok(_) => info!("EEPROM header {:02x}", header),
            Err(e) => warn!("EEPROM not present: {}", e),
        },
        Err(e) => error!("EEPROM load refused: {}", e),
    }

    let (min, max) = PRESSURE_RANGE_PSI;
    let mut sensor = HoneywellSsc::new(
        SscBus::Twi(PRESSURE_I2C_ADDR),
        SscRange::ten_to_ninety(min, max, PressureUnits::Psi),
    );
    sensor.init();
    if let Some(transfer) = sensor.start_sampling(|_| {}) {
        bus.service_ssc(&mut sensor, transfer).await;
    }
    if sensor.needs_read() {
        info!("No pressure sensor at 0x{:02x}", PRESSURE_I2C_ADDR);
        return;
    }

    loop {
        Timer::after_millis(PRESSURE_SAMPLE_MS).await;
        if let Some(transfer) = sensor.start_sampling(|_| {}) {
            bus.service_ssc(&mut sensor, transfer).await;
        }
        debug!(
            "Pressure {} cmH2O, {} C",
            sensor.pressure(PressureUnits::CmH2O),
            sensor.temperature_c()
        );
    }
}

/// Blinks the status LED, 100 ms on and 900 ms off
#[embassy_executor::task]
async fn heartbeat_task(mut led: StatusLed<'static>) -> ! {
    loop {
        led.toggle();
        let hold = match led.state() {
            LedState::On => 100,
            LedState::Off => 900,
        };
        Timer::after_millis(hold).await;
    }
}
