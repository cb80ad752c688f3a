//! GPIO Abstractions
//!
//! Status and USB activity LEDs.

use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Instant};

/// Whether an LED is lit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, defmt::Format)]
pub enum LedState {
    /// LED is off
    #[default]
    Off,
    /// LED is on
    On,
}

/// Single LED on a push-pull output
pub struct StatusLed<'d> {
    pin: Output<'d>,
    state: LedState,
}

impl<'d> StatusLed<'d> {
    /// Wrap an output, LED off
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin, state: LedState::Off }
    }

    /// Light it
    pub fn on(&mut self) {
        self.pin.set_high();
        self.state = LedState::On;
    }

    /// Turn it off
    pub fn off(&mut self) {
        self.pin.set_low();
        self.state = LedState::Off;
    }

    /// Flip between on and off
    pub fn toggle(&mut self) {
        match self.state {
            LedState::Off => self.on(),
            LedState::On => self.off(),
        }
    }

    /// Whether it is lit
    #[must_use]
    pub const fn state(&self) -> LedState {
        self.state
    }
}

/// How long an activity LED stays lit after traffic
pub const ACTIVITY_FLASH: Duration = Duration::from_millis(30);

/// An LED that flashes on traffic and turns itself off
pub struct ActivityLed<'d> {
    led: StatusLed<'d>,
    off_at: Option<Instant>,
}

impl<'d> ActivityLed<'d> {
    /// Wrap an output
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        Self { led: StatusLed::new(pin), off_at: None }
    }

    /// Light the LED for [`ACTIVITY_FLASH`]
    pub fn pulse(&mut self) {
        self.led.on();
        self.off_at = Some(Instant::now() + ACTIVITY_FLASH);
    }

    /// Turn the LED off once its flash has expired
    pub fn update(&mut self) {
        if self.off_at.is_some_and(|at| Instant::now() >= at) {
            self.led.off();
            self.off_at = None;
        }
    }
}

/// USB receive and transmit LEDs
pub struct UsbLeds<'d> {
    /// Lit on host-to-device data
    pub rx: ActivityLed<'d>,
    /// Lit on device-to-host data
    pub tx: ActivityLed<'d>,
}

impl<'d> UsbLeds<'d> {
    /// Both LEDs, initially off
    #[must_use]
    pub fn new(rx: Output<'d>, tx: Output<'d>) -> Self {
        Self { rx: ActivityLed::new(rx), tx: ActivityLed::new(tx) }
    }

    /// Expire both flashes
    pub fn update(&mut self) {
        self.rx.update();
        self.tx.update();
    }
}
