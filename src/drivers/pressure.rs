//! Honeywell TruStability SSC pressure sensors and venturi flow
//!
//! The SSC returns a 4-byte frame:
//!
//! ```text
//! byte 0   [S1 S0 B13..B8]   status, bridge high bits
//! byte 1   [B7..B0]          bridge low bits
//! byte 2   [T10..T3]         temperature high bits
//! byte 3   [T2 T1 T0 x x x x x]
//! ```
//!
//! Status `0b10` marks a sample the sensor already reported once.

use micromath::F32Ext;

use super::{Handler, SpiMessage, Transfer, TwiMessage};

/// Frame length
pub const FRAME_LEN: usize = 4;

/// Status bits of a repeated sample
pub const STATUS_STALE: u8 = 0b10;

/// Zero-tracking window as a fraction of span
pub const NOISE_FRACTION: f32 = 0.0025;

/// PSI to cmH2O
pub const PSI_TO_CMH2O: f32 = 70.306_96;

/// PSI to pascal
pub const PSI_TO_PA: f32 = 6_894.757_5;

/// Air density at sea level, kg/m^3
pub const AIR_DENSITY: f32 = 1.2431;

/// Discharge coefficient of a machined venturi
pub const DISCHARGE_COEFFICIENT: f32 = 0.95;

/// Pressure units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum PressureUnits {
    /// Pounds per square inch
    Psi,
    /// Centimeters of water
    CmH2O,
    /// Inches of water
    InH2O,
    /// Pascal
    Pa,
    /// Kilopascal
    KPa,
}

/// Flow units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum FlowUnits {
    /// Liters per minute
    Lpm,
    /// Standard liters per minute
    Slm,
    /// Normal liters per minute
    Nlpm,
}

/// Anything that reports a pressure
pub trait PressureSensor {
    /// Current pressure in `units`
    fn pressure(&self, units: PressureUnits) -> f32;
}

/// Anything that reports a flow
pub trait FlowSensor: PressureSensor {
    /// Current flow in `units`
    fn flow(&self, units: FlowUnits) -> f32;
}

/// Bus the sensor sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum SscBus {
    /// SPI, mode 0
    Spi,
    /// TWI at a 7-bit address
    Twi(u8),
}

/// Transfer function from output counts to pressure
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SscRange {
    /// Output counts at `min_value`
    pub min_output: u16,
    /// Output counts at `max_value`
    pub max_output: u16,
    /// Pressure at `min_output`
    pub min_value: f32,
    /// Pressure at `max_output`
    pub max_value: f32,
    /// Units of `min_value` and `max_value`
    pub units: PressureUnits,
}

impl SscRange {
    /// 10 % to 90 % transfer function used by most SSC parts
    #[must_use]
    pub const fn ten_to_ninety(min_value: f32, max_value: f32, units: PressureUnits) -> Self {
        Self { min_output: 0x0666, max_output: 0x3999, min_value, max_value, units }
    }

    /// Pressure for a bridge count
    #[must_use]
    pub fn scale(&self, bridge: u16) -> f32 {
        let counts = f32::from(bridge) - f32::from(self.min_output);
        let output_span = f32::from(self.max_output) - f32::from(self.min_output);
        counts * self.span() / output_span + self.min_value
    }

    /// Pressure span
    #[must_use]
    pub fn span(&self) -> f32 {
        self.max_value - self.min_value
    }

    /// Bridge counts inside the calibrated window
    #[must_use]
    pub fn contains(&self, bridge: u16) -> bool {
        (self.min_output..=self.max_output).contains(&bridge)
    }
}

/// A decoded frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SscFrame {
    /// Status bits
    pub status: u8,
    /// 14-bit bridge count
    pub bridge: u16,
    /// 11-bit temperature count
    pub temperature: u16,
}

impl SscFrame {
    /// Decode the first four bytes; a 2-byte read has no temperature
    #[must_use]
    pub fn parse(rx: &[u8]) -> Option<Self> {
        let (&b0, &b1) = (rx.first()?, rx.get(1)?);
        let temperature = match (rx.get(2), rx.get(3)) {
            (Some(&t0), Some(&t1)) => (u16::from(t0) << 3) | u16::from(t1 >> 5),
            _ => 0,
        };
        Some(Self { status: b0 >> 6, bridge: (u16::from(b0 & 0x3F) << 8) | u16::from(b1), temperature })
    }

    /// Sample was already reported
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.status == STATUS_STALE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Initing,
    Sampling,
}

/// SSC sampler
#[derive(Debug)]
pub struct HoneywellSsc {
    bus: SscBus,
    range: SscRange,
    state: State,
    zero_offset: f32,
    pressure: f32,
    temperature: u16,
    needs_read: bool,
    transmitting: bool,
    inited: bool,
    handler: Option<Handler>,
}

impl HoneywellSsc {
    /// Sampler for a sensor on `bus`; call [`HoneywellSsc::init`] before use
    #[must_use]
    pub const fn new(bus: SscBus, range: SscRange) -> Self {
        Self {
            bus,
            range,
            state: State::Initing,
            zero_offset: 0.0,
            pressure: 0.0,
            temperature: 0,
            needs_read: false,
            transmitting: false,
            inited: false,
            handler: None,
        }
    }

    /// Enable transfers
    pub fn init(&mut self) {
        self.inited = true;
    }

    /// Transfer function
    #[must_use]
    pub const fn range(&self) -> &SscRange {
        &self.range
    }

    /// A read is in flight
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.transmitting
    }

    /// A read is wanted but not yet issued
    #[must_use]
    pub const fn needs_read(&self) -> bool {
        self.needs_read
    }

    /// Tracked zero offset, base units
    #[must_use]
    pub const fn zero_offset(&self) -> f32 {
        self.zero_offset
    }

    /// Die temperature in °C from the last frame
    #[must_use]
    pub fn temperature_c(&self) -> f32 {
        f32::from(self.temperature) / 2047.0 * 200.0 - 50.0
    }

    /// Request a sample; `handler` runs once, after it is processed
    pub fn start_sampling(&mut self, handler: Handler) -> Option<Transfer> {
        self.handler = Some(handler);
        self.needs_read = true;
        self.poll()
    }

    /// Issue the pending read, if any and the bus is free
    pub fn poll(&mut self) -> Option<Transfer> {
        if self.transmitting || !self.inited || !self.needs_read {
            return None;
        }
        self.needs_read = false;
        self.transmitting = true;
        Some(match self.bus {
            SscBus::Spi => Transfer::Spi(SpiMessage { len: FRAME_LEN }),
            SscBus::Twi(device) => Transfer::Twi(TwiMessage::read(device, None, FRAME_LEN)),
        })
    }

    /// Bus callback with the bytes read
    ///
    /// A failed or short read is re-armed. A stale frame after the first
    /// sample is also re-armed and leaves the handler pending.
    pub fn complete(&mut self, worked: bool, rx: &[u8]) {
        self.transmitting = false;
        let frame = match SscFrame::parse(rx) {
            Some(frame) if worked => frame,
            _ => {
                self.needs_read = true;
                return;
            }
        };
        if self.state != State::Initing && frame.is_stale() {
            self.needs_read = true;
            return;
        }
        self.state = State::Sampling;
        self.process(frame);
        if let Some(handler) = self.handler.take() {
            handler(true);
        }
    }

    /// Hand back a transfer that was never run; the read is retried
    pub fn cancel(&mut self) {
        self.complete(false, &[]);
    }

    fn process(&mut self, frame: SscFrame) {
        if !self.range.contains(frame.bridge) {
            self.pressure = 0.0;
        }
        let sample = self.range.scale(frame.bridge);
        let noise = self.range.span() * NOISE_FRACTION;
        if sample > -noise && sample < noise {
            self.zero_offset = self.zero_offset * 0.999 + sample * 0.001;
        }
        self.pressure = self.pressure * 0.9 + (sample - self.zero_offset) * 0.1;
        self.temperature = frame.temperature;
    }
}

impl PressureSensor for HoneywellSsc {
    fn pressure(&self, units: PressureUnits) -> f32 {
        match (self.range.units, units) {
            (PressureUnits::Psi, PressureUnits::CmH2O) => self.pressure * PSI_TO_CMH2O,
            (PressureUnits::Psi, PressureUnits::Pa) => self.pressure * PSI_TO_PA,
            _ => self.pressure,
        }
    }
}

/// Flow through a venturi from its differential pressure
#[derive(Debug)]
pub struct VenturiFlowSensor<P> {
    sensor: P,
    k: f32,
}

impl<P: PressureSensor> VenturiFlowSensor<P> {
    /// Flow sensor with a precomputed `k`
    pub const fn new(sensor: P, k: f32) -> Self {
        Self { sensor, k }
    }

    /// Flow sensor with `k` from the tube diameters in mm
    pub fn from_geometry(sensor: P, upstream_mm: f32, throat_mm: f32) -> Self {
        Self::new(sensor, Self::compute_k(upstream_mm, throat_mm, AIR_DENSITY, DISCHARGE_COEFFICIENT))
    }

    /// Flow constant, m^3/s per sqrt(Pa) scaled to liters
    #[must_use]
    pub fn compute_k(upstream_mm: f32, throat_mm: f32, air_density: f32, discharge_coefficient: f32) -> f32 {
        let area = |diameter_mm: f32| {
            let radius_m = diameter_mm / 1000.0 / 2.0;
            radius_m * radius_m * core::f32::consts::PI
        };
        let upstream = area(upstream_mm);
        let ratio = upstream / area(throat_mm);
        discharge_coefficient * F32Ext::sqrt(2.0 / air_density) * upstream / F32Ext::sqrt(ratio * ratio - 1.0)
            * 1000.0
    }

    /// Flow constant
    #[must_use]
    pub const fn k(&self) -> f32 {
        self.k
    }

    /// Wrapped pressure sensor
    pub const fn sensor(&self) -> &P {
        &self.sensor
    }

    /// Wrapped pressure sensor
    pub fn sensor_mut(&mut self) -> &mut P {
        &mut self.sensor
    }
}

impl<P: PressureSensor> PressureSensor for VenturiFlowSensor<P> {
    fn pressure(&self, units: PressureUnits) -> f32 {
        self.sensor.pressure(units)
    }
}

impl<P: PressureSensor> FlowSensor for VenturiFlowSensor<P> {
    fn flow(&self, units: FlowUnits) -> f32 {
        let diff = self.sensor.pressure(PressureUnits::Pa);
        let sign = if diff < 0.0 { -1.0 } else { 1.0 };
        let flow = self.k * F32Ext::sqrt(F32Ext::abs(diff)) * sign;
        match units {
            FlowUnits::Lpm | FlowUnits::Slm => flow * 60.0,
            FlowUnits::Nlpm => 0.0,
        }
    }
}
