//! Peripheral Driver Tests
//!
//! EEPROM and SSC pressure drivers driven through their bus callbacks,
//! plus venturi flow from a fixed differential pressure.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test driver_tests

use std::sync::atomic::{AtomicUsize, Ordering};

use g2_firmware::drivers::eeprom::Eeprom;
use g2_firmware::drivers::pressure::{
    FlowSensor, FlowUnits, HoneywellSsc, PressureSensor, PressureUnits, SscBus, SscRange, VenturiFlowSensor,
    AIR_DENSITY, DISCHARGE_COEFFICIENT, PSI_TO_CMH2O,
};
use g2_firmware::drivers::{Direction, SpiMessage, Transfer, TwiMessage, TWI_PAYLOAD};
use g2_firmware::error::Error;

fn close(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

// =============================================================================
// TWI Message Tests
// =============================================================================

#[test]
fn write_message_carries_payload() {
    let msg = TwiMessage::write(0x50, Some(0x0102), &[1, 2, 3]).unwrap();
    assert_eq!(msg.direction, Direction::Tx);
    assert_eq!(msg.len, 3);
    assert_eq!(msg.tx.as_slice(), &[1, 2, 3]);
    assert_eq!(msg.address_bytes(), Some([0x01, 0x02]));
}

#[test]
fn write_larger_than_page_rejected() {
    let data = [0u8; TWI_PAYLOAD + 1];
    assert_eq!(
        TwiMessage::write(0x50, None, &data),
        Err(Error::BufferTooSmall { needed: TWI_PAYLOAD + 1, available: TWI_PAYLOAD })
    );
}

#[test]
fn read_without_internal_address() {
    assert_eq!(TwiMessage::read(0x28, None, 4).address_bytes(), None);
}

// =============================================================================
// EEPROM Tests
// =============================================================================

#[test]
fn eeprom_one_transfer_at_a_time() {
    let mut eeprom = Eeprom::new(0x50);
    eeprom.init();

    let msg = eeprom.store(0x0040, b"G2").unwrap();
    assert_eq!(msg.device, 0x50);
    assert!(eeprom.is_busy());
    assert_eq!(eeprom.load(0, 2), Err(Error::Busy));

    eeprom.complete(true);
    assert!(!eeprom.is_busy());
    assert!(eeprom.load(0, 2).is_ok());
}

#[test]
fn eeprom_store_before_init() {
    let mut eeprom = Eeprom::new(0x50);
    assert_eq!(eeprom.store(0, &[1]), Err(Error::NotReady));
}

#[test]
fn eeprom_oversized_store_leaves_driver_idle() {
    let mut eeprom = Eeprom::new(0x50);
    eeprom.init();
    let result = eeprom.store(0, &[0xAA; TWI_PAYLOAD + 8]);
    assert!(matches!(result, Err(Error::BufferTooSmall { .. })));
    assert!(!eeprom.is_busy());
}

#[test]
fn eeprom_handler_runs_on_every_completion() {
    static WORKED: AtomicUsize = AtomicUsize::new(0);
    static FAILED: AtomicUsize = AtomicUsize::new(0);
    fn on_done(worked: bool) {
        let counter = if worked { &WORKED } else { &FAILED };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    let mut eeprom = Eeprom::new(0x50);
    eeprom.init();
    eeprom.load_with(0, 4, on_done).unwrap();
    eeprom.complete(true);
    eeprom.store(0, &[9]).unwrap();
    eeprom.complete(false);

    assert_eq!(WORKED.load(Ordering::SeqCst), 1);
    assert_eq!(FAILED.load(Ordering::SeqCst), 1);
}

#[test]
fn eeprom_store_with_replaces_handler() {
    static FIRST: AtomicUsize = AtomicUsize::new(0);
    static SECOND: AtomicUsize = AtomicUsize::new(0);
    fn first(_: bool) {
        FIRST.fetch_add(1, Ordering::SeqCst);
    }
    fn second(worked: bool) {
        if worked {
            SECOND.fetch_add(1, Ordering::SeqCst);
        }
    }

    let mut eeprom = Eeprom::new(0x50);
    eeprom.init();
    eeprom.set_handler(first);

    let msg = eeprom.store_with(0x0100, &[1, 2, 3, 4], second).unwrap();
    assert_eq!(msg.direction, Direction::Tx);
    assert_eq!(msg.address_bytes(), Some([0x01, 0x00]));
    assert_eq!(msg.tx.as_slice(), &[1, 2, 3, 4]);
    eeprom.complete(true);

    assert_eq!(FIRST.load(Ordering::SeqCst), 0);
    assert_eq!(SECOND.load(Ordering::SeqCst), 1);
}

#[test]
fn eeprom_store_with_refused_while_busy() {
    let mut eeprom = Eeprom::new(0x50);
    eeprom.init();
    eeprom.load(0, 1).unwrap();
    assert_eq!(eeprom.store_with(0, &[1], noop), Err(Error::Busy));
}

// =============================================================================
// SSC Pressure Tests
// =============================================================================

/// +-1 psi part, 10-90 % transfer function
fn range() -> SscRange {
    SscRange::ten_to_ninety(-1.0, 1.0, PressureUnits::Psi)
}

fn frame(status: u8, bridge: u16) -> [u8; 4] {
    let [hi, lo] = bridge.to_be_bytes();
    [(status << 6) | (hi & 0x3F), lo, 0, 0]
}

fn noop(_: bool) {}

#[test]
fn range_endpoints() {
    let r = range();
    assert!(close(r.scale(0x0666), -1.0, 1e-6));
    assert!(close(r.scale(0x3999), 1.0, 1e-6));
    assert!(r.contains(0x2000));
    assert!(!r.contains(0x3FFF));
}

#[test]
fn ssc_waits_for_init() {
    let mut ssc = HoneywellSsc::new(SscBus::Spi, range());
    assert_eq!(ssc.start_sampling(noop), None);
    assert!(ssc.needs_read());

    ssc.init();
    assert_eq!(ssc.poll(), Some(Transfer::Spi(SpiMessage { len: 4 })));
    assert!(ssc.is_busy());
    assert_eq!(ssc.poll(), None);
}

#[test]
fn ssc_over_twi() {
    let mut ssc = HoneywellSsc::new(SscBus::Twi(0x28), range());
    ssc.init();
    assert_eq!(ssc.start_sampling(noop), Some(Transfer::Twi(TwiMessage::read(0x28, None, 4))));
}

#[test]
fn ssc_filters_and_converts() {
    let mut ssc = HoneywellSsc::new(SscBus::Spi, range());
    ssc.init();
    ssc.start_sampling(noop);
    ssc.complete(true, &frame(0, 0x3999));

    assert!(close(ssc.pressure(PressureUnits::Psi), 0.1, 1e-5));
    assert!(close(ssc.pressure(PressureUnits::CmH2O), 0.1 * PSI_TO_CMH2O, 1e-3));
    assert!(ssc.pressure(PressureUnits::Pa) > 689.0);
}

#[test]
fn ssc_handler_runs_once() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    fn on_sample(_: bool) {
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    let mut ssc = HoneywellSsc::new(SscBus::Spi, range());
    ssc.init();
    ssc.start_sampling(on_sample);
    ssc.complete(true, &frame(0, 0x2000));

    // A later read without a new request does not call it again
    assert_eq!(ssc.poll(), None);
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn ssc_stale_frame_rearms() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    fn on_sample(_: bool) {
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    let mut ssc = HoneywellSsc::new(SscBus::Spi, range());
    ssc.init();
    ssc.start_sampling(noop);
    ssc.complete(true, &frame(0, 0x2000));

    ssc.start_sampling(on_sample);
    ssc.complete(true, &frame(0b10, 0x2000));
    assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    assert!(ssc.needs_read());

    assert!(ssc.poll().is_some());
    ssc.complete(true, &frame(0, 0x2000));
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn ssc_first_sample_may_be_stale() {
    let mut ssc = HoneywellSsc::new(SscBus::Spi, range());
    ssc.init();
    ssc.start_sampling(noop);
    ssc.complete(true, &frame(0b10, 0x3999));
    assert!(!ssc.needs_read());
    assert!(ssc.pressure(PressureUnits::Psi) > 0.0);
}

#[test]
fn ssc_failed_read_rearms() {
    let mut ssc = HoneywellSsc::new(SscBus::Spi, range());
    ssc.init();
    ssc.start_sampling(noop);
    ssc.complete(false, &frame(0, 0x3999));
    assert!(ssc.needs_read());
    assert!(!ssc.is_busy());

    ssc.poll();
    ssc.complete(true, &[0x39]);
    assert!(ssc.needs_read(), "short read is retried");
}

#[test]
fn ssc_cancelled_transfer_frees_sensor() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    fn on_sample(_: bool) {
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    let mut ssc = HoneywellSsc::new(SscBus::Spi, range());
    ssc.init();
    assert_eq!(ssc.start_sampling(on_sample), Some(Transfer::Spi(SpiMessage { len: 4 })));

    // No SPI bus to run it on
    ssc.cancel();
    assert!(!ssc.is_busy());
    assert!(ssc.needs_read());
    assert_eq!(CALLS.load(Ordering::SeqCst), 0);

    assert_eq!(ssc.poll(), Some(Transfer::Spi(SpiMessage { len: 4 })));
    ssc.complete(true, &frame(0, 0x2000));
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn ssc_tracks_zero_inside_noise_band() {
    let mut ssc = HoneywellSsc::new(SscBus::Spi, range());
    ssc.init();
    for _ in 0..10 {
        ssc.start_sampling(noop);
        ssc.complete(true, &frame(0, 8192));
    }
    assert!(ssc.zero_offset() > 0.0);
    assert!(ssc.zero_offset() < 7.7e-5);

    ssc.start_sampling(noop);
    ssc.complete(true, &frame(0, 0x3999));
    assert!(ssc.zero_offset() < 1e-5, "full scale is outside the band");
}

#[test]
fn ssc_out_of_range_resets_filter() {
    let mut ssc = HoneywellSsc::new(SscBus::Spi, range());
    ssc.init();
    for _ in 0..20 {
        ssc.start_sampling(noop);
        ssc.complete(true, &frame(0, 0x3999));
    }
    assert!(ssc.pressure(PressureUnits::Psi) > 0.8);

    ssc.start_sampling(noop);
    ssc.complete(true, &frame(0, 0x3FFF));
    let expected = range().scale(0x3FFF) * 0.1;
    assert!(close(ssc.pressure(PressureUnits::Psi), expected, 1e-4));
}

#[test]
fn ssc_temperature() {
    let mut ssc = HoneywellSsc::new(SscBus::Spi, range());
    ssc.init();
    ssc.start_sampling(noop);
    // 0x3FF counts, roughly mid-scale
    ssc.complete(true, &[0x20, 0x00, 0x7F, 0xE0]);
    assert!(close(ssc.temperature_c(), 1023.0 / 2047.0 * 200.0 - 50.0, 1e-3));
}

// =============================================================================
// Venturi Flow Tests
// =============================================================================

/// Differential pressure source reporting a fixed value in Pa
struct Fixed(f32);

impl PressureSensor for Fixed {
    fn pressure(&self, _units: PressureUnits) -> f32 {
        self.0
    }
}

#[test]
fn flow_from_differential_pressure() {
    let venturi = VenturiFlowSensor::new(Fixed(100.0), 0.5);
    assert!(close(venturi.flow(FlowUnits::Slm), 300.0, 1e-3));
    assert!(close(venturi.flow(FlowUnits::Lpm), 300.0, 1e-3));
    assert_eq!(venturi.flow(FlowUnits::Nlpm), 0.0);
}

#[test]
fn reverse_flow_is_negative() {
    let venturi = VenturiFlowSensor::new(Fixed(-100.0), 0.5);
    assert!(close(venturi.flow(FlowUnits::Slm), -300.0, 1e-3));
}

#[test]
fn no_pressure_no_flow() {
    let venturi = VenturiFlowSensor::new(Fixed(0.0), 0.5);
    assert_eq!(venturi.flow(FlowUnits::Lpm), 0.0);
}

#[test]
fn k_from_geometry() {
    let k = VenturiFlowSensor::<Fixed>::compute_k(20.0, 10.0, AIR_DENSITY, DISCHARGE_COEFFICIENT);
    assert!(close(k, 0.097_74, 1e-4));

    let venturi = VenturiFlowSensor::from_geometry(Fixed(0.0), 20.0, 10.0);
    assert!(close(venturi.k(), k, 1e-6));
}

#[test]
fn flow_sensor_passes_pressure_through() {
    let mut venturi = VenturiFlowSensor::new(Fixed(42.0), 1.0);
    assert_eq!(venturi.pressure(PressureUnits::Pa), 42.0);
    venturi.sensor_mut().0 = 7.0;
    assert_eq!(venturi.sensor().0, 7.0);
}
