//! Board Pinout Tests
//!
//! Table integrity for every supported board plus the lookup helpers.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test board_tests

use g2_firmware::board::{
    self, assign, Assignment, BoardId, BoardPinout, LogicalPin, MotorSignal, PhysicalPin, PinCapability, Port,
    TimerKind, GSHIELD, G2V9D, G2V9I, SBV300, UNASSIGNED,
};
use g2_firmware::error::Error;

// =============================================================================
// Table Integrity Tests
// =============================================================================

#[test]
fn every_board_validates() {
    for id in BoardId::ALL {
        assert_eq!(id.pinout().validate(), Ok(()), "{}", id.name());
    }
}

#[test]
fn required_signals_are_step_and_dir() {
    for id in BoardId::ALL {
        let pinout = id.pinout();
        let required: Vec<_> = pinout.required().collect();
        assert_eq!(required.len(), 2 * usize::from(pinout.motor_count));
        assert_eq!(required[0], LogicalPin::step(1));
        assert_eq!(required[1], LogicalPin::dir(1));
    }
}

#[test]
fn motor_counts() {
    assert_eq!(GSHIELD.motor_count, 6);
    assert_eq!(SBV300.motor_count, 6);
    assert_eq!(G2V9I.motor_count, 4);
    assert_eq!(G2V9D.motor_count, 5);
}

#[test]
fn board_names() {
    assert_eq!(BoardId::GShield.name(), "gShield");
    assert_eq!(BoardId::Sbv300.name(), "SBV300");
    assert_eq!(BoardId::G2v9i.name(), "G2 v9i");
    assert_eq!(BoardId::G2v9d.name(), "G2 v9d");
}

#[test]
fn default_build_uses_gshield() {
    assert_eq!(board::active().name, "gShield");
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn gshield_step_1_is_due_pin_2() {
    assert_eq!(GSHIELD.pin_number(LogicalPin::step(1)), 2);
    let pin = GSHIELD.resolve(LogicalPin::step(1)).unwrap();
    assert_eq!((pin.port, pin.bit), (Port::B, 25));
    assert_eq!(pin.mask(), 1 << 25);
    assert_eq!(pin.pwm_output().map(|o| o.timer), Some(TimerKind::Tc));
}

#[test]
fn gshield_socket_2_slave_select_unassigned() {
    let ss = LogicalPin::motor(2, MotorSignal::SpiSlaveSelect);
    assert_eq!(GSHIELD.pin_number(ss), UNASSIGNED);
    assert_eq!(GSHIELD.resolve(ss), None);
    assert_eq!(GSHIELD.pin_number(LogicalPin::Input(11)), 65);
}

#[test]
fn v9_revisions_share_fin_numbering() {
    for pinout in [&G2V9I, &G2V9D] {
        assert_eq!(pinout.pin_number(LogicalPin::step(1)), 12);
        assert_eq!(pinout.pin_number(LogicalPin::dir(3)), 33);
        assert_eq!(pinout.pin_number(LogicalPin::Input(1)), 100);
        assert_eq!(pinout.pin_number(LogicalPin::SpindleEnable), 112);
    }
}

#[test]
fn v9_revisions_wire_differently() {
    let v9i = G2V9I.resolve(LogicalPin::step(1)).unwrap();
    let v9d = G2V9D.resolve(LogicalPin::step(1)).unwrap();
    assert_ne!((v9i.port, v9i.bit), (v9d.port, v9d.bit));
}

#[test]
fn v9i_has_no_fifth_step() {
    assert_eq!(G2V9I.pin_number(LogicalPin::step(5)), 52);
    assert!(G2V9I.resolve(LogicalPin::step(5)).is_none());
    assert!(G2V9D.resolve(LogicalPin::step(5)).is_some());
}

#[test]
fn negative_number_has_no_physical_pin() {
    assert_eq!(GSHIELD.physical(UNASSIGNED), None);
}

#[test]
fn sbv300_debug_pins_are_null() {
    let unresolved: Vec<_> = SBV300.unresolved().map(|a| a.logical).collect();
    assert_eq!(unresolved, [LogicalPin::Debug(2), LogicalPin::Debug(3)]);
    assert!(SBV300.assigned().any(|a| a.logical == LogicalPin::Debug(2)));
}

#[test]
fn spi_chip_select_pins() {
    let selects: Vec<_> = GSHIELD
        .spi_chip_selects()
        .map(|p| match p.capability {
            PinCapability::SpiChipSelect(cs) => cs,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(selects.len(), 4);
    for cs in 0..4 {
        assert!(selects.contains(&cs));
    }
    assert_eq!(SBV300.spi_chip_selects().count(), 0);
}

// =============================================================================
// Validation Failure Tests
// =============================================================================

static TEST_PINS: [PhysicalPin; 4] = [
    PhysicalPin::gpio(0, Port::A, 0),
    PhysicalPin::gpio(1, Port::A, 1),
    PhysicalPin::gpio(2, Port::A, 0),
    PhysicalPin::gpio(3, Port::B, 3),
];

static MISSING_DIR: [Assignment; 1] = [assign(LogicalPin::step(1), 0)];

static SHARED_NUMBER: [Assignment; 3] = [
    assign(LogicalPin::step(1), 0),
    assign(LogicalPin::dir(1), 1),
    assign(LogicalPin::Input(1), 1),
];

static SHARED_BIT: [Assignment; 3] = [
    assign(LogicalPin::step(1), 0),
    assign(LogicalPin::dir(1), 1),
    assign(LogicalPin::Input(4), 2),
];

static NULL_DIR: [Assignment; 2] = [assign(LogicalPin::step(1), 0), assign(LogicalPin::dir(1), 9)];

fn test_board(assignments: &'static [Assignment]) -> BoardPinout {
    BoardPinout { name: "test", motor_count: 1, assignments, pins: &TEST_PINS }
}

#[test]
fn missing_required_signal() {
    assert_eq!(test_board(&MISSING_DIR).validate(), Err(Error::PinMissing(LogicalPin::dir(1))));
}

#[test]
fn required_signal_on_null_pin() {
    assert_eq!(test_board(&NULL_DIR).validate(), Err(Error::PinMissing(LogicalPin::dir(1))));
}

#[test]
fn shared_pin_number_conflicts() {
    assert_eq!(
        test_board(&SHARED_NUMBER).validate(),
        Err(Error::PinConflict(LogicalPin::dir(1), LogicalPin::Input(1)))
    );
}

#[test]
fn shared_port_bit_conflicts() {
    assert_eq!(
        test_board(&SHARED_BIT).validate(),
        Err(Error::PinConflict(LogicalPin::step(1), LogicalPin::Input(4)))
    );
}

#[test]
fn unlisted_signal_is_unassigned() {
    let board = test_board(&MISSING_DIR);
    assert_eq!(board.pin_number(LogicalPin::CoolantEnable), UNASSIGNED);
    assert_eq!(board.assigned().count(), 1);
}
