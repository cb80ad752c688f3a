//! Machine Profile Tests
//!
//! Built-in profiles, derived rotary axes and range checking.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test machine_tests

use g2_firmware::error::Error;
use g2_firmware::machine::{
    self, Axis, AxisMode, HomingDirection, InputAction, InputFunction, InputMode, MachineId, MachineProfile,
    MotorPowerMode, Polarity, ProfileField,
};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= b.abs() * 1e-5 + 1e-5
}

// =============================================================================
// Profile Integrity Tests
// =============================================================================

#[test]
fn every_profile_validates() {
    for id in MachineId::ALL {
        let profile = id.profile();
        assert_eq!(profile.validate(), Ok(()), "{}", profile.name);
    }
}

#[test]
fn default_build_uses_default_profile() {
    assert_eq!(machine::active().name, "Default");
}

#[test]
fn default_profile_is_idle() {
    let p = MachineId::Default.profile();
    assert!(Axis::ALL.iter().all(|&a| p.axis(a).mode == AxisMode::Disabled));
    assert!(p.motors.iter().all(|m| m.power_mode == MotorPowerMode::Disabled));
    assert_eq!(p.motor(3).map(|m| m.polarity), Some(Polarity::Reversed));
    assert_eq!(p.input(9).map(|i| i.mode), Some(InputMode::NORMALLY_CLOSED));
    assert_eq!(p.input(1).map(|i| i.mode), Some(InputMode::NORMALLY_OPEN));
}

#[test]
fn one_based_lookups() {
    let p = MachineId::Default.profile();
    assert!(p.motor(0).is_none());
    assert!(p.motor(7).is_none());
    assert!(p.input(0).is_none());
    assert!(p.input(12).is_some());
    assert!(p.input(13).is_none());
}

// =============================================================================
// Steps Per Unit Tests
// =============================================================================

#[test]
fn belt_drive_steps_per_mm() {
    // 1.8 degree motor, 8 microsteps, 40 mm per revolution
    let p = MachineId::Shapeoko2.profile();
    assert!(close(p.motors[0].steps_per_unit(), 40.0));
}

#[test]
fn leadscrew_steps_per_mm() {
    let p = MachineId::Zen7x12.profile();
    assert!(close(p.motors[0].steps_per_unit(), 1280.0));
}

// =============================================================================
// Named Profile Tests
// =============================================================================

#[test]
fn shapeoko2_dual_y() {
    let p = MachineId::Shapeoko2.profile();
    assert!(!p.global.hard_limit_enable);
    assert!(!p.coolant.pause_on_hold);

    let y: Vec<_> = p.motors_for(Axis::Y).map(|(n, m)| (n, m.polarity)).collect();
    assert_eq!(y, [(2, Polarity::Normal), (3, Polarity::Reversed)]);

    let z = p.axis(Axis::Z);
    assert_eq!(z.homing_input, 6);
    assert_eq!(z.homing_direction, HomingDirection::Positive);
    assert!(close(z.travel_min, -95.0));
    assert!(close(z.search_velocity, 1200.0 * 0.666_66));
    assert!(close(p.motors[3].power_level, 0.75));
}

#[test]
fn shapeoko2_inputs() {
    let p = MachineId::Shapeoko2.profile();
    for n in [1, 2, 3, 4, 6] {
        let input = p.input(n).unwrap();
        assert_eq!(input.mode, InputMode::NORMALLY_CLOSED, "input {n}");
        assert_eq!(input.function, InputFunction::Limit, "input {n}");
    }
    assert_eq!(p.input(5).unwrap().mode, InputMode::ActiveHigh);
    for n in 7..=9 {
        assert_eq!(p.input(n).unwrap().mode, InputMode::Disabled, "input {n}");
    }
}

#[test]
fn zen7x12_axes() {
    let p = MachineId::Zen7x12.profile();
    assert!(close(p.axis(Axis::X).travel_max, 475.0));
    assert!(close(p.axis(Axis::Y).travel_max, 200.0));
    let z = p.axis(Axis::Z);
    assert!(close(z.velocity_max, 500.0));
    assert!(close(z.search_velocity, 400.0));
    assert!(close(z.latch_backoff, 2.0));
    assert!(close(z.zero_backoff, 1.0));
    assert_eq!(p.motor(2).map(|m| m.polarity), Some(Polarity::Normal));
}

#[test]
fn othermill_interlock_and_shutdown() {
    let p = MachineId::Othermill.profile();
    assert!(close(p.spindle.dwell_time, 1.5));

    let shutdown = p.input(2).unwrap();
    assert_eq!(shutdown.action, InputAction::Halt);
    assert_eq!(shutdown.function, InputFunction::Shutdown);
    assert_eq!(p.input(4).unwrap().function, InputFunction::Interlock);

    assert!(close(p.axis(Axis::X).travel_max, 145.6));
    assert!(close(p.axis(Axis::Y).travel_max, 119.1));
    assert!(close(p.axis(Axis::Z).travel_min, -60.1));
    assert!(close(p.motors[0].travel_per_rev, 4.8768));
}

// =============================================================================
// Rotary Axis Tests
// =============================================================================

#[test]
fn rotary_axes_follow_motor_1_and_x() {
    let p = MachineId::Shapeoko2.profile();
    let a = p.axis(Axis::A);
    assert!(close(a.velocity_max, 50000.0 / 40.0 * 360.0));
    assert!(close(a.jerk_max, 5000.0 * 360.0 / 40.0));
    assert!(close(a.radius, 40.0 / (2.0 * core::f32::consts::PI)));
    assert_eq!(p.axis(Axis::B), a);
    assert_eq!(p.axis(Axis::C), a);
}

#[test]
fn rotary_axes_differ_per_machine() {
    let shapeoko = MachineId::Shapeoko2.profile();
    let zen = MachineId::Zen7x12.profile();
    assert!(!close(shapeoko.axis(Axis::A).velocity_max, zen.axis(Axis::A).velocity_max));
}

// =============================================================================
// Validation Failure Tests
// =============================================================================

fn shapeoko() -> MachineProfile {
    MachineId::Shapeoko2.profile()
}

#[test]
fn rejects_odd_microsteps() {
    let mut p = shapeoko();
    p.motors[1].microsteps = 3;
    assert_eq!(p.validate(), Err(Error::InvalidMotorSetting { motor: 2, field: ProfileField::Microsteps }));
}

#[test]
fn rejects_power_above_one() {
    let mut p = shapeoko();
    p.motors[4].power_level = 1.5;
    assert_eq!(p.validate(), Err(Error::InvalidMotorSetting { motor: 5, field: ProfileField::PowerLevel }));
}

#[test]
fn rejects_zero_travel_per_rev() {
    let mut p = shapeoko();
    p.motors[0].travel_per_rev = 0.0;
    assert_eq!(p.validate(), Err(Error::InvalidMotorSetting { motor: 1, field: ProfileField::TravelPerRev }));
}

#[test]
fn rejects_inverted_travel() {
    let mut p = shapeoko();
    p.axes[Axis::Y.index()].travel_min = 500.0;
    assert_eq!(p.validate(), Err(Error::InvalidAxisSetting { axis: Axis::Y, field: ProfileField::Travel }));
}

#[test]
fn rejects_unknown_homing_input() {
    let mut p = shapeoko();
    p.axes[Axis::Z.index()].homing_input = 13;
    assert_eq!(p.validate(), Err(Error::InvalidHomingInput(Axis::Z)));
}

#[test]
fn disabled_axis_skips_limits() {
    let mut p = MachineId::Default.profile();
    p.axes[Axis::X.index()].velocity_max = 0.0;
    assert_eq!(p.validate(), Ok(()));

    p.axes[Axis::X.index()].mode = AxisMode::Standard;
    assert_eq!(p.validate(), Err(Error::InvalidAxisSetting { axis: Axis::X, field: ProfileField::VelocityMax }));
}
