//! Profile tables
//!
//! Every machine starts from [`default_profile`] and overrides what differs.
//! Rotary axes are derived from motor 1 and the X axis after the overrides
//! are applied.

use super::{
    ActiveLevel, Axis, AxisMode, AxisSettings, CoolantSettings, GlobalSettings, HomingDirection, InputAction,
    InputFunction, InputMode, InputSettings, MachineProfile, MotorPowerMode, MotorSettings, Polarity,
    SpindleSettings, DIGITAL_INPUTS,
};

const PI: f32 = 3.141_596_3;

const fn motor(axis: Axis, travel_per_rev: f32, polarity: Polarity) -> MotorSettings {
    MotorSettings {
        axis,
        step_angle: 1.8,
        travel_per_rev,
        microsteps: 8,
        polarity,
        power_mode: MotorPowerMode::Disabled,
        power_level: 0.0,
    }
}

const fn linear(velocity_max: f32, jerk: f32, search_velocity: f32, latch_velocity: f32) -> AxisSettings {
    AxisSettings {
        mode: AxisMode::Disabled,
        velocity_max,
        feedrate_max: velocity_max,
        travel_min: 0.0,
        travel_max: 0.0,
        jerk_max: jerk,
        jerk_high_speed: jerk,
        homing_input: 0,
        homing_direction: HomingDirection::Negative,
        search_velocity,
        latch_velocity,
        latch_backoff: 4.0,
        zero_backoff: 2.0,
        radius: 0.0,
    }
}

const fn input(mode: InputMode) -> InputSettings {
    InputSettings::new(mode, InputAction::None, InputFunction::None)
}

const fn limit_switch(mode: InputMode) -> InputSettings {
    InputSettings::new(mode, InputAction::None, InputFunction::Limit)
}

/// Rotary axis settings scaled from motor 1 and the X axis
fn rotary(profile: &MachineProfile) -> AxisSettings {
    let travel = profile.motors[0].travel_per_rev;
    let x = profile.axis(Axis::X);
    let velocity_max = x.velocity_max / travel * 360.0;
    let jerk = x.jerk_max * 360.0 / travel;
    AxisSettings {
        mode: AxisMode::Disabled,
        velocity_max,
        feedrate_max: velocity_max,
        travel_min: -1.0,
        travel_max: -1.0,
        jerk_max: jerk,
        jerk_high_speed: jerk,
        homing_input: 0,
        homing_direction: HomingDirection::Negative,
        search_velocity: velocity_max * 0.5,
        latch_velocity: velocity_max * 0.1,
        latch_backoff: 5.0,
        zero_backoff: 2.0,
        radius: travel / (2.0 * PI),
    }
}

fn with_rotary_axes(mut profile: MachineProfile) -> MachineProfile {
    let rotary = rotary(&profile);
    for axis in [Axis::A, Axis::B, Axis::C] {
        profile.axes[axis.index()] = rotary;
    }
    profile
}

fn base() -> MachineProfile {
    let mut inputs = [input(InputMode::NORMALLY_OPEN); DIGITAL_INPUTS];
    inputs[8] = input(InputMode::NORMALLY_CLOSED);

    let xy = linear(1000.0, 1000.0, 500.0, 100.0);
    let z = linear(1000.0, 500.0, 250.0, 25.0);

    MachineProfile {
        name: "Default",
        global: GlobalSettings {
            junction_integration_time: 0.75,
            chordal_tolerance: 0.01,
            motor_power_timeout: 2.0,
            soft_limit_enable: false,
            hard_limit_enable: true,
            safety_interlock_enable: true,
        },
        spindle: SpindleSettings {
            enable_polarity: ActiveLevel::High,
            dir_polarity: ActiveLevel::Low,
            pause_on_hold: true,
            dwell_time: 1.0,
        },
        coolant: CoolantSettings {
            mist_polarity: ActiveLevel::High,
            flood_polarity: ActiveLevel::High,
            pause_on_hold: true,
        },
        motors: [
            motor(Axis::X, 1.25, Polarity::Normal),
            motor(Axis::Y, 40.0, Polarity::Normal),
            motor(Axis::Z, 1.25, Polarity::Reversed),
            motor(Axis::A, 360.0, Polarity::Normal),
            motor(Axis::B, 360.0, Polarity::Normal),
            motor(Axis::C, 360.0, Polarity::Normal),
        ],
        axes: [xy, xy, z, xy, xy, xy],
        inputs,
    }
}

/// Generic defaults
pub(super) fn default_profile() -> MachineProfile {
    with_rotary_axes(base())
}

/// Shapeoko 2, 500 mm kit with dual Y motors
pub(super) fn shapeoko2() -> MachineProfile {
    let mut p = base();
    p.name = "Shapeoko 2";
    p.global.hard_limit_enable = false;
    p.coolant.pause_on_hold = false;

    let belt = |axis, polarity| MotorSettings {
        power_mode: MotorPowerMode::PoweredInCycle,
        power_level: 0.5,
        ..motor(axis, 40.0, polarity)
    };
    p.motors[0] = belt(Axis::X, Polarity::Normal);
    p.motors[1] = belt(Axis::Y, Polarity::Normal);
    p.motors[2] = belt(Axis::Y, Polarity::Reversed);
    p.motors[3] = MotorSettings {
        power_mode: MotorPowerMode::PoweredInCycle,
        power_level: 0.75,
        ..motor(Axis::Z, 1.25, Polarity::Normal)
    };

    let xy = AxisSettings {
        mode: AxisMode::Standard,
        travel_max: 420.0,
        jerk_max: 5000.0,
        jerk_high_speed: 20000.0,
        homing_input: 1,
        ..linear(50000.0, 5000.0, 3000.0, 100.0)
    };
    p.axes[Axis::X.index()] = xy;
    p.axes[Axis::Y.index()] = AxisSettings { homing_input: 3, ..xy };
    p.axes[Axis::Z.index()] = AxisSettings {
        mode: AxisMode::Standard,
        travel_min: -95.0,
        jerk_high_speed: 1000.0,
        homing_input: 6,
        homing_direction: HomingDirection::Positive,
        ..linear(1200.0, 500.0, 1200.0 * 0.666_66, 25.0)
    };

    for n in [0, 1, 2, 3, 5] {
        p.inputs[n] = limit_switch(InputMode::NORMALLY_CLOSED);
    }
    p.inputs[4] = input(InputMode::ActiveHigh);
    for input in &mut p.inputs[6..9] {
        *input = InputSettings::DISABLED;
    }
    with_rotary_axes(p)
}

/// Zen Toolworks 7x12
pub(super) fn zen7x12() -> MachineProfile {
    let mut p = base();
    p.name = "Zen Toolworks 7x12";

    let leadscrew = |axis, polarity| MotorSettings {
        power_mode: MotorPowerMode::PoweredInCycle,
        power_level: 0.5,
        ..motor(axis, 1.25, polarity)
    };
    p.motors[0] = leadscrew(Axis::X, Polarity::Reversed);
    p.motors[1] = leadscrew(Axis::Y, Polarity::Normal);
    p.motors[2] = leadscrew(Axis::Z, Polarity::Reversed);

    let x = AxisSettings {
        mode: AxisMode::Standard,
        travel_max: 475.0,
        latch_backoff: 2.0,
        zero_backoff: 1.0,
        ..linear(600.0, 500.0, 500.0, 100.0)
    };
    p.axes[Axis::X.index()] = x;
    p.axes[Axis::Y.index()] = AxisSettings { travel_max: 200.0, ..x };
    p.axes[Axis::Z.index()] = AxisSettings {
        velocity_max: 500.0,
        feedrate_max: 500.0,
        travel_max: 75.0,
        search_velocity: 400.0,
        ..x
    };
    with_rotary_axes(p)
}

/// Othermill desktop mill
pub(super) fn othermill() -> MachineProfile {
    let mut p = base();
    p.name = "Othermill";
    p.spindle.dwell_time = 1.5;

    let drive = |axis, polarity| MotorSettings {
        power_mode: MotorPowerMode::PoweredInCycle,
        power_level: 0.375,
        ..motor(axis, 4.8768, polarity)
    };
    p.motors[0] = drive(Axis::X, Polarity::Reversed);
    p.motors[1] = drive(Axis::Y, Polarity::Reversed);
    p.motors[2] = drive(Axis::Z, Polarity::Normal);

    let axis = AxisSettings {
        mode: AxisMode::Standard,
        jerk_high_speed: 1000.0,
        latch_backoff: 1.0,
        zero_backoff: 0.4,
        ..linear(1500.0, 500.0, 500.0, 25.0)
    };
    p.axes[Axis::X.index()] = AxisSettings { travel_max: 145.6, homing_input: 1, ..axis };
    p.axes[Axis::Y.index()] = AxisSettings { travel_max: 119.1, homing_input: 3, ..axis };
    p.axes[Axis::Z.index()] = AxisSettings {
        travel_min: -60.1,
        homing_input: 6,
        homing_direction: HomingDirection::Positive,
        ..axis
    };

    p.inputs[0] = input(InputMode::NORMALLY_CLOSED);
    p.inputs[1] = InputSettings::new(InputMode::ActiveHigh, InputAction::Halt, InputFunction::Shutdown);
    p.inputs[2] = input(InputMode::NORMALLY_CLOSED);
    p.inputs[3] = InputSettings::new(InputMode::ActiveHigh, InputAction::None, InputFunction::Interlock);
    p.inputs[4] = input(InputMode::ActiveLow);
    p.inputs[5] = input(InputMode::NORMALLY_CLOSED);
    for input in &mut p.inputs[6..9] {
        *input = InputSettings::DISABLED;
    }
    with_rotary_axes(p)
}
