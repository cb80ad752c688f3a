//! Machine Profiles
//!
//! Numeric settings describing one CNC machine: motor mapping and
//! microstepping, per-axis velocity, jerk and travel limits, homing
//! parameters, and the polarity of switches and outputs. A profile is the
//! default profile with a machine's overrides applied on top, selected at
//! build time through [`crate::config::MACHINE`].

mod profiles;

use crate::error::{Error, Result};

/// Number of motor channels
pub const MOTORS: usize = 6;

/// Number of axes
pub const AXES: usize = 6;

/// Number of digital inputs
pub const DIGITAL_INPUTS: usize = 12;

/// Microstep settings the drivers accept
pub const VALID_MICROSTEPS: [u16; 6] = [1, 2, 4, 8, 16, 32];

/// Machine axes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Axis {
    /// Linear X
    X,
    /// Linear Y
    Y,
    /// Linear Z
    Z,
    /// Rotary about X
    A,
    /// Rotary about Y
    B,
    /// Rotary about Z
    C,
}

impl Axis {
    /// Axes in table order
    pub const ALL: [Self; AXES] = [Self::X, Self::Y, Self::Z, Self::A, Self::B, Self::C];

    /// Index into per-axis tables
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// A, B and C rotate; X, Y and Z travel
    #[must_use]
    pub const fn is_rotary(self) -> bool {
        matches!(self, Self::A | Self::B | Self::C)
    }
}

/// How an axis takes part in motion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum AxisMode {
    /// Axis is off
    Disabled,
    /// Coordinated motion, standard behavior
    Standard,
    /// Computed but not driven
    Inhibited,
    /// Rotary axis calibrated to a radius
    Radius,
}

/// When a motor is energized
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum MotorPowerMode {
    /// Never powered
    Disabled,
    /// Always powered
    AlwaysPowered,
    /// Powered for the whole machining cycle
    PoweredInCycle,
    /// Powered only while it moves
    PoweredWhenMoving,
}

/// Motor direction sense
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum Polarity {
    /// Positive steps turn the motor clockwise
    Normal,
    /// Direction inverted
    Reversed,
}

/// Active level of an output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Asserted when low
    Low,
    /// Asserted when high
    High,
}

/// Homing search direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum HomingDirection {
    /// Search toward the minimum switch
    Negative,
    /// Search toward the maximum switch
    Positive,
}

/// Electrical mode of a digital input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum InputMode {
    /// Active low
    ActiveLow,
    /// Active high
    ActiveHigh,
    /// Ignored
    Disabled,
}

impl InputMode {
    /// Normally-open switch to ground
    pub const NORMALLY_OPEN: Self = Self::ActiveLow;
    /// Normally-closed switch to ground
    pub const NORMALLY_CLOSED: Self = Self::ActiveHigh;
}

/// What the motion core does when an input fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum InputAction {
    /// Nothing
    None,
    /// Stop at normal jerk
    Stop,
    /// Stop at high jerk
    FastStop,
    /// Stop immediately, position may be lost
    Halt,
    /// Resume after a feedhold
    CycleStart,
    /// Raise an alarm
    Alarm,
    /// Shut down
    Shutdown,
    /// Panic
    Panic,
    /// Reset the controller
    Reset,
}

/// Special processing attached to an input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum InputFunction {
    /// Plain input
    None,
    /// Limit switch
    Limit,
    /// Safety interlock
    Interlock,
    /// External emergency stop
    Shutdown,
}

/// Setting named by a validation error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum ProfileField {
    /// Degrees per full step
    StepAngle,
    /// Travel per motor revolution
    TravelPerRev,
    /// Microstep setting
    Microsteps,
    /// Motor current level
    PowerLevel,
    /// Travel min/max
    Travel,
    /// Maximum velocity
    VelocityMax,
    /// Maximum jerk
    JerkMax,
}

/// Settings of one motor channel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotorSettings {
    /// Axis the motor drives
    pub axis: Axis,
    /// Degrees per full step
    pub step_angle: f32,
    /// mm (or degrees) per motor revolution
    pub travel_per_rev: f32,
    /// Microsteps per full step
    pub microsteps: u16,
    /// Direction sense
    pub polarity: Polarity,
    /// Power management
    pub power_mode: MotorPowerMode,
    /// Current level, 0.0..=1.0
    pub power_level: f32,
}

impl MotorSettings {
    /// Microsteps per unit of travel
    #[must_use]
    pub fn steps_per_unit(&self) -> f32 {
        360.0 / (self.step_angle / f32::from(self.microsteps)) / self.travel_per_rev
    }
}

/// Settings of one axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSettings {
    /// Motion mode
    pub mode: AxisMode,
    /// G0 velocity limit, units/min
    pub velocity_max: f32,
    /// G1 feed rate limit, units/min
    pub feedrate_max: f32,
    /// Soft-limit minimum
    pub travel_min: f32,
    /// Soft-limit maximum
    pub travel_max: f32,
    /// Jerk limit, millions of units/min^3
    pub jerk_max: f32,
    /// Jerk used when homing and stopping on a switch
    pub jerk_high_speed: f32,
    /// Digital input used for homing, 0 when none
    pub homing_input: u8,
    /// Homing search direction
    pub homing_direction: HomingDirection,
    /// Homing search velocity
    pub search_velocity: f32,
    /// Homing latch velocity
    pub latch_velocity: f32,
    /// Distance to back off the switch after latching
    pub latch_backoff: f32,
    /// Distance from the switch to machine zero
    pub zero_backoff: f32,
    /// Radius for rotary axes in radius mode
    pub radius: f32,
}

/// Settings of one digital input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputSettings {
    /// Electrical mode
    pub mode: InputMode,
    /// Action on trigger
    pub action: InputAction,
    /// Special processing
    pub function: InputFunction,
}

impl InputSettings {
    /// Input configuration
    #[must_use]
    pub const fn new(mode: InputMode, action: InputAction, function: InputFunction) -> Self {
        Self { mode, action, function }
    }

    /// Disabled input
    pub const DISABLED: Self = Self::new(InputMode::Disabled, InputAction::None, InputFunction::None);
}

/// Planner and safety settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalSettings {
    /// Cornering time constant, seconds
    pub junction_integration_time: f32,
    /// Arc chord tolerance, mm
    pub chordal_tolerance: f32,
    /// Idle time before motors are de-energized, seconds
    pub motor_power_timeout: f32,
    /// Reject moves outside the travel limits
    pub soft_limit_enable: bool,
    /// Stop on limit switches
    pub hard_limit_enable: bool,
    /// Honor the safety interlock input
    pub safety_interlock_enable: bool,
}

/// Spindle output settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpindleSettings {
    /// Enable output level
    pub enable_polarity: ActiveLevel,
    /// Direction output level for clockwise
    pub dir_polarity: ActiveLevel,
    /// Stop the spindle during a feedhold
    pub pause_on_hold: bool,
    /// Dwell after restarting, seconds
    pub dwell_time: f32,
}

/// Coolant output settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoolantSettings {
    /// Mist output level
    pub mist_polarity: ActiveLevel,
    /// Flood output level
    pub flood_polarity: ActiveLevel,
    /// Stop coolant during a feedhold
    pub pause_on_hold: bool,
}

/// The full set of settings for one machine
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MachineProfile {
    /// Profile name for logs
    pub name: &'static str,
    /// Planner and safety settings
    pub global: GlobalSettings,
    /// Spindle
    pub spindle: SpindleSettings,
    /// Coolant
    pub coolant: CoolantSettings,
    /// Motor channels 1..=6
    pub motors: [MotorSettings; MOTORS],
    /// Axes X, Y, Z, A, B, C
    pub axes: [AxisSettings; AXES],
    /// Digital inputs 1..=12
    pub inputs: [InputSettings; DIGITAL_INPUTS],
}

impl MachineProfile {
    /// Settings of an axis
    #[must_use]
    pub const fn axis(&self, axis: Axis) -> &AxisSettings {
        &self.axes[axis.index()]
    }

    /// Settings of motor `number` (1-based)
    #[must_use]
    pub fn motor(&self, number: usize) -> Option<&MotorSettings> {
        number.checked_sub(1).and_then(|i| self.motors.get(i))
    }

    /// Settings of digital input `number` (1-based)
    #[must_use]
    pub fn input(&self, number: usize) -> Option<&InputSettings> {
        number.checked_sub(1).and_then(|i| self.inputs.get(i))
    }

    /// Motors mapped to an axis
    pub fn motors_for(&self, axis: Axis) -> impl Iterator<Item = (usize, &MotorSettings)> + '_ {
        self.motors.iter().enumerate().filter(move |(_, m)| m.axis == axis).map(|(i, m)| (i + 1, m))
    }

    /// Range-check every motor and axis
    ///
    /// # Errors
    ///
    /// The first out-of-range motor setting, axis setting or homing input.
    pub fn validate(&self) -> Result<()> {
        for (i, motor) in self.motors.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let number = i as u8 + 1;
            let fail = |field| Err(Error::InvalidMotorSetting { motor: number, field });
            if !VALID_MICROSTEPS.contains(&motor.microsteps) {
                return fail(ProfileField::Microsteps);
            }
            if !(0.0..=1.0).contains(&motor.power_level) {
                return fail(ProfileField::PowerLevel);
            }
            if motor.step_angle <= 0.0 {
                return fail(ProfileField::StepAngle);
            }
            if motor.travel_per_rev <= 0.0 {
                return fail(ProfileField::TravelPerRev);
            }
        }

        for axis in Axis::ALL {
            let settings = self.axis(axis);
            if usize::from(settings.homing_input) > DIGITAL_INPUTS {
                return Err(Error::InvalidHomingInput(axis));
            }
            if settings.mode == AxisMode::Disabled {
                continue;
            }
            let fail = |field| Err(Error::InvalidAxisSetting { axis, field });
            if settings.velocity_max <= 0.0 {
                return fail(ProfileField::VelocityMax);
            }
            if settings.jerk_max <= 0.0 {
                return fail(ProfileField::JerkMax);
            }
            if !axis.is_rotary() && settings.travel_min > settings.travel_max {
                return fail(ProfileField::Travel);
            }
        }
        Ok(())
    }
}

/// Named machine profiles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum MachineId {
    /// Generic defaults, every axis disabled
    Default,
    /// Shapeoko 2 (500 mm)
    Shapeoko2,
    /// Zen Toolworks 7x12
    Zen7x12,
    /// Other Machine Co. Othermill
    Othermill,
}

impl MachineId {
    /// Every profile
    pub const ALL: [Self; 4] = [Self::Default, Self::Shapeoko2, Self::Zen7x12, Self::Othermill];

    /// Build the profile
    #[must_use]
    pub fn profile(self) -> MachineProfile {
        match self {
            Self::Default => profiles::default_profile(),
            Self::Shapeoko2 => profiles::shapeoko2(),
            Self::Zen7x12 => profiles::zen7x12(),
            Self::Othermill => profiles::othermill(),
        }
    }
}

/// Profile selected for this build
#[must_use]
pub fn active() -> MachineProfile {
    crate::config::MACHINE.profile()
}
