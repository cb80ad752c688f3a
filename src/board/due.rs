//! Arduino Due (SAM3X8E) with the gShield stepper shield

use super::LogicalPin::{
    CoolantEnable, GrblCommonEnable, GrblCycleStart, GrblFeedHold, GrblReset, I2cScl, I2cSda, Input,
    KinenSync, LedUsbRx, LedUsbTx, SerialRx, SerialTx, SpiMiso, SpiMosi, SpiSck, SpindleEnable, SpindlePwm,
    SpindlePwm2,
};
use super::MotorSignal::{Dir, Enable, Microstep0, Microstep1, SpiSlaveSelect, Step};
use super::Peripheral as Periph;
use super::TimerChannel::{A, B};
use super::TimerKind::{Pwm, Tc};
use super::{assign, Assignment, BoardPinout, LogicalPin, PhysicalPin, Port};

const fn pin(number: i16, port: Port, bit: u8) -> PhysicalPin {
    PhysicalPin::gpio(number, port, bit)
}

const fn motor(socket: u8, signal: super::MotorSignal) -> LogicalPin {
    LogicalPin::motor(socket, signal)
}

/// Due header numbering, D0..D53 then A0..A11, DAC, CAN, I2C1, LEDs and ICSP
pub static DUE_PINS: [PhysicalPin; 79] = [
    pin(0, Port::A, 8).pwm(Pwm, 0, A, Periph::B, true),
    pin(1, Port::A, 9).pwm(Pwm, 3, A, Periph::B, true),
    pin(2, Port::B, 25).pwm(Tc, 0, A, Periph::B, false),
    pin(3, Port::C, 28).pwm(Tc, 7, A, Periph::B, false),
    pin(4, Port::C, 26).pwm(Tc, 6, B, Periph::B, false),
    pin(5, Port::C, 25).pwm(Tc, 6, A, Periph::B, false),
    pin(6, Port::C, 24).pwm(Pwm, 7, A, Periph::B, false),
    pin(7, Port::C, 23).pwm(Pwm, 6, A, Periph::B, false),
    pin(8, Port::C, 22).pwm(Pwm, 5, A, Periph::B, false),
    pin(9, Port::C, 21).pwm(Pwm, 4, A, Periph::B, false),
    pin(10, Port::C, 29).pwm(Tc, 7, B, Periph::B, false),
    pin(11, Port::D, 7).pwm(Tc, 8, A, Periph::B, false),
    pin(12, Port::D, 8).pwm(Tc, 8, B, Periph::B, false),
    pin(13, Port::B, 27).pwm(Tc, 0, B, Periph::B, false),
    pin(14, Port::D, 4),
    pin(15, Port::D, 5),
    pin(16, Port::A, 13).pwm(Pwm, 2, A, Periph::B, true),
    pin(17, Port::A, 12).pwm(Pwm, 1, A, Periph::B, false),
    pin(18, Port::A, 11),
    pin(19, Port::A, 10),
    pin(20, Port::B, 12).pwm(Pwm, 0, A, Periph::B, true),
    pin(21, Port::B, 13).pwm(Pwm, 1, A, Periph::B, true),
    // dual inline header
    pin(22, Port::B, 26),
    pin(23, Port::A, 14),
    pin(24, Port::A, 15),
    pin(25, Port::D, 0),
    pin(26, Port::D, 1),
    pin(27, Port::D, 2),
    pin(28, Port::D, 3),
    pin(29, Port::D, 6),
    pin(30, Port::D, 9),
    pin(31, Port::A, 7),
    pin(32, Port::D, 10),
    pin(33, Port::C, 1),
    pin(34, Port::C, 2).pwm(Pwm, 0, A, Periph::B, false),
    pin(35, Port::C, 3).pwm(Pwm, 0, A, Periph::B, true),
    pin(36, Port::C, 4).pwm(Pwm, 1, A, Periph::B, false),
    pin(37, Port::C, 5).pwm(Pwm, 1, A, Periph::B, true),
    pin(38, Port::C, 6).pwm(Pwm, 2, A, Periph::B, false),
    pin(39, Port::C, 7).pwm(Pwm, 2, A, Periph::B, true),
    pin(40, Port::C, 8).pwm(Pwm, 3, A, Periph::B, false),
    pin(41, Port::C, 9).pwm(Pwm, 3, A, Periph::B, true),
    pin(42, Port::A, 19).pwm(Pwm, 1, A, Periph::B, true),
    pin(43, Port::A, 20).pwm(Pwm, 2, A, Periph::B, false),
    pin(44, Port::C, 19).pwm(Pwm, 5, A, Periph::B, true),
    pin(45, Port::C, 18).pwm(Pwm, 6, A, Periph::B, true),
    pin(46, Port::C, 17),
    pin(47, Port::C, 16),
    pin(48, Port::C, 15),
    pin(49, Port::C, 14),
    pin(50, Port::C, 13),
    pin(51, Port::C, 12),
    pin(52, Port::B, 21).spi_cs(2),
    pin(53, Port::B, 14).pwm(Pwm, 2, A, Periph::B, true),
    // analog header
    pin(54, Port::A, 16),
    pin(55, Port::A, 24),
    pin(56, Port::A, 23),
    pin(57, Port::A, 22),
    pin(58, Port::A, 6).pwm(Tc, 2, B, Periph::A, false),
    pin(59, Port::A, 4),
    pin(60, Port::A, 3).pwm(Tc, 1, B, Periph::A, false),
    pin(61, Port::A, 2).pwm(Tc, 1, A, Periph::A, false),
    pin(62, Port::B, 17).pwm(Pwm, 1, A, Periph::B, false),
    pin(63, Port::B, 18).pwm(Pwm, 2, A, Periph::B, false),
    pin(64, Port::B, 19).pwm(Pwm, 3, A, Periph::B, false),
    pin(65, Port::B, 20).spi_cs(1),
    pin(66, Port::B, 15).pwm(Pwm, 3, A, Periph::B, true),
    pin(67, Port::B, 16).pwm(Pwm, 0, A, Periph::B, false),
    pin(68, Port::A, 1),
    pin(69, Port::A, 0).pwm(Pwm, 3, A, Periph::B, false),
    pin(70, Port::A, 17),
    pin(71, Port::A, 18),
    pin(72, Port::C, 30),
    pin(73, Port::A, 21).pwm(Pwm, 0, A, Periph::B, false),
    // ICSP header
    pin(74, Port::A, 25).spi_data(),
    pin(75, Port::A, 26).spi_data(),
    pin(76, Port::A, 27).spi_data(),
    pin(77, Port::A, 28).spi_cs(0),
    pin(78, Port::B, 23).spi_cs(3),
];

/// gShield signal assignments
///
/// Socket 2's slave select shares D65 with input 11 on the shield and is
/// left unassigned.
pub static GSHIELD_ASSIGNMENTS: [Assignment; 66] = [
    assign(SerialRx, 0),
    assign(SerialTx, 1),
    assign(I2cSda, 20),
    assign(I2cScl, 21),
    assign(SpiSck, 76),
    assign(SpiMiso, 74),
    assign(SpiMosi, 75),
    assign(LogicalPin::Debug(1), 49),
    assign(LogicalPin::Debug(2), 47),
    assign(LogicalPin::Debug(3), 45),
    assign(KinenSync, 53),
    assign(motor(1, Step), 2),
    assign(motor(1, Dir), 5),
    assign(motor(1, Enable), 22),
    assign(motor(1, Microstep0), 23),
    assign(motor(1, Microstep1), 24),
    assign(motor(2, Step), 3),
    assign(motor(2, Dir), 6),
    assign(motor(2, Enable), 25),
    assign(motor(2, Microstep0), 26),
    assign(motor(2, Microstep1), 27),
    assign(motor(3, SpiSlaveSelect), 52),
    assign(motor(3, Step), 4),
    assign(motor(3, Dir), 7),
    assign(motor(3, Enable), 28),
    assign(motor(3, Microstep0), 29),
    assign(motor(3, Microstep1), 30),
    assign(motor(4, SpiSlaveSelect), 77),
    assign(motor(4, Step), 31),
    assign(motor(4, Dir), 32),
    assign(motor(4, Enable), 33),
    assign(motor(4, Microstep0), 35),
    assign(motor(4, Microstep1), 36),
    assign(motor(5, SpiSlaveSelect), 78),
    assign(motor(5, Step), 37),
    assign(motor(5, Dir), 38),
    assign(motor(5, Enable), 39),
    assign(motor(5, Microstep0), 40),
    assign(motor(5, Microstep1), 41),
    assign(motor(6, SpiSlaveSelect), 50),
    assign(motor(6, Step), 42),
    assign(motor(6, Dir), 43),
    assign(motor(6, Enable), 44),
    assign(motor(6, Microstep1), 46),
    assign(Input(1), 14),
    assign(Input(2), 15),
    assign(Input(3), 16),
    assign(Input(4), 17),
    assign(Input(5), 18),
    assign(Input(6), 19),
    assign(Input(7), 58),
    assign(Input(8), 59),
    assign(Input(9), 60),
    assign(Input(10), 61),
    assign(Input(11), 65),
    assign(Input(12), 51),
    assign(SpindleEnable, 12),
    assign(SpindlePwm, 11),
    assign(SpindlePwm2, 9),
    assign(CoolantEnable, 57),
    assign(LedUsbRx, 72),
    assign(LedUsbTx, 73),
    assign(GrblReset, 54),
    assign(GrblFeedHold, 55),
    assign(GrblCycleStart, 56),
    assign(GrblCommonEnable, 8),
];

/// gShield on the Due
pub static GSHIELD: BoardPinout = BoardPinout {
    name: "gShield",
    motor_count: 6,
    assignments: &GSHIELD_ASSIGNMENTS,
    pins: &DUE_PINS,
};
