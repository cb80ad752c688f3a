//! G2 v9 boards (SAM3X8C, ports A and B only)
//!
//! Both revisions share the Kinen "fin" numbering: socket `x` owns pins
//! `10x + 0..=8` (SS, interrupt, step, dir, enable, MS0-2, vref), general
//! signals sit below 10 and board functions from 100 up. The revisions
//! differ only in which numbers are wired to the chip.

use super::MotorSignal::{Dir, Enable, Interrupt, Microstep0, Microstep1, Microstep2, SpiSlaveSelect, Step, Vref};
use super::Peripheral as Periph;
use super::TimerChannel::{A, B};
use super::TimerKind::{Pwm, Tc};
use super::{assign, Assignment, BoardPinout, LogicalPin, MotorSignal, PhysicalPin, PinNumber, Port, MAX_SOCKETS};

const fn pin(number: i16, port: Port, bit: u8) -> PhysicalPin {
    PhysicalPin::gpio(number, port, bit)
}

const FIN_SIGNALS: [MotorSignal; 9] = [SpiSlaveSelect, Interrupt, Step, Dir, Enable, Microstep0, Microstep1, Microstep2, Vref];

const FIN_GENERAL: [Assignment; 8] = [
    assign(LogicalPin::SerialRx, 0),
    assign(LogicalPin::SerialTx, 1),
    assign(LogicalPin::I2cSda, 2),
    assign(LogicalPin::I2cScl, 3),
    assign(LogicalPin::SpiSck, 4),
    assign(LogicalPin::SpiMiso, 5),
    assign(LogicalPin::SpiMosi, 6),
    assign(LogicalPin::KinenSync, 7),
];

const FIN_BOARD: [Assignment; 9] = [
    assign(LogicalPin::SpindleEnable, 112),
    assign(LogicalPin::SpindleDir, 113),
    assign(LogicalPin::SpindlePwm, 114),
    assign(LogicalPin::SpindlePwm2, 115),
    assign(LogicalPin::CoolantEnable, 116),
    assign(LogicalPin::LedUsbRx, 117),
    assign(LogicalPin::LedUsbTx, 118),
    assign(LogicalPin::SdCardDetect, 119),
    assign(LogicalPin::InterlockIn, 120),
];

const FIN_INPUT_BASE: PinNumber = 100;
const FIN_LEN: usize = FIN_GENERAL.len() + MAX_SOCKETS as usize * FIN_SIGNALS.len() + 12 + FIN_BOARD.len();

const fn fin_table() -> [Assignment; FIN_LEN] {
    let mut table = [assign(LogicalPin::SerialRx, 0); FIN_LEN];
    let mut n = 0;

    let mut i = 0;
    while i < FIN_GENERAL.len() {
        table[n] = FIN_GENERAL[i];
        n += 1;
        i += 1;
    }

    let mut socket = 1;
    while socket <= MAX_SOCKETS {
        let mut offset = 0;
        while offset < FIN_SIGNALS.len() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let number = (socket as PinNumber) * 10 + offset as PinNumber;
            table[n] = assign(LogicalPin::motor(socket, FIN_SIGNALS[offset]), number);
            n += 1;
            offset += 1;
        }
        socket += 1;
    }

    let mut input = 1;
    while input <= 12 {
        table[n] = assign(LogicalPin::Input(input), FIN_INPUT_BASE + input as PinNumber - 1);
        n += 1;
        input += 1;
    }

    let mut i = 0;
    while i < FIN_BOARD.len() {
        table[n] = FIN_BOARD[i];
        n += 1;
        i += 1;
    }
    table
}

/// Fin-numbered signal assignments shared by the v9 revisions
pub static FIN_ASSIGNMENTS: [Assignment; FIN_LEN] = fin_table();

/// G2 v9i pin map
pub static G2V9I_PINS: [PhysicalPin; 52] = [
    pin(4, Port::A, 27).spi_data(),
    pin(5, Port::A, 25).spi_data(),
    pin(6, Port::A, 26).spi_data(),
    // socket 1
    pin(10, Port::A, 28).spi_cs(0),
    pin(12, Port::A, 23),
    pin(13, Port::A, 6).pwm(Tc, 2, B, Periph::A, false),
    pin(14, Port::A, 22),
    pin(15, Port::A, 24),
    pin(16, Port::A, 16),
    pin(17, Port::B, 16).pwm(Pwm, 0, A, Periph::B, false),
    pin(18, Port::B, 17).pwm(Pwm, 1, A, Periph::B, false),
    // socket 2
    pin(20, Port::B, 20).spi_cs(1),
    pin(22, Port::B, 0),
    pin(23, Port::B, 2),
    pin(24, Port::B, 1),
    pin(25, Port::A, 29).spi_cs(1),
    pin(26, Port::A, 21).pwm(Pwm, 0, A, Periph::B, false),
    pin(27, Port::A, 4),
    pin(28, Port::B, 18).pwm(Pwm, 2, A, Periph::B, false),
    // socket 3
    pin(30, Port::B, 21).spi_cs(2),
    pin(32, Port::B, 6),
    pin(33, Port::B, 8),
    pin(34, Port::B, 7),
    pin(35, Port::B, 5),
    pin(36, Port::B, 4),
    pin(37, Port::B, 3),
    pin(38, Port::B, 19).pwm(Pwm, 3, A, Periph::B, false),
    // socket 4
    pin(40, Port::B, 23).spi_cs(3),
    pin(42, Port::B, 14).pwm(Pwm, 2, A, Periph::B, true),
    pin(43, Port::B, 24),
    pin(44, Port::B, 22),
    pin(45, Port::B, 11),
    pin(46, Port::B, 10),
    pin(47, Port::B, 9),
    pin(48, Port::A, 2).pwm(Tc, 1, A, Periph::A, false),
    // socket 5 vref only
    pin(58, Port::A, 3).pwm(Tc, 1, B, Periph::A, false),
    // limit inputs
    pin(100, Port::B, 26),
    pin(101, Port::A, 9).pwm(Pwm, 3, A, Periph::B, true),
    pin(102, Port::A, 10),
    pin(103, Port::A, 11),
    pin(104, Port::A, 12).pwm(Pwm, 1, A, Periph::B, false),
    pin(105, Port::A, 13).pwm(Pwm, 2, A, Periph::B, true),
    pin(106, Port::A, 14),
    pin(107, Port::A, 15),
    // board functions
    pin(112, Port::A, 5),
    pin(113, Port::A, 7),
    pin(114, Port::A, 8).pwm(Pwm, 0, A, Periph::B, true),
    pin(116, Port::A, 1),
    pin(117, Port::A, 18),
    pin(118, Port::A, 19).pwm(Pwm, 1, A, Periph::B, true),
    pin(119, Port::B, 15).pwm(Pwm, 3, A, Periph::B, true),
    pin(120, Port::A, 17),
];

/// G2 v9d pin map
pub static G2V9D_PINS: [PhysicalPin; 58] = [
    pin(2, Port::B, 12).pwm(Pwm, 0, A, Periph::B, true),
    pin(3, Port::B, 13).pwm(Pwm, 1, A, Periph::B, true),
    pin(4, Port::A, 27).spi_data(),
    pin(5, Port::A, 25).spi_data(),
    pin(6, Port::A, 26).spi_data(),
    pin(7, Port::B, 15).pwm(Pwm, 3, A, Periph::B, true),
    // socket 1
    pin(11, Port::B, 16).pwm(Pwm, 0, A, Periph::B, false),
    pin(12, Port::A, 12).pwm(Pwm, 1, A, Periph::B, false),
    pin(13, Port::A, 10),
    pin(14, Port::A, 11),
    pin(15, Port::B, 26),
    pin(16, Port::A, 9).pwm(Pwm, 3, A, Periph::B, true),
    pin(18, Port::A, 8).pwm(Pwm, 0, A, Periph::B, true),
    // socket 2; MS0 is not connected
    pin(20, Port::A, 21).pwm(Pwm, 0, A, Periph::B, false),
    pin(21, Port::B, 11),
    pin(22, Port::B, 25).pwm(Tc, 0, A, Periph::B, false),
    pin(23, Port::B, 22),
    pin(24, Port::B, 24),
    pin(26, Port::B, 14).pwm(Pwm, 2, A, Periph::B, true),
    pin(28, Port::B, 17).pwm(Pwm, 1, A, Periph::B, false),
    // socket 3
    pin(30, Port::B, 23).spi_cs(3),
    pin(31, Port::B, 5),
    pin(32, Port::B, 10),
    pin(33, Port::B, 8),
    pin(34, Port::B, 9),
    pin(35, Port::B, 6),
    pin(36, Port::B, 7),
    pin(38, Port::B, 18).pwm(Pwm, 2, A, Periph::B, false),
    // socket 4
    pin(40, Port::A, 28).spi_cs(0),
    pin(41, Port::A, 2).pwm(Tc, 1, A, Periph::A, false),
    pin(42, Port::B, 4),
    pin(43, Port::B, 3),
    pin(44, Port::B, 2),
    pin(45, Port::B, 1),
    pin(46, Port::B, 20).spi_cs(1),
    pin(48, Port::B, 19).pwm(Pwm, 3, A, Periph::B, false),
    // socket 5
    pin(50, Port::A, 29),
    pin(51, Port::A, 24),
    pin(52, Port::A, 23),
    pin(53, Port::A, 22),
    pin(54, Port::A, 6).pwm(Tc, 2, B, Periph::A, false),
    pin(55, Port::A, 4),
    pin(56, Port::A, 3).pwm(Tc, 1, B, Periph::A, false),
    pin(58, Port::B, 0),
    // socket 6
    pin(60, Port::B, 21).spi_cs(2),
    pin(61, Port::A, 16),
    // limit inputs
    pin(100, Port::A, 13).pwm(Pwm, 2, A, Periph::B, true),
    pin(101, Port::A, 14),
    pin(102, Port::A, 15),
    pin(103, Port::A, 17),
    pin(104, Port::A, 0).pwm(Pwm, 3, A, Periph::B, false),
    pin(105, Port::A, 1),
    // board functions
    pin(112, Port::A, 18),
    pin(113, Port::A, 19).pwm(Pwm, 1, A, Periph::B, true),
    pin(114, Port::B, 27).pwm(Tc, 0, B, Periph::B, false),
    pin(116, Port::A, 20).pwm(Pwm, 2, A, Periph::B, false),
    pin(117, Port::A, 5),
    pin(118, Port::A, 7),
];

/// G2 v9i: four motor sockets
pub static G2V9I: BoardPinout = BoardPinout {
    name: "G2 v9i",
    motor_count: 4,
    assignments: &FIN_ASSIGNMENTS,
    pins: &G2V9I_PINS,
};

/// G2 v9d: five motor sockets
pub static G2V9D: BoardPinout = BoardPinout {
    name: "G2 v9d",
    motor_count: 5,
    assignments: &FIN_ASSIGNMENTS,
    pins: &G2V9D_PINS,
};
