//! ShopBot SBV300 controller (SAM3X8E, six step/dir outputs)

use super::LogicalPin::{Input, LedUsbRx, LedUsbTx, SpindleDir, SpindleEnable};
use super::{assign, Assignment, BoardPinout, LogicalPin, PhysicalPin, Port};

const fn pin(number: i16, port: Port, bit: u8) -> PhysicalPin {
    PhysicalPin::gpio(number, port, bit)
}

/// SBV300 pin map
pub static SBV300_PINS: [PhysicalPin; 28] = [
    // step
    pin(0, Port::C, 28),
    pin(1, Port::C, 25),
    pin(2, Port::C, 26),
    pin(3, Port::C, 23),
    pin(4, Port::C, 24),
    pin(5, Port::B, 1),
    // direction
    pin(6, Port::B, 23),
    pin(7, Port::B, 24),
    pin(8, Port::B, 14),
    pin(9, Port::B, 22),
    pin(10, Port::C, 27),
    pin(11, Port::B, 0),
    // USB LEDs
    pin(12, Port::C, 9),
    pin(13, Port::B, 27),
    // outputs 1 and 4
    pin(14, Port::A, 0),
    pin(15, Port::D, 7),
    // inputs
    pin(16, Port::B, 4),
    pin(17, Port::B, 5),
    pin(18, Port::C, 10),
    pin(19, Port::B, 3),
    pin(20, Port::B, 8),
    pin(21, Port::B, 9),
    pin(22, Port::B, 6),
    pin(23, Port::B, 7),
    pin(24, Port::D, 2),
    pin(25, Port::A, 9),
    pin(26, Port::D, 1),
    pin(27, Port::A, 17),
];

/// SBV300 signal assignments
///
/// Debug 2 and 3 point at pins the board does not break out.
pub static SBV300_ASSIGNMENTS: [Assignment; 30] = [
    assign(LogicalPin::Debug(2), 49),
    assign(LogicalPin::Debug(3), 50),
    assign(LogicalPin::step(1), 0),
    assign(LogicalPin::dir(1), 6),
    assign(LogicalPin::step(2), 1),
    assign(LogicalPin::dir(2), 7),
    assign(LogicalPin::step(3), 2),
    assign(LogicalPin::dir(3), 8),
    assign(LogicalPin::step(4), 3),
    assign(LogicalPin::dir(4), 9),
    assign(LogicalPin::step(5), 4),
    assign(LogicalPin::dir(5), 10),
    assign(LogicalPin::step(6), 5),
    assign(LogicalPin::dir(6), 11),
    assign(SpindleEnable, 14),
    assign(SpindleDir, 15),
    assign(Input(1), 16),
    assign(Input(2), 17),
    assign(Input(3), 18),
    assign(Input(4), 19),
    assign(Input(5), 20),
    assign(Input(6), 21),
    assign(Input(7), 22),
    assign(Input(8), 23),
    assign(Input(9), 24),
    assign(Input(10), 25),
    assign(Input(11), 26),
    assign(Input(12), 27),
    assign(LedUsbRx, 12),
    assign(LedUsbTx, 13),
];

/// ShopBot SBV300
pub static SBV300: BoardPinout = BoardPinout {
    name: "SBV300",
    motor_count: 6,
    assignments: &SBV300_ASSIGNMENTS,
    pins: &SBV300_PINS,
};
