//! UC1701-class command encoders
//!
//! This module builds the command bytes understood by the display controller.
//! Commands are sent with the CD line low; pixel data with the CD line high.
//! Encoders are pure functions returning fixed-size byte arrays, so multiple
//! commands can be concatenated into one message and sent in a single
//! transfer.
//!
//! The encodings are the wire format and must stay bit-exact: the simulator's
//! [`CommandDecoder`](crate::decode::CommandDecoder) classifies the very same
//! bytes on the receiving side.
//!
//! ## Example
//!
//! ```
//! use dogs102::command;
//!
//! assert_eq!(command::sleep(false), [0xAF]);
//! assert_eq!(command::contrast(16), [0x81, 0x10]);
//! assert_eq!(command::page_address(3), [0xB3]);
//! ```

use crate::config::ViewDirection;

/// Sleep command: `enable` sends the display to sleep, otherwise wakes it
pub fn sleep(enable: bool) -> [u8; 1] {
    [0xAE | u8::from(!enable)]
}

/// Scroll start line, 0..=63
pub fn start_line(line: u8) -> [u8; 1] {
    [0x40 | (line & 0x3F)]
}

/// Horizontal orientation: 1 = bottom view, 0 = top view (mirrored)
///
/// Switching horizontal orientation also switches the active column-address
/// shift; [`Display`](crate::display::Display) tracks that as a side effect.
pub fn h_orientation(flag: u8) -> [u8; 1] {
    [0xA0 | (flag & 0x01)]
}

/// Vertical orientation: 0 = normal, 8 = mirrored
pub fn v_orientation(flag: u8) -> [u8; 1] {
    [0xC0 | (flag & 0x08)]
}

/// Combined horizontal + vertical orientation for a view direction
pub fn view_direction(direction: ViewDirection) -> [u8; 2] {
    let [h] = h_orientation(direction.h_flag());
    let [v] = v_orientation(direction.v_flag());
    [h, v]
}

/// Display inversion (all pixels negated)
pub fn inverted(on: bool) -> [u8; 1] {
    [0xA6 | u8::from(on)]
}

/// All-pixels-on test mode (for spotting defective pixels)
pub fn all_pixels_on(on: bool) -> [u8; 1] {
    [0xA4 | u8::from(on)]
}

/// Bias ratio: 0 = 1/9, 1 = 1/7
pub fn bias_ratio(ratio: u8) -> [u8; 1] {
    [0xA2 | (ratio & 0x01)]
}

/// Power control: booster, regulator and follower enables
pub fn power_control(booster: bool, regulator: bool, follower: bool) -> [u8; 1] {
    [0x28 | u8::from(booster) | (u8::from(regulator) << 1) | (u8::from(follower) << 2)]
}

/// Bias voltage divider level, 0..=7
pub fn bias_voltage_divider(level: u8) -> [u8; 1] {
    [0x20 | (level & 0x07)]
}

/// Contrast ("electronic volume"), two bytes, value 0..=63
pub fn contrast(value: u8) -> [u8; 2] {
    [0x81, value & 0x3F]
}

/// Page address, 0..=15
pub fn page_address(page: u8) -> [u8; 1] {
    [0xB0 | (page & 0x0F)]
}

/// Column address as high-nibble command plus low-nibble operand
///
/// `shift` is the active column-address offset for the current orientation.
/// The sum is reduced to 8 bits before the nibble split, so an overflowing
/// column silently wraps; the controller does the same.
pub fn column_address(column: u8, shift: u8) -> [u8; 2] {
    let col = column.wrapping_add(shift);
    [0x10 | (col >> 4), col & 0x0F]
}

/// Page address followed by column address, for cursor moves
pub fn goto(column: u8, page: u8, shift: u8) -> [u8; 3] {
    let [p] = page_address(page);
    let [hi, lo] = column_address(column, shift);
    [p, hi, lo]
}

/// Advanced program control: temperature compensation and wrap flags
pub fn advanced_control(temp_comp_high: bool, column_wrap: bool, page_wrap: bool) -> [u8; 2] {
    [
        0xFA,
        0x10 | (u8::from(temp_comp_high) << 7) | (u8::from(column_wrap) << 1) | u8::from(page_wrap),
    ]
}

/// Software reset
pub fn reset() -> [u8; 1] {
    [0xE2]
}
