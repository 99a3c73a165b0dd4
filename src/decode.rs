//! Command-stream decoder
//!
//! The inverse of [`command`](crate::command): classifies incoming command
//! bytes back into [`CommandEvent`]s. The simulator feeds every command byte
//! through one [`CommandDecoder`] instance.
//!
//! The command encodings overlap: `0xB3` satisfies both the page-address mask
//! `0xB0` and the start-line mask `0x40`. Classification therefore tests the
//! masks in strictly descending order, so a byte matching a more specific
//! mask is never claimed by a looser one. Two-byte commands (contrast, column
//! address, advanced program control) park a [`PendingOp`] that consumes the
//! following byte.

/// First byte of a two-byte command, waiting for its operand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingOp {
    /// Contrast command seen, operand is the 6-bit volume value
    Contrast,
    /// Column-address high nibble seen, waiting for the low nibble
    ColumnLow {
        /// High nibble, already shifted into place
        high: u8,
    },
    /// Column-address low nibble seen first, waiting for the high nibble
    ColumnHigh {
        /// Low nibble
        low: u8,
    },
    /// Advanced-program-control prefix seen, operand carries the flag bits
    AdvancedControl,
}

/// A decoded display command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandEvent {
    /// Sleep state: true = sleeping, false = awake
    Sleep(bool),
    /// Scroll start line, 0..=63
    StartLine(u8),
    /// Horizontal orientation flag (1 = bottom view, 0 = top view)
    HOrientation(u8),
    /// Vertical orientation flag (0 = normal, 8 = mirrored)
    VOrientation(u8),
    /// Display inversion
    Inverted(bool),
    /// All-pixels-on test mode
    AllPixelsOn(bool),
    /// Bias ratio selection
    BiasRatio(u8),
    /// Power control enables
    PowerControl {
        /// Booster enabled
        booster: bool,
        /// Regulator enabled
        regulator: bool,
        /// Follower enabled
        follower: bool,
    },
    /// Bias voltage divider level
    BiasVoltageDivider(u8),
    /// Contrast value, 0..=63
    Contrast(u8),
    /// Page address, 0..=15
    PageAddress(u8),
    /// Raw column address (the active shift has not been subtracted)
    ColumnAddress(u8),
    /// Advanced program control flags
    AdvancedControl {
        /// High temperature-compensation coefficient
        temp_comp_high: bool,
        /// Column wrapping enabled
        column_wrap: bool,
        /// Page wrapping enabled
        page_wrap: bool,
    },
    /// Software reset
    Reset,
}

/// A byte that cannot complete the pending two-byte command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeError {
    /// The offending byte
    pub byte: u8,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unexpected operand byte {:#04x}", self.byte)
    }
}

impl core::error::Error for DecodeError {}

/// Stateful classifier for the command byte stream
///
/// Single-byte commands complete immediately; two-byte commands retain one
/// byte of look-ahead state across calls.
///
/// ## Example
///
/// ```
/// use dogs102::{CommandDecoder, CommandEvent};
///
/// let mut decoder = CommandDecoder::new();
/// assert_eq!(decoder.feed(0x81), Ok(None)); // contrast prefix
/// assert_eq!(decoder.feed(0x2A), Ok(Some(CommandEvent::Contrast(0x2A))));
/// ```
#[derive(Debug, Default)]
pub struct CommandDecoder {
    pending: Option<PendingOp>,
}

impl CommandDecoder {
    /// Create a decoder in the idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the decoder is waiting for the second byte of a command
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending two-byte state and return to idle
    pub fn reset(&mut self) {
        self.pending = None;
    }

    /// Classify one command byte
    ///
    /// Returns `Ok(None)` when the byte opens a two-byte command. A decode
    /// error leaves the decoder idle, so the stream can resume at the next
    /// byte.
    pub fn feed(&mut self, byte: u8) -> Result<Option<CommandEvent>, DecodeError> {
        if let Some(op) = self.pending.take() {
            return Self::complete(op, byte).map(Some);
        }

        // Masks overlap; keep this chain in descending order.
        let event = if byte & 0xFA == 0xFA {
            self.pending = Some(PendingOp::AdvancedControl);
            None
        } else if byte & 0xE2 == 0xE2 {
            Some(CommandEvent::Reset)
        } else if byte & 0xC0 == 0xC0 {
            Some(CommandEvent::VOrientation(byte & 0x08))
        } else if byte & 0xB0 == 0xB0 {
            Some(CommandEvent::PageAddress(byte & 0x0F))
        } else if byte & 0xAE == 0xAE {
            Some(CommandEvent::Sleep(byte & 0x01 == 0))
        } else if byte & 0xA6 == 0xA6 {
            Some(CommandEvent::Inverted(byte & 0x01 != 0))
        } else if byte & 0xA4 == 0xA4 {
            Some(CommandEvent::AllPixelsOn(byte & 0x01 != 0))
        } else if byte & 0xA2 == 0xA2 {
            Some(CommandEvent::BiasRatio(byte & 0x01))
        } else if byte & 0xA0 == 0xA0 {
            Some(CommandEvent::HOrientation(byte & 0x01))
        } else if byte & 0x81 == 0x81 {
            self.pending = Some(PendingOp::Contrast);
            None
        } else if byte & 0x40 == 0x40 {
            Some(CommandEvent::StartLine(byte & 0x3F))
        } else if byte & 0x28 == 0x28 {
            Some(CommandEvent::PowerControl {
                booster: byte & 0x01 != 0,
                regulator: byte & 0x02 != 0,
                follower: byte & 0x04 != 0,
            })
        } else if byte & 0x20 == 0x20 {
            Some(CommandEvent::BiasVoltageDivider(byte & 0x07))
        } else if byte & 0x10 == 0x10 {
            self.pending = Some(PendingOp::ColumnLow {
                high: (byte & 0x0F) << 4,
            });
            None
        } else {
            self.pending = Some(PendingOp::ColumnHigh { low: byte & 0x0F });
            None
        };
        Ok(event)
    }

    fn complete(op: PendingOp, byte: u8) -> Result<CommandEvent, DecodeError> {
        match op {
            PendingOp::Contrast => Ok(CommandEvent::Contrast(byte & 0x3F)),
            PendingOp::ColumnLow { high } => Ok(CommandEvent::ColumnAddress(high | (byte & 0x0F))),
            PendingOp::ColumnHigh { low } => {
                Ok(CommandEvent::ColumnAddress(((byte & 0x0F) << 4) | low))
            }
            PendingOp::AdvancedControl => {
                // The operand carries a fixed 0x10 marker bit
                if byte & 0x10 == 0 {
                    return Err(DecodeError { byte });
                }
                Ok(CommandEvent::AdvancedControl {
                    temp_comp_high: byte & 0x80 != 0,
                    column_wrap: byte & 0x02 != 0,
                    page_wrap: byte & 0x01 != 0,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command;
    use crate::config::ViewDirection;

    fn decode_all(bytes: &[u8]) -> alloc::vec::Vec<CommandEvent> {
        let mut decoder = CommandDecoder::new();
        let mut events = alloc::vec::Vec::new();
        for &b in bytes {
            if let Ok(Some(event)) = decoder.feed(b) {
                events.push(event);
            }
        }
        events
    }

    #[test]
    fn test_contrast_framing_produces_single_event() {
        let events = decode_all(&[0x81, 0x2A]);
        assert_eq!(events, [CommandEvent::Contrast(0x2A)]);
    }

    #[test]
    fn test_column_address_high_nibble_first() {
        let events = decode_all(&command::column_address(101, 0));
        assert_eq!(events, [CommandEvent::ColumnAddress(101)]);
    }

    #[test]
    fn test_column_address_low_nibble_first() {
        // Reversed nibble order still reassembles the address
        let events = decode_all(&[0x05, 0x16]);
        assert_eq!(events, [CommandEvent::ColumnAddress(101)]);
    }

    #[test]
    fn test_descending_mask_order() {
        // Each of these satisfies at least one looser mask further down the chain
        assert_eq!(decode_all(&[0xE2]), [CommandEvent::Reset]);
        assert_eq!(decode_all(&[0xC8]), [CommandEvent::VOrientation(8)]);
        assert_eq!(decode_all(&[0xB3]), [CommandEvent::PageAddress(3)]);
        assert_eq!(decode_all(&[0xAE]), [CommandEvent::Sleep(true)]);
        assert_eq!(decode_all(&[0xAF]), [CommandEvent::Sleep(false)]);
        assert_eq!(decode_all(&[0xA7]), [CommandEvent::Inverted(true)]);
        assert_eq!(decode_all(&[0xA4]), [CommandEvent::AllPixelsOn(false)]);
        assert_eq!(decode_all(&[0xA3]), [CommandEvent::BiasRatio(1)]);
        assert_eq!(decode_all(&[0xA1]), [CommandEvent::HOrientation(1)]);
        assert_eq!(decode_all(&[0x7F]), [CommandEvent::StartLine(0x3F)]);
        assert_eq!(
            decode_all(&[0x2F]),
            [CommandEvent::PowerControl {
                booster: true,
                regulator: true,
                follower: true,
            }]
        );
        assert_eq!(decode_all(&[0x27]), [CommandEvent::BiasVoltageDivider(7)]);
    }

    #[test]
    fn test_advanced_control_framing() {
        let events = decode_all(&command::advanced_control(true, true, false));
        assert_eq!(
            events,
            [CommandEvent::AdvancedControl {
                temp_comp_high: true,
                column_wrap: true,
                page_wrap: false,
            }]
        );
    }

    #[test]
    fn test_advanced_control_bad_operand_recovers() {
        let mut decoder = CommandDecoder::new();
        assert_eq!(decoder.feed(0xFA), Ok(None));
        // Operand without the 0x10 marker is rejected
        assert_eq!(decoder.feed(0x00), Err(DecodeError { byte: 0x00 }));
        assert!(!decoder.is_pending());
        // Decoding resumes with the next byte
        assert_eq!(decoder.feed(0xB1), Ok(Some(CommandEvent::PageAddress(1))));
    }

    #[test]
    fn test_view_direction_roundtrip() {
        let events = decode_all(&command::view_direction(ViewDirection::Top));
        assert_eq!(
            events,
            [CommandEvent::HOrientation(0), CommandEvent::VOrientation(8)]
        );
    }

    #[test]
    fn test_column_address_roundtrip_all_columns() {
        for shift in [0x00u8, 0x1E] {
            for col in 0..102u8 {
                let events = decode_all(&command::column_address(col, shift));
                assert_eq!(
                    events,
                    [CommandEvent::ColumnAddress(col.wrapping_add(shift))],
                    "column {col} shift {shift}"
                );
            }
        }
    }

    #[test]
    fn test_page_address_roundtrip_all_pages() {
        for page in 0..16u8 {
            let events = decode_all(&command::page_address(page));
            assert_eq!(events, [CommandEvent::PageAddress(page)]);
        }
    }
}
