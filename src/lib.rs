//! EA DOG Graphic LCD Driver and Terminal Simulator
//!
//! A driver for the UC1701-class monochrome graphic LCD controllers used by
//! the EA DOG module family (DOGS102 and friends), plus a terminal simulator
//! that decodes the identical byte stream and renders it with Unicode block
//! glyphs.
//!
//! ## Features
//!
//! - `no_std` compatible (requires `alloc`)
//! - `embedded-hal` v1.0 SPI transport
//! - Bit-exact command encoder and decoder for the display protocol
//! - Proportional and fixed font composition with underline, strikethrough
//!   and inversion styles
//! - Swing and step scrolling for text wider than the display
//! - Protocol simulator implementing the same transport trait as the SPI
//!   interface (`Simulator` renders to any [`core::fmt::Write`] sink)
//! - `embedded-graphics` integration (with `graphics` feature)
//!
//! ## Usage
//!
//! ```
//! use dogs102::{Builder, Display, FontDefinition, Geometry, Simulator, Style};
//!
//! // A real setup passes an SPI `Interface`; the simulator implements the
//! // same trait and renders to any fmt::Write sink instead.
//! let sim = Simulator::new(String::new(), Geometry::dogs102());
//! let config = Builder::new()
//!     .geometry(Geometry::dogs102())
//!     .contrast(10)
//!     .build()?;
//! let mut display = Display::new(sim, config);
//!
//! display.clear()?;
//! display.move_to(0, 2)?;
//!
//! // Fonts come from an external loader; a trivial one-glyph font here
//! let font = FontDefinition::fixed(8, 3, "!", vec![0x00, 0x5F, 0x00], None)?;
//! display.write_line("!", &font, Style::UNDERLINE)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![no_std]

extern crate alloc;

/// Command byte encoders (the wire format)
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Cursor addressing state machine
pub mod cursor;
/// Command-stream decoder
pub mod decode;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Font composition and styled text bitmaps
pub mod font;
/// Hardware interface abstraction
pub mod interface;
/// Outbound message queue
pub mod queue;
/// Swing and step text animation
pub mod scroll;
/// Terminal protocol simulator
pub mod sim;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use config::{
    Builder, Config, Geometry, ViewDirection, WrapMode, MAX_CONTRAST, MAX_RAM_PAGES,
    PIXELS_PER_PAGE,
};
pub use cursor::Cursor;
pub use decode::{CommandDecoder, CommandEvent, DecodeError, PendingOp};
pub use display::Display;
pub use error::{BuilderError, Error};
pub use font::{Bitmap, FontDefinition, FontError, Style, MAX_SPACING};
pub use interface::{DisplayInterface, Interface, InterfaceError, RESET_PULSE_MS};
pub use queue::{Message, MessageKind, TransferQueue};
pub use scroll::{
    run_animation, Animate, CancellationToken, Step, Swing, DEFAULT_INTERVAL_MS, DEFAULT_STEP_SIZE,
};
pub use sim::{Simulator, LINES_PER_PAGE};
