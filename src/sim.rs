//! Terminal protocol simulator
//!
//! [`Simulator`] consumes the exact byte stream the command encoders
//! produce and mirrors what a real display would show: it decodes commands
//! through [`CommandDecoder`], keeps its own [`Cursor`] and a RAM mirror,
//! and renders data bytes as Unicode block glyphs through ANSI escape
//! sequences on any [`core::fmt::Write`] sink.
//!
//! Each data byte holds 8 vertical pixels; a terminal cell shows 2 of them,
//! so one RAM page maps to 4 terminal rows with a 2-bit pattern per cell:
//! blank, upper half block, lower half block, full block.
//!
//! The simulator implements [`DisplayInterface`], so it can replace the SPI
//! transport of a [`Display`](crate::display::Display) unchanged:
//!
//! ```
//! use dogs102::{Builder, Display, Geometry, Simulator};
//!
//! let sim = Simulator::new(String::new(), Geometry::dogs102());
//! let config = Builder::new().geometry(Geometry::dogs102()).build()?;
//! let mut display = Display::new(sim, config);
//! display.clear()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Host and simulator never share state; their cursors are independent
//! state machines converging only through the byte stream.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Write;
use embedded_hal::delay::DelayNs;

use crate::config::{Geometry, WrapMode};
use crate::cursor::Cursor;
use crate::decode::{CommandDecoder, CommandEvent};
use crate::interface::DisplayInterface;
use crate::queue::{Message, MessageKind};

/// Terminal rows per 8-pixel RAM page (2 pixels per cell)
pub const LINES_PER_PAGE: u8 = 4;

/// Block glyphs indexed by 2-bit pixel pattern
const GLYPHS: [char; 4] = [' ', '\u{2580}', '\u{2584}', '\u{2588}'];

/// Protocol simulator rendering to a terminal stream
#[derive(Debug)]
pub struct Simulator<W: Write> {
    out: W,
    geometry: Geometry,
    cursor: Cursor,
    decoder: CommandDecoder,
    /// Active column-address shift, follows the horizontal orientation
    shift_addr: u8,
    inverted: bool,
    sleeping: bool,
    all_pixels_on: bool,
    start_line: u8,
    contrast: u8,
    /// RAM mirror, one byte per page per column
    ram: Vec<u8>,
    /// Inbound FIFO, drained one message at a time
    queue: VecDeque<Message>,
    processing: bool,
}

impl<W: Write> Simulator<W> {
    /// Create a simulator for the given geometry, writing to `out`
    pub fn new(out: W, geometry: Geometry) -> Self {
        Self {
            out,
            geometry,
            cursor: Cursor::new(geometry),
            decoder: CommandDecoder::new(),
            shift_addr: 0,
            inverted: false,
            sleeping: false,
            all_pixels_on: false,
            start_line: 0,
            contrast: 0,
            ram: vec![0; geometry.buffer_size()],
            queue: VecDeque::new(),
            processing: false,
        }
    }

    /// The mirrored RAM contents, `width * ram_pages` bytes, page-major
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Read one mirrored pixel
    pub fn pixel(&self, x: u8, y: u16) -> bool {
        let page = (y / 8) as u8;
        if x >= self.geometry.width || page >= self.geometry.ram_pages {
            return false;
        }
        let byte = self.ram[usize::from(page) * usize::from(self.geometry.width) + usize::from(x)];
        byte & (1 << (y % 8)) != 0
    }

    /// Mirrored cursor position
    pub fn cursor(&self) -> (u8, u8) {
        self.cursor.position()
    }

    /// Mirrored contrast value
    pub fn contrast(&self) -> u8 {
        self.contrast
    }

    /// Whether the mirrored display is sleeping
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Whether the mirrored display is inverted
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Whether the all-pixels-on test mode is active
    pub fn is_all_pixels_on(&self) -> bool {
        self.all_pixels_on
    }

    /// Mirrored scroll start line
    pub fn start_line(&self) -> u8 {
        self.start_line
    }

    /// The terminal stream written so far
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consume the simulator and return the terminal stream
    pub fn into_output(self) -> W {
        self.out
    }

    /// Append a message to the inbound queue
    pub fn enqueue(&mut self, message: Message) {
        self.queue.push_back(message);
    }

    /// Process queued messages, oldest first
    ///
    /// At most one message is processed at a time; failures are logged,
    /// processing continues, and the first failure is reported.
    pub fn pump(&mut self) -> Result<(), core::fmt::Error> {
        if self.processing {
            return Ok(());
        }
        let mut first_error = None;
        while let Some(message) = self.queue.pop_front() {
            self.processing = true;
            let result = self.process(message.kind, &message.payload);
            self.processing = false;
            if let Err(error) = result {
                log::warn!("simulator failed to render a {:?} message", message.kind);
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn process(&mut self, kind: MessageKind, bytes: &[u8]) -> Result<(), core::fmt::Error> {
        match kind {
            MessageKind::Command => {
                for &byte in bytes {
                    match self.decoder.feed(byte) {
                        Ok(Some(event)) => self.apply(event)?,
                        Ok(None) => {}
                        // Resume with the next byte
                        Err(error) => log::warn!("skipping undecodable byte: {error}"),
                    }
                }
                Ok(())
            }
            MessageKind::Data => self.render_data(bytes),
        }
    }

    fn apply(&mut self, event: CommandEvent) -> Result<(), core::fmt::Error> {
        match event {
            CommandEvent::Sleep(sleeping) => {
                self.sleeping = sleeping;
                if sleeping {
                    self.clear_screen()?;
                }
            }
            CommandEvent::StartLine(line) => self.start_line = line,
            CommandEvent::HOrientation(flag) => {
                self.cursor.set_h_flip(flag == 1);
                self.shift_addr = if flag == 0 {
                    self.geometry.shift_addr_topview
                } else {
                    self.geometry.shift_addr_normal
                };
            }
            CommandEvent::VOrientation(flag) => self.cursor.set_v_flip(flag != 0),
            CommandEvent::PageAddress(page) => {
                self.cursor.address_page(page);
                self.cursor_to_current()?;
            }
            CommandEvent::ColumnAddress(raw) => {
                self.cursor
                    .address_column(i32::from(raw) - i32::from(self.shift_addr));
                self.cursor_to_current()?;
            }
            CommandEvent::Contrast(value) => {
                self.contrast = value;
                // Fade the foreground towards the background as contrast drops
                let grey = (250 * u32::from(63 - value) / 63) as u8;
                write!(self.out, "\x1b]10;#{grey:02x}{grey:02x}{grey:02x}\x07")?;
            }
            CommandEvent::Inverted(inverted) => self.inverted = inverted,
            CommandEvent::AllPixelsOn(on) => self.all_pixels_on = on,
            CommandEvent::AdvancedControl {
                column_wrap,
                page_wrap,
                ..
            } => self.cursor.set_wrap(WrapMode {
                column_wrap,
                page_wrap,
            }),
            CommandEvent::Reset => {
                self.reset_registers();
                self.clear_screen()?;
            }
            // Electrical configuration has nothing to mirror
            CommandEvent::BiasRatio(_)
            | CommandEvent::PowerControl { .. }
            | CommandEvent::BiasVoltageDivider(_) => {}
        }
        Ok(())
    }

    /// Render one data message at the mirrored cursor
    ///
    /// The message is split into packs limited by the space remaining in the
    /// write direction; after each pack the cursor consumes the written
    /// columns under the active wrap policy, exactly like the addressing
    /// state machine in the controller's RAM.
    fn render_data(&mut self, bytes: &[u8]) -> Result<(), core::fmt::Error> {
        let width = usize::from(self.geometry.width);
        let mut remaining = bytes;
        while !remaining.is_empty() {
            let space = self.cursor.available();
            let take = space.min(remaining.len());
            let (pack, rest) = remaining.split_at(take);
            remaining = rest;

            let (column, page) = self.cursor.position();
            let h_flip = self.cursor.h_flip();
            let v_flip = self.cursor.v_flip();

            // RAM mirror at the addressed positions
            for (j, &byte) in pack.iter().enumerate() {
                let target = if h_flip {
                    usize::from(column) - j
                } else {
                    usize::from(column) + j
                };
                self.ram[usize::from(page) * width + target] = byte;
            }

            // Four terminal rows per page, two pixels per cell
            for i in 0..LINES_PER_PAGE {
                let row_in_page = if v_flip { LINES_PER_PAGE - 1 - i } else { i };
                let term_row = u16::from(page) * u16::from(LINES_PER_PAGE) + u16::from(row_in_page);
                let term_col = if h_flip {
                    u16::from(column) + 1 - pack.len() as u16
                } else {
                    u16::from(column)
                };
                self.cursor_to(term_col, term_row)?;
                let mut line = String::with_capacity(pack.len() * 3);
                for &byte in pack {
                    let mut pattern = (byte >> (i * 2)) & 0x03;
                    if v_flip {
                        // Swap the two pixels of the cell
                        pattern = (((pattern << 2) | pattern) >> 1) & 0x03;
                    }
                    if self.inverted {
                        pattern = !(0x04 | pattern) & 0x03;
                    }
                    let glyph = GLYPHS[usize::from(pattern)];
                    if h_flip {
                        line.insert(0, glyph);
                    } else {
                        line.push(glyph);
                    }
                }
                self.out.write_str(&line)?;
            }

            self.cursor.consume(pack.len());
        }
        Ok(())
    }

    fn cursor_to_current(&mut self) -> Result<(), core::fmt::Error> {
        let (column, page) = self.cursor.position();
        self.cursor_to(
            u16::from(column),
            u16::from(page) * u16::from(LINES_PER_PAGE),
        )
    }

    fn cursor_to(&mut self, column: u16, row: u16) -> Result<(), core::fmt::Error> {
        write!(self.out, "\x1b[{};{}H", row + 1, column + 1)
    }

    fn clear_screen(&mut self) -> Result<(), core::fmt::Error> {
        self.out.write_str("\x1b[1;1H\x1b[0J")
    }

    fn reset_registers(&mut self) {
        self.cursor = Cursor::new(self.geometry);
        self.decoder.reset();
        self.shift_addr = 0;
        self.inverted = false;
        self.sleeping = false;
        self.all_pixels_on = false;
        self.start_line = 0;
    }
}

impl<W: Write> DisplayInterface for Simulator<W> {
    type Error = core::fmt::Error;

    fn send(&mut self, kind: MessageKind, bytes: &[u8]) -> Result<(), Self::Error> {
        self.enqueue(Message {
            kind,
            payload: bytes.to_vec(),
        });
        self.pump()
    }

    fn reset<D: DelayNs>(&mut self, _delay: &mut D) {
        // Terminal chrome: pale background, black foreground, cleared screen
        let _ = self
            .out
            .write_str("\x1b]11;#ffff99\x07\x1b]10;#000000\x07\x1b[1;1H\x1b[0J");
        self.reset_registers();
        self.ram.fill(0);
    }
}
