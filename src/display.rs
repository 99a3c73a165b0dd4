//! Core display operations
//!
//! [`Display`] orchestrates the cursor, the command encoders and the outbound
//! queue into the high-level operations: clearing, cursor movement, text and
//! bitmap writes, and runtime settings. Every operation enqueues complete
//! messages and drains the queue through the interface before returning, so
//! a multi-row write only addresses row N+1 after row N has gone out.

use alloc::vec;
use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;

use crate::command;
use crate::config::{Config, Geometry, ViewDirection, WrapMode, MAX_CONTRAST};
use crate::cursor::Cursor;
use crate::error::Error;
use crate::font::{Bitmap, FontDefinition, Style};
use crate::interface::DisplayInterface;
use crate::queue::{Message, TransferQueue};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Display controller
///
/// Owns the host-side cursor and the outbound message queue. The cursor is
/// only committed after the corresponding addressing bytes went out, so a
/// failed transfer leaves the previous position intact.
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Transport to the display (or simulator)
    interface: I,
    /// Display configuration
    config: Config,
    /// Host-side cursor
    cursor: Cursor,
    /// Active column-address shift, follows the horizontal orientation
    shift_addr: u8,
    /// Outbound FIFO
    queue: TransferQueue,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    pub fn new(interface: I, config: Config) -> Self {
        let mut cursor = Cursor::new(config.geometry);
        cursor.set_wrap(config.wrap);
        let shift_addr = match config.view_direction {
            ViewDirection::Bottom => config.geometry.shift_addr_normal,
            ViewDirection::Top => config.geometry.shift_addr_topview,
        };
        Self {
            interface,
            config,
            cursor,
            shift_addr,
            queue: TransferQueue::new(),
        }
    }

    /// Hardware reset followed by the full initialization sequence
    ///
    /// The sequence configures start line, orientation, inversion, bias,
    /// power, contrast and wrapping, then wakes the display. It is sent as
    /// one command message.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.reset(delay);
        let geometry = self.config.geometry;
        log::debug!(
            "initializing display, {}x{} pages",
            geometry.width,
            geometry.ram_pages
        );
        let mut message = Vec::new();
        message.extend_from_slice(&command::start_line(self.config.start_line));
        message.extend_from_slice(&self.view_direction_bytes(self.config.view_direction));
        message.extend_from_slice(&command::all_pixels_on(false));
        message.extend_from_slice(&command::inverted(self.config.inverted));
        message.extend_from_slice(&command::bias_ratio(self.config.bias_ratio));
        message.extend_from_slice(&command::power_control(true, true, true));
        message.extend_from_slice(&command::bias_voltage_divider(7));
        message.extend_from_slice(&command::contrast(self.config.contrast));
        message.extend_from_slice(&command::advanced_control(
            self.config.temp_comp_high,
            self.config.wrap.column_wrap,
            self.config.wrap.page_wrap,
        ));
        message.extend_from_slice(&command::sleep(false));
        self.send_command(message)
    }

    /// Move the cursor to the given position, clamped to the display bounds
    ///
    /// The stored position is updated only after the addressing bytes were
    /// emitted.
    pub fn move_to(&mut self, column: u8, page: u8) -> DisplayResult<I> {
        self.move_to_clamped(i32::from(column), i32::from(page))
    }

    /// Move the cursor by the given number of pages and columns
    ///
    /// Offsets wrap modulo the display extent; a negative result clamps to
    /// the nearest edge.
    pub fn move_by(&mut self, pages: i8, columns: i16) -> DisplayResult<I> {
        let geometry = self.config.geometry;
        let column = (i32::from(self.cursor.column()) + i32::from(columns))
            % i32::from(geometry.width);
        let page =
            (i32::from(self.cursor.page()) + i32::from(pages)) % i32::from(geometry.ram_pages);
        self.move_to_clamped(column, page)
    }

    fn move_to_clamped(&mut self, column: i32, page: i32) -> DisplayResult<I> {
        let (column, page) = self.cursor.clamp(column, page);
        let bytes = command::goto(column, page, self.shift_addr);
        self.send_command(bytes.to_vec())?;
        self.cursor.set(column, page);
        Ok(())
    }

    /// Clear the whole display and leave the cursor at (0, 0)
    pub fn clear(&mut self) -> DisplayResult<I> {
        for page in 0..self.config.geometry.ram_pages {
            self.clear_page(page, false)?;
        }
        self.move_to(0, 0)
    }

    /// Clear one page: normal fill is blank, inverse fill is all pixels on
    pub fn clear_page(&mut self, page: u8, inverse: bool) -> DisplayResult<I> {
        self.move_to(0, page)?;
        let fill = if inverse { 0xFF } else { 0x00 };
        let width = usize::from(self.config.geometry.width);
        self.send_data(vec![fill; width])
    }

    /// Clear `count` columns from the cursor position on the current page
    ///
    /// Truncated at the right edge of the display.
    pub fn clear_columns(&mut self, count: u8, inverse: bool) -> DisplayResult<I> {
        let remaining = self.config.geometry.width - self.cursor.column();
        let count = usize::from(count.min(remaining));
        let fill = if inverse { 0xFF } else { 0x00 };
        self.send_data(vec![fill; count])
    }

    /// Render text at the cursor position
    ///
    /// The composited bitmap is emitted one page-row at a time, truncated to
    /// the columns and pages remaining at the cursor; between rows the cursor
    /// steps one page down and back to the start column.
    pub fn write_text(
        &mut self,
        text: &str,
        font: &FontDefinition,
        style: Style,
    ) -> DisplayResult<I> {
        let map = font.string_to_bitmap(text, style);
        self.write_rows(map.data(), map.height_pages(), map.columns(), false)
    }

    /// Render text and erase the rest of the line
    ///
    /// Like [`write_text`](Self::write_text), but every row is padded with
    /// blank columns to the full display width.
    pub fn write_line(
        &mut self,
        text: &str,
        font: &FontDefinition,
        style: Style,
    ) -> DisplayResult<I> {
        let map = font.string_to_bitmap(text, style);
        self.write_rows(map.data(), map.height_pages(), map.columns(), true)
    }

    /// Draw a pre-rendered bitmap of `pages` rows by `columns` columns
    ///
    /// # Errors
    ///
    /// Returns [`Error::BitmapSize`] if the bitmap length does not equal
    /// `pages * columns`.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap, pages: u8, columns: u8) -> DisplayResult<I> {
        let expected = usize::from(pages) * usize::from(columns);
        if bitmap.data().len() != expected {
            return Err(Error::BitmapSize {
                expected,
                provided: bitmap.data().len(),
            });
        }
        self.write_rows(bitmap.data(), pages, usize::from(columns), false)
    }

    /// Emit `height_pages` rows of column-major `data`, truncated to the
    /// space remaining at the cursor
    fn write_rows(
        &mut self,
        data: &[u8],
        height_pages: u8,
        source_columns: usize,
        pad_to_width: bool,
    ) -> DisplayResult<I> {
        if height_pages == 0 {
            return Ok(());
        }
        let geometry = self.config.geometry;
        let (column, page) = self.cursor.position();
        let printable_cols = source_columns.min(usize::from(geometry.width - column));
        let printable_pages = height_pages.min(geometry.ram_pages - page);
        let stride = usize::from(height_pages);
        for k in 0..usize::from(printable_pages) {
            let mut row: Vec<u8> = (0..printable_cols).map(|i| data[i * stride + k]).collect();
            if pad_to_width {
                row.resize(usize::from(geometry.width), 0x00);
            }
            self.send_data(row)?;
            if k + 1 < usize::from(printable_pages) {
                // Carriage return: the device cursor advanced over the row,
                // step one page down and back to the start column
                self.move_to_clamped(i32::from(column), i32::from(page) + k as i32 + 1)?;
            }
        }
        Ok(())
    }

    /// Set the contrast, clamped to 0..=63
    pub fn set_contrast(&mut self, value: u8) -> DisplayResult<I> {
        let value = value.min(MAX_CONTRAST);
        self.send_command(command::contrast(value).to_vec())?;
        self.config.contrast = value;
        Ok(())
    }

    /// Set the view direction
    ///
    /// Also switches the column-address shift used by subsequent moves.
    pub fn set_view_direction(&mut self, direction: ViewDirection) -> DisplayResult<I> {
        let bytes = self.view_direction_bytes(direction);
        self.send_command(bytes.to_vec())?;
        self.config.view_direction = direction;
        Ok(())
    }

    /// Set the edge wrapping behavior for data writes
    pub fn set_wrapping(&mut self, wrap: WrapMode) -> DisplayResult<I> {
        self.send_command(
            command::advanced_control(
                self.config.temp_comp_high,
                wrap.column_wrap,
                wrap.page_wrap,
            )
            .to_vec(),
        )?;
        self.config.wrap = wrap;
        self.cursor.set_wrap(wrap);
        Ok(())
    }

    /// Set the scroll start line, 0..=63
    pub fn set_start_line(&mut self, line: u8) -> DisplayResult<I> {
        let line = line & 0x3F;
        self.send_command(command::start_line(line).to_vec())?;
        self.config.start_line = line;
        Ok(())
    }

    /// Invert the display
    pub fn set_inverted(&mut self, inverted: bool) -> DisplayResult<I> {
        self.send_command(command::inverted(inverted).to_vec())?;
        self.config.inverted = inverted;
        Ok(())
    }

    /// Switch the all-pixels-on test mode
    pub fn set_all_pixels_on(&mut self, on: bool) -> DisplayResult<I> {
        self.send_command(command::all_pixels_on(on).to_vec())
    }

    /// Send the display to sleep or wake it up
    pub fn set_sleep(&mut self, sleep: bool) -> DisplayResult<I> {
        self.send_command(command::sleep(sleep).to_vec())
    }

    /// Software reset
    pub fn sw_reset(&mut self) -> DisplayResult<I> {
        self.send_command(command::reset().to_vec())
    }

    /// Current cursor column
    pub fn current_column(&self) -> u8 {
        self.cursor.column()
    }

    /// Current cursor page
    pub fn current_page(&self) -> u8 {
        self.cursor.page()
    }

    /// Display geometry
    pub fn geometry(&self) -> &Geometry {
        &self.config.geometry
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the underlying interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Mutable access to the underlying interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Consume the display and return the interface
    pub fn release(self) -> I {
        self.interface
    }

    fn view_direction_bytes(&mut self, direction: ViewDirection) -> [u8; 2] {
        self.shift_addr = match direction {
            ViewDirection::Bottom => self.config.geometry.shift_addr_normal,
            ViewDirection::Top => self.config.geometry.shift_addr_topview,
        };
        command::view_direction(direction)
    }

    fn send_command(&mut self, payload: Vec<u8>) -> DisplayResult<I> {
        self.queue.enqueue(Message::command(payload));
        self.pump()
    }

    fn send_data(&mut self, payload: Vec<u8>) -> DisplayResult<I> {
        self.queue.enqueue(Message::data(payload));
        self.pump()
    }

    fn pump(&mut self) -> DisplayResult<I> {
        self.queue.drain(&mut self.interface).map_err(Error::Interface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use crate::font::tests::fixed_font;
    use crate::queue::MessageKind;

    #[derive(Debug, Default)]
    struct MockInterface {
        sent: Vec<(MessageKind, Vec<u8>)>,
        fail_next: bool,
    }

    impl DisplayInterface for MockInterface {
        type Error = &'static str;

        fn send(&mut self, kind: MessageKind, bytes: &[u8]) -> Result<(), Self::Error> {
            if self.fail_next {
                self.fail_next = false;
                return Err("send failed");
            }
            self.sent.push((kind, bytes.to_vec()));
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}
    }

    struct MockDelay;
    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn test_display() -> Display<MockInterface> {
        let config = Builder::new()
            .geometry(Geometry::dogs102())
            .build()
            .unwrap();
        Display::new(MockInterface::default(), config)
    }

    fn data_messages(display: &Display<MockInterface>) -> Vec<Vec<u8>> {
        display
            .interface
            .sent
            .iter()
            .filter(|(kind, _)| *kind == MessageKind::Data)
            .map(|(_, bytes)| bytes.clone())
            .collect()
    }

    #[test]
    fn test_init_message_bytes() {
        let mut display = test_display();
        let mut delay = MockDelay;
        display.init(&mut delay).unwrap();
        assert_eq!(
            display.interface.sent,
            vec![(
                MessageKind::Command,
                vec![
                    0x40, // start line 0
                    0xA1, 0xC0, // bottom view
                    0xA4, // all pixels off
                    0xA6, // not inverted
                    0xA2, // bias 1/9
                    0x2F, // booster, regulator, follower on
                    0x27, // divider level 7
                    0x81, 0x10, // contrast 16
                    0xFA, 0x90, // advanced control, no wrapping
                    0xAF, // wake
                ]
            )]
        );
    }

    #[test]
    fn test_clear_emits_one_zero_row_per_page() {
        let mut display = test_display();
        display.clear().unwrap();
        let rows = data_messages(&display);
        assert_eq!(rows.len(), 8);
        for row in rows {
            assert_eq!(row.len(), 102);
            assert!(row.iter().all(|&b| b == 0));
        }
        assert_eq!((display.current_column(), display.current_page()), (0, 0));
        // One addressing command per page plus the final re-home
        let commands = display
            .interface
            .sent
            .iter()
            .filter(|(kind, _)| *kind == MessageKind::Command)
            .count();
        assert_eq!(commands, 9);
    }

    #[test]
    fn test_move_to_clamps_and_encodes() {
        let mut display = test_display();
        display.move_to(150, 12).unwrap();
        assert_eq!(
            display.interface.sent,
            vec![(MessageKind::Command, vec![0xB7, 0x16, 0x05])]
        );
        assert_eq!((display.current_column(), display.current_page()), (101, 7));
    }

    #[test]
    fn test_move_to_uses_topview_shift() {
        let config = Builder::new()
            .geometry(Geometry::dogs102())
            .view_direction(ViewDirection::Top)
            .build()
            .unwrap();
        let mut display = Display::new(MockInterface::default(), config);
        display.move_to(0, 0).unwrap();
        // Column 0 + 0x1E shift
        assert_eq!(
            display.interface.sent,
            vec![(MessageKind::Command, vec![0xB0, 0x11, 0x0E])]
        );
    }

    #[test]
    fn test_failed_move_leaves_cursor_unchanged() {
        let mut display = test_display();
        display.move_to(10, 2).unwrap();
        display.interface.fail_next = true;
        let result = display.move_to(50, 5);
        assert!(matches!(result, Err(Error::Interface(_))));
        assert_eq!((display.current_column(), display.current_page()), (10, 2));
    }

    #[test]
    fn test_move_by_wraps_modulo_extent() {
        let mut display = test_display();
        display.move_to(100, 6).unwrap();
        display.move_by(3, 4).unwrap();
        // (100 + 4) % 102 = 2, (6 + 3) % 8 = 1
        assert_eq!((display.current_column(), display.current_page()), (2, 1));
    }

    #[test]
    fn test_move_by_negative_clamps_at_zero() {
        let mut display = test_display();
        display.move_to(10, 0).unwrap();
        display.move_by(0, -36).unwrap();
        assert_eq!(display.current_column(), 0);
    }

    #[test]
    fn test_write_line_pads_to_full_width() {
        let mut display = test_display();
        let font = fixed_font();
        display
            .write_line("A", &font, Style::UNDERLINE)
            .unwrap();
        let rows = data_messages(&display);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.len(), 102);
        // 'A' is a solid block; the underline at bit 5 is absorbed
        assert_eq!(&row[..8], &[0xFF; 8]);
        assert!(row[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_line_applies_underline_mask() {
        let mut display = test_display();
        let font = fixed_font();
        display
            .write_line("B", &font, Style::UNDERLINE)
            .unwrap();
        let rows = data_messages(&display);
        // 'B' glyph 0x03 with the underline row at bit 8 - 3
        assert_eq!(&rows[0][..8], &[0x03 | (1 << 5); 8]);
    }

    #[test]
    fn test_write_text_multi_page_row_sequencing() {
        use crate::font::FontDefinition;
        let font = FontDefinition::proportional(
            16,
            "i",
            vec![2],
            vec![0],
            vec![0x11, 0x22, 0x33, 0x44],
            None,
        )
        .unwrap();
        let mut display = test_display();
        display.move_to(0, 0).unwrap();
        display.interface.sent.clear();
        display.write_text("i", &font, Style::NONE).unwrap();
        assert_eq!(
            display.interface.sent,
            vec![
                (MessageKind::Data, vec![0x11, 0x33]),
                // Carriage return to column 0, page 1
                (MessageKind::Command, vec![0xB1, 0x10, 0x00]),
                (MessageKind::Data, vec![0x22, 0x44]),
            ]
        );
    }

    #[test]
    fn test_write_text_truncates_at_right_edge() {
        let mut display = test_display();
        let font = fixed_font();
        display.move_to(96, 0).unwrap();
        display.write_text("AB", &font, Style::NONE).unwrap();
        let rows = data_messages(&display);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 6);
    }

    #[test]
    fn test_draw_bitmap_size_mismatch() {
        let mut display = test_display();
        let bitmap = Bitmap::new(4, 2);
        let result = display.draw_bitmap(&bitmap, 2, 5);
        assert!(matches!(
            result,
            Err(Error::BitmapSize {
                expected: 10,
                provided: 8
            })
        ));
    }

    #[test]
    fn test_draw_bitmap_rows_and_return() {
        let mut display = test_display();
        let bitmap = Bitmap::from_vec(vec![1, 2, 3, 4, 5, 6], 2).unwrap();
        display.move_to(10, 3).unwrap();
        display.interface.sent.clear();
        display.draw_bitmap(&bitmap, 2, 3).unwrap();
        assert_eq!(
            display.interface.sent,
            vec![
                (MessageKind::Data, vec![1, 3, 5]),
                (MessageKind::Command, vec![0xB4, 0x10, 0x0A]),
                (MessageKind::Data, vec![2, 4, 6]),
            ]
        );
    }

    #[test]
    fn test_set_contrast_clamps() {
        let mut display = test_display();
        display.set_contrast(200).unwrap();
        assert_eq!(
            display.interface.sent,
            vec![(MessageKind::Command, vec![0x81, 0x3F])]
        );
        assert_eq!(display.config().contrast, 63);
    }

    #[test]
    fn test_set_view_direction_switches_shift() {
        let mut display = test_display();
        display.set_view_direction(ViewDirection::Top).unwrap();
        display.move_to(0, 0).unwrap();
        let last = display.interface.sent.last().unwrap();
        assert_eq!(last.1, vec![0xB0, 0x11, 0x0E]);
    }

    #[test]
    fn test_set_wrapping_updates_cursor_policy() {
        let mut display = test_display();
        let wrap = WrapMode {
            column_wrap: true,
            page_wrap: true,
        };
        display.set_wrapping(wrap).unwrap();
        assert_eq!(
            display.interface.sent,
            vec![(MessageKind::Command, vec![0xFA, 0x93])]
        );
        assert_eq!(display.config().wrap, wrap);
    }

    #[test]
    fn test_sleep_and_reset_commands() {
        let mut display = test_display();
        display.set_sleep(true).unwrap();
        display.sw_reset().unwrap();
        assert_eq!(
            display.interface.sent,
            vec![
                (MessageKind::Command, vec![0xAE]),
                (MessageKind::Command, vec![0xE2]),
            ]
        );
    }
}
