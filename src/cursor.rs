//! Cursor addressing state machine
//!
//! Tracks the (column, page) write position of a display, the active
//! orientation mirroring, and the wrap policy applied when data writes reach
//! a column edge. The host-side [`Display`](crate::display::Display) and the
//! [`Simulator`](crate::sim::Simulator) each own an independent `Cursor`;
//! they never share state and are kept in step only by the byte stream.

use crate::config::{Geometry, WrapMode};

/// Write position plus orientation and wrap state
#[derive(Clone, Debug)]
pub struct Cursor {
    geometry: Geometry,
    column: u8,
    page: u8,
    h_flip: bool,
    v_flip: bool,
    wrap: WrapMode,
}

impl Cursor {
    /// Create a cursor at (0, 0) with no mirroring and no wrapping
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            column: 0,
            page: 0,
            h_flip: false,
            v_flip: false,
            wrap: WrapMode::default(),
        }
    }

    /// Current column, 0..width
    pub fn column(&self) -> u8 {
        self.column
    }

    /// Current page, 0..ram_pages
    pub fn page(&self) -> u8 {
        self.page
    }

    /// Current (column, page) pair
    pub fn position(&self) -> (u8, u8) {
        (self.column, self.page)
    }

    /// The geometry this cursor addresses
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Active wrap policy
    pub fn wrap(&self) -> WrapMode {
        self.wrap
    }

    /// Replace the wrap policy
    pub fn set_wrap(&mut self, wrap: WrapMode) {
        self.wrap = wrap;
    }

    /// Whether column addressing is mirrored
    pub fn h_flip(&self) -> bool {
        self.h_flip
    }

    /// Whether page addressing is mirrored
    pub fn v_flip(&self) -> bool {
        self.v_flip
    }

    /// Clamp a target position into the addressable range without moving
    pub fn clamp(&self, column: i32, page: i32) -> (u8, u8) {
        let column = column.clamp(0, i32::from(self.geometry.width) - 1) as u8;
        let page = page.clamp(0, i32::from(self.geometry.ram_pages) - 1) as u8;
        (column, page)
    }

    /// Store a new position; the caller commits it after a successful emission
    pub fn set(&mut self, column: u8, page: u8) {
        let (column, page) = self.clamp(i32::from(column), i32::from(page));
        self.column = column;
        self.page = page;
    }

    /// Change horizontal mirroring, reflecting the column on a change
    pub fn set_h_flip(&mut self, flipped: bool) {
        if self.h_flip != flipped {
            self.column = self.geometry.width - 1 - self.column;
        }
        self.h_flip = flipped;
    }

    /// Change vertical mirroring, reflecting the page on a change
    pub fn set_v_flip(&mut self, flipped: bool) {
        if self.v_flip != flipped {
            self.page = self.geometry.ram_pages - 1 - self.page;
        }
        self.v_flip = flipped;
    }

    /// Apply a decoded column address under the active orientation
    pub fn address_column(&mut self, value: i32) {
        let width = i32::from(self.geometry.width);
        let value = value.clamp(0, width - 1);
        self.column = if self.h_flip {
            (width - 1 - value) as u8
        } else {
            value as u8
        };
    }

    /// Apply a decoded page address under the active orientation
    pub fn address_page(&mut self, value: u8) {
        let pages = self.geometry.ram_pages;
        let value = value.min(pages - 1);
        self.page = if self.v_flip {
            pages - 1 - value
        } else {
            value
        };
    }

    /// Columns available in the write direction, including the current one
    pub fn available(&self) -> usize {
        if self.h_flip {
            usize::from(self.column) + 1
        } else {
            usize::from(self.geometry.width - self.column)
        }
    }

    /// Advance past a data write of `count` bytes, applying the wrap policy
    ///
    /// The cursor lands on the last written column. If that column is an
    /// edge, page wrapping moves to the adjacent page (direction follows the
    /// vertical mirroring) and column wrapping carries the column to the
    /// opposite edge; without column wrapping the cursor stays clamped at the
    /// edge. Horizontal mirroring reverses the direction of advancement.
    pub fn consume(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let width = i32::from(self.geometry.width);
        let pages = i32::from(self.geometry.ram_pages);
        let h_dir: i32 = if self.h_flip { -1 } else { 1 };
        let v_dir: i32 = if self.v_flip { -1 } else { 1 };

        let mut column = i32::from(self.column) + h_dir * (count as i32 - 1);
        column = column.clamp(0, width - 1);

        if column == 0 || column == width - 1 {
            if self.wrap.page_wrap {
                self.page = (i32::from(self.page) + v_dir).rem_euclid(pages) as u8;
            }
            if self.wrap.column_wrap {
                column = (column - h_dir * (width - 1)).rem_euclid(width);
            }
        }
        self.column = column as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> Cursor {
        Cursor::new(Geometry::dogs102())
    }

    #[test]
    fn test_clamp_bounds() {
        let c = cursor();
        assert_eq!(c.clamp(-5, -1), (0, 0));
        assert_eq!(c.clamp(150, 12), (101, 7));
        assert_eq!(c.clamp(50, 3), (50, 3));
    }

    #[test]
    fn test_consume_lands_on_last_written_column() {
        let mut c = cursor();
        c.set(10, 2);
        c.consume(20);
        assert_eq!(c.position(), (29, 2));
    }

    #[test]
    fn test_consume_clamps_without_wrap() {
        let mut c = cursor();
        c.set(100, 0);
        c.consume(50);
        assert_eq!(c.position(), (101, 0));
        // A further write stays pinned at the edge
        c.consume(10);
        assert_eq!(c.position(), (101, 0));
    }

    #[test]
    fn test_consume_column_wrap() {
        let mut c = cursor();
        c.set_wrap(WrapMode {
            column_wrap: true,
            page_wrap: false,
        });
        c.set(0, 0);
        c.consume(102);
        assert_eq!(c.position(), (0, 0));
    }

    #[test]
    fn test_consume_page_wrap_advances_page() {
        let mut c = cursor();
        c.set_wrap(WrapMode {
            column_wrap: true,
            page_wrap: true,
        });
        c.set(0, 7);
        c.consume(102);
        // Page wraps modulo ram_pages
        assert_eq!(c.position(), (0, 0));
    }

    #[test]
    fn test_consume_reversed_under_h_flip() {
        let mut c = cursor();
        c.set(50, 0);
        c.set_h_flip(true);
        // Mirroring reflects the stored column
        assert_eq!(c.column(), 51);
        c.consume(10);
        assert_eq!(c.column(), 42);
    }

    #[test]
    fn test_page_wrap_direction_follows_v_flip() {
        let mut c = cursor();
        c.set_wrap(WrapMode {
            column_wrap: false,
            page_wrap: true,
        });
        c.set(101, 0);
        c.set_v_flip(true);
        assert_eq!(c.page(), 7);
        c.consume(1);
        assert_eq!(c.page(), 6);
    }

    #[test]
    fn test_address_column_mirrored() {
        let mut c = cursor();
        c.address_column(10);
        assert_eq!(c.column(), 10);
        c.set_h_flip(true);
        c.address_column(10);
        assert_eq!(c.column(), 91);
        // Negative input (shift subtraction underflow) clamps to zero
        c.address_column(-6);
        assert_eq!(c.column(), 101);
    }

    #[test]
    fn test_available_by_direction() {
        let mut c = cursor();
        c.set(100, 0);
        assert_eq!(c.available(), 2);
        c.set_h_flip(true);
        assert_eq!(c.available(), 2);
    }

    #[test]
    fn test_wrap_invariant_over_random_writes() {
        // Column stays inside [0, width-1] under any sequence of writes
        for wrap in [
            WrapMode {
                column_wrap: true,
                page_wrap: true,
            },
            WrapMode {
                column_wrap: false,
                page_wrap: false,
            },
        ] {
            let mut c = cursor();
            c.set_wrap(wrap);
            let mut n = 7usize;
            for _ in 0..200 {
                n = (n * 31 + 11) % 130 + 1;
                c.consume(n);
                assert!(c.column() <= 101);
                assert!(c.page() <= 7);
            }
        }
    }
}
