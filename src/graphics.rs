//! Graphics support via embedded-graphics
//!
//! Implements [`DrawTarget`] for [`Bitmap`], so images can be composed with
//! embedded-graphics primitives and then written to the display with
//! [`Display::draw_bitmap`](crate::display::Display::draw_bitmap).
//!
//! ## Example
//!
//! ```
//! use dogs102::Bitmap;
//! use embedded_graphics::{
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//! };
//!
//! let mut bitmap = Bitmap::new(32, 2);
//! Rectangle::new(Point::new(0, 0), Size::new(8, 16))
//!     .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
//!     .draw(&mut bitmap)
//!     .unwrap();
//! assert_eq!(bitmap.data()[0], 0xFF);
//! ```

use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{OriginDimensions, Size};
use embedded_graphics_core::pixelcolor::BinaryColor;
use embedded_graphics_core::prelude::Pixel;

use crate::font::Bitmap;

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(
            self.columns() as u32,
            u32::from(self.height_pages()) * 8,
        )
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as usize, point.y as usize, color.is_on());
            }
        }
        Ok(())
    }
}
