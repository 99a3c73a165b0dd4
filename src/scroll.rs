//! Swing and step scrolling for text wider than the display
//!
//! Both animations slide a window over a precomputed [`Bitmap`] and redraw
//! it at a fixed page each tick:
//!
//! - [`Swing`] oscillates: the window moves by `step_size` columns per tick
//!   and bounces at either end of the bitmap.
//! - [`Step`] paginates: the window jumps a full display width per tick and
//!   wraps back to the start after the last (zero-padded) part.
//!
//! A tick is a bounded unit of work that renders one complete frame; ticks
//! never overlap and cancellation only takes effect between ticks, so no
//! partial frame is ever emitted. [`run_animation`] drives an animation on a
//! blocking delay; callers with their own timer can call
//! [`Animate::tick`] directly.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};
use embedded_hal::delay::DelayNs;

use crate::display::Display;
use crate::error::Error;
use crate::font::{Bitmap, FontDefinition, Style};
use crate::interface::DisplayInterface;

/// Default tick interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u32 = 100;

/// Default swing step size in columns
pub const DEFAULT_STEP_SIZE: u8 = 50;

/// Cooperative cancellation flag, checked between animation ticks
#[derive(Debug, Default)]
pub struct CancellationToken {
    cancelled: AtomicBool,
}

impl CancellationToken {
    /// Create a token in the running state
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Request cancellation; takes effect before the next tick
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A periodic display animation
pub trait Animate<I: DisplayInterface> {
    /// Render one complete frame and advance the animation state
    fn tick(&mut self, display: &mut Display<I>) -> Result<(), Error<I>>;
}

/// Oscillating scroller: the window bounces between the bitmap's edges
#[derive(Debug)]
pub struct Swing {
    bitmap: Bitmap,
    page: u8,
    step_size: u8,
    start_column: usize,
    direction: i32,
}

impl Swing {
    /// Create a swing animation over `bitmap`, drawn at `page`
    ///
    /// A zero `step_size` is raised to 1. A bitmap narrower than the display
    /// renders as a static, zero-padded frame.
    pub fn new(bitmap: Bitmap, page: u8, step_size: u8) -> Self {
        Self {
            bitmap,
            page,
            step_size: step_size.max(1),
            start_column: 0,
            direction: 1,
        }
    }

    /// Compose `text` with `font` and `style`, then animate it
    pub fn from_text(
        font: &FontDefinition,
        text: &str,
        style: Style,
        page: u8,
        step_size: u8,
    ) -> Self {
        Self::new(font.string_to_bitmap(text, style), page, step_size)
    }

    /// Current window start column
    pub fn start_column(&self) -> usize {
        self.start_column
    }

    /// Current movement direction, +1 or -1
    pub fn direction(&self) -> i32 {
        self.direction
    }
}

impl<I: DisplayInterface> Animate<I> for Swing {
    fn tick(&mut self, display: &mut Display<I>) -> Result<(), Error<I>> {
        render_window(display, &self.bitmap, self.page, self.start_column)?;

        let width = usize::from(display.geometry().width);
        let last_start = self.bitmap.columns().saturating_sub(width);
        if last_start == 0 {
            return Ok(());
        }
        let next =
            self.start_column as i64 + i64::from(self.direction) * i64::from(self.step_size);
        if next <= 0 {
            self.start_column = 0;
            self.direction = 1;
        } else if next >= last_start as i64 {
            self.start_column = last_start;
            self.direction = -1;
        } else {
            self.start_column = next as usize;
        }
        Ok(())
    }
}

/// Paginating scroller: the window jumps one display width per tick
#[derive(Debug)]
pub struct Step {
    bitmap: Bitmap,
    page: u8,
    start_column: usize,
}

impl Step {
    /// Create a step animation over `bitmap`, drawn at `page`
    pub fn new(bitmap: Bitmap, page: u8) -> Self {
        Self {
            bitmap,
            page,
            start_column: 0,
        }
    }

    /// Compose `text` with `font` and `style`, then animate it
    pub fn from_text(font: &FontDefinition, text: &str, style: Style, page: u8) -> Self {
        Self::new(font.string_to_bitmap(text, style), page)
    }

    /// Current window start column
    pub fn start_column(&self) -> usize {
        self.start_column
    }
}

impl<I: DisplayInterface> Animate<I> for Step {
    fn tick(&mut self, display: &mut Display<I>) -> Result<(), Error<I>> {
        render_window(display, &self.bitmap, self.page, self.start_column)?;

        let width = usize::from(display.geometry().width);
        let steps = self.bitmap.columns().div_ceil(width).max(1);
        self.start_column += width;
        if self.start_column >= steps * width {
            self.start_column = 0;
        }
        Ok(())
    }
}

/// Draw one display-wide window of `bitmap` at (0, `page`)
///
/// Columns beyond the bitmap's width are blank, so the final step page and
/// undersized bitmaps are zero-padded.
fn render_window<I: DisplayInterface>(
    display: &mut Display<I>,
    bitmap: &Bitmap,
    page: u8,
    start_column: usize,
) -> Result<(), Error<I>> {
    let width = usize::from(display.geometry().width);
    let pages = bitmap.height_pages();
    if pages == 0 {
        return Ok(());
    }
    let stride = usize::from(pages);
    let source = bitmap.data();
    let total = bitmap.columns();

    let mut data: Vec<u8> = Vec::with_capacity(width * stride);
    for i in 0..width {
        let column = start_column + i;
        for k in 0..stride {
            data.push(if column < total {
                source[column * stride + k]
            } else {
                0
            });
        }
    }
    let window = Bitmap::from_vec(data, pages).unwrap_or_else(|| Bitmap::new(width, pages));

    display.move_to(0, page)?;
    display.draw_bitmap(&window, pages, width as u8)
}

/// Drive an animation on a blocking periodic timer
///
/// Renders one frame per `interval_ms` until `token` is cancelled or a tick
/// fails. Cancellation is checked at the top of every cycle; a started tick
/// always completes.
pub fn run_animation<I, D, A>(
    animation: &mut A,
    display: &mut Display<I>,
    delay: &mut D,
    interval_ms: u32,
    token: &CancellationToken,
) -> Result<(), Error<I>>
where
    I: DisplayInterface,
    D: DelayNs,
    A: Animate<I>,
{
    while !token.is_cancelled() {
        animation.tick(display)?;
        delay.delay_ms(interval_ms);
    }
    Ok(())
}
