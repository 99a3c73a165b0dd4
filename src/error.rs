//! Error types for the driver
//!
//! Two layers of errors exist:
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations, generic over the
//!   interface so the underlying hardware error type is preserved
//!
//! Out-of-range cursor targets are deliberately *not* errors: addressing
//! operations clamp to the display edges, matching the controller's own
//! behavior. Decoder errors live in [`DecodeError`](crate::decode::DecodeError)
//! and are handled by the simulator without aborting the stream.
//!
//! ## Example
//!
//! ```
//! use dogs102::{Builder, BuilderError, Geometry};
//!
//! // Missing geometry
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingGeometry)));
//!
//! // Invalid geometry (the page-address field is 4 bits wide)
//! let result = Geometry::new(102, 17);
//! assert!(result.is_err());
//! ```

use crate::interface::DisplayInterface;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Transport error (SPI/GPIO, or the simulator's output sink)
    ///
    /// Wraps the underlying error from the [`DisplayInterface`] implementation.
    /// A failed transfer does not abort the outbound queue; remaining messages
    /// are still drained and the first failure is reported.
    Interface(I::Error),
    /// A bitmap's length does not match the declared page/column extent
    ///
    /// [`Display::draw_bitmap`](crate::display::Display::draw_bitmap) requires
    /// `bitmap.data().len() == pages * columns`.
    BitmapSize {
        /// Required length in bytes
        expected: usize,
        /// Provided length in bytes
        provided: usize,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::BitmapSize { expected, provided } => {
                write!(
                    f,
                    "Bitmap size mismatch: expected {expected} bytes, provided {provided}"
                )
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Geometry was not specified
    ///
    /// [`Builder::geometry()`](crate::config::Builder::geometry) must be called
    /// before building.
    MissingGeometry,
    /// Invalid geometry provided
    ///
    /// See [`Geometry::new()`](crate::config::Geometry::new) for constraints.
    InvalidGeometry {
        /// Width in columns requested
        width: u8,
        /// RAM page count requested
        ram_pages: u8,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingGeometry => write!(f, "Geometry must be specified"),
            Self::InvalidGeometry { width, ram_pages } => write!(
                f,
                "Invalid geometry {width}x{ram_pages} pages (width must be nonzero, 1..=16 pages)"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
