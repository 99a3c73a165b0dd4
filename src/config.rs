//! Display configuration types and builder

pub use crate::error::BuilderError;

/// Pixel rows per RAM page, fixed by the controller's byte-per-column layout
pub const PIXELS_PER_PAGE: u8 = 8;

/// Maximum RAM pages addressable by the page-address command (4-bit field)
pub const MAX_RAM_PAGES: u8 = 16;

/// Maximum contrast ("electronic volume") value, 6-bit field
pub const MAX_CONTRAST: u8 = 63;

/// Physical layout of a display variant
///
/// A display is a grid of `ram_pages` horizontal bands, each 8 pixels tall,
/// by `width` one-pixel columns. The column-address shifts account for
/// controllers whose RAM is wider than the glass: in top view the visible
/// window starts at a nonzero RAM column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Width in columns (pixels)
    pub width: u8,
    /// Height in 8-pixel RAM pages
    pub ram_pages: u8,
    /// Pixel rows per page, always [`PIXELS_PER_PAGE`]
    pub pixels_per_page: u8,
    /// Column-address offset applied in bottom view
    pub shift_addr_normal: u8,
    /// Column-address offset applied in top view
    pub shift_addr_topview: u8,
}

impl Geometry {
    /// Create a new geometry with validation
    ///
    /// Column-address shifts default to zero; use [`Geometry::shifts`] for
    /// variants with an offset RAM window.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidGeometry` if:
    /// - width == 0
    /// - `ram_pages` == 0 or `ram_pages` > [`MAX_RAM_PAGES`]
    pub fn new(width: u8, ram_pages: u8) -> Result<Self, BuilderError> {
        if width == 0 || ram_pages == 0 || ram_pages > MAX_RAM_PAGES {
            return Err(BuilderError::InvalidGeometry { width, ram_pages });
        }
        Ok(Self {
            width,
            ram_pages,
            pixels_per_page: PIXELS_PER_PAGE,
            shift_addr_normal: 0x00,
            shift_addr_topview: 0x00,
        })
    }

    /// Set the column-address shifts for bottom view and top view
    pub fn shifts(mut self, normal: u8, topview: u8) -> Self {
        self.shift_addr_normal = normal;
        self.shift_addr_topview = topview;
        self
    }

    /// Geometry of the EA DOGS102 module (102x64, 8 pages, 0x1E top-view shift)
    pub const fn dogs102() -> Self {
        Self {
            width: 102,
            ram_pages: 8,
            pixels_per_page: PIXELS_PER_PAGE,
            shift_addr_normal: 0x00,
            shift_addr_topview: 0x1E,
        }
    }

    /// Display height in pixels
    pub fn height(&self) -> u16 {
        u16::from(self.ram_pages) * u16::from(self.pixels_per_page)
    }

    /// Size of the full RAM mirror in bytes (one byte per page per column)
    pub fn buffer_size(&self) -> usize {
        usize::from(self.width) * usize::from(self.ram_pages)
    }
}

/// Mounting orientation of the display
///
/// Bottom view is the normal setting; top view is used for modules mounted
/// rotated by 180 degrees. The choice drives both orientation commands and
/// selects the active column-address shift.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewDirection {
    /// Viewed from below (6 o'clock), the default
    #[default]
    Bottom,
    /// Viewed from above (12 o'clock), for modules mounted upside down
    Top,
}

impl ViewDirection {
    /// Flag value for the horizontal-orientation command
    pub fn h_flag(self) -> u8 {
        match self {
            Self::Bottom => 1,
            Self::Top => 0,
        }
    }

    /// Flag value for the vertical-orientation command
    pub fn v_flag(self) -> u8 {
        match self {
            Self::Bottom => 0,
            Self::Top => 8,
        }
    }
}

/// Edge behavior for data writes
///
/// When a write reaches column 0 or `width - 1`, the cursor either wraps to
/// the opposite edge (and optionally the adjacent page) or clamps in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WrapMode {
    /// Wrap the column around modulo the display width
    pub column_wrap: bool,
    /// Advance to the adjacent page at a column edge
    pub page_wrap: bool,
}

/// Display configuration
///
/// Holds all configurable parameters for the controller. Use [`Builder`] to
/// create a `Config`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Display geometry
    pub geometry: Geometry,
    /// Mounting orientation
    pub view_direction: ViewDirection,
    /// Scroll start line, 0..=63
    pub start_line: u8,
    /// Display inversion (all pixels negated)
    pub inverted: bool,
    /// Bias ratio: 0 = 1/9, 1 = 1/7
    pub bias_ratio: u8,
    /// Contrast ("electronic volume"), 0..=63
    pub contrast: u8,
    /// High temperature-compensation coefficient in advanced program control
    pub temp_comp_high: bool,
    /// Edge wrapping behavior
    pub wrap: WrapMode,
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use dogs102::{Builder, Geometry, ViewDirection};
///
/// let config = Builder::new()
///     .geometry(Geometry::dogs102())
///     .view_direction(ViewDirection::Bottom)
///     .contrast(10)
///     .build();
/// assert!(config.is_ok());
/// ```
#[must_use]
pub struct Builder {
    /// Display geometry (required)
    geometry: Option<Geometry>,
    /// Mounting orientation
    view_direction: ViewDirection,
    /// Scroll start line
    start_line: u8,
    /// Display inversion
    inverted: bool,
    /// Bias ratio
    bias_ratio: u8,
    /// Contrast
    contrast: u8,
    /// Temperature compensation coefficient
    temp_comp_high: bool,
    /// Edge wrapping
    wrap: WrapMode,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            geometry: None,
            view_direction: ViewDirection::Bottom,
            start_line: 0,
            inverted: false,
            // 1/9 bias suits the standard glass
            bias_ratio: 0,
            // Factory-recommended midpoint
            contrast: 16,
            temp_comp_high: true,
            wrap: WrapMode::default(),
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display geometry (required)
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set the mounting orientation
    pub fn view_direction(mut self, direction: ViewDirection) -> Self {
        self.view_direction = direction;
        self
    }

    /// Set the scroll start line (masked to 0..=63)
    pub fn start_line(mut self, line: u8) -> Self {
        self.start_line = line & 0x3F;
        self
    }

    /// Set display inversion
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Set the bias ratio (0 = 1/9, 1 = 1/7)
    pub fn bias_ratio(mut self, ratio: u8) -> Self {
        self.bias_ratio = ratio & 0x01;
        self
    }

    /// Set the contrast, clamped to 0..=63
    pub fn contrast(mut self, contrast: u8) -> Self {
        self.contrast = contrast.min(MAX_CONTRAST);
        self
    }

    /// Set the temperature-compensation coefficient
    pub fn temp_comp_high(mut self, high: bool) -> Self {
        self.temp_comp_high = high;
        self
    }

    /// Set the edge wrapping behavior
    pub fn wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingGeometry` if geometry was not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            geometry: self.geometry.ok_or(BuilderError::MissingGeometry)?,
            view_direction: self.view_direction,
            start_line: self.start_line,
            inverted: self.inverted,
            bias_ratio: self.bias_ratio,
            contrast: self.contrast,
            temp_comp_high: self.temp_comp_high,
            wrap: self.wrap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dogs102_geometry() {
        let geometry = Geometry::dogs102();
        assert_eq!(geometry.width, 102);
        assert_eq!(geometry.ram_pages, 8);
        assert_eq!(geometry.height(), 64);
        assert_eq!(geometry.shift_addr_topview, 0x1E);
        assert_eq!(geometry.buffer_size(), 816);
    }

    #[test]
    fn test_geometry_validation() {
        assert!(Geometry::new(0, 8).is_err());
        assert!(Geometry::new(102, 0).is_err());
        assert!(Geometry::new(102, 17).is_err());
        assert!(Geometry::new(240, 16).is_ok());
    }

    #[test]
    fn test_builder_defaults() {
        let config = Builder::new()
            .geometry(Geometry::dogs102())
            .build()
            .unwrap();
        assert_eq!(config.view_direction, ViewDirection::Bottom);
        assert_eq!(config.contrast, 16);
        assert_eq!(config.start_line, 0);
        assert!(config.temp_comp_high);
        assert!(!config.wrap.column_wrap);
        assert!(!config.wrap.page_wrap);
    }

    #[test]
    fn test_builder_clamps_contrast() {
        let config = Builder::new()
            .geometry(Geometry::dogs102())
            .contrast(200)
            .build()
            .unwrap();
        assert_eq!(config.contrast, MAX_CONTRAST);
    }

    #[test]
    fn test_view_direction_flags() {
        assert_eq!(ViewDirection::Bottom.h_flag(), 1);
        assert_eq!(ViewDirection::Bottom.v_flag(), 0);
        assert_eq!(ViewDirection::Top.h_flag(), 0);
        assert_eq!(ViewDirection::Top.v_flag(), 8);
    }
}
