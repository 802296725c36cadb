//! Drawing surface abstraction shared by the layout passes.

use econ_core::Result;
use std::path::Path;

/// Average glyph advance of Helvetica, in ems.
const REGULAR_ADVANCE: f32 = 0.5;

/// Average glyph advance of Helvetica Bold, in ems.
const BOLD_ADVANCE: f32 = 0.55;

/// Built-in fonts available to the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Font {
    /// Helvetica.
    Regular,
    /// Helvetica Bold.
    Bold,
}

/// A page-oriented drawing surface.
///
/// Coordinates are PDF points with the origin at the bottom-left corner of
/// the current page. A page exists as soon as anything is drawn on it or it is
/// finished; [`finish_page`](Canvas::finish_page) moves on to a fresh page.
pub trait Canvas {
    /// Draws `text` with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, text: &str, font: Font, size: f32, x: f32, y: f32) -> Result<()>;

    /// Draws the image at `path` with its bottom-left corner at `(x, y)`, scaled to `width` x `height`.
    fn draw_image(&mut self, path: &Path, x: f32, y: f32, width: f32, height: f32) -> Result<()>;

    /// Finalizes the current page.
    fn finish_page(&mut self) -> Result<()>;

    /// Approximate rendered width of `text`, used for centering.
    fn text_width(&self, text: &str, font: Font, size: f32) -> f32 {
        let advance = match font {
            Font::Regular => REGULAR_ADVANCE,
            Font::Bold => BOLD_ADVANCE,
        };
        text.chars().count() as f32 * size * advance
    }
}

/// Canvas that draws nothing and only counts finished pages.
///
/// The first layout pass runs against this to learn where sections land.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeasureCanvas {
    pages: u32,
}

impl MeasureCanvas {
    /// Creates an empty measuring canvas.
    #[must_use]
    pub const fn new() -> Self {
        Self { pages: 0 }
    }

    /// Pages finished so far.
    #[must_use]
    pub const fn pages(&self) -> u32 {
        self.pages
    }
}

impl Canvas for MeasureCanvas {
    fn draw_text(&mut self, _text: &str, _font: Font, _size: f32, _x: f32, _y: f32) -> Result<()> {
        Ok(())
    }

    fn draw_image(&mut self, _path: &Path, _x: f32, _y: f32, _w: f32, _h: f32) -> Result<()> {
        Ok(())
    }

    fn finish_page(&mut self) -> Result<()> {
        self.pages += 1;
        Ok(())
    }
}
