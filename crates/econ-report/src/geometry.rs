//! Page geometry in PDF points.

/// US Letter width in points.
pub const LETTER_WIDTH: f32 = 612.0;

/// US Letter height in points.
pub const LETTER_HEIGHT: f32 = 792.0;

/// Page size, margins and spacing used by the layout engine.
///
/// All values are PDF points (1/72 inch); vertical positions are measured from
/// the bottom edge of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    /// Page width.
    pub width: f32,
    /// Page height.
    pub height: f32,
    /// Left and right margin.
    pub side_margin: f32,
    /// Distance from the top edge to the first line of content.
    pub top_offset: f32,
    /// Content never extends below this height.
    pub bottom_margin: f32,
    /// A section header needs the cursor at or above this height, else it starts a new page.
    pub header_threshold: f32,
    /// Horizontal gap between images on a row.
    pub column_gap: f32,
    /// Vertical gap after each row.
    pub row_gap: f32,
    /// Space taken by a section header.
    pub header_advance: f32,
    /// Extra space after each section.
    pub section_gap: f32,
    /// Baseline of the page-number footer.
    pub footer_y: f32,
    /// Distance of the page-number footer from the right edge.
    pub footer_inset: f32,
    /// Line height of table-of-contents entries.
    pub toc_line_height: f32,
}

impl PageGeometry {
    /// US Letter with the default margins.
    #[must_use]
    pub const fn letter() -> Self {
        Self {
            width: LETTER_WIDTH,
            height: LETTER_HEIGHT,
            side_margin: 50.0,
            top_offset: 50.0,
            bottom_margin: 50.0,
            header_threshold: 100.0,
            column_gap: 20.0,
            row_gap: 30.0,
            header_advance: 30.0,
            section_gap: 20.0,
            footer_y: 30.0,
            footer_inset: 72.0,
            toc_line_height: 20.0,
        }
    }

    /// Height of the first content line on a fresh page.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.height - self.top_offset
    }

    /// Width available to a row of images.
    #[must_use]
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.side_margin
    }

    /// Width of each image on a row of `count` images.
    #[must_use]
    pub fn image_width(&self, count: usize) -> f32 {
        let count = count.max(1) as f32;
        (self.content_width() - self.column_gap * (count - 1.0)) / count
    }

    /// Height of the first table-of-contents entry.
    #[must_use]
    pub fn toc_first_line(&self) -> f32 {
        self.height - 2.0 * self.top_offset
    }

    /// Table-of-contents entries that fit on one page.
    #[must_use]
    pub fn toc_entries_per_page(&self) -> usize {
        let span = self.toc_first_line() - self.bottom_margin;
        if span < 0.0 || self.toc_line_height <= 0.0 {
            return 1;
        }
        (span / self.toc_line_height).floor() as usize + 1
    }

    /// Pages needed for a table of contents with `entries` lines.
    #[must_use]
    pub fn toc_pages(&self, entries: usize) -> usize {
        entries.div_ceil(self.toc_entries_per_page())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_width_splits_content() {
        let geometry = PageGeometry::letter();
        assert_eq!(geometry.image_width(1), 512.0);
        assert_eq!(geometry.image_width(2), 246.0);
    }

    #[test]
    fn test_toc_pages() {
        let geometry = PageGeometry::letter();
        assert_eq!(geometry.toc_entries_per_page(), 33);
        assert_eq!(geometry.toc_pages(0), 0);
        assert_eq!(geometry.toc_pages(33), 1);
        assert_eq!(geometry.toc_pages(34), 2);
    }
}
