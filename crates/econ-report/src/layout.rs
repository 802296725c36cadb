//! Pagination of titled image sections.
//!
//! Layout runs twice over the same measured sections: once on a
//! [`MeasureCanvas`](crate::MeasureCanvas) to learn the page each section
//! header lands on, and once on the real canvas. Both passes share this code,
//! so the table of contents built from the first pass matches the second.

use crate::canvas::{Canvas, Font};
use crate::geometry::PageGeometry;
use crate::image::{ImageProbe, ImageSize};
use crate::section::ReportSection;
use chrono::NaiveDate;
use econ_core::{EconError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, trace};

/// Title font size on the title page.
const TITLE_SIZE: f32 = 24.0;
/// Drop from the top edge to the title baseline.
const TITLE_DROP: f32 = 200.0;
/// Drop from the top edge to the date baseline.
const DATE_DROP: f32 = 250.0;
const BODY_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 16.0;
const FOOTER_SIZE: f32 = 10.0;
const LEADER_SIZE: f32 = 8.0;
const TOC_HEADING: &str = "Table of Contents";
const TOC_LEADER_X: f32 = 200.0;
const TOC_PAGE_X: f32 = 500.0;
const TOC_LEADER_DOTS: usize = 40;

/// Position of the next content line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageCursor {
    /// One-based page number.
    pub page: u32,
    /// Height above the bottom edge, in points.
    pub y: f32,
}

/// Where the layout engine is in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutState {
    /// Placing headers and rows on the current page.
    AccumulatingSection,
    /// The next item does not fit; the page is about to be finalized.
    PageFull,
    /// The last page has been finalized.
    DocumentComplete,
}

/// One table-of-contents line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Section title.
    pub title: String,
    /// Page the section header is drawn on.
    pub page: u32,
}

/// Result of laying out a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportPlan {
    /// Table of contents, one entry per section in order.
    pub toc: Vec<TocEntry>,
    /// Total number of pages, title and contents pages included.
    pub page_count: u32,
}

/// An image whose pixel size is known.
#[derive(Clone, Debug)]
pub(crate) struct MeasuredImage {
    path: PathBuf,
    size: ImageSize,
}

/// A section with every image probed.
#[derive(Clone, Debug)]
pub(crate) struct MeasuredSection {
    title: String,
    rows: Vec<Vec<MeasuredImage>>,
}

/// Probes every image once, failing on the first missing one.
pub(crate) fn measure<P: ImageProbe + ?Sized>(
    sections: &[ReportSection],
    probe: &P,
) -> Result<Vec<MeasuredSection>> {
    let mut sizes: HashMap<PathBuf, ImageSize> = HashMap::new();
    let mut measured = Vec::with_capacity(sections.len());

    for section in sections {
        let mut rows = Vec::new();
        for row in section.rows() {
            let mut images = Vec::with_capacity(row.len());
            for path in row {
                let size = match sizes.get(&path) {
                    Some(size) => *size,
                    None => {
                        let size = probe.size(&path)?;
                        trace!(path = %path.display(), width = size.width, height = size.height, "Probed image");
                        sizes.insert(path.clone(), size);
                        size
                    }
                };
                images.push(MeasuredImage { path, size });
            }
            rows.push(images);
        }
        measured.push(MeasuredSection {
            title: section.title().to_string(),
            rows,
        });
    }
    Ok(measured)
}

/// Draws the title page and finalizes it without a page number.
pub(crate) fn draw_title_page<C: Canvas + ?Sized>(
    canvas: &mut C,
    geometry: &PageGeometry,
    title: &str,
    date: NaiveDate,
) -> Result<()> {
    let width = canvas.text_width(title, Font::Bold, TITLE_SIZE);
    canvas.draw_text(
        title,
        Font::Bold,
        TITLE_SIZE,
        (geometry.width - width) / 2.0,
        geometry.height - TITLE_DROP,
    )?;

    let date = date.format("%B %d, %Y").to_string();
    let width = canvas.text_width(&date, Font::Regular, BODY_SIZE);
    canvas.draw_text(
        &date,
        Font::Regular,
        BODY_SIZE,
        (geometry.width - width) / 2.0,
        geometry.height - DATE_DROP,
    )?;
    canvas.finish_page()
}

/// Draws the table of contents over as many pages as it needs.
///
/// Returns the number of pages finalized.
pub(crate) fn draw_toc<C: Canvas + ?Sized>(
    canvas: &mut C,
    geometry: &PageGeometry,
    entries: &[TocEntry],
) -> Result<u32> {
    let leader = ". ".repeat(TOC_LEADER_DOTS);
    let mut pages = 0;

    for chunk in entries.chunks(geometry.toc_entries_per_page()) {
        canvas.draw_text(
            TOC_HEADING,
            Font::Bold,
            HEADING_SIZE,
            geometry.side_margin,
            geometry.top(),
        )?;
        let mut y = geometry.toc_first_line();
        for entry in chunk {
            canvas.draw_text(&entry.title, Font::Regular, BODY_SIZE, geometry.side_margin, y)?;
            canvas.draw_text(&entry.page.to_string(), Font::Regular, BODY_SIZE, TOC_PAGE_X, y)?;
            canvas.draw_text(&leader, Font::Regular, LEADER_SIZE, TOC_LEADER_X, y)?;
            y -= geometry.toc_line_height;
        }
        canvas.finish_page()?;
        pages += 1;
    }
    Ok(pages)
}

/// Places sections onto numbered content pages.
pub(crate) struct Layout<'a, C: Canvas + ?Sized> {
    geometry: &'a PageGeometry,
    canvas: &'a mut C,
    cursor: PageCursor,
    state: LayoutState,
    toc: Vec<TocEntry>,
}

impl<'a, C: Canvas + ?Sized> Layout<'a, C> {
    /// Starts laying out at the top of page `first_page`.
    pub(crate) fn new(geometry: &'a PageGeometry, canvas: &'a mut C, first_page: u32) -> Self {
        Self {
            geometry,
            canvas,
            cursor: PageCursor {
                page: first_page,
                y: geometry.top(),
            },
            state: LayoutState::AccumulatingSection,
            toc: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn cursor(&self) -> PageCursor {
        self.cursor
    }

    #[cfg(test)]
    pub(crate) const fn state(&self) -> LayoutState {
        self.state
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == LayoutState::DocumentComplete {
            return Err(EconError::Render("document is already complete".to_string()));
        }
        Ok(())
    }

    fn at_page_top(&self) -> bool {
        self.cursor.y >= self.geometry.top()
    }

    /// Places a section header and its rows.
    pub(crate) fn place_section(&mut self, section: &MeasuredSection) -> Result<()> {
        self.ensure_open()?;

        if self.cursor.y < self.geometry.header_threshold {
            self.state = LayoutState::PageFull;
            self.break_page()?;
        }

        let width = self
            .canvas
            .text_width(&section.title, Font::Bold, HEADING_SIZE);
        self.canvas.draw_text(
            &section.title,
            Font::Bold,
            HEADING_SIZE,
            (self.geometry.width - width) / 2.0,
            self.cursor.y,
        )?;
        self.toc.push(TocEntry {
            title: section.title.clone(),
            page: self.cursor.page,
        });
        debug!(section = %section.title, page = self.cursor.page, "Placed section header");
        self.cursor.y -= self.geometry.header_advance;

        for row in &section.rows {
            self.place_row(row)?;
        }

        self.cursor.y -= self.geometry.section_gap;
        Ok(())
    }

    fn place_row(&mut self, row: &[MeasuredImage]) -> Result<()> {
        if row.is_empty() {
            return Ok(());
        }
        let image_width = self.geometry.image_width(row.len());
        let heights: Vec<f32> = row
            .iter()
            .map(|image| image_width * image.size.aspect_ratio())
            .collect();
        let row_height = heights.iter().copied().fold(0.0_f32, f32::max);

        if self.cursor.y - row_height < self.geometry.bottom_margin && !self.at_page_top() {
            self.state = LayoutState::PageFull;
            self.break_page()?;
        }

        let mut x = self.geometry.side_margin;
        for (image, height) in row.iter().zip(&heights) {
            self.canvas.draw_image(
                &image.path,
                x,
                self.cursor.y - height,
                image_width,
                *height,
            )?;
            x += image_width + self.geometry.column_gap;
        }
        trace!(page = self.cursor.page, images = row.len(), height = row_height, "Placed row");

        self.cursor.y -= row_height + self.geometry.row_gap;
        Ok(())
    }

    fn stamp_page_number(&mut self) -> Result<()> {
        self.canvas.draw_text(
            &format!("Page {}", self.cursor.page),
            Font::Regular,
            FOOTER_SIZE,
            self.geometry.width - self.geometry.footer_inset,
            self.geometry.footer_y,
        )
    }

    fn break_page(&mut self) -> Result<()> {
        self.stamp_page_number()?;
        self.canvas.finish_page()?;
        self.cursor = PageCursor {
            page: self.cursor.page + 1,
            y: self.geometry.top(),
        };
        self.state = LayoutState::AccumulatingSection;
        Ok(())
    }

    /// Numbers and finalizes the last page.
    ///
    /// Returns the table of contents and the number of the last page.
    pub(crate) fn finish(mut self) -> Result<(Vec<TocEntry>, u32)> {
        self.ensure_open()?;
        self.stamp_page_number()?;
        self.canvas.finish_page()?;
        self.state = LayoutState::DocumentComplete;
        Ok((self.toc, self.cursor.page))
    }
}
