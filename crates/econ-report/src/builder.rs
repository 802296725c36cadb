//! Two-pass report assembly.

use crate::canvas::{Canvas, MeasureCanvas};
use crate::geometry::PageGeometry;
use crate::image::{FileProbe, ImageProbe};
use crate::layout::{Layout, MeasuredSection, ReportPlan, TocEntry, draw_title_page, draw_toc, measure};
use crate::pdf::PdfCanvas;
use crate::section::ReportSection;
use chrono::{Local, NaiveDate};
use econ_core::{EconError, Result};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Document title used when the report has none.
const UNTITLED: &str = "Report";

/// Assembles sections of images into a paginated document.
///
/// # Example
///
/// ```rust,ignore
/// use econ_report::{ReportBuilder, ReportSection, RowSpec};
///
/// let sections = vec![
///     ReportSection::new("Policy Rate").with_image("results/dff.png"),
///     ReportSection::new("Treasury Yields")
///         .with_row(RowSpec::grouped(["results/dgs2.png", "results/dgs10.png"], 2)),
/// ];
/// let plan = ReportBuilder::new()
///     .with_title("Rates Monitor")
///     .build(&sections, "results/report.pdf")?;
/// println!("{} pages", plan.page_count);
/// ```
#[derive(Clone, Debug)]
pub struct ReportBuilder<P = FileProbe> {
    title: Option<String>,
    date: NaiveDate,
    geometry: PageGeometry,
    probe: P,
}

impl ReportBuilder {
    /// Untitled US Letter report dated today, probing images on disk.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            date: Local::now().date_naive(),
            geometry: PageGeometry::default(),
            probe: FileProbe,
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ImageProbe> ReportBuilder<P> {
    /// Adds a title page.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Date printed on the title page.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Page size and spacing.
    #[must_use]
    pub const fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Source of image dimensions.
    #[must_use]
    pub fn with_probe<Q: ImageProbe>(self, probe: Q) -> ReportBuilder<Q> {
        ReportBuilder {
            title: self.title,
            date: self.date,
            geometry: self.geometry,
            probe,
        }
    }

    /// Report title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Page geometry.
    #[must_use]
    pub const fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Pages before the first section: the title page and the contents pages.
    fn front_matter_pages(&self, sections: usize) -> u32 {
        let title = u32::from(self.title.is_some());
        title + self.geometry.toc_pages(sections) as u32
    }

    fn validate(&self, sections: &[ReportSection]) -> Result<()> {
        if self.title.is_none() && sections.is_empty() {
            return Err(EconError::InvalidParameter(
                "report needs a title or at least one section".to_string(),
            ));
        }
        Ok(())
    }

    fn simulate(&self, measured: &[MeasuredSection]) -> Result<ReportPlan> {
        let front = self.front_matter_pages(measured.len());
        if measured.is_empty() {
            return Ok(ReportPlan {
                toc: Vec::new(),
                page_count: front,
            });
        }

        let mut canvas = MeasureCanvas::new();
        let mut layout = Layout::new(&self.geometry, &mut canvas, front + 1);
        for section in measured {
            layout.place_section(section)?;
        }
        let (toc, page_count) = layout.finish()?;
        Ok(ReportPlan { toc, page_count })
    }

    /// First pass: computes the page of every section header without drawing.
    ///
    /// Image dimensions come from the probe; nothing is decoded.
    ///
    /// # Errors
    /// Returns [`EconError::MissingImage`] if any image cannot be probed, or
    /// [`EconError::InvalidParameter`] for a report with neither title nor sections.
    #[instrument(skip(self, sections), fields(sections = sections.len()))]
    pub fn plan(&self, sections: &[ReportSection]) -> Result<ReportPlan> {
        self.validate(sections)?;
        let measured = measure(sections, &self.probe)?;
        let plan = self.simulate(&measured)?;
        debug!(pages = plan.page_count, "Planned report");
        Ok(plan)
    }

    /// Plans the report, then draws it on `canvas`.
    ///
    /// Page order is the title page (only when a title is set), the table of
    /// contents (whenever there is at least one section, titled or not), then
    /// the sections. Every page is finalized; nothing is drawn if planning fails.
    ///
    /// # Errors
    /// Returns planning errors, and any error raised by the canvas.
    #[instrument(skip(self, sections, canvas), fields(sections = sections.len()))]
    pub fn render<C: Canvas + ?Sized>(
        &self,
        sections: &[ReportSection],
        canvas: &mut C,
    ) -> Result<ReportPlan> {
        self.validate(sections)?;
        let measured = measure(sections, &self.probe)?;
        let plan = self.simulate(&measured)?;

        if let Some(title) = &self.title {
            draw_title_page(canvas, &self.geometry, title, self.date)?;
        }
        if measured.is_empty() {
            return Ok(plan);
        }

        let toc_pages = draw_toc(canvas, &self.geometry, &plan.toc)?;
        let first_page = u32::from(self.title.is_some()) + toc_pages + 1;

        let mut layout = Layout::new(&self.geometry, canvas, first_page);
        for section in &measured {
            layout.place_section(section)?;
        }
        let (drawn, last_page): (Vec<TocEntry>, u32) = layout.finish()?;
        if drawn != plan.toc || last_page != plan.page_count {
            return Err(EconError::Render(
                "final layout diverged from the planned table of contents".to_string(),
            ));
        }
        Ok(plan)
    }

    /// Renders the report as a PDF at `path`.
    ///
    /// The file is only created once layout has succeeded.
    ///
    /// # Errors
    /// Returns planning and drawing errors, or an I/O error writing the file.
    pub fn build(&self, sections: &[ReportSection], path: impl AsRef<Path>) -> Result<ReportPlan> {
        let path = path.as_ref();
        let mut canvas = PdfCanvas::new(self.title.as_deref().unwrap_or(UNTITLED), self.geometry)?;
        let plan = self.render(sections, &mut canvas)?;
        canvas.save(path)?;
        info!(path = %path.display(), pages = plan.page_count, "Report written");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Font;
    use crate::image::ImageSize;
    use crate::render::{ChartOptions, ChartRenderer};
    use econ_core::{SeriesId, SeriesTable};
    use std::path::PathBuf;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Text { page: u32, text: String, font: Font, size: f32, x: f32, y: f32 },
        Image { page: u32, path: PathBuf, y: f32, height: f32 },
    }

    #[derive(Debug, Default)]
    struct RecordingCanvas {
        page: u32,
        ops: Vec<Op>,
    }

    impl RecordingCanvas {
        fn new() -> Self {
            Self { page: 1, ops: Vec::new() }
        }

        fn texts_on(&self, page: u32) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text { page: p, text, .. } if *p == page => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn header_page(&self, title: &str) -> Option<u32> {
            self.ops.iter().find_map(|op| match op {
                Op::Text { page, text, font: Font::Bold, size, .. } if text == title && *size == 16.0 => {
                    Some(*page)
                }
                _ => None,
            })
        }
    }

    impl Canvas for RecordingCanvas {
        fn draw_text(&mut self, text: &str, font: Font, size: f32, x: f32, y: f32) -> Result<()> {
            self.ops.push(Op::Text {
                page: self.page,
                text: text.to_string(),
                font,
                size,
                x,
                y,
            });
            Ok(())
        }

        fn draw_image(&mut self, path: &Path, _x: f32, y: f32, _w: f32, height: f32) -> Result<()> {
            self.ops.push(Op::Image {
                page: self.page,
                path: path.to_path_buf(),
                y,
                height,
            });
            Ok(())
        }

        fn finish_page(&mut self) -> Result<()> {
            self.page += 1;
            Ok(())
        }
    }

    struct FixedProbe(ImageSize);

    impl ImageProbe for FixedProbe {
        fn size(&self, path: &Path) -> Result<ImageSize> {
            if path.to_string_lossy().contains("missing") {
                return Err(EconError::MissingImage {
                    path: path.to_path_buf(),
                    reason: "not found".to_string(),
                });
            }
            Ok(self.0)
        }
    }

    fn builder() -> ReportBuilder<FixedProbe> {
        ReportBuilder::new()
            .with_title("Rates Monitor")
            .with_date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
            .with_probe(FixedProbe(ImageSize::new(600, 450)))
    }

    fn overflowing_sections() -> Vec<ReportSection> {
        vec![
            ReportSection::new("Policy Rate")
                .with_image("dff.png")
                .with_image("dff_table.png"),
            ReportSection::new("Treasury Yields").with_image("dgs10.png"),
        ]
    }

    #[test]
    fn test_plan_counts_front_matter() {
        let plan = builder().plan(&overflowing_sections()).unwrap();
        assert_eq!(
            plan.toc,
            vec![
                TocEntry { title: "Policy Rate".to_string(), page: 3 },
                TocEntry { title: "Treasury Yields".to_string(), page: 4 },
            ]
        );
        assert_eq!(plan.page_count, 5);
    }

    #[test]
    fn test_toc_matches_final_pass() {
        let mut canvas = RecordingCanvas::new();
        let plan = builder().render(&overflowing_sections(), &mut canvas).unwrap();

        let second = &plan.toc[1];
        assert!(second.page > 1);
        assert_eq!(canvas.header_page(&second.title), Some(second.page));

        let toc_page = canvas.texts_on(2);
        assert_eq!(toc_page[0], "Table of Contents");
        assert!(toc_page.contains(&"4"));
        assert_eq!(canvas.page, plan.page_count + 1);
    }

    #[test]
    fn test_title_page_and_footers() {
        let mut canvas = RecordingCanvas::new();
        let plan = builder().render(&overflowing_sections(), &mut canvas).unwrap();

        assert_eq!(canvas.texts_on(1), vec!["Rates Monitor", "January 15, 2025"]);
        assert!(!canvas.texts_on(2).iter().any(|t| t.starts_with("Page ")));
        for page in 3..=plan.page_count {
            let footer = format!("Page {page}");
            assert!(canvas.texts_on(page).contains(&footer.as_str()), "no footer on {page}");
        }
        let footer = canvas
            .ops
            .iter()
            .find(|op| matches!(op, Op::Text { text, .. } if text == "Page 3"))
            .unwrap();
        assert!(matches!(footer, Op::Text { x, y, size, .. } if *x == 540.0 && *y == 30.0 && *size == 10.0));
    }

    #[test]
    fn test_images_hang_from_cursor() {
        let mut canvas = RecordingCanvas::new();
        builder().render(&overflowing_sections(), &mut canvas).unwrap();

        let images: Vec<_> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Image { page, path, y, height } => Some((*page, path.clone(), *y, *height)),
                _ => None,
            })
            .collect();
        assert_eq!(images[0], (3, PathBuf::from("dff.png"), 712.0 - 384.0, 384.0));
        assert_eq!(images[1], (4, PathBuf::from("dff_table.png"), 742.0 - 384.0, 384.0));
    }

    #[test]
    fn test_untitled_report_skips_title_page() {
        let plan = ReportBuilder::new()
            .with_probe(FixedProbe(ImageSize::new(600, 450)))
            .plan(&[ReportSection::new("Rates").with_image("dff.png")])
            .unwrap();
        assert_eq!(plan.toc[0].page, 2);
        assert_eq!(plan.page_count, 2);
    }

    #[test]
    fn test_untitled_report_still_gets_contents_page() {
        let mut canvas = RecordingCanvas::new();
        let plan = ReportBuilder::new()
            .with_probe(FixedProbe(ImageSize::new(600, 450)))
            .render(&[ReportSection::new("Rates").with_image("dff.png")], &mut canvas)
            .unwrap();

        let first_page = canvas.texts_on(1);
        assert_eq!(first_page[0], "Table of Contents");
        assert!(first_page.contains(&"Rates"));
        assert!(first_page.contains(&"2"));
        assert_eq!(canvas.header_page("Rates"), Some(2));
        assert_eq!(plan.page_count, 2);
    }

    #[test]
    fn test_empty_report_is_rejected() {
        let result = ReportBuilder::new().plan(&[]);
        assert!(matches!(result, Err(EconError::InvalidParameter(_))));

        let plan = builder().plan(&[]).unwrap();
        assert!(plan.toc.is_empty());
        assert_eq!(plan.page_count, 1);
    }

    #[test]
    fn test_missing_image_draws_nothing() {
        let sections = [ReportSection::new("Rates").with_image("missing.png")];
        let mut canvas = RecordingCanvas::new();
        let result = builder().render(&sections, &mut canvas);

        assert!(matches!(result, Err(EconError::MissingImage { .. })));
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_build_missing_image_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.pdf");
        let sections = [ReportSection::new("Rates").with_image(dir.path().join("nope.png"))];

        let result = ReportBuilder::new().with_title("Rates").build(&sections, &output);
        assert!(matches!(result, Err(EconError::MissingImage { .. })));
        assert!(!output.exists());
    }

    /// Writes a flat-colored PNG sized like a chart.
    struct SolidChart;

    impl ChartRenderer for SolidChart {
        fn render_chart(
            &self,
            _table: &SeriesTable,
            _series: &[SeriesId],
            _options: &ChartOptions,
            path: &Path,
        ) -> Result<PathBuf> {
            printpdf::image_crate::RgbImage::from_pixel(120, 80, printpdf::image_crate::Rgb([30, 90, 160]))
                .save(path)
                .map_err(|e| EconError::Render(e.to_string()))?;
            Ok(path.to_path_buf())
        }
    }

    #[test]
    fn test_build_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let ids = [SeriesId::new("DFF")];
        let chart = SolidChart
            .render_chart(&SeriesTable::new(), &ids, &ChartOptions::default(), &dir.path().join("dff.png"))
            .unwrap();
        let sections = [
            ReportSection::new("Policy Rate").with_image(&chart),
            ReportSection::new("Side by Side").with_row(crate::RowSpec::grouped([&chart, &chart, &chart], 2)),
        ];
        let output = dir.path().join("report.pdf");

        let plan = ReportBuilder::new()
            .with_title("Rates Monitor")
            .build(&sections, &output)
            .unwrap();

        assert_eq!(plan.toc.len(), 2);
        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
