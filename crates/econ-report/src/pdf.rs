//! PDF output through `printpdf`.

use crate::canvas::{Canvas, Font};
use crate::geometry::PageGeometry;
use econ_core::{EconError, Result};
use printpdf::image_crate::{self, DynamicImage};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// Resolution images are embedded at before scaling.
const IMAGE_DPI: f32 = 300.0;

/// Name of the single layer on every page.
const LAYER_NAME: &str = "content";

/// Millimetres per PDF point.
const MM_PER_PT: f32 = 25.4 / 72.0;

fn mm(points: f32) -> Mm {
    Mm(points * MM_PER_PT)
}

fn render_err(e: impl std::fmt::Display) -> EconError {
    EconError::Render(e.to_string())
}

/// [`Canvas`] backed by an in-memory PDF document.
///
/// Pages are created lazily: the first draw after
/// [`finish_page`](Canvas::finish_page) opens a new page.
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    geometry: PageGeometry,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    layer: Option<PdfLayerReference>,
    pages: u32,
}

impl std::fmt::Debug for PdfCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfCanvas")
            .field("geometry", &self.geometry)
            .field("pages", &self.pages)
            .finish()
    }
}

impl PdfCanvas {
    /// Creates a document titled `title` with pages of the given geometry.
    ///
    /// # Errors
    /// Returns [`EconError::Render`] if the built-in fonts cannot be registered.
    pub fn new(title: &str, geometry: PageGeometry) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            mm(geometry.width),
            mm(geometry.height),
            LAYER_NAME,
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_err)?;
        Ok(Self {
            doc,
            geometry,
            regular,
            bold,
            first_page: Some((page, layer)),
            layer: None,
            pages: 0,
        })
    }

    /// Pages finished so far.
    #[must_use]
    pub const fn pages(&self) -> u32 {
        self.pages
    }

    fn layer(&mut self) -> PdfLayerReference {
        if let Some(layer) = &self.layer {
            return layer.clone();
        }
        let (page, layer) = self.first_page.take().unwrap_or_else(|| {
            self.doc.add_page(
                mm(self.geometry.width),
                mm(self.geometry.height),
                LAYER_NAME,
            )
        });
        let layer = self.doc.get_page(page).get_layer(layer);
        self.layer = Some(layer.clone());
        layer
    }

    /// Writes the document to `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or serialization fails.
    pub fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.doc.save(&mut writer).map_err(render_err)?;
        debug!(path = %path.display(), pages = self.pages, "Saved PDF");
        Ok(())
    }
}

impl Canvas for PdfCanvas {
    fn draw_text(&mut self, text: &str, font: Font, size: f32, x: f32, y: f32) -> Result<()> {
        let font = match font {
            Font::Regular => self.regular.clone(),
            Font::Bold => self.bold.clone(),
        };
        self.layer().use_text(text, size, mm(x), mm(y), &font);
        Ok(())
    }

    fn draw_image(&mut self, path: &Path, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        let decoded = image_crate::open(path).map_err(|e| EconError::MissingImage {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        // Alpha channels are flattened; charts are drawn on opaque backgrounds.
        let rgb = decoded.to_rgb8();
        let (px_width, px_height) = rgb.dimensions();

        // Natural size at IMAGE_DPI, in points.
        let natural_width = px_width as f32 * 72.0 / IMAGE_DPI;
        let natural_height = px_height as f32 * 72.0 / IMAGE_DPI;

        let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(rgb));
        image.add_to_layer(
            self.layer(),
            ImageTransform {
                translate_x: Some(mm(x)),
                translate_y: Some(mm(y)),
                scale_x: Some(width / natural_width),
                scale_y: Some(height / natural_height),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn finish_page(&mut self) -> Result<()> {
        // Materialize blank pages too.
        self.layer();
        self.layer = None;
        self.pages += 1;
        Ok(())
    }
}
