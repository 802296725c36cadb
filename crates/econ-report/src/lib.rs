#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/econ/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Paginated PDF reports.
//!
//! - [`ReportBuilder`] - Two-pass layout and PDF output
//! - [`ReportSection`] / [`RowSpec`] - Titled rows of images
//! - [`Canvas`] - Drawing surface; [`PdfCanvas`] writes PDF, [`MeasureCanvas`] draws nothing
//! - [`comparison_table`] / [`analysis_table`] - Cell data for summary tables
//! - [`ChartRenderer`] / [`TableRenderer`] - Hooks for external rasterizers

/// Report assembly.
pub mod builder;
/// Drawing surfaces.
pub mod canvas;
/// Page dimensions and spacing.
pub mod geometry;
/// Image dimension probing.
pub mod image;
/// Pagination.
pub mod layout;
/// PDF canvas.
pub mod pdf;
/// Chart and table renderer interfaces.
pub mod render;
/// Sections and rows.
pub mod section;
/// Table cell data.
pub mod tables;

pub use builder::ReportBuilder;
pub use canvas::{Canvas, Font, MeasureCanvas};
pub use geometry::PageGeometry;
pub use image::{FileProbe, ImageProbe, ImageSize};
pub use layout::{LayoutState, PageCursor, ReportPlan, TocEntry};
pub use pdf::PdfCanvas;
pub use render::{ChartOptions, ChartRenderer, TableRenderer};
pub use section::{ReportSection, RowSpec};
pub use tables::{DisplayNames, TextTable, analysis_table, comparison_table};
