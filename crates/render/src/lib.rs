//! pdf2clip render library
//!
//! Rasterizes single PDF pages through PDFium.

pub mod pdf;

pub use pdf::{
    check_page_range, PageRenderer, PdfiumRenderer, RenderError, RenderResult, RENDER_SCALE,
};
