//! PDF page rasterization
//!
//! Opens a PDF by path, validates a 1-based page number against the
//! document's page count and renders the page to an RGB buffer using PDFium.

use image::{DynamicImage, RgbImage, RgbaImage};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

/// Magnification applied to the page's native size (in points) when rendering.
pub const RENDER_SCALE: f32 = 2.0;

/// Errors produced while opening or rendering a PDF.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The PDFium shared library could not be bound.
    #[error("PDFium initialization error: {0}")]
    Initialization(String),

    #[error("PDF load error: {0}")]
    Load(String),

    #[error("page {page} out of range (1–{page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },

    #[error("PDF render error: {0}")]
    Render(String),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Source of page counts and page bitmaps.
///
/// Page numbers are 1-based throughout.
pub trait PageRenderer {
    fn page_count(&mut self, path: &Path) -> RenderResult<u32>;

    fn render_page(&mut self, path: &Path, page_no: u32) -> RenderResult<RgbImage>;
}

/// Checks `page_no` against `page_count` and returns PDFium's zero-based index.
pub fn check_page_range(page_no: u32, page_count: u32) -> RenderResult<u16> {
    if page_no < 1 || page_no > page_count {
        return Err(RenderError::PageOutOfRange { page: page_no, page_count });
    }

    u16::try_from(page_no - 1)
        .map_err(|_| RenderError::PageOutOfRange { page: page_no, page_count })
}

/// [`PageRenderer`] backed by the PDFium shared library.
///
/// The library is bound on first use. Documents are opened for the duration
/// of a single call and closed before it returns.
#[derive(Default)]
pub struct PdfiumRenderer {
    pdfium: Option<Pdfium>,
}

impl PdfiumRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to the PDFium library.
    ///
    /// Search order:
    /// 1. Executable's directory (for app bundles: .app/Contents/MacOS/)
    /// 2. Current working directory
    /// 3. System library paths
    fn bind() -> RenderResult<Pdfium> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        if let Some(ref dir) = exe_dir {
            if let Ok(bindings) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            {
                log::debug!("bound PDFium from {}", dir.display());
                return Ok(Pdfium::new(bindings));
            }
        }

        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| RenderError::Initialization(e.to_string()))?;

        log::debug!("bound PDFium from working directory or system path");
        Ok(Pdfium::new(bindings))
    }

    fn pdfium(&mut self) -> RenderResult<&Pdfium> {
        if self.pdfium.is_none() {
            self.pdfium = Some(Self::bind()?);
        }

        self.pdfium
            .as_ref()
            .ok_or_else(|| RenderError::Initialization("PDFium not bound".to_string()))
    }
}

impl PageRenderer for PdfiumRenderer {
    fn page_count(&mut self, path: &Path) -> RenderResult<u32> {
        ensure_pdf_exists(path)?;

        let document = self
            .pdfium()?
            .load_pdf_from_file(path, None)
            .map_err(|e| RenderError::Load(e.to_string()))?;

        Ok(u32::from(document.pages().len()))
    }

    fn render_page(&mut self, path: &Path, page_no: u32) -> RenderResult<RgbImage> {
        ensure_pdf_exists(path)?;

        let document = self
            .pdfium()?
            .load_pdf_from_file(path, None)
            .map_err(|e| RenderError::Load(e.to_string()))?;

        let page_count = u32::from(document.pages().len());
        let index = check_page_range(page_no, page_count)?;

        let page = document
            .pages()
            .get(index)
            .map_err(|e| RenderError::Render(e.to_string()))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(RENDER_SCALE);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| RenderError::Render(e.to_string()))?;

        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        log::debug!("rendered page {page_no}/{page_count} at {width}x{height}");

        let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes().to_vec())
            .ok_or_else(|| {
                RenderError::Render(format!("bitmap buffer does not match {width}x{height}"))
            })?;

        Ok(DynamicImage::ImageRgba8(rgba).into_rgb8())
    }
}

fn ensure_pdf_exists(path: &Path) -> RenderResult<()> {
    if !path.exists() {
        return Err(RenderError::MissingFile(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(RenderError::NotAFile(path.to_path_buf()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_range_accepts_bounds() {
        assert_eq!(check_page_range(1, 1).unwrap(), 0);
        assert_eq!(check_page_range(1, 12).unwrap(), 0);
        assert_eq!(check_page_range(12, 12).unwrap(), 11);
        assert_eq!(check_page_range(5, 12).unwrap(), 4);
    }

    #[test]
    fn test_page_range_rejects_zero_and_past_end() {
        assert!(matches!(
            check_page_range(0, 3),
            Err(RenderError::PageOutOfRange { page: 0, page_count: 3 })
        ));
        assert!(matches!(
            check_page_range(4, 3),
            Err(RenderError::PageOutOfRange { page: 4, page_count: 3 })
        ));
    }

    #[test]
    fn test_page_range_rejects_empty_document() {
        assert!(check_page_range(1, 0).is_err());
    }

    #[test]
    fn test_out_of_range_message() {
        let err = check_page_range(7, 3).unwrap_err();
        assert_eq!(err.to_string(), "page 7 out of range (1–3)");
    }

    #[test]
    fn test_missing_file_reported_before_pdfium_bind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.pdf");

        let mut renderer = PdfiumRenderer::new();
        let err = renderer.page_count(&path).unwrap_err();

        assert!(matches!(err, RenderError::MissingFile(_)));
        assert!(err.to_string().contains("file does not exist"));
        assert!(renderer.pdfium.is_none());
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();

        let mut renderer = PdfiumRenderer::new();
        let err = renderer.render_page(dir.path(), 1).unwrap_err();

        assert!(matches!(err, RenderError::NotAFile(_)));
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::Load("bad xref".to_string());
        assert!(err.to_string().contains("bad xref"));

        let err = RenderError::Initialization("no library".to_string());
        assert!(err.to_string().starts_with("PDFium initialization error"));
    }

    /// A blank one-page PDF with the given MediaBox size, xref offsets included.
    fn blank_pdf(width_pt: u32, height_pt: u32) -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width_pt} {height_pt}] >>"),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_start = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_start
            )
            .as_bytes(),
        );
        pdf
    }

    // PDFium binds once per process, so everything that needs the real library
    // shares one renderer in one test.
    #[test]
    #[ignore = "Requires the PDFium shared library"]
    fn test_pdfium_open_and_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = PdfiumRenderer::new();

        let invalid = dir.path().join("invalid.pdf");
        std::fs::write(&invalid, b"not a pdf").unwrap();
        let err = renderer.page_count(&invalid).unwrap_err();
        assert!(matches!(err, RenderError::Load(_)));

        let path = dir.path().join("blank.pdf");
        std::fs::write(&path, blank_pdf(100, 50)).unwrap();

        assert_eq!(renderer.page_count(&path).unwrap(), 1);

        let image = renderer.render_page(&path, 1).unwrap();
        assert_eq!(image.width(), (100.0 * RENDER_SCALE) as u32);
        assert_eq!(image.height(), (50.0 * RENDER_SCALE) as u32);
        assert!(image.pixels().all(|p| p.0 == [255, 255, 255]));

        let err = renderer.render_page(&path, 2).unwrap_err();
        assert!(matches!(err, RenderError::PageOutOfRange { page: 2, page_count: 1 }));
    }
}
