//! UI state and the copy workflow.
//!
//! Everything here is independent of egui so it can be driven from tests with
//! an in-memory renderer and clipboard.

use crate::clipboard::{ClipboardError, ClipboardImage, ClipboardSink};
use pdf2clip_render::{PageRenderer, RenderError};
use std::path::{Path, PathBuf};

/// The chosen PDF and its page count at the time it was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub path: PathBuf,
    pub page_count: u32,
}

/// Page number entry: the raw text the user sees plus the known page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelector {
    text: String,
    page_count: Option<u32>,
}

impl Default for PageSelector {
    fn default() -> Self {
        Self { text: "1".to_string(), page_count: None }
    }
}

impl PageSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The 1-based page the entry currently denotes.
    ///
    /// Unparsable text reads as page 1, as does anything below 1.
    pub fn current(&self) -> u32 {
        match self.text.trim().parse::<i64>() {
            Ok(value) => u32::try_from(value.max(1)).unwrap_or(u32::MAX),
            Err(_) => 1,
        }
    }

    pub fn set(&mut self, page: u32) {
        self.text = page.to_string();
    }

    /// Mutable access for direct edits from the text field.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn increment(&mut self) {
        let next = self.current().saturating_add(1);
        let next = match self.page_count {
            Some(count) => next.min(count),
            None => next,
        };
        self.set(next);
    }

    pub fn decrement(&mut self) {
        self.set(self.current().saturating_sub(1).max(1));
    }

    /// Called when a new document is chosen. A zero count is treated as unknown.
    pub fn reset(&mut self, page_count: u32) {
        self.page_count = (page_count > 0).then_some(page_count);
        self.set(1);
    }

    /// e.g. `"3/12 pages"`, or `"3/? pages"` before a document is chosen.
    pub fn label(&self) -> String {
        match self.page_count {
            Some(count) => format!("{}/{} pages", self.current(), count),
            None => format!("{}/? pages", self.current()),
        }
    }
}

/// Any failure of the open or copy actions.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("choose a PDF first.")]
    NoDocument,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

impl CopyError {
    /// Title for the error dialog.
    pub fn title(&self) -> &'static str {
        match self {
            CopyError::NoDocument => "no PDF selected",
            CopyError::Render(_) | CopyError::Clipboard(_) => "error",
        }
    }
}

/// Owns the renderer, the clipboard and the three pieces of UI state.
pub struct Controller<R, C> {
    renderer: R,
    clipboard: C,
    document: Option<DocumentRef>,
    selector: PageSelector,
    last_copied: Option<u32>,
}

impl<R: PageRenderer, C: ClipboardSink> Controller<R, C> {
    pub fn new(renderer: R, clipboard: C) -> Self {
        Self {
            renderer,
            clipboard,
            document: None,
            selector: PageSelector::new(),
            last_copied: None,
        }
    }

    pub fn document(&self) -> Option<&DocumentRef> {
        self.document.as_ref()
    }

    pub fn selector(&self) -> &PageSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut PageSelector {
        &mut self.selector
    }

    pub fn last_copied(&self) -> Option<u32> {
        self.last_copied
    }

    /// Reads the page count of `path` and makes it the current document.
    ///
    /// On failure the previously chosen document stays in place.
    pub fn open_document(&mut self, path: &Path) -> Result<u32, CopyError> {
        let page_count = self.renderer.page_count(path)?;

        log::info!("opened {} ({} pages)", path.display(), page_count);
        self.document = Some(DocumentRef { path: path.to_path_buf(), page_count });
        self.selector.reset(page_count);

        Ok(page_count)
    }

    /// Renders the selected page and replaces the clipboard contents with it.
    ///
    /// Returns the copied page number.
    pub fn copy_current_page(&mut self) -> Result<u32, CopyError> {
        let path = match &self.document {
            Some(document) => document.path.clone(),
            None => return Err(CopyError::NoDocument),
        };

        let page_no = self.selector.current();
        let image = self.renderer.render_page(&path, page_no)?;
        let payload = ClipboardImage::encode(&image)?;
        self.clipboard.write_image(&payload)?;

        log::info!(
            "copied page {} of {} ({}x{}, {} bytes)",
            page_no,
            path.display(),
            payload.width,
            payload.height,
            payload.png.len()
        );
        self.last_copied = Some(page_no);

        Ok(page_no)
    }

    pub fn last_copied_tooltip(&self) -> String {
        match self.last_copied() {
            Some(page) => format!("last copied page: {}", page),
            None => "no page copied yet".to_string(),
        }
    }
}
