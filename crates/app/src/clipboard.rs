//! Clipboard module for placing rendered pages on the system clipboard.
//!
//! Pages are encoded as PNG once and written as an image payload. macOS gets
//! the PNG bytes directly on the general pasteboard; other platforms go
//! through the `arboard` crate.

use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// Error type for clipboard operations.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// Failed to encode the page as PNG.
    #[error("Failed to encode page as PNG: {0}")]
    Encode(String),
    /// Failed to decode the PNG payload back into pixels.
    #[error("Failed to decode PNG payload: {0}")]
    Decode(String),
    /// Failed to initialize clipboard access.
    #[error("Failed to initialize clipboard: {0}")]
    InitializationFailed(String),
    /// Failed to place the image on the clipboard.
    #[error("Failed to copy to clipboard: {0}")]
    CopyFailed(String),
}

/// A page image ready for the clipboard, held as PNG bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl ClipboardImage {
    /// Losslessly encodes an RGB buffer as PNG.
    pub fn encode(image: &RgbImage) -> Result<Self, ClipboardError> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| ClipboardError::Encode(e.to_string()))?;

        Ok(Self { width: image.width(), height: image.height(), png })
    }

    /// Decodes the PNG payload to tightly packed RGBA bytes.
    #[cfg_attr(target_os = "macos", allow(dead_code))]
    pub fn to_rgba(&self) -> Result<Vec<u8>, ClipboardError> {
        let decoded = image::load_from_memory_with_format(&self.png, ImageFormat::Png)
            .map_err(|e| ClipboardError::Decode(e.to_string()))?;

        Ok(decoded.into_rgba8().into_raw())
    }
}

/// Destination for copied page images.
///
/// A write replaces whatever the destination held before.
pub trait ClipboardSink {
    fn write_image(&mut self, image: &ClipboardImage) -> Result<(), ClipboardError>;
}

/// The operating system clipboard.
///
/// The `arboard` handle is created on first use and kept for the life of the
/// process: on X11 and Wayland the contents are only served while it exists.
#[derive(Default)]
pub struct SystemClipboard {
    #[cfg(not(target_os = "macos"))]
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_os = "macos")]
impl ClipboardSink for SystemClipboard {
    fn write_image(&mut self, image: &ClipboardImage) -> Result<(), ClipboardError> {
        use objc2_app_kit::{NSPasteboard, NSPasteboardTypePNG};
        use objc2_foundation::NSData;

        let data = NSData::with_bytes(&image.png);

        // SAFETY: the general pasteboard is process-global and the PNG type is a
        // static AppKit constant; both are valid for the duration of the call.
        let written = unsafe {
            let pasteboard = NSPasteboard::generalPasteboard();
            pasteboard.clearContents();
            pasteboard.setData_forType(Some(&data), NSPasteboardTypePNG)
        };

        if !written {
            return Err(ClipboardError::CopyFailed(
                "pasteboard rejected PNG data".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(target_os = "macos"))]
impl ClipboardSink for SystemClipboard {
    fn write_image(&mut self, image: &ClipboardImage) -> Result<(), ClipboardError> {
        let rgba = image.to_rgba()?;

        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::InitializationFailed(e.to_string()))?;
            self.inner = Some(clipboard);
        }

        let clipboard = self
            .inner
            .as_mut()
            .ok_or_else(|| ClipboardError::InitializationFailed("no clipboard".to_string()))?;

        clipboard
            .set_image(arboard::ImageData {
                width: image.width as usize,
                height: image.height as usize,
                bytes: rgba.into(),
            })
            .map_err(|e| ClipboardError::CopyFailed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use serial_test::serial;

    fn checkerboard(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([12, 34, 56])
            }
        })
    }

    #[test]
    fn test_encode_produces_png() {
        let encoded = ClipboardImage::encode(&checkerboard(8, 5)).unwrap();

        assert_eq!(encoded.width, 8);
        assert_eq!(encoded.height, 5);
        assert_eq!(&encoded.png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_encoding_is_lossless() {
        let source = checkerboard(7, 3);
        let encoded = ClipboardImage::encode(&source).unwrap();
        let rgba = encoded.to_rgba().unwrap();

        assert_eq!(rgba.len(), 7 * 3 * 4);
        for (pixel, expected) in rgba.chunks_exact(4).zip(source.pixels()) {
            assert_eq!(&pixel[..3], &expected.0);
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let bogus = ClipboardImage { width: 1, height: 1, png: vec![0, 1, 2, 3] };
        assert!(matches!(bogus.to_rgba(), Err(ClipboardError::Decode(_))));
    }

    #[test]
    fn test_clipboard_error_display() {
        let init_error = ClipboardError::InitializationFailed("test init".to_string());
        assert!(init_error.to_string().contains("initialize"));
        assert!(init_error.to_string().contains("test init"));

        let copy_error = ClipboardError::CopyFailed("test copy".to_string());
        assert!(copy_error.to_string().contains("copy"));
        assert!(copy_error.to_string().contains("test copy"));
    }

    // Tests that touch the real clipboard are ignored by default: they need a
    // display server and can crash headless CI runners.
    // Run them manually with: cargo test -p pdf2clip -- --ignored

    #[test]
    #[serial]
    #[ignore = "Requires system clipboard access, may crash in CI"]
    fn test_system_clipboard_holds_latest_image() {
        let mut clipboard = SystemClipboard::new();
        let first = ClipboardImage::encode(&checkerboard(4, 4)).unwrap();
        let second = ClipboardImage::encode(&checkerboard(6, 2)).unwrap();

        match clipboard.write_image(&first) {
            Ok(()) => {}
            Err(ClipboardError::InitializationFailed(_)) => return,
            Err(e) => panic!("Unexpected clipboard error: {}", e),
        }
        clipboard.write_image(&second).unwrap();

        if let Ok(mut reader) = arboard::Clipboard::new() {
            if let Ok(contents) = reader.get_image() {
                assert_eq!(contents.width, 6);
                assert_eq!(contents.height, 2);
            }
        }
    }
}
