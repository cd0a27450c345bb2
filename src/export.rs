use std::path::Path;

use egui::Vec2;
use image::{DynamicImage, ImageFormat};
use log::info;

use crate::compositor::{self, Framebuffer};
use crate::document::CanvasDocument;
use crate::error::{CanvasError, CanvasResult};

/// Blends one pixel against opaque white using its own alpha and makes it
/// opaque: `out = src * a + 255 * (1 - a)`.
pub fn flatten_pixel([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let a = a as u32;
    let channel = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
    [channel(r), channel(g), channel(b), 255]
}

/// Flattens every pixel of `target` against white.
pub fn flatten(target: &mut Framebuffer) {
    for pixel in target.raw_mut().chunks_exact_mut(4) {
        let flat = flatten_pixel([pixel[0], pixel[1], pixel[2], pixel[3]]);
        pixel.copy_from_slice(&flat);
    }
}

/// Flattens, flips out of the framebuffer's bottom-up row order and encodes
/// to `path` in the format implied by its extension.
pub fn write_flattened(mut target: Framebuffer, path: &Path) -> CanvasResult<()> {
    let encode_error = |source| CanvasError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(encode_error)?;

    flatten(&mut target);
    let image = DynamicImage::ImageRgba8(target.into_image());

    // Flattened output is opaque, so formats without alpha lose nothing
    let result = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format),
        _ => image.save_with_format(path, format),
    };
    result.map_err(encode_error)
}

/// Composites `document` at `width x height` and writes it to `path`.
///
/// Failures are reported without touching the document.
pub fn export_document(
    document: &CanvasDocument,
    origin: Vec2,
    width: u32,
    height: u32,
    path: &Path,
) -> CanvasResult<()> {
    if width == 0 || height == 0 {
        return Err(CanvasError::EmptyCanvas { width, height });
    }

    let target = compositor::render(document, width, height, origin);
    write_flattened(target, path)?;
    info!("Exported {width}x{height} canvas to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_pixel() {
        assert_eq!(flatten_pixel([12, 34, 56, 255]), [12, 34, 56, 255]);
        assert_eq!(flatten_pixel([0, 0, 0, 0]), [255, 255, 255, 255]);
        assert_eq!(flatten_pixel([0, 0, 0, 51]), [204, 204, 204, 255]);
    }

    #[test]
    fn test_unknown_extension_is_encode_error() {
        let doc = CanvasDocument::new();
        let path = std::env::temp_dir().join("canvas_paint_export.unknownext");
        let err = export_document(&doc, Vec2::ZERO, 4, 4, &path).unwrap_err();
        assert!(matches!(err, CanvasError::Encode { .. }));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let doc = CanvasDocument::new();
        let path = std::env::temp_dir().join("canvas_paint_empty.png");
        let err = export_document(&doc, Vec2::ZERO, 0, 4, &path).unwrap_err();
        assert!(matches!(err, CanvasError::EmptyCanvas { .. }));
    }
}
