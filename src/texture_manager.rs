use egui::{ColorImage, Context, TextureHandle, TextureOptions};

use crate::document::CanvasDocument;
use crate::raster::BackgroundRaster;

/// Caches the GPU texture of the document's background raster.
///
/// The cache is keyed on [`CanvasDocument::background_revision`], which is
/// unique per process, so erasing, undo and opening a new image all trigger
/// exactly one re-upload on the next frame.
#[derive(Default)]
pub struct TextureManager {
    background: Option<(u64, TextureHandle)>,
    uploads: u64,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for the document's background, uploading it if the cached
    /// one is stale. `None` when the document has no background.
    pub fn background_texture(
        &mut self,
        ctx: &Context,
        document: &CanvasDocument,
    ) -> Option<&TextureHandle> {
        let Some(background) = document.background() else {
            self.background = None;
            return None;
        };

        let revision = document.background_revision();
        if self.cached_revision() != Some(revision) {
            let image = color_image(background);

            // Same-sized rasters update in place and keep their texture id
            let same_size = self
                .background
                .as_ref()
                .is_some_and(|(_, handle)| handle.size() == image.size);
            if let (true, Some((cached, handle))) = (same_size, self.background.as_mut()) {
                handle.set(image, TextureOptions::NEAREST);
                *cached = revision;
            } else {
                let handle = ctx.load_texture("canvas_background", image, TextureOptions::NEAREST);
                self.background = Some((revision, handle));
            }

            self.uploads += 1;
            log::debug!("Uploaded background texture (revision {revision})");
        }

        self.background.as_ref().map(|(_, handle)| handle)
    }

    /// Revision of the cached texture, if any.
    pub fn cached_revision(&self) -> Option<u64> {
        self.background.as_ref().map(|(revision, _)| *revision)
    }

    /// Number of uploads so far.
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }
}

fn color_image(background: &BackgroundRaster) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [background.width() as usize, background.height() as usize],
        background.pixels(),
    )
}
