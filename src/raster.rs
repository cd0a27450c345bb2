use std::path::Path;

use egui::Pos2;
use image::RgbaImage;
use log::{debug, info};

use crate::error::{CanvasError, CanvasResult};

/// An imported background image, always stored as RGBA8.
///
/// The raster shares the canvas pixel grid: pixel `(x, y)` sits at
/// canvas-local position `(x, y)`.
#[derive(Clone, PartialEq)]
pub struct BackgroundRaster {
    image: RgbaImage,
}

impl std::fmt::Debug for BackgroundRaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundRaster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl BackgroundRaster {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Builds a raster from raw RGBA bytes. Returns `None` when the buffer
    /// length does not match `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(Self::new)
    }

    /// Decodes the image at `path` into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| CanvasError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        info!(
            "Loaded background {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::new(image))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Unmultiplied RGBA at integer position, or `None` outside the raster.
    pub fn pixel(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return None;
        }
        Some(self.image.get_pixel(x as u32, y as u32).0)
    }

    /// Sets alpha to zero for every pixel whose integer coordinate is within
    /// `radius` of `center` (raster-local). Returns the number of pixels whose
    /// alpha was changed.
    pub fn punch_alpha(&mut self, center: Pos2, radius: f32) -> usize {
        if radius.is_nan() || radius <= 0.0 {
            return 0;
        }

        let min_x = (center.x - radius).floor().max(0.0);
        let min_y = (center.y - radius).floor().max(0.0);
        let max_x = (center.x + radius).ceil().min(self.width() as f32 - 1.0);
        let max_y = (center.y + radius).ceil().min(self.height() as f32 - 1.0);

        if max_x < min_x || max_y < min_y {
            return 0;
        }

        let radius_sq = radius * radius;
        let mut punched = 0;
        for y in min_y as u32..=max_y as u32 {
            for x in min_x as u32..=max_x as u32 {
                let dx = x as f32 - center.x;
                let dy = y as f32 - center.y;
                if dx * dx + dy * dy <= radius_sq {
                    let pixel = self.image.get_pixel_mut(x, y);
                    if pixel.0[3] != 0 {
                        pixel.0[3] = 0;
                        punched += 1;
                    }
                }
            }
        }

        debug!("Punched {punched} background pixels at {center:?} r={radius}");
        punched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn opaque(width: u32, height: u32) -> BackgroundRaster {
        BackgroundRaster::from_rgba(width, height, vec![200; (width * height * 4) as usize])
            .unwrap()
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(BackgroundRaster::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(BackgroundRaster::from_rgba(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn test_punch_alpha_circle() {
        let mut raster = opaque(20, 20);
        let punched = raster.punch_alpha(pos2(10.0, 10.0), 2.0);
        // Integer points within distance 2 of (10, 10): 13 of them
        assert_eq!(punched, 13);
        assert_eq!(raster.pixel(10, 10).unwrap()[3], 0);
        assert_eq!(raster.pixel(12, 10).unwrap()[3], 0);
        assert_eq!(raster.pixel(12, 12).unwrap()[3], 200);
        // Colour channels are untouched
        assert_eq!(raster.pixel(10, 10).unwrap()[0], 200);
    }

    #[test]
    fn test_punch_alpha_out_of_bounds_and_zero_radius() {
        let mut raster = opaque(10, 10);
        assert_eq!(raster.punch_alpha(pos2(-20.0, 5.0), 5.0), 0);
        assert_eq!(raster.punch_alpha(pos2(5.0, 40.0), 5.0), 0);
        assert_eq!(raster.punch_alpha(pos2(5.0, 5.0), 0.0), 0);
        assert!(raster.pixels().chunks(4).all(|p| p[3] == 200));
    }

    #[test]
    fn test_punch_alpha_clips_at_edge() {
        let mut raster = opaque(10, 10);
        let punched = raster.punch_alpha(pos2(0.0, 0.0), 1.0);
        // (0,0), (1,0), (0,1)
        assert_eq!(punched, 3);
    }

    #[test]
    fn test_load_missing_file_is_decode_error() {
        let err = BackgroundRaster::load("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, CanvasError::Decode { .. }));
    }
}
