//! Turning a [`CanvasDocument`] into pixels.
//!
//! Two paths follow the same rules: [`render`] rasterizes in software into a
//! [`Framebuffer`] (used for export), [`paint_strokes`] draws through an egui
//! painter for the live canvas. Both draw the background first, then every
//! stroke in order as thick segments with a filled disc of radius `width / 2`
//! on each interior vertex, so joins never show gaps whatever the turn angle.

use egui::{Color32, Painter, Pos2, Rect, TextureHandle, Vec2};
use image::RgbaImage;

use crate::document::CanvasDocument;
use crate::geometry;
use crate::stroke::Stroke;

pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// An RGBA8 render target with rows stored bottom-up (first row in memory is
/// the bottom of the image), the way GPU framebuffers are read back.
///
/// Accessors take top-down canvas coordinates.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, fill: [u8; 4]) -> Self {
        let len = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(len * 4);
        for _ in 0..len {
            pixels.extend_from_slice(&fill);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw bytes in native (bottom-up) row order.
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        let row = (self.height - 1 - y) as usize;
        (row * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&color);
    }

    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let blended = blend_over(self.pixel(x, y), color);
        self.set_pixel(x, y, blended);
    }

    /// Converts to a top-down image, flipping rows out of native order.
    pub fn into_image(self) -> RgbaImage {
        let (width, height) = (self.width, self.height);
        let mut image = RgbaImage::from_raw(width, height, self.pixels)
            .unwrap_or_else(|| RgbaImage::new(width, height));
        image::imageops::flip_vertical_in_place(&mut image);
        image
    }
}

/// Source-over blend of unmultiplied RGBA.
pub fn blend_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as f32 / 255.0;
    if src[3] == 255 {
        return src;
    }
    if src[3] == 0 {
        return dst;
    }

    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

/// Renders `document` at `width x height`. Stroke points are translated by
/// `-origin` into raster-local coordinates; the background is sampled 1:1
/// and anything outside it (or the whole canvas without one) is opaque white.
pub fn render(document: &CanvasDocument, width: u32, height: u32, origin: Vec2) -> Framebuffer {
    let mut target = Framebuffer::new(width, height, WHITE);

    if let Some(background) = document.background() {
        for y in 0..height {
            for x in 0..width {
                if let Some(pixel) = background.pixel(x as i64, y as i64) {
                    target.set_pixel(x, y, pixel);
                }
            }
        }
    }

    for stroke in document.strokes().iter().filter(|s| s.is_drawable()) {
        rasterize_stroke(&mut target, stroke, origin);
    }

    target
}

/// Coverage of one stroke over a clipped bounding box, so each pixel is
/// blended at most once per stroke even where segments and discs overlap.
struct CoverageMask {
    min_x: u32,
    min_y: u32,
    width: u32,
    height: u32,
    covered: Vec<bool>,
}

impl CoverageMask {
    fn new(bounds: Rect, target_width: u32, target_height: u32) -> Option<Self> {
        if !bounds.is_positive() {
            return None;
        }
        let min_x = bounds.min.x.floor().max(0.0);
        let min_y = bounds.min.y.floor().max(0.0);
        let max_x = bounds.max.x.ceil().min(target_width as f32);
        let max_y = bounds.max.y.ceil().min(target_height as f32);
        if max_x <= min_x || max_y <= min_y {
            return None;
        }

        let width = (max_x - min_x) as u32;
        let height = (max_y - min_y) as u32;
        Some(Self {
            min_x: min_x as u32,
            min_y: min_y as u32,
            width,
            height,
            covered: vec![false; width as usize * height as usize],
        })
    }

    /// Marks every pixel whose centre satisfies `inside`, limited to `area`.
    fn fill(&mut self, area: Rect, inside: impl Fn(Pos2) -> bool) {
        let x0 = (area.min.x.floor().max(self.min_x as f32) as u32).saturating_sub(self.min_x);
        let y0 = (area.min.y.floor().max(self.min_y as f32) as u32).saturating_sub(self.min_y);
        let x1 = ((area.max.x.ceil() - self.min_x as f32).max(0.0) as u32).min(self.width);
        let y1 = ((area.max.y.ceil() - self.min_y as f32).max(0.0) as u32).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Pos2::new(
                    (self.min_x + x) as f32 + 0.5,
                    (self.min_y + y) as f32 + 0.5,
                );
                if inside(center) {
                    self.covered[(y * self.width + x) as usize] = true;
                }
            }
        }
    }

    fn fill_segment(&mut self, a: Pos2, b: Pos2, half_width: f32) {
        let ab = b - a;
        let len_sq = ab.length_sq();
        if len_sq <= 0.0 {
            return;
        }
        let len = len_sq.sqrt();
        let area = Rect::from_two_pos(a, b).expand(half_width);
        self.fill(area, |p| {
            let ap = p - a;
            let t = ap.dot(ab) / len_sq;
            let distance = (ap.x * ab.y - ap.y * ab.x).abs() / len;
            (0.0..=1.0).contains(&t) && distance <= half_width
        });
    }

    fn fill_disc(&mut self, center: Pos2, radius: f32) {
        let area = Rect::from_center_size(center, Vec2::splat(radius * 2.0));
        self.fill(area, |p| geometry::point_in_circle(p, center, radius));
    }
}

fn rasterize_stroke(target: &mut Framebuffer, stroke: &Stroke, origin: Vec2) {
    let points: Vec<Pos2> = stroke.points().iter().map(|p| *p - origin).collect();
    let half = stroke.width() * 0.5;
    let bounds = geometry::calculate_bounds(&points, half + 1.0);

    let Some(mut mask) = CoverageMask::new(bounds, target.width(), target.height()) else {
        return;
    };

    for segment in points.windows(2) {
        mask.fill_segment(segment[0], segment[1], half);
    }
    if points.len() > 2 {
        for vertex in &points[1..points.len() - 1] {
            mask.fill_disc(*vertex, half);
        }
    }

    let color = stroke.color().to_srgba_unmultiplied();
    for y in 0..mask.height {
        for x in 0..mask.width {
            if mask.covered[(y * mask.width + x) as usize] {
                target.blend_pixel(mask.min_x + x, mask.min_y + y, color);
            }
        }
    }
}

/// Live-display counterpart of the background pass: white canvas, then the
/// background texture placed 1:1 at the canvas origin.
pub fn paint_background(
    painter: &Painter,
    canvas_rect: Rect,
    background: Option<&TextureHandle>,
) {
    painter.rect_filled(canvas_rect, 0.0, Color32::WHITE);
    if let Some(texture) = background {
        let rect = Rect::from_min_size(canvas_rect.min, texture.size_vec2());
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        painter.image(texture.id(), rect, uv, Color32::WHITE);
    }
}

/// Live-display counterpart of the stroke pass. Points are used as stored,
/// since the screen already includes the canvas offset.
pub fn paint_strokes(painter: &Painter, strokes: &[Stroke]) {
    for stroke in strokes.iter().filter(|s| s.is_drawable()) {
        let line = egui::Stroke::new(stroke.width(), stroke.color());
        let points = stroke.points();
        for segment in points.windows(2) {
            painter.line_segment([segment[0], segment[1]], line);
        }
        for vertex in &points[1..points.len() - 1] {
            painter.circle_filled(*vertex, stroke.width() * 0.5, stroke.color());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_framebuffer_rows_are_bottom_up() {
        let mut fb = Framebuffer::new(2, 2, WHITE);
        fb.set_pixel(0, 0, [1, 2, 3, 4]);
        // Top-left pixel lives in the last row in memory
        assert_eq!(&fb.as_raw()[8..12], &[1, 2, 3, 4]);

        let image = fb.into_image();
        assert_eq!(image.get_pixel(0, 0).0, [1, 2, 3, 4]);
    }

    #[test]
    fn test_blend_over() {
        assert_eq!(blend_over(WHITE, [0, 0, 0, 255]), [0, 0, 0, 255]);
        assert_eq!(blend_over([10, 20, 30, 40], [0, 0, 0, 0]), [10, 20, 30, 40]);
        let half = blend_over(WHITE, [0, 0, 0, 128]);
        assert_eq!(half[3], 255);
        assert!(half[0] > 120 && half[0] < 135);
        // Over a fully transparent pixel the source comes through unchanged
        assert_eq!(blend_over([9, 9, 9, 0], [200, 100, 50, 128]), [200, 100, 50, 128]);
    }

    #[test]
    fn test_segment_coverage() {
        let mut doc = CanvasDocument::new();
        doc.add_stroke(Stroke::new(
            Color32::BLACK,
            4.0,
            vec![pos2(10.0, 10.0), pos2(40.0, 10.0)],
        ));
        let fb = render(&doc, 50, 20, Vec2::ZERO);
        assert_eq!(fb.pixel(20, 9), [0, 0, 0, 255]);
        assert_eq!(fb.pixel(20, 10), [0, 0, 0, 255]);
        assert_eq!(fb.pixel(20, 2), WHITE);
        // Flat ends: nothing before the first point
        assert_eq!(fb.pixel(7, 10), WHITE);
    }

    #[test]
    fn test_stroke_clipped_to_target() {
        let mut doc = CanvasDocument::new();
        doc.add_stroke(Stroke::new(
            Color32::BLACK,
            6.0,
            vec![pos2(-50.0, 5.0), pos2(500.0, 5.0)],
        ));
        let fb = render(&doc, 10, 10, Vec2::ZERO);
        assert_eq!(fb.pixel(0, 5), [0, 0, 0, 255]);
        assert_eq!(fb.pixel(9, 5), [0, 0, 0, 255]);
    }
}
