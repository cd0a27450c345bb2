use egui::{Color32, Pos2};

use crate::geometry;

/// A polyline with a width and a colour.
///
/// Points are stored in the screen space they were drawn in. A stroke with
/// fewer than two points is kept while it is being drawn but never rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Pos2>,
    width: f32,
    color: Color32,
    erased: bool,
}

impl Stroke {
    pub fn new(color: Color32, width: f32, points: Vec<Pos2>) -> Self {
        Self {
            points,
            width,
            color,
            erased: false,
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn is_erased(&self) -> bool {
        self.erased
    }

    /// Soft-deletes the stroke. It stays in the collection but draws, hits
    /// and erases as nothing.
    pub fn mark_erased(&mut self) {
        self.erased = true;
    }

    /// True if the stroke contributes anything to rendering.
    pub fn is_drawable(&self) -> bool {
        !self.erased && self.points.len() >= 2
    }

    pub(crate) fn push_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    /// A new stroke with this stroke's colour and width over `points`.
    pub fn with_points(&self, points: Vec<Pos2>) -> Self {
        Self::new(self.color, self.width, points)
    }

    /// True if `pos` lies on the painted area of any segment.
    pub fn hit_test(&self, pos: Pos2) -> bool {
        if !self.is_drawable() {
            return false;
        }

        let half = self.width * 0.5;
        self.points
            .windows(2)
            .any(|segment| geometry::distance_to_segment(pos, segment[0], segment[1]) <= half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_short_stroke_is_not_drawable() {
        let stroke = Stroke::new(Color32::RED, 2.0, vec![pos2(1.0, 1.0)]);
        assert!(!stroke.is_drawable());
        assert!(!stroke.hit_test(pos2(1.0, 1.0)));
    }

    #[test]
    fn test_hit_test_uses_half_width() {
        let stroke = Stroke::new(Color32::RED, 4.0, vec![pos2(0.0, 0.0), pos2(10.0, 0.0)]);
        assert!(stroke.hit_test(pos2(5.0, 2.0)));
        assert!(!stroke.hit_test(pos2(5.0, 2.5)));
    }

    #[test]
    fn test_erased_stroke_is_skipped() {
        let mut stroke = Stroke::new(Color32::RED, 4.0, vec![pos2(0.0, 0.0), pos2(10.0, 0.0)]);
        stroke.mark_erased();
        assert!(!stroke.is_drawable());
        assert!(!stroke.hit_test(pos2(5.0, 0.0)));
    }

    #[test]
    fn test_with_points_keeps_style() {
        let stroke = Stroke::new(Color32::BLUE, 7.0, vec![pos2(0.0, 0.0), pos2(1.0, 0.0)]);
        let piece = stroke.with_points(vec![pos2(3.0, 3.0), pos2(4.0, 4.0)]);
        assert_eq!(piece.color(), Color32::BLUE);
        assert_eq!(piece.width(), 7.0);
        assert_eq!(piece.points().len(), 2);
    }
}
