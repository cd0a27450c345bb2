use egui::{Color32, Painter, Pos2, Ui};

use super::{Tool, size_slider};
use crate::command::{Command, DocumentContext};
use crate::compositor;
use crate::geometry;
use crate::stroke::Stroke;

const THICKNESS_RANGE: std::ops::RangeInclusive<f32> = 1.0..=100.0;
const SLIDER_RANGE: std::ops::RangeInclusive<f32> = 1.0..=50.0;

/// Circle outlines dragged from the centre outwards.
#[derive(Debug, Clone)]
pub struct CircleTool {
    color: Color32,
    thickness: f32,
    segments: usize,
    center: Option<Pos2>,
    edge: Pos2,
}

impl CircleTool {
    pub fn new(thickness: f32, segments: usize) -> Self {
        Self {
            color: Color32::BLACK,
            thickness: thickness.clamp(*THICKNESS_RANGE.start(), *THICKNESS_RANGE.end()),
            segments,
            center: None,
            edge: Pos2::ZERO,
        }
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }
}

impl Tool for CircleTool {
    fn name(&self) -> &'static str {
        "Circle"
    }

    fn on_pointer_down(&mut self, pos: Pos2, _ctx: &mut DocumentContext) -> Option<Command> {
        self.center = Some(pos);
        self.edge = pos;
        None
    }

    fn on_pointer_held(&mut self, pos: Pos2, _ctx: &mut DocumentContext) -> Option<Command> {
        self.edge = pos;
        None
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        let center = self.center.take()?;
        let radius = center.distance(pos);
        if radius > 0.0 {
            ctx.snapshot_for_undo();
            let points = geometry::circle_outline(center, radius, self.segments);
            ctx.document
                .add_stroke(Stroke::new(self.color, self.thickness, points));
        }
        None
    }

    fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    fn size(&self) -> Option<f32> {
        Some(self.thickness)
    }

    fn adjust_size(&mut self, delta: f32) {
        self.thickness =
            (self.thickness + delta).clamp(*THICKNESS_RANGE.start(), *THICKNESS_RANGE.end());
    }

    fn ui(&mut self, ui: &mut Ui) {
        size_slider(ui, "Thickness", &mut self.thickness, SLIDER_RANGE);
    }

    fn preview(&self, painter: &Painter, _pointer: Pos2) {
        let Some(center) = self.center else {
            return;
        };
        let radius = center.distance(self.edge);
        if radius > 0.0 {
            let points = geometry::circle_outline(center, radius, self.segments);
            let ghost = Stroke::new(self.color.gamma_multiply(0.7), self.thickness, points);
            compositor::paint_strokes(painter, std::slice::from_ref(&ghost));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_drag_commits_closed_outline() {
        let mut ctx = DocumentContext::default();
        let mut tool = CircleTool::new(3.0, 64);
        tool.on_pointer_down(pos2(50.0, 50.0), &mut ctx);
        tool.on_pointer_up(pos2(60.0, 50.0), &mut ctx);

        let stroke = &ctx.document.strokes()[0];
        assert_eq!(stroke.points().len(), 65);
        assert_eq!(stroke.points()[0], pos2(60.0, 50.0));
        for point in stroke.points() {
            assert!((point.distance(pos2(50.0, 50.0)) - 10.0).abs() < 1e-3);
        }
        assert_eq!(ctx.history.undo_len(), 1);
    }

    #[test]
    fn test_zero_radius_adds_nothing() {
        let mut ctx = DocumentContext::default();
        let mut tool = CircleTool::new(3.0, 64);
        tool.on_pointer_down(pos2(5.0, 5.0), &mut ctx);
        tool.on_pointer_up(pos2(5.0, 5.0), &mut ctx);
        assert!(ctx.document.is_empty());
        assert!(!ctx.history.can_undo());
    }
}
