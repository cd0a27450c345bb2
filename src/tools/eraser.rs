use egui::{Painter, Pos2, Ui};

use super::{PREVIEW_COLOR, Tool, size_slider};
use crate::command::{Command, DocumentContext};
use crate::eraser;

const RADIUS_RANGE: std::ops::RangeInclusive<f32> = 1.0..=150.0;

/// Erases strokes and background under a circle, re-applied every held frame.
#[derive(Debug, Clone)]
pub struct EraserTool {
    radius: f32,
    erasing: bool,
}

impl EraserTool {
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.clamp(*RADIUS_RANGE.start(), *RADIUS_RANGE.end()),
            erasing: false,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Tool for EraserTool {
    fn name(&self) -> &'static str {
        "Eraser"
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        // One snapshot per gesture; held frames erase without recording
        ctx.snapshot_for_undo();
        self.erasing = true;
        eraser::apply(ctx, pos, self.radius);
        None
    }

    fn on_pointer_held(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        if self.erasing {
            eraser::apply(ctx, pos, self.radius);
        }
        None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _ctx: &mut DocumentContext) -> Option<Command> {
        self.erasing = false;
        None
    }

    fn size(&self) -> Option<f32> {
        Some(self.radius)
    }

    fn adjust_size(&mut self, delta: f32) {
        self.radius = (self.radius + delta).clamp(*RADIUS_RANGE.start(), *RADIUS_RANGE.end());
    }

    fn ui(&mut self, ui: &mut Ui) {
        size_slider(ui, "Size", &mut self.radius, RADIUS_RANGE);
    }

    fn preview(&self, painter: &Painter, pointer: Pos2) {
        painter.circle_stroke(pointer, self.radius, egui::Stroke::new(1.0, PREVIEW_COLOR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Stroke;
    use egui::{Color32, pos2};

    #[test]
    fn test_erase_gesture_is_one_undo_step() {
        let mut ctx = DocumentContext::default();
        let points = (0..=10).map(|i| pos2(i as f32 * 10.0, 0.0)).collect();
        ctx.document.add_stroke(Stroke::new(Color32::BLACK, 2.0, points));
        let before = ctx.document.snapshot();

        let mut tool = EraserTool::new(6.0);
        tool.on_pointer_down(pos2(30.0, 0.0), &mut ctx);
        tool.on_pointer_held(pos2(60.0, 0.0), &mut ctx);
        tool.on_pointer_up(pos2(60.0, 0.0), &mut ctx);

        // 0..=20, 40..=50, 70..=100
        assert_eq!(ctx.document.strokes().len(), 3);
        assert_eq!(ctx.history.undo_len(), 1);

        assert!(ctx.undo());
        assert_eq!(ctx.document.snapshot(), before);
    }
}
