use egui::{Color32, Painter, Pos2, Ui};

use super::{PREVIEW_COLOR, Tool, size_slider};
use crate::command::{Command, DocumentContext};

const WIDTH_RANGE: std::ops::RangeInclusive<f32> = 1.0..=100.0;

/// Freehand drawing: one stroke per press, extended every held frame.
#[derive(Debug, Clone)]
pub struct PencilTool {
    color: Color32,
    width: f32,
    drawing: bool,
}

impl PencilTool {
    pub fn new(width: f32) -> Self {
        Self {
            color: Color32::BLACK,
            width: width.clamp(*WIDTH_RANGE.start(), *WIDTH_RANGE.end()),
            drawing: false,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn color(&self) -> Color32 {
        self.color
    }
}

impl Tool for PencilTool {
    fn name(&self) -> &'static str {
        "Pencil"
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        ctx.snapshot_for_undo();
        ctx.document.begin_stroke(self.color, self.width, pos);
        self.drawing = true;
        None
    }

    fn on_pointer_held(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        if self.drawing {
            ctx.document.extend_active_stroke(pos);
        }
        None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        if self.drawing {
            ctx.document.end_active_stroke();
            self.drawing = false;
        }
        None
    }

    fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    fn size(&self) -> Option<f32> {
        Some(self.width)
    }

    fn adjust_size(&mut self, delta: f32) {
        self.width = (self.width + delta).clamp(*WIDTH_RANGE.start(), *WIDTH_RANGE.end());
    }

    fn ui(&mut self, ui: &mut Ui) {
        size_slider(ui, "Size", &mut self.width, WIDTH_RANGE);
    }

    fn preview(&self, painter: &Painter, pointer: Pos2) {
        painter.circle_stroke(pointer, self.width / 2.0, egui::Stroke::new(1.0, PREVIEW_COLOR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_press_drag_release_draws_one_stroke() {
        let mut ctx = DocumentContext::default();
        let mut pencil = PencilTool::new(5.0);
        pencil.set_color(Color32::RED);

        pencil.on_pointer_down(pos2(0.0, 0.0), &mut ctx);
        pencil.on_pointer_held(pos2(1.0, 0.0), &mut ctx);
        pencil.on_pointer_held(pos2(2.0, 0.0), &mut ctx);
        pencil.on_pointer_up(pos2(2.0, 0.0), &mut ctx);

        let strokes = ctx.document.strokes();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].points().len(), 3);
        assert_eq!(strokes[0].color(), Color32::RED);
        assert_eq!(strokes[0].width(), 5.0);

        // The press recorded the empty document
        assert!(ctx.undo());
        assert!(ctx.document.strokes().is_empty());
    }

    #[test]
    fn test_held_without_press_does_nothing() {
        let mut ctx = DocumentContext::default();
        let mut pencil = PencilTool::new(5.0);
        pencil.on_pointer_held(pos2(1.0, 0.0), &mut ctx);
        pencil.on_pointer_up(pos2(1.0, 0.0), &mut ctx);
        assert!(ctx.document.strokes().is_empty());
        assert!(!ctx.history.can_undo());
    }

    #[test]
    fn test_size_is_clamped() {
        let mut pencil = PencilTool::new(500.0);
        assert_eq!(pencil.width(), 100.0);
        pencil.adjust_size(-1000.0);
        assert_eq!(pencil.width(), 1.0);
    }
}
