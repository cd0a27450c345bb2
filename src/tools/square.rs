use egui::{Color32, Modifiers, Painter, Pos2, Ui};

use super::{Tool, size_slider};
use crate::command::{Command, DocumentContext};
use crate::compositor;
use crate::geometry;
use crate::stroke::Stroke;

const THICKNESS_RANGE: std::ops::RangeInclusive<f32> = 1.0..=100.0;
const SLIDER_RANGE: std::ops::RangeInclusive<f32> = 1.0..=50.0;

/// Rectangle outlines dragged corner to corner. Shift keeps it square.
#[derive(Debug, Clone)]
pub struct SquareTool {
    color: Color32,
    thickness: f32,
    start: Option<Pos2>,
    end: Pos2,
    constrain: bool,
}

impl SquareTool {
    pub fn new(thickness: f32) -> Self {
        Self {
            color: Color32::BLACK,
            thickness: thickness.clamp(*THICKNESS_RANGE.start(), *THICKNESS_RANGE.end()),
            start: None,
            end: Pos2::ZERO,
            constrain: false,
        }
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    /// Outline for the current drag, inset so the stroke stays inside it.
    fn outline(&self, start: Pos2, end: Pos2) -> Option<Vec<Pos2>> {
        let end = if self.constrain {
            geometry::constrain_to_square(start, end)
        } else {
            end
        };
        geometry::rect_outline(start, end, self.thickness / 2.0)
    }
}

impl Tool for SquareTool {
    fn name(&self) -> &'static str {
        "Square"
    }

    fn on_pointer_down(&mut self, pos: Pos2, _ctx: &mut DocumentContext) -> Option<Command> {
        self.start = Some(pos);
        self.end = pos;
        None
    }

    fn on_pointer_held(&mut self, pos: Pos2, _ctx: &mut DocumentContext) -> Option<Command> {
        self.end = pos;
        None
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        let start = self.start.take()?;
        self.end = pos;

        // Degenerate drags commit nothing and take no snapshot
        if let Some(points) = self.outline(start, pos) {
            ctx.snapshot_for_undo();
            ctx.document
                .add_stroke(Stroke::new(self.color, self.thickness, points));
        }
        None
    }

    fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.constrain = modifiers.shift;
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
        ui.label("Hold Shift for a square");
    }

    fn preview(&self, painter: &Painter, _pointer: Pos2) {
        let Some(start) = self.start else {
            return;
        };
        if let Some(points) = self.outline(start, self.end) {
            let ghost = Stroke::new(self.color.gamma_multiply(0.7), self.thickness, points);
            compositor::paint_strokes(painter, std::slice::from_ref(&ghost));
        }
    }
}
