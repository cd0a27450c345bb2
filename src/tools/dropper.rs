use egui::{Color32, Painter, Pos2};

use super::{PREVIEW_COLOR, Tool};
use crate::command::{Command, DocumentContext};

/// Samples the colour under the pointer: topmost stroke first, then the
/// background, then the white canvas.
#[derive(Debug, Clone, Default)]
pub struct DropperTool;

impl DropperTool {
    pub fn new() -> Self {
        Self
    }

    /// Colour visible at screen position `pos`.
    pub fn sample(pos: Pos2, ctx: &DocumentContext) -> Color32 {
        if let Some(stroke) = ctx
            .document
            .strokes()
            .iter()
            .rev()
            .find(|stroke| stroke.hit_test(pos))
        {
            return stroke.color();
        }

        let local = ctx.to_canvas(pos);
        ctx.document
            .background()
            .and_then(|bg| bg.pixel(local.x.floor() as i64, local.y.floor() as i64))
            .map(|[r, g, b, a]| Color32::from_rgba_unmultiplied(r, g, b, a))
            .unwrap_or(Color32::WHITE)
    }
}

impl Tool for DropperTool {
    fn name(&self) -> &'static str {
        "Dropper"
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        let color = Self::sample(pos, ctx);
        log::debug!("Dropper sampled {:?} at {:?}", color, pos);
        Some(Command::PickColor(color))
    }

    fn on_pointer_held(&mut self, _pos: Pos2, _ctx: &mut DocumentContext) -> Option<Command> {
        None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _ctx: &mut DocumentContext) -> Option<Command> {
        None
    }

    fn preview(&self, painter: &Painter, pointer: Pos2) {
        painter.circle_stroke(pointer, 3.0, egui::Stroke::new(1.0, PREVIEW_COLOR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BackgroundRaster;
    use crate::stroke::Stroke;
    use egui::{Vec2, pos2};

    fn context() -> DocumentContext {
        let mut pixels = Vec::new();
        for _ in 0..4 {
            pixels.extend_from_slice(&[10, 20, 30, 255]);
        }
        let background = BackgroundRaster::from_rgba(2, 2, pixels).unwrap();

        let mut ctx = DocumentContext::default();
        ctx.origin = Vec2::new(100.0, 50.0);
        ctx.replace_document(crate::document::CanvasDocument::with_background(background));
        ctx
    }

    #[test]
    fn test_topmost_stroke_wins() {
        let mut ctx = context();
        let line = vec![pos2(100.0, 50.0), pos2(110.0, 50.0)];
        ctx.document.add_stroke(Stroke::new(Color32::RED, 4.0, line.clone()));
        ctx.document.add_stroke(Stroke::new(Color32::BLUE, 4.0, line));

        let command = DropperTool::new().on_pointer_down(pos2(105.0, 50.0), &mut ctx);
        assert_eq!(command, Some(Command::PickColor(Color32::BLUE)));
    }

    #[test]
    fn test_background_then_white() {
        let ctx = context();
        assert_eq!(
            DropperTool::sample(pos2(101.5, 51.5), &ctx),
            Color32::from_rgb(10, 20, 30)
        );
        assert_eq!(DropperTool::sample(pos2(103.0, 50.0), &ctx), Color32::WHITE);
        assert_eq!(DropperTool::sample(pos2(99.0, 50.0), &ctx), Color32::WHITE);
    }
}
