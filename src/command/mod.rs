mod context;
mod history;

use std::path::PathBuf;

use egui::Color32;
use log::info;

use crate::document::CanvasDocument;
use crate::error::CanvasResult;
use crate::export;
use crate::raster::BackgroundRaster;

pub use context::DocumentContext;
pub use history::{DEFAULT_HISTORY_CAPACITY, History};

/// Document-level actions triggered from menus, shortcuts or tools.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Undo,
    Redo,
    /// Start over with an empty document
    NewCanvas,
    /// Replace the document with a fresh one over the decoded image
    OpenBackground(PathBuf),
    ClearBackground,
    /// Composite at `width x height` and write the flattened image
    Export {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    /// A colour sampled from the canvas; handled by the UI's colour state
    PickColor(Color32),
}

/// What executing a command did, for the UI to react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    /// The document changed
    Changed,
    /// Nothing to do (e.g. undo on an empty stack)
    NoOp,
    /// The document was untouched; the colour selection should change
    ColorPicked(Color32),
}

impl Command {
    /// Executes the command. On error the document and history are left as
    /// they were.
    pub fn execute(&self, ctx: &mut DocumentContext) -> CanvasResult<CommandOutcome> {
        let outcome = match self {
            Command::Undo => changed_if(ctx.undo()),
            Command::Redo => changed_if(ctx.redo()),
            Command::NewCanvas => {
                ctx.replace_document(CanvasDocument::new());
                info!("Started a new canvas");
                CommandOutcome::Changed
            }
            Command::OpenBackground(path) => {
                let background = BackgroundRaster::load(path)?;
                ctx.replace_document(CanvasDocument::with_background(background));
                CommandOutcome::Changed
            }
            Command::ClearBackground => {
                if ctx.document.background().is_none() {
                    CommandOutcome::NoOp
                } else {
                    ctx.snapshot_for_undo();
                    ctx.document.clear_background();
                    CommandOutcome::Changed
                }
            }
            Command::Export {
                path,
                width,
                height,
            } => {
                export::export_document(&ctx.document, ctx.origin, *width, *height, path)?;
                CommandOutcome::NoOp
            }
            Command::PickColor(color) => CommandOutcome::ColorPicked(*color),
        };
        Ok(outcome)
    }
}

fn changed_if(changed: bool) -> CommandOutcome {
    if changed {
        CommandOutcome::Changed
    } else {
        CommandOutcome::NoOp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_new_canvas_clears_history() {
        let mut ctx = DocumentContext::new(10);
        ctx.snapshot_for_undo();
        ctx.document.begin_stroke(Color32::BLACK, 3.0, pos2(0.0, 0.0));
        ctx.document.extend_active_stroke(pos2(5.0, 5.0));

        let outcome = Command::NewCanvas.execute(&mut ctx).unwrap();
        assert_eq!(outcome, CommandOutcome::Changed);
        assert!(ctx.document.strokes().is_empty());
        assert!(!ctx.history.can_undo());
        assert_eq!(Command::Undo.execute(&mut ctx).unwrap(), CommandOutcome::NoOp);
    }

    #[test]
    fn test_open_missing_background_keeps_document() {
        let mut ctx = DocumentContext::new(10);
        ctx.snapshot_for_undo();
        let stroke = crate::Stroke::new(Color32::RED, 2.0, vec![pos2(0.0, 0.0), pos2(1.0, 1.0)]);
        ctx.document.add_stroke(stroke);

        let result = Command::OpenBackground("/no/such/image.png".into()).execute(&mut ctx);
        assert!(matches!(result, Err(crate::CanvasError::Decode { .. })));
        assert_eq!(ctx.document.strokes().len(), 1);
        assert!(ctx.history.can_undo());
    }

    #[test]
    fn test_clear_background_is_undoable() {
        let mut ctx = DocumentContext::new(10);
        let raster = BackgroundRaster::from_rgba(2, 2, vec![9; 16]).unwrap();
        ctx.replace_document(CanvasDocument::with_background(raster));

        assert_eq!(
            Command::ClearBackground.execute(&mut ctx).unwrap(),
            CommandOutcome::Changed
        );
        assert!(ctx.document.background().is_none());
        assert_eq!(
            Command::ClearBackground.execute(&mut ctx).unwrap(),
            CommandOutcome::NoOp
        );

        Command::Undo.execute(&mut ctx).unwrap();
        assert!(ctx.document.background().is_some());
    }

    #[test]
    fn test_pick_color_passes_through() {
        let mut ctx = DocumentContext::default();
        let outcome = Command::PickColor(Color32::GREEN).execute(&mut ctx).unwrap();
        assert_eq!(outcome, CommandOutcome::ColorPicked(Color32::GREEN));
    }
}
