use egui::{Pos2, Vec2};

use super::history::History;
use crate::document::CanvasDocument;

/// The one owner of the document and its history, handed by reference to
/// every tool and command.
#[derive(Debug, Default)]
pub struct DocumentContext {
    /// The document being edited
    pub document: CanvasDocument,
    /// Undo/redo snapshots of `document`
    pub history: History,
    /// Screen-space position of the canvas' top-left pixel. Stroke points
    /// are in screen space; background pixels are at `point - origin`.
    pub origin: Vec2,
}

impl DocumentContext {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            document: CanvasDocument::new(),
            history: History::new(history_capacity),
            origin: Vec2::ZERO,
        }
    }

    /// Records the current document for undo. Call before every edit.
    pub fn snapshot_for_undo(&mut self) {
        self.history.snapshot_for_undo(&self.document);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.document)
    }

    /// Installs a new document wholesale and forgets all history.
    pub fn replace_document(&mut self, document: CanvasDocument) {
        self.document = document;
        self.history.clear();
    }

    /// Converts a screen-space point to canvas-local coordinates.
    pub fn to_canvas(&self, point: Pos2) -> Pos2 {
        point - self.origin
    }
}
