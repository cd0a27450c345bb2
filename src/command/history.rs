use std::collections::VecDeque;

use log::debug;

use crate::document::{CanvasDocument, DocumentSnapshot};

/// Default number of undo steps kept before the oldest is dropped.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Snapshot-based undo/redo.
///
/// Every edit pushes a full copy of the document taken *before* the edit.
/// The undo stack is bounded; once full, the oldest state is evicted and can
/// no longer be reached. The redo stack is only ever as deep as the number of
/// consecutive undos, so it is left unbounded.
#[derive(Debug)]
pub struct History {
    /// Oldest entry at the front, newest at the back
    undo_stack: VecDeque<DocumentSnapshot>,
    redo_stack: Vec<DocumentSnapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// A history holding at most `capacity` undo steps (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: Vec::new(),
            capacity,
        }
    }

    /// Records the current state of `document` so the edit about to be
    /// applied can be undone. Clears the redo stack.
    pub fn snapshot_for_undo(&mut self, document: &CanvasDocument) {
        self.push_undo(document.snapshot());
        if !self.redo_stack.is_empty() {
            debug!("Discarding {} redo entries", self.redo_stack.len());
            self.redo_stack.clear();
        }
    }

    /// Restores the most recent undo entry. Returns `false` (and leaves the
    /// document alone) when there is nothing to undo.
    pub fn undo(&mut self, document: &mut CanvasDocument) -> bool {
        let Some(entry) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(document.snapshot());
        document.restore(entry);
        debug!(
            "Undo: {} undo / {} redo entries left",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        true
    }

    /// Restores the most recent redo entry. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self, document: &mut CanvasDocument) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        self.push_undo(document.snapshot());
        document.restore(entry);
        debug!(
            "Redo: {} undo / {} redo entries left",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        true
    }

    fn push_undo(&mut self, entry: DocumentSnapshot) {
        if self.undo_stack.len() == self.capacity {
            self.undo_stack.pop_front();
            debug!("Undo history full, evicted oldest entry");
        }
        self.undo_stack.push_back(entry);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, pos2};

    fn draw_line(doc: &mut CanvasDocument, history: &mut History, y: f32) {
        history.snapshot_for_undo(doc);
        doc.begin_stroke(Color32::BLACK, 2.0, pos2(0.0, y));
        doc.extend_active_stroke(pos2(10.0, y));
        doc.end_active_stroke();
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut doc = CanvasDocument::new();
        let mut history = History::default();
        assert!(!history.undo(&mut doc));
        assert!(!history.redo(&mut doc));
        assert!(doc.strokes().is_empty());
    }

    #[test]
    fn test_undo_redo_single_edit() {
        let mut doc = CanvasDocument::new();
        let mut history = History::default();
        draw_line(&mut doc, &mut history, 0.0);

        assert!(history.undo(&mut doc));
        assert!(doc.strokes().is_empty());
        assert!(history.can_redo());

        assert!(history.redo(&mut doc));
        assert_eq!(doc.strokes().len(), 1);
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut doc = CanvasDocument::new();
        let mut history = History::new(3);
        for i in 0..5 {
            draw_line(&mut doc, &mut history, i as f32);
        }
        assert_eq!(history.undo_len(), 3);

        while history.undo(&mut doc) {}
        // Oldest retained state has the first two strokes
        assert_eq!(doc.strokes().len(), 2);
    }

    #[test]
    fn test_redo_respects_capacity() {
        let mut doc = CanvasDocument::new();
        let mut history = History::new(2);
        for i in 0..2 {
            draw_line(&mut doc, &mut history, i as f32);
        }
        history.undo(&mut doc);
        history.undo(&mut doc);
        history.redo(&mut doc);
        history.redo(&mut doc);
        assert_eq!(history.undo_len(), 2);
        assert_eq!(doc.strokes().len(), 2);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut doc = CanvasDocument::new();
        let mut history = History::new(0);
        draw_line(&mut doc, &mut history, 0.0);
        draw_line(&mut doc, &mut history, 1.0);
        assert_eq!(history.undo_len(), 1);
    }
}
