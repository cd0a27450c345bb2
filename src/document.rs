use std::sync::atomic::{AtomicU64, Ordering};

use egui::{Color32, Pos2};
use log::debug;

use crate::raster::BackgroundRaster;
use crate::stroke::Stroke;

/// Source of background revisions. Shared by every document, so a revision
/// never repeats even across documents that replace one another.
static NEXT_BACKGROUND_REVISION: AtomicU64 = AtomicU64::new(1);

/// The drawing state: strokes in z-order plus an optional background.
///
/// Renderers and exporters read from here and hold no state of their own.
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    strokes: Vec<Stroke>,
    background: Option<BackgroundRaster>,
    /// Index into `strokes` of the stroke being extended, if any
    active: Option<usize>,
    /// Renewed on every background change so cached textures can be rebuilt.
    /// Unique per process; 0 until the first change.
    background_revision: u64,
}

impl CanvasDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh document over an imported background.
    pub fn with_background(background: BackgroundRaster) -> Self {
        let mut document = Self::new();
        document.set_background(background);
        document
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn background(&self) -> Option<&BackgroundRaster> {
        self.background.as_ref()
    }

    pub fn background_revision(&self) -> u64 {
        self.background_revision
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.and_then(|index| self.strokes.get(index))
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.background.is_none()
    }

    /// Starts a new stroke on top of the others and makes it active.
    /// Any previously active stroke is ended.
    pub fn begin_stroke(&mut self, color: Color32, width: f32, first_point: Pos2) {
        self.strokes.push(Stroke::new(color, width, vec![first_point]));
        self.active = Some(self.strokes.len() - 1);
    }

    /// Appends a point to the active stroke. No-op without one.
    pub fn extend_active_stroke(&mut self, point: Pos2) {
        if let Some(stroke) = self.active.and_then(|index| self.strokes.get_mut(index)) {
            stroke.push_point(point);
        }
    }

    /// Ends the active stroke. No-op without one.
    pub fn end_active_stroke(&mut self) {
        if let Some(stroke) = self.active.take().and_then(|index| self.strokes.get(index)) {
            debug!("Ended stroke with {} points", stroke.points().len());
        }
    }

    /// Appends a finished stroke (used by the shape tools).
    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Swaps in a whole new stroke collection. Ends any active stroke, since
    /// its index no longer refers to the same stroke.
    pub fn replace_strokes(&mut self, strokes: Vec<Stroke>) {
        self.active = None;
        self.strokes = strokes;
    }

    pub fn set_background(&mut self, background: BackgroundRaster) {
        self.background = Some(background);
        self.bump_background_revision();
    }

    pub fn clear_background(&mut self) {
        if self.background.take().is_some() {
            self.bump_background_revision();
        }
    }

    /// Zeroes background alpha within `radius` of `center` (canvas-local).
    /// Returns the number of pixels changed; without a background nothing happens.
    pub fn punch_background_alpha(&mut self, center: Pos2, radius: f32) -> usize {
        let Some(background) = self.background.as_mut() else {
            return 0;
        };
        let punched = background.punch_alpha(center, radius);
        if punched > 0 {
            self.bump_background_revision();
        }
        punched
    }

    /// Deep copy of the content (strokes and background), without the
    /// transient active-stroke and revision bookkeeping.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            strokes: self.strokes.clone(),
            background: self.background.clone(),
        }
    }

    /// Replaces strokes and background wholesale with the snapshot's content.
    pub fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.strokes = snapshot.strokes;
        self.background = snapshot.background;
        self.active = None;
        self.bump_background_revision();
    }

    fn bump_background_revision(&mut self) {
        self.background_revision = NEXT_BACKGROUND_REVISION.fetch_add(1, Ordering::Relaxed);
    }

    /// True if both documents have identical strokes and background pixels.
    pub fn content_eq(&self, other: &CanvasDocument) -> bool {
        self.strokes == other.strokes && self.background == other.background
    }
}

/// An owned copy of a document's content, stored in the undo/redo stacks.
///
/// Owns its pixel buffer outright, so later edits to the live document can
/// never reach into history.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    strokes: Vec<Stroke>,
    background: Option<BackgroundRaster>,
}

impl DocumentSnapshot {
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn background(&self) -> Option<&BackgroundRaster> {
        self.background.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_stroke_lifecycle() {
        let mut doc = CanvasDocument::new();
        doc.begin_stroke(Color32::BLACK, 5.0, pos2(0.0, 0.0));
        doc.extend_active_stroke(pos2(1.0, 1.0));
        doc.extend_active_stroke(pos2(2.0, 2.0));
        assert_eq!(doc.active_stroke().unwrap().points().len(), 3);

        doc.end_active_stroke();
        assert!(doc.active_stroke().is_none());

        // Without an active stroke these are no-ops
        doc.extend_active_stroke(pos2(9.0, 9.0));
        doc.end_active_stroke();
        assert_eq!(doc.strokes().len(), 1);
        assert_eq!(doc.strokes()[0].points().len(), 3);
    }

    #[test]
    fn test_replace_strokes_ends_active_stroke() {
        let mut doc = CanvasDocument::new();
        doc.begin_stroke(Color32::BLACK, 5.0, pos2(0.0, 0.0));
        doc.replace_strokes(Vec::new());
        doc.extend_active_stroke(pos2(1.0, 1.0));
        assert!(doc.strokes().is_empty());
    }

    #[test]
    fn test_background_revision_tracks_changes() {
        let mut doc = CanvasDocument::new();
        let start = doc.background_revision();

        // Nothing to clear or punch yet
        doc.clear_background();
        assert_eq!(doc.punch_background_alpha(pos2(1.0, 1.0), 3.0), 0);
        assert_eq!(doc.background_revision(), start);

        let raster = BackgroundRaster::from_rgba(4, 4, vec![255; 64]).unwrap();
        doc.set_background(raster);
        assert!(doc.background_revision() > start);

        let before = doc.background_revision();
        assert!(doc.punch_background_alpha(pos2(1.0, 1.0), 1.0) > 0);
        assert!(doc.background_revision() > before);
    }

    #[test]
    fn test_background_revision_is_unique_across_documents() {
        let raster = BackgroundRaster::from_rgba(2, 2, vec![255; 16]).unwrap();
        let first = CanvasDocument::with_background(raster.clone());
        let second = CanvasDocument::with_background(raster);
        assert_ne!(first.background_revision(), second.background_revision());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let raster = BackgroundRaster::from_rgba(4, 4, vec![255; 64]).unwrap();
        let mut doc = CanvasDocument::with_background(raster);
        doc.add_stroke(Stroke::new(Color32::RED, 2.0, vec![pos2(0.0, 0.0), pos2(3.0, 3.0)]));

        let snapshot = doc.snapshot();
        doc.punch_background_alpha(pos2(0.0, 0.0), 2.0);
        doc.replace_strokes(Vec::new());

        assert_eq!(snapshot.strokes().len(), 1);
        assert!(snapshot.background().unwrap().pixels().iter().all(|&b| b == 255));

        doc.restore(snapshot.clone());
        assert_eq!(doc.snapshot(), snapshot);
    }
}
