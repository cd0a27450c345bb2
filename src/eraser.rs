//! Cutting strokes and background pixels under a circular eraser.
//!
//! Strokes are tested point by point, not segment by segment: a point within
//! the radius is dropped and splits the stroke there. A segment whose two
//! endpoints both survive is kept whole even if the eraser passes over its
//! middle.

use egui::Pos2;
use log::debug;

use crate::command::DocumentContext;
use crate::geometry;
use crate::stroke::Stroke;

/// Rewrites `strokes` with everything inside the eraser circle removed.
///
/// Each stroke is walked in order; runs of consecutive points outside the
/// circle with at least two points become new strokes with the source
/// colour and width. Strokes that leave no such run disappear, as do strokes
/// already marked erased. A non-positive radius erases nothing.
pub fn erase_strokes(strokes: &[Stroke], center: Pos2, radius: f32) -> Vec<Stroke> {
    if radius.is_nan() || radius <= 0.0 {
        return strokes.to_vec();
    }

    let mut result = Vec::with_capacity(strokes.len());
    for stroke in strokes.iter().filter(|stroke| !stroke.is_erased()) {
        let mut buffer: Vec<Pos2> = Vec::new();
        for &point in stroke.points() {
            if geometry::point_in_circle(point, center, radius) {
                flush(stroke, &mut buffer, &mut result);
            } else {
                buffer.push(point);
            }
        }
        flush(stroke, &mut buffer, &mut result);
    }
    result
}

fn flush(source: &Stroke, buffer: &mut Vec<Pos2>, out: &mut Vec<Stroke>) {
    if buffer.len() >= 2 {
        out.push(source.with_points(std::mem::take(buffer)));
    } else {
        buffer.clear();
    }
}

/// Summary of one eraser application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EraseReport {
    pub strokes_before: usize,
    pub strokes_after: usize,
    pub pixels_punched: usize,
}

/// Applies the eraser at screen-space `center` to the whole document: strokes
/// are re-split and background alpha within the radius is zeroed.
///
/// This does not snapshot; callers record history once at the start of an
/// erase gesture.
pub fn apply(ctx: &mut DocumentContext, center: Pos2, radius: f32) -> EraseReport {
    let strokes_before = ctx.document.strokes().len();
    let strokes = erase_strokes(ctx.document.strokes(), center, radius);
    let strokes_after = strokes.len();
    ctx.document.replace_strokes(strokes);

    let local = ctx.to_canvas(center);
    let pixels_punched = ctx.document.punch_background_alpha(local, radius);

    if strokes_before != strokes_after || pixels_punched > 0 {
        debug!(
            "Erase at {center:?}: {strokes_before} -> {strokes_after} strokes, {pixels_punched} pixels"
        );
    }

    EraseReport {
        strokes_before,
        strokes_after,
        pixels_punched,
    }
}
