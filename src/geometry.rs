use egui::{Pos2, Rect};

/// Distance from `point` to the closed segment `a..b`.
///
/// A zero-length segment degrades to point distance.
pub fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let ap = point - a;
    let len_sq = ab.length_sq();
    let t = if len_sq > 0.0 {
        (ap.dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (point - (a + ab * t)).length()
}

/// True when `point` lies inside or on the circle.
pub fn point_in_circle(point: Pos2, center: Pos2, radius: f32) -> bool {
    point.distance_sq(center) <= radius * radius
}

/// Closed polyline approximating a circle: `segments + 1` points, the last
/// repeating the first.
pub fn circle_outline(center: Pos2, radius: f32, segments: usize) -> Vec<Pos2> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            Pos2::new(
                center.x + angle.cos() * radius,
                center.y + angle.sin() * radius,
            )
        })
        .collect()
}

/// Moves `end` so that `start..end` spans a square of side `min(|w|, |h|)`,
/// keeping the drag direction on both axes.
pub fn constrain_to_square(start: Pos2, end: Pos2) -> Pos2 {
    let w = end.x - start.x;
    let h = end.y - start.y;
    let side = w.abs().min(h.abs());
    Pos2::new(
        start.x + if w < 0.0 { -side } else { side },
        start.y + if h < 0.0 { -side } else { side },
    )
}

/// Closed rectangle outline between two corners, inset by `inset` on every
/// side so a stroke of width `2 * inset` stays inside the dragged box.
///
/// Returns `None` when the inset leaves no area.
pub fn rect_outline(a: Pos2, b: Pos2, inset: f32) -> Option<Vec<Pos2>> {
    let x1 = a.x.min(b.x) + inset;
    let y1 = a.y.min(b.y) + inset;
    let x2 = a.x.max(b.x) - inset;
    let y2 = a.y.max(b.y) - inset;

    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    Some(vec![
        Pos2::new(x1, y1),
        Pos2::new(x2, y1),
        Pos2::new(x2, y2),
        Pos2::new(x1, y2),
        Pos2::new(x1, y1),
    ])
}

/// Bounding box of a set of points grown by `padding`.
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min = Pos2::new(f32::INFINITY, f32::INFINITY);
    let mut max = Pos2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for point in points {
        min = min.min(*point);
        max = max.max(*point);
    }

    Rect::from_min_max(
        Pos2::new(min.x - padding, min.y - padding),
        Pos2::new(max.x + padding, max.y + padding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_distance_to_segment() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);
        assert!((distance_to_segment(pos2(5.0, 3.0), a, b) - 3.0).abs() < 1e-5);
        // Beyond the end the nearest point is the endpoint
        assert!((distance_to_segment(pos2(13.0, 4.0), a, b) - 5.0).abs() < 1e-5);
        // Degenerate segment
        assert!((distance_to_segment(pos2(3.0, 4.0), a, a) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_in_circle_includes_boundary() {
        let center = pos2(15.0, 0.0);
        assert!(point_in_circle(pos2(21.0, 0.0), center, 6.0));
        assert!(!point_in_circle(pos2(21.5, 0.0), center, 6.0));
    }

    #[test]
    fn test_circle_outline_is_closed() {
        let points = circle_outline(pos2(50.0, 50.0), 10.0, 64);
        assert_eq!(points.len(), 65);
        let first = points[0];
        let last = points[64];
        assert!(first.distance(last) < 1e-3);
        for p in &points {
            assert!((p.distance(pos2(50.0, 50.0)) - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_constrain_to_square_keeps_direction() {
        let end = constrain_to_square(pos2(10.0, 10.0), pos2(0.0, 40.0));
        assert_eq!(end, pos2(0.0, 20.0));
    }

    #[test]
    fn test_rect_outline_inset_and_degenerate() {
        let outline = rect_outline(pos2(20.0, 20.0), pos2(0.0, 0.0), 2.5).unwrap();
        assert_eq!(outline.len(), 5);
        assert_eq!(outline[0], pos2(2.5, 2.5));
        assert_eq!(outline[2], pos2(17.5, 17.5));
        assert_eq!(outline[0], outline[4]);

        assert!(rect_outline(pos2(0.0, 0.0), pos2(4.0, 40.0), 2.5).is_none());
    }

    #[test]
    fn test_calculate_bounds() {
        let rect = calculate_bounds(&[pos2(1.0, 5.0), pos2(4.0, -2.0)], 1.0);
        assert_eq!(rect.min, pos2(0.0, -3.0));
        assert_eq!(rect.max, pos2(5.0, 6.0));
        assert_eq!(calculate_bounds(&[], 1.0), Rect::NOTHING);
    }
}
