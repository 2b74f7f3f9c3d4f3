use egui::{Pos2, Rect};

/// Distance between two points
pub fn distance(a: Pos2, b: Pos2) -> f32 {
    (b - a).length()
}

/// Calculate distance from a point to a line segment.
///
/// A zero-length segment degrades to point distance.
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Minimum distance from `point` to the polyline through `points`.
///
/// Returns `None` for an empty polyline. A single point is measured
/// directly; otherwise every consecutive pair is treated as a segment.
pub fn distance_to_polyline(point: Pos2, points: &[Pos2]) -> Option<f32> {
    match points {
        [] => None,
        [only] => Some(distance(point, *only)),
        _ => points
            .windows(2)
            .map(|pair| distance_to_line_segment(point, pair[0], pair[1]))
            .reduce(f32::min),
    }
}

/// Calculate the bounding box for a set of points
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_segment_distance_projects_onto_interior() {
        let d = distance_to_line_segment(pos2(5.0, 3.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_segment_distance_clamps_to_endpoints() {
        let d = distance_to_line_segment(pos2(13.0, 4.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-5);

        let d = distance_to_line_segment(pos2(-3.0, -4.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_segment_is_point_distance() {
        let d = distance_to_line_segment(pos2(3.0, 4.0), pos2(0.0, 0.0), pos2(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_polyline_distance() {
        assert_eq!(distance_to_polyline(pos2(0.0, 0.0), &[]), None);

        let single = distance_to_polyline(pos2(3.0, 4.0), &[pos2(0.0, 0.0)]).unwrap();
        assert!((single - 5.0).abs() < 1e-5);

        // L-shaped polyline, nearest to the vertical leg
        let points = [pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0)];
        let d = distance_to_polyline(pos2(12.0, 5.0), &points).unwrap();
        assert!((d - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(calculate_bounds(&[], 1.0), Rect::NOTHING);

        let rect = calculate_bounds(&[pos2(1.0, 2.0), pos2(5.0, -1.0)], 1.0);
        assert_eq!(rect.min, pos2(0.0, -2.0));
        assert_eq!(rect.max, pos2(6.0, 3.0));
    }
}
