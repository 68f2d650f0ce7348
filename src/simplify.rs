use crate::types::Point;

/// Deviation tolerance of the simplifier: the square of 3 display units,
/// so the hot path never takes a square root.
const EPSILON_SQ: f64 = 9.0;

/// Chords shorter than this are treated as a single point.
const DEGENERATE_CHORD_SQ: f64 = 1e-10;

/// Reduce a densely sampled trajectory to a shape-preserving polyline
/// (Douglas-Peucker). The first and last points always survive; interior
/// points survive only where their squared perpendicular deviation from
/// the current chord exceeds the tolerance. Pure function, the single
/// place sample density is reduced before classification.
pub fn simplify_trajectory(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let (max_dev_sq, max_index) = max_deviation(points);
    if max_dev_sq > EPSILON_SQ {
        let mut left = simplify_trajectory(&points[..=max_index]);
        let right = simplify_trajectory(&points[max_index..]);
        // The split point is in both halves; drop one copy.
        left.pop();
        left.extend(right);
        left
    } else {
        vec![points[0], points[points.len() - 1]]
    }
}

fn max_deviation(points: &[Point]) -> (f64, usize) {
    let start = points[0];
    let end = points[points.len() - 1];

    let mut max_dev_sq = 0.0;
    let mut max_index = 0;
    for (index, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dev_sq = perpendicular_distance_sq(*point, start, end);
        if dev_sq > max_dev_sq {
            max_dev_sq = dev_sq;
            max_index = index;
        }
    }
    (max_dev_sq, max_index)
}

fn perpendicular_distance_sq(point: Point, start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let chord_sq = dx * dx + dy * dy;
    if chord_sq < DEGENERATE_CHORD_SQ {
        // Zero-length chord: deviation is the distance to the shared endpoint.
        return point.distance_sq(start);
    }
    let cross = (point.x - start.x) * dy - (point.y - start.y) * dx;
    cross * cross / chord_sq
}
