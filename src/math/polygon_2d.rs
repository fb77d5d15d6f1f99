use super::Point2;

/// Computes the signed area of an open polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. Coordinates are
/// taken relative to the first point to limit cancellation on large
/// (projected or geographic) values.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let origin = points[0];
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i] - origin;
        let b = points[(i + 1) % n] - origin;
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Counts the points of a sequence that are not exactly equal to an earlier one.
#[must_use]
pub fn distinct_point_count(points: &[Point2]) -> usize {
    points
        .iter()
        .enumerate()
        .filter(|(i, p)| !points[..*i].contains(p))
        .count()
}

/// Returns `true` if the signed area is negligible relative to the extent of
/// the polygon, i.e. all points are (nearly) collinear.
///
/// The threshold scales with the squared bounding-box diagonal so the check
/// behaves the same for projected metres and geographic degrees.
#[must_use]
pub fn is_degenerate(points: &[Point2]) -> bool {
    let Some(first) = points.first() else {
        return true;
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let diag_sq = (max_x - min_x).powi(2) + (max_y - min_y).powi(2);
    signed_area_2d(points).abs() <= diag_sq * f64::EPSILON
}
