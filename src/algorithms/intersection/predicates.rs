//! Geometric predicates used by the sweep: the sweep-line status key of a
//! segment, whether a point lies on a segment, and segment-segment
//! intersection.
//!
//! Everything here works with plain `f64` and `math.isclose`-style relative
//! tolerance rather than exact or rational arithmetic, so a tiny slack
//! (`TOLERANCE`) separates "on the segment" from "not on the segment". This
//! is a deliberate precision/robustness trade-off for this crate: see
//! `DESIGN.md`.

use approx::relative_eq;

use crate::data::{Point, Segment};

/// Relative tolerance used wherever two `f64` values are compared for
/// approximate equality, mirroring Python's `math.isclose` default.
pub const TOLERANCE: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    relative_eq!(a, b, max_relative = TOLERANCE)
}

/// The x-coordinate at which `segment` crosses the horizontal line `y =
/// sweep_y`. Vertical segments report their fixed x; horizontal segments
/// report their (also fixed) upper x, since every point on them shares it.
pub fn status_at(segment: &Segment, sweep_y: f64) -> f64 {
    if segment.is_vertical() || segment.is_horizontal() {
        return segment.upper.x;
    }
    let slope = (segment.upper.y - segment.lower.y) / (segment.upper.x - segment.lower.x);
    let intercept = segment.upper.y - segment.upper.x * slope;
    (sweep_y - intercept) / slope
}

/// Whether `point` lies on `segment`, including its endpoints, within
/// [`TOLERANCE`].
pub fn lies_on_segment(segment: &Segment, point: Point) -> bool {
    if point.y < segment.lower.y || point.y > segment.upper.y {
        return false;
    }
    let (leftmost, rightmost) = if segment.lower.x > segment.upper.x {
        (segment.upper, segment.lower)
    } else {
        (segment.lower, segment.upper)
    };
    if point.x < leftmost.x || point.x > rightmost.x {
        return false;
    }
    let direction_x = segment.upper.x - segment.lower.x;
    let direction_y = segment.upper.y - segment.lower.y;
    let offset_x = point.x - segment.lower.x;
    let offset_y = point.y - segment.lower.y;
    if direction_x == 0.0 && direction_y == 0.0 {
        return false;
    }
    if direction_x == 0.0 {
        return offset_x == 0.0;
    }
    if direction_y == 0.0 {
        return offset_y == 0.0;
    }
    approx_eq(offset_x / direction_x, offset_y / direction_y)
}

/// Solves for where the infinite lines through `a` and `b` cross, then
/// accepts the candidate only if it actually lies on both finite segments.
/// Returns `None` for parallel (including colinear-overlapping) lines or for
/// a crossing that falls outside one of the segments.
pub fn segment_intersection(a: &Segment, b: &Segment) -> Option<Point> {
    let v1 = (a.upper.x - a.lower.x, a.upper.y - a.lower.y);
    let v2 = (b.upper.x - b.lower.x, b.upper.y - b.lower.y);

    // Solve [v1 | -v2] * (t, u)^T = p2 - p1.
    let m00 = v1.0;
    let m01 = -v2.0;
    let m10 = v1.1;
    let m11 = -v2.1;
    let det = m00 * m11 - m01 * m10;
    if det == 0.0 {
        return None;
    }
    let rhs_x = b.lower.x - a.lower.x;
    let rhs_y = b.lower.y - a.lower.y;
    let t = (rhs_x * m11 - m01 * rhs_y) / det;

    let candidate = Point::new(a.lower.x + t * v1.0, a.lower.y + t * v1.1);
    if lies_on_segment(a, candidate) && lies_on_segment(b, candidate) {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn status_at_matches_the_segment_equation() {
        let s = seg(0.0, 0.0, 2.0, 2.0);
        assert!(approx_eq(status_at(&s, 1.0), 1.0));
    }

    #[test]
    fn status_at_vertical_segment_is_constant() {
        let s = seg(3.0, 0.0, 3.0, 10.0);
        assert_eq!(status_at(&s, 7.0), 3.0);
    }

    #[test]
    fn lies_on_segment_accepts_endpoints_and_interior() {
        let s = seg(0.0, 0.0, 4.0, 4.0);
        assert!(lies_on_segment(&s, Point::new(0.0, 0.0)));
        assert!(lies_on_segment(&s, Point::new(4.0, 4.0)));
        assert!(lies_on_segment(&s, Point::new(2.0, 2.0)));
        assert!(!lies_on_segment(&s, Point::new(2.0, 3.0)));
    }

    #[test]
    fn lies_on_segment_rejects_colinear_extrapolation() {
        let s = seg(0.0, 0.0, 1.0, 1.0);
        assert!(!lies_on_segment(&s, Point::new(2.0, 2.0)));
    }

    #[test]
    fn segment_intersection_finds_a_crossing() {
        let a = seg(0.0, 0.0, 2.0, 2.0);
        let b = seg(0.0, 2.0, 2.0, 0.0);
        let hit = segment_intersection(&a, &b).expect("segments cross");
        assert!(approx_eq(hit.x, 1.0));
        assert!(approx_eq(hit.y, 1.0));
    }

    #[test]
    fn segment_intersection_rejects_non_overlapping_lines() {
        let a = seg(0.0, 0.0, 1.0, 1.0);
        let b = seg(5.0, 0.0, 6.0, -1.0);
        assert_eq!(segment_intersection(&a, &b), None);
    }

    #[test]
    fn segment_intersection_rejects_parallel_segments() {
        let a = seg(0.0, 0.0, 1.0, 1.0);
        let b = seg(0.0, 1.0, 1.0, 2.0);
        assert_eq!(segment_intersection(&a, &b), None);
    }
}
