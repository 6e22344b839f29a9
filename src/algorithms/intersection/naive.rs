//! `O(n^2)` baseline used to check the sweep against in tests.

use super::bentley_ottmann::Intersection;
use super::predicates::{lies_on_segment, segment_intersection};
use crate::data::{Point, Segment};

fn pairs<E>(slice: &[E]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let n = slice.len();
    (0..n).flat_map(move |a| (0..a).map(move |b| (a, b)))
}

/// Every point where `a` and `b` meet. `segment_intersection` alone only
/// covers a transversal crossing: it solves for where the two infinite lines
/// meet, so it reports nothing for colinear segments, even when one's
/// endpoint sits in the other's interior (the lines are parallel, so the
/// solve is singular). The sweep catches that case through its own
/// point-containment check rather than through this solve, so the baseline
/// has to check endpoints against the other segment the same way, or the two
/// would disagree on colinear-overlap inputs.
fn touch_points(a: &Segment, b: &Segment) -> Vec<Point> {
    if let Some(point) = segment_intersection(a, b) {
        return vec![point];
    }
    let mut points = Vec::new();
    for (candidate, holder) in [(a.upper, b), (a.lower, b), (b.upper, a), (b.lower, a)] {
        if lies_on_segment(holder, candidate)
            && !points
                .iter()
                .any(|p: &Point| (p.x - candidate.x).abs() < 1e-9 && (p.y - candidate.y).abs() < 1e-9)
        {
            points.push(candidate);
        }
    }
    points
}

/// Finds every point where two or more of `segments` meet, by testing every
/// pair directly and grouping pairs that land on the same point.
pub fn segment_intersections(segments: &[Segment]) -> Vec<Intersection> {
    let mut hits: Vec<Intersection> = Vec::new();
    for (a, b) in pairs(segments) {
        for point in touch_points(&segments[a], &segments[b]) {
            match hits.iter_mut().find(|hit| {
                (hit.point.x - point.x).abs() < 1e-6 && (hit.point.y - point.y).abs() < 1e-6
            }) {
                Some(hit) => {
                    if !hit.segments.contains(&a) {
                        hit.segments.push(a);
                    }
                    if !hit.segments.contains(&b) {
                        hit.segments.push(b);
                    }
                }
                None => hits.push(Intersection {
                    point,
                    segments: vec![a, b],
                }),
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Point;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn finds_a_single_crossing() {
        let segments = vec![seg(0.0, 0.0, 2.0, 2.0), seg(0.0, 2.0, 2.0, 0.0)];
        let hits = segment_intersections(&segments);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].segments.len(), 2);
    }

    #[test]
    fn groups_three_concurrent_segments_into_one_hit() {
        let segments = vec![
            seg(0.0, 0.0, 4.0, 4.0),
            seg(0.0, 4.0, 4.0, 0.0),
            seg(2.0, 0.0, 2.0, 4.0),
        ];
        let hits = segment_intersections(&segments);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].segments.len(), 3);
    }

    #[test]
    fn colinear_overlap_reports_the_shared_endpoint_and_the_touch_point() {
        let segments = vec![seg(0.0, 3.0, 1.0, 1.0), seg(-1.0, 5.0, 1.0, 1.0)];
        let hits = segment_intersections(&segments);
        let mut points: Vec<(f64, f64)> = hits.iter().map(|h| (h.point.x, h.point.y)).collect();
        points.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(points, vec![(0.0, 3.0), (1.0, 1.0)]);
    }
}
