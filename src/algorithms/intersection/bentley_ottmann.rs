//! Bentley–Ottmann sweep-line intersection detection.
//!
//! This module implements the classic Bentley–Ottmann algorithm for finding
//! all pairwise intersections among a set of line segments. A horizontal
//! sweep line travels from top to bottom; the event queue holds every
//! segment endpoint plus any intersection discovered along the way, and the
//! status structure holds the segments currently crossing the sweep line,
//! ordered by their current x-intercept. Both structures are the same
//! [`AvlTree`](crate::tree::AvlTree), instantiated with different key types.
//!
//! # High-level workflow
//! 1. **Event queue** – keyed by [`EventKey`], which orders points top to
//!    bottom and left to right, seeded with every segment endpoint.
//! 2. **Status structure** – keyed by each segment's current x-intercept
//!    with the sweep line (non-unique: several segments can share an
//!    x-intercept at the moment they are reordered).
//! 3. **Processing** – for each event, segments starting, ending, or passing
//!    through the event point are classified into `U(p)`, `L(p)`, `C(p)`,
//!    removed and reinserted as needed, and new candidate intersection
//!    events are discovered among the segments now adjacent in the status
//!    structure, plus every active horizontal segment checked directly
//!    against whatever this event touched (see [`Sweep::handle_event`]).
//! 4. **Reporting** – every event point where two or more segments meet is
//!    reported together with the segments involved.
//!
//! The algorithm runs in `O((n + k) log n)` time, where `n` is the number of
//! segments and `k` is the number of intersections, and uses `O(n)` space.
//!
//! # Testing guidance
//! - **Common cases** – a handful of crossing segments, compared against
//!   [`naive::segment_intersections`](super::naive::segment_intersections).
//! - **Special cases** – shared endpoints, vertical and horizontal segments,
//!   and more than two segments meeting at a single point.
//! - **Tricky cases** – intersections that land to the left of the event
//!   that discovers them, and segments that merely touch at one point.
//! - **Property checks** – proptest generators that compare the sweep
//!   output against the quadratic baseline for small random instances.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

use super::predicates::{lies_on_segment, segment_intersection, status_at, TOLERANCE};
use crate::data::{EventKey, Point, Segment};
use crate::tree::AvlTree;

/// One reported event: the point where segments meet, and the (arena)
/// indices of every segment involved.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub point: Point,
    pub segments: Vec<usize>,
}

/// Status-structure key: a segment's x-intercept with the sweep line, plus a
/// tie-break that only matters among segments sharing that intercept (always
/// the case for segments meeting at the current event point). The tie-break
/// is the rate of change of x as y decreases, so ordering by it reproduces
/// the order the segments would have an instant below the event, without
/// perturbing the sweep position to approximate that order numerically.
/// Horizontal segments have no such rate and sort last, same as the reference
/// algorithm's rule of always placing them at the end.
type StatusKey = (OrderedFloat<f64>, OrderedFloat<f64>);

/// Rounds `x` to the nearest multiple of `scale * `[`TOLERANCE`](super::predicates::TOLERANCE),
/// so that two segments whose true x-intercepts coincide (e.g. two segments
/// crossing exactly at the current sweep height) compare equal even though
/// one of them was reached by a division that lands a few ULPs off.
///
/// `scale` must be a value shared by every key being compared against one
/// another — the overall magnitude of the input's coordinates, not `x`'s own
/// magnitude. Two mistakes rejected during development: rounding `x` to the
/// nearest multiple of `x.abs() * TOLERANCE` is self-cancelling (`x / (x *
/// TOLERANCE)` is always `1 / TOLERANCE`, which recovers `x` unchanged, so it
/// never merges two nearby-but-distinct floats); and even a shared grid keyed
/// off `x`'s own order of magnitude breaks down when the *true* value is
/// exactly zero but floating-point error computes it as some tiny nonzero
/// `x` — quantizing relative to that tiny `x` rounds nothing away, since the
/// error is proportional to the coordinates that produced `x`, not to `x`
/// itself. Using one `scale` derived from the whole problem's coordinates
/// keeps the step meaningful at both ends.
fn quantize(x: f64, scale: f64) -> f64 {
    let step = scale * TOLERANCE;
    (x / step).round() * step
}

fn status_order_key(segment: &Segment, sweep_y: f64, scale: f64) -> StatusKey {
    let x = status_at(segment, sweep_y);
    let tie_break = if segment.is_horizontal() {
        f64::INFINITY
    } else {
        (segment.lower.x - segment.upper.x) / (segment.upper.y - segment.lower.y)
    };
    (OrderedFloat(quantize(x, scale)), OrderedFloat(tie_break))
}

struct Sweep<'a> {
    segments: &'a [Segment],
    sweep_y: f64,
    /// Largest coordinate magnitude across every segment's endpoints, floored
    /// at 1.0. Shared by every call to [`quantize`] so that ties are judged
    /// against one grid for the whole sweep, not a grid that shifts with each
    /// individual intercept.
    scale: f64,
    event_queue: AvlTree<EventKey, ()>,
    status: AvlTree<StatusKey, usize>,
    starts_at: HashMap<EventKey, Vec<usize>>,
}

impl<'a> Sweep<'a> {
    fn new(segments: &'a [Segment]) -> Self {
        let mut event_queue = AvlTree::new();
        let mut starts_at: HashMap<EventKey, Vec<usize>> = HashMap::new();
        let mut scale = 1.0f64;
        for (idx, segment) in segments.iter().enumerate() {
            let upper = EventKey(segment.upper);
            let lower = EventKey(segment.lower);
            if !event_queue.contains_key(&upper) {
                event_queue.insert(upper, ());
            }
            if !event_queue.contains_key(&lower) {
                event_queue.insert(lower, ());
            }
            starts_at.entry(upper).or_default().push(idx);
            scale = scale
                .max(segment.upper.x.abs())
                .max(segment.upper.y.abs())
                .max(segment.lower.x.abs())
                .max(segment.lower.y.abs());
        }
        Sweep {
            segments,
            sweep_y: 0.0,
            scale,
            event_queue,
            status: AvlTree::new(),
            starts_at,
        }
    }

    fn status_key(&self, idx: usize) -> StatusKey {
        status_order_key(&self.segments[idx], self.sweep_y, self.scale)
    }

    /// Re-keys every segment currently in the status structure at the new
    /// sweep position, since the structure stores no running key of its own.
    fn rekey_status(&mut self) {
        let entries: Vec<(StatusKey, usize)> = self.status.iter().map(|(k, v)| (*k, *v)).collect();
        for &(key, idx) in &entries {
            self.status.remove_pair(&key, &idx);
        }
        for (_, idx) in entries {
            let key = self.status_key(idx);
            self.status.insert(key, idx);
        }
    }

    fn find_new_event(&mut self, left: usize, right: usize, point: Point) {
        if left == right {
            return;
        }
        let Some(candidate) = segment_intersection(&self.segments[left], &self.segments[right]) else {
            return;
        };
        let is_above_current = candidate.y < point.y || (candidate.y == point.y && candidate.x > point.x);
        if !is_above_current {
            return;
        }
        let key = EventKey(candidate);
        if !self.event_queue.contains_key(&key) {
            self.event_queue.insert(key, ());
        }
    }

    /// Sorts `segments` by their status key at the event point, so the order
    /// among segments tied on x matches the order they'll have an instant
    /// below the sweep line.
    fn order_for_reinsertion(&self, segments: &[usize]) -> Vec<(StatusKey, usize)> {
        let mut keyed: Vec<(StatusKey, usize)> = segments.iter().map(|&idx| (self.status_key(idx), idx)).collect();
        keyed.sort_by_key(|(key, _)| *key);
        keyed
    }

    fn handle_event(&mut self, point: Point, out: &mut Vec<Intersection>) {
        self.sweep_y = point.y;
        self.rekey_status();

        let upper_p: Vec<usize> = self.starts_at.get(&EventKey(point)).cloned().unwrap_or_default();
        let (point_segments, upper_for_status): (Vec<usize>, Vec<usize>) = upper_p
            .iter()
            .copied()
            .partition(|&idx| self.segments[idx].is_point());

        let active: Vec<(StatusKey, usize)> = self.status.iter().map(|(k, v)| (*k, *v)).collect();
        let mut lower_p = Vec::new();
        let mut contains_p = Vec::new();
        for (key, idx) in active {
            let segment = &self.segments[idx];
            if segment.lower == point {
                lower_p.push(idx);
                self.status.remove_pair(&key, &idx);
            } else if lies_on_segment(segment, point) {
                contains_p.push(idx);
                self.status.remove_pair(&key, &idx);
            }
        }

        let for_status: Vec<usize> = upper_for_status.iter().chain(contains_p.iter()).copied().collect();
        let reinsertion = self.order_for_reinsertion(&for_status);
        for &(key, idx) in &reinsertion {
            self.status.insert(key, idx);
        }

        let mut potential_segments = point_segments.clone();
        potential_segments.extend(reinsertion.iter().map(|(_, idx)| *idx));
        potential_segments.extend(lower_p.iter().copied());
        if potential_segments.len() > 1 {
            out.push(Intersection {
                point,
                segments: potential_segments,
            });
        }

        // Removal and reinsertion may have exposed new adjacent pairs
        // anywhere in the status structure, not just at the outer edges of
        // the reinserted block. The textbook shortcut (leftmost reinserted
        // segment's left neighbour, rightmost's right neighbour) relies on
        // U(p) ∪ C(p) landing as one contiguous run in status order, which
        // holds only when every segment through `point` shares the same
        // status key there. A horizontal segment's key is pinned to its own
        // fixed x for its whole lifetime, so it need not land next to the
        // other segments it passes through at this event, leaving an
        // untouched segment wedged between two reinserted ones — and a
        // segment whose removal closes a gap isn't "reinserted" at all.
        // Checking every pair that is now adjacent, rather than only the
        // ones the textbook shortcut assumes are the sole new pairs, is the
        // robust version of the same idea.
        if !lower_p.is_empty() || !reinsertion.is_empty() {
            let ordered: Vec<usize> = self.status.iter().map(|(_, &idx)| idx).collect();
            for window in ordered.windows(2) {
                self.find_new_event(window[0], window[1], point);
            }
        }

        // A horizontal segment's fixed key also means it can never become
        // adjacent, through any amount of reordering, to a segment whose key
        // legitimately sits between it and the rest of the status structure
        // — the adjacency scan above cannot bridge that gap no matter how
        // many events pass. Two direct-check cases cover this, each no
        // wider than it needs to be: a horizontal just reinserted this event
        // has never been tested against anything, so it is scanned against
        // every other active segment once, at its own insertion event only;
        // a horizontal that was already active only needs checking against
        // whatever is newly reinserted this event, since every other active
        // segment was already paired with it at an earlier event. This keeps
        // the per-event cost proportional to the event's own arity rather
        // than to the whole status structure, except at a horizontal's own
        // insertion (see `DESIGN.md` for the resulting worst-case bound).
        if !reinsertion.is_empty() {
            let reinserted_now: std::collections::HashSet<usize> =
                reinsertion.iter().map(|&(_, idx)| idx).collect();
            let all_active: Vec<usize> = self.status.iter().map(|(_, &idx)| idx).collect();
            for &h in &all_active {
                if !self.segments[h].is_horizontal() {
                    continue;
                }
                if reinserted_now.contains(&h) {
                    for &other in &all_active {
                        if other != h {
                            self.find_new_event(h, other, point);
                        }
                    }
                } else {
                    for &other in &reinserted_now {
                        self.find_new_event(h, other, point);
                    }
                }
            }
        }

        self.sweep_y = point.y;
    }
}

/// Tolerance used to coalesce two reported events that land on the same
/// geometric point but were computed through different segment pairs, and so
/// may differ in their last bit or two. The event queue itself still keys on
/// bit-exact equality, since that is what keeps two genuinely distinct,
/// arbitrarily close event points from being merged into one sweep step.
const MERGE_TOLERANCE: f64 = 1e-6;

/// Finds every point where two or more of `segments` meet, using the
/// Bentley–Ottmann sweep. Segments are referenced by their index into
/// `segments` in the returned [`Intersection`]s.
pub fn sweep_intersections(segments: &[Segment]) -> Vec<Intersection> {
    let mut sweep = Sweep::new(segments);
    let mut out: Vec<Intersection> = Vec::new();
    while let Some((EventKey(point), ())) = sweep.event_queue.pop_min() {
        let mut found = Vec::new();
        sweep.handle_event(point, &mut found);
        for hit in found {
            match out.iter_mut().find(|existing| {
                (existing.point.x - hit.point.x).abs() < MERGE_TOLERANCE
                    && (existing.point.y - hit.point.y).abs() < MERGE_TOLERANCE
            }) {
                Some(existing) => {
                    for idx in hit.segments {
                        if !existing.segments.contains(&idx) {
                            existing.segments.push(idx);
                        }
                    }
                }
                None => out.push(hit),
            }
        }
    }
    out
}
