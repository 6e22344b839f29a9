//! Bentley–Ottmann sweep-line segment intersection.
//!
//! Given a set of 2D line segments, [`sweep_intersections`] reports every
//! point where two or more of them meet, in `O((n + k) log n)` time for `n`
//! segments and `k` intersections — except when several horizontal segments
//! are concurrently active, where a horizontal's frozen status key (see
//! `algorithms::intersection::bentley_ottmann`) forces an extra direct check
//! that can degrade towards `O(n²)`; see `DESIGN.md` for the bound. The
//! sweep is built on a single self-balancing [`tree::AvlTree`], reused both
//! as the event queue and as the status structure that tracks which
//! segments currently cross the sweep line.
//!
//! ```
//! use sweepline::data::{Point, Segment};
//! use sweepline::sweep_intersections;
//!
//! let segments = vec![
//!     Segment::new(Point::new(0.0, 0.0), Point::new(4.0, 4.0)),
//!     Segment::new(Point::new(0.0, 4.0), Point::new(4.0, 0.0)),
//! ];
//! let hits = sweep_intersections(&segments);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].point, Point::new(2.0, 2.0));
//! ```

pub mod algorithms;
pub mod data;
pub mod tree;

#[doc(inline)]
pub use algorithms::intersection::{sweep_intersections, Intersection};

/// The one input condition the core rejects outright rather than leaving
/// undefined: the algorithm's contract only covers finite coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    NonFiniteCoordinate { x: f64, y: f64 },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NonFiniteCoordinate { x, y } => {
                write!(f, "non-finite coordinate ({x}, {y})")
            }
        }
    }
}

impl std::error::Error for Error {}
