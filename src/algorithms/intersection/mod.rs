pub mod bentley_ottmann;
pub mod naive;
mod predicates;

#[doc(inline)]
pub use bentley_ottmann::{sweep_intersections, Intersection};
