//! Planar geometry primitives
//!
//! Provides the two value types the rest of the library is built on:
//! [`Point2d`] for positions in the planar map frame and [`BoundingBox`]
//! for axis-aligned extents. Both are small `Copy` types with inclusive
//! containment and intersection semantics.

mod types;

pub use types::{BoundingBox, Point2d};
