//! Pure geometry for Glance
//!
//! Points, sizes, rectangles and insets used by visibility tracking and
//! image layout hints.

mod geometry;

pub use geometry::*;
