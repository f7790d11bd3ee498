//! Foundation layer for Glance: the visibility-observation seam widgets
//! depend on, plus a software tracker for hosts without a native observer.

pub mod visibility;

pub use visibility::*;
