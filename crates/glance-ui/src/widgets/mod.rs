//! UI widget components

pub mod lazy_image;

pub use lazy_image::*;
