//! Image widgets for Glance
//!
//! The centrepiece is [`LazyImage`], an image that shows a lightweight
//! placeholder until its element scrolls into (or near) view.

mod attributes;
mod image_source;
mod node;
pub mod widgets;

pub use attributes::*;
pub use image_source::*;
pub use node::*;
pub use widgets::*;

pub use glance_foundation::{
    ObserverOptions, Threshold, VisibilityEntry, VisibilityHost, VisibilityObserver,
    DEFAULT_THRESHOLD,
};
pub use glance_ui_graphics::EdgeInsets;

pub mod prelude {
    pub use crate::attributes::{CrossOrigin, Decoding, ImageAttributes, ReferrerPolicy};
    pub use crate::image_source::{ImageSource, DEFAULT_PLACEHOLDER};
    pub use crate::node::ImageNode;
    pub use crate::widgets::{LazyImage, LazyImageSpec};
    pub use glance_foundation::Threshold;
    pub use glance_ui_graphics::EdgeInsets;
}
