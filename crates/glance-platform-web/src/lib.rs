//! Browser bindings for Glance lazy images.
//!
//! [`WebVisibilityHost`] backs the widget with the browser's
//! `IntersectionObserver`, and [`WebLazyImage`] keeps an `<img>` element in
//! sync with a mounted [`glance_ui::LazyImage`].

mod error;
mod host;
mod image_element;
mod observer;

pub use error::WebError;
pub use host::{css_root_margin, supports_intersection_observer, WebVisibilityHost};
pub use image_element::{document, WebLazyImage};
pub use observer::WebObserver;
