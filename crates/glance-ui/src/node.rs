//! Render output of image widgets.

use crate::{ImageAttributes, ImageSource};

/// A single image-producing element, ready for a platform renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageNode {
    pub src: ImageSource,
    pub attributes: ImageAttributes,
}

impl ImageNode {
    pub fn new(src: ImageSource, attributes: ImageAttributes) -> Self {
        Self { src, attributes }
    }

    /// Looks up a rendered attribute by name, `src` included.
    pub fn attribute(&self, name: &str) -> Option<String> {
        if name == "src" {
            return Some(self.src.as_str().to_owned());
        }
        self.attributes
            .pairs()
            .into_iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn alt(&self) -> &str {
        &self.attributes.alt
    }
}
