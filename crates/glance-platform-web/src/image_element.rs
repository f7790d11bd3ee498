use crate::{WebError, WebVisibilityHost};
use glance_core::StateSubscription;
use glance_ui::{ImageNode, LazyImage, LazyImageSpec};
use std::borrow::Cow;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement};

/// The current window's document.
pub fn document() -> Result<Document, WebError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or(WebError::DomUnavailable)
}

/// A lazy image rendered into a real `<img>` element.
pub struct WebLazyImage {
    element: HtmlImageElement,
    image: LazyImage<WebVisibilityHost>,
    /// Attribute names currently set on the element, `src` excluded.
    applied: Vec<String>,
    _source_change: StateSubscription,
}

impl WebLazyImage {
    /// Creates an `<img>` under `parent` and starts observing it.
    pub fn mount(
        document: &Document,
        parent: &Element,
        spec: LazyImageSpec,
    ) -> Result<Self, WebError> {
        let element: HtmlImageElement = document
            .create_element("img")?
            .dyn_into()
            .map_err(|_| WebError::Js("created element is not an <img>".into()))?;
        parent.append_child(&element)?;

        let image = LazyImage::mount(WebVisibilityHost::new(), element.clone().into(), spec);
        let mut applied = Vec::new();
        apply_node(&element, &image.render(), &mut applied)?;

        let target = element.clone();
        let source_change = image.on_source_change(move |node| {
            log::debug!("swapping <img> source to {}", node.src);
            target.set_src(node.src.as_str());
        });

        Ok(Self {
            element,
            image,
            applied,
            _source_change: source_change,
        })
    }

    /// Applies a new configuration, re-rendering the element's attributes.
    ///
    /// Attributes the new configuration no longer carries are removed.
    pub fn update(&mut self, spec: LazyImageSpec) -> Result<(), WebError> {
        self.image.update(spec);
        apply_node(&self.element, &self.image.render(), &mut self.applied)
    }

    pub fn element(&self) -> &HtmlImageElement {
        &self.element
    }

    pub fn image(&self) -> &LazyImage<WebVisibilityHost> {
        &self.image
    }

    /// Releases the observation and removes the element from the DOM.
    pub fn unmount(self) {
        let Self {
            element,
            image,
            applied: _,
            _source_change,
        } = self;
        image.unmount();
        element.remove();
    }
}

fn apply_node(
    element: &HtmlImageElement,
    node: &ImageNode,
    applied: &mut Vec<String>,
) -> Result<(), WebError> {
    let pairs = node.attributes.pairs();
    for name in stale_attributes(applied, &pairs) {
        element.remove_attribute(name)?;
    }
    for (name, value) in &pairs {
        element.set_attribute(name, value)?;
    }
    element.set_src(node.src.as_str());
    *applied = pairs.into_iter().map(|(name, _)| name.into_owned()).collect();
    Ok(())
}

/// Names in `applied` that `next` no longer sets.
fn stale_attributes<'a>(
    applied: &'a [String],
    next: &[(Cow<'static, str>, Cow<'_, str>)],
) -> impl Iterator<Item = &'a str> + 'a {
    let keep: Vec<String> = next.iter().map(|(name, _)| name.to_string()).collect();
    applied
        .iter()
        .map(String::as_str)
        .filter(move |name| !keep.iter().any(|kept| kept == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_ui::ImageAttributes;

    fn names(attributes: &ImageAttributes) -> Vec<String> {
        attributes
            .pairs()
            .into_iter()
            .map(|(name, _)| name.into_owned())
            .collect()
    }

    #[test]
    fn dropped_attributes_are_stale() {
        let before = ImageAttributes::new()
            .title("t")
            .class("hero")
            .data("row", "1");
        let applied = names(&before);
        let after = ImageAttributes::new().class("hero");
        let pairs = after.pairs();

        let stale: Vec<&str> = stale_attributes(&applied, &pairs).collect();

        assert_eq!(stale, ["title", "data-row"]);
    }

    #[test]
    fn unchanged_attributes_are_not_stale() {
        let attributes = ImageAttributes::new().alt("cat").size(10, 20);
        let applied = names(&attributes);
        let pairs = attributes.pairs();
        assert_eq!(stale_attributes(&applied, &pairs).count(), 0);
    }
}
