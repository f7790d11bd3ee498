use crate::WebObserver;
use glance_foundation::{ObserverOptions, VisibilityCallback, VisibilityHost};
use glance_ui_graphics::EdgeInsets;
use wasm_bindgen::JsValue;
use web_sys::Element;

/// Whether the JS global exposes `IntersectionObserver`.
pub fn supports_intersection_observer() -> bool {
    js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("IntersectionObserver"))
        .unwrap_or(false)
}

/// Formats insets as a CSS `rootMargin` value.
pub fn css_root_margin(margin: EdgeInsets) -> String {
    format!(
        "{}px {}px {}px {}px",
        margin.top, margin.right, margin.bottom, margin.left
    )
}

/// [`VisibilityHost`] backed by the browser's `IntersectionObserver`.
#[derive(Clone, Copy, Debug)]
pub struct WebVisibilityHost {
    supported: bool,
}

impl WebVisibilityHost {
    /// Probes the browser once; the result is kept for the host's lifetime.
    pub fn new() -> Self {
        let supported = supports_intersection_observer();
        if !supported {
            log::info!("IntersectionObserver unavailable, lazy images load eagerly");
        }
        Self { supported }
    }
}

impl Default for WebVisibilityHost {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityHost for WebVisibilityHost {
    type Target = Element;
    type Observer = WebObserver;

    fn supports_observation(&self) -> bool {
        self.supported
    }

    fn create_observer(
        &self,
        options: &ObserverOptions,
        callback: VisibilityCallback,
    ) -> Option<WebObserver> {
        match WebObserver::new(options, callback) {
            Ok(observer) => Some(observer),
            Err(err) => {
                log::warn!("failed to create IntersectionObserver: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_margin_uses_css_order() {
        let margin = EdgeInsets::from_components(4.0, 1.0, 2.0, 3.0);
        assert_eq!(css_root_margin(margin), "1px 2px 3px 4px");
    }

    #[test]
    fn zero_margin_is_explicit() {
        assert_eq!(css_root_margin(EdgeInsets::ZERO), "0px 0px 0px 0px");
    }

    #[test]
    fn fractional_margins_keep_precision() {
        assert_eq!(
            css_root_margin(EdgeInsets::vertical(12.5)),
            "12.5px 0px 12.5px 0px"
        );
    }
}
