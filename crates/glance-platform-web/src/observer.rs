use crate::host::css_root_margin;
use crate::WebError;
use glance_foundation::{
    ObserverOptions, Threshold, VisibilityCallback, VisibilityEntry, VisibilityObserver,
};
use js_sys::Array;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// A browser `IntersectionObserver` together with the closure it calls.
///
/// The closure lives as long as this value. [`VisibilityObserver::disconnect`]
/// only stops the observer, since it is usually called from inside the
/// closure itself.
pub struct WebObserver {
    observer: IntersectionObserver,
    _closure: Closure<dyn FnMut(Array)>,
}

impl WebObserver {
    pub fn new(options: &ObserverOptions, mut callback: VisibilityCallback) -> Result<Self, WebError> {
        let threshold = options.threshold;
        let closure = Closure::<dyn FnMut(Array)>::new(move |records: Array| {
            let entries: Vec<VisibilityEntry> = records
                .iter()
                .map(|record| {
                    let entry: IntersectionObserverEntry = record.unchecked_into();
                    visibility_entry(
                        entry.is_intersecting(),
                        entry.intersection_ratio() as f32,
                        threshold,
                    )
                })
                .collect();
            callback(&entries);
        });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(f64::from(options.threshold.value())));
        init.set_root_margin(&css_root_margin(options.root_margin));
        let observer = IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)?;

        Ok(Self {
            observer,
            _closure: closure,
        })
    }
}

impl VisibilityObserver for WebObserver {
    type Target = Element;

    fn observe(&self, target: &Element) {
        self.observer.observe(target);
    }

    fn disconnect(&self) {
        self.observer.disconnect();
    }
}

/// Maps a browser entry onto a [`VisibilityEntry`].
///
/// Browsers set `isIntersecting` on any overlap, and the first notification
/// after `observe` always fires, so the threshold is checked here as well.
pub(crate) fn visibility_entry(
    is_intersecting: bool,
    intersection_ratio: f32,
    threshold: Threshold,
) -> VisibilityEntry {
    VisibilityEntry {
        is_intersecting: is_intersecting && threshold.is_met_by(intersection_ratio, true),
        intersection_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_overlap_below_threshold_is_not_visible() {
        let entry = visibility_entry(true, 0.05, Threshold::new(0.5));
        assert!(!entry.is_intersecting);
        assert_eq!(entry.intersection_ratio, 0.05);
    }

    #[test]
    fn overlap_at_threshold_is_visible() {
        assert!(visibility_entry(true, 0.5, Threshold::new(0.5)).is_intersecting);
        assert!(visibility_entry(true, 0.12, Threshold::DEFAULT).is_intersecting);
    }

    #[test]
    fn zero_threshold_accepts_edge_contact() {
        assert!(visibility_entry(true, 0.0, Threshold::new(0.0)).is_intersecting);
    }

    #[test]
    fn non_intersecting_entries_stay_hidden() {
        assert!(!visibility_entry(false, 1.0, Threshold::new(0.1)).is_intersecting);
    }
}
