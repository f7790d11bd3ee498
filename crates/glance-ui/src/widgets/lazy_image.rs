//! Visibility-deferred image.
//!
//! [`LazyImage`] renders a placeholder until its element is reported visible
//! by the host's visibility observer, then swaps in the target source for the
//! rest of the mount. The visibility flag is one-way: once set it is never
//! cleared while mounted, and the observation is released in the same
//! callback that sets it.

use crate::{ImageAttributes, ImageNode, ImageSource};
use glance_core::{
    DisposableEffectResult, DisposableEffectState, MutableState, Owned, StateSubscription,
};
use glance_foundation::{
    ObservationHandle, ObserverOptions, Threshold, VisibilityCallback, VisibilityEntry,
    VisibilityHost,
};
use glance_ui_graphics::EdgeInsets;
use std::cell::Ref;
use std::fmt;

/// Configuration of a [`LazyImage`].
#[derive(Clone, Debug, PartialEq)]
pub struct LazyImageSpec {
    /// Real image, shown once visible. `None` keeps the placeholder forever.
    pub src: Option<ImageSource>,
    pub placeholder: ImageSource,
    pub threshold: Threshold,
    pub root_margin: EdgeInsets,
    pub attributes: ImageAttributes,
}

impl Default for LazyImageSpec {
    fn default() -> Self {
        Self {
            src: None,
            placeholder: ImageSource::default_placeholder(),
            threshold: Threshold::DEFAULT,
            root_margin: EdgeInsets::ZERO,
            attributes: ImageAttributes::default(),
        }
    }
}

impl LazyImageSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn src(mut self, src: impl Into<ImageSource>) -> Self {
        self.src = Some(src.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<ImageSource>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = Threshold::new(threshold);
        self
    }

    pub fn root_margin(mut self, root_margin: EdgeInsets) -> Self {
        self.root_margin = root_margin;
        self
    }

    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.attributes.alt = alt.into();
        self
    }

    pub fn attributes(mut self, attributes: ImageAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.threshold,
            root_margin: self.root_margin,
        }
    }
}

/// Source the widget renders for `spec` in the given visibility state.
pub fn resolve_source(spec: &LazyImageSpec, visible: bool) -> &ImageSource {
    match &spec.src {
        Some(src) if visible => src,
        _ => &spec.placeholder,
    }
}

impl ImageNode {
    pub fn from_spec(spec: &LazyImageSpec, visible: bool) -> Self {
        Self::new(resolve_source(spec, visible).clone(), spec.attributes.clone())
    }
}

/// A mounted visibility-deferred image.
///
/// Mounting starts observation; [`LazyImage::unmount`] (or dropping the widget)
/// releases it. A new mount always starts with the flag cleared.
pub struct LazyImage<H>
where
    H: VisibilityHost,
{
    host: H,
    target: H::Target,
    spec: Owned<LazyImageSpec>,
    visible: MutableState<bool>,
    observation: DisposableEffectState,
    handle: Option<ObservationHandle<H::Observer>>,
    mounted: bool,
}

impl<H> LazyImage<H>
where
    H: VisibilityHost,
    H::Observer: 'static,
{
    /// Mounts the widget on `target` and begins observing it.
    pub fn mount(host: H, target: H::Target, spec: LazyImageSpec) -> Self {
        let mut image = Self {
            host,
            target,
            spec: Owned::new(spec),
            visible: MutableState::new(false),
            observation: DisposableEffectState::new(),
            handle: None,
            mounted: true,
        };
        log::debug!("lazy image mounted for {:?}", image.spec.borrow().src);
        image.sync_observation();
        image
    }

    /// Applies a new configuration.
    ///
    /// A changed threshold or root margin replaces the observation; the
    /// visibility flag is kept as is.
    pub fn update(&mut self, spec: LazyImageSpec) {
        self.spec.replace(spec);
        if self.mounted {
            self.sync_observation();
        }
    }

    pub fn render(&self) -> ImageNode {
        ImageNode::from_spec(&self.spec.borrow(), self.visible.get())
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Whether an observer is currently attached and not yet released.
    pub fn is_observing(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| handle.is_attached() && !handle.is_released())
    }

    pub fn spec(&self) -> Ref<'_, LazyImageSpec> {
        self.spec.borrow()
    }

    pub fn target(&self) -> &H::Target {
        &self.target
    }

    /// Calls `listener` with the re-rendered node whenever the visibility
    /// flag flips.
    pub fn on_source_change(&self, listener: impl Fn(&ImageNode) + 'static) -> StateSubscription {
        let spec = self.spec.clone();
        self.visible.subscribe(move |visible| {
            let node = spec.with(|spec| ImageNode::from_spec(spec, *visible));
            listener(&node);
        })
    }

    /// Removes the widget, releasing its observation.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn sync_observation(&mut self) {
        let options = self.spec.borrow().observer_options();
        let host = &self.host;
        let target = &self.target;
        let visible = &self.visible;
        let mut started = None;
        let ran = self.observation.run_keyed(&options.key(), || {
            let (result, handle) = start_observation(host, target, visible, options);
            started = handle;
            result
        });
        if ran {
            self.handle = started;
        }
    }

    fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.observation.dispose_current();
        self.handle = None;
        log::debug!("lazy image unmounted, visible = {}", self.visible.get());
    }
}

fn start_observation<H>(
    host: &H,
    target: &H::Target,
    visible: &MutableState<bool>,
    options: ObserverOptions,
) -> (DisposableEffectResult, Option<ObservationHandle<H::Observer>>)
where
    H: VisibilityHost,
    H::Observer: 'static,
{
    if !host.supports_observation() {
        log::debug!("visibility observation unavailable, showing target immediately");
        visible.set(true);
        return (DisposableEffectResult::none(), None);
    }

    let handle: ObservationHandle<H::Observer> = ObservationHandle::pending();
    let callback: VisibilityCallback = {
        let handle = handle.downgrade();
        let visible = visible.clone();
        Box::new(move |entries: &[VisibilityEntry]| {
            let Some(handle) = handle.upgrade() else {
                return;
            };
            if handle.is_released() {
                return;
            }
            if entries.iter().any(|entry| entry.is_intersecting) {
                visible.set(true);
                handle.release();
                log::debug!("lazy image became visible, observation released");
            }
        })
    };

    let Some(observer) = host.create_observer(&options, callback) else {
        log::warn!("host could not create a visibility observer, showing target immediately");
        visible.set(true);
        return (DisposableEffectResult::none(), None);
    };
    handle.attach(observer, target);

    let release = handle.clone();
    let result = DisposableEffectResult::new(move || {
        release.release();
    });
    (result, Some(handle))
}

impl<H> Drop for LazyImage<H>
where
    H: VisibilityHost,
{
    fn drop(&mut self) {
        if self.mounted {
            self.mounted = false;
            self.observation.dispose_current();
        }
    }
}

impl<H> fmt::Debug for LazyImage<H>
where
    H: VisibilityHost,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyImage")
            .field("spec", &*self.spec.borrow())
            .field("visible", &self.visible.get())
            .field("observation", &self.observation)
            .field("mounted", &self.mounted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_target_always_resolves_to_placeholder() {
        let spec = LazyImageSpec::new().placeholder("placeholder.jpg");
        assert_eq!(resolve_source(&spec, false), "placeholder.jpg");
        assert_eq!(resolve_source(&spec, true), "placeholder.jpg");
    }

    #[test]
    fn present_target_needs_visibility() {
        let spec = LazyImageSpec::new().src("real.jpg");
        assert_eq!(resolve_source(&spec, false), &ImageSource::default_placeholder());
        assert_eq!(resolve_source(&spec, true), "real.jpg");
    }

    #[test]
    fn spec_builds_observer_options() {
        let spec = LazyImageSpec::new()
            .threshold(0.25)
            .root_margin(EdgeInsets::vertical(100.0));
        let options = spec.observer_options();
        assert_eq!(options.threshold.value(), 0.25);
        assert_eq!(options.root_margin, EdgeInsets::vertical(100.0));
    }
}
