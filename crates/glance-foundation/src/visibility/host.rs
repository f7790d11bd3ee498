//! Platform abstraction for visibility observation.
//!
//! Widgets never talk to a concrete observer. They ask a [`VisibilityHost`]
//! whether observation is available, create an observer with a threshold and
//! a callback, point it at one element and later disconnect it.

use super::ObserverOptions;

/// One visibility measurement delivered to an observer callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEntry {
    /// The element is visible enough to satisfy the observer's options.
    pub is_intersecting: bool,
    /// Fraction of the element's area inside the observation root.
    pub intersection_ratio: f32,
}

impl VisibilityEntry {
    pub fn intersecting(intersection_ratio: f32) -> Self {
        Self {
            is_intersecting: true,
            intersection_ratio,
        }
    }

    pub fn hidden() -> Self {
        Self {
            is_intersecting: false,
            intersection_ratio: 0.0,
        }
    }
}

/// Callback invoked on the UI loop with the entries of one notification.
pub type VisibilityCallback = Box<dyn FnMut(&[VisibilityEntry])>;

/// A live observer created by a [`VisibilityHost`].
pub trait VisibilityObserver {
    type Target;

    /// Starts reporting visibility changes of `target` to the callback.
    fn observe(&self, target: &Self::Target);

    /// Stops all reporting. Safe to call from inside the observer's callback.
    fn disconnect(&self);
}

/// Platform capability that produces visibility observers.
pub trait VisibilityHost {
    type Target;
    type Observer: VisibilityObserver<Target = Self::Target>;

    /// Result of the platform feature probe.
    fn supports_observation(&self) -> bool;

    /// Creates an observer, or `None` if the platform refused to build one.
    fn create_observer(
        &self,
        options: &ObserverOptions,
        callback: VisibilityCallback,
    ) -> Option<Self::Observer>;
}
