//! Visibility observation.

mod handle;
mod host;
mod options;
mod tracker;
mod viewport;

pub use handle::{ObservationHandle, WeakObservationHandle};
pub use host::{VisibilityCallback, VisibilityEntry, VisibilityHost, VisibilityObserver};
pub use options::{ObserverOptions, Threshold, DEFAULT_THRESHOLD};
pub use tracker::{HeadlessObserver, HeadlessVisibilityHost, ObserverId, TargetId, VisibilityTracker};
pub use viewport::ScrollViewport;
