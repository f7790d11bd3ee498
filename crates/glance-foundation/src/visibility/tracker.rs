//! Software visibility tracking.
//!
//! [`VisibilityTracker`] plays the role of a platform intersection observer for
//! hosts that have none (headless runs, desktop renderers, tests). Layout code
//! reports target bounds, scroll code moves the [`ScrollViewport`], and the
//! host calls [`VisibilityTracker::dispatch`] once per frame to deliver
//! notifications.
//!
//! Notification rules:
//! - every newly observed target is reported on the next dispatch;
//! - afterwards a target is reported only when its "meets threshold" state
//!   flips;
//! - targets without bounds are not measured until bounds arrive.

use super::{
    ObserverOptions, ScrollViewport, VisibilityCallback, VisibilityEntry, VisibilityHost,
    VisibilityObserver,
};
use glance_ui_graphics::Rect;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

struct Observation {
    target: TargetId,
    /// Last reported state; `None` until the initial notification.
    last_reported: Option<bool>,
}

struct ObserverRecord {
    options: ObserverOptions,
    callback: Rc<RefCell<VisibilityCallback>>,
    observations: SmallVec<[Observation; 1]>,
}

struct TrackerState {
    viewport: ScrollViewport,
    targets: FxHashMap<TargetId, Option<Rect>>,
    observers: FxHashMap<ObserverId, ObserverRecord>,
    next_target: u64,
    next_observer: u64,
}

type PendingNotification = (
    ObserverId,
    Rc<RefCell<VisibilityCallback>>,
    SmallVec<[VisibilityEntry; 1]>,
);

impl TrackerState {
    fn measure(&self, options: &ObserverOptions, bounds: Rect) -> VisibilityEntry {
        let root = self.viewport.visible_rect().outset(options.root_margin);
        let Some(overlap) = bounds.intersect(&root) else {
            return VisibilityEntry::hidden();
        };
        let area = bounds.area();
        let ratio = if area > 0.0 {
            (overlap.area() / area).min(1.0)
        } else {
            1.0
        };
        VisibilityEntry {
            is_intersecting: options.threshold.is_met_by(ratio, true),
            intersection_ratio: ratio,
        }
    }

    fn collect_pending(&mut self) -> Vec<PendingNotification> {
        let mut ids: Vec<ObserverId> = self.observers.keys().copied().collect();
        ids.sort_unstable();

        let mut pending = Vec::new();
        for id in ids {
            let Some(record) = self.observers.get(&id) else {
                continue;
            };
            let mut entries: SmallVec<[VisibilityEntry; 1]> = SmallVec::new();
            let mut updates: SmallVec<[(usize, bool); 1]> = SmallVec::new();
            for (index, observation) in record.observations.iter().enumerate() {
                let Some(Some(bounds)) = self.targets.get(&observation.target) else {
                    continue;
                };
                let entry = self.measure(&record.options, *bounds);
                if observation.last_reported != Some(entry.is_intersecting) {
                    entries.push(entry);
                    updates.push((index, entry.is_intersecting));
                }
            }
            if entries.is_empty() {
                continue;
            }
            if let Some(record) = self.observers.get_mut(&id) {
                for (index, reported) in updates {
                    record.observations[index].last_reported = Some(reported);
                }
                pending.push((id, Rc::clone(&record.callback), entries));
            }
        }
        pending
    }
}

/// Shared handle to a software visibility tracker.
#[derive(Clone)]
pub struct VisibilityTracker {
    state: Rc<RefCell<TrackerState>>,
}

impl VisibilityTracker {
    pub fn new(viewport: ScrollViewport) -> Self {
        Self {
            state: Rc::new(RefCell::new(TrackerState {
                viewport,
                targets: FxHashMap::default(),
                observers: FxHashMap::default(),
                next_target: 0,
                next_observer: 0,
            })),
        }
    }

    pub fn viewport(&self) -> ScrollViewport {
        self.state.borrow().viewport
    }

    pub fn update_viewport(&self, f: impl FnOnce(&mut ScrollViewport)) {
        f(&mut self.state.borrow_mut().viewport);
    }

    pub fn scroll_by(&self, dx: f32, dy: f32) {
        self.update_viewport(|viewport| viewport.scroll_by(dx, dy));
    }

    /// Allocates a target. Bounds may be supplied later by layout.
    pub fn register_target(&self, bounds: Option<Rect>) -> TargetId {
        let mut state = self.state.borrow_mut();
        let id = TargetId(state.next_target);
        state.next_target += 1;
        state.targets.insert(id, bounds);
        id
    }

    pub fn set_target_bounds(&self, target: TargetId, bounds: Rect) {
        let mut state = self.state.borrow_mut();
        match state.targets.get_mut(&target) {
            Some(slot) => *slot = Some(bounds),
            None => log::warn!("bounds reported for unknown target {target:?}"),
        }
    }

    pub fn target_bounds(&self, target: TargetId) -> Option<Rect> {
        self.state.borrow().targets.get(&target).copied().flatten()
    }

    /// Removes a target and every observation of it.
    pub fn remove_target(&self, target: TargetId) {
        let mut state = self.state.borrow_mut();
        state.targets.remove(&target);
        for record in state.observers.values_mut() {
            record
                .observations
                .retain(|observation| observation.target != target);
        }
    }

    pub fn add_observer(&self, options: ObserverOptions, callback: VisibilityCallback) -> ObserverId {
        let mut state = self.state.borrow_mut();
        let id = ObserverId(state.next_observer);
        state.next_observer += 1;
        state.observers.insert(
            id,
            ObserverRecord {
                options,
                callback: Rc::new(RefCell::new(callback)),
                observations: SmallVec::new(),
            },
        );
        log::trace!("observer {id:?} added with {options:?}");
        id
    }

    pub fn observe(&self, observer: ObserverId, target: TargetId) {
        let mut state = self.state.borrow_mut();
        let Some(record) = state.observers.get_mut(&observer) else {
            log::warn!("observe called on disconnected observer {observer:?}");
            return;
        };
        if record
            .observations
            .iter()
            .any(|observation| observation.target == target)
        {
            return;
        }
        record.observations.push(Observation {
            target,
            last_reported: None,
        });
    }

    pub fn unobserve(&self, observer: ObserverId, target: TargetId) {
        if let Some(record) = self.state.borrow_mut().observers.get_mut(&observer) {
            record
                .observations
                .retain(|observation| observation.target != target);
        }
    }

    pub fn disconnect(&self, observer: ObserverId) {
        if self.state.borrow_mut().observers.remove(&observer).is_some() {
            log::trace!("observer {observer:?} disconnected");
        }
    }

    pub fn is_connected(&self, observer: ObserverId) -> bool {
        self.state.borrow().observers.contains_key(&observer)
    }

    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    /// Measures every observation and delivers pending notifications.
    ///
    /// Callbacks run outside the tracker's borrow, so they may disconnect
    /// observers or scroll. Observers disconnected during this dispatch are
    /// skipped. Returns the number of callbacks invoked.
    ///
    /// A callback may call `dispatch` again. Entries for an observer whose
    /// callback is still running are dropped by the nested dispatch.
    pub fn dispatch(&self) -> usize {
        let pending = self.state.borrow_mut().collect_pending();
        let mut delivered = 0;
        for (id, callback, entries) in pending {
            if !self.is_connected(id) {
                continue;
            }
            let Ok(mut callback) = callback.try_borrow_mut() else {
                log::warn!("dropping nested delivery to {id:?}, its callback is running");
                continue;
            };
            log::trace!("delivering {} entries to {id:?}", entries.len());
            (callback)(&entries);
            delivered += 1;
        }
        delivered
    }
}

impl fmt::Debug for VisibilityTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("VisibilityTracker")
            .field("viewport", &state.viewport)
            .field("targets", &state.targets.len())
            .field("observers", &state.observers.len())
            .finish()
    }
}

/// [`VisibilityHost`] backed by a [`VisibilityTracker`].
#[derive(Clone, Debug)]
pub struct HeadlessVisibilityHost {
    tracker: VisibilityTracker,
}

impl HeadlessVisibilityHost {
    pub fn new(tracker: VisibilityTracker) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &VisibilityTracker {
        &self.tracker
    }
}

impl VisibilityHost for HeadlessVisibilityHost {
    type Target = TargetId;
    type Observer = HeadlessObserver;

    fn supports_observation(&self) -> bool {
        true
    }

    fn create_observer(
        &self,
        options: &ObserverOptions,
        callback: VisibilityCallback,
    ) -> Option<HeadlessObserver> {
        let id = self.tracker.add_observer(*options, callback);
        Some(HeadlessObserver {
            tracker: self.tracker.clone(),
            id,
        })
    }
}

#[derive(Debug)]
pub struct HeadlessObserver {
    tracker: VisibilityTracker,
    id: ObserverId,
}

impl HeadlessObserver {
    pub fn id(&self) -> ObserverId {
        self.id
    }
}

impl VisibilityObserver for HeadlessObserver {
    type Target = TargetId;

    fn observe(&self, target: &TargetId) {
        self.tracker.observe(self.id, *target);
    }

    fn disconnect(&self) {
        self.tracker.disconnect(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_ui_graphics::{EdgeInsets, Size};
    use std::cell::Cell;

    fn recording_callback() -> (VisibilityCallback, Rc<RefCell<Vec<VisibilityEntry>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let callback: VisibilityCallback = Box::new(move |entries: &[VisibilityEntry]| {
            sink.borrow_mut().extend_from_slice(entries);
        });
        (callback, log)
    }

    fn tracker_300_high() -> VisibilityTracker {
        VisibilityTracker::new(ScrollViewport::new(Size::new(200.0, 300.0)))
    }

    #[test]
    fn initial_observation_is_always_reported() {
        let tracker = tracker_300_high();
        let target = tracker.register_target(Some(Rect::new(0.0, 1000.0, 200.0, 100.0)));
        let (callback, log) = recording_callback();
        let observer = tracker.add_observer(ObserverOptions::new(), callback);
        tracker.observe(observer, target);

        assert_eq!(tracker.dispatch(), 1);
        assert_eq!(log.borrow().as_slice(), &[VisibilityEntry::hidden()]);
        assert_eq!(tracker.dispatch(), 0, "no change, no notification");
    }

    #[test]
    fn nested_dispatch_skips_the_running_callback() {
        let tracker = tracker_300_high();
        let target = tracker.register_target(Some(Rect::new(0.0, 300.0, 200.0, 100.0)));
        let calls = Rc::new(Cell::new(0));
        let nested = Rc::new(Cell::new(usize::MAX));
        let callback: VisibilityCallback = {
            let tracker = tracker.clone();
            let calls = Rc::clone(&calls);
            let nested = Rc::clone(&nested);
            Box::new(move |_: &[VisibilityEntry]| {
                calls.set(calls.get() + 1);
                if calls.get() == 1 {
                    tracker.scroll_by(0.0, 100.0);
                    nested.set(tracker.dispatch());
                }
            })
        };
        let observer = tracker.add_observer(ObserverOptions::new(), callback);
        tracker.observe(observer, target);

        assert_eq!(tracker.dispatch(), 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(nested.get(), 0);
        tracker.disconnect(observer);
    }

    #[test]
    fn threshold_crossing_is_reported_once() {
        let tracker = tracker_300_high();
        let target = tracker.register_target(Some(Rect::new(0.0, 300.0, 200.0, 100.0)));
        let (callback, log) = recording_callback();
        let observer = tracker.add_observer(ObserverOptions::new().threshold(0.5), callback);
        tracker.observe(observer, target);
        tracker.dispatch();

        tracker.scroll_by(0.0, 40.0);
        tracker.dispatch();
        assert_eq!(log.borrow().len(), 1, "40% visible is below threshold");

        tracker.scroll_by(0.0, 20.0);
        tracker.dispatch();
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert!(log[1].is_intersecting);
        assert!((log[1].intersection_ratio - 0.6).abs() < 1e-5);
    }

    #[test]
    fn root_margin_reports_targets_near_the_viewport() {
        let tracker = tracker_300_high();
        let target = tracker.register_target(Some(Rect::new(0.0, 400.0, 200.0, 100.0)));
        let (callback, log) = recording_callback();
        let options = ObserverOptions::new().root_margin(EdgeInsets::vertical(250.0));
        let observer = tracker.add_observer(options, callback);
        tracker.observe(observer, target);
        tracker.dispatch();

        assert!(log.borrow()[0].is_intersecting);
    }

    #[test]
    fn zero_threshold_counts_edge_contact() {
        let tracker = tracker_300_high();
        let target = tracker.register_target(Some(Rect::new(0.0, 300.0, 200.0, 100.0)));
        let (callback, log) = recording_callback();
        let observer = tracker.add_observer(ObserverOptions::new().threshold(0.0), callback);
        tracker.observe(observer, target);
        tracker.dispatch();

        let entry = log.borrow()[0];
        assert!(entry.is_intersecting);
        assert_eq!(entry.intersection_ratio, 0.0);
    }

    #[test]
    fn targets_without_bounds_wait_for_layout() {
        let tracker = tracker_300_high();
        let target = tracker.register_target(None);
        let (callback, log) = recording_callback();
        let observer = tracker.add_observer(ObserverOptions::new(), callback);
        tracker.observe(observer, target);

        assert_eq!(tracker.dispatch(), 0);
        tracker.set_target_bounds(target, Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(tracker.dispatch(), 1);
        assert!(log.borrow()[0].is_intersecting);
    }

    #[test]
    fn disconnect_inside_callback_suppresses_later_deliveries() {
        let tracker = tracker_300_high();
        let target = tracker.register_target(Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

        let (second_callback, second_log) = recording_callback();
        let first_tracker = tracker.clone();
        let second_id = Rc::new(RefCell::new(None::<ObserverId>));
        let second_id_in_first = Rc::clone(&second_id);
        let first = tracker.add_observer(
            ObserverOptions::new(),
            Box::new(move |_entries: &[VisibilityEntry]| {
                if let Some(id) = *second_id_in_first.borrow() {
                    first_tracker.disconnect(id);
                }
            }),
        );
        let second = tracker.add_observer(ObserverOptions::new(), second_callback);
        *second_id.borrow_mut() = Some(second);
        tracker.observe(first, target);
        tracker.observe(second, target);

        assert_eq!(tracker.dispatch(), 1);
        assert!(second_log.borrow().is_empty());
        assert!(!tracker.is_connected(second));
    }

    #[test]
    fn headless_host_observer_disconnects_through_tracker() {
        let tracker = tracker_300_high();
        let host = HeadlessVisibilityHost::new(tracker.clone());
        let (callback, _log) = recording_callback();
        let observer = host
            .create_observer(&ObserverOptions::new(), callback)
            .expect("headless host always builds observers");
        assert_eq!(tracker.observer_count(), 1);
        observer.disconnect();
        assert_eq!(tracker.observer_count(), 0);
    }

    #[test]
    fn removing_target_drops_its_observations() {
        let tracker = tracker_300_high();
        let target = tracker.register_target(Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let (callback, log) = recording_callback();
        let observer = tracker.add_observer(ObserverOptions::new(), callback);
        tracker.observe(observer, target);
        tracker.remove_target(target);

        assert_eq!(tracker.dispatch(), 0);
        assert!(log.borrow().is_empty());
    }
}
