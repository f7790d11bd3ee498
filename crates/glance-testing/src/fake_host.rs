//! Scriptable visibility host.
//!
//! [`FakeVisibilityHost`] never measures anything. Tests decide when a
//! callback fires and what it reports, and afterwards inspect how many
//! observers were created, observed and disconnected.

use glance_core::Owned;
use glance_foundation::{
    ObserverOptions, VisibilityCallback, VisibilityEntry, VisibilityHost, VisibilityObserver,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Opaque element handle used with [`FakeVisibilityHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FakeElement(pub u32);

struct FakeObserverRecord {
    options: ObserverOptions,
    callback: Rc<RefCell<VisibilityCallback>>,
    observed: Vec<FakeElement>,
    disconnects: u32,
}

struct FakeHostState {
    supported: bool,
    refuse_observers: bool,
    observers: Vec<FakeObserverRecord>,
}

#[derive(Clone)]
pub struct FakeVisibilityHost {
    state: Owned<FakeHostState>,
}

impl FakeVisibilityHost {
    /// A host whose feature probe succeeds.
    pub fn new() -> Self {
        Self::with_state(true, false)
    }

    /// A host without visibility observation.
    pub fn unsupported() -> Self {
        Self::with_state(false, false)
    }

    /// A host that passes the probe but fails to construct observers.
    pub fn refusing() -> Self {
        Self::with_state(true, true)
    }

    fn with_state(supported: bool, refuse_observers: bool) -> Self {
        Self {
            state: Owned::new(FakeHostState {
                supported,
                refuse_observers,
                observers: Vec::new(),
            }),
        }
    }

    pub fn observers_created(&self) -> usize {
        self.state.with(|state| state.observers.len())
    }

    pub fn observe_calls(&self) -> usize {
        self.state
            .with(|state| state.observers.iter().map(|record| record.observed.len()).sum())
    }

    pub fn disconnect_calls(&self) -> u32 {
        self.state
            .with(|state| state.observers.iter().map(|record| record.disconnects).sum())
    }

    /// Observers that observe something and were never disconnected.
    pub fn active_observers(&self) -> usize {
        self.state.with(|state| {
            state
                .observers
                .iter()
                .filter(|record| !record.observed.is_empty() && record.disconnects == 0)
                .count()
        })
    }

    pub fn observed_elements(&self, observer: usize) -> Vec<FakeElement> {
        self.state.with(|state| {
            state
                .observers
                .get(observer)
                .map(|record| record.observed.clone())
                .unwrap_or_default()
        })
    }

    pub fn options(&self, observer: usize) -> Option<ObserverOptions> {
        self.state
            .with(|state| state.observers.get(observer).map(|record| record.options))
    }

    pub fn last_options(&self) -> Option<ObserverOptions> {
        self.state
            .with(|state| state.observers.last().map(|record| record.options))
    }

    /// Fires the callback of the most recently created observer, whether or
    /// not it has been disconnected, as a late platform callback would.
    pub fn trigger(&self, entries: &[VisibilityEntry]) -> bool {
        let last = self.observers_created().checked_sub(1);
        match last {
            Some(index) => self.trigger_observer(index, entries),
            None => false,
        }
    }

    pub fn trigger_intersecting(&self) -> bool {
        self.trigger(&[VisibilityEntry::intersecting(1.0)])
    }

    pub fn trigger_hidden(&self) -> bool {
        self.trigger(&[VisibilityEntry::hidden()])
    }

    pub fn trigger_observer(&self, observer: usize, entries: &[VisibilityEntry]) -> bool {
        let callback = self.state.with(|state| {
            state
                .observers
                .get(observer)
                .map(|record| Rc::clone(&record.callback))
        });
        match callback {
            Some(callback) => {
                (callback.borrow_mut())(entries);
                true
            }
            None => false,
        }
    }
}

impl Default for FakeVisibilityHost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FakeVisibilityHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.state.with(|state| {
            f.debug_struct("FakeVisibilityHost")
                .field("supported", &state.supported)
                .field("observers", &state.observers.len())
                .finish()
        })
    }
}

impl VisibilityHost for FakeVisibilityHost {
    type Target = FakeElement;
    type Observer = FakeObserver;

    fn supports_observation(&self) -> bool {
        self.state.with(|state| state.supported)
    }

    fn create_observer(
        &self,
        options: &ObserverOptions,
        callback: VisibilityCallback,
    ) -> Option<FakeObserver> {
        self.state.update(|state| {
            if state.refuse_observers {
                return None;
            }
            state.observers.push(FakeObserverRecord {
                options: *options,
                callback: Rc::new(RefCell::new(callback)),
                observed: Vec::new(),
                disconnects: 0,
            });
            Some(FakeObserver {
                state: self.state.clone(),
                index: state.observers.len() - 1,
            })
        })
    }
}

pub struct FakeObserver {
    state: Owned<FakeHostState>,
    index: usize,
}

impl fmt::Debug for FakeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeObserver").field("index", &self.index).finish()
    }
}

impl VisibilityObserver for FakeObserver {
    type Target = FakeElement;

    fn observe(&self, target: &FakeElement) {
        self.state.update(|state| {
            if let Some(record) = state.observers.get_mut(self.index) {
                record.observed.push(*target);
            }
        });
    }

    fn disconnect(&self) {
        self.state.update(|state| {
            if let Some(record) = state.observers.get_mut(self.index) {
                record.disconnects += 1;
            }
        });
    }
}
