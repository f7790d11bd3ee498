//! Observable widget state.
//!
//! [`MutableState`] is the single piece of mutable state a widget keeps per
//! mount. Writers call [`MutableState::set`]; renderers subscribe to changes
//! and receive the new value after the write has completed.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct StateInner<T> {
    value: RefCell<T>,
    listeners: RefCell<SmallVec<[(u64, Listener<T>); 2]>>,
    next_listener_id: Cell<u64>,
}

impl<T> StateInner<T> {
    fn remove_listener(&self, id: u64) {
        self.listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Shared, observable value owned by a mounted widget.
pub struct MutableState<T> {
    inner: Rc<StateInner<T>>,
}

impl<T> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableState")
            .field("value", &*self.inner.value.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> MutableState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(StateInner {
                value: RefCell::new(value),
                listeners: RefCell::new(SmallVec::new()),
                next_listener_id: Cell::new(0),
            }),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Stores `value` and notifies subscribers.
    ///
    /// Writing a value equal to the current one is a no-op and returns `false`.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.notify();
        true
    }

    /// Registers `listener` to run after every effective write.
    ///
    /// The listener stays registered until the returned subscription is
    /// cancelled or dropped.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> StateSubscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let weak: Weak<StateInner<T>> = Rc::downgrade(&self.inner);
        StateSubscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove_listener(id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self) {
        // Listeners may subscribe, unsubscribe or read the state re-entrantly.
        let listeners: SmallVec<[Listener<T>; 2]> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        let value = self.get();
        for listener in listeners {
            listener(&value);
        }
    }
}

/// Registration returned by [`MutableState::subscribe`].
pub struct StateSubscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl StateSubscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for StateSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

impl Drop for StateSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
