use super::VisibilityObserver;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

struct HandleInner<O> {
    observer: RefCell<Option<O>>,
    released: Cell<bool>,
}

/// Owned, one-shot observation handle.
///
/// The handle is created before its observer so the observer's callback can
/// capture a [`WeakObservationHandle`] to itself. [`ObservationHandle::release`]
/// disconnects the observer exactly once no matter how often it is called, and
/// dropping the handle does not disconnect anything on its own.
pub struct ObservationHandle<O> {
    inner: Rc<HandleInner<O>>,
}

impl<O> Clone for ObservationHandle<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<O: VisibilityObserver> ObservationHandle<O> {
    /// A handle with no observer attached yet.
    pub fn pending() -> Self {
        Self {
            inner: Rc::new(HandleInner {
                observer: RefCell::new(None),
                released: Cell::new(false),
            }),
        }
    }

    /// Stores `observer` and starts observing `target`.
    ///
    /// A handle released before attachment drops the observer unobserved.
    pub fn attach(&self, observer: O, target: &O::Target) {
        if self.inner.released.get() {
            log::debug!("observation released before attach, skipping observe");
            return;
        }
        *self.inner.observer.borrow_mut() = Some(observer);
        // The callback may fire synchronously and release through a shared borrow.
        if let Some(observer) = self.inner.observer.borrow().as_ref() {
            observer.observe(target);
        }
    }

    /// Disconnects the observer. Returns `false` if it was already released.
    pub fn release(&self) -> bool {
        if self.inner.released.replace(true) {
            return false;
        }
        if let Some(observer) = self.inner.observer.borrow().as_ref() {
            observer.disconnect();
        }
        true
    }

    pub fn is_released(&self) -> bool {
        self.inner.released.get()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.observer.borrow().is_some()
    }

    pub fn downgrade(&self) -> WeakObservationHandle<O> {
        WeakObservationHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<O> fmt::Debug for ObservationHandle<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservationHandle")
            .field("attached", &self.inner.observer.borrow().is_some())
            .field("released", &self.inner.released.get())
            .finish()
    }
}

/// Non-owning reference held by observer callbacks, breaking the
/// handle -> observer -> callback -> handle cycle.
pub struct WeakObservationHandle<O> {
    inner: Weak<HandleInner<O>>,
}

impl<O> Clone for WeakObservationHandle<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<O: VisibilityObserver> WeakObservationHandle<O> {
    pub fn upgrade(&self) -> Option<ObservationHandle<O>> {
        self.inner.upgrade().map(|inner| ObservationHandle { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingObserver {
        observed: Cell<u32>,
        disconnected: Rc<Cell<u32>>,
    }

    impl VisibilityObserver for CountingObserver {
        type Target = ();

        fn observe(&self, _target: &()) {
            self.observed.set(self.observed.get() + 1);
        }

        fn disconnect(&self) {
            self.disconnected.set(self.disconnected.get() + 1);
        }
    }

    #[test]
    fn release_disconnects_once() {
        let disconnected = Rc::new(Cell::new(0));
        let handle = ObservationHandle::pending();
        handle.attach(
            CountingObserver {
                disconnected: Rc::clone(&disconnected),
                ..Default::default()
            },
            &(),
        );

        assert!(handle.release());
        assert!(!handle.release());
        assert!(!handle.clone().release());
        assert_eq!(disconnected.get(), 1);
    }

    #[test]
    fn release_before_attach_never_observes() {
        let disconnected = Rc::new(Cell::new(0));
        let handle: ObservationHandle<CountingObserver> = ObservationHandle::pending();
        handle.release();
        handle.attach(
            CountingObserver {
                disconnected: Rc::clone(&disconnected),
                ..Default::default()
            },
            &(),
        );
        assert!(!handle.is_attached());
        assert_eq!(disconnected.get(), 0);
    }

    #[test]
    fn weak_handle_dies_with_owner() {
        let handle: ObservationHandle<CountingObserver> = ObservationHandle::pending();
        let weak = handle.downgrade();
        assert!(weak.upgrade().is_some());
        drop(handle);
        assert!(weak.upgrade().is_none());
    }
}
