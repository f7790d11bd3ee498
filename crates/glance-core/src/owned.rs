use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Single-threaded owner for values that live as long as a mounted widget.
///
/// This type stores `T` inside an `Rc<RefCell<...>>`, so platform callbacks can
/// hold a cheap clone of the handle while the widget keeps ownership of `T`.
pub struct Owned<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Clone for Owned<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Owned<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    /// Run `f` with an immutable reference to the stored value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let borrow = self.inner.borrow();
        f(&*borrow)
    }

    /// Run `f` with a mutable reference to the stored value.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut borrow = self.inner.borrow_mut();
        f(&mut *borrow)
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    /// Replace the stored value, returning the previous one.
    pub fn replace(&self, new_value: T) -> T {
        std::mem::replace(&mut *self.inner.borrow_mut(), new_value)
    }
}
