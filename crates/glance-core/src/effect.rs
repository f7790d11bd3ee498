use crate::{hash_key, Key};
use std::fmt;
use std::hash::Hash;

/// Teardown produced by a disposable effect.
pub struct DisposableEffectResult {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl DisposableEffectResult {
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// An effect with nothing to tear down.
    pub fn none() -> Self {
        Self { dispose: None }
    }

    fn run(mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl fmt::Debug for DisposableEffectResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposableEffectResult")
            .field("has_dispose", &self.dispose.is_some())
            .finish()
    }
}

/// Keyed effect slot.
///
/// The effect runs on first use and again whenever its key changes; the
/// previous run is disposed before the next one starts. Owners are expected to
/// call [`DisposableEffectState::dispose_current`] on teardown.
#[derive(Default)]
pub struct DisposableEffectState {
    key: Option<Key>,
    current: Option<DisposableEffectResult>,
}

impl DisposableEffectState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_run(&self, key: Key) -> bool {
        match self.key {
            Some(current) => current != key,
            None => true,
        }
    }

    /// Runs `effect` if `keys` differ from the last run. Returns whether it ran.
    pub fn run_keyed<K: Hash + ?Sized>(
        &mut self,
        keys: &K,
        effect: impl FnOnce() -> DisposableEffectResult,
    ) -> bool {
        let key = hash_key(keys);
        if !self.should_run(key) {
            return false;
        }
        self.dispose_current();
        self.key = Some(key);
        self.current = Some(effect());
        true
    }

    /// Disposes the active run, if any, and forgets its key so the next
    /// `run_keyed` starts fresh.
    pub fn dispose_current(&mut self) {
        self.key = None;
        if let Some(current) = self.current.take() {
            current.run();
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

impl fmt::Debug for DisposableEffectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposableEffectState")
            .field("key", &self.key)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for DisposableEffectState {
    fn drop(&mut self) {
        self.dispose_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_effect(runs: &Rc<Cell<u32>>, disposals: &Rc<Cell<u32>>) -> DisposableEffectResult {
        runs.set(runs.get() + 1);
        let disposals = Rc::clone(disposals);
        DisposableEffectResult::new(move || disposals.set(disposals.get() + 1))
    }

    #[test]
    fn same_key_runs_once() {
        let runs = Rc::new(Cell::new(0));
        let disposals = Rc::new(Cell::new(0));
        let mut state = DisposableEffectState::new();

        assert!(state.run_keyed(&1u32, || counting_effect(&runs, &disposals)));
        assert!(!state.run_keyed(&1u32, || counting_effect(&runs, &disposals)));
        assert_eq!(runs.get(), 1);
        assert_eq!(disposals.get(), 0);
    }

    #[test]
    fn key_change_disposes_previous_run_first() {
        let runs = Rc::new(Cell::new(0));
        let disposals = Rc::new(Cell::new(0));
        let mut state = DisposableEffectState::new();

        state.run_keyed(&1u32, || counting_effect(&runs, &disposals));
        let disposals_seen = Rc::clone(&disposals);
        state.run_keyed(&2u32, || {
            assert_eq!(disposals_seen.get(), 1, "old run disposed before new one");
            DisposableEffectResult::none()
        });
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn drop_disposes_active_run() {
        let runs = Rc::new(Cell::new(0));
        let disposals = Rc::new(Cell::new(0));
        {
            let mut state = DisposableEffectState::new();
            state.run_keyed(&"mount", || counting_effect(&runs, &disposals));
        }
        assert_eq!(disposals.get(), 1);
    }

    #[test]
    fn explicit_dispose_is_not_repeated_on_drop() {
        let runs = Rc::new(Cell::new(0));
        let disposals = Rc::new(Cell::new(0));
        let mut state = DisposableEffectState::new();
        state.run_keyed(&0u8, || counting_effect(&runs, &disposals));
        state.dispose_current();
        assert!(!state.is_active());
        drop(state);
        assert_eq!(disposals.get(), 1);
    }
}
