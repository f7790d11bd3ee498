//! Core runtime primitives for Glance widgets.
//!
//! Everything here is single-threaded: widgets and their platform callbacks run
//! on the UI event loop and share state through `Rc`.

mod effect;
pub mod hash;
mod owned;
mod state;

pub use effect::{DisposableEffectResult, DisposableEffectState};
pub use hash::{hash_key, Key};
pub use owned::Owned;
pub use state::{MutableState, StateSubscription};
