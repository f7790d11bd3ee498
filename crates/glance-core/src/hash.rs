use std::hash::{Hash, Hasher};

/// Identity of an effect's inputs. Effects rerun when their key changes.
pub type Key = u64;

#[cfg(feature = "std-hash")]
pub mod default {
    pub use std::collections::hash_map::DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::new()
    }
}

#[cfg(not(feature = "std-hash"))]
pub mod default {
    // fast branch
    pub use rustc_hash::FxHasher as DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::default()
    }
}

/// Hashes an arbitrary set of effect inputs into a [`Key`].
pub fn hash_key<K: Hash + ?Sized>(keys: &K) -> Key {
    let mut hasher = default::new();
    keys.hash(&mut hasher);
    hasher.finish()
}
