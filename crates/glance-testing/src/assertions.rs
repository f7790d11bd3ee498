//! Assertion utilities for lazy image tests

use glance_ui::{ImageNode, DEFAULT_PLACEHOLDER};

/// Assert that a rendered node uses `expected` as its source.
pub fn assert_src(node: &ImageNode, expected: &str, msg: &str) {
    assert_eq!(
        node.src.as_str(),
        expected,
        "{}: expected src {:?}, got {:?}",
        msg,
        expected,
        node.src.as_str()
    );
}

/// Assert that a rendered node still shows the built-in placeholder.
pub fn assert_default_placeholder(node: &ImageNode, msg: &str) {
    assert_src(node, DEFAULT_PLACEHOLDER, msg);
}

/// Assert that a rendered node carries attribute `name` with `expected`.
pub fn assert_attribute(node: &ImageNode, name: &str, expected: &str, msg: &str) {
    match node.attribute(name) {
        Some(actual) => assert_eq!(
            actual, expected,
            "{}: attribute {} expected {:?}, got {:?}",
            msg, name, expected, actual
        ),
        None => panic!("{}: attribute {} missing from {:?}", msg, name, node),
    }
}

/// Assert that exactly `expected` rows have loaded, in order.
pub fn assert_loaded(loaded: &[usize], expected: &[usize], msg: &str) {
    assert_eq!(
        loaded, expected,
        "{}: expected rows {:?} loaded, got {:?}",
        msg, expected, loaded
    );
}

/// Assert that a collection has an expected count.
pub fn assert_count<T>(items: &[T], expected: usize, msg: &str) {
    assert_eq!(
        items.len(),
        expected,
        "{}: expected {} items, got {}",
        msg,
        expected,
        items.len()
    );
}
