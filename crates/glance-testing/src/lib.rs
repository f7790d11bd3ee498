//! Testing utilities and harness for Glance

pub mod assertions;
pub mod fake_host;
pub mod robot;

pub use fake_host::{FakeElement, FakeObserver, FakeVisibilityHost};
pub use robot::GalleryRobot;
