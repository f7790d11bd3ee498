//! Robot testing for scrolling galleries
//!
//! [`GalleryRobot`] lays lazy images out in a single column inside a headless
//! scroll container and drives the software visibility tracker, so tests can
//! scroll and check which images have loaded.
//!
//! # Example
//!
//! ```
//! use glance_testing::robot::GalleryRobot;
//! use glance_ui::LazyImageSpec;
//! use glance_ui_graphics::Size;
//!
//! let mut robot = GalleryRobot::column(Size::new(400.0, 300.0), 20, 200.0, |index| {
//!     LazyImageSpec::new().src(format!("photo-{index}.jpg"))
//! });
//! robot.wait_for_idle();
//! assert_eq!(robot.loaded_indices(), vec![0, 1]);
//! ```

use glance_foundation::{HeadlessVisibilityHost, ScrollViewport, TargetId, VisibilityTracker};
use glance_ui::{ImageNode, LazyImage, LazyImageSpec};
use glance_ui_graphics::{Point, Rect, Size};

struct GalleryItem {
    target: TargetId,
    bounds: Rect,
    image: Option<LazyImage<HeadlessVisibilityHost>>,
}

/// Headless vertical gallery of lazy images.
pub struct GalleryRobot {
    host: HeadlessVisibilityHost,
    items: Vec<GalleryItem>,
    content_height: f32,
}

impl GalleryRobot {
    pub fn new(viewport: Size) -> Self {
        let tracker = VisibilityTracker::new(
            ScrollViewport::new(viewport).with_content_size(Size::new(viewport.width, 0.0)),
        );
        Self {
            host: HeadlessVisibilityHost::new(tracker),
            items: Vec::new(),
            content_height: 0.0,
        }
    }

    /// A gallery of `count` rows of `row_height`, each spec built by `make_spec`.
    pub fn column(
        viewport: Size,
        count: usize,
        row_height: f32,
        make_spec: impl Fn(usize) -> LazyImageSpec,
    ) -> Self {
        let mut robot = Self::new(viewport);
        for index in 0..count {
            robot.push_image(row_height, make_spec(index));
        }
        robot
    }

    /// Appends an image row and mounts its widget. Returns the row index.
    pub fn push_image(&mut self, height: f32, spec: LazyImageSpec) -> usize {
        let width = self.tracker().viewport().size().width;
        let bounds = Rect::new(0.0, self.content_height, width, height);
        self.content_height += height;
        let content_height = self.content_height;
        self.tracker()
            .update_viewport(|viewport| viewport.set_content_size(Size::new(width, content_height)));

        let target = self.tracker().register_target(Some(bounds));
        let image = LazyImage::mount(self.host.clone(), target, spec);
        self.items.push(GalleryItem {
            target,
            bounds,
            image: Some(image),
        });
        self.items.len() - 1
    }

    pub fn tracker(&self) -> &VisibilityTracker {
        self.host.tracker()
    }

    pub fn scroll_by(&mut self, dy: f32) {
        self.tracker().scroll_by(0.0, dy);
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.tracker()
            .update_viewport(|viewport| viewport.scroll_to(Point::new(0.0, y)));
    }

    /// Scrolls so row `index` starts at the top of the viewport.
    pub fn scroll_to_item(&mut self, index: usize) {
        if let Some(item) = self.items.get(index) {
            let y = item.bounds.y;
            self.scroll_to(y);
        }
    }

    /// Pumps visibility notifications until none are pending.
    ///
    /// Returns the number of callbacks delivered.
    pub fn wait_for_idle(&mut self) -> usize {
        let mut delivered = 0;
        for _ in 0..10 {
            let round = self.tracker().dispatch();
            if round == 0 {
                break;
            }
            delivered += round;
        }
        delivered
    }

    pub fn image(&self, index: usize) -> Option<&LazyImage<HeadlessVisibilityHost>> {
        self.items.get(index).and_then(|item| item.image.as_ref())
    }

    pub fn image_mut(&mut self, index: usize) -> Option<&mut LazyImage<HeadlessVisibilityHost>> {
        self.items.get_mut(index).and_then(|item| item.image.as_mut())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Unmounts row `index`, leaving a gap in the column.
    pub fn unmount(&mut self, index: usize) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        let Some(image) = item.image.take() else {
            return false;
        };
        image.unmount();
        self.host.tracker().remove_target(item.target);
        true
    }

    /// Mounts a fresh widget on row `index` after it was unmounted.
    pub fn remount(&mut self, index: usize, spec: LazyImageSpec) -> bool {
        let tracker = self.host.tracker().clone();
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        if let Some(previous) = item.image.take() {
            previous.unmount();
            tracker.remove_target(item.target);
        }
        item.target = tracker.register_target(Some(item.bounds));
        item.image = Some(LazyImage::mount(self.host.clone(), item.target, spec));
        true
    }

    /// Rendered nodes of the mounted rows, `None` for unmounted ones.
    pub fn rendered(&self) -> Vec<Option<ImageNode>> {
        self.items
            .iter()
            .map(|item| item.image.as_ref().map(LazyImage::render))
            .collect()
    }

    pub fn rendered_sources(&self) -> Vec<String> {
        self.rendered()
            .into_iter()
            .flatten()
            .map(|node| node.src.as_str().to_owned())
            .collect()
    }

    pub fn loaded_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.image.as_ref().is_some_and(LazyImage::is_visible))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn active_observers(&self) -> usize {
        self.tracker().observer_count()
    }
}

impl Drop for GalleryRobot {
    fn drop(&mut self) {
        for item in &mut self.items {
            if let Some(image) = item.image.take() {
                image.unmount();
            }
        }
    }
}
