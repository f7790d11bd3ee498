//! Scroll container viewport.
//!
//! Targets live in content coordinates. The viewport is the window of content
//! currently shown by the scroll container.

use glance_ui_graphics::{Point, Rect, Size};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollViewport {
    size: Size,
    offset: Point,
    /// Total scrollable extent; `None` leaves scrolling unbounded past the origin.
    content_size: Option<Size>,
}

impl ScrollViewport {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            offset: Point::ZERO,
            content_size: None,
        }
    }

    pub fn with_content_size(mut self, content_size: Size) -> Self {
        self.content_size = Some(content_size);
        self.offset = self.clamp(self.offset);
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn content_size(&self) -> Option<Size> {
        self.content_size
    }

    /// The currently visible region in content coordinates.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset, self.size)
    }

    pub fn scroll_to(&mut self, offset: Point) {
        self.offset = self.clamp(offset);
    }

    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        self.scroll_to(Point::new(self.offset.x + dx, self.offset.y + dy));
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.offset = self.clamp(self.offset);
    }

    pub fn set_content_size(&mut self, content_size: Size) {
        self.content_size = Some(content_size);
        self.offset = self.clamp(self.offset);
    }

    fn clamp(&self, offset: Point) -> Point {
        let (max_x, max_y) = match self.content_size {
            Some(content) => (
                (content.width - self.size.width).max(0.0),
                (content.height - self.size.height).max(0.0),
            ),
            None => (f32::INFINITY, f32::INFINITY),
        };
        Point::new(offset.x.clamp(0.0, max_x), offset.y.clamp(0.0, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_moves_visible_rect() {
        let mut viewport = ScrollViewport::new(Size::new(400.0, 300.0));
        viewport.scroll_by(0.0, 120.0);
        assert_eq!(viewport.visible_rect(), Rect::new(0.0, 120.0, 400.0, 300.0));
    }

    #[test]
    fn scrolling_is_clamped_to_content() {
        let mut viewport =
            ScrollViewport::new(Size::new(400.0, 300.0)).with_content_size(Size::new(400.0, 1000.0));
        viewport.scroll_by(0.0, 5000.0);
        assert_eq!(viewport.offset(), Point::new(0.0, 700.0));
        viewport.scroll_by(0.0, -9000.0);
        assert_eq!(viewport.offset(), Point::ZERO);
    }

    #[test]
    fn growing_viewport_pulls_offset_back() {
        let mut viewport =
            ScrollViewport::new(Size::new(100.0, 100.0)).with_content_size(Size::new(100.0, 500.0));
        viewport.scroll_to(Point::new(0.0, 400.0));
        viewport.resize(Size::new(100.0, 300.0));
        assert_eq!(viewport.offset().y, 200.0);
    }
}
