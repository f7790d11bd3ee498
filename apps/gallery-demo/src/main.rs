use glance_core::StateSubscription;
use glance_foundation::{HeadlessVisibilityHost, ScrollViewport, TargetId, VisibilityTracker};
use glance_ui::prelude::*;
use glance_ui_graphics::{Rect, Size};
use std::cell::RefCell;
use std::rc::Rc;

const ROWS: usize = 30;
const ROW_HEIGHT: f32 = 240.0;
const VIEWPORT: Size = Size {
    width: 800.0,
    height: 600.0,
};
const SCROLL_STEP: f32 = 300.0;

struct Row {
    image: LazyImage<HeadlessVisibilityHost>,
    _source_change: StateSubscription,
}

fn init_logging() {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn mount_rows(host: &HeadlessVisibilityHost, loaded: &Rc<RefCell<Vec<usize>>>) -> Vec<Row> {
    let tracker = host.tracker();
    (0..ROWS)
        .map(|index| {
            let bounds = Rect::new(0.0, index as f32 * ROW_HEIGHT, VIEWPORT.width, ROW_HEIGHT);
            let target: TargetId = tracker.register_target(Some(bounds));
            let spec = LazyImageSpec::new()
                .src(format!("https://picsum.photos/seed/{index}/800/240"))
                .placeholder(ImageSource::vector_placeholder(800, 240, "#d0d4d9"))
                .alt(format!("Photo {index}"))
                .root_margin(EdgeInsets::vertical(ROW_HEIGHT / 2.0));
            let image = LazyImage::mount(host.clone(), target, spec);
            let loaded = Rc::clone(loaded);
            let source_change = image.on_source_change(move |node| {
                log::info!("row {index:>2} loaded {}", node.src);
                loaded.borrow_mut().push(index);
            });
            Row {
                image,
                _source_change: source_change,
            }
        })
        .collect()
}

fn main() {
    init_logging();

    println!("=== Glance Lazy Gallery ===");
    println!("{ROWS} rows of {ROW_HEIGHT}px in a {}x{} viewport", VIEWPORT.width, VIEWPORT.height);
    println!("Rows load once they come within half a row of the viewport.");
    println!();

    let content = Size::new(VIEWPORT.width, ROWS as f32 * ROW_HEIGHT);
    let tracker = VisibilityTracker::new(ScrollViewport::new(VIEWPORT).with_content_size(content));
    let host = HeadlessVisibilityHost::new(tracker.clone());
    let loaded = Rc::new(RefCell::new(Vec::new()));
    let rows = mount_rows(&host, &loaded);

    let mut frame = 0;
    loop {
        let delivered = tracker.dispatch();
        let offset = tracker.viewport().offset().y;
        log::debug!(
            "frame {frame}: offset {offset}, {delivered} callbacks, {} observers",
            tracker.observer_count()
        );

        let before = tracker.viewport().offset();
        tracker.scroll_by(0.0, SCROLL_STEP);
        if tracker.viewport().offset() == before {
            break;
        }
        frame += 1;
    }
    tracker.dispatch();

    let loaded_rows = loaded.borrow().len();
    println!();
    println!("Scrolled {frame} frames, {loaded_rows}/{ROWS} rows loaded");
    println!("Observers still connected: {}", tracker.observer_count());

    for row in rows {
        row.image.unmount();
    }
}
