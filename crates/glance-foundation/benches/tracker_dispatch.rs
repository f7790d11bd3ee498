use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glance_foundation::{ObserverOptions, ScrollViewport, VisibilityEntry, VisibilityTracker};
use glance_ui_graphics::{EdgeInsets, Rect, Size};

const ROWS: usize = 2_000;
const ROW_HEIGHT: f32 = 240.0;

fn gallery_tracker() -> VisibilityTracker {
    let viewport = ScrollViewport::new(Size::new(800.0, 600.0))
        .with_content_size(Size::new(800.0, ROWS as f32 * ROW_HEIGHT));
    let tracker = VisibilityTracker::new(viewport);
    let options = ObserverOptions::new().root_margin(EdgeInsets::vertical(200.0));
    for row in 0..ROWS {
        let bounds = Rect::new(0.0, row as f32 * ROW_HEIGHT, 800.0, ROW_HEIGHT);
        let target = tracker.register_target(Some(bounds));
        let observer = tracker.add_observer(
            options,
            Box::new(|entries: &[VisibilityEntry]| {
                black_box(entries);
            }),
        );
        tracker.observe(observer, target);
    }
    tracker.dispatch();
    tracker
}

fn bench_scroll_dispatch(c: &mut Criterion) {
    let tracker = gallery_tracker();
    c.bench_function("dispatch_after_scroll_2000_targets", |b| {
        b.iter(|| {
            tracker.scroll_by(0.0, ROW_HEIGHT);
            black_box(tracker.dispatch());
        });
    });
}

criterion_group!(benches, bench_scroll_dispatch);
criterion_main!(benches);
