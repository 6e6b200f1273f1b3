use crate::*;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use spool::{LinearListLayouter, ListHost, ListItem, ListSource, Rect, ScrollDirection, Size};

const MS: i64 = 1_000_000;
const FRAME_NS: i64 = 16_666_667;

struct FixedHost {
    bounds: Rc<Cell<Rect>>,
    item_height: i32,
}

impl ListHost<u32> for FixedHost {
    fn measure_item(&mut self, _item: &mut ListItem<u32>, max_width: i32) -> Size {
        Size::new(max_width, self.item_height)
    }

    fn layout_item(&mut self, _item: &mut ListItem<u32>, _bounds: Rect) {}

    fn add_view_at(&mut self, _pos: Option<usize>, _item: &mut ListItem<u32>) {}

    fn remove_view(&mut self, _item: &mut ListItem<u32>) {}

    fn content_bounds(&self) -> Rect {
        self.bounds.get()
    }
}

struct CountSource {
    count: usize,
    next_view: u32,
}

impl ListSource<u32> for CountSource {
    fn create_item(&mut self, _data_pos: usize) -> ListItem<u32> {
        self.next_view += 1;
        ListItem::new(self.next_view)
    }

    fn bind_data(&mut self, _item: &mut ListItem<u32>, _data_pos: usize) {}

    fn data_count(&self) -> usize {
        self.count
    }
}

/// A laid-out 500x500 list of `count` items, 50px each.
fn controller(count: usize, options: ListControllerOptions) -> (ListController<u32>, Rc<Cell<Rect>>) {
    let bounds = Rc::new(Cell::new(Rect::from_size(0, 0, 500, 500)));
    let mut c = ListController::new(LinearListLayouter::<u32>::new(), options);
    c.bind(
        Box::new(FixedHost {
            bounds: Rc::clone(&bounds),
            item_height: 50,
        }),
        Box::new(CountSource {
            count,
            next_view: 0,
        }),
    );
    c.layout(500, 500);
    (c, bounds)
}

fn first_visible(c: &ListController<u32>) -> Option<usize> {
    c.layouter().first_visible_position()
}

/// Ticks until the motion ends; returns the summed applied delta.
fn run_to_end(c: &mut ListController<u32>, mut now: i64, max_frames: usize) -> i32 {
    let mut total = 0;
    for _ in 0..max_frames {
        if !c.is_animating() {
            break;
        }
        now += FRAME_NS;
        total += c.tick(now, 60);
    }
    assert!(!c.is_animating(), "motion did not end within {max_frames} frames");
    total
}

fn quick_upward_swipe(c: &mut ListController<u32>) {
    c.on_input(ScrollInput::TouchDown { y: 400 }, 0);
    assert_eq!(c.on_input(ScrollInput::TouchMove { y: 300 }, 10 * MS), -100);
    assert_eq!(c.on_input(ScrollInput::TouchMove { y: 200 }, 20 * MS), -100);
    c.on_input(ScrollInput::TouchUp { y: 200 }, 20 * MS);
}

#[test]
fn velocity_tracker_averages_over_the_window() {
    let mut t = VelocityTracker::new(100 * MS);
    assert_eq!(t.velocity(0), 0.0);

    t.record(0, 0);
    t.record(10 * MS, 30);
    t.record(20 * MS, 30);
    assert!((t.velocity(20 * MS) - 3_000.0).abs() < 1e-6);

    // Samples older than the window no longer count.
    assert_eq!(t.velocity(200 * MS), 0.0);
}

#[test]
fn velocity_tracker_ignores_a_single_sample() {
    let mut t = VelocityTracker::new(100 * MS);
    t.record(5 * MS, 40);
    assert_eq!(t.velocity(5 * MS), 0.0);
    t.reset();
    assert_eq!(t.velocity(5 * MS), 0.0);
}

#[test]
fn unbound_controller_is_inert() {
    let mut c = ListController::new(LinearListLayouter::<u32>::new(), ListControllerOptions::default());
    assert_eq!(c.layout(100, 100), Size::ZERO);
    assert_eq!(c.scroll_by(-10), 0);
    assert_eq!(c.tick(0, 60), 0);
    assert!(!c.smooth_scroll_to_position(3, 0));
    assert_eq!(c.scrollbar(100), None);
}

#[test]
fn layout_materializes_the_first_viewport() {
    let (c, _) = controller(100, ListControllerOptions::default());
    assert_eq!(c.layouter().materialized_positions(), (0..10).collect::<Vec<_>>());
    assert!(!c.can_scroll(ScrollDirection::Top));
    assert!(c.can_scroll(ScrollDirection::Bottom));
}

#[test]
fn drag_scrolls_and_records_the_anchor() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    c.on_input(ScrollInput::TouchDown { y: 300 }, 0);
    assert_eq!(c.on_input(ScrollInput::TouchMove { y: 200 }, 10 * MS), -100);
    assert_eq!(first_visible(&c), Some(2));
    assert_eq!(c.layouter().anchor().position, 2);
    assert_eq!(c.layouter().anchor().offset, 0);
}

#[test]
fn drag_past_the_top_is_clamped() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    c.on_input(ScrollInput::TouchDown { y: 100 }, 0);
    assert_eq!(c.on_input(ScrollInput::TouchMove { y: 200 }, 10 * MS), 0);
    assert_eq!(first_visible(&c), Some(0));
}

#[test]
fn move_without_touch_down_is_ignored() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    assert_eq!(c.on_input(ScrollInput::TouchMove { y: 0 }, 0), 0);
    assert_eq!(c.on_input(ScrollInput::TouchUp { y: 0 }, 0), 0);
    assert!(!c.is_animating());
}

#[test]
fn touch_fling_stops_at_the_data_edge() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    quick_upward_swipe(&mut c);
    assert!(c.is_animating());
    assert!((c.scroller().cur_velocity() + 10_000.0).abs() < 1e-3);

    let mut now = 20 * MS;
    let mut last = first_visible(&c);
    for _ in 0..1_000 {
        if !c.is_animating() {
            break;
        }
        now += FRAME_NS;
        assert!(c.tick(now, 60) <= 0);
        let cur = first_visible(&c);
        assert!(cur >= last);
        last = cur;
    }
    assert!(!c.is_animating());
    assert!(!c.can_scroll(ScrollDirection::Bottom));
    assert_eq!(c.layouter().columns().items_bottom(), 500);
}

#[test]
fn inertia_fling_travels_the_kinematic_distance() {
    let options = ListControllerOptions::default().with_inertia_for_touch(true);
    let (mut c, _) = controller(1_000, options);
    quick_upward_swipe(&mut c);

    // v0 = -10000 px/s against 4000 px/s²: v0² / 2a = 12500px.
    let total = run_to_end(&mut c, 20 * MS, 1_000);
    assert!((-12_501..=-12_499).contains(&total), "travelled {total}");
}

#[test]
fn slow_release_does_not_fling() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    c.on_input(ScrollInput::TouchDown { y: 300 }, 0);
    c.on_input(ScrollInput::TouchMove { y: 290 }, 10 * MS);
    c.on_input(ScrollInput::TouchUp { y: 290 }, 500 * MS);
    assert!(!c.is_animating());
}

#[test]
fn touch_down_stops_a_fling() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    quick_upward_swipe(&mut c);
    c.tick(20 * MS + FRAME_NS, 60);
    assert!(c.is_animating());

    c.on_input(ScrollInput::TouchDown { y: 250 }, 40 * MS);
    assert!(!c.is_animating());
    assert_eq!(c.tick(60 * MS, 60), 0);
}

#[test]
fn wheel_notch_scrolls_a_short_distance() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    assert_eq!(c.on_input(ScrollInput::Wheel { notches: -1.0 }, 0), 0);
    assert!(c.is_animating());

    let total = run_to_end(&mut c, 0, 100);
    assert!(total < -40 && total > -200, "travelled {total}");
}

#[test]
fn repeated_wheel_notches_accumulate() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    c.on_input(ScrollInput::Wheel { notches: -1.0 }, 0);
    c.on_input(ScrollInput::Wheel { notches: -1.0 }, 0);
    assert_eq!(c.scroller().cur_velocity(), -2_400.0);

    c.on_input(ScrollInput::Wheel { notches: 1.0 }, 0);
    assert_eq!(c.scroller().cur_velocity(), 1_200.0);
}

#[test]
fn scroll_to_position_settles_at_the_end() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    c.scroll_to_position(98, 0);
    assert_eq!(first_visible(&c), Some(90));
    assert_eq!(c.layouter().columns().items_bottom(), 500);
    assert!(!c.can_scroll(ScrollDirection::Bottom));
}

#[test]
fn smooth_scroll_lands_exactly_on_the_target() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    assert!(c.smooth_scroll_to_position(50, 0));
    assert!(c.is_animating());

    let total = run_to_end(&mut c, 0, 100);
    assert!(total < 0);
    assert_eq!(first_visible(&c), Some(50));
    let top = c.layouter().columns().column(0).front().map(ListItem::outer_top);
    assert_eq!(top, Some(0));
}

#[test]
fn smooth_scroll_to_the_current_position_is_a_no_op() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    assert!(!c.smooth_scroll_to_position(0, 0));
    assert!(!c.is_animating());
}

#[test]
fn growing_viewport_settles_the_bottom_gap() {
    let (mut c, bounds) = controller(100, ListControllerOptions::default());
    c.scroll_to_position(90, 0);
    assert_eq!(first_visible(&c), Some(90));

    bounds.set(Rect::from_size(0, 0, 500, 700));
    c.layout(500, 700);
    assert_eq!(first_visible(&c), Some(86));
    assert_eq!(c.layouter().columns().items_bottom(), 700);
}

#[test]
fn scrollbar_thumb_tracks_the_estimate() {
    let (mut c, _) = controller(100, ListControllerOptions::default());
    assert_eq!(c.scrollbar(100), Some(ScrollbarThumb { offset: 0, len: 10 }));

    assert_eq!(c.scroll_by(-2_250), -2_250);
    assert_eq!(c.scrollbar(100), Some(ScrollbarThumb { offset: 45, len: 10 }));
}

#[test]
fn scrollbar_is_hidden_when_everything_fits() {
    let (c, _) = controller(5, ListControllerOptions::default());
    assert_eq!(c.scrollbar(100), None);
}
