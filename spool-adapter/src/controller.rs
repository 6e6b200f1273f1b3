use alloc::boxed::Box;

use spool::{ListHost, ListLayouter, ListSource, ScrollDirection, Scroller, ScrollerConfig, Size};

use crate::{ScrollInput, VelocityTracker};

/// Gesture tuning for [`ListController`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListControllerOptions {
    /// Releases slower than this (px/s) do not fling.
    pub fling_min_velocity: f64,
    /// Fling velocity per wheel notch, px/s.
    pub wheel_velocity: f64,
    pub smooth_scroll_duration_ns: i64,
    /// Fling touch releases with constant deceleration instead of the touch curve.
    pub use_inertia_for_touch: bool,
    pub velocity_window_ns: i64,
}

impl Default for ListControllerOptions {
    fn default() -> Self {
        Self {
            fling_min_velocity: 50.0,
            wheel_velocity: 1_200.0,
            smooth_scroll_duration_ns: 250_000_000,
            use_inertia_for_touch: false,
            velocity_window_ns: 100_000_000,
        }
    }
}

impl ListControllerOptions {
    pub fn with_fling_min_velocity(mut self, velocity: f64) -> Self {
        self.fling_min_velocity = velocity.max(-velocity);
        self
    }

    pub fn with_wheel_velocity(mut self, velocity: f64) -> Self {
        self.wheel_velocity = velocity;
        self
    }

    pub fn with_smooth_scroll_duration_ns(mut self, duration_ns: i64) -> Self {
        self.smooth_scroll_duration_ns = duration_ns.max(1);
        self
    }

    pub fn with_inertia_for_touch(mut self, enabled: bool) -> Self {
        self.use_inertia_for_touch = enabled;
        self
    }

    pub fn with_velocity_window_ns(mut self, window_ns: i64) -> Self {
        self.velocity_window_ns = window_ns.max(1);
        self
    }
}

/// A proportional scrollbar thumb along a track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollbarThumb {
    pub offset: i32,
    pub len: i32,
}

/// Drives a [`ListLayouter`] from scroll gestures and a [`Scroller`].
///
/// This type holds no UI objects. Adapters drive it by calling:
/// - `layout(width, height)` when the viewport changes size
/// - `on_input(..)` for wheel and touch events
/// - `tick(now_ns, display_freq)` once per frame while [`ListController::is_animating`]
///
/// Every pixel delta, whether from a drag, a fling frame or a layout correction, goes through
/// [`ListController::scroll_by`]: fill the revealed edge, shift the items, record the anchor.
pub struct ListController<V> {
    layouter: Box<dyn ListLayouter<V>>,
    scroller: Scroller,
    velocity: VelocityTracker,
    options: ListControllerOptions,
    last_touch_y: Option<i32>,
    // Exact destination of a running smooth scroll, applied once the motion ends.
    pending_target: Option<(usize, i32)>,
}

impl<V> core::fmt::Debug for ListController<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListController")
            .field("scroller", &self.scroller)
            .field("options", &self.options)
            .field("last_touch_y", &self.last_touch_y)
            .field("pending_target", &self.pending_target)
            .finish_non_exhaustive()
    }
}

impl<V> ListController<V> {
    pub fn new(layouter: impl ListLayouter<V> + 'static, options: ListControllerOptions) -> Self {
        Self::from_boxed(Box::new(layouter), options)
    }

    pub fn from_boxed(layouter: Box<dyn ListLayouter<V>>, options: ListControllerOptions) -> Self {
        Self {
            layouter,
            scroller: Scroller::default(),
            velocity: VelocityTracker::new(options.velocity_window_ns),
            options,
            last_touch_y: None,
            pending_target: None,
        }
    }

    pub fn with_scroller_config(mut self, config: ScrollerConfig) -> Self {
        self.scroller = Scroller::new(config);
        self
    }

    pub fn layouter(&self) -> &dyn ListLayouter<V> {
        self.layouter.as_ref()
    }

    pub fn layouter_mut(&mut self) -> &mut dyn ListLayouter<V> {
        self.layouter.as_mut()
    }

    pub fn into_layouter(self) -> Box<dyn ListLayouter<V>> {
        self.layouter
    }

    pub fn scroller(&self) -> &Scroller {
        &self.scroller
    }

    pub fn options(&self) -> &ListControllerOptions {
        &self.options
    }

    /// Binds the layouter to a new host and source, dropping any motion in flight.
    pub fn bind(&mut self, host: Box<dyn ListHost<V>>, source: Box<dyn ListSource<V>>) {
        self.cancel_animation();
        self.last_touch_y = None;
        self.layouter.bind(host, source);
    }

    pub fn is_animating(&self) -> bool {
        !self.scroller.is_finished()
    }

    pub fn cancel_animation(&mut self) {
        self.scroller.finish();
        self.pending_target = None;
    }

    pub fn can_scroll(&self, direction: ScrollDirection) -> bool {
        self.layouter.can_scroll(direction)
    }

    /// Measures and lays out the viewport from the current anchor, then settles any gap the new
    /// size exposed at the data's far edge.
    pub fn layout(&mut self, width: i32, height: i32) -> Size {
        if !self.layouter.is_available() {
            return Size::ZERO;
        }
        let size = self.layouter.measure_at_position(true, width, height);
        let settle = self.layouter.layout_at_position(true);
        if settle != 0 {
            sdebug!(settle, "ListController::layout: settling");
            self.scroll_by(settle);
        }
        size
    }

    /// Scrolls the content by `dy` pixels (negative reveals items below).
    ///
    /// Returns the applied delta, clamped at the data edges.
    pub fn scroll_by(&mut self, dy: i32) -> i32 {
        if dy == 0 || !self.layouter.is_available() {
            return 0;
        }
        let applied = if dy < 0 {
            self.layouter.fill_bottom_children(dy)
        } else {
            self.layouter.fill_top_children(dy)
        };
        if applied != 0 {
            self.layouter.offset_children(applied);
        }
        self.layouter.record_anchor();
        applied
    }

    /// Feeds one gesture event. Returns the pixels scrolled synchronously by it.
    pub fn on_input(&mut self, input: ScrollInput, now_ns: i64) -> i32 {
        match input {
            ScrollInput::Wheel { notches } => {
                self.pending_target = None;
                let velocity = notches * self.options.wheel_velocity;
                strace!(velocity, "ListController: wheel fling");
                self.scroller
                    .bezier(self.scroller.cur_scroll(), velocity, false);
                0
            }
            ScrollInput::TouchDown { y } => {
                self.cancel_animation();
                self.velocity.reset();
                self.velocity.record(now_ns, 0);
                self.last_touch_y = Some(y);
                0
            }
            ScrollInput::TouchMove { y } => self.drag_to(y, now_ns),
            ScrollInput::TouchUp { y } => {
                let applied = self.drag_to(y, now_ns);
                if self.last_touch_y.take().is_some() {
                    self.fling(now_ns);
                }
                applied
            }
        }
    }

    /// Advances the running motion to `now_ns` and scrolls by its delta.
    ///
    /// A motion clamped by the data edge is finished. Returns the applied delta.
    pub fn tick(&mut self, now_ns: i64, display_freq: u32) -> i32 {
        if !self.scroller.compute(now_ns, display_freq) {
            return 0;
        }
        let delta = self.scroller.delta();
        let applied = self.scroll_by(delta);
        if applied != delta {
            sdebug!(delta, applied, "ListController::tick: reached the data edge");
            self.scroller.finish();
        }
        if self.scroller.is_finished() {
            if let Some((pos, offset)) = self.pending_target.take() {
                self.scroll_to_position(pos, offset);
            }
        }
        applied
    }

    /// Jumps to `pos` with its top `offset` pixels above the viewport top.
    pub fn scroll_to_position(&mut self, pos: usize, offset: i32) {
        self.cancel_animation();
        let settle = self.layouter.scroll_to_position(pos, offset);
        if settle != 0 {
            self.scroll_by(settle);
        }
    }

    /// Animates towards `pos` over the configured duration.
    ///
    /// The distance is estimated from the materialized items; the exact position is applied
    /// when the motion ends. Returns `false` when there is nothing to animate.
    pub fn smooth_scroll_to_position(&mut self, pos: usize, offset: i32) -> bool {
        if !self.layouter.is_available() {
            return false;
        }
        let dy = self.layouter.smooth_scroll_to_position(pos, offset);
        if dy == 0 {
            return false;
        }
        self.scroller.finish();
        self.scroller.linear(
            self.scroller.cur_scroll(),
            dy,
            self.options.smooth_scroll_duration_ns,
        );
        self.pending_target = Some((pos, offset));
        true
    }

    /// The scrollbar thumb for a track of `track_len` pixels, or `None` when everything fits.
    pub fn scrollbar(&self, track_len: i32) -> Option<ScrollbarThumb> {
        let viewport = i64::from(self.layouter.host()?.content_bounds().height());
        let extent = self.layouter.compute_total_height();
        if track_len <= 0 || viewport <= 0 || extent.total <= viewport {
            return None;
        }
        let track = i64::from(track_len);
        let len = (track * viewport / extent.total).clamp(1, track);
        let range = extent.total - viewport;
        let offset = ((track - len) * extent.prev.clamp(0, range)) / range;
        Some(ScrollbarThumb {
            offset: offset as i32,
            len: len as i32,
        })
    }

    fn drag_to(&mut self, y: i32, now_ns: i64) -> i32 {
        let Some(last) = self.last_touch_y else {
            return 0;
        };
        let dy = y - last;
        self.last_touch_y = Some(y);
        self.velocity.record(now_ns, dy);
        self.scroll_by(dy)
    }

    fn fling(&mut self, now_ns: i64) {
        let velocity = self.velocity.velocity(now_ns);
        self.velocity.reset();
        let min = self.options.fling_min_velocity;
        if velocity > -min && velocity < min {
            return;
        }
        sdebug!(velocity, "ListController: touch fling");
        let start = self.scroller.cur_scroll();
        if self.options.use_inertia_for_touch {
            self.scroller.inertia(1.0, start, velocity);
        } else {
            self.scroller.bezier(start, velocity, true);
        }
    }
}
