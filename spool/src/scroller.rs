//! A single-axis kinematic integrator for scroll motion.
//!
//! Three motion models are supported:
//! - linear: a timed traversal of a fixed distance (smooth scroll-to);
//! - inertia: constant deceleration until the velocity reaches zero (touch fling);
//! - bezier: velocity looked up from a preconfigured [`BezierCurve`] (wheel or touch fling).
//!
//! Time is monotonic nanoseconds supplied by the caller; the host clock must not go backward
//! between consecutive calls. Velocities are px/s. Positions are tracked as `f64` and read back
//! as whole pixels; sub-pixel motion accumulates until it amounts to a full pixel.

use crate::{BezierCurve, float};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Control points of a fling curve, normalized to the curve's duration and initial velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezierSpec {
    pub duration_s: f64,
    /// `(time fraction, velocity fraction)`.
    pub p1: (f64, f64),
    /// `(time fraction, velocity fraction)`.
    pub p2: (f64, f64),
}

impl BezierSpec {
    pub fn new(duration_s: f64, p1: (f64, f64), p2: (f64, f64)) -> Self {
        Self { duration_s, p1, p2 }
    }

    /// Builds the absolute curve for a fling starting at `base_velocity`.
    pub fn build(&self, base_velocity: f64) -> BezierCurve {
        let t = self.duration_s.max(0.0);
        BezierCurve::new(
            base_velocity,
            t,
            (self.p1.0 * t, self.p1.1 * base_velocity),
            (self.p2.0 * t, self.p2.1 * base_velocity),
        )
    }
}

/// Tunables for [`Scroller`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollerConfig {
    /// Velocity magnitude cap, px/s.
    pub max_velocity: f64,
    /// Inertia deceleration magnitude at `acc_scale == 1`, px/s².
    pub deceleration: f64,
    /// The velocity a bezier curve describes at scale 1, px/s.
    pub bezier_base_velocity: f64,
    pub touch_curve: BezierSpec,
    pub pointer_curve: BezierSpec,
    /// Frame rate assumed when a caller passes a display frequency of zero.
    pub default_display_freq: u32,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            max_velocity: 12_000.0,
            deceleration: 4_000.0,
            bezier_base_velocity: 2_000.0,
            touch_curve: BezierSpec::new(1.2, (0.1, 0.45), (0.3, 0.05)),
            pointer_curve: BezierSpec::new(0.4, (0.2, 0.5), (0.5, 0.1)),
            default_display_freq: 60,
        }
    }
}

impl ScrollerConfig {
    pub fn with_max_velocity(mut self, max_velocity: f64) -> Self {
        self.max_velocity = float::abs(max_velocity);
        self
    }

    pub fn with_deceleration(mut self, deceleration: f64) -> Self {
        self.deceleration = float::abs(deceleration);
        self
    }

    pub fn with_bezier_base_velocity(mut self, velocity: f64) -> Self {
        self.bezier_base_velocity = float::abs(velocity);
        self
    }

    pub fn with_touch_curve(mut self, curve: BezierSpec) -> Self {
        self.touch_curve = curve;
        self
    }

    pub fn with_pointer_curve(mut self, curve: BezierSpec) -> Self {
        self.pointer_curve = curve;
        self
    }

    pub fn with_default_display_freq(mut self, hz: u32) -> Self {
        self.default_display_freq = hz.max(1);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollKind {
    Linear,
    Inertia,
    Bezier,
}

#[derive(Clone, Debug)]
pub struct Scroller {
    config: ScrollerConfig,
    touch_curve: BezierCurve,
    pointer_curve: BezierCurve,

    kind: ScrollKind,
    start: f64,
    cur: f64,
    prev: f64,
    init_velocity: f64,
    cur_velocity: f64,

    // Linear.
    distance: f64,
    duration_ns: i64,
    // Inertia: signed, opposite to the velocity.
    acceleration: f64,
    // Bezier.
    scale_factor: f64,
    use_touch_curve: bool,

    start_ns: i64,
    prev_ns: i64,
    preparing: bool,
    finished: bool,
    delta: i32,
}

impl Default for Scroller {
    fn default() -> Self {
        Self::new(ScrollerConfig::default())
    }
}

impl Scroller {
    pub fn new(config: ScrollerConfig) -> Self {
        let base = config.bezier_base_velocity;
        Self {
            touch_curve: config.touch_curve.build(base),
            pointer_curve: config.pointer_curve.build(base),
            config,
            kind: ScrollKind::Linear,
            start: 0.0,
            cur: 0.0,
            prev: 0.0,
            init_velocity: 0.0,
            cur_velocity: 0.0,
            distance: 0.0,
            duration_ns: 0,
            acceleration: 0.0,
            scale_factor: 0.0,
            use_touch_curve: false,
            start_ns: 0,
            prev_ns: 0,
            preparing: false,
            finished: true,
            delta: 0,
        }
    }

    pub fn config(&self) -> &ScrollerConfig {
        &self.config
    }

    pub fn kind(&self) -> ScrollKind {
        self.kind
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// A motion was requested but no `compute` has established its time origin yet.
    pub fn is_preparing(&self) -> bool {
        self.preparing
    }

    pub fn cur_velocity(&self) -> f64 {
        self.cur_velocity
    }

    /// Whole pixels moved by the last `compute`.
    pub fn delta(&self) -> i32 {
        self.delta
    }

    pub fn cur_scroll(&self) -> i32 {
        float::round(self.cur) as i32
    }

    /// Traverses `distance` pixels from `start` in `duration_ns`, at constant velocity.
    pub fn linear(&mut self, start: i32, distance: i32, duration_ns: i64) {
        if distance == 0 {
            return;
        }
        let duration_ns = duration_ns.max(1);
        self.kind = ScrollKind::Linear;
        self.distance = f64::from(distance);
        self.duration_ns = duration_ns;
        let velocity = self.distance * NANOS_PER_SECOND / duration_ns as f64;
        self.restart_at(start, velocity);
    }

    /// Flings from `start` at `velocity`, decelerating at `deceleration * acc_scale`.
    pub fn inertia(&mut self, acc_scale: f64, start: i32, velocity: f64) {
        if velocity == 0.0 {
            return;
        }
        let acc_scale = if acc_scale > 0.0 {
            acc_scale
        } else {
            swarn!(acc_scale, "Scroller::inertia: non-positive acceleration scale, using 1");
            1.0
        };
        let continuing = self.kind == ScrollKind::Inertia && self.same_direction(velocity);
        self.kind = ScrollKind::Inertia;
        if continuing {
            self.accumulate(velocity);
        } else {
            let velocity = self.clamp_velocity(velocity);
            self.restart_at(start, velocity);
        }
        self.acceleration = -float::signum(self.init_velocity) * self.config.deceleration * acc_scale;
    }

    /// Flings from `start` at `velocity` along the touch or pointer curve.
    pub fn bezier(&mut self, start: i32, velocity: f64, is_touch: bool) {
        if velocity == 0.0 {
            return;
        }
        let continuing = self.kind == ScrollKind::Bezier
            && self.use_touch_curve == is_touch
            && self.same_direction(velocity);
        self.kind = ScrollKind::Bezier;
        self.use_touch_curve = is_touch;
        if continuing {
            self.accumulate(velocity);
        } else {
            let velocity = self.clamp_velocity(velocity);
            self.restart_at(start, velocity);
        }
        self.scale_factor = if self.config.bezier_base_velocity > 0.0 {
            self.init_velocity / self.config.bezier_base_velocity
        } else {
            0.0
        };
    }

    /// Advances the motion to `now_ns`.
    ///
    /// Returns `false` when the scroller was already finished.
    pub fn compute(&mut self, now_ns: i64, display_freq: u32) -> bool {
        if self.finished {
            return false;
        }
        if self.preparing {
            let freq = if display_freq == 0 {
                swarn!("Scroller::compute: zero display frequency, using the default");
                self.config.default_display_freq.max(1)
            } else {
                display_freq
            };
            let frame_ns = float::round(NANOS_PER_SECOND / f64::from(freq)) as i64;
            self.start_ns = now_ns - frame_ns;
            self.prev_ns = self.start_ns;
            self.preparing = false;
        }

        match self.kind {
            ScrollKind::Linear => self.step_linear(now_ns),
            ScrollKind::Inertia => self.step_inertia(now_ns),
            ScrollKind::Bezier => self.step_bezier(now_ns),
        }
        self.prev_ns = now_ns;

        let d = float::trunc(self.cur - self.prev);
        if d != 0.0 {
            self.prev += d;
        }
        self.delta = d as i32;
        true
    }

    /// Stops immediately, whatever the motion.
    pub fn finish(&mut self) {
        self.cur_velocity = 0.0;
        self.preparing = false;
        self.finished = true;
        self.delta = 0;
    }

    fn same_direction(&self, velocity: f64) -> bool {
        !self.finished
            && self.cur_velocity != 0.0
            && float::signum(self.cur_velocity) == float::signum(velocity)
    }

    fn clamp_velocity(&self, velocity: f64) -> f64 {
        let max = self.config.max_velocity;
        velocity.clamp(-max, max)
    }

    fn restart_at(&mut self, start: i32, velocity: f64) {
        self.start = f64::from(start);
        self.cur = self.start;
        self.prev = self.start;
        self.init_velocity = velocity;
        self.cur_velocity = velocity;
        self.start_ns = 0;
        self.prev_ns = 0;
        self.preparing = true;
        self.finished = false;
        self.delta = 0;
    }

    /// Adds `velocity` to the motion in flight, continuing from the current position and time.
    fn accumulate(&mut self, velocity: f64) {
        let velocity = self.clamp_velocity(self.cur_velocity + velocity);
        strace!(velocity, "Scroller: accumulating fling");
        self.init_velocity = velocity;
        self.cur_velocity = velocity;
        if !self.preparing {
            self.start = self.cur;
            self.start_ns = self.prev_ns;
        }
    }

    fn step_linear(&mut self, now_ns: i64) {
        let elapsed = (now_ns - self.start_ns).max(0);
        let percent = (elapsed as f64 / self.duration_ns as f64).min(1.0);
        self.cur = self.start + self.distance * percent;
        if elapsed >= self.duration_ns {
            self.cur_velocity = 0.0;
            self.finished = true;
        }
    }

    fn step_inertia(&mut self, now_ns: i64) {
        let v0 = self.init_velocity;
        let a = self.acceleration;
        let mut t = (now_ns - self.start_ns).max(0) as f64 / NANOS_PER_SECOND;
        let stop = if a != 0.0 { -v0 / a } else { f64::INFINITY };
        if t >= stop {
            t = stop;
            self.finished = true;
        }
        self.cur = self.start + v0 * t + 0.5 * a * t * t;
        self.cur_velocity = if self.finished { 0.0 } else { v0 + a * t };
    }

    fn step_bezier(&mut self, now_ns: i64) {
        if self.cur_velocity == 0.0 {
            self.finished = true;
            return;
        }
        let dt = (now_ns - self.prev_ns).max(0) as f64 / NANOS_PER_SECOND;
        let elapsed = (now_ns - self.start_ns).max(0) as f64 / NANOS_PER_SECOND;
        let curve = if self.use_touch_curve {
            &self.touch_curve
        } else {
            &self.pointer_curve
        };
        match curve.cal(elapsed, self.scale_factor) {
            Some(v) => {
                self.cur += self.cur_velocity * dt;
                self.cur_velocity = v;
            }
            None => {
                self.cur_velocity = 0.0;
                self.finished = true;
            }
        }
    }
}
