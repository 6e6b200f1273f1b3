use alloc::collections::VecDeque;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

#[derive(Clone, Copy, Debug)]
struct Sample {
    t_ns: i64,
    dy: i32,
}

/// Estimates drag velocity from the movement samples of the last `window_ns`.
///
/// The oldest sample in the window is the reference point; the velocity is the distance moved
/// after it divided by the time spanned. A finger that rests longer than the window before it
/// lifts therefore reports zero.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    window_ns: i64,
    samples: VecDeque<Sample>,
}

impl VelocityTracker {
    pub fn new(window_ns: i64) -> Self {
        if window_ns <= 0 {
            swarn!(window_ns, "VelocityTracker::new: non-positive window, using 1ns");
        }
        Self {
            window_ns: window_ns.max(1),
            samples: VecDeque::new(),
        }
    }

    pub fn window_ns(&self) -> i64 {
        self.window_ns
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Records a movement of `dy` pixels observed at `t_ns`.
    pub fn record(&mut self, t_ns: i64, dy: i32) {
        self.samples.push_back(Sample { t_ns, dy });
        self.prune(t_ns);
    }

    /// Velocity in px/s as of `now_ns`.
    pub fn velocity(&mut self, now_ns: i64) -> f64 {
        self.prune(now_ns);
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return 0.0;
        };
        let elapsed = last.t_ns - first.t_ns;
        if elapsed <= 0 {
            return 0.0;
        }
        let distance: i64 = self.samples.iter().skip(1).map(|s| i64::from(s.dy)).sum();
        distance as f64 * NANOS_PER_SECOND / elapsed as f64
    }

    fn prune(&mut self, now_ns: i64) {
        let horizon = now_ns.saturating_sub(self.window_ns);
        while self.samples.front().is_some_and(|s| s.t_ns < horizon) {
            self.samples.pop_front();
        }
    }
}
