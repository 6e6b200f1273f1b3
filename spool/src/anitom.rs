use alloc::boxed::Box;

use crate::{Easing, Interpolator};

/// Key of an [`crate::AnimationDirector`] channel.
pub type ChannelId = u32;

/// One bounded-duration interpolation of a channel value.
///
/// Anitoms are created and owned by an [`crate::AnimationDirector`]. Their configuration is
/// public; their lifecycle flags change only inside the director's update pass.
pub struct Anitom {
    id: ChannelId,
    start_ns: i64,
    duration_ns: i64,
    init_value: f64,
    final_value: f64,
    interpolator: Box<dyn Interpolator>,
    started: bool,
    running: bool,
    finished: bool,
}

impl core::fmt::Debug for Anitom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Anitom")
            .field("id", &self.id)
            .field("start_ns", &self.start_ns)
            .field("duration_ns", &self.duration_ns)
            .field("init_value", &self.init_value)
            .field("final_value", &self.final_value)
            .field("started", &self.started)
            .field("running", &self.running)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl Anitom {
    pub(crate) fn new(id: ChannelId, start_ns: i64) -> Self {
        Self {
            id,
            start_ns,
            duration_ns: 0,
            init_value: 0.0,
            final_value: 0.0,
            interpolator: Box::new(Easing::Linear),
            started: false,
            running: false,
            finished: false,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn start_ns(&self) -> i64 {
        self.start_ns
    }

    pub fn duration_ns(&self) -> i64 {
        self.duration_ns
    }

    pub fn end_ns(&self) -> i64 {
        self.start_ns.saturating_add(self.duration_ns)
    }

    pub fn init_value(&self) -> f64 {
        self.init_value
    }

    pub fn final_value(&self) -> f64 {
        self.final_value
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_duration(&mut self, duration_ns: i64) -> &mut Self {
        self.duration_ns = duration_ns.max(0);
        self
    }

    pub fn set_final_value(&mut self, value: f64) -> &mut Self {
        self.final_value = value;
        self
    }

    pub fn set_interpolator(&mut self, interpolator: impl Interpolator + 'static) -> &mut Self {
        self.interpolator = Box::new(interpolator);
        self
    }

    /// The value at local time `t_ns`.
    ///
    /// `init_value` before the window, `final_value` from its end on, interpolated in between.
    pub fn cur_value(&self, t_ns: i64) -> f64 {
        if t_ns < self.start_ns {
            return self.init_value;
        }
        if t_ns >= self.end_ns() {
            return self.final_value;
        }
        let progress = (t_ns - self.start_ns) as f64 / self.duration_ns as f64;
        self.interpolator
            .interpolate(self.init_value, self.final_value, progress)
    }

    pub(crate) fn set_init_value(&mut self, value: f64) {
        self.init_value = value;
    }

    pub(crate) fn set_started(&mut self, started: bool) {
        self.started = started;
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub(crate) fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }
}
