//! Time-driven scalar animation channels.
//!
//! An [`AnimationDirector`] owns a set of channels. Each channel holds one current value and a
//! time-ordered run of [`Anitom`]s feeding it. The host pumps [`AnimationDirector::update`]
//! once per frame with a monotonic timestamp; consumers observe the changes through an
//! [`AnimationDirectorListener`] and re-read [`AnimationDirector::value`].
//!
//! Times are nanoseconds. Anitom and loop windows are expressed in the director's *local*
//! time: time since `start`, minus stopped intervals and rewound loop repetitions. The host
//! clock must be non-decreasing between consecutive calls.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::{Anitom, ChannelId};

/// Observer of director and anitom lifecycle events. Every method defaults to a no-op.
///
/// Callbacks receive the director in its post-transition state.
pub trait AnimationDirectorListener {
    fn on_director_started(&mut self, _director: &AnimationDirector) {}
    fn on_director_progress(&mut self, _director: &AnimationDirector) {}
    fn on_director_stopped(&mut self, _director: &AnimationDirector) {}
    fn on_director_finished(&mut self, _director: &AnimationDirector) {}
    fn on_director_reset(&mut self, _director: &AnimationDirector) {}

    fn on_anitom_started(&mut self, _director: &AnimationDirector, _anitom: &Anitom) {}
    fn on_anitom_progress(&mut self, _director: &AnimationDirector, _anitom: &Anitom) {}
    fn on_anitom_stopped(&mut self, _director: &AnimationDirector, _anitom: &Anitom) {}
    fn on_anitom_finished(&mut self, _director: &AnimationDirector, _anitom: &Anitom) {}
    fn on_anitom_reset(&mut self, _director: &AnimationDirector, _anitom: &Anitom) {}
}

/// How many times a loop window rewinds once entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Repeat {
    Times(u32),
    Infinite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LoopItem {
    start_ns: i64,
    duration_ns: i64,
    repeat: Repeat,
    remaining: u32,
}

impl LoopItem {
    fn end_ns(&self) -> i64 {
        self.start_ns.saturating_add(self.duration_ns)
    }

    fn contains(&self, t: i64) -> bool {
        self.start_ns <= t && t < self.end_ns()
    }

    fn is_exhausted(&self) -> bool {
        matches!(self.repeat, Repeat::Times(_)) && self.remaining == 0
    }

    /// Takes one repetition from the budget. Returns `false` when none is left.
    fn consume(&mut self) -> bool {
        match self.repeat {
            Repeat::Infinite => true,
            Repeat::Times(_) if self.remaining > 0 => {
                self.remaining -= 1;
                true
            }
            Repeat::Times(_) => false,
        }
    }

    fn refill(&mut self) {
        if let Repeat::Times(n) = self.repeat {
            self.remaining = n;
        }
    }
}

#[derive(Debug, Default)]
struct Channel {
    anitoms: Vec<Anitom>,
    init_value: f64,
    cur_value: f64,
}

impl Channel {
    /// The final value of the anitom that ends last.
    fn last_final_value(&self) -> Option<f64> {
        self.anitoms
            .iter()
            .max_by_key(|a| a.end_ns())
            .map(Anitom::final_value)
    }
}

#[derive(Clone, Copy, Debug)]
enum AnitomEvent {
    Started,
    Progress,
    Stopped,
    Finished,
    Reset,
}

#[derive(Default)]
pub struct AnimationDirector {
    channels: BTreeMap<ChannelId, Channel>,
    loops: Vec<LoopItem>,
    cur_loop: Option<usize>,
    start_ns: i64,
    elapsed_ns: i64,
    looped_ns: i64,
    started: bool,
    running: bool,
    finished: bool,
    repeat: bool,
    listener: Option<Box<dyn AnimationDirectorListener>>,
}

impl core::fmt::Debug for AnimationDirector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnimationDirector")
            .field("channels", &self.channels)
            .field("loops", &self.loops)
            .field("cur_loop", &self.cur_loop)
            .field("start_ns", &self.start_ns)
            .field("elapsed_ns", &self.elapsed_ns)
            .field("looped_ns", &self.looped_ns)
            .field("started", &self.started)
            .field("running", &self.running)
            .field("finished", &self.finished)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

impl AnimationDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_listener(&mut self, listener: impl AnimationDirectorListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn take_listener(&mut self) -> Option<Box<dyn AnimationDirectorListener>> {
        self.listener.take()
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

    pub fn is_repeat(&self) -> bool {
        self.repeat
    }

    /// Restart from the beginning instead of finishing once every anitom has ended.
    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    /// Adds an anitom to channel `id` starting at local time `start_ns`, creating the channel if
    /// needed. An anitom already starting at `start_ns` in that channel is replaced.
    pub fn add(&mut self, id: ChannelId, start_ns: i64) -> &mut Anitom {
        let anitoms = &mut self.channels.entry(id).or_default().anitoms;
        let index = match anitoms.binary_search_by_key(&start_ns, Anitom::start_ns) {
            Ok(index) => {
                anitoms[index] = Anitom::new(id, start_ns);
                index
            }
            Err(index) => {
                anitoms.insert(index, Anitom::new(id, start_ns));
                index
            }
        };
        &mut anitoms[index]
    }

    /// Adds an anitom to channel `id` starting where the channel's last anitom ends.
    pub fn append(&mut self, id: ChannelId) -> &mut Anitom {
        let start_ns = self
            .channels
            .get(&id)
            .and_then(|c| c.anitoms.iter().map(Anitom::end_ns).max())
            .unwrap_or(0);
        self.add(id, start_ns)
    }

    pub fn anitom(&self, id: ChannelId, start_ns: i64) -> Option<&Anitom> {
        let anitoms = &self.channels.get(&id)?.anitoms;
        let index = anitoms
            .binary_search_by_key(&start_ns, Anitom::start_ns)
            .ok()?;
        anitoms.get(index)
    }

    pub fn anitom_mut(&mut self, id: ChannelId, start_ns: i64) -> Option<&mut Anitom> {
        let anitoms = &mut self.channels.get_mut(&id)?.anitoms;
        let index = anitoms
            .binary_search_by_key(&start_ns, Anitom::start_ns)
            .ok()?;
        anitoms.get_mut(index)
    }

    pub fn remove_anitom(&mut self, id: ChannelId, start_ns: i64) -> Option<Anitom> {
        let anitoms = &mut self.channels.get_mut(&id)?.anitoms;
        let index = anitoms
            .binary_search_by_key(&start_ns, Anitom::start_ns)
            .ok()?;
        Some(anitoms.remove(index))
    }

    pub fn remove_channel(&mut self, id: ChannelId) -> bool {
        self.channels.remove(&id).is_some()
    }

    /// Drops every channel and loop.
    pub fn clear(&mut self) {
        self.channels.clear();
        self.loops.clear();
        self.cur_loop = None;
    }

    pub fn channel_ids(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.channels.keys().copied()
    }

    /// Sets the value channel `id` starts from, creating the channel if needed.
    pub fn set_init_value(&mut self, id: ChannelId, value: f64) {
        let channel = self.channels.entry(id).or_default();
        channel.init_value = value;
        if !self.started {
            channel.cur_value = value;
        }
    }

    /// The current value of channel `id`.
    pub fn value(&self, id: ChannelId) -> Option<f64> {
        self.channels.get(&id).map(|c| c.cur_value)
    }

    /// Registers a loop window `[start_ns, start_ns + duration_ns)` in local time.
    pub fn add_loop(&mut self, start_ns: i64, duration_ns: i64, repeat: Repeat) {
        if duration_ns <= 0 {
            swarn!(start_ns, duration_ns, "AnimationDirector::add_loop: empty window ignored");
            return;
        }
        let remaining = match repeat {
            Repeat::Times(n) => n,
            Repeat::Infinite => 0,
        };
        self.loops.push(LoopItem {
            start_ns,
            duration_ns,
            repeat,
            remaining,
        });
    }

    pub fn clear_loops(&mut self) {
        self.loops.clear();
        self.cur_loop = None;
    }

    /// The latest end time over all anitoms of all channels.
    pub fn total_duration(&self) -> i64 {
        self.channels
            .values()
            .flat_map(|c| c.anitoms.iter().map(Anitom::end_ns))
            .max()
            .unwrap_or(0)
    }

    /// Local time at `now_ns`.
    pub fn local_time(&self, now_ns: i64) -> i64 {
        if self.running {
            now_ns - self.start_ns - self.looped_ns
        } else {
            self.elapsed_ns
        }
    }

    /// Starts or resumes.
    ///
    /// Returns `false` without effect when already running, finished, or without channels.
    pub fn start(&mut self, now_ns: i64) -> bool {
        if self.running || self.finished || self.channels.is_empty() {
            return false;
        }
        if !self.started {
            for channel in self.channels.values_mut() {
                channel.cur_value = channel.init_value;
            }
            self.refill_loops();
            self.elapsed_ns = 0;
            self.started = true;
        }
        self.start_ns = now_ns - self.elapsed_ns;
        self.looped_ns = 0;
        self.running = true;
        sdebug!(now_ns, "AnimationDirector::start");
        self.notify(|l, d| l.on_director_started(d));
        true
    }

    /// Freezes progress; a later `start` resumes where this left off.
    pub fn stop(&mut self, now_ns: i64) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_ns = now_ns - self.start_ns - self.looped_ns;
        self.running = false;
        for (id, index) in self.anitom_keys() {
            let Some(anitom) = self.anitom_at_mut(id, index) else {
                continue;
            };
            if anitom.is_running() {
                anitom.set_running(false);
                self.notify_anitom(id, index, AnitomEvent::Stopped);
            }
        }
        self.notify(|l, d| l.on_director_stopped(d));
        true
    }

    /// Forces every anitom to its end and marks the director finished.
    pub fn finish(&mut self) -> bool {
        if !self.started || self.finished {
            return false;
        }
        for (id, index) in self.anitom_keys() {
            self.finish_anitom(id, index);
        }
        for channel in self.channels.values_mut() {
            if let Some(value) = channel.last_final_value() {
                channel.cur_value = value;
            }
        }
        self.running = false;
        self.finished = true;
        self.cur_loop = None;
        sdebug!("AnimationDirector::finish");
        self.notify(|l, d| l.on_director_finished(d));
        true
    }

    /// Returns to the pre-start state, restoring every channel's initial value.
    pub fn reset(&mut self) -> bool {
        if !self.started {
            return false;
        }
        self.started = false;
        self.running = false;
        self.finished = false;
        self.rewind();
        self.notify(|l, d| l.on_director_reset(d));
        self.reset_anitoms();
        true
    }

    /// Rewinds to local time 0 at `now_ns` and runs again.
    pub fn restart(&mut self, now_ns: i64) -> bool {
        if self.channels.is_empty() {
            return false;
        }
        self.rewind();
        self.reset_anitoms();
        self.start_ns = now_ns;
        self.started = true;
        self.running = true;
        self.finished = false;
        sdebug!(now_ns, "AnimationDirector::restart");
        self.notify(|l, d| l.on_director_started(d));
        true
    }

    /// Advances every channel to `now_ns`.
    ///
    /// Returns `false` when the director is not running.
    pub fn update(&mut self, now_ns: i64) -> bool {
        if !self.running {
            return false;
        }
        let local = self.advance_loops(now_ns - self.start_ns - self.looped_ns);

        for (id, index) in self.anitom_keys() {
            self.update_anitom(id, index, local);
        }
        self.notify(|l, d| l.on_director_progress(d));

        if self.cur_loop.is_none() && local >= self.total_duration() {
            if self.repeat {
                self.restart(now_ns);
            } else {
                self.finish();
            }
        }
        true
    }

    /// Applies loop rewinds to `local` and returns the adjusted local time.
    fn advance_loops(&mut self, mut local: i64) -> i64 {
        if let Some(index) = self.cur_loop {
            if let Some(item) = self.loops.get_mut(index) {
                if local >= item.end_ns() {
                    if item.consume() {
                        self.looped_ns += item.duration_ns;
                        local -= item.duration_ns;
                        strace!(index, local, "AnimationDirector: loop rewound");
                    } else {
                        self.cur_loop = None;
                    }
                }
            } else {
                self.cur_loop = None;
            }
        }
        if self.cur_loop.is_none() {
            // Every matching window is visited; the last one wins.
            let mut found = None;
            for (index, item) in self.loops.iter().enumerate() {
                if !item.is_exhausted() && item.contains(local) {
                    found = Some(index);
                }
            }
            self.cur_loop = found;
        }
        local
    }

    fn update_anitom(&mut self, id: ChannelId, index: usize, local: i64) {
        let Some(channel) = self.channels.get_mut(&id) else {
            return;
        };
        let cur_value = channel.cur_value;
        let Some(anitom) = channel.anitoms.get_mut(index) else {
            return;
        };

        if local >= anitom.end_ns() {
            if !anitom.is_finished() {
                anitom.set_started(true);
                anitom.set_running(false);
                anitom.set_finished(true);
                channel.cur_value = anitom.final_value();
                self.notify_anitom(id, index, AnitomEvent::Finished);
            }
            return;
        }
        if local < anitom.start_ns() {
            if anitom.is_started() {
                anitom.set_started(false);
                anitom.set_running(false);
                anitom.set_finished(false);
                self.notify_anitom(id, index, AnitomEvent::Reset);
            }
            return;
        }

        let unfinished = anitom.is_finished();
        let newly_started = !anitom.is_started();
        anitom.set_finished(false);
        if newly_started {
            // Chain from whatever the channel shows now.
            anitom.set_init_value(cur_value);
        }
        anitom.set_started(true);
        anitom.set_running(true);
        channel.cur_value = anitom.cur_value(local);

        if unfinished {
            self.notify_anitom(id, index, AnitomEvent::Reset);
        }
        if newly_started {
            self.notify_anitom(id, index, AnitomEvent::Started);
        }
        self.notify_anitom(id, index, AnitomEvent::Progress);
    }

    fn finish_anitom(&mut self, id: ChannelId, index: usize) {
        let Some(anitom) = self.anitom_at_mut(id, index) else {
            return;
        };
        if anitom.is_finished() {
            return;
        }
        anitom.set_started(true);
        anitom.set_running(false);
        anitom.set_finished(true);
        self.notify_anitom(id, index, AnitomEvent::Finished);
    }

    fn reset_anitoms(&mut self) {
        for (id, index) in self.anitom_keys() {
            let Some(anitom) = self.anitom_at_mut(id, index) else {
                continue;
            };
            let touched = anitom.is_started() || anitom.is_finished();
            anitom.set_started(false);
            anitom.set_running(false);
            anitom.set_finished(false);
            if touched {
                self.notify_anitom(id, index, AnitomEvent::Reset);
            }
        }
    }

    /// Clears timing and loop state and restores initial channel values.
    fn rewind(&mut self) {
        self.elapsed_ns = 0;
        self.looped_ns = 0;
        self.cur_loop = None;
        self.refill_loops();
        for channel in self.channels.values_mut() {
            channel.cur_value = channel.init_value;
        }
    }

    fn refill_loops(&mut self) {
        for item in &mut self.loops {
            item.refill();
        }
    }

    fn anitom_keys(&self) -> Vec<(ChannelId, usize)> {
        self.channels
            .iter()
            .flat_map(|(&id, c)| (0..c.anitoms.len()).map(move |index| (id, index)))
            .collect()
    }

    fn anitom_at_mut(&mut self, id: ChannelId, index: usize) -> Option<&mut Anitom> {
        self.channels.get_mut(&id)?.anitoms.get_mut(index)
    }

    fn notify(&mut self, f: impl FnOnce(&mut dyn AnimationDirectorListener, &Self)) {
        let Some(mut listener) = self.listener.take() else {
            return;
        };
        f(listener.as_mut(), self);
        self.listener = Some(listener);
    }

    fn notify_anitom(&mut self, id: ChannelId, index: usize, event: AnitomEvent) {
        self.notify(|l, d| {
            let Some(anitom) = d.channels.get(&id).and_then(|c| c.anitoms.get(index)) else {
                return;
            };
            match event {
                AnitomEvent::Started => l.on_anitom_started(d, anitom),
                AnitomEvent::Progress => l.on_anitom_progress(d, anitom),
                AnitomEvent::Stopped => l.on_anitom_stopped(d, anitom),
                AnitomEvent::Finished => l.on_anitom_finished(d, anitom),
                AnitomEvent::Reset => l.on_anitom_reset(d, anitom),
            }
        });
    }
}
