// Example: a fade-and-slide timeline with a looped pulse, driven by a manual clock.
use spool::{
    Anitom, AnimationDirector, AnimationDirectorListener, Clock, Easing, ManualClock, Repeat,
};

const MS: i64 = 1_000_000;
const ALPHA: u32 = 0;
const SLIDE: u32 = 1;

struct Log;

impl AnimationDirectorListener for Log {
    fn on_anitom_started(&mut self, _d: &AnimationDirector, a: &Anitom) {
        println!("  channel {} starts at {}ms", a.id(), a.start_ns() / MS);
    }

    fn on_anitom_finished(&mut self, _d: &AnimationDirector, a: &Anitom) {
        println!("  channel {} reaches {}", a.id(), a.final_value());
    }

    fn on_director_finished(&mut self, _d: &AnimationDirector) {
        println!("  timeline finished");
    }
}

fn main() {
    let mut d = AnimationDirector::new();
    d.set_listener(Log);

    d.set_init_value(ALPHA, 0.0);
    d.add(ALPHA, 0)
        .set_duration(200 * MS)
        .set_final_value(1.0)
        .set_interpolator(Easing::EaseOut);
    // Pulse down and back up; the window is replayed twice more.
    d.add(ALPHA, 300 * MS)
        .set_duration(100 * MS)
        .set_final_value(0.6);
    d.append(ALPHA)
        .set_duration(100 * MS)
        .set_final_value(1.0);
    d.add_loop(300 * MS, 200 * MS, Repeat::Times(2));

    d.set_init_value(SLIDE, -40.0);
    d.add(SLIDE, 0)
        .set_duration(400 * MS)
        .set_final_value(0.0)
        .set_interpolator(|p: f64| 1.0 - (1.0 - p).powi(3));

    let clock = ManualClock::new(0);
    d.start(clock.now_ns());
    println!("total duration: {}ms", d.total_duration() / MS);
    while d.is_running() {
        let now = clock.advance(50 * MS);
        d.update(now);
        println!(
            "t={:>4}ms alpha={:.2} slide={:.1}",
            now / MS,
            d.value(ALPHA).unwrap_or_default(),
            d.value(SLIDE).unwrap_or_default()
        );
    }
}
