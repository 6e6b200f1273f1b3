/// Maps linear progress in `[0, 1]` onto an eased progress.
///
/// Any `Fn(f64) -> f64` closure is an interpolator.
pub trait Interpolator {
    fn ease(&self, progress: f64) -> f64;

    fn interpolate(&self, from: f64, to: f64, progress: f64) -> f64 {
        from + (to - from) * self.ease(progress)
    }
}

impl<F> Interpolator for F
where
    F: Fn(f64) -> f64,
{
    fn ease(&self, progress: f64) -> f64 {
        self(progress)
    }
}

/// Built-in easing curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    SmoothStep,
    EaseInOutCubic,
}

impl Easing {
    pub fn sample(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - (u * u * u) / 2.0
                }
            }
        }
    }
}

impl Interpolator for Easing {
    fn ease(&self, progress: f64) -> f64 {
        self.sample(progress)
    }
}
