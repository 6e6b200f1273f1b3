use alloc::vec::Vec;

use crate::float;

/// Number of intervals the curve is sampled into.
const SEGMENTS: usize = 100;

/// A point in (time, velocity) space. Time is in seconds, velocity in px/s.
pub type CurvePoint = (f64, f64);

/// A cubic Bézier velocity-over-time curve, sampled once into a lookup table.
///
/// The curve runs from `(0, v)` to `(t, 0)` through the control points `p1` and `p2`. The
/// control points' time coordinates must lie in `[0, t]` so sample times are non-decreasing.
#[derive(Clone, Debug, PartialEq)]
pub struct BezierCurve {
    samples: Vec<CurvePoint>,
}

impl BezierCurve {
    pub fn new(v: f64, t: f64, p1: CurvePoint, p2: CurvePoint) -> Self {
        let p0 = (0.0, v);
        let p3 = (t, 0.0);
        let samples = (0..=SEGMENTS)
            .map(|i| {
                let s = i as f64 / SEGMENTS as f64;
                let u = 1.0 - s;
                let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * s, 3.0 * u * s * s, s * s * s);
                (
                    b0 * p0.0 + b1 * p1.0 + b2 * p2.0 + b3 * p3.0,
                    b0 * p0.1 + b1 * p1.1 + b2 * p2.1 + b3 * p3.1,
                )
            })
            .collect();
        Self { samples }
    }

    pub fn samples(&self) -> &[CurvePoint] {
        &self.samples
    }

    /// Total time extent of the unscaled curve.
    pub fn duration(&self) -> f64 {
        self.samples.last().map_or(0.0, |p| p.0)
    }

    /// Velocity at time `t` on the curve stretched by `|scale|` in time and by `scale` in
    /// velocity.
    ///
    /// Returns `None` once `t` lies outside the scaled curve.
    pub fn cal(&self, t: f64, scale: f64) -> Option<f64> {
        let stretch = float::abs(scale);
        let idx = self.samples.partition_point(|p| p.0 * stretch < t);
        let hi = *self.samples.get(idx)?;
        if idx == 0 {
            // Only an exact hit on the first sample is inside the curve.
            return (t == hi.0 * stretch).then_some(hi.1 * scale);
        }
        let lo = self.samples[idx - 1];
        let (t0, t1) = (lo.0 * stretch, hi.0 * stretch);
        let v = if t1 > t0 {
            lo.1 + (hi.1 - lo.1) * (t - t0) / (t1 - t0)
        } else {
            hi.1
        };
        Some(v * scale)
    }
}
