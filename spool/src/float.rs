//! The few `f64` operations the engine needs that `core` does not provide everywhere.

#[cfg(feature = "std")]
pub(crate) fn trunc(x: f64) -> f64 {
    x.trunc()
}

#[cfg(feature = "std")]
pub(crate) fn round(x: f64) -> f64 {
    x.round()
}

#[cfg(feature = "std")]
pub(crate) fn abs(x: f64) -> f64 {
    x.abs()
}

#[cfg(feature = "std")]
pub(crate) fn signum(x: f64) -> f64 {
    x.signum()
}

// Every f64 at or beyond 2^52 in magnitude is already integral.
#[cfg(not(feature = "std"))]
const INTEGRAL_FROM: f64 = 4_503_599_627_370_496.0;

#[cfg(not(feature = "std"))]
pub(crate) fn trunc(x: f64) -> f64 {
    if x.is_nan() || x >= INTEGRAL_FROM || x <= -INTEGRAL_FROM {
        return x;
    }
    x as i64 as f64
}

/// Rounds half away from zero.
#[cfg(not(feature = "std"))]
pub(crate) fn round(x: f64) -> f64 {
    let t = trunc(x);
    let frac = x - t;
    if frac >= 0.5 {
        t + 1.0
    } else if frac <= -0.5 {
        t - 1.0
    } else {
        t
    }
}

#[cfg(not(feature = "std"))]
pub(crate) fn abs(x: f64) -> f64 {
    if x.is_sign_negative() { -x } else { x }
}

#[cfg(not(feature = "std"))]
pub(crate) fn signum(x: f64) -> f64 {
    if x.is_nan() {
        x
    } else if x.is_sign_negative() {
        -1.0
    } else {
        1.0
    }
}
