//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Piecewise-linear interpolation of `value` over the breakpoints `xp` with
/// values `fp`, clamped at both ends.
///
/// `xp` must be monotonically increasing and the same length as `fp`. Values
/// below `xp[0]` return `fp[0]`, values above the last breakpoint return the
/// last value. Clamping at the ends is relied upon by the tuning tables and
/// friction terms, do not change it.
pub fn interp<T>(value: T, xp: &[T], fp: &[T]) -> T
where
    T: Float
{
    debug_assert!(xp.len() == fp.len());
    debug_assert!(!xp.is_empty());

    if value <= xp[0] {
        return fp[0];
    }
    if value >= xp[xp.len() - 1] {
        return fp[fp.len() - 1];
    }

    // Find the segment containing the value and map it between the
    // surrounding breakpoints
    for i in 0..(xp.len() - 1) {
        if value <= xp[i + 1] {
            return lin_map((xp[i], xp[i + 1]), (fp[i], fp[i + 1]), value);
        }
    }

    fp[fp.len() - 1]
}

/// Limit a value to the range [min, max].
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}
