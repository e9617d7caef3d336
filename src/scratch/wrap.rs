//! # Circular Axis Arithmetic
//!
//! Turntable axes report an absolute position that wraps from 65535 back to 0
//! as the platter turns. Consecutive samples are compared on that circle:
//! the delta is the shortest signed rotation between them.
//!
//! ```
//! use turntable_keys::scratch::wrap::circular_delta;
//!
//! assert_eq!(circular_delta(100, 110), 10);
//! assert_eq!(circular_delta(65530, 4), 10);   // wrapped forward
//! assert_eq!(circular_delta(4, 65530), -10);  // wrapped backward
//! ```

/// Absolute axis position on the circular domain [0, 65535].
pub type AxisSample = u16;

/// Number of distinct positions on the circle.
pub const AXIS_RANGE: i32 = 65536;

/// Half a revolution. Deltas are folded into (-HALF_RANGE, HALF_RANGE].
pub const HALF_RANGE: i32 = AXIS_RANGE / 2;

/// Computes the shortest signed rotation from `last` to `current`.
///
/// Positive values are clockwise, negative counter-clockwise. The result is
/// always in `(-32768, 32768]`, so two antipodal samples count as clockwise
/// and `(last + delta) mod 65536 == current` holds for every pair.
#[must_use]
pub fn circular_delta(last: AxisSample, current: AxisSample) -> i32 {
    let raw = i32::from(current) - i32::from(last);

    if raw > HALF_RANGE {
        raw - AXIS_RANGE
    } else if raw <= -HALF_RANGE {
        raw + AXIS_RANGE
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_shortest_rotation(a: AxisSample, b: AxisSample) {
        let delta = circular_delta(a, b);
        assert!(
            delta > -HALF_RANGE && delta <= HALF_RANGE,
            "delta {} out of range for ({}, {})",
            delta,
            a,
            b
        );
        assert_eq!(
            (i32::from(a) + delta).rem_euclid(AXIS_RANGE),
            i32::from(b),
            "({} + {}) should land on {}",
            a,
            delta,
            b
        );
    }

    #[test]
    fn test_no_motion() {
        assert_eq!(circular_delta(0, 0), 0);
        assert_eq!(circular_delta(32768, 32768), 0);
        assert_eq!(circular_delta(65535, 65535), 0);
    }

    #[test]
    fn test_plain_motion() {
        assert_eq!(circular_delta(1000, 1010), 10);
        assert_eq!(circular_delta(1010, 1000), -10);
    }

    #[test]
    fn test_wraparound_forward() {
        assert_eq!(circular_delta(65535, 0), 1);
        assert_eq!(circular_delta(65500, 100), 136);
    }

    #[test]
    fn test_wraparound_backward() {
        assert_eq!(circular_delta(0, 65535), -1);
        assert_eq!(circular_delta(100, 65500), -136);
    }

    #[test]
    fn test_antipodal_is_clockwise() {
        assert_eq!(circular_delta(0, 32768), 32768);
        assert_eq!(circular_delta(32768, 0), 32768);
        assert_eq!(circular_delta(65535, 32767), 32768);
    }

    #[test]
    fn test_just_under_half_turn() {
        assert_eq!(circular_delta(0, 32767), 32767);
        assert_eq!(circular_delta(0, 32769), -32767);
    }

    #[test]
    fn test_shortest_rotation_sweep() {
        // Every target against a spread of origins, including both ends.
        let origins = (0..=u16::MAX).step_by(251).chain([1, 32767, 32768, 32769, 65534, 65535]);
        for a in origins {
            for b in 0..=u16::MAX {
                assert_shortest_rotation(a, b);
            }
        }
    }
}
