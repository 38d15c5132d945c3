//! Q8 fixed-point decay with sub-unit remainder carry.
//!
//! Velocities are integers per tick, the fractional part lost when rounding an
//! output is kept in a Q8 remainder (`256 == 1.0`) and fed back into the next
//! step. Over a whole decay the emitted deltas therefore add up to the ideal
//! distance instead of drifting with every rounding.

/// `1.0` in Q8
pub const Q8_ONE: i32 = 1 << 8;
/// `0.5` in Q8
pub const Q8_HALF: i32 = 1 << 7;

/// Convert a percentage of retained velocity into a Q8 decay factor.
///
/// `100` maps to `256`, which leaves the velocity unchanged.
pub const fn decay_factor_q8(percent: u8) -> i16 {
    ((percent as i32 * Q8_ONE) / 100) as i16
}

/// Run one decay step on a `(dx, dy)` velocity.
///
/// The remainders are read and updated in place. After the call
/// `|remainder| < 256` on both axes.
pub fn decay_step(in_dx: i16, in_dy: i16, decay_factor_q8: i16, rem_x: &mut i16, rem_y: &mut i16) -> (i16, i16) {
    let out_dx = decay_axis(in_dx, decay_factor_q8, rem_x);
    let out_dy = decay_axis(in_dy, decay_factor_q8, rem_y);
    (out_dx, out_dy)
}

fn decay_axis(input: i16, decay_factor_q8: i16, remainder: &mut i16) -> i16 {
    // Ideal movement in Q8, including what was left over from the last step
    let ideal = ((input as i64) << 8) + *remainder as i64;
    // `>>` on signed integers is an arithmetic shift, rounding towards negative infinity
    let decayed = (ideal * decay_factor_q8 as i64) >> 8;
    // Round half up to get the integer output
    let output = narrow((decayed + Q8_HALF as i64) >> 8);
    *remainder = narrow(decayed - ((output as i64) << 8));
    output
}

fn narrow(value: i64) -> i16 {
    value.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_factor_conversion() {
        assert_eq!(decay_factor_q8(0), 0);
        assert_eq!(decay_factor_q8(85), 217);
        assert_eq!(decay_factor_q8(90), 230);
        assert_eq!(decay_factor_q8(100), 256);
    }

    #[test]
    fn test_first_step_of_default_movement() {
        let (mut rem_x, mut rem_y) = (0, 0);
        let out = decay_step(20, 0, decay_factor_q8(90), &mut rem_x, &mut rem_y);
        assert_eq!(out, (18, 0));
        assert_eq!((rem_x, rem_y), (-8, 0));

        let out = decay_step(out.0, out.1, decay_factor_q8(90), &mut rem_x, &mut rem_y);
        assert_eq!(out, (16, 0));
        assert_eq!((rem_x, rem_y), (36, 0));

        let out = decay_step(out.0, out.1, decay_factor_q8(90), &mut rem_x, &mut rem_y);
        assert_eq!(out, (15, 0));
        assert_eq!((rem_x, rem_y), (-128, 0));
    }

    #[test]
    fn test_negative_velocity() {
        // ideal = -5120, decayed = floor(-5120 * 230 / 256) = -4600
        let (mut rem_x, mut rem_y) = (0, 0);
        let out = decay_step(0, -20, decay_factor_q8(90), &mut rem_x, &mut rem_y);
        assert_eq!(out, (0, -18));
        assert_eq!((rem_x, rem_y), (0, 8));
    }

    #[test]
    fn test_remainder_is_bounded() {
        let factors = [0, 1, 50, 85, 90, 99, 100].map(decay_factor_q8);
        for factor in factors {
            for input in (-600i16..=600).step_by(7) {
                for start_rem in [-255i16, -128, -1, 0, 1, 127, 255] {
                    let (mut rem_x, mut rem_y) = (start_rem, -start_rem);
                    decay_step(input, -input, factor, &mut rem_x, &mut rem_y);
                    assert!(rem_x.unsigned_abs() < 256, "rem_x {} for input {}", rem_x, input);
                    assert!(rem_y.unsigned_abs() < 256, "rem_y {} for input {}", rem_y, input);
                }
            }
        }
    }

    #[test]
    fn test_full_factor_is_identity() {
        let factor = decay_factor_q8(100);
        for start_rem in [-128i16, -37, 0, 64, 127] {
            let (mut rem_x, mut rem_y) = (start_rem, start_rem);
            let (mut vx, mut vy) = (42i16, -7i16);
            for _ in 0..1000 {
                (vx, vy) = decay_step(vx, vy, factor, &mut rem_x, &mut rem_y);
            }
            assert_eq!((vx, vy), (42, -7));
            assert_eq!((rem_x, rem_y), (start_rem, start_rem));
        }
    }

    #[test]
    fn test_decay_step_is_deterministic() {
        let factor = decay_factor_q8(85);
        let (mut a_x, mut a_y) = (13, -99);
        let (mut b_x, mut b_y) = (13, -99);
        let a = decay_step(-321, 77, factor, &mut a_x, &mut a_y);
        let b = decay_step(-321, 77, factor, &mut b_x, &mut b_y);
        assert_eq!(a, b);
        assert_eq!((a_x, a_y), (b_x, b_y));
    }

    #[test]
    fn test_extreme_inputs_do_not_overflow() {
        let (mut rem_x, mut rem_y) = (255, -255);
        let out = decay_step(i16::MAX, i16::MIN, decay_factor_q8(100), &mut rem_x, &mut rem_y);
        assert_eq!(out, (i16::MAX, i16::MIN));
        // Saturated outputs leave a full remainder behind, still below one unit
        assert_eq!((rem_x, rem_y), (255, -255));
    }
}
