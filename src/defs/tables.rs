//! 16.16 fixed point, binary angle measurement (BAM) and the fine tangent
//! table shared by the projection builder and the sky drawer.

use once_cell::sync::Lazy;
use std::f64::consts::TAU;

/// 16.16 signed fixed point.
pub type Fixed = i32;

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: Fixed = 1 << FRACBITS;
pub const FRACMASK: Fixed = FRACUNIT - 1;

/// Binary angle: the full `u32` range is one turn, wrapping is free.
pub type Angle = u32;

pub const ANG45: Angle = 0x2000_0000;
pub const ANG90: Angle = 0x4000_0000;
pub const ANG180: Angle = 0x8000_0000;

pub const FINEANGLES: usize = 8192;
pub const ANGLETOFINESHIFT: u32 = 19;
/// Fine angles covered by the horizontal field of view (90°).
pub const FIELDOFVIEW: usize = 2048;
/// Maps a BAM angle onto 1024 sky steps per turn (a 256-wide sky repeats 4×).
pub const ANGLETOSKYSHIFT: u32 = 22;

/// `tan` over `(-90°, 90°)` in `FINEANGLES / 2` steps, sampled at half-step
/// centres so neither end hits the asymptote.
pub static FINE_TANGENT: Lazy<Vec<Fixed>> = Lazy::new(|| {
    (0..FINEANGLES / 2)
        .map(|i| {
            let a = (i as f64 - (FINEANGLES / 4) as f64 + 0.5) * TAU / FINEANGLES as f64;
            (a.tan() * FRACUNIT as f64) as Fixed
        })
        .collect()
});

#[inline]
pub const fn int_to_fixed(i: i32) -> Fixed {
    i << FRACBITS
}

/// Arithmetic shift, i.e. rounds toward negative infinity.
#[inline]
pub const fn fixed_to_int(f: Fixed) -> i32 {
    f >> FRACBITS
}

#[inline]
pub fn float_to_fixed(f: f32) -> Fixed {
    (f * FRACUNIT as f32) as Fixed
}

#[inline]
pub fn fixed_to_float(f: Fixed) -> f32 {
    f as f32 / FRACUNIT as f32
}

#[inline]
pub const fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    ((a as i64 * b as i64) >> FRACBITS) as Fixed
}

/// Saturates instead of overflowing when the quotient does not fit.
pub const fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    if (a.unsigned_abs() >> 14) >= b.unsigned_abs() {
        if (a ^ b) < 0 { i32::MIN } else { i32::MAX }
    } else {
        (((a as i64) << FRACBITS) / b as i64) as Fixed
    }
}

/// Signed interpretation: angles above `ANG180` come out negative.
#[inline]
pub fn angle_to_radians(a: Angle) -> f32 {
    (a as i32) as f32 * (std::f32::consts::PI / ANG180 as f32)
}

pub fn radians_to_angle(r: f32) -> Angle {
    let turns = (r as f64).rem_euclid(TAU) / TAU;
    ((turns * 4_294_967_296.0) as u64) as Angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_round_trips_integers() {
        assert_eq!(fixed_to_int(int_to_fixed(-7)), -7);
        assert_eq!(fixed_mul(int_to_fixed(3), int_to_fixed(4)), int_to_fixed(12));
        assert_eq!(fixed_div(int_to_fixed(9), int_to_fixed(2)), int_to_fixed(9) / 2);
    }

    #[test]
    fn fixed_div_saturates() {
        assert_eq!(fixed_div(int_to_fixed(1000), 1), i32::MAX);
        assert_eq!(fixed_div(-int_to_fixed(1000), 1), i32::MIN);
    }

    #[test]
    fn fine_tangent_is_antisymmetric_and_hits_one_at_45() {
        let n = FINE_TANGENT.len();
        assert_eq!(n, FINEANGLES / 2);
        assert_eq!(FINE_TANGENT[0], -FINE_TANGENT[n - 1]);
        let at45 = fixed_to_float(FINE_TANGENT[FINEANGLES / 4 + FIELDOFVIEW / 2]);
        assert!((at45 - 1.0).abs() < 0.01);
    }

    #[test]
    fn angles_convert_both_ways() {
        assert!((angle_to_radians(ANG90) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!(angle_to_radians(ANG90.wrapping_neg()) < 0.0);
        assert_eq!(radians_to_angle(std::f32::consts::PI) >> 24, ANG180 >> 24);
    }
}
