//! Output-stage gain and pan.

use std::f32::consts::FRAC_PI_4;

/*
Equal-Power Pan
===============

Pan positions a mono voice between two speakers, -1.0 hard left, +1.0 hard
right. Splitting linearly (left = 1 - p, right = p) dips by 3 dB in the
middle because perceived loudness follows power, not amplitude. The
equal-power law keeps left^2 + right^2 = 1 everywhere:

    angle = (pan + 1) * pi / 4        0 .. pi/2
    left  = cos(angle)
    right = sin(angle)

    pan    left    right
    -1.0   1.000   0.000
     0.0   0.707   0.707
    +1.0   0.000   1.000

The oscillator never pans. It produces one mono sample; the graph node that
owns the stereo buffers spreads it with `pan_in_place` (one voice) or mixes
it in with `pan_into` (several voices summed into the same pair).
*/

/// Equal-power (left, right) gains for `pan` in [-1.0, 1.0].
#[inline]
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let angle = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
    (angle.cos(), angle.sin())
}

/// Spread the mono signal held in `left` across both channels at `pan`.
/// `right` is overwritten.
#[inline]
pub fn pan_in_place(left: &mut [f32], right: &mut [f32], pan: f32) {
    debug_assert_eq!(left.len(), right.len());

    let (gl, gr) = pan_gains(pan);
    for (l, r) in left.iter_mut().zip(right.iter_mut()) {
        *r = *l * gr;
        *l *= gl;
    }
}

/// Mix a mono buffer, scaled by `level`, into left/right at `pan`.
#[inline]
pub fn pan_into(mono: &[f32], pan: f32, level: f32, left: &mut [f32], right: &mut [f32]) {
    debug_assert_eq!(mono.len(), left.len());
    debug_assert_eq!(mono.len(), right.len());

    let (gl, gr) = pan_gains(pan);
    let (gl, gr) = (gl * level, gr * level);
    for ((&m, l), r) in mono.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
        *l += m * gl;
        *r += m * gr;
    }
}
