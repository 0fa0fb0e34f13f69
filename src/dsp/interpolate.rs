//! Fractional reads from a single-cycle frame.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::PI;

/*
Reading Between Samples
=======================

A wavetable frame stores one period of a waveform as N samples. The
oscillator's phase almost never lands exactly on one of them: at 440 Hz with a
2048-sample frame and a 48 kHz sample rate, each output sample advances the
read position by 18.77 frame samples. Interpolation answers "what value lives
at index 18.77?"

Vocabulary
----------

  index       Position inside the frame, in samples. Fractional.
  floor       The integer sample at or below the index.
  frac        index - floor, in [0, 1).
  kernel      The rule used to combine neighbouring samples into one value.
  cyclic      The frame is one period, so sample N is sample 0 again.
              Reads wrap around the ends instead of clamping.


Kernels
-------

NONE (nearest / truncating)
    samples[floor]
    Cheapest. Steps are audible as noise on slow sweeps.

LINEAR
    a + (b - a) * frac
    Two reads, one multiply. Rolls off the top octave slightly.

CUBIC (4-point Hermite)
    Uses floor-1, floor, floor+1, floor+2. Passes through the two middle
    points with slopes matched to their neighbours, so the first derivative
    is continuous. This is the default "high quality" kernel.

        c0 = y0
        c1 = (y1 - y-1) / 2
        c2 = y-1 - 5/2 y0 + 2 y1 - 1/2 y2
        c3 = (y2 - y-1) / 2 + 3/2 (y0 - y1)
        y  = ((c3 t + c2) t + c1) t + c0

SINC (8-tap windowed sinc)
    The ideal band-limited reconstruction is a sum of sinc pulses. We keep 8
    of them (floor-3 .. floor+4) and taper with a Blackman window so the
    truncation doesn't ring. Costs 8 sin() calls per read; use where
    aliasing matters more than CPU.


Interpolation identity
----------------------

Every kernel returns the stored sample exactly when the index is an integer.
Hermite gets this for free (t = 0 leaves only c0). The sinc sum only gets it
in exact arithmetic, so integer indices short-circuit to the stored value.
*/

/// Kernel used to resolve a fractional index inside a frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleInterpolation {
    None,
    Linear,
    #[default]
    Cubic,
    Sinc,
}

impl SampleInterpolation {
    pub const ALL: [SampleInterpolation; 4] = [Self::None, Self::Linear, Self::Cubic, Self::Sinc];

    /// Next kernel in [`Self::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

const SINC_TAPS: i32 = 8;
const SINC_HALF_WIDTH: f32 = (SINC_TAPS / 2) as f32;

/// Read `samples` at a fractional, cyclically wrapped `index`.
///
/// Returns 0.0 for an empty slice.
#[inline]
pub fn interpolate_sample(samples: &[f32], index: f32, mode: SampleInterpolation) -> f32 {
    let len = samples.len();
    if len == 0 {
        return 0.0;
    }

    let pos = index.rem_euclid(len as f32);
    let floor = pos.floor();
    let frac = pos - floor;
    // rem_euclid can round up to exactly `len` for tiny negative inputs
    let i0 = floor as usize % len;

    if frac == 0.0 {
        return samples[i0];
    }

    match mode {
        SampleInterpolation::None => samples[i0],
        SampleInterpolation::Linear => {
            let a = samples[i0];
            let b = samples[(i0 + 1) % len];
            a + (b - a) * frac
        }
        SampleInterpolation::Cubic => {
            let ym1 = samples[(i0 + len - 1) % len];
            let y0 = samples[i0];
            let y1 = samples[(i0 + 1) % len];
            let y2 = samples[(i0 + 2) % len];
            hermite(ym1, y0, y1, y2, frac)
        }
        SampleInterpolation::Sinc => windowed_sinc(samples, i0, frac),
    }
}

/// 4-point, 3rd-order Hermite through `y0` (t = 0) and `y1` (t = 1).
#[inline]
pub(crate) fn hermite(ym1: f32, y0: f32, y1: f32, y2: f32, t: f32) -> f32 {
    let c0 = y0;
    let c1 = 0.5 * (y1 - ym1);
    let c2 = ym1 - 2.5 * y0 + 2.0 * y1 - 0.5 * y2;
    let c3 = 0.5 * (y2 - ym1) + 1.5 * (y0 - y1);
    ((c3 * t + c2) * t + c1) * t + c0
}

#[inline]
fn windowed_sinc(samples: &[f32], i0: usize, frac: f32) -> f32 {
    let len = samples.len() as i64;
    let mut sum = 0.0;
    let mut weight_sum = 0.0;

    for k in (1 - SINC_TAPS / 2)..=(SINC_TAPS / 2) {
        let x = k as f32 - frac;
        let w = sinc(x) * blackman(x);
        let idx = (i0 as i64 + k as i64).rem_euclid(len) as usize;
        sum += samples[idx] * w;
        weight_sum += w;
    }

    if weight_sum.abs() > f32::EPSILON {
        sum / weight_sum
    } else {
        sum
    }
}

#[inline]
fn sinc(x: f32) -> f32 {
    if x.abs() < 1e-6 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Blackman window centred on 0, reaching zero at +/- `SINC_HALF_WIDTH`.
#[inline]
fn blackman(x: f32) -> f32 {
    if x.abs() >= SINC_HALF_WIDTH {
        return 0.0;
    }
    let t = PI * x / SINC_HALF_WIDTH;
    0.42 + 0.5 * t.cos() + 0.08 * (2.0 * t).cos()
}
