//! Single-cycle waveform authoring.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::{PI, TAU};

/*
Band-Limited Single Cycles
==========================

A frame of N samples can represent harmonics 1 .. N/2. Draw a sawtooth
directly (a straight ramp with a jump) and you get every harmonic up to
infinity folded into those N/2 bins, plus whatever the mip-map filter fails to
remove later. Summing only the harmonics we want avoids that:

    shape      harmonics     weight
    sine       1             1
    saw        all           1/h          (-2/pi scale, rising ramp)
    square     odd           1/h          ( 4/pi scale)
    triangle   odd           +/- 1/h^2    ( 8/pi^2 scale, alternating sign)

The sum stops at min(max_harmonics, frame_size / 4). Keeping a quarter of the
frame empty leaves the cubic and sinc kernels headroom when the frame is read
between samples.

These are the Fourier series of the ideal shapes, so the Gibbs overshoot
(about 9% near the jumps) remains. Canonical shapes are NOT peak-normalized;
a 1.0-amplitude square reads slightly above 1.0 next to its edges.

Pulse is the exception: it is thresholded directly (phase < duty -> +1, else
-1) and is not band-limited. Use `tables::pwm_table` for a band-limited pulse.
*/

/// Upper bound on harmonics summed into one canonical frame.
pub const DEFAULT_MAX_HARMONICS: usize = 64;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
    Triangle,
    /// Naive pulse, `duty` in (0, 1).
    Pulse { duty: f32 },
}

/// One partial for [`from_harmonics`]. `phase` is in radians, relative to sine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Harmonic {
    pub amplitude: f32,
    pub phase: f32,
}

impl Harmonic {
    pub fn new(amplitude: f32, phase: f32) -> Self {
        Self { amplitude, phase }
    }
}

/// Render one cycle of `waveform` into `frame_size` samples.
pub fn generate_waveform(waveform: Waveform, frame_size: usize, max_harmonics: usize) -> Vec<f32> {
    let limit = harmonic_limit(frame_size, max_harmonics);

    match waveform {
        Waveform::Sine => (0..frame_size)
            .map(|i| (TAU * i as f64 / frame_size as f64).sin() as f32)
            .collect(),
        Waveform::Saw => additive(frame_size, limit, |h| Some((-2.0 / (PI * h as f64), 0.0))),
        Waveform::Square => additive(frame_size, limit, |h| {
            (h % 2 == 1).then(|| (4.0 / (PI * h as f64), 0.0))
        }),
        Waveform::Triangle => additive(frame_size, limit, |h| {
            (h % 2 == 1).then(|| {
                let sign = if (h / 2) % 2 == 0 { 1.0 } else { -1.0 };
                (sign * 8.0 / (PI * PI * (h * h) as f64), 0.0)
            })
        }),
        Waveform::Pulse { duty } => {
            let duty = duty.clamp(0.0, 1.0);
            (0..frame_size)
                .map(|i| if (i as f32 / frame_size as f32) < duty { 1.0 } else { -1.0 })
                .collect()
        }
    }
}

/// Sum arbitrary partials (`harmonics[0]` is the fundamental) and normalize
/// to unit peak.
///
/// Partials above the frame's Nyquist (`frame_size / 2`) are skipped. A
/// silent result stays silent.
pub fn from_harmonics(frame_size: usize, harmonics: &[Harmonic]) -> Vec<f32> {
    let nyquist = frame_size / 2;
    let mut frame = additive(frame_size, harmonics.len().min(nyquist), |h| {
        let partial = harmonics[h - 1];
        Some((partial.amplitude as f64, partial.phase as f64))
    });
    normalize_peak(&mut frame);
    frame
}

/// Harmonics a frame of `frame_size` may carry under `max_harmonics`.
#[inline]
pub(crate) fn harmonic_limit(frame_size: usize, max_harmonics: usize) -> usize {
    max_harmonics.min(frame_size / 4).max(1)
}

/// Sum `sin(2 pi h t + phase) * amplitude` for h in 1..=limit.
///
/// `partial(h)` returns `None` to skip harmonic `h`.
pub(crate) fn additive<F>(frame_size: usize, limit: usize, mut partial: F) -> Vec<f32>
where
    F: FnMut(usize) -> Option<(f64, f64)>,
{
    let mut acc = vec![0.0f64; frame_size];
    for h in 1..=limit {
        let Some((amplitude, phase)) = partial(h) else {
            continue;
        };
        if amplitude == 0.0 {
            continue;
        }
        let step = TAU * h as f64 / frame_size as f64;
        for (i, a) in acc.iter_mut().enumerate() {
            *a += amplitude * (step * i as f64 + phase).sin();
        }
    }
    acc.into_iter().map(|v| v as f32).collect()
}

/// Scale so the largest magnitude is 1.0. Leaves near-silent frames alone.
pub(crate) fn normalize_peak(frame: &mut [f32]) {
    let peak = frame.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak > f32::EPSILON {
        let scale = 1.0 / peak;
        for s in frame.iter_mut() {
            *s *= scale;
        }
    }
}
