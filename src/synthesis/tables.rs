//! Multi-frame table generators.

use std::f64::consts::{PI, TAU};

use crate::error::{Result, WavetableError};
use crate::synthesis::waveforms::{additive, generate_waveform, harmonic_limit, normalize_peak, Waveform};
use crate::wavetable::utilities::resample_cycle;
use crate::wavetable::{create_empty_wavetable, Wavetable};

/*
Parametric Tables
=================

Each generator renders `frame_count` frames while sweeping one parameter
across the table, so the oscillator's frame position becomes a timbre knob.

    generator        parameter across frames         frame 0 -> last
    morph            crossfade amount                source A -> source B
    pwm              pulse duty cycle                min_duty -> max_duty
    detuned stack    voice spread                    single saw -> wide stack
    vowel            target vowel (categorical)      A, E, I, O, U

Every parametric frame is peak-normalized on its own, so scanning the table
doesn't change loudness just because, say, a narrow pulse carries less energy.


Band-limited pulse
------------------

A pulse is the difference of two saws offset by the duty cycle:

    pulse(t) = saw(t - duty) - saw(t)

Each saw is summed from harmonics, so the pulse is band-limited too, and the
two DC offsets cancel.


Detuned stack
-------------

A supersaw's voices drift against each other over time. A single-cycle frame
can't hold drift, but it can hold one snapshot of it: each voice is the same
saw shifted in time by `spread * offset_v`, offsets spaced evenly in [-1, 1].
At spread 0 the voices coincide and the frame is a plain saw.


Vowels
------

A sung vowel is a harmonic series shaped by a few resonant peaks (formants).
The harmonic h of a reference 110 Hz voice sits at h * 110 Hz; its amplitude
is the sum of each formant's resonance curve there:

    amp(h) = sum_k  gain_k / (1 + ((h * f0 - F_k) / (B_k / 2))^2)

    vowel   F1    F2    F3
    A       800   1150  2900
    E       350   2000  2800
    I       270   2140  2950
    O       450    800  2830
    U       325    700  2700
*/

/// Reference fundamental used to place vowel formants against harmonics.
pub const VOWEL_FUNDAMENTAL_HZ: f64 = 110.0;

const FORMANT_GAINS: [f64; 3] = [1.0, 0.5, 0.25];
const FORMANT_BANDWIDTHS: [f64; 3] = [80.0, 90.0, 120.0];

/// Vowels in table order with their first three formant frequencies.
pub const VOWELS: [(&str, [f64; 3]); 5] = [
    ("A", [800.0, 1150.0, 2900.0]),
    ("E", [350.0, 2000.0, 2800.0]),
    ("I", [270.0, 2140.0, 2950.0]),
    ("O", [450.0, 800.0, 2830.0]),
    ("U", [325.0, 700.0, 2700.0]),
];

/// Parameter value for frame `index` of `count`, 0.0 at the first frame and
/// 1.0 at the last.
#[inline]
fn sweep(index: usize, count: usize) -> f64 {
    if count > 1 {
        index as f64 / (count - 1) as f64
    } else {
        0.0
    }
}

fn build_table(name: &str, frame_size: usize, frames: Vec<Vec<f32>>) -> Result<Wavetable> {
    let table = if frames.is_empty() {
        create_empty_wavetable(name, frame_size)?
    } else {
        Wavetable::from_frames(name, frames)?
    };
    log::debug!(
        "generated table '{}': {} frames of {} samples",
        name,
        table.frame_count(),
        table.frame_size()
    );
    Ok(table)
}

/// Crossfade from `from` to `to` over `frame_count` frames.
///
/// Sources may have any length; both are resampled to `frame_size` with the
/// cubic kernel first.
pub fn morph_table(
    name: &str,
    from: &[f32],
    to: &[f32],
    frame_size: usize,
    frame_count: usize,
) -> Result<Wavetable> {
    if from.is_empty() || to.is_empty() {
        log::warn!("morph table '{name}' requested with an empty source");
        return Err(WavetableError::EmptySource);
    }

    let a = resample_cycle(from, frame_size);
    let b = resample_cycle(to, frame_size);

    let frames = (0..frame_count)
        .map(|f| {
            let t = sweep(f, frame_count) as f32;
            a.iter().zip(&b).map(|(&x, &y)| x + (y - x) * t).collect()
        })
        .collect();

    build_table(name, frame_size, frames)
}

/// Band-limited pulse with duty sweeping from `min_duty` to `max_duty`.
pub fn pwm_table(
    frame_size: usize,
    frame_count: usize,
    min_duty: f32,
    max_duty: f32,
    max_harmonics: usize,
) -> Result<Wavetable> {
    let limit = harmonic_limit(frame_size, max_harmonics);

    let frames = (0..frame_count)
        .map(|f| {
            let t = sweep(f, frame_count);
            let duty = (min_duty as f64 + (max_duty - min_duty) as f64 * t).clamp(0.01, 0.99);
            // saw(t - d) - saw(t), saw = -(2/pi) sum sin(2 pi h t) / h
            let mut frame = additive(frame_size, limit, |h| {
                let scale = 2.0 / (PI * h as f64);
                let shift = TAU * h as f64 * duty;
                // sin(x - s) - sin(x) = 2 cos(x - s/2) sin(-s/2)
                let amplitude = -scale * 2.0 * (-shift * 0.5).sin();
                Some((amplitude, PI * 0.5 - shift * 0.5))
            });
            normalize_peak(&mut frame);
            frame
        })
        .collect();

    build_table("PWM", frame_size, frames)
}

/// Stack of `voices` time-shifted saws whose spread grows from 0 to
/// `max_spread` (in cycles) across the table.
pub fn detuned_stack_table(
    frame_size: usize,
    frame_count: usize,
    voices: usize,
    max_spread: f32,
    max_harmonics: usize,
) -> Result<Wavetable> {
    let voices = voices.max(1);
    let limit = harmonic_limit(frame_size, max_harmonics);

    let frames = (0..frame_count)
        .map(|f| {
            let spread = max_spread as f64 * sweep(f, frame_count);
            let mut frame = vec![0.0f32; frame_size];
            for v in 0..voices {
                let offset = if voices > 1 {
                    2.0 * v as f64 / (voices - 1) as f64 - 1.0
                } else {
                    0.0
                };
                let shift = spread * offset;
                let voice = additive(frame_size, limit, |h| {
                    Some((-2.0 / (PI * h as f64), -TAU * h as f64 * shift))
                });
                for (acc, s) in frame.iter_mut().zip(voice) {
                    *acc += s;
                }
            }
            normalize_peak(&mut frame);
            frame
        })
        .collect();

    build_table("Detuned Stack", frame_size, frames)
}

/// Formant-shaped harmonic frames stepping through [`VOWELS`].
pub fn vowel_table(frame_size: usize, frame_count: usize, max_harmonics: usize) -> Result<Wavetable> {
    let limit = harmonic_limit(frame_size, max_harmonics);

    let vowel_indices: Vec<usize> = (0..frame_count)
        .map(|f| (f * VOWELS.len() / frame_count.max(1)).min(VOWELS.len() - 1))
        .collect();

    let frames = vowel_indices
        .iter()
        .map(|&v| {
            let (_, formants) = VOWELS[v];
            let mut frame = additive(frame_size, limit, |h| {
                let freq = h as f64 * VOWEL_FUNDAMENTAL_HZ;
                let amplitude: f64 = formants
                    .iter()
                    .zip(FORMANT_GAINS.iter().zip(FORMANT_BANDWIDTHS.iter()))
                    .map(|(&centre, (&gain, &bandwidth))| {
                        let x = (freq - centre) / (bandwidth * 0.5);
                        gain / (1.0 + x * x)
                    })
                    .sum();
                Some((amplitude, 0.0))
            });
            normalize_peak(&mut frame);
            frame
        })
        .collect();

    Ok(build_table("Vowels", frame_size, frames)?
        .with_frame_names(vowel_indices.iter().map(|&v| VOWELS[v].0)))
}

/// Sine, triangle, saw and square in one four-frame table.
pub fn basic_shapes_table(frame_size: usize, max_harmonics: usize) -> Result<Wavetable> {
    let shapes = [
        ("Sine", Waveform::Sine),
        ("Triangle", Waveform::Triangle),
        ("Saw", Waveform::Saw),
        ("Square", Waveform::Square),
    ];
    let frames = shapes
        .iter()
        .map(|&(_, shape)| generate_waveform(shape, frame_size, max_harmonics))
        .collect();

    Ok(build_table("Basic Shapes", frame_size, frames)?.with_frame_names(shapes.iter().map(|&(n, _)| n)))
}
