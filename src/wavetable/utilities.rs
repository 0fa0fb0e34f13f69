//! Whole-table transforms and analysis. None of these are realtime-safe.

use std::f64::consts::TAU;

use crate::dsp::interpolate::{interpolate_sample, SampleInterpolation};
use crate::error::{Result, WavetableError};
use crate::wavetable::{Wavetable, WavetableFrame};

/// Peaks below this are treated as silence by [`normalize`].
pub const SILENCE_THRESHOLD: f32 = 1e-6;

/// Magnitude and phase of one harmonic, as found by [`analyze_harmonics`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HarmonicBin {
    pub amplitude: f32,
    /// Radians, relative to a sine at phase 0.
    pub phase: f32,
}

/// Largest absolute sample across every frame.
pub fn peak(table: &Wavetable) -> f32 {
    table.frames().iter().fold(0.0f32, |m, f| m.max(f.peak()))
}

/// Scale the whole table so its loudest sample has magnitude 1.0.
///
/// One gain is used for every frame so their relative levels survive. A
/// silent table comes back unchanged.
pub fn normalize(table: &Wavetable) -> Wavetable {
    let peak = peak(table);
    if peak < SILENCE_THRESHOLD {
        log::debug!("normalize: '{}' is silent, leaving it unchanged", table.name());
        return table.clone();
    }

    let scale = 1.0 / peak;
    let frames = table.frames().iter().map(|f| f.map(|s| s * scale)).collect();
    log::debug!("normalize: '{}' peak {peak} scaled by {scale}", table.name());
    table.replace_frames(frames, table.frame_size())
}

/// Resample one cycle of any length to `frame_size` samples with the cubic
/// kernel.
pub fn resample_cycle(samples: &[f32], frame_size: usize) -> Vec<f32> {
    if samples.is_empty() {
        return vec![0.0; frame_size];
    }
    let ratio = samples.len() as f32 / frame_size as f32;
    (0..frame_size)
        .map(|i| interpolate_sample(samples, i as f32 * ratio, SampleInterpolation::Cubic))
        .collect()
}

/// New table with every frame resampled to `frame_size`.
pub fn resample(table: &Wavetable, frame_size: usize) -> Result<Wavetable> {
    if frame_size == 0 || !frame_size.is_power_of_two() {
        return Err(WavetableError::InvalidFrameSize(frame_size));
    }

    let frames: Vec<WavetableFrame> = table
        .frames()
        .iter()
        .map(|f| f.with_samples(resample_cycle(f.samples(), frame_size)))
        .collect();

    log::debug!(
        "resample: '{}' {} -> {} samples per frame",
        table.name(),
        table.frame_size(),
        frame_size
    );
    Ok(table.replace_frames(frames, frame_size))
}

/// Estimate harmonics 1..=`count` of one cycle by direct correlation with
/// sine and cosine.
///
/// O(count * samples). Meant for editors and tests, not the audio thread.
/// Returns an empty vector for an empty cycle or `count == 0`.
pub fn analyze_harmonics(samples: &[f32], count: usize) -> Vec<HarmonicBin> {
    let n = samples.len();
    if n == 0 || count == 0 {
        return Vec::new();
    }

    let norm = 2.0 / n as f64;
    (1..=count)
        .map(|h| {
            let step = TAU * h as f64 / n as f64;
            let (sin_sum, cos_sum) = samples.iter().enumerate().fold((0.0, 0.0), |(s, c), (i, &x)| {
                let angle = step * i as f64;
                (s + x as f64 * angle.sin(), c + x as f64 * angle.cos())
            });
            let a = sin_sum * norm;
            let b = cos_sum * norm;
            HarmonicBin {
                amplitude: (a * a + b * b).sqrt() as f32,
                phase: b.atan2(a) as f32,
            }
        })
        .collect()
}
