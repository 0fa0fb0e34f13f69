//! Band-limited frame pyramids and level selection.

use crate::wavetable::WavetableFrame;

/*
Mip-Mapping Against Aliasing
============================

A frame with N samples can hold harmonics up to N/2. Played at a low pitch
that's fine: a 2048-sample saw at 55 Hz has harmonics up to 56 kHz in
principle, but only the ones below Nyquist (sample_rate / 2) are audible, and
at 55 Hz the 436th harmonic is already at 24 kHz.

Play the same frame at 5 kHz and the 5th harmonic is at 25 kHz. Above Nyquist
a harmonic doesn't vanish, it FOLDS BACK to (sample_rate - f) and lands as an
inharmonic whine. That's aliasing.

The fix borrowed from texture mapping: precompute smaller, smoother copies.

    level 0   2048 samples   harmonics <= 1024   threshold = Nyquist
    level 1   1024 samples   harmonics <= 512    threshold = Nyquist / 2
    level 2    512 samples   harmonics <= 256    threshold = Nyquist / 4
    ...

Each level averages adjacent pairs of the previous one:

    next[i] = (prev[2i] + prev[2i + 1]) / 2

A 2-tap box filter is a soft low-pass (its response is cos(w/2), only -3 dB
at half the band) so some energy above the new limit survives. A proper
half-band FIR would be cleaner; the box is what we use because pyramids get
rebuilt whenever frames change and it costs one add per sample.

Generation stops when the next level would be shorter than
MIN_MIP_FRAME_SIZE or MAX_MIP_LEVELS levels exist.


Choosing a Level
----------------

At playback frequency f the number of harmonics that fit under Nyquist is

    budget = (sample_rate / 2) / f

Walk levels from 0 and take the first whose sample count / 2 is within
budget; if none fit, take the smallest level. Raising f shrinks the budget,
so the chosen level never goes down as pitch goes up.
*/

/// Shortest frame a pyramid level may have.
pub const MIN_MIP_FRAME_SIZE: usize = 32;
/// Most levels a pyramid may hold, level 0 included.
pub const MAX_MIP_LEVELS: usize = 8;

/// One level of a [`MipPyramid`].
#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    samples: Vec<f32>,
    max_frequency: f32,
}

impl MipLevel {
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Highest playback-relevant frequency this level was built for.
    pub fn max_frequency(&self) -> f32 {
        self.max_frequency
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Progressively half-length copies of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MipPyramid {
    levels: Vec<MipLevel>,
}

impl MipPyramid {
    /// Build the pyramid for one frame. Level 0 is `samples` unchanged.
    pub fn build(samples: &[f32], sample_rate: f32) -> Self {
        let mut levels = Vec::with_capacity(MAX_MIP_LEVELS);
        levels.push(MipLevel {
            samples: samples.to_vec(),
            max_frequency: sample_rate * 0.5,
        });

        while levels.len() < MAX_MIP_LEVELS {
            let prev = &levels[levels.len() - 1];
            let next_len = prev.samples.len() / 2;
            if next_len < MIN_MIP_FRAME_SIZE {
                break;
            }

            let decimated: Vec<f32> = prev
                .samples
                .chunks_exact(2)
                .map(|pair| (pair[0] + pair[1]) * 0.5)
                .collect();
            let max_frequency = prev.max_frequency * 0.5;

            levels.push(MipLevel {
                samples: decimated,
                max_frequency,
            });
        }

        Self { levels }
    }

    #[inline]
    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    #[inline]
    pub fn level(&self, index: usize) -> &MipLevel {
        &self.levels[index.min(self.levels.len() - 1)]
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Coarsest-needed level for playing this frame at `frequency`.
    #[inline]
    pub fn select_level(&self, frequency: f32, sample_rate: f32) -> usize {
        let frequency = frequency.abs();
        if frequency <= 0.0 {
            return 0;
        }

        let budget = (sample_rate * 0.5) / frequency;
        self.levels
            .iter()
            .position(|level| (level.samples.len() / 2) as f32 <= budget)
            .unwrap_or(self.levels.len() - 1)
    }
}

/// Per-frame pyramids for a whole table, tied to the sample rate they were
/// built at.
#[derive(Debug, Clone, PartialEq)]
pub struct MipMaps {
    sample_rate: f32,
    pyramids: Vec<MipPyramid>,
}

impl MipMaps {
    /// Build one pyramid per frame. Not realtime-safe.
    pub fn build(frames: &[WavetableFrame], sample_rate: f32) -> Self {
        let pyramids: Vec<MipPyramid> = frames
            .iter()
            .map(|frame| MipPyramid::build(frame.samples(), sample_rate))
            .collect();

        log::debug!(
            "built mip-maps for {} frames at {} Hz ({} levels each)",
            pyramids.len(),
            sample_rate,
            pyramids.first().map_or(0, MipPyramid::level_count)
        );

        Self {
            sample_rate,
            pyramids,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    #[inline]
    pub fn pyramids(&self) -> &[MipPyramid] {
        &self.pyramids
    }

    #[inline]
    pub fn pyramid(&self, frame: usize) -> Option<&MipPyramid> {
        self.pyramids.get(frame)
    }
}
