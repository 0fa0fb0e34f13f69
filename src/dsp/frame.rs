//! Blending across the frames of a wavetable.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::interpolate::{hermite, interpolate_sample, SampleInterpolation};
use crate::wavetable::Wavetable;

/*
Frame Morphing
==============

A wavetable is a stack of single-cycle frames. The frame position knob
(0.0 to 1.0) scans through the stack:

    position   0.0        0.33       0.67       1.0
    frame      [0]        [1]        [2]        [3]

    scaled = position * (frame_count - 1)

A position between two frames blends them. Unlike sample reads, the ends are
CLAMPED: frame 0 and frame N-1 are not neighbours, so scanning past the end
just holds the last frame.

Modes
-----

  none       floor frame only, stepped scanning
  linear     crossfade floor and floor+1 by the fractional part
  cubic      Hermite across floor-1 .. floor+2, each index clamped
  spectral   crossfade, same as linear

Spectral
--------

True spectral morphing would FFT both frames and interpolate magnitude and
phase per bin. This engine doesn't do that: `Spectral` is accepted so patches
can ask for it, and it deliberately renders the linear crossfade. Swap in a
real implementation here if one is ever needed; nothing else depends on it.
*/

/// How adjacent frames are combined at a fractional frame position.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameInterpolation {
    None,
    #[default]
    Linear,
    Cubic,
    /// Renders the linear crossfade; see module docs.
    Spectral,
}

/// Blend across `frame_count` frames at `position` (0.0 to 1.0).
///
/// `read` returns the value of one frame at whatever sample index the caller
/// is resolving. The oscillator reuses this to blend mip-mapped frames with
/// exactly the same rules as raw ones.
#[inline]
pub fn blend_frames<F>(frame_count: usize, position: f32, mode: FrameInterpolation, mut read: F) -> f32
where
    F: FnMut(usize) -> f32,
{
    if frame_count == 0 {
        return 0.0;
    }

    let last = frame_count - 1;
    let scaled = position.clamp(0.0, 1.0) * last as f32;
    let floor = (scaled.floor() as usize).min(last);
    let frac = scaled - floor as f32;

    if frame_count == 1 || frac <= 0.0 {
        return read(floor);
    }

    match mode {
        FrameInterpolation::None => read(floor),
        FrameInterpolation::Linear | FrameInterpolation::Spectral => {
            let a = read(floor);
            let b = read((floor + 1).min(last));
            a + (b - a) * frac
        }
        FrameInterpolation::Cubic => {
            let ym1 = read(floor.saturating_sub(1));
            let y0 = read(floor);
            let y1 = read((floor + 1).min(last));
            let y2 = read((floor + 2).min(last));
            hermite(ym1, y0, y1, y2, frac)
        }
    }
}

/// Read `table` at a frame `position` (0.0 to 1.0) and a fractional
/// `sample_index` within the frame.
///
/// Zero-frame tables read as silence.
#[inline]
pub fn interpolate_frame(
    table: &Wavetable,
    position: f32,
    sample_index: f32,
    frame_mode: FrameInterpolation,
    sample_mode: SampleInterpolation,
) -> f32 {
    let frames = table.frames();
    blend_frames(frames.len(), position, frame_mode, |i| {
        interpolate_sample(frames[i].samples(), sample_index, sample_mode)
    })
}
