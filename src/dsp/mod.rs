//! Low-level wavetable DSP primitives.
//!
//! Everything reachable from an oscillator's per-sample path lives here and is
//! allocation-free and realtime-safe: interpolation kernels, frame blending,
//! mip-level selection, the phase accumulator and the modulation operators.
//! Pyramid construction (`mipmap::MipPyramid::build`) is the exception and
//! belongs off the audio thread.

/// Output gain and equal-power pan.
pub mod amplify;
/// Blending across the frames of a table.
pub mod frame;
/// Fractional reads inside one frame.
pub mod interpolate;
/// Band-limited pyramids and level selection.
pub mod mipmap;
/// FM, ring, amplitude modulation and hard sync.
pub mod modulate;
/// Phase-accumulator wavetable playback.
pub mod oscillator;

pub use frame::FrameInterpolation;
pub use interpolate::SampleInterpolation;
pub use oscillator::{OscillatorParams, OscillatorState};
