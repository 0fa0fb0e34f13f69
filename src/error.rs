//! Construction-time faults.
//!
//! Playback never fails: degenerate tables play silence and degenerate
//! buffers interpolate to zero. The only errors are contract violations by
//! whoever hands us sample data, and those are rejected when the wavetable is
//! built rather than discovered on the audio thread.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WavetableError {
    /// Frame lengths must be non-zero powers of two so mip levels halve cleanly.
    #[error("frame size {0} is not a non-zero power of two")]
    InvalidFrameSize(usize),

    #[error("frame {index} has {actual} samples, expected {expected}")]
    FrameSizeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "{frame_count} frames of {frame_size} samples need {required} samples, only {available} supplied"
    )]
    InsufficientSamples {
        frame_size: usize,
        frame_count: usize,
        required: usize,
        available: usize,
    },

    #[error("{frame_count} frames of {frame_size} samples do not fit in memory")]
    LayoutOverflow {
        frame_size: usize,
        frame_count: usize,
    },

    /// A generator was asked to resample or morph an empty source waveform.
    #[error("source waveform is empty")]
    EmptySource,
}

pub type Result<T> = std::result::Result<T, WavetableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_the_frame() {
        let err = WavetableError::FrameSizeMismatch {
            index: 3,
            expected: 256,
            actual: 128,
        };
        assert_eq!(err.to_string(), "frame 3 has 128 samples, expected 256");
    }
}
