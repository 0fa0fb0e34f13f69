//! Messages crossing the audio/UI boundary
//!
//! Both types are Copy so they can travel through rtrb rings without
//! allocating on the audio thread.

use saavy_wavetable::dsp::SampleInterpolation;

/// Commands sent from UI thread to audio thread
#[derive(Clone, Copy, Debug)]
pub enum ControlMessage {
    /// Step to the next sample interpolation kernel
    CycleKernel,
    /// Switch between the mip pyramid and the raw frames
    ToggleMipmaps,
    /// Move the frame position by this much (stops the sweep)
    NudgeFrame(f32),
    /// Start or stop the automatic frame sweep
    ToggleSweep,
}

/// Playback snapshot sent once per audio callback
#[derive(Clone, Copy, Debug)]
pub struct StatusUpdate {
    pub frame_position: f32,
    pub kernel: SampleInterpolation,
    pub mipmaps: bool,
    pub sweeping: bool,
}

impl StatusUpdate {
    pub fn new(mipmaps: bool, sweeping: bool) -> Self {
        Self {
            frame_position: 0.0,
            kernel: SampleInterpolation::default(),
            mipmaps,
            sweeping,
        }
    }
}
