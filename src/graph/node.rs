use crate::dsp::amplify::pan_in_place;

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frequency: Pitch to render (Hz)
/// - velocity: Intensity/loudness (0.0-127.0, MIDI-style)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub velocity: f32,
}

impl RenderCtx {
    /// Create context from MIDI note (keyboard/sequencer use case)
    pub fn from_note(sample_rate: f32, note: u8, velocity: f32) -> Self {
        Self {
            sample_rate,
            frequency: midi_note_to_freq(note),
            velocity,
        }
    }

    /// Create context from direct frequency
    pub fn from_freq(sample_rate: f32, frequency: f32, velocity: f32) -> Self {
        Self {
            sample_rate,
            frequency,
            velocity,
        }
    }
}

/// Nodes with named parameters that a modulation source can drive
pub trait Modulatable: Send {
    type Param: Copy + Send;

    fn get_param(&self, param: Self::Param) -> f32;

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32);
}

/// Core trait for playable nodes
///
/// `render_block` must not allocate: it runs inside the audio callback.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Triggered when a note starts
    fn note_on(&mut self, _ctx: &RenderCtx) {}

    /// Triggered when a note is released
    fn note_off(&mut self, _ctx: &RenderCtx) {}

    /// Stereo position, -1.0 (left) to 1.0 (right)
    fn pan(&self) -> f32 {
        0.0
    }

    /// Render mono into `left`, then spread it across both channels with the
    /// node's pan.
    fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        debug_assert_eq!(left.len(), right.len());
        self.render_block(left, ctx);
        pan_in_place(left, right, self.pan());
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        (**self).note_off(ctx)
    }

    fn pan(&self) -> f32 {
        (**self).pan()
    }
}
