use std::sync::Arc;

use crate::dsp::frame::FrameInterpolation;
use crate::dsp::interpolate::SampleInterpolation;
use crate::dsp::oscillator::{OscillatorParams, OscillatorState};
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};
use crate::wavetable::Wavetable;

/*
Wavetable Voice Node
====================

Wraps one OscillatorState around a shared table so it can sit in a graph and
respond to notes.

    Arc<Wavetable>  --read-only-->  WavetableNode { state, params }
                    --read-only-->  WavetableNode { state, params }   (another voice)

The table is shared, the state is not. Any number of voices can play the same
Arc<Wavetable> because nobody writes to it; build its mip-maps before the
first clone goes to the audio thread.

Pitch comes from the render context (the note being played) unless a fixed
frequency is set, which is how an LFO-rate or drone voice ignores the
keyboard.

Note-on resets the phase so every note starts on the same part of the cycle.
`free_running()` turns that off for pads where a restarted phase would click
or sound mechanical.

Example usage:
  let table = Arc::new(basic_shapes_table(2048, 64)?.with_mipmaps(48_000.0));
  let voice = WavetableNode::new(table.clone())
      .with_frame_position(0.5)
      .with_detune(-7.0);
*/

pub struct WavetableNode {
    table: Arc<Wavetable>,
    state: OscillatorState,
    params: OscillatorParams,
    /// Fixed frequency (Hz). If Some, ignores ctx.frequency.
    base_frequency: Option<f32>,
    /// Phase a note-on resets to, or None to keep running.
    start_phase: Option<f32>,
}

/// Parameters that can be modulated on a wavetable voice
#[derive(Clone, Copy, Debug)]
pub enum WtParam {
    /// 0.0 (first frame) to 1.0 (last frame)
    FramePosition,
    /// Detune in cents
    Detune,
    /// Linear output gain
    Gain,
}

impl WavetableNode {
    pub fn new(table: Arc<Wavetable>) -> Self {
        Self {
            table,
            state: OscillatorState::new(),
            params: OscillatorParams::DEFAULT,
            base_frequency: None,
            start_phase: Some(0.0),
        }
    }

    /// Start from a full parameter snapshot instead of the defaults.
    pub fn with_params(mut self, params: OscillatorParams) -> Self {
        self.params = params;
        self
    }

    /// Set a fixed frequency, ignoring the note pitch from RenderCtx.
    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.base_frequency = Some(freq);
        self
    }

    /// Set detune in cents (100 cents = 1 semitone).
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.params.detune_cents = cents;
        self
    }

    pub fn with_frame_position(mut self, position: f32) -> Self {
        self.params.frame_position = position.clamp(0.0, 1.0);
        self
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.params.gain = gain;
        self
    }

    pub fn with_pan(mut self, pan: f32) -> Self {
        self.params.pan = pan.clamp(-1.0, 1.0);
        self
    }

    pub fn with_sample_interpolation(mut self, mode: SampleInterpolation) -> Self {
        self.params.sample_interpolation = mode;
        self
    }

    pub fn with_frame_interpolation(mut self, mode: FrameInterpolation) -> Self {
        self.params.frame_interpolation = mode;
        self
    }

    /// Read from the table's mip-maps (when it has them). On by default.
    pub fn with_mipmaps(mut self, enabled: bool) -> Self {
        self.params.use_mipmaps = enabled;
        self
    }

    /// Phase that note-on resets to.
    pub fn with_start_phase(mut self, phase: f32) -> Self {
        self.start_phase = Some(phase);
        self.state.set_phase(phase);
        self
    }

    /// Keep the phase running across notes.
    pub fn free_running(mut self) -> Self {
        self.start_phase = None;
        self
    }

    pub fn table(&self) -> &Arc<Wavetable> {
        &self.table
    }

    pub fn state(&self) -> &OscillatorState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut OscillatorState {
        &mut self.state
    }

    pub fn params(&self) -> &OscillatorParams {
        &self.params
    }

    pub fn set_frame_position(&mut self, position: f32) {
        self.params.frame_position = position.clamp(0.0, 1.0);
    }

    pub fn set_detune(&mut self, cents: f32) {
        self.params.detune_cents = cents;
    }

    pub fn set_sample_interpolation(&mut self, mode: SampleInterpolation) {
        self.params.sample_interpolation = mode;
    }

    pub fn set_use_mipmaps(&mut self, enabled: bool) {
        self.params.use_mipmaps = enabled;
    }

    #[inline]
    fn frequency_for(&self, ctx: &RenderCtx) -> f32 {
        self.base_frequency.unwrap_or(ctx.frequency)
    }

    /// One sample at `frequency`, read `phase_bias` cycles ahead.
    #[inline]
    pub(crate) fn tick(&mut self, frequency: f32, sample_rate: f32, phase_bias: f32) -> f32 {
        self.params.frequency = frequency;
        self.state
            .next_sample_with_phase_bias(&self.table, &self.params, sample_rate, phase_bias)
    }

    /// Render with a per-sample frame-position offset (e.g. an audio-rate
    /// envelope scanning the table).
    pub fn render_scanned(&mut self, out: &mut [f32], ctx: &RenderCtx, frame_mod: &[f32]) {
        self.params.frequency = self.frequency_for(ctx);
        self.state
            .render(out, &self.table, &self.params, ctx.sample_rate, Some(frame_mod));
    }
}

impl GraphNode for WavetableNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.params.frequency = self.frequency_for(ctx);
        self.state
            .render(out, &self.table, &self.params, ctx.sample_rate, None);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        if let Some(phase) = self.start_phase {
            self.state.set_phase(phase);
        }
    }

    fn pan(&self) -> f32 {
        self.params.pan
    }
}

impl Modulatable for WavetableNode {
    type Param = WtParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            WtParam::FramePosition => self.params.frame_position,
            WtParam::Detune => self.params.detune_cents,
            WtParam::Gain => self.params.gain,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            WtParam::FramePosition => {
                self.params.frame_position = (base + modulation).clamp(0.0, 1.0);
            }
            WtParam::Detune => {
                // Clamp to reasonable range (±2 semitones)
                self.params.detune_cents = (base + modulation).clamp(-200.0, 200.0);
            }
            WtParam::Gain => {
                self.params.gain = (base + modulation).max(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::{basic_shapes_table, generate_waveform, Waveform, DEFAULT_MAX_HARMONICS};
    use crate::wavetable::create_single_frame_wavetable;
    use std::f32::consts::TAU;

    fn sine() -> Arc<Wavetable> {
        let frame = generate_waveform(Waveform::Sine, 2048, DEFAULT_MAX_HARMONICS);
        Arc::new(create_single_frame_wavetable("sine", frame).unwrap())
    }

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let ctx = RenderCtx::from_note(sample_rate, 69, 100.0);
        let mut node = WavetableNode::new(sine());

        let mut buffer = vec![0.0f32; 128];
        node.render_block(&mut buffer, &ctx);

        let sample_index = 12;
        let expected = (TAU * ctx.frequency * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn fixed_frequency_ignores_note() {
        let ctx = RenderCtx::from_note(48_000.0, 30, 100.0);
        let mut node = WavetableNode::new(sine()).with_frequency(1_000.0);
        let mut buffer = [0.0; 4];
        node.render_block(&mut buffer, &ctx);
        assert!((node.state().phase_increment() - 1_000.0 / 48_000.0).abs() < 1e-7);
    }

    #[test]
    fn note_on_resets_phase() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 100.0);
        let mut node = WavetableNode::new(sine());
        let mut buffer = [0.0; 37];
        node.render_block(&mut buffer, &ctx);
        assert!(node.state().phase() > 0.0);
        node.note_on(&ctx);
        assert_eq!(node.state().phase(), 0.0);
    }

    #[test]
    fn free_running_keeps_phase() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 100.0);
        let mut node = WavetableNode::new(sine()).free_running();
        let mut buffer = [0.0; 37];
        node.render_block(&mut buffer, &ctx);
        let before = node.state().phase();
        node.note_on(&ctx);
        assert_eq!(node.state().phase(), before);
    }

    #[test]
    fn voices_share_one_table() {
        let table = Arc::new(basic_shapes_table(256, 16).unwrap().with_mipmaps(48_000.0));
        let a = WavetableNode::new(table.clone());
        let b = WavetableNode::new(table.clone()).with_frame_position(1.0);
        assert!(Arc::ptr_eq(a.table(), b.table()));
        assert_eq!(Arc::strong_count(&table), 3);
    }

    #[test]
    fn frame_position_modulation_is_clamped() {
        let mut node = WavetableNode::new(sine());
        node.apply_modulation(WtParam::FramePosition, 0.8, 0.5);
        assert_eq!(node.get_param(WtParam::FramePosition), 1.0);
        node.apply_modulation(WtParam::Detune, 0.0, 500.0);
        assert_eq!(node.get_param(WtParam::Detune), 200.0);
        node.apply_modulation(WtParam::Gain, 0.5, -1.0);
        assert_eq!(node.get_param(WtParam::Gain), 0.0);
    }

    #[test]
    fn scanned_render_moves_through_frames() {
        let table = Arc::new(
            Wavetable::from_frames("steps", vec![vec![0.0; 64], vec![1.0; 64]]).unwrap(),
        );
        let ctx = RenderCtx::from_freq(48_000.0, 100.0, 100.0);
        let mut node = WavetableNode::new(table);
        let ramp = [0.0, 0.25, 0.5, 1.0];
        let mut out = [0.0; 4];
        node.render_scanned(&mut out, &ctx, &ramp);
        assert_eq!(out, ramp);
    }
}
