#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::frame::{blend_frames, interpolate_frame, FrameInterpolation};
use crate::dsp::interpolate::{interpolate_sample, SampleInterpolation};
use crate::wavetable::Wavetable;

/*
Wavetable Oscillator
====================

A phase accumulator walks through one frame of the wavetable, once per cycle.

Vocabulary
----------

  phase       Where we are in the current cycle, in [0, 1).
  increment   How far phase moves per output sample:
                  increment = frequency / sample_rate
              At 440 Hz and 48 kHz: 0.00917, so a cycle takes ~109 samples.
  detune      Pitch offset in cents. 1200 cents = one octave.
                  frequency * 2^(cents / 1200)
  frame pos   Which frame (0.0 to 1.0) of the table we read from.


One Sample
----------

    1. freq      = frequency * 2^(detune / 1200)
    2. increment = freq / sample_rate              (kept in the state)
    3. index     = (phase + phase_offset) * frame_size
    4. value     = read table at (frame_position, index)
                     - mip-mapped: per frame, pick the pyramid level for
                       `freq`, read it, then blend frames
                     - otherwise: plain frame interpolation
    5. phase    += increment, wrapped back into [0, 1)
    6. return value * gain

Pan is accepted in the parameters but not applied here: a single sample has
no left or right. The mixing stage pans it with `amplify`.


State vs Parameters
-------------------

OscillatorState is the voice's memory (phase and what it last played). It is
created at note-on, owned by exactly one voice, and passed in as `&mut`.

OscillatorParams is a snapshot of the knobs. It is `Copy`, passed as `&`,
and never written by the oscillator. There's no global default; use
`OscillatorParams::DEFAULT` or build one.


Blocks
------

`render` runs the exact same step in a loop with one state, so a block of N
equals N single calls. An optional modulation slice biases the frame position
per sample (clamped to [0, 1] after the bias), which is how an LFO or envelope
scans the table at audio rate.

Nothing here allocates. A zero-frame table reads as silence but the phase
still advances, so a table swapped in later picks up mid-cycle.
*/

/// Knob snapshot for one processing call.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    /// Base pitch in Hz.
    pub frequency: f32,
    /// Pitch offset in cents.
    pub detune_cents: f32,
    /// 0.0 = first frame, 1.0 = last frame.
    pub frame_position: f32,
    /// Linear output gain.
    pub gain: f32,
    /// -1.0 (left) to 1.0 (right). Applied by the mixing stage.
    pub pan: f32,
    pub sample_interpolation: SampleInterpolation,
    pub frame_interpolation: FrameInterpolation,
    /// Added to the phase before reading, in cycles.
    pub phase_offset: f32,
    /// Read from the table's mip-maps when it has them.
    pub use_mipmaps: bool,
    /// Carried for patches that set it; playback does not use it yet.
    pub formant_preserve: f32,
}

impl OscillatorParams {
    pub const DEFAULT: Self = Self {
        frequency: 440.0,
        detune_cents: 0.0,
        frame_position: 0.0,
        gain: 1.0,
        pan: 0.0,
        sample_interpolation: SampleInterpolation::Cubic,
        frame_interpolation: FrameInterpolation::Linear,
        phase_offset: 0.0,
        use_mipmaps: true,
        formant_preserve: 0.0,
    };

    /// `frequency` with detune applied.
    #[inline]
    pub fn effective_frequency(&self) -> f32 {
        if self.detune_cents == 0.0 {
            self.frequency
        } else {
            self.frequency * 2.0_f32.powf(self.detune_cents / 1200.0)
        }
    }
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-voice playback memory.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OscillatorState {
    phase: f32,
    frame_position: f32,
    frequency: f32,
    detune_cents: f32,
    phase_increment: f32,
}

impl OscillatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given phase, e.g. for randomised unison starts.
    pub fn with_phase(phase: f32) -> Self {
        Self {
            phase: wrap_phase(phase),
            ..Self::default()
        }
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Frame position used by the most recent sample, modulation included.
    pub fn frame_position(&self) -> f32 {
        self.frame_position
    }

    /// Base frequency of the most recent sample.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn detune_cents(&self) -> f32 {
        self.detune_cents
    }

    /// Increment applied by the most recent sample.
    #[inline]
    pub fn phase_increment(&self) -> f32 {
        self.phase_increment
    }

    #[inline]
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = wrap_phase(phase);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Produce one sample and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, table: &Wavetable, params: &OscillatorParams, sample_rate: f32) -> f32 {
        self.tick(table, params, params.frame_position, 0.0, sample_rate)
    }

    /// Produce one sample read at `phase + phase_bias`, then advance the
    /// stored phase as usual. The bias is not remembered.
    ///
    /// Phase-modulation FM: pass `modulate::apply_fm(..) - state.phase()`, or
    /// use `modulator * depth * ratio` directly.
    #[inline]
    pub fn next_sample_with_phase_bias(
        &mut self,
        table: &Wavetable,
        params: &OscillatorParams,
        sample_rate: f32,
        phase_bias: f32,
    ) -> f32 {
        self.tick(table, params, params.frame_position, phase_bias, sample_rate)
    }

    /// Fill `out`, one sample at a time, optionally biasing the frame
    /// position per sample with `frame_mod`.
    ///
    /// If `frame_mod` is shorter than `out` the remaining samples are
    /// unmodulated.
    pub fn render(
        &mut self,
        out: &mut [f32],
        table: &Wavetable,
        params: &OscillatorParams,
        sample_rate: f32,
        frame_mod: Option<&[f32]>,
    ) {
        match frame_mod {
            Some(modulation) => {
                for (i, sample) in out.iter_mut().enumerate() {
                    let bias = modulation.get(i).copied().unwrap_or(0.0);
                    let position = (params.frame_position + bias).clamp(0.0, 1.0);
                    *sample = self.tick(table, params, position, 0.0, sample_rate);
                }
            }
            None => {
                for sample in out.iter_mut() {
                    *sample = self.next_sample(table, params, sample_rate);
                }
            }
        }
    }

    #[inline]
    fn tick(
        &mut self,
        table: &Wavetable,
        params: &OscillatorParams,
        frame_position: f32,
        phase_bias: f32,
        sample_rate: f32,
    ) -> f32 {
        let frequency = params.effective_frequency();
        let increment = if sample_rate > 0.0 {
            frequency / sample_rate
        } else {
            0.0
        };

        self.frequency = params.frequency;
        self.detune_cents = params.detune_cents;
        self.phase_increment = increment;
        self.frame_position = frame_position;

        let value = if table.is_empty() {
            0.0
        } else {
            let index = (self.phase + params.phase_offset + phase_bias) * table.frame_size() as f32;
            read_table(table, params, frame_position, index, frequency, sample_rate)
        };

        self.phase = wrap_phase(self.phase + increment);

        value * params.gain
    }
}

#[inline]
fn read_table(
    table: &Wavetable,
    params: &OscillatorParams,
    frame_position: f32,
    index: f32,
    frequency: f32,
    sample_rate: f32,
) -> f32 {
    match table.mipmaps().filter(|_| params.use_mipmaps) {
        Some(mipmaps) => {
            let frame_size = table.frame_size() as f32;
            blend_frames(
                table.frame_count(),
                frame_position,
                params.frame_interpolation,
                |frame| match mipmaps.pyramid(frame) {
                    Some(pyramid) => {
                        let level = pyramid.level(pyramid.select_level(frequency, sample_rate));
                        let scaled = index * level.len() as f32 / frame_size;
                        interpolate_sample(level.samples(), scaled, params.sample_interpolation)
                    }
                    None => interpolate_sample(
                        table.frames()[frame].samples(),
                        index,
                        params.sample_interpolation,
                    ),
                },
            )
        }
        None => interpolate_frame(
            table,
            frame_position,
            index,
            params.frame_interpolation,
            params.sample_interpolation,
        ),
    }
}

/// Fold any phase into [0, 1).
#[inline]
pub(crate) fn wrap_phase(phase: f32) -> f32 {
    if (0.0..1.0).contains(&phase) {
        return phase;
    }
    let wrapped = phase - phase.floor();
    // x - floor(x) rounds to 1.0 for tiny negative x
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wavetable::{create_empty_wavetable, create_single_frame_wavetable, Wavetable};
    use std::f32::consts::TAU;

    fn sine_table(n: usize) -> Wavetable {
        let frame = (0..n).map(|i| (TAU * i as f32 / n as f32).sin()).collect();
        create_single_frame_wavetable("sine", frame).unwrap()
    }

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let table = sine_table(2048);
        let params = OscillatorParams::DEFAULT;
        let mut state = OscillatorState::new();

        let mut buffer = vec![0.0f32; 128];
        state.render(&mut buffer, &table, &params, sample_rate, None);

        // sample n should be sin(2pi f n / sr)
        let sample_index = 12;
        let expected = (TAU * 440.0 * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn increment_is_recorded() {
        let table = sine_table(256);
        let mut state = OscillatorState::new();
        state.next_sample(&table, &OscillatorParams::DEFAULT, 48_000.0);
        assert!((state.phase_increment() - 440.0 / 48_000.0).abs() < 1e-9);
        assert!((state.phase() - 440.0 / 48_000.0).abs() < 1e-9);
    }

    #[test]
    fn detune_shifts_frequency() {
        let table = sine_table(256);
        let params = OscillatorParams {
            detune_cents: 1200.0,
            ..OscillatorParams::DEFAULT
        };
        let mut state = OscillatorState::new();
        state.next_sample(&table, &params, 48_000.0);
        let expected = 880.0 / 48_000.0;
        assert!(
            (state.phase_increment() - expected).abs() < 1e-7,
            "1200 cents detune should double frequency"
        );
    }

    #[test]
    fn phase_stays_in_unit_range() {
        let table = sine_table(256);
        let params = OscillatorParams {
            frequency: 13_000.0,
            ..OscillatorParams::DEFAULT
        };
        let mut state = OscillatorState::new();
        for _ in 0..10_000 {
            state.next_sample(&table, &params, 44_100.0);
            assert!((0.0..1.0).contains(&state.phase()), "phase {}", state.phase());
        }
    }

    #[test]
    fn negative_frequency_runs_backwards() {
        let table = sine_table(256);
        let params = OscillatorParams {
            frequency: -480.0,
            ..OscillatorParams::DEFAULT
        };
        let mut state = OscillatorState::new();
        state.next_sample(&table, &params, 48_000.0);
        assert!((state.phase() - 0.99).abs() < 1e-6, "phase {}", state.phase());
    }

    #[test]
    fn gain_scales_output() {
        let table = create_single_frame_wavetable("dc", vec![0.5; 64]).unwrap();
        let params = OscillatorParams {
            gain: 0.25,
            ..OscillatorParams::DEFAULT
        };
        let mut state = OscillatorState::new();
        assert!((state.next_sample(&table, &params, 48_000.0) - 0.125).abs() < 1e-7);
    }

    #[test]
    fn empty_table_is_silent() {
        let table = create_empty_wavetable("empty", 256).unwrap();
        let mut state = OscillatorState::new();
        let mut buffer = [1.0f32; 64];
        state.render(&mut buffer, &table, &OscillatorParams::DEFAULT, 48_000.0, None);
        assert!(buffer.iter().all(|&s| s == 0.0));
        assert!(state.phase() > 0.0);
    }

    #[test]
    fn block_matches_single_samples() {
        let table = Wavetable::from_frames(
            "two",
            vec![
                (0..256).map(|i| (TAU * i as f32 / 256.0).sin()).collect(),
                (0..256).map(|i| i as f32 / 128.0 - 1.0).collect(),
            ],
        )
        .unwrap()
        .with_mipmaps(48_000.0);
        let params = OscillatorParams {
            frequency: 1234.5,
            frame_position: 0.3,
            ..OscillatorParams::DEFAULT
        };

        let mut single = OscillatorState::new();
        let expected: Vec<f32> = (0..300).map(|_| single.next_sample(&table, &params, 48_000.0)).collect();

        let mut block = OscillatorState::new();
        let mut actual = vec![0.0; 300];
        block.render(&mut actual[..100], &table, &params, 48_000.0, None);
        block.render(&mut actual[100..], &table, &params, 48_000.0, None);

        assert_eq!(expected, actual);
        assert_eq!(single, block);
    }

    #[test]
    fn frame_modulation_is_clamped() {
        let table = Wavetable::from_frames("steps", vec![vec![0.0; 8], vec![1.0; 8]]).unwrap();
        let params = OscillatorParams {
            frame_position: 0.5,
            ..OscillatorParams::DEFAULT
        };
        let modulation = [-1.0, 0.0, 0.25, 2.0];
        let mut out = [0.0; 4];
        let mut state = OscillatorState::new();
        state.render(&mut out, &table, &params, 48_000.0, Some(&modulation));
        assert_eq!(out, [0.0, 0.5, 0.75, 1.0]);
        assert_eq!(state.frame_position(), 1.0);
    }

    #[test]
    fn phase_bias_does_not_stick() {
        let table = sine_table(256);
        let params = OscillatorParams::DEFAULT;
        let mut biased = OscillatorState::new();
        let mut plain = OscillatorState::new();

        let a = biased.next_sample_with_phase_bias(&table, &params, 48_000.0, 0.25);
        plain.next_sample(&table, &params, 48_000.0);

        assert!((a - 1.0).abs() < 1e-6, "quarter-cycle bias should read the peak, got {a}");
        assert_eq!(biased.phase(), plain.phase());
    }

    #[test]
    fn phase_offset_shifts_read_position() {
        let table = sine_table(256);
        let params = OscillatorParams {
            phase_offset: 0.25,
            ..OscillatorParams::DEFAULT
        };
        let mut state = OscillatorState::new();
        let v = state.next_sample(&table, &params, 48_000.0);
        assert!((v - 1.0).abs() < 1e-6, "got {v}");
    }

    #[test]
    fn mipmaps_can_be_bypassed() {
        let saw: Vec<f32> = (0..2048).map(|i| i as f32 / 1024.0 - 1.0).collect();
        let table = create_single_frame_wavetable("saw", saw).unwrap().with_mipmaps(48_000.0);
        let high = OscillatorParams {
            frequency: 6_000.0,
            ..OscillatorParams::DEFAULT
        };
        let raw = OscillatorParams {
            use_mipmaps: false,
            ..high
        };

        let mut a = OscillatorState::new();
        let mut b = OscillatorState::new();
        let mipped: Vec<f32> = (0..64).map(|_| a.next_sample(&table, &high, 48_000.0)).collect();
        let plain: Vec<f32> = (0..64).map(|_| b.next_sample(&table, &raw, 48_000.0)).collect();
        assert_ne!(mipped, plain);
    }

    #[test]
    fn mipmapped_frames_are_blended() {
        let frames = (0..4).map(|level| vec![level as f32; 256]).collect();
        let table = Wavetable::from_frames("steps", frames).unwrap().with_mipmaps(48_000.0);
        let params = OscillatorParams {
            frequency: 5_000.0,
            frame_position: 0.5,
            use_mipmaps: true,
            ..OscillatorParams::DEFAULT
        };
        let mut state = OscillatorState::with_phase(0.3);
        for _ in 0..16 {
            let v = state.next_sample(&table, &params, 48_000.0);
            assert!((v - 1.5).abs() < 1e-5, "got {v}");
        }
    }

    #[test]
    fn mipmapped_read_uses_the_selected_level() {
        let saw: Vec<f32> = (0..2048).map(|i| i as f32 / 1024.0 - 1.0).collect();
        let table = create_single_frame_wavetable("saw", saw).unwrap().with_mipmaps(48_000.0);
        let params = OscillatorParams {
            frequency: 6_000.0,
            ..OscillatorParams::DEFAULT
        };

        let pyramid = table.mipmaps().unwrap().pyramid(0).unwrap();
        let selected = pyramid.select_level(6_000.0, 48_000.0);
        assert!(selected > 0);
        let level = pyramid.level(selected);

        let mut state = OscillatorState::with_phase(0.37);
        let phase = state.phase();
        let actual = state.next_sample(&table, &params, 48_000.0);

        let index = phase * 2048.0;
        let scaled = index * level.len() as f32 / 2048.0;
        let expected = interpolate_sample(level.samples(), scaled, params.sample_interpolation);
        assert!((actual - expected).abs() < 1e-6, "{actual} vs {expected}");
    }

    #[test]
    fn wrap_phase_folds_into_range() {
        assert_eq!(wrap_phase(1.0), 0.0);
        assert!((wrap_phase(1.25) - 0.25).abs() < 1e-7);
        assert!((wrap_phase(-0.25) - 0.75).abs() < 1e-7);
        assert_eq!(wrap_phase(-1e-9), 0.0);
    }
}
