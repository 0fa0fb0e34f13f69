use crate::dsp::modulate::{apply_am, apply_fm, apply_rm, hard_sync};
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::wavetable::WavetableNode;

/*
Two-Oscillator Modulation
=========================

A carrier voice and a modulator voice, combined per sample by one of the
operators in `dsp::modulate`.

    mode        modulator runs at         heard
    ----        -----------------         -----
    Fm          note * ratio              carrier, phase pushed by modulator
    Ring        note * ratio              carrier * modulator, blended by depth
    Amplitude   note * ratio              carrier * (unipolar modulator)
    HardSync    note (as the master)      carrier at note * ratio, reset by master

Fm uses `apply_fm` to get the carrier's read position, then hands the
difference to the carrier as a one-sample phase bias. The carrier's own phase
keeps advancing at its normal rate, so FM never detunes the note.

HardSync flips the roles of pitch: the master runs at the played note so the
perceived pitch follows the keyboard, and the carrier (slave) runs `ratio`
times faster. Sweeping `ratio` above 1.0 gives the classic sync tear.

Both voices are WavetableNodes, so each can use its own table. Their fixed
frequencies (if any) are ignored here; the pair decides both pitches.
*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ModMode {
    /// Phase modulation, `depth` in cycles per unit of modulator.
    Fm { depth: f32 },
    /// Ring modulation blended with the dry carrier (0.0 = dry, 1.0 = full).
    Ring { depth: f32 },
    /// Tremolo-style amplitude modulation (0.0 = dry, 1.0 = full).
    Amplitude { depth: f32 },
    /// Modulator is the master, carrier is reset on each master wrap.
    HardSync,
}

pub struct ModPair {
    carrier: WavetableNode,
    modulator: WavetableNode,
    mode: ModMode,
    ratio: f32,
}

impl ModPair {
    pub fn new(carrier: WavetableNode, modulator: WavetableNode, mode: ModMode) -> Self {
        Self {
            carrier,
            modulator,
            mode,
            ratio: 1.0,
        }
    }

    /// Frequency ratio between the two voices (see the table above).
    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn mode(&self) -> ModMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ModMode) {
        self.mode = mode;
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio;
    }

    pub fn carrier(&self) -> &WavetableNode {
        &self.carrier
    }

    pub fn modulator(&self) -> &WavetableNode {
        &self.modulator
    }

    #[inline]
    fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        let sr = ctx.sample_rate;
        let note = ctx.frequency;

        match self.mode {
            ModMode::Fm { depth } => {
                let m = self.modulator.tick(note * self.ratio, sr, 0.0);
                let phase = self.carrier.state().phase();
                let bias = apply_fm(phase, m, depth, self.ratio) - phase;
                self.carrier.tick(note, sr, bias)
            }
            ModMode::Ring { depth } => {
                let m = self.modulator.tick(note * self.ratio, sr, 0.0);
                let c = self.carrier.tick(note, sr, 0.0);
                apply_rm(c, m, depth)
            }
            ModMode::Amplitude { depth } => {
                let m = self.modulator.tick(note * self.ratio, sr, 0.0);
                let c = self.carrier.tick(note, sr, 0.0);
                apply_am(c, m, depth)
            }
            ModMode::HardSync => {
                let prev = self.modulator.state().phase();
                self.modulator.tick(note, sr, 0.0);
                let master = self.modulator.state().phase();
                hard_sync(master, prev, self.carrier.state_mut());
                self.carrier.tick(note * self.ratio, sr, 0.0)
            }
        }
    }
}

impl GraphNode for ModPair {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(ctx);
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.carrier.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.carrier.note_off(ctx);
        self.modulator.note_off(ctx);
    }

    fn pan(&self) -> f32 {
        self.carrier.pan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::{generate_waveform, Waveform};
    use crate::wavetable::{create_single_frame_wavetable, Wavetable};
    use std::sync::Arc;

    fn table(samples: Vec<f32>) -> Arc<Wavetable> {
        Arc::new(create_single_frame_wavetable("t", samples).unwrap())
    }

    fn sine() -> WavetableNode {
        WavetableNode::new(table(generate_waveform(Waveform::Sine, 1024, 1)))
    }

    fn dc(level: f32) -> WavetableNode {
        WavetableNode::new(table(vec![level; 64]))
    }

    fn render(pair: &mut ModPair, n: usize) -> Vec<f32> {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 100.0);
        let mut out = vec![0.0; n];
        pair.render_block(&mut out, &ctx);
        out
    }

    #[test]
    fn zero_depth_fm_is_the_dry_carrier() {
        let mut pair = ModPair::new(sine(), sine(), ModMode::Fm { depth: 0.0 }).with_ratio(2.0);
        let mut dry = sine();
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 100.0);
        let mut expected = vec![0.0; 64];
        dry.render_block(&mut expected, &ctx);
        let actual = render(&mut pair, 64);
        for (a, e) in actual.iter().zip(&expected) {
            assert!((a - e).abs() < 1e-6, "{a} vs {e}");
        }
    }

    #[test]
    fn fm_does_not_move_carrier_phase() {
        let mut pair = ModPair::new(sine(), dc(1.0), ModMode::Fm { depth: 0.25 });
        let out = render(&mut pair, 1);
        // constant modulator of 1.0 pushes the read a quarter cycle ahead
        assert!((out[0] - 1.0).abs() < 1e-5, "got {}", out[0]);
        assert!((pair.carrier().state().phase() - 440.0 / 48_000.0).abs() < 1e-7);
    }

    #[test]
    fn ring_full_depth_multiplies() {
        let mut pair = ModPair::new(dc(0.5), dc(-0.5), ModMode::Ring { depth: 1.0 });
        let out = render(&mut pair, 8);
        assert!(out.iter().all(|&s| (s + 0.25).abs() < 1e-6), "{out:?}");
    }

    #[test]
    fn amplitude_uses_unipolar_modulator() {
        let mut pair = ModPair::new(dc(0.8), dc(-1.0), ModMode::Amplitude { depth: 1.0 });
        let out = render(&mut pair, 8);
        assert!(out.iter().all(|&s| s.abs() < 1e-6), "{out:?}");
    }

    #[test]
    fn hard_sync_resets_carrier_on_master_wrap() {
        let mut pair = ModPair::new(sine(), sine(), ModMode::HardSync).with_ratio(2.7);
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 100.0);
        let mut wrapped = false;
        let mut buf = [0.0];
        for _ in 0..200 {
            let before = pair.modulator().state().phase();
            pair.render_block(&mut buf, &ctx);
            let after = pair.modulator().state().phase();
            if after < before {
                // the carrier restarted at 0 then advanced one step
                let expected = 440.0 * 2.7 / 48_000.0;
                let carrier = pair.carrier().state().phase();
                assert!((carrier - expected).abs() < 1e-5, "carrier phase {carrier}");
                wrapped = true;
            }
        }
        assert!(wrapped, "master never wrapped");
    }
}
