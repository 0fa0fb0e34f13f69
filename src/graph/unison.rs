use std::sync::Arc;

use crate::dsp::amplify::pan_into;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::wavetable::WavetableNode;
use crate::wavetable::Wavetable;
use crate::MAX_BLOCK_SIZE;

/*
Unison
======

Several copies of one wavetable voice, slightly detuned against each other,
summed into one signal. The beating between copies is the "supersaw" width.

    voice   offset    detune (spread = 20 cents)
    -----   ------    ------
      0     -1.0      -10 cents     pan -width
      1      0.0        0 cents     pan  0
      2     +1.0      +10 cents     pan +width

Offsets are spaced evenly in [-1, 1], so the detune is symmetric around the
note and the average pitch stays put. A single voice sits at offset 0.

Start phases are spread too (voice i starts at i / N). Identical start phases
make the voices cancel and reinforce in lockstep at note-on, which is heard
as a thump before the chorus settles in.

The sum is scaled by 1 / sqrt(N): uncorrelated voices add in power, not
amplitude, so this keeps the loudness roughly constant as voices are added.

Every voice reads the same Arc<Wavetable>. Scratch buffers are allocated once
at construction, sized to MAX_BLOCK_SIZE; longer blocks are rendered in
chunks.
*/

pub struct UnisonNode {
    voices: Vec<WavetableNode>,
    offsets: Vec<f32>,
    spread_cents: f32,
    /// How far the outer voices are panned, 0.0 (mono) to 1.0 (hard L/R).
    stereo_width: f32,
    scratch: Vec<f32>,
}

impl UnisonNode {
    /// `voice_count` is raised to at least 1.
    pub fn new(table: Arc<Wavetable>, voice_count: usize, spread_cents: f32) -> Self {
        let count = voice_count.max(1);
        let offsets: Vec<f32> = (0..count).map(|i| voice_offset(i, count)).collect();
        let voices = offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| {
                WavetableNode::new(table.clone())
                    .with_detune(offset * spread_cents * 0.5)
                    .with_start_phase(i as f32 / count as f32)
            })
            .collect();

        Self {
            voices,
            offsets,
            spread_cents,
            stereo_width: 0.0,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn with_stereo_width(mut self, width: f32) -> Self {
        self.stereo_width = width.clamp(0.0, 1.0);
        self
    }

    pub fn with_frame_position(mut self, position: f32) -> Self {
        self.set_frame_position(position);
        self
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn spread_cents(&self) -> f32 {
        self.spread_cents
    }

    pub fn voices(&self) -> &[WavetableNode] {
        &self.voices
    }

    pub fn set_frame_position(&mut self, position: f32) {
        for voice in &mut self.voices {
            voice.set_frame_position(position);
        }
    }

    /// Change the total detune spread, keeping each voice's place in it.
    pub fn set_spread(&mut self, spread_cents: f32) {
        self.spread_cents = spread_cents;
        for (voice, &offset) in self.voices.iter_mut().zip(&self.offsets) {
            voice.set_detune(offset * spread_cents * 0.5);
        }
    }

    #[inline]
    fn level(&self) -> f32 {
        1.0 / (self.voices.len() as f32).sqrt()
    }
}

/// Evenly spaced position in [-1, 1]; a lone voice sits at 0.
fn voice_offset(index: usize, count: usize) -> f32 {
    if count < 2 {
        0.0
    } else {
        2.0 * index as f32 / (count - 1) as f32 - 1.0
    }
}

impl GraphNode for UnisonNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let level = self.level();
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            chunk.fill(0.0);
            let scratch = &mut self.scratch[..chunk.len()];
            for voice in &mut self.voices {
                voice.render_block(scratch, ctx);
                for (o, s) in chunk.iter_mut().zip(scratch.iter()) {
                    *o += s * level;
                }
            }
        }
    }

    fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        debug_assert_eq!(left.len(), right.len());
        let level = self.level();
        for (l_chunk, r_chunk) in left
            .chunks_mut(MAX_BLOCK_SIZE)
            .zip(right.chunks_mut(MAX_BLOCK_SIZE))
        {
            l_chunk.fill(0.0);
            r_chunk.fill(0.0);
            let scratch = &mut self.scratch[..l_chunk.len()];
            for (voice, &offset) in self.voices.iter_mut().zip(&self.offsets) {
                voice.render_block(scratch, ctx);
                pan_into(scratch, offset * self.stereo_width, level, l_chunk, r_chunk);
            }
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        for voice in &mut self.voices {
            voice.note_on(ctx);
        }
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        for voice in &mut self.voices {
            voice.note_off(ctx);
        }
    }
}
