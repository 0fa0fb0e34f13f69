//! Operators that combine two oscillators.

use crate::dsp::oscillator::OscillatorState;

/*
Oscillator Modulation
=====================

Two oscillators, a CARRIER (the one you hear) and a MODULATOR (the one doing
the shaping), combined sample by sample. All of these run at audio rate.

Vocabulary
----------

  carrier     The signal being modulated.
  modulator   The controlling signal, bipolar [-1, +1] unless noted.
  depth       0.0 = no effect (dry carrier), 1.0 = full effect.
  ratio       Modulator-to-carrier frequency ratio, used to scale FM index.
  bipolar     Swings -1 to +1.
  unipolar    Swings 0 to 1.   unipolar = (bipolar + 1) / 2


FM (phase modulation flavour)
-----------------------------

    read_phase = carrier_phase + modulator * depth * ratio

The modulator nudges WHERE the carrier reads, not the carrier's stored phase.
Feed the result to `OscillatorState::next_sample_with_phase_bias`. Sidebands
appear at carrier +/- n * modulator.


RM (ring modulation)
--------------------

    out = carrier * (1 - depth) + (carrier * modulator) * depth

A dry/wet blend between the carrier and the product. The product of two sines
contains only their sum and difference frequencies:

    sin(A) * sin(B) = 1/2 [cos(A - B) - cos(A + B)]

which is why ring mod sounds metallic.


AM (amplitude modulation)
-------------------------

    out = carrier * (1 - depth + depth * unipolar(modulator))

The modulator is shifted to unipolar first so the carrier is attenuated, never
inverted. Unlike RM, the carrier frequency survives in the output.


Hard Sync
---------

Every time the MASTER wraps from ~1.0 back to ~0.0, the SLAVE's phase is
forced to 0. The slave's own frequency then only shapes the waveform inside
one master cycle, which gives the classic tearing sync sweep.

A wrap is detected as the master's phase going DOWN between two samples.
This only touches the slave's state.
*/

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Phase at which the carrier should read this sample.
#[inline]
pub fn apply_fm(carrier_phase: f32, modulator: f32, depth: f32, ratio: f32) -> f32 {
    carrier_phase + modulator * depth * ratio
}

/// Dry/wet blend between the carrier and the ring-modulated product.
#[inline]
pub fn apply_rm(carrier: f32, modulator: f32, depth: f32) -> f32 {
    carrier * (1.0 - depth) + (carrier * modulator) * depth
}

/// Tremolo-style amplitude modulation with a bipolar modulator.
#[inline]
pub fn apply_am(carrier: f32, modulator: f32, depth: f32) -> f32 {
    carrier * (1.0 - depth + depth * bipolar_to_unipolar(modulator))
}

/// Reset `slave` to phase 0 if the master wrapped since the previous sample.
///
/// Returns `true` when a reset happened.
#[inline]
pub fn hard_sync(master_phase: f32, previous_master_phase: f32, slave: &mut OscillatorState) -> bool {
    if master_phase < previous_master_phase {
        slave.set_phase(0.0);
        true
    } else {
        false
    }
}
