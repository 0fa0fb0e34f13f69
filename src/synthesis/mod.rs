//! Frame authoring: canonical shapes, additive partials and parametric tables.
//!
//! Everything here allocates and runs off the audio thread. The output is
//! plain frame data or a finished [`Wavetable`](crate::wavetable::Wavetable)
//! ready for `with_mipmaps`.

/// Multi-frame generators (morph, PWM, detuned stack, vowels).
pub mod tables;
/// Single-cycle shapes and harmonic-series synthesis.
pub mod waveforms;

pub use tables::{basic_shapes_table, detuned_stack_table, morph_table, pwm_table, vowel_table};
pub use waveforms::{from_harmonics, generate_waveform, Harmonic, Waveform, DEFAULT_MAX_HARMONICS};
