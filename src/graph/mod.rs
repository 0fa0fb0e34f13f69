//! Playable nodes built on the wavetable DSP primitives.
//!
//! Graph nodes add what an instrument needs on top of a bare oscillator:
//! note events, block rendering, stereo placement and modulation hooks. Every
//! node renders without allocating once constructed.

/// Two-voice FM, ring, amplitude and hard-sync pairs.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Detuned stacks of one table.
pub mod unison;
/// A single voice over a shared wavetable.
pub mod wavetable;

pub use modulate::{ModMode, ModPair};
pub use node::{midi_note_to_freq, GraphNode, Modulatable, RenderCtx};
pub use unison::UnisonNode;
pub use wavetable::{WavetableNode, WtParam};
