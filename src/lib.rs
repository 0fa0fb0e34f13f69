pub mod dsp;
pub mod error;
pub mod graph; // Playable nodes built on the dsp primitives
pub mod synthesis; // Frame and table authoring
pub mod wavetable;

pub use error::WavetableError;
pub use wavetable::{create_empty_wavetable, create_single_frame_wavetable, Wavetable, WavetableFrame};

pub const MAX_BLOCK_SIZE: usize = 2048;
