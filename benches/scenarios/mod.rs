//! Real-world scenario benchmarks.
//!
//! Graph nodes as an instrument would use them: stacked voices and
//! two-oscillator modulation.

mod voices;

pub use voices::bench_voices;
