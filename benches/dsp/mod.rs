//! Benchmarks for low-level DSP primitives.

mod amplify;
mod interpolate;
mod mipmap;
mod oscillator;

pub use amplify::bench_amplify;
pub use interpolate::bench_interpolate;
pub use mipmap::bench_mipmap;
pub use oscillator::bench_oscillator;
