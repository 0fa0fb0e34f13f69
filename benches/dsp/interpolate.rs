//! Benchmarks for the sample interpolation kernels.
//!
//! One "block" here is `size` fractional reads walking through a 2048-sample
//! frame at a non-integer stride, which is what the oscillator does per
//! frame it blends.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_wavetable::dsp::interpolate::{interpolate_sample, SampleInterpolation};
use saavy_wavetable::synthesis::{generate_waveform, Waveform};

use crate::BLOCK_SIZES;

pub fn bench_interpolate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/interpolate");
    let frame = generate_waveform(Waveform::Saw, 2048, 64);
    // 440 Hz at 48 kHz through a 2048-sample frame
    let stride = 2048.0 * 440.0 / 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for mode in SampleInterpolation::ALL {
            let name = format!("{mode:?}").to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for (i, out) in buffer.iter_mut().enumerate() {
                        *out = interpolate_sample(
                            black_box(&frame),
                            black_box(i as f32 * stride),
                            mode,
                        );
                    }
                })
            });
        }
    }

    group.finish();
}
