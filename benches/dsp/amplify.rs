//! Benchmarks for equal-power pan.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_wavetable::dsp::amplify;

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        // Pre-allocate buffers
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("pan_in_place", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&signal);
                amplify::pan_in_place(black_box(&mut left), black_box(&mut right), black_box(0.3))
            })
        });

        // cos/sin once per block, then two multiply-adds per sample
        group.bench_with_input(BenchmarkId::new("pan_into", size), &size, |b, _| {
            b.iter(|| {
                amplify::pan_into(
                    black_box(&signal),
                    black_box(0.3),
                    black_box(0.5),
                    black_box(&mut left),
                    black_box(&mut right),
                )
            })
        });
    }

    group.finish();
}
