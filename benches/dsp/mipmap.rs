//! Benchmarks for mip pyramid generation.
//!
//! Runs at load time, not per block, so sizes here are frame sizes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_wavetable::dsp::mipmap::{MipMaps, MipPyramid};
use saavy_wavetable::synthesis::{generate_waveform, vowel_table, Waveform};

const FRAME_SIZES: &[usize] = &[256, 1024, 2048, 4096];

pub fn bench_mipmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mipmap");

    for &size in FRAME_SIZES {
        let frame = generate_waveform(Waveform::Saw, size, 64);
        group.bench_with_input(BenchmarkId::new("pyramid", size), &size, |b, _| {
            b.iter(|| MipPyramid::build(black_box(&frame), black_box(48_000.0)))
        });
    }

    let table = vowel_table(2048, 64, 64).expect("valid table");
    group.bench_function("table_64x2048", |b| {
        b.iter(|| MipMaps::build(black_box(table.frames()), black_box(48_000.0)))
    });

    group.finish();
}
