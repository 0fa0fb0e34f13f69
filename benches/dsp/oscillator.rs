//! Benchmarks for wavetable oscillator block rendering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_wavetable::dsp::{FrameInterpolation, OscillatorParams, OscillatorState, SampleInterpolation};
use saavy_wavetable::synthesis::{basic_shapes_table, vowel_table};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let sample_rate = 48_000.0;

    let shapes = basic_shapes_table(2048, 64)
        .expect("valid table")
        .with_mipmaps(sample_rate);
    let raw = shapes.clone().without_mipmaps();
    let vowels = vowel_table(2048, 32, 64)
        .expect("valid table")
        .with_mipmaps(sample_rate);

    let base = OscillatorParams {
        frequency: 440.0,
        frame_position: 0.4,
        ..OscillatorParams::DEFAULT
    };

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Default path: mip-mapped, cubic samples, linear frames
        let mut state = OscillatorState::new();
        group.bench_with_input(BenchmarkId::new("mipmapped_cubic", size), &size, |b, _| {
            b.iter(|| {
                state.render(black_box(&mut buffer), &shapes, black_box(&base), sample_rate, None);
            })
        });

        // No pyramid lookup
        let mut state = OscillatorState::new();
        group.bench_with_input(BenchmarkId::new("raw_cubic", size), &size, |b, _| {
            b.iter(|| {
                state.render(black_box(&mut buffer), &raw, black_box(&base), sample_rate, None);
            })
        });

        // Worst case: 8-tap sinc across 4 frames
        let heavy = OscillatorParams {
            sample_interpolation: SampleInterpolation::Sinc,
            frame_interpolation: FrameInterpolation::Cubic,
            ..base
        };
        let mut state = OscillatorState::new();
        group.bench_with_input(BenchmarkId::new("sinc_cubic_frames", size), &size, |b, _| {
            b.iter(|| {
                state.render(black_box(&mut buffer), &vowels, black_box(&heavy), sample_rate, None);
            })
        });

        // Audio-rate frame scanning
        let scan: Vec<f32> = (0..size).map(|i| i as f32 / size as f32 - 0.4).collect();
        let mut state = OscillatorState::new();
        group.bench_with_input(BenchmarkId::new("frame_scan", size), &size, |b, _| {
            b.iter(|| {
                state.render(
                    black_box(&mut buffer),
                    &vowels,
                    black_box(&base),
                    sample_rate,
                    Some(black_box(&scan)),
                );
            })
        });
    }

    group.finish();
}
