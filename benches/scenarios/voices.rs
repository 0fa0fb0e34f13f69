//! Benchmarks for complete voices.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use saavy_wavetable::graph::{GraphNode, ModMode, ModPair, RenderCtx, UnisonNode, WavetableNode};
use saavy_wavetable::synthesis::{basic_shapes_table, generate_waveform, Waveform};
use saavy_wavetable::wavetable::create_single_frame_wavetable;

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::from_freq(48_000.0, 110.0, 100.0); // A2, typical bass note

    let shapes = Arc::new(
        basic_shapes_table(2048, 64)
            .expect("valid table")
            .with_mipmaps(ctx.sample_rate),
    );
    let sine = Arc::new(
        create_single_frame_wavetable("sine", generate_waveform(Waveform::Sine, 2048, 1))
            .expect("valid table")
            .with_mipmaps(ctx.sample_rate),
    );

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // === SUPERSAW ===
        // 7 detuned voices on the saw frame, spread across the stereo field
        let mut supersaw = UnisonNode::new(shapes.clone(), 7, 30.0)
            .with_frame_position(2.0 / 3.0)
            .with_stereo_width(0.8);
        supersaw.note_on(&ctx);

        group.bench_with_input(BenchmarkId::new("supersaw_stereo", size), &size, |b, _| {
            b.iter(|| {
                supersaw.render_stereo(black_box(&mut buffer), black_box(&mut right), black_box(&ctx));
            })
        });

        // === FM BELL ===
        // sine carrier, sine modulator at 3.5x
        let mut bell = ModPair::new(
            WavetableNode::new(sine.clone()),
            WavetableNode::new(sine.clone()),
            ModMode::Fm { depth: 0.3 },
        )
        .with_ratio(3.5);
        bell.note_on(&ctx);

        group.bench_with_input(BenchmarkId::new("fm_pair", size), &size, |b, _| {
            b.iter(|| {
                bell.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // === SYNC LEAD ===
        let mut sync = ModPair::new(
            WavetableNode::new(shapes.clone()).with_frame_position(2.0 / 3.0),
            WavetableNode::new(sine.clone()),
            ModMode::HardSync,
        )
        .with_ratio(2.3);
        sync.note_on(&ctx);

        group.bench_with_input(BenchmarkId::new("hard_sync", size), &size, |b, _| {
            b.iter(|| {
                sync.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
