//! saavy-wt - terminal wavetable player
//!
//! Run with: cargo run --bin saavy-wt -- --shape vowel --sweep-hz 0.1

mod app;
mod ui;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use saavy_wavetable::{
    synthesis::{
        basic_shapes_table, detuned_stack_table, generate_waveform, morph_table, pwm_table,
        vowel_table, Waveform, DEFAULT_MAX_HARMONICS,
    },
    Wavetable,
};

use app::Player;

/// Which generator builds the table
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Shape {
    /// Sine, triangle, saw, square
    Basic,
    /// Pulse width sweeping from 5% to 50%
    Pwm,
    /// Saw stack with growing spread
    Stack,
    /// A, E, I, O, U formants
    Vowel,
    /// Sine crossfading into saw
    Morph,
}

#[derive(Debug, Parser)]
#[command(name = "saavy-wt", about = "Play and inspect a wavetable in the terminal")]
struct Args {
    #[arg(long, value_enum, default_value_t = Shape::Basic)]
    shape: Shape,

    /// Frames in the table (ignored by `basic`, which always has four)
    #[arg(long, default_value_t = 64)]
    frames: usize,

    /// Samples per frame, a power of two
    #[arg(long, default_value_t = 2048)]
    frame_size: usize,

    /// Playback pitch in Hz
    #[arg(long, default_value_t = 110.0)]
    frequency: f32,

    /// Frame-position sweep rate in Hz (0 to hold still)
    #[arg(long, default_value_t = 0.05)]
    sweep_hz: f32,

    /// Play the raw frames instead of the band-limited pyramid
    #[arg(long)]
    no_mipmaps: bool,
}

fn build_table(args: &Args) -> EyreResult<Wavetable> {
    let size = args.frame_size;
    let frames = args.frames;
    let table = match args.shape {
        Shape::Basic => basic_shapes_table(size, DEFAULT_MAX_HARMONICS),
        Shape::Pwm => pwm_table(size, frames, 0.05, 0.5, DEFAULT_MAX_HARMONICS),
        Shape::Stack => detuned_stack_table(size, frames, 5, 0.02, DEFAULT_MAX_HARMONICS),
        Shape::Vowel => vowel_table(size, frames, DEFAULT_MAX_HARMONICS),
        Shape::Morph => morph_table(
            "Sine to Saw",
            &generate_waveform(Waveform::Sine, size, DEFAULT_MAX_HARMONICS),
            &generate_waveform(Waveform::Saw, size, DEFAULT_MAX_HARMONICS),
            size,
            frames,
        ),
    };
    table.wrap_err_with(|| format!("failed to build {:?} table", args.shape))
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse();
    let table = build_table(&args)?;
    log::info!(
        "built '{}': {} frames of {} samples",
        table.name(),
        table.frame_count(),
        table.frame_size()
    );

    Player::new(table)
        .frequency(args.frequency)
        .sweep_hz(args.sweep_hz)
        .mipmaps(!args.no_mipmaps)
        .run()
}
