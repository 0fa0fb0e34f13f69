//! Player - audio engine setup and the realtime callback

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::{Consumer, Producer, RingBuffer};
use std::f32::consts::TAU;
use std::sync::Arc;

use saavy_wavetable::{
    graph::{GraphNode, RenderCtx, WavetableNode},
    Wavetable, MAX_BLOCK_SIZE,
};

use super::ui::{ControlMessage, StatusUpdate, UiApp, UiConfig};

/// Samples buffered between the audio callback and the oscilloscope
const SAMPLE_RING_SIZE: usize = 8192;

/// Player builder
pub struct Player {
    table: Wavetable,
    frequency: f32,
    sweep_hz: f32,
    mipmaps: bool,
}

impl Player {
    pub fn new(table: Wavetable) -> Self {
        Self {
            table,
            frequency: 110.0,
            sweep_hz: 0.05,
            mipmaps: true,
        }
    }

    pub fn frequency(mut self, hz: f32) -> Self {
        self.frequency = hz;
        self
    }

    pub fn sweep_hz(mut self, hz: f32) -> Self {
        self.sweep_hz = hz.max(0.0);
        self
    }

    pub fn mipmaps(mut self, enabled: bool) -> Self {
        self.mipmaps = enabled;
        self
    }

    /// Open the default output device, start playback and hand the terminal
    /// to the UI until it quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        log::info!("output: {sample_rate} Hz, {channels} channels");

        // Pyramids are always built so the UI can toggle them live.
        let table = Arc::new(self.table.with_mipmaps(sample_rate));

        let (sample_tx, sample_rx) = RingBuffer::<f32>::new(SAMPLE_RING_SIZE);
        let (status_tx, status_rx) = RingBuffer::<StatusUpdate>::new(64);
        let (control_tx, control_rx) = RingBuffer::<ControlMessage>::new(64);

        let node = WavetableNode::new(table.clone())
            .with_frequency(self.frequency)
            .with_mipmaps(self.mipmaps);

        let mut engine = Engine {
            node,
            ctx: RenderCtx::from_freq(sample_rate, self.frequency, 100.0),
            sweep: Sweep::new(self.sweep_hz),
            control_rx,
            sample_tx,
            status_tx,
            render_buf: vec![0.0; MAX_BLOCK_SIZE],
        };

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| engine.process(data, channels),
            |err| log::error!("audio stream error: {err}"),
            None,
        )?;
        stream.play().wrap_err("failed to start audio stream")?;

        let ui_config = UiConfig {
            table,
            sample_rate,
            frequency: self.frequency,
        };
        let initial = StatusUpdate::new(self.mipmaps, self.sweep_hz > 0.0);

        let mut terminal = ratatui::init();
        let result = UiApp::new(sample_rx, status_rx, control_tx, ui_config, initial).run(&mut terminal);
        ratatui::restore();

        drop(stream);
        result
    }
}

/// Slow cosine sweep across the table, or a held position.
struct Sweep {
    rate: f32,
    phase: f32,
    enabled: bool,
    position: f32,
}

impl Sweep {
    fn new(rate: f32) -> Self {
        Self {
            rate,
            phase: 0.0,
            enabled: rate > 0.0,
            position: 0.0,
        }
    }

    /// Advance by `samples` and return the frame position for the block.
    fn advance(&mut self, samples: usize, sample_rate: f32) -> f32 {
        if self.enabled {
            self.phase = (self.phase + self.rate * samples as f32 / sample_rate).fract();
            self.position = 0.5 - 0.5 * (TAU * self.phase).cos();
        }
        self.position
    }

    fn nudge(&mut self, delta: f32) {
        self.enabled = false;
        self.position = (self.position + delta).clamp(0.0, 1.0);
    }

    fn toggle(&mut self) {
        self.enabled = !self.enabled && self.rate > 0.0;
        if self.enabled {
            // resume from where the held position sits on the cosine
            self.phase = (1.0 - 2.0 * self.position).clamp(-1.0, 1.0).acos() / TAU;
        }
    }
}

/// Everything the audio callback owns
struct Engine {
    node: WavetableNode,
    ctx: RenderCtx,
    sweep: Sweep,
    control_rx: Consumer<ControlMessage>,
    sample_tx: Producer<f32>,
    status_tx: Producer<StatusUpdate>,
    render_buf: Vec<f32>,
}

impl Engine {
    fn process(&mut self, data: &mut [f32], channels: usize) {
        self.apply_controls();

        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let position = self.sweep.advance(frames_to_render, self.ctx.sample_rate);
            self.node.set_frame_position(position);

            let block = &mut self.render_buf[..frames_to_render];
            self.node.render_block(block, &self.ctx);

            // Copy to output (mono to all channels)
            let out_off = frames_written * channels;
            for (i, &s) in block.iter().enumerate() {
                for ch in 0..channels {
                    data[out_off + i * channels + ch] = s;
                }
                // UI falls behind: drop samples rather than block
                let _ = self.sample_tx.push(s);
            }

            frames_written += frames_to_render;
        }

        let _ = self.status_tx.push(StatusUpdate {
            frame_position: self.node.params().frame_position,
            kernel: self.node.params().sample_interpolation,
            mipmaps: self.node.params().use_mipmaps,
            sweeping: self.sweep.enabled,
        });
    }

    fn apply_controls(&mut self) {
        while let Ok(message) = self.control_rx.pop() {
            match message {
                ControlMessage::CycleKernel => {
                    let next = self.node.params().sample_interpolation.next();
                    self.node.set_sample_interpolation(next);
                }
                ControlMessage::ToggleMipmaps => {
                    let enabled = self.node.params().use_mipmaps;
                    self.node.set_use_mipmaps(!enabled);
                }
                ControlMessage::NudgeFrame(delta) => self.sweep.nudge(delta),
                ControlMessage::ToggleSweep => self.sweep.toggle(),
            }
        }
    }
}
