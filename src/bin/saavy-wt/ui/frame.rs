//! Current-frame view
//!
//! Reads the table at the playing frame position, blended the same way the
//! oscillator blends it, so morphs are visible between stored frames.

use ratatui::{layout::Rect, style::Color, Frame};

use saavy_wavetable::{
    dsp::{frame::interpolate_frame, FrameInterpolation, SampleInterpolation},
    Wavetable,
};

use super::waveform::render_trace;

/// Points drawn per cycle
const FRAME_POINTS: usize = 256;

pub fn render_frame(frame: &mut Frame, area: Rect, table: &Wavetable, position: f32) {
    let step = table.frame_size() as f32 / FRAME_POINTS as f32;
    let samples: Vec<f32> = (0..FRAME_POINTS)
        .map(|i| {
            interpolate_frame(
                table,
                position,
                i as f32 * step,
                FrameInterpolation::Linear,
                SampleInterpolation::Linear,
            )
        })
        .collect();

    let title = nearest_frame_name(table, position)
        .map(|name| format!(" Frame: {name} "))
        .unwrap_or_else(|| " Frame ".to_string());

    render_trace(frame, area, &title, &samples, Color::Magenta);
}

fn nearest_frame_name(table: &Wavetable, position: f32) -> Option<&str> {
    let last = table.frame_count().checked_sub(1)?;
    let index = (position.clamp(0.0, 1.0) * last as f32).round() as usize;
    table.frame(index)?.name()
}
