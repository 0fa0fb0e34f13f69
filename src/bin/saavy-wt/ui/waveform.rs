//! Oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Draw `samples` as a line spanning the full width of `area`.
pub fn render_trace(frame: &mut Frame, area: Rect, title: &str, samples: &[f32], color: Color) {
    let block = Block::default().title(title).borders(Borders::ALL);

    let len = samples.len().max(1) as f64;
    let data: Vec<(f64, f64)> = samples
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / len, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.1, 1.1])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

/// Live output oscilloscope
pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    render_trace(frame, area, " Output ", audio_buffer, Color::Cyan);
}
