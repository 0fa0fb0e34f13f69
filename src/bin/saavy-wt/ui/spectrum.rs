//! Spectrum analyzer widget
//!
//! Hann-windowed FFT of the output, folded into log-spaced bands. Each band
//! shows its loudest FFT bin so narrow harmonics are not averaged away.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of bands to display
const SPECTRUM_BANDS: usize = 64;
/// Lowest displayed frequency
const MIN_FREQ: f64 = 20.0;
/// Floor for the dB scale
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin range [start, end) for each band
    bands: Vec<(usize, usize)>,
    /// Current spectrum: (log10 frequency, magnitude dB)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size and must match the buffers passed to
    /// `update`.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        let window: Vec<f32> = (0..buffer_len)
            .map(|i| {
                if buffer_len > 1 {
                    let denom = (buffer_len - 1) as f32;
                    0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();

        let sr = sample_rate as f64;
        let half = (buffer_len / 2).max(1);
        let max_freq = (sr / 2.0).max(MIN_FREQ * 2.0);
        let ratio = max_freq / MIN_FREQ;
        let to_bin = |freq: f64| ((freq * buffer_len as f64 / sr).round() as usize).min(half);

        let mut bands = Vec::with_capacity(SPECTRUM_BANDS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BANDS);
        for i in 0..SPECTRUM_BANDS {
            let lo = MIN_FREQ * ratio.powf(i as f64 / SPECTRUM_BANDS as f64);
            let hi = MIN_FREQ * ratio.powf((i + 1) as f64 / SPECTRUM_BANDS as f64);
            let start = to_bin(lo).min(half - 1);
            let end = to_bin(hi).max(start + 1).min(half);
            bands.push((start, end));
            spectrum.push(((lo * hi).sqrt().log10(), FLOOR_DB));
        }

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            bands,
            spectrum,
        }
    }

    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        // Hann window halves the coherent gain
        let norm = 2.0 / (self.window.len() as f32 * 0.5);
        for ((_, db), &(start, end)) in self.spectrum.iter_mut().zip(&self.bands) {
            let peak = self.scratch[start..end]
                .iter()
                .map(|c| c.norm() * norm)
                .fold(0.0f32, f32::max);
            *db = (20.0 * (peak.max(1e-6) as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the spectrum with a log frequency axis
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let min_x = spectrum.first().map(|&(x, _)| x).unwrap_or(MIN_FREQ.log10());
    let max_x = spectrum.last().map(|&(x, _)| x).unwrap_or(4.3).max(min_x + 0.1);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 6.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
