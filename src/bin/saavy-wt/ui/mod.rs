//! TUI module for saavy-wt
//!
//! Oscilloscope and spectrum of the live output, plus a picture of the frame
//! currently being played.

mod frame;
mod spectrum;
mod state;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::sync::Arc;
use std::time::Duration;

use saavy_wavetable::Wavetable;

pub use state::{ControlMessage, StatusUpdate};

use frame::render_frame;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use waveform::render_waveform;

/// Audio visualization buffer size (also the FFT length)
const VIS_BUFFER_SIZE: usize = 2048;
/// Frame-position step for one arrow key press
const NUDGE_STEP: f32 = 1.0 / 64.0;

/// Fixed facts about the session, known before the stream starts
pub struct UiConfig {
    pub table: Arc<Wavetable>,
    pub sample_rate: f32,
    pub frequency: f32,
}

/// UI application state
pub struct UiApp {
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    /// Ring buffer receiver for playback snapshots
    status_rx: Consumer<StatusUpdate>,
    /// Ring buffer sender for key commands
    control_tx: Producer<ControlMessage>,
    config: UiConfig,
    /// Latest snapshot received
    status: StatusUpdate,
    /// Audio sample buffer for visualization
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        audio_rx: Consumer<f32>,
        status_rx: Consumer<StatusUpdate>,
        control_tx: Producer<ControlMessage>,
        config: UiConfig,
        initial: StatusUpdate,
    ) -> Self {
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, config.sample_rate);
        Self {
            audio_rx,
            status_rx,
            control_tx,
            config,
            status: initial,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_status();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Pull everything the audio thread produced, keeping the newest
    /// VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let message = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('k') => ControlMessage::CycleKernel,
            KeyCode::Char('m') => ControlMessage::ToggleMipmaps,
            KeyCode::Left => ControlMessage::NudgeFrame(-NUDGE_STEP),
            KeyCode::Right => ControlMessage::NudgeFrame(NUDGE_STEP),
            KeyCode::Char(' ') => ControlMessage::ToggleSweep,
            _ => return,
        };
        if self.control_tx.push(message).is_err() {
            log::warn!("control queue full, dropped {message:?}");
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(8),    // Scope + spectrum
                Constraint::Length(10), // Current frame
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);

        self.render_status(frame, rows[0]);
        render_waveform(frame, scopes[0], &self.audio_buffer);
        render_spectrum(frame, scopes[1], self.spectrum.data());
        render_frame(frame, rows[2], &self.config.table, self.status.frame_position);

        let help = Paragraph::new(" [Q] Quit  [K] Kernel  [M] Mip-maps  [←/→] Frame  [Space] Sweep")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let table = &self.config.table;
        let frame_index = self.status.frame_position * table.frame_count().saturating_sub(1) as f32;
        let text = format!(
            " {}  |  {:.1} Hz  |  frame {:.2} / {}  |  kernel {:?}  |  mip-maps {}  |  sweep {}",
            table.name(),
            self.config.frequency,
            frame_index,
            table.frame_count().saturating_sub(1),
            self.status.kernel,
            if self.status.mipmaps { "on" } else { "off" },
            if self.status.sweeping { "on" } else { "off" },
        );
        let status = Paragraph::new(text)
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(" saavy-wt "));
        frame.render_widget(status, area);
    }
}
