//! Owned wavetable data: frames, metadata and the optional mip-map cache.
//!
//! A [`Wavetable`] is built once off the audio thread, then shared read-only
//! (usually behind an `Arc`) by every voice that plays it. Nothing in the
//! playback path takes `&mut Wavetable`; transforms such as
//! [`utilities::normalize`] return a new table.

pub mod utilities;

use crate::dsp::mipmap::MipMaps;
use crate::error::{Result, WavetableError};

/// Frame length used when a table is created without frames to infer it from.
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// One cycle of audio.
#[derive(Debug, Clone, PartialEq)]
pub struct WavetableFrame {
    samples: Vec<f32>,
    index: usize,
    name: Option<String>,
}

impl WavetableFrame {
    pub fn new(index: usize, samples: Vec<f32>) -> Self {
        Self {
            samples,
            index,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Peak absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    /// Same frame with every sample passed through `f`.
    pub(crate) fn map(&self, f: impl FnMut(f32) -> f32) -> Self {
        Self {
            samples: self.samples.iter().copied().map(f).collect(),
            index: self.index,
            name: self.name.clone(),
        }
    }

    pub(crate) fn with_samples(&self, samples: Vec<f32>) -> Self {
        Self {
            samples,
            index: self.index,
            name: self.name.clone(),
        }
    }
}

/// Optional descriptive fields carried along with a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WavetableMetadata {
    pub author: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

/// An ordered stack of equal-length frames.
///
/// Frame order is morph order: frame position 0.0 plays `frames[0]`, 1.0
/// plays the last frame.
#[derive(Debug, Clone)]
pub struct Wavetable {
    id: String,
    name: String,
    frames: Vec<WavetableFrame>,
    frame_size: usize,
    metadata: WavetableMetadata,
    sample_rate: Option<f32>,
    mipmaps: Option<MipMaps>,
}

fn check_frame_size(frame_size: usize) -> Result<()> {
    if frame_size == 0 || !frame_size.is_power_of_two() {
        return Err(WavetableError::InvalidFrameSize(frame_size));
    }
    Ok(())
}

impl Wavetable {
    /// Build a table from raw frame buffers.
    ///
    /// Every buffer must have the same power-of-two length. An empty list is
    /// accepted and produces a silent table of [`DEFAULT_FRAME_SIZE`].
    pub fn from_frames(name: impl Into<String>, frames: Vec<Vec<f32>>) -> Result<Self> {
        let frame_size = frames.first().map_or(DEFAULT_FRAME_SIZE, Vec::len);
        check_frame_size(frame_size)?;

        for (index, frame) in frames.iter().enumerate() {
            if frame.len() != frame_size {
                return Err(WavetableError::FrameSizeMismatch {
                    index,
                    expected: frame_size,
                    actual: frame.len(),
                });
            }
        }

        let frames = frames
            .into_iter()
            .enumerate()
            .map(|(index, samples)| WavetableFrame::new(index, samples))
            .collect();

        Ok(Self::assemble(name.into(), frames, frame_size))
    }

    /// Slice a raw multi-cycle recording into `frame_count` frames of
    /// `frame_size` samples each.
    ///
    /// This is the hand-off point for importers: they work out the layout,
    /// this checks it. Trailing samples beyond `frame_size * frame_count` are
    /// ignored.
    pub fn from_interleaved(
        name: impl Into<String>,
        samples: &[f32],
        frame_size: usize,
        frame_count: usize,
    ) -> Result<Self> {
        check_frame_size(frame_size)?;

        let required = frame_size
            .checked_mul(frame_count)
            .ok_or(WavetableError::LayoutOverflow {
                frame_size,
                frame_count,
            })?;
        if samples.len() < required {
            return Err(WavetableError::InsufficientSamples {
                frame_size,
                frame_count,
                required,
                available: samples.len(),
            });
        }

        let frames = samples[..required]
            .chunks_exact(frame_size)
            .enumerate()
            .map(|(index, chunk)| WavetableFrame::new(index, chunk.to_vec()))
            .collect();

        Ok(Self::assemble(name.into(), frames, frame_size))
    }

    fn assemble(name: String, frames: Vec<WavetableFrame>, frame_size: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            frames,
            frame_size,
            metadata: WavetableMetadata::default(),
            sample_rate: None,
            mipmaps: None,
        }
    }

    pub fn with_metadata(mut self, metadata: WavetableMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    /// Attach names to frames, in order. Extra names are ignored.
    pub fn with_frame_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        for (frame, name) in self.frames.iter_mut().zip(names) {
            frame.name = Some(name.into());
        }
        self
    }

    /// Same table with a freshly built mip-map cache for `sample_rate`.
    ///
    /// Not realtime-safe. Build before handing the table to any voice.
    pub fn with_mipmaps(mut self, sample_rate: f32) -> Self {
        self.mipmaps = Some(MipMaps::build(&self.frames, sample_rate));
        self.sample_rate = Some(sample_rate);
        self
    }

    /// Drop the mip-map cache.
    pub fn without_mipmaps(mut self) -> Self {
        self.mipmaps = None;
        self
    }

    /// Same identity and metadata, new frame content.
    ///
    /// Any mip-map cache is rebuilt at its original sample rate so it never
    /// describes stale frames.
    pub(crate) fn replace_frames(&self, frames: Vec<WavetableFrame>, frame_size: usize) -> Self {
        let mipmaps = self
            .mipmaps
            .as_ref()
            .map(|m| MipMaps::build(&frames, m.sample_rate()));
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            frames,
            frame_size,
            metadata: self.metadata.clone(),
            sample_rate: self.sample_rate,
            mipmaps,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn frames(&self) -> &[WavetableFrame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&WavetableFrame> {
        self.frames.get(index)
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn metadata(&self) -> &WavetableMetadata {
        &self.metadata
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.sample_rate
    }

    #[inline]
    pub fn has_mipmaps(&self) -> bool {
        self.mipmaps.is_some()
    }

    #[inline]
    pub fn mipmaps(&self) -> Option<&MipMaps> {
        self.mipmaps.as_ref()
    }
}

/// A table with no frames. Plays silence until frames are authored.
pub fn create_empty_wavetable(name: impl Into<String>, frame_size: usize) -> Result<Wavetable> {
    check_frame_size(frame_size)?;
    Ok(Wavetable::assemble(name.into(), Vec::new(), frame_size))
}

/// A one-frame table wrapping a single cycle.
pub fn create_single_frame_wavetable(name: impl Into<String>, samples: Vec<f32>) -> Result<Wavetable> {
    Wavetable::from_frames(name, vec![samples])
}
