//! Waveform thumbnails of whole tracks.
//!
//! The track is decoded once, folded to mono and reduced to min/max peak
//! pairs per block of frames. Those peaks are re-bucketed to the image width
//! and drawn as one vertical line per pixel column, the same min/max shape a
//! plotted amplitude-over-time curve has when squeezed to a thumbnail.

use std::fs::{self, File};
use std::io::BufReader;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use image::{ImageFormat, Rgba, RgbaImage};
use rodio::{Decoder, Source};

use crate::config::{WaveformSettings, parse_hex_color};

/// Frames folded into one peak pair while decoding.
const FRAMES_PER_BLOCK: usize = 512;

const DEFAULT_COLOR: [u8; 3] = [0, 0, 255];

static NEXT_TMP: AtomicU64 = AtomicU64::new(0);

/// Held while deciding whether to replace an output file and replacing it.
static PUBLISH: Mutex<()> = Mutex::new(());

#[derive(Debug, thiserror::Error)]
pub enum WaveformError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("{0} contains no samples")]
    Empty(String),

    #[error("cannot encode waveform image: {0}")]
    Image(#[from] image::ImageError),

    #[error("cannot write waveform image: {0}")]
    Io(#[from] std::io::Error),

    #[error("waveform for {0} no longer wanted")]
    Superseded(String),
}

/// A rendered thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Image file that was written.
    pub image: PathBuf,
    /// Normalised peak magnitude (0..=1) of every pixel column.
    pub columns: Vec<f32>,
}

/// Produces a waveform image for an audio file.
pub trait WaveformRenderer: Send + Sync {
    /// Render `audio`. The output is only replaced while `current()` holds;
    /// otherwise the result is `WaveformError::Superseded`.
    fn render(&self, audio: &Path, current: &dyn Fn() -> bool) -> Result<Waveform, WaveformError>;
}

/// Renders transparent PNG thumbnails to a fixed output path.
#[derive(Debug, Clone)]
pub struct PngWaveform {
    output: PathBuf,
    width: u32,
    height: u32,
    color: [u8; 3],
}

impl PngWaveform {
    pub fn new(output: impl Into<PathBuf>, width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            output: output.into(),
            width: width.max(1),
            height: height.max(1),
            color,
        }
    }

    /// Build a renderer from settings, or `None` when thumbnails are disabled.
    pub fn from_settings(settings: &WaveformSettings) -> Option<Self> {
        if !settings.enabled {
            return None;
        }
        let color = parse_hex_color(&settings.color).unwrap_or(DEFAULT_COLOR);
        Some(Self::new(
            settings.output.clone(),
            settings.width,
            settings.height,
            color,
        ))
    }

    /// Encode `peaks` and atomically replace the output file with the result,
    /// unless `current()` turned false in the meantime.
    fn write_png(&self, peaks: &[(f32, f32)], current: &dyn Fn() -> bool) -> Result<(), WaveformError> {
        let img = draw(peaks, self.width, self.height, self.color);

        let dir = self
            .output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        if let Some(dir) = &dir {
            fs::create_dir_all(dir)?;
        }

        let file_name = self
            .output
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("waveform.png");
        let tmp_name = format!(
            ".{file_name}.{}.{}.tmp",
            std::process::id(),
            NEXT_TMP.fetch_add(1, Ordering::Relaxed)
        );
        let tmp = dir.map_or_else(|| PathBuf::from(&tmp_name), |d| d.join(&tmp_name));

        if let Err(e) = img.save_with_format(&tmp, ImageFormat::Png) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        // A newer job that already published must win, so the check and the
        // rename happen under one lock.
        let _publish = PUBLISH.lock().unwrap_or_else(|p| p.into_inner());
        if !current() {
            let _ = fs::remove_file(&tmp);
            return Err(WaveformError::Superseded(self.output.display().to_string()));
        }
        if let Err(e) = fs::rename(&tmp, &self.output) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl WaveformRenderer for PngWaveform {
    fn render(&self, audio: &Path, current: &dyn Fn() -> bool) -> Result<Waveform, WaveformError> {
        let file = File::open(audio).map_err(|source| WaveformError::Open {
            path: audio.display().to_string(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| WaveformError::Decode {
            path: audio.display().to_string(),
            reason: e.to_string(),
        })?;

        let channels = usize::from(decoder.channels()).max(1);
        let block_peaks = mono_peaks(decoder, channels, FRAMES_PER_BLOCK);
        if block_peaks.is_empty() {
            return Err(WaveformError::Empty(audio.display().to_string()));
        }

        if !current() {
            return Err(WaveformError::Superseded(audio.display().to_string()));
        }

        let peaks = normalize(resample_peaks(&block_peaks, self.width as usize));
        self.write_png(&peaks, current)?;

        log::debug!(
            "rendered waveform for {} into {}",
            audio.display(),
            self.output.display()
        );

        Ok(Waveform {
            image: self.output.clone(),
            columns: peaks.iter().map(|&(lo, hi)| lo.abs().max(hi.abs())).collect(),
        })
    }
}

/// Fold interleaved samples to mono and keep the min/max of every `block` frames.
/// A trailing partial frame is dropped.
fn mono_peaks<I>(samples: I, channels: usize, block: usize) -> Vec<(f32, f32)>
where
    I: IntoIterator<Item = f32>,
{
    let channels = channels.max(1);
    let block = block.max(1);

    let mut peaks = Vec::new();
    let mut frame_sum = 0.0_f32;
    let mut in_frame = 0;
    let mut in_block = 0;
    let (mut lo, mut hi) = (f32::INFINITY, f32::NEG_INFINITY);

    for sample in samples {
        frame_sum += sample;
        in_frame += 1;
        if in_frame < channels {
            continue;
        }

        let mono = frame_sum / channels as f32;
        frame_sum = 0.0;
        in_frame = 0;

        lo = lo.min(mono);
        hi = hi.max(mono);
        in_block += 1;
        if in_block == block {
            peaks.push((lo, hi));
            in_block = 0;
            (lo, hi) = (f32::INFINITY, f32::NEG_INFINITY);
        }
    }

    if in_block > 0 {
        peaks.push((lo, hi));
    }
    peaks
}

/// Index range of `len` source items that feeds output bucket `i` of `width`.
/// Buckets never come out empty: with fewer items than buckets, items repeat.
fn bucket_range(i: usize, width: usize, len: usize) -> Range<usize> {
    let start = (i * len / width).min(len.saturating_sub(1));
    let end = ((i + 1) * len / width).clamp(start + 1, len);
    start..end
}

/// Re-bucket peak pairs to exactly `width` columns.
fn resample_peaks(peaks: &[(f32, f32)], width: usize) -> Vec<(f32, f32)> {
    if peaks.is_empty() {
        return vec![(0.0, 0.0); width];
    }

    (0..width)
        .map(|i| {
            peaks[bucket_range(i, width, peaks.len())]
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &(l, h)| {
                    (lo.min(l), hi.max(h))
                })
        })
        .collect()
}

/// Scale so the loudest peak reaches full height; silence stays silent.
fn normalize(peaks: Vec<(f32, f32)>) -> Vec<(f32, f32)> {
    let loudest = peaks
        .iter()
        .map(|&(lo, hi)| lo.abs().max(hi.abs()))
        .fold(0.0_f32, f32::max);
    if loudest <= f32::EPSILON {
        return peaks;
    }
    peaks
        .into_iter()
        .map(|(lo, hi)| (lo / loudest, hi / loudest))
        .collect()
}

/// Row for amplitude `v` (-1..=1), with +1 at the top edge.
fn amplitude_row(v: f32, height: u32) -> u32 {
    let mid = (height - 1) as f32 / 2.0;
    (mid - v.clamp(-1.0, 1.0) * mid).round() as u32
}

fn draw(peaks: &[(f32, f32)], width: u32, height: u32, color: [u8; 3]) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    let pixel = Rgba([color[0], color[1], color[2], 255]);

    for (x, &(lo, hi)) in peaks.iter().enumerate().take(width as usize) {
        let top = amplitude_row(hi, height);
        let bottom = amplitude_row(lo, height);
        for y in top.min(bottom)..=bottom.max(top) {
            img.put_pixel(x as u32, y, pixel);
        }
    }
    img
}

/// Reduce columns to `width` sparkline bars on a 0..=100 scale.
pub fn sparkline_bars(columns: &[f32], width: usize) -> Vec<u64> {
    if columns.is_empty() || width == 0 {
        return Vec::new();
    }

    (0..width)
        .map(|i| {
            let peak = columns[bucket_range(i, width, columns.len())]
                .iter()
                .fold(0.0_f32, |acc, &c| acc.max(c));
            (peak.clamp(0.0, 1.0) * 100.0).round() as u64
        })
        .collect()
}
