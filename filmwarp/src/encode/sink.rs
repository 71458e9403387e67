use crate::decode::still::is_still_image;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::foundation::core::{Fps, FrameIndex, FrameRgb8};
use crate::foundation::error::{FilmWarpError, FilmWarpResult};
use std::path::{Path, PathBuf};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Number of frames that will be pushed.
    pub frame_count: u64,
}

/// Sink contract for consuming warped frames in output order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> FilmWarpResult<()>;
    /// Push one frame in strictly increasing output order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FilmWarpResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> FilmWarpResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRgb8)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRgb8)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FilmWarpResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FilmWarpResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FilmWarpResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Single-image writer: keeps the most recent frame and saves it through `image` on `end`.
///
/// The format follows the destination extension.
#[derive(Debug)]
pub struct ImageSink {
    path: PathBuf,
    last: Option<FrameRgb8>,
}

impl ImageSink {
    /// Create a sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: None,
        }
    }
}

impl FrameSink for ImageSink {
    fn begin(&mut self, cfg: SinkConfig) -> FilmWarpResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(FilmWarpError::validation(
                "image sink width/height must be non-zero",
            ));
        }
        image::ImageFormat::from_path(&self.path).map_err(|e| {
            FilmWarpError::io(format!(
                "cannot write image '{}': {e}",
                self.path.display()
            ))
        })?;
        ensure_parent_dir(&self.path)?;
        self.last = None;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameRgb8) -> FilmWarpResult<()> {
        self.last = Some(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> FilmWarpResult<()> {
        let Some(frame) = self.last.take() else {
            return Err(FilmWarpError::evaluation("image sink received no frames"));
        };
        let img = image::RgbImage::from_raw(frame.width, frame.height, frame.data)
            .ok_or_else(|| FilmWarpError::validation("frame buffer does not match its size"))?;
        img.save(&self.path).map_err(|e| {
            FilmWarpError::io(format!(
                "failed to write image '{}': {e}",
                self.path.display()
            ))
        })?;
        Ok(())
    }
}

/// Pick a sink for `path`.
///
/// Still-image extensions always get an [`ImageSink`]. A run of at most one frame also gets one
/// when `image` can write the destination format; every other destination goes through ffmpeg.
pub fn open_sink(path: &Path, frame_count: u64) -> Box<dyn FrameSink> {
    let image_writable =
        image::ImageFormat::from_path(path).is_ok_and(|format| format.can_write());
    if is_still_image(path) || (frame_count <= 1 && image_writable) {
        if frame_count > 1 {
            tracing::warn!(
                frames = frame_count,
                path = %path.display(),
                "image destination keeps only the last frame"
            );
        }
        Box::new(ImageSink::new(path))
    } else {
        Box::new(FfmpegSink::new(FfmpegSinkOpts::new(path)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
