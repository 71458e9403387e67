use crate::foundation::core::{Fps, FrameRgb8};
use crate::foundation::error::{FilmWarpError, FilmWarpResult};
use std::path::Path;

/// Metadata reported by a [`FrameSource`] before decoding.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Source frame rate.
    pub fps: Fps,
    /// Reported frame count. May overstate the decodable frames of a damaged file.
    pub frame_count: u64,
    /// Native pixel format name (frames are always delivered as RGB8).
    pub pixel_format: String,
}

/// Forward-only sequential frame decoder.
///
/// Seeking backwards is only possible through [`FrameSource::seek_to_start`], which callers treat
/// as expensive.
pub trait FrameSource: Send {
    /// Metadata of the opened source.
    fn info(&self) -> &SourceInfo;
    /// Decode the next frame, or `None` once the source is exhausted.
    fn decode_next(&mut self) -> FilmWarpResult<Option<FrameRgb8>>;
    /// Rewind so the next decode returns frame 0.
    fn seek_to_start(&mut self) -> FilmWarpResult<()>;
}

/// Frames held in memory; used by tests and by callers that synthesize input.
#[derive(Debug)]
pub struct InMemorySource {
    info: SourceInfo,
    frames: Vec<FrameRgb8>,
    cursor: usize,
    rewinds: u64,
}

impl InMemorySource {
    /// Wrap `frames`, which must be non-empty and share one size.
    pub fn new(frames: Vec<FrameRgb8>, fps: Fps) -> FilmWarpResult<Self> {
        let first = frames
            .first()
            .ok_or_else(|| FilmWarpError::validation("in-memory source needs at least one frame"))?;
        let (width, height) = (first.width, first.height);
        if let Some(bad) = frames
            .iter()
            .position(|f| f.width != width || f.height != height)
        {
            return Err(FilmWarpError::validation(format!(
                "in-memory frame {bad} is {}x{}, expected {width}x{height}",
                frames[bad].width, frames[bad].height
            )));
        }
        Ok(Self {
            info: SourceInfo {
                width,
                height,
                fps,
                frame_count: frames.len() as u64,
                pixel_format: "rgb24".to_owned(),
            },
            frames,
            cursor: 0,
            rewinds: 0,
        })
    }

    /// Override the reported frame count, e.g. to mimic a container that overstates its length.
    pub fn with_reported_frames(mut self, frame_count: u64) -> Self {
        self.info.frame_count = frame_count;
        self
    }

    /// Number of times the source has been rewound.
    pub fn rewinds(&self) -> u64 {
        self.rewinds
    }
}

impl FrameSource for InMemorySource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn decode_next(&mut self) -> FilmWarpResult<Option<FrameRgb8>> {
        let frame = self.frames.get(self.cursor).cloned();
        if frame.is_some() {
            self.cursor += 1;
        }
        Ok(frame)
    }

    fn seek_to_start(&mut self) -> FilmWarpResult<()> {
        self.cursor = 0;
        self.rewinds += 1;
        Ok(())
    }
}

/// Open `path` as a frame source: still images through `image`, everything else through ffmpeg.
pub fn open_source(path: &Path) -> FilmWarpResult<Box<dyn FrameSource>> {
    if !path.exists() {
        return Err(FilmWarpError::io(format!(
            "source '{}' does not exist",
            path.display()
        )));
    }
    if crate::decode::still::is_still_image(path) {
        return Ok(Box::new(crate::decode::still::StillImageSource::open(path)?));
    }
    open_video(path)
}

#[cfg(feature = "media-ffmpeg")]
fn open_video(path: &Path) -> FilmWarpResult<Box<dyn FrameSource>> {
    Ok(Box::new(crate::decode::ffmpeg::FfmpegSource::open(path)?))
}

#[cfg(not(feature = "media-ffmpeg"))]
fn open_video(path: &Path) -> FilmWarpResult<Box<dyn FrameSource>> {
    Err(FilmWarpError::io(format!(
        "cannot open '{}': video sources require the 'media-ffmpeg' feature",
        path.display()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/decode/source.rs"]
mod tests;
