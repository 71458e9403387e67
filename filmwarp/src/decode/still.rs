use crate::decode::source::{FrameSource, SourceInfo};
use crate::foundation::core::{Fps, FrameRgb8};
use crate::foundation::error::{FilmWarpError, FilmWarpResult};
use std::path::Path;

const STILL_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// `true` when `path` has an extension decoded by the `image` crate.
pub fn is_still_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| STILL_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// A still image presented as a one-frame video.
#[derive(Debug)]
pub struct StillImageSource {
    info: SourceInfo,
    frame: FrameRgb8,
    consumed: bool,
}

impl StillImageSource {
    /// Decode the image at `path`.
    pub fn open(path: &Path) -> FilmWarpResult<Self> {
        let img = image::open(path)
            .map_err(|e| {
                FilmWarpError::io(format!("failed to decode image '{}': {e}", path.display()))
            })?
            .into_rgb8();
        let (width, height) = img.dimensions();
        Self::from_frame(FrameRgb8::from_raw(width, height, img.into_raw())?)
    }

    /// Wrap an already decoded frame.
    pub fn from_frame(frame: FrameRgb8) -> FilmWarpResult<Self> {
        if frame.width == 0 || frame.height == 0 {
            return Err(FilmWarpError::validation("still image has zero size"));
        }
        Ok(Self {
            info: SourceInfo {
                width: frame.width,
                height: frame.height,
                fps: Fps::default(),
                frame_count: 1,
                pixel_format: "rgb24".to_owned(),
            },
            frame,
            consumed: false,
        })
    }
}

impl FrameSource for StillImageSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn decode_next(&mut self) -> FilmWarpResult<Option<FrameRgb8>> {
        if self.consumed {
            return Ok(None);
        }
        self.consumed = true;
        Ok(Some(self.frame.clone()))
    }

    fn seek_to_start(&mut self) -> FilmWarpResult<()> {
        self.consumed = false;
        Ok(())
    }
}
