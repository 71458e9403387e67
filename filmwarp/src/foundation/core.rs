use crate::foundation::error::{FilmWarpError, FilmWarpResult};

/// Absolute 0-based frame index in source or output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: u64,
    /// Exclusive range end.
    pub end: u64,
}

impl FrameRange {
    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: u64) -> bool {
        self.start <= f && f < self.end
    }

    /// Intersect with `[0, limit)`.
    pub fn limit(self, limit: u64) -> Self {
        let end = self.end.min(limit);
        Self {
            start: self.start.min(end),
            end,
        }
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> FilmWarpResult<Self> {
        if den == 0 {
            return Err(FilmWarpError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(FilmWarpError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse `"30000/1001"` or `"25"` as reported by `ffprobe`.
    pub fn parse_ratio(s: &str) -> FilmWarpResult<Self> {
        let bad = || FilmWarpError::validation(format!("invalid frame rate '{s}'"));
        match s.trim().split_once('/') {
            Some((n, d)) => Self::new(
                n.trim().parse().map_err(|_| bad())?,
                d.trim().parse().map_err(|_| bad())?,
            ),
            None => Self::new(s.trim().parse().map_err(|_| bad())?, 1),
        }
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 25, den: 1 }
    }
}

/// Output dimensions: pixels per row, rows, and number of frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutputSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame count.
    pub frames: u64,
}

impl OutputSize {
    /// Number of pixels in one frame.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A decoded or rendered frame as tightly packed, row-major RGB8 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb8 {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl FrameRgb8 {
    /// A black frame of the given size.
    pub fn black(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Wrap raw bytes, checking their length against the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> FilmWarpResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(FilmWarpError::validation(format!(
                "rgb8 frame size mismatch: got {} bytes, expected {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Read the pixel at `(x, y)`. Coordinates must be in range.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let off = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[off], self.data[off + 1], self.data[off + 2]]
    }

    /// Overwrite the pixel at `(x, y)`. Coordinates must be in range.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let off = (y as usize * self.width as usize + x as usize) * 3;
        self.data[off..off + 3].copy_from_slice(&rgb);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
