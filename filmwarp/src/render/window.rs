use crate::decode::source::FrameSource;
use crate::foundation::core::{FrameRange, FrameRgb8};
use crate::foundation::error::{FilmWarpError, FilmWarpResult};
use std::collections::BTreeMap;

/// Decode counters accumulated by a [`FrameWindow`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WindowStats {
    /// Frames decoded and cached.
    pub decoded: u64,
    /// Frames decoded only to advance the cursor (before the wanted range or already cached).
    pub skipped: u64,
    /// Rewinds to frame 0.
    pub rewinds: u64,
    /// Frames dropped by eviction.
    pub evicted: u64,
    /// Largest number of frames resident at once.
    pub peak_resident: u64,
}

/// Cache of decoded source frames fed by a forward-only decode cursor.
///
/// Frames behind the cursor can only be reloaded by rewinding the source and replaying from
/// frame 0.
pub struct FrameWindow {
    source: Box<dyn FrameSource>,
    frames: BTreeMap<u64, FrameRgb8>,
    cursor: u64,
    frame_count: u64,
    width: u32,
    height: u32,
    stats: WindowStats,
}

impl FrameWindow {
    /// Wrap `source`, positioned at frame 0.
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        let info = source.info();
        let (frame_count, width, height) = (info.frame_count, info.width, info.height);
        Self {
            source,
            frames: BTreeMap::new(),
            cursor: 0,
            frame_count,
            width,
            height,
            stats: WindowStats::default(),
        }
    }

    /// Known frame count. Shrinks when decoding hits the real end early.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Index of the next frame the source will decode.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Number of cached frames.
    pub fn resident(&self) -> usize {
        self.frames.len()
    }

    /// `true` when frame `idx` is cached.
    pub fn is_resident(&self, idx: u64) -> bool {
        self.frames.contains_key(&idx)
    }

    /// Cached indices in ascending order.
    pub fn resident_indices(&self) -> impl Iterator<Item = u64> + '_ {
        self.frames.keys().copied()
    }

    /// Borrow a cached frame.
    pub fn frame(&self, idx: u64) -> Option<&FrameRgb8> {
        self.frames.get(&idx)
    }

    /// Counters so far.
    pub fn stats(&self) -> WindowStats {
        self.stats
    }

    /// Make every frame in `range` (clipped to the frame count) resident.
    pub fn ensure_loaded(&mut self, range: FrameRange) -> FilmWarpResult<()> {
        let range = range.limit(self.frame_count);
        let mut first_missing = range.start;
        while first_missing < range.end && self.frames.contains_key(&first_missing) {
            first_missing += 1;
        }
        if first_missing >= range.end {
            return Ok(());
        }

        if first_missing < self.cursor {
            tracing::warn!(
                frame = first_missing,
                cursor = self.cursor,
                "rewinding source to reload an evicted frame"
            );
            self.source.seek_to_start()?;
            self.cursor = 0;
            self.stats.rewinds += 1;
        }

        while self.cursor < range.end {
            let Some(frame) = self.source.decode_next()? else {
                self.hit_end();
                break;
            };
            let idx = self.cursor;
            self.cursor += 1;
            if idx < first_missing || self.frames.contains_key(&idx) {
                self.stats.skipped += 1;
                continue;
            }
            if frame.width != self.width || frame.height != self.height {
                return Err(FilmWarpError::io(format!(
                    "source frame {idx} is {}x{}, expected {}x{}",
                    frame.width, frame.height, self.width, self.height
                )));
            }
            self.frames.insert(idx, frame);
            self.stats.decoded += 1;
        }

        self.stats.peak_resident = self.stats.peak_resident.max(self.frames.len() as u64);
        Ok(())
    }

    /// Make frame `idx` resident.
    pub fn ensure_frame(&mut self, idx: u64) -> FilmWarpResult<()> {
        self.ensure_loaded(FrameRange {
            start: idx,
            end: idx.saturating_add(1),
        })
    }

    /// Drop every cached frame outside `keep`.
    pub fn evict_outside(&mut self, keep: FrameRange) {
        let before = self.frames.len();
        self.frames.retain(|&idx, _| keep.contains(idx));
        self.stats.evicted += (before - self.frames.len()) as u64;
    }

    fn hit_end(&mut self) {
        if self.cursor < self.frame_count {
            tracing::warn!(
                reported = self.frame_count,
                actual = self.cursor,
                "source ended early; shrinking frame count"
            );
            self.frame_count = self.cursor;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/window.rs"]
mod tests;
