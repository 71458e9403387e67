use crate::expression::{Expr, VarRanges, image_interval};
use crate::foundation::core::FrameRange;
use crate::foundation::interval::Interval;

/// Source frames a batch of output frames can read, derived from interval bounds of the `z`
/// expression.
#[derive(Clone, Copy, Debug)]
pub struct Planner<'a> {
    z: &'a Expr,
    x: Interval,
    y: Interval,
    frame_count: u64,
    max_frames: u64,
    batch: u64,
}

impl<'a> Planner<'a> {
    /// Planner for outputs of `width x height` pixels over a source of `frame_count` frames.
    pub fn new(
        z: &'a Expr,
        width: u32,
        height: u32,
        frame_count: u64,
        max_frames: u64,
        batch: u64,
    ) -> Self {
        Self {
            z,
            x: Interval::new(0.0, f64::from(width.saturating_sub(1))),
            y: Interval::new(0.0, f64::from(height.saturating_sub(1))),
            frame_count,
            max_frames: max_frames.max(1),
            batch: batch.max(1),
        }
    }

    /// Bound of `z` while the output frame index ranges over `outputs`.
    pub fn bound(&self, outputs: FrameRange) -> Interval {
        let last = outputs.end.saturating_sub(1).max(outputs.start);
        image_interval(
            self.z,
            &VarRanges {
                x: self.x,
                y: self.y,
                z: Interval::new(outputs.start as f64, last as f64),
            },
        )
    }

    /// Source frames to load before producing `batch`.
    pub fn batch_load(&self, batch: FrameRange) -> FrameRange {
        frames_covering(self.bound(batch), self.frame_count)
    }

    /// Source frames to keep resident for the `remaining` output frames.
    ///
    /// While the bound is wider than `max_frames` and the remaining range is longer than one
    /// batch, the remaining range is halved so only the nearer future is kept.
    pub fn keep_for(&self, remaining: FrameRange) -> FrameRange {
        if remaining.is_empty() {
            return FrameRange { start: 0, end: 0 };
        }
        let mut horizon = remaining;
        let mut keep = frames_covering(self.bound(horizon), self.frame_count);
        while keep.len_frames() > self.max_frames && horizon.len_frames() > self.batch {
            horizon.end = horizon.start + horizon.len_frames() / 2;
            keep = frames_covering(self.bound(horizon), self.frame_count);
            tracing::debug!(
                horizon_start = horizon.start,
                horizon_end = horizon.end,
                keep_start = keep.start,
                keep_end = keep.end,
                "narrowed residency horizon"
            );
        }
        keep
    }
}

/// Frame indices a `z` interval can touch, including the upper blend partner of a fractional
/// bound, clipped to `[0, frame_count)`.
pub fn frames_covering(iv: Interval, frame_count: u64) -> FrameRange {
    if iv.a.is_nan() || iv.b.is_nan() {
        return FrameRange {
            start: 0,
            end: frame_count,
        };
    }
    let max = frame_count as f64;
    let start = iv.a.floor().clamp(0.0, max) as u64;
    let end = (iv.b.ceil() + 1.0).clamp(0.0, max) as u64;
    FrameRange {
        start: start.min(end),
        end,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/plan.rs"]
mod tests;
