use crate::decode::source::{FrameSource, SourceInfo, open_source};
use crate::encode::sink::{FrameSink, SinkConfig, open_sink};
use crate::expression::{
    Bindings, Expr, ParseConsts, evaluate, evaluate_constant, parse_triplet,
};
use crate::foundation::core::{FrameIndex, FrameRange, FrameRgb8, OutputSize};
use crate::foundation::error::{FilmWarpError, FilmWarpResult};
use crate::render::sampler::{referenced_frames, sample_frame};
use crate::render::window::FrameWindow;
use crate::session::plan::Planner;
use crate::span::{Scalar, Span};
use std::path::Path;

/// Options controlling a warp run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WarpOpts {
    /// Output frames produced per planning step.
    pub batch_size: usize,
    /// Residency budget in source frames. `None` uses the source frame count.
    pub max_frames: Option<usize>,
}

impl Default for WarpOpts {
    fn default() -> Self {
        Self {
            batch_size: 24,
            max_frames: None,
        }
    }
}

impl WarpOpts {
    /// Reject zero batch sizes and budgets.
    pub fn validate(&self) -> FilmWarpResult<()> {
        if self.batch_size == 0 {
            return Err(FilmWarpError::validation("batch_size must be >= 1"));
        }
        if self.max_frames == Some(0) {
            return Err(FilmWarpError::validation("max_frames must be >= 1"));
        }
        Ok(())
    }
}

/// Counters reported after a warp run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WarpStats {
    /// Output frames written to the sink.
    pub frames_out: u64,
    /// Source frames decoded into the window.
    pub frames_decoded: u64,
    /// Source frames decoded only to advance the cursor.
    pub frames_skipped: u64,
    /// Source rewinds to frame 0.
    pub rewinds: u64,
    /// Source frames evicted from the window.
    pub evicted: u64,
    /// Largest number of simultaneously resident source frames.
    pub peak_resident: u64,
}

/// Scalar type an axis is evaluated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Precision {
    /// `i32` pipeline; nearest-pixel sampling.
    Int,
    /// `f32` pipeline; linear blending.
    Float,
}

impl Precision {
    fn of(exprs: &[&Expr]) -> Self {
        if exprs.iter().all(|e| e.is_exact()) {
            Self::Int
        } else {
            Self::Float
        }
    }
}

/// Coordinate spans bound to `x` and `y`, in both precisions.
struct CoordGrid {
    xi: Span<i32>,
    yi: Span<i32>,
    xf: Span<f32>,
    yf: Span<f32>,
}

impl CoordGrid {
    fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self {
            xi: Span::column_ramp(w, h),
            yi: Span::row_index(w, h),
            xf: Span::column_ramp(w, h),
            yf: Span::row_index(w, h),
        }
    }
}

/// A parsed warp ready to run against a source.
///
/// Construction parses and validates everything up front; [`WarpSession::warp`] streams output
/// frames into a sink in order while keeping only the planned source frames resident.
#[derive(Debug)]
pub struct WarpSession {
    coords: [Expr; 3],
    source: SourceInfo,
    size: OutputSize,
    opts: WarpOpts,
    xy: Precision,
    z: Precision,
}

impl WarpSession {
    /// Parse `expr` (a `[X;Y;Z]` triplet) and the optional size triplet against `source`.
    pub fn new(
        source: &SourceInfo,
        expr: &str,
        size_expr: Option<&str>,
        opts: WarpOpts,
    ) -> FilmWarpResult<Self> {
        let consts = parse_consts(source)?;
        let coords = parse_triplet(expr, consts)?;
        let size = match size_expr {
            Some(s) => resolve_output_size(s, consts)?,
            None => OutputSize {
                width: source.width,
                height: source.height,
                frames: source.frame_count,
            },
        };
        Self::from_exprs(source, coords, size, opts)
    }

    /// Build a session from already parsed coordinate expressions.
    ///
    /// Each axis is wrapped in a clamp to the source bounds so sampling never leaves the source.
    pub fn from_exprs(
        source: &SourceInfo,
        coords: [Expr; 3],
        size: OutputSize,
        opts: WarpOpts,
    ) -> FilmWarpResult<Self> {
        opts.validate()?;
        let consts = parse_consts(source)?;
        if consts.width == 0 || consts.height == 0 || consts.length == 0 {
            return Err(FilmWarpError::validation(format!(
                "source is empty ({}x{}, {} frames)",
                source.width, source.height, source.frame_count
            )));
        }
        if size.width == 0 || size.height == 0 || size.frames == 0 {
            return Err(FilmWarpError::validation(format!(
                "output size must be non-zero, got {}x{}x{}",
                size.width, size.height, size.frames
            )));
        }

        let xy = Precision::of(&[&coords[0], &coords[1]]);
        let z = Precision::of(&[&coords[2]]);
        let [x, y, t] = coords;
        let coords = [
            Expr::clamp(0, consts.width - 1, x),
            Expr::clamp(0, consts.height - 1, y),
            Expr::clamp(0, consts.length - 1, t),
        ];

        Ok(Self {
            coords,
            source: source.clone(),
            size,
            opts,
            xy,
            z,
        })
    }

    /// Resolved output size.
    pub fn output_size(&self) -> OutputSize {
        self.size
    }

    /// Precision of the `x`/`y` pair and of `z`.
    pub fn precision(&self) -> (Precision, Precision) {
        (self.xy, self.z)
    }

    /// Clamp-wrapped coordinate expressions.
    pub fn coords(&self) -> &[Expr; 3] {
        &self.coords
    }

    /// Run the warp, pushing every output frame into `sink`.
    pub fn warp(
        &self,
        source: Box<dyn FrameSource>,
        sink: &mut dyn FrameSink,
    ) -> FilmWarpResult<WarpStats> {
        self.warp_with_progress(source, sink, |_| {})
    }

    /// Like [`WarpSession::warp`], calling `progress` with each output frame index once written.
    #[tracing::instrument(
        skip_all,
        fields(
            width = self.size.width,
            height = self.size.height,
            frames = self.size.frames
        )
    )]
    pub fn warp_with_progress(
        &self,
        source: Box<dyn FrameSource>,
        sink: &mut dyn FrameSink,
        mut progress: impl FnMut(u64),
    ) -> FilmWarpResult<WarpStats> {
        let info = source.info();
        if info.width != self.source.width || info.height != self.source.height {
            return Err(FilmWarpError::validation(format!(
                "source is {}x{}, session was built for {}x{}",
                info.width, info.height, self.source.width, self.source.height
            )));
        }
        let fps = info.fps;
        let mut window = FrameWindow::new(source);
        let grid = CoordGrid::new(self.size.width, self.size.height);
        let batch = self.opts.batch_size as u64;
        let max_frames = self
            .opts
            .max_frames
            .map_or(self.source.frame_count, |m| m as u64);
        let planner = Planner::new(
            &self.coords[2],
            self.size.width,
            self.size.height,
            self.source.frame_count,
            max_frames,
            batch,
        );

        tracing::info!(
            xy = ?self.xy,
            z = ?self.z,
            nodes = self.coords.iter().map(Expr::node_count).sum::<usize>(),
            source_frames = self.source.frame_count,
            max_frames,
            batch,
            "starting warp"
        );

        sink.begin(SinkConfig {
            width: self.size.width,
            height: self.size.height,
            fps,
            frame_count: self.size.frames,
        })?;

        let total = self.size.frames;
        let mut start = 0u64;
        while start < total {
            let end = start.saturating_add(batch).min(total);
            let load = planner.batch_load(FrameRange { start, end });
            tracing::debug!(
                batch_start = start,
                batch_end = end,
                load_start = load.start,
                load_end = load.end,
                "loading batch"
            );
            window.ensure_loaded(load)?;

            for f in start..end {
                let frame = self.render_frame(&grid, f, &mut window)?;
                sink.push_frame(FrameIndex(f), &frame)?;
                tracing::trace!(frame = f, resident = window.resident(), "frame written");
                progress(f);
            }

            let keep = planner.keep_for(FrameRange { start: end, end: total });
            window.evict_outside(keep);
            tracing::debug!(
                keep_start = keep.start,
                keep_end = keep.end,
                resident = window.resident(),
                "evicted outside residency plan"
            );
            start = end;
        }

        sink.end()?;

        let w = window.stats();
        let stats = WarpStats {
            frames_out: total,
            frames_decoded: w.decoded,
            frames_skipped: w.skipped,
            rewinds: w.rewinds,
            evicted: w.evicted,
            peak_resident: w.peak_resident,
        };
        tracing::info!(?stats, "warp finished");
        Ok(stats)
    }

    fn render_frame(
        &self,
        grid: &CoordGrid,
        f: u64,
        window: &mut FrameWindow,
    ) -> FilmWarpResult<FrameRgb8> {
        match (self.xy, self.z) {
            (Precision::Int, Precision::Int) => {
                self.render_with((&grid.xi, &grid.yi), (&grid.xi, &grid.yi), f, window)
            }
            (Precision::Int, Precision::Float) => {
                self.render_with((&grid.xi, &grid.yi), (&grid.xf, &grid.yf), f, window)
            }
            (Precision::Float, Precision::Int) => {
                self.render_with((&grid.xf, &grid.yf), (&grid.xi, &grid.yi), f, window)
            }
            (Precision::Float, Precision::Float) => {
                self.render_with((&grid.xf, &grid.yf), (&grid.xf, &grid.yf), f, window)
            }
        }
    }

    fn render_with<C: Scalar, Z: Scalar>(
        &self,
        (cx, cy): (&Span<C>, &Span<C>),
        (zx, zy): (&Span<Z>, &Span<Z>),
        f: u64,
        window: &mut FrameWindow,
    ) -> FilmWarpResult<FrameRgb8> {
        let at = f as usize;
        let vars = Bindings {
            x: cx,
            y: cy,
            z: C::from_index(at),
        };
        let xs = evaluate(&self.coords[0], &vars)?;
        let ys = evaluate(&self.coords[1], &vars)?;
        let zs = evaluate(
            &self.coords[2],
            &Bindings {
                x: zx,
                y: zy,
                z: Z::from_index(at),
            },
        )?;

        for idx in referenced_frames(&zs, window.frame_count()) {
            if !window.is_resident(idx) {
                tracing::debug!(frame = idx, output = f, "loading unplanned frame");
                window.ensure_frame(idx)?;
            }
        }

        sample_frame(&xs, &ys, &zs, window, self.size.width, self.size.height)
    }
}

/// Evaluate a `[W;H;L]` size triplet once; each component is truncated and must be at least 1.
pub fn resolve_output_size(size_expr: &str, consts: ParseConsts) -> FilmWarpResult<OutputSize> {
    let [w, h, l] = parse_triplet(size_expr, consts)?;
    let dim = |name: &str, e: &Expr| -> FilmWarpResult<u64> {
        let v = evaluate_constant(e)?.trunc();
        if v.is_nan() || v < 1.0 {
            return Err(FilmWarpError::validation(format!(
                "output {name} must be >= 1, `{e}` evaluates to {v}"
            )));
        }
        Ok(v as u64)
    };
    let width = u32::try_from(dim("width", &w)?)
        .map_err(|_| FilmWarpError::validation("output width is too large"))?;
    let height = u32::try_from(dim("height", &h)?)
        .map_err(|_| FilmWarpError::validation("output height is too large"))?;
    Ok(OutputSize {
        width,
        height,
        frames: dim("frame count", &l)?,
    })
}

/// Named constants for expressions over `source`.
pub fn parse_consts(source: &SourceInfo) -> FilmWarpResult<ParseConsts> {
    let too_large = |what: &str| FilmWarpError::validation(format!("source {what} is too large"));
    Ok(ParseConsts {
        width: i32::try_from(source.width).map_err(|_| too_large("width"))?,
        height: i32::try_from(source.height).map_err(|_| too_large("height"))?,
        length: i32::try_from(source.frame_count).map_err(|_| too_large("frame count"))?,
    })
}

/// Warp the file at `source` into `dest`, choosing source and sink by file type.
pub fn warp_file(
    source: &Path,
    dest: &Path,
    expr: &str,
    size_expr: Option<&str>,
    opts: WarpOpts,
) -> FilmWarpResult<WarpStats> {
    let src = open_source(source)?;
    let session = WarpSession::new(src.info(), expr, size_expr, opts)?;
    let mut sink = open_sink(dest, session.output_size().frames);
    session.warp(src, sink.as_mut())
}

#[cfg(test)]
#[path = "../../tests/unit/session/warp_session.rs"]
mod tests;
