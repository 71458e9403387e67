//! FilmWarp remaps video through per-pixel coordinate expressions.
//!
//! An expression triplet such as `[w-1-x;y;t]` tells, for every output pixel `(x, y)` of output
//! frame `t`, which source column, row and frame to read. The engine is session-oriented:
//!
//! - Parse and validate expressions into a [`WarpSession`]
//! - Open a [`FrameSource`] and a [`FrameSink`]
//! - Stream the warp; only the source frames the expressions can reach are kept resident
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Frame sources (ffmpeg, still images, in-memory).
pub mod decode;
/// Encoding sinks.
pub mod encode;
/// Coordinate expression language.
pub mod expression;
/// Core types, errors and interval arithmetic.
pub mod foundation;
/// Frame window and pixel sampling.
pub mod render;
/// Session-oriented warp API.
pub mod session;
/// Run-length encoded per-pixel values.
pub mod span;

pub use crate::decode::source::{FrameSource, InMemorySource, SourceInfo, open_source};
pub use crate::decode::still::StillImageSource;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, ImageSink, InMemorySink, SinkConfig, open_sink};
pub use crate::expression::{Expr, ExprError, ParseConsts, parse_expr, parse_triplet};
pub use crate::foundation::core::{Fps, FrameIndex, FrameRange, FrameRgb8, OutputSize};
pub use crate::foundation::error::{FilmWarpError, FilmWarpResult};
pub use crate::foundation::interval::Interval;
pub use crate::render::window::{FrameWindow, WindowStats};
pub use crate::session::warp_session::{
    Precision, WarpOpts, WarpSession, WarpStats, resolve_output_size, warp_file,
};
pub use crate::span::{Ramp, Scalar, Span, SpanKind};
