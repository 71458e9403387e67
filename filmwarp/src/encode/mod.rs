//! Encoding sinks.
//!
//! Sinks consume warped frames in output order and are driven by `WarpSession::warp`.

/// `ffmpeg`-based sink (video output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
