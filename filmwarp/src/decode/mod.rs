//! Frame sources: sequential decoders feeding the frame window.

/// `ffmpeg`-backed streaming video decoder.
#[cfg(feature = "media-ffmpeg")]
pub mod ffmpeg;
/// Source trait, metadata and the in-memory source.
pub mod source;
/// Still images decoded through `image`.
pub mod still;
