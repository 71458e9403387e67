//! Source frame residency and pixel sampling.

/// Pixel sampler over resident frames.
pub mod sampler;
/// Sequential-decode frame cache.
pub mod window;
