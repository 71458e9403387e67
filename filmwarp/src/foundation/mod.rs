/// Frame indices, ranges, rates, sizes and RGB8 frames.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Closed-range arithmetic for frame planning.
pub mod interval;
