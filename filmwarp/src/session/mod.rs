//! Session-oriented warp API.

/// Frame residency planning from interval bounds.
pub mod plan;
/// Warp session, options and statistics.
pub mod warp_session;
