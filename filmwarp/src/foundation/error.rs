/// Convenience result type used across FilmWarp.
pub type FilmWarpResult<T> = Result<T, FilmWarpError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum FilmWarpError {
    /// Malformed expression text (unknown symbol, unbalanced brackets, bad triplet).
    #[error("parse error: {0}")]
    Parse(String),

    /// Source/destination could not be opened, read, rewound or written.
    #[error("io error: {0}")]
    Io(String),

    /// Invalid user-provided options or sizes.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while evaluating coordinate expressions for a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FilmWarpError {
    /// Build a [`FilmWarpError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`FilmWarpError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`FilmWarpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FilmWarpError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

impl From<std::io::Error> for FilmWarpError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<crate::expression::error::ExprError> for FilmWarpError {
    fn from(e: crate::expression::error::ExprError) -> Self {
        Self::Parse(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
