use std::fmt;

/// Expression text error, located by byte offset into the parsed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprError {
    /// Byte offset of the offending token.
    pub offset: usize,
    /// Human-readable message.
    pub message: String,
}

impl ExprError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expr error at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ExprError {}
