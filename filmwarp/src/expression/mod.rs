//! Coordinate expression language.
//!
//! Source text such as `[w-1-x;y;t]` is tokenized, parsed into an [`ast::Expr`] tree
//! ([`parser`]), evaluated per pixel over [`crate::span::Span`] values ([`eval`]), and bounded
//! with interval arithmetic ([`bound`]) to plan which source frames must be resident.

/// Expression tree.
pub mod ast;
/// Interval bounds of an expression.
pub mod bound;
/// Located parse errors.
pub mod error;
/// Per-pixel evaluation over spans.
pub mod eval;
pub(crate) mod lexer;
/// Recursive-descent parser.
pub mod parser;

pub use ast::{BinaryOp, Expr};
pub use bound::{VarRanges, image_interval};
pub use error::ExprError;
pub use eval::{Bindings, evaluate, evaluate_constant, evaluate_float, evaluate_int};
pub use parser::{ParseConsts, parse_expr, parse_triplet};
