use std::fmt;

/// Coordinate expression tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Output pixel column.
    VarX,
    /// Output pixel row.
    VarY,
    /// Output frame index (`z` or `t` in source text).
    VarZ,
    /// Integer literal or named constant.
    ConstInt(i32),
    /// Decimal literal.
    ConstFloat(f32),
    /// `k * expr` with an integer `k` (unary minus lowers to `k = -1`).
    ScaleInt {
        /// Factor.
        k: i32,
        /// Scaled operand.
        expr: Box<Expr>,
    },
    /// `k * expr` with a fractional `k`.
    ScaleFloat {
        /// Factor.
        k: f32,
        /// Scaled operand.
        expr: Box<Expr>,
    },
    /// `expr` clamped into `[low, high]`.
    Clamp {
        /// Inclusive lower bound.
        low: i32,
        /// Inclusive upper bound.
        high: i32,
        /// Clamped operand.
        expr: Box<Expr>,
    },
    /// N-ary sum (at least one term).
    Sum(Vec<Expr>),
    /// N-ary product (at least one factor).
    Product(Vec<Expr>),
    /// Binary division-like op.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Dividend.
        left: Box<Expr>,
        /// Divisor.
        right: Box<Expr>,
    },
}

/// Division-like binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `/`: true division, always evaluated in floating point.
    Div,
    /// `#`: remainder (truncating for integers, Euclidean for floats).
    Mod,
    /// `_`: `a` rounded down to a multiple of `b` (the aligned value, not the quotient).
    FloorDiv,
}

impl BinaryOp {
    /// Operator symbol in expression text.
    pub fn symbol(self) -> char {
        match self {
            Self::Div => '/',
            Self::Mod => '#',
            Self::FloorDiv => '_',
        }
    }
}

impl Expr {
    /// Build a binary node.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build an integer scale node.
    pub fn scale_int(k: i32, expr: Expr) -> Self {
        Self::ScaleInt {
            k,
            expr: Box::new(expr),
        }
    }

    /// Build a fractional scale node.
    pub fn scale_float(k: f32, expr: Expr) -> Self {
        Self::ScaleFloat {
            k,
            expr: Box::new(expr),
        }
    }

    /// Build a clamp node.
    pub fn clamp(low: i32, high: i32, expr: Expr) -> Self {
        Self::Clamp {
            low,
            high,
            expr: Box::new(expr),
        }
    }

    /// `true` when the value is always integer-representable without loss.
    ///
    /// Selects the integer or floating evaluation pipeline for a whole axis.
    pub fn is_exact(&self) -> bool {
        match self {
            Self::VarX | Self::VarY | Self::VarZ | Self::ConstInt(_) => true,
            Self::ConstFloat(_) | Self::ScaleFloat { .. } => false,
            Self::ScaleInt { expr, .. } | Self::Clamp { expr, .. } => expr.is_exact(),
            Self::Sum(children) | Self::Product(children) => children.iter().all(Expr::is_exact),
            Self::Binary {
                op: BinaryOp::Div, ..
            } => false,
            Self::Binary { left, right, .. } => left.is_exact() && right.is_exact(),
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        1 + match self {
            Self::VarX | Self::VarY | Self::VarZ | Self::ConstInt(_) | Self::ConstFloat(_) => 0,
            Self::ScaleInt { expr, .. } | Self::ScaleFloat { expr, .. } | Self::Clamp { expr, .. } => {
                expr.node_count()
            }
            Self::Sum(children) | Self::Product(children) => {
                children.iter().map(Expr::node_count).sum()
            }
            Self::Binary { left, right, .. } => left.node_count() + right.node_count(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, children: &[Expr], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, c) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, "{sep}")?;
                }
                write!(f, "{c}")?;
            }
            write!(f, ")")
        }

        match self {
            Self::VarX => write!(f, "x"),
            Self::VarY => write!(f, "y"),
            Self::VarZ => write!(f, "t"),
            Self::ConstInt(v) => write!(f, "{v}"),
            Self::ConstFloat(v) => write!(f, "{v:?}"),
            Self::ScaleInt { k: -1, expr } => write!(f, "-{expr}"),
            Self::ScaleInt { k, expr } => write!(f, "({k}*{expr})"),
            Self::ScaleFloat { k, expr } => write!(f, "({k:?}*{expr})"),
            Self::Clamp { low, high, expr } => write!(f, "clamp({expr}, {low}, {high})"),
            Self::Sum(children) => join(f, children, "+"),
            Self::Product(children) => join(f, children, "*"),
            Self::Binary { op, left, right } => write!(f, "({left}{}{right})", op.symbol()),
        }
    }
}
