use crate::expression::ast::{BinaryOp, Expr};
use crate::foundation::interval::Interval;

/// Domain of each variable over a batch of output pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VarRanges {
    /// Range of `x`.
    pub x: Interval,
    /// Range of `y`.
    pub y: Interval,
    /// Range of `z`.
    pub z: Interval,
}

/// Conservative range of values `expr` can take when its variables stay inside `vars`.
///
/// `/` by a range that contains zero is [`Interval::UNBOUNDED`]. Floor-division keeps the
/// dividend's range, which holds for the non-negative coordinates seen in practice.
pub fn image_interval(expr: &Expr, vars: &VarRanges) -> Interval {
    match expr {
        Expr::VarX => vars.x,
        Expr::VarY => vars.y,
        Expr::VarZ => vars.z,
        Expr::ConstInt(v) => Interval::point(f64::from(*v)),
        Expr::ConstFloat(v) => Interval::point(f64::from(*v)),
        Expr::ScaleInt { k, expr } => image_interval(expr, vars).scale(f64::from(*k)),
        Expr::ScaleFloat { k, expr } => image_interval(expr, vars).scale(f64::from(*k)),
        Expr::Clamp { low, high, expr } => {
            image_interval(expr, vars).clamp(f64::from(*low), f64::from(*high))
        }
        Expr::Sum(children) => children
            .iter()
            .map(|c| image_interval(c, vars))
            .reduce(|acc, i| acc + i)
            .unwrap_or(Interval::point(0.0)),
        Expr::Product(children) => children
            .iter()
            .map(|c| image_interval(c, vars))
            .reduce(|acc, i| acc * i)
            .unwrap_or(Interval::point(1.0)),
        Expr::Binary { op, left, right } => {
            let l = image_interval(left, vars);
            let r = image_interval(right, vars);
            match op {
                BinaryOp::Div => {
                    let inv = r.recip();
                    if inv.is_unbounded() {
                        Interval::UNBOUNDED
                    } else {
                        l * inv
                    }
                }
                BinaryOp::Mod => mod_interval(l, r),
                BinaryOp::FloorDiv => l,
            }
        }
    }
}

fn mod_interval(dividend: Interval, divisor: Interval) -> Interval {
    if dividend.a >= 0.0 && divisor.a > 0.0 {
        if dividend.b < divisor.a {
            return dividend;
        }
        return Interval::new(0.0, divisor.b);
    }
    // Sign of a truncating remainder follows the dividend, so cover both sides.
    let m = divisor.a.abs().max(divisor.b.abs());
    Interval::new(-m, m)
}

#[cfg(test)]
#[path = "../../tests/unit/expression/bound.rs"]
mod tests;
