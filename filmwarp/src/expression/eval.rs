use crate::expression::ast::{BinaryOp, Expr};
use crate::foundation::error::{FilmWarpError, FilmWarpResult};
use crate::span::{Scalar, Span};

/// Variable values for one evaluation: the per-pixel `x`/`y` coordinate spans and the frame index.
#[derive(Clone, Copy, Debug)]
pub struct Bindings<'a, T> {
    /// Column of every output pixel.
    pub x: &'a Span<T>,
    /// Row of every output pixel.
    pub y: &'a Span<T>,
    /// Output frame index.
    pub z: T,
}

impl<T: Scalar> Bindings<'_, T> {
    /// Number of pixels every result span covers.
    pub fn pixel_count(&self) -> usize {
        self.x.len()
    }
}

/// Evaluate on the integer pipeline. Only integer-exact trees are accepted.
pub fn evaluate_int(expr: &Expr, vars: &Bindings<'_, i32>) -> FilmWarpResult<Span<i32>> {
    evaluate(expr, vars)
}

/// Evaluate on the fractional pipeline. Any tree is accepted.
pub fn evaluate_float(expr: &Expr, vars: &Bindings<'_, f32>) -> FilmWarpResult<Span<f32>> {
    evaluate(expr, vars)
}

/// Evaluate `expr` for every pixel in `vars`.
///
/// Integer division, remainder or floor-division by zero is an evaluation error; on the float
/// pipeline the same cases follow IEEE semantics.
pub fn evaluate<T: Scalar>(expr: &Expr, vars: &Bindings<'_, T>) -> FilmWarpResult<Span<T>> {
    let n = vars.pixel_count();
    let out = match expr {
        Expr::VarX => vars.x.clone(),
        Expr::VarY => vars.y.clone(),
        Expr::VarZ => Span::constant(n, vars.z),
        Expr::ConstInt(v) => Span::constant(n, T::from_i64(i64::from(*v))),
        Expr::ConstFloat(v) => {
            require_fractional::<T>(expr)?;
            Span::constant(n, T::from_f64(f64::from(*v)))
        }
        Expr::ScaleInt { k, expr: inner } => {
            evaluate(inner, vars)?.scale(T::from_i64(i64::from(*k)))
        }
        Expr::ScaleFloat { k, expr: inner } => {
            require_fractional::<T>(expr)?;
            evaluate(inner, vars)?.scale(T::from_f64(f64::from(*k)))
        }
        Expr::Clamp {
            low,
            high,
            expr: inner,
        } => {
            if low > high {
                return Err(FilmWarpError::evaluation(format!(
                    "clamp bounds are inverted: {low} > {high}"
                )));
            }
            evaluate(inner, vars)?.clamp(T::from_i64(i64::from(*low)), T::from_i64(i64::from(*high)))
        }
        Expr::Sum(children) => fold(children, vars, |acc, s| acc + s)?,
        Expr::Product(children) => fold(children, vars, |acc, s| acc * s)?,
        Expr::Binary { op, left, right } => {
            if *op == BinaryOp::Div {
                require_fractional::<T>(expr)?;
            }
            let l = evaluate(left, vars)?;
            let r = evaluate(right, vars)?;
            let f = match op {
                BinaryOp::Div => T::divide,
                BinaryOp::Mod => T::modulo,
                BinaryOp::FloorDiv => T::floor_align,
            };
            l.try_zip_with(r, f).ok_or_else(|| {
                FilmWarpError::evaluation(format!(
                    "integer '{}' by zero in {expr}",
                    op.symbol()
                ))
            })?
        }
    };
    Ok(out)
}

/// Evaluate a pixel-independent expression (a size expression) to one number.
///
/// Uses a single-pixel binding with every variable at zero and picks the pipeline from
/// [`Expr::is_exact`].
pub fn evaluate_constant(expr: &Expr) -> FilmWarpResult<f64> {
    if expr.is_exact() {
        let zero = Span::constant(1, 0i32);
        let vars = Bindings {
            x: &zero,
            y: &zero,
            z: 0,
        };
        first_value(evaluate_int(expr, &vars)?, expr)
    } else {
        let zero = Span::constant(1, 0f32);
        let vars = Bindings {
            x: &zero,
            y: &zero,
            z: 0.0,
        };
        first_value(evaluate_float(expr, &vars)?, expr)
    }
}

fn first_value<T: Scalar>(span: Span<T>, expr: &Expr) -> FilmWarpResult<f64> {
    span.get(0)
        .map(Scalar::to_f64)
        .ok_or_else(|| FilmWarpError::evaluation(format!("{expr} produced no value")))
}

fn fold<T: Scalar>(
    children: &[Expr],
    vars: &Bindings<'_, T>,
    combine: impl Fn(Span<T>, Span<T>) -> Span<T>,
) -> FilmWarpResult<Span<T>> {
    let mut iter = children.iter();
    let Some(first) = iter.next() else {
        return Err(FilmWarpError::evaluation("empty sum or product"));
    };
    let mut acc = evaluate(first, vars)?;
    for child in iter {
        acc = combine(acc, evaluate(child, vars)?);
    }
    Ok(acc)
}

fn require_fractional<T: Scalar>(expr: &Expr) -> FilmWarpResult<()> {
    if T::INTEGRAL {
        return Err(FilmWarpError::evaluation(format!(
            "{expr} is not integer-exact; evaluate it on the float pipeline"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/expression/eval.rs"]
mod tests;
