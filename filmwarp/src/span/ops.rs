//! Span algebra.
//!
//! Promotion order for every binary op: any dense operand makes the result dense; otherwise a
//! sparse-linear operand keeps the result sparse-linear when the op is closed over ramps (`+`, and
//! `*` by a constant run); otherwise both are sparse and the result stays sparse. Boundary lists are
//! combined with a two-pointer merge, linear in the number of runs.

use super::{Offsets, Ramp, Scalar, Span};
use smallvec::{SmallVec, smallvec};
use std::ops::{Add, Mul};

/// One piece of a merged boundary list: the piece begins at pixel `start` and lies in run `left` of
/// the first operand and run `right` of the second.
#[derive(Clone, Copy, Debug)]
struct Piece {
    left: usize,
    right: usize,
    start: usize,
}

fn merge_runs(a: &[usize], b: &[usize], mut emit: impl FnMut(Piece)) -> Offsets {
    debug_assert_eq!(a.last(), b.last(), "span length mismatch");
    let mut out: Offsets = smallvec![0];
    let (mut i, mut j) = (1, 1);
    let mut start = 0;
    while i < a.len() && j < b.len() {
        let end = a[i].min(b[j]);
        emit(Piece {
            left: i - 1,
            right: j - 1,
            start,
        });
        out.push(end);
        if a[i] == end {
            i += 1;
        }
        if b[j] == end {
            j += 1;
        }
        start = end;
    }
    out
}

/// Ramp of run `r` re-anchored at pixel `start`.
fn ramp_from<T: Scalar>(offsets: &[usize], runs: &[Ramp<T>], r: usize, start: usize) -> Ramp<T> {
    let ramp = runs[r];
    Ramp {
        start: ramp.at(start - offsets[r]),
        step: ramp.step,
    }
}

fn dense_apply<T: Scalar>(mut dst: Vec<T>, src: &Span<T>, f: impl Fn(T, T) -> T) -> Span<T> {
    debug_assert_eq!(dst.len(), src.len(), "span length mismatch");
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d = f(*d, s);
    }
    Span::Dense(dst)
}

fn sparse_apply<T: Scalar>(
    a_off: &[usize],
    a_val: &[T],
    b_off: &[usize],
    b_val: &[T],
    f: impl Fn(T, T) -> T,
) -> Span<T> {
    let mut values: SmallVec<[T; 1]> = SmallVec::new();
    let offsets = merge_runs(a_off, b_off, |p| values.push(f(a_val[p.left], b_val[p.right])));
    Span::Sparse { offsets, values }
}

fn sparse_try_apply<T: Scalar>(
    a_off: &[usize],
    a_val: &[T],
    b_off: &[usize],
    b_val: &[T],
    f: impl Fn(T, T) -> Option<T>,
) -> Option<Span<T>> {
    let mut values: SmallVec<[T; 1]> = SmallVec::new();
    let mut failed = false;
    let offsets = merge_runs(a_off, b_off, |p| match f(a_val[p.left], b_val[p.right]) {
        Some(v) => values.push(v),
        None => failed = true,
    });
    if failed {
        return None;
    }
    Some(Span::Sparse { offsets, values })
}

fn linear_add_linear<T: Scalar>(
    a_off: &[usize],
    a_runs: &[Ramp<T>],
    b_off: &[usize],
    b_runs: &[Ramp<T>],
) -> Span<T> {
    let mut runs = SmallVec::new();
    let offsets = merge_runs(a_off, b_off, |p| {
        let l = ramp_from(a_off, a_runs, p.left, p.start);
        let r = ramp_from(b_off, b_runs, p.right, p.start);
        runs.push(Ramp {
            start: l.start.plus(r.start),
            step: l.step.plus(r.step),
        });
    });
    Span::SparseLinear { offsets, runs }
}

/// Combine each linear sub-run with the sparse constant overlapping it.
fn linear_with_sparse<T: Scalar>(
    l_off: &[usize],
    l_runs: &[Ramp<T>],
    s_off: &[usize],
    s_val: &[T],
    f: impl Fn(Ramp<T>, T) -> Ramp<T>,
) -> Span<T> {
    let mut runs = SmallVec::new();
    let offsets = merge_runs(l_off, s_off, |p| {
        runs.push(f(ramp_from(l_off, l_runs, p.left, p.start), s_val[p.right]));
    });
    Span::SparseLinear { offsets, runs }
}

impl<T: Scalar> Add for Span<T> {
    type Output = Span<T>;

    fn add(self, rhs: Span<T>) -> Span<T> {
        match (self, rhs) {
            (Span::Dense(a), b) | (b, Span::Dense(a)) => dense_apply(a, &b, T::plus),
            (
                Span::SparseLinear {
                    offsets: ao,
                    runs: ar,
                },
                Span::SparseLinear {
                    offsets: bo,
                    runs: br,
                },
            ) => linear_add_linear(&ao, &ar, &bo, &br),
            (Span::SparseLinear { offsets: lo, runs }, Span::Sparse { offsets: so, values })
            | (Span::Sparse { offsets: so, values }, Span::SparseLinear { offsets: lo, runs }) => {
                linear_with_sparse(&lo, &runs, &so, &values, |r, c| Ramp {
                    start: r.start.plus(c),
                    step: r.step,
                })
            }
            (
                Span::Sparse {
                    offsets: ao,
                    values: av,
                },
                Span::Sparse {
                    offsets: bo,
                    values: bv,
                },
            ) => sparse_apply(&ao, &av, &bo, &bv, T::plus),
        }
    }
}

impl<T: Scalar> Mul for Span<T> {
    type Output = Span<T>;

    fn mul(self, rhs: Span<T>) -> Span<T> {
        match (self, rhs) {
            (Span::Dense(a), b) | (b, Span::Dense(a)) => dense_apply(a, &b, T::times),
            // The product of two ramps is quadratic; no closed run form.
            (a @ Span::SparseLinear { .. }, b @ Span::SparseLinear { .. }) => {
                dense_apply(a.into_values(), &b, T::times)
            }
            (Span::SparseLinear { offsets: lo, runs }, Span::Sparse { offsets: so, values })
            | (Span::Sparse { offsets: so, values }, Span::SparseLinear { offsets: lo, runs }) => {
                linear_with_sparse(&lo, &runs, &so, &values, |r, c| Ramp {
                    start: r.start.times(c),
                    step: r.step.times(c),
                })
            }
            (
                Span::Sparse {
                    offsets: ao,
                    values: av,
                },
                Span::Sparse {
                    offsets: bo,
                    values: bv,
                },
            ) => sparse_apply(&ao, &av, &bo, &bv, T::times),
        }
    }
}

impl<T: Scalar> Span<T> {
    /// Generic element-wise op `self[i] op rhs[i]` (division, modulo, floor alignment).
    ///
    /// Two sparse operands combine per merged run; anything else is materialized dense. Returns
    /// `None` if `op` fails for any pixel.
    pub fn try_zip_with(self, rhs: Span<T>, op: impl Fn(T, T) -> Option<T>) -> Option<Span<T>> {
        match (self, rhs) {
            (
                Span::Sparse {
                    offsets: ao,
                    values: av,
                },
                Span::Sparse {
                    offsets: bo,
                    values: bv,
                },
            ) => sparse_try_apply(&ao, &av, &bo, &bv, op),
            (a, b) => {
                let mut dst = a.into_values();
                debug_assert_eq!(dst.len(), b.len(), "span length mismatch");
                for (d, s) in dst.iter_mut().zip(b.iter()) {
                    *d = op(*d, s)?;
                }
                Some(Span::Dense(dst))
            }
        }
    }

    /// Multiply every pixel by `k` through the span algebra, so run encodings survive.
    pub fn scale(self, k: T) -> Span<T> {
        let len = self.len();
        self * Span::constant(len, k)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/span/ops.rs"]
mod tests;
