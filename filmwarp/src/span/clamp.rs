//! Clamping spans into `[low, high]`.
//!
//! Dense and sparse spans clamp their stored values. A ramp crosses `low` and `high` at most once
//! each, so every sparse-linear run splits into at most three pieces: a flat run at one bound, the
//! in-range ramp, and a flat run at the other bound. Crossing points are computed from the ramp's
//! `(start, step)` rather than by scanning pixels. An integer ramp that wraps around is clamped
//! pixel by pixel.

use super::{Offsets, Ramp, Scalar, Span};
use smallvec::{SmallVec, smallvec};

impl<T: Scalar> Span<T> {
    /// Clamp every pixel into `[low, high]`, keeping the encoding.
    pub fn clamp(self, low: T, high: T) -> Span<T> {
        match self {
            Span::Dense(mut v) => {
                for x in &mut v {
                    *x = x.clamp_to(low, high);
                }
                Span::Dense(v)
            }
            Span::Sparse {
                offsets,
                mut values,
            } => {
                for x in &mut values {
                    *x = x.clamp_to(low, high);
                }
                Span::Sparse { offsets, values }
            }
            Span::SparseLinear { offsets, runs } => clamp_linear(&offsets, &runs, low, high),
        }
    }
}

fn clamp_linear<T: Scalar>(offsets: &[usize], runs: &[Ramp<T>], low: T, high: T) -> Span<T> {
    let mut out_offsets: Offsets = smallvec![0];
    let mut out_runs: SmallVec<[Ramp<T>; 1]> = SmallVec::new();

    for (r, ramp) in runs.iter().copied().enumerate() {
        let base = offsets[r];
        let n = offsets[r + 1] - base;
        if wraps(ramp, n) {
            // Not monotone, so the pieces are single pixels.
            for k in 0..n {
                out_offsets.push(base + k + 1);
                out_runs.push(Ramp::flat(ramp.at(k).clamp_to(low, high)));
            }
            continue;
        }
        for (from, to, piece) in split_ramp(ramp, n, low, high) {
            if from < to {
                out_offsets.push(base + to);
                out_runs.push(piece);
            }
        }
    }

    Span::SparseLinear {
        offsets: out_offsets,
        runs: out_runs,
    }
}

/// `true` when an integer ramp overflows inside its `n` pixels. The exact endpoint is in range iff
/// every pixel before it is, so checking the last pixel suffices.
fn wraps<T: Scalar>(ramp: Ramp<T>, n: usize) -> bool {
    if !T::INTEGRAL || n < 2 {
        return false;
    }
    let exact = ramp.start.to_f64() + ramp.step.to_f64() * (n - 1) as f64;
    ramp.at(n - 1).to_f64() != exact
}

/// Pieces `(from, to, ramp)` of an `n`-pixel ramp clamped into `[low, high]`, in pixel order.
/// Empty pieces have `from == to`.
fn split_ramp<T: Scalar>(ramp: Ramp<T>, n: usize, low: T, high: T) -> [(usize, usize, Ramp<T>); 3] {
    let zero = T::default();
    let empty = (0, 0, Ramp::flat(zero));

    if ramp.step == zero {
        return [(0, n, Ramp::flat(ramp.start.clamp_to(low, high))), empty, empty];
    }

    let start = ramp.start.to_f64();
    let step = ramp.step.to_f64();

    if ramp.step > zero {
        // Rising: below `low`, then in range, then above `high`.
        let enter = first_where(ramp, n, ((low.to_f64() - start) / step).ceil(), |v| v >= low);
        let leave = first_where(ramp, n, ((high.to_f64() - start) / step).floor() + 1.0, |v| {
            v > high
        })
        .max(enter);
        [
            (0, enter, Ramp::flat(low)),
            (enter, leave, anchored(ramp, enter)),
            (leave, n, Ramp::flat(high)),
        ]
    } else {
        // Falling: above `high`, then in range, then below `low`.
        let enter = first_where(ramp, n, ((high.to_f64() - start) / step).ceil(), |v| v <= high);
        let leave = first_where(ramp, n, ((low.to_f64() - start) / step).floor() + 1.0, |v| {
            v < low
        })
        .max(enter);
        [
            (0, enter, Ramp::flat(high)),
            (enter, leave, anchored(ramp, enter)),
            (leave, n, Ramp::flat(low)),
        ]
    }
}

fn anchored<T: Scalar>(ramp: Ramp<T>, k: usize) -> Ramp<T> {
    Ramp {
        start: ramp.at(k),
        step: ramp.step,
    }
}

/// First pixel `k` in `0..=n` of a monotone ramp with `pred(ramp.at(k))`, starting from the
/// closed-form `estimate` and correcting for rounding in the exact value type.
fn first_where<T: Scalar>(ramp: Ramp<T>, n: usize, estimate: f64, pred: impl Fn(T) -> bool) -> usize {
    let mut k = if estimate.is_nan() || estimate <= 0.0 {
        0
    } else if estimate >= n as f64 {
        n
    } else {
        estimate as usize
    };
    while k > 0 && pred(ramp.at(k - 1)) {
        k -= 1;
    }
    while k < n && !pred(ramp.at(k)) {
        k += 1;
    }
    k
}

#[cfg(test)]
#[path = "../../tests/unit/span/clamp.rs"]
mod tests;
