//! Closed-range arithmetic used to bound which source frames an expression can read.
//!
//! Intervals are conservative: every operation returns a range that contains every value the exact
//! operation could produce. They never bound pixel colors.

use std::ops::{Add, Mul};

/// Closed range `[a, b]` with `a <= b`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    /// Lower bound.
    pub a: f64,
    /// Upper bound.
    pub b: f64,
}

impl Interval {
    /// Sentinel returned when no finite bound can be proven.
    pub const UNBOUNDED: Self = Self {
        a: f64::MIN,
        b: f64::MAX,
    };

    /// Create an interval, ordering the endpoints.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }

    /// Degenerate interval containing only `v`.
    pub fn point(v: f64) -> Self {
        Self { a: v, b: v }
    }

    /// `true` for the [`Interval::UNBOUNDED`] sentinel (or anything at least as wide).
    pub fn is_unbounded(self) -> bool {
        self.a <= f64::MIN || self.b >= f64::MAX
    }

    /// `true` when `0` lies inside `[a, b]`.
    pub fn contains_zero(self) -> bool {
        self.a <= 0.0 && 0.0 <= self.b
    }

    /// `[1/b, 1/a]`, or [`Interval::UNBOUNDED`] when the range touches zero.
    pub fn recip(self) -> Self {
        if self.contains_zero() {
            return Self::UNBOUNDED;
        }
        Self::new(1.0 / self.b, 1.0 / self.a)
    }

    /// Multiply both endpoints by `k`; a negative `k` swaps them.
    pub fn scale(self, k: f64) -> Self {
        if k >= 0.0 {
            Self {
                a: self.a * k,
                b: self.b * k,
            }
        } else {
            Self {
                a: self.b * k,
                b: self.a * k,
            }
        }
    }

    /// Clamp each endpoint into `[low, high]` independently.
    pub fn clamp(self, low: f64, high: f64) -> Self {
        Self {
            a: self.a.max(low).min(high),
            b: self.b.max(low).min(high),
        }
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        Interval {
            a: self.a + rhs.a,
            b: self.b + rhs.b,
        }
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        let corners = [
            self.a * rhs.a,
            self.a * rhs.b,
            self.b * rhs.a,
            self.b * rhs.b,
        ];
        // `f64::min`/`max` skip NaN (from 0 * inf), which keeps the bound usable.
        let a = corners.iter().copied().fold(f64::INFINITY, f64::min);
        let b = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Interval { a, b }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/interval.rs"]
mod tests;
