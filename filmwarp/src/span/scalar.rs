use std::fmt::Debug;

/// Per-pixel value type carried by a [`crate::span::Span`].
///
/// Implemented for `i32` (exact pipeline) and `f32` (fractional pipeline). Integer arithmetic wraps,
/// including `i32::MIN / -1`; integer division-like ops return `None` only on a zero divisor.
pub trait Scalar: Copy + Debug + Default + PartialEq + PartialOrd + Send + Sync + 'static {
    /// `true` for the integer pipeline.
    const INTEGRAL: bool;

    /// Convert an integer literal.
    fn from_i64(v: i64) -> Self;
    /// Convert a float literal (integers truncate toward zero, saturating).
    fn from_f64(v: f64) -> Self;
    /// Convert a pixel offset inside a run.
    fn from_index(i: usize) -> Self;
    /// Widen for interval math and estimates.
    fn to_f64(self) -> f64;

    /// `self + rhs`.
    fn plus(self, rhs: Self) -> Self;
    /// `self * rhs`.
    fn times(self, rhs: Self) -> Self;
    /// `self / rhs`.
    fn divide(self, rhs: Self) -> Option<Self>;
    /// Integer: truncating remainder. Float: Euclidean `x - floor(x/y)*y`.
    fn modulo(self, rhs: Self) -> Option<Self>;
    /// Integer: `a - (a mod b)`. Float: `floor(a/b)*b`. The aligned value, not the quotient.
    fn floor_align(self, rhs: Self) -> Option<Self>;

    /// Clamp into `[low, high]` without panicking on inverted bounds or NaN.
    fn clamp_to(self, low: Self, high: Self) -> Self {
        if self < low {
            low
        } else if self > high {
            high
        } else {
            self
        }
    }
}

impl Scalar for i32 {
    const INTEGRAL: bool = true;

    fn from_i64(v: i64) -> Self {
        v as i32
    }

    fn from_f64(v: f64) -> Self {
        v as i32
    }

    fn from_index(i: usize) -> Self {
        i as i32
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn plus(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    fn times(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }

    fn divide(self, rhs: Self) -> Option<Self> {
        (rhs != 0).then(|| self.wrapping_div(rhs))
    }

    fn modulo(self, rhs: Self) -> Option<Self> {
        (rhs != 0).then(|| self.wrapping_rem(rhs))
    }

    fn floor_align(self, rhs: Self) -> Option<Self> {
        self.modulo(rhs).map(|r| self.wrapping_sub(r))
    }
}

impl Scalar for f32 {
    const INTEGRAL: bool = false;

    fn from_i64(v: i64) -> Self {
        v as f32
    }

    fn from_f64(v: f64) -> Self {
        v as f32
    }

    fn from_index(i: usize) -> Self {
        i as f32
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn plus(self, rhs: Self) -> Self {
        self + rhs
    }

    fn times(self, rhs: Self) -> Self {
        self * rhs
    }

    fn divide(self, rhs: Self) -> Option<Self> {
        Some(self / rhs)
    }

    fn modulo(self, rhs: Self) -> Option<Self> {
        Some(self - (self / rhs).floor() * rhs)
    }

    fn floor_align(self, rhs: Self) -> Option<Self> {
        Some((self / rhs).floor() * rhs)
    }
}
