//! Per-pixel scalar containers with run-length encodings.
//!
//! A [`Span`] holds one value per output pixel of a frame. Most coordinate fields are highly
//! regular (a whole row shares its `y`, a row's `x` is a unit ramp), so besides the plain `Dense`
//! form a span can be stored as constant runs (`Sparse`) or affine runs (`SparseLinear`). The
//! algebra in [`ops`] keeps results in the cheapest encoding that can represent them exactly.
//!
//! Run boundaries are stored as `offsets[0..=n]` with `offsets[0] == 0`, strictly increasing, and
//! `offsets[n] == len`; run `r` covers pixels `offsets[r]..offsets[r + 1]`.

mod clamp;
mod ops;
mod scalar;

pub use scalar::Scalar;

use crate::foundation::error::{FilmWarpError, FilmWarpResult};
use smallvec::{SmallVec, smallvec};

/// Run boundary list. Constant spans have two entries, which stay inline.
pub type Offsets = SmallVec<[usize; 2]>;

/// Affine run payload: pixel `k` of the run holds `start + step * k`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ramp<T> {
    /// Value of the first pixel of the run.
    pub start: T,
    /// Increment per pixel.
    pub step: T,
}

impl<T: Scalar> Ramp<T> {
    /// A run holding `v` on every pixel.
    pub fn flat(v: T) -> Self {
        Self {
            start: v,
            step: T::default(),
        }
    }

    /// Value of pixel `k` counted from the start of the run.
    pub fn at(self, k: usize) -> T {
        self.start.plus(self.step.times(T::from_index(k)))
    }
}

/// Encoding tag of a [`Span`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanKind {
    /// One stored value per pixel.
    Dense,
    /// One constant per run.
    Sparse,
    /// One `(start, step)` ramp per run.
    SparseLinear,
}

/// Per-pixel values in one of three interchangeable encodings.
#[derive(Clone, Debug, PartialEq)]
pub enum Span<T> {
    /// One value per pixel.
    Dense(Vec<T>),
    /// Constant value per run.
    Sparse {
        /// Run boundaries.
        offsets: Offsets,
        /// One value per run.
        values: SmallVec<[T; 1]>,
    },
    /// Affine ramp per run.
    SparseLinear {
        /// Run boundaries.
        offsets: Offsets,
        /// One ramp per run.
        runs: SmallVec<[Ramp<T>; 1]>,
    },
}

impl<T: Scalar> Span<T> {
    /// `len` pixels all holding `v`, as a single sparse run.
    pub fn constant(len: usize, v: T) -> Self {
        if len == 0 {
            return Self::Sparse {
                offsets: smallvec![0],
                values: SmallVec::new(),
            };
        }
        Self::Sparse {
            offsets: smallvec![0, len],
            values: smallvec![v],
        }
    }

    /// Validated sparse span.
    pub fn sparse(offsets: Vec<usize>, values: Vec<T>) -> FilmWarpResult<Self> {
        check_offsets(&offsets, values.len())?;
        Ok(Self::Sparse {
            offsets: SmallVec::from_vec(offsets),
            values: SmallVec::from_vec(values),
        })
    }

    /// Validated sparse-linear span.
    pub fn sparse_linear(offsets: Vec<usize>, runs: Vec<Ramp<T>>) -> FilmWarpResult<Self> {
        check_offsets(&offsets, runs.len())?;
        Ok(Self::SparseLinear {
            offsets: SmallVec::from_vec(offsets),
            runs: SmallVec::from_vec(runs),
        })
    }

    /// Column index of every pixel of a `width x height` frame: one `(0, 1)` ramp per row.
    pub fn column_ramp(width: usize, height: usize) -> Self {
        if width == 0 || height == 0 {
            return Self::constant(0, T::default());
        }
        Self::SparseLinear {
            offsets: (0..=height).map(|r| r * width).collect(),
            runs: (0..height)
                .map(|_| Ramp {
                    start: T::default(),
                    step: T::from_index(1),
                })
                .collect(),
        }
    }

    /// Row index of every pixel of a `width x height` frame: one constant run per row.
    pub fn row_index(width: usize, height: usize) -> Self {
        if width == 0 || height == 0 {
            return Self::constant(0, T::default());
        }
        Self::Sparse {
            offsets: (0..=height).map(|r| r * width).collect(),
            values: (0..height).map(T::from_index).collect(),
        }
    }

    /// Encoding of this span.
    pub fn kind(&self) -> SpanKind {
        match self {
            Self::Dense(_) => SpanKind::Dense,
            Self::Sparse { .. } => SpanKind::Sparse,
            Self::SparseLinear { .. } => SpanKind::SparseLinear,
        }
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        match self {
            Self::Dense(v) => v.len(),
            Self::Sparse { offsets, .. } | Self::SparseLinear { offsets, .. } => {
                offsets.last().copied().unwrap_or(0)
            }
        }
    }

    /// `true` when the span covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored runs; a dense span counts one run per pixel.
    pub fn run_count(&self) -> usize {
        match self {
            Self::Dense(v) => v.len(),
            Self::Sparse { values, .. } => values.len(),
            Self::SparseLinear { runs, .. } => runs.len(),
        }
    }

    /// Run boundaries, or `None` for a dense span.
    pub fn offsets(&self) -> Option<&[usize]> {
        match self {
            Self::Dense(_) => None,
            Self::Sparse { offsets, .. } | Self::SparseLinear { offsets, .. } => Some(offsets),
        }
    }

    /// Value of pixel `i`, or `None` when out of range.
    pub fn get(&self, i: usize) -> Option<T> {
        if i >= self.len() {
            return None;
        }
        match self {
            Self::Dense(v) => v.get(i).copied(),
            Self::Sparse { offsets, values } => Some(values[run_of(offsets, i)]),
            Self::SparseLinear { offsets, runs } => {
                let r = run_of(offsets, i);
                Some(runs[r].at(i - offsets[r]))
            }
        }
    }

    /// Iterate every pixel value in order.
    pub fn iter(&self) -> SpanIter<'_, T> {
        SpanIter {
            span: self,
            run: 0,
            pos: 0,
            len: self.len(),
        }
    }

    /// Dense copy of this span. Converting a dense span yields an equal span.
    pub fn to_dense(&self) -> Self {
        match self {
            Self::Dense(v) => Self::Dense(v.clone()),
            _ => Self::Dense(self.iter().collect()),
        }
    }

    /// Materialize the per-pixel values.
    pub fn into_values(self) -> Vec<T> {
        match self {
            Self::Dense(v) => v,
            other => other.iter().collect(),
        }
    }

    /// Smallest and largest stored pixel value; `None` for empty spans.
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut it = self.iter();
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        }))
    }
}

/// Iterator over the pixel values of a [`Span`].
pub struct SpanIter<'a, T> {
    span: &'a Span<T>,
    run: usize,
    pos: usize,
    len: usize,
}

impl<T: Scalar> Iterator for SpanIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.pos >= self.len {
            return None;
        }
        let i = self.pos;
        self.pos += 1;
        match self.span {
            Span::Dense(v) => Some(v[i]),
            Span::Sparse { offsets, values } => {
                while offsets[self.run + 1] <= i {
                    self.run += 1;
                }
                Some(values[self.run])
            }
            Span::SparseLinear { offsets, runs } => {
                while offsets[self.run + 1] <= i {
                    self.run += 1;
                }
                Some(runs[self.run].at(i - offsets[self.run]))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.pos;
        (n, Some(n))
    }
}

impl<T: Scalar> ExactSizeIterator for SpanIter<'_, T> {}

fn run_of(offsets: &[usize], i: usize) -> usize {
    // Index of the last boundary <= i.
    offsets.partition_point(|&o| o <= i) - 1
}

fn check_offsets(offsets: &[usize], runs: usize) -> FilmWarpResult<()> {
    if offsets.first() != Some(&0) {
        return Err(FilmWarpError::validation("span offsets must start at 0"));
    }
    if offsets.len() != runs + 1 {
        return Err(FilmWarpError::validation(format!(
            "span has {} boundaries for {runs} runs",
            offsets.len()
        )));
    }
    if offsets.windows(2).any(|w| w[0] >= w[1]) {
        return Err(FilmWarpError::validation(
            "span offsets must be strictly increasing",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/span/span.rs"]
mod tests;
