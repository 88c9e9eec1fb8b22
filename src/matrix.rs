use std::ops::Index;

use crate::error::{BlockDctError, Result};

/// Samples as produced by a block source, before the level shift.
pub type SampleMatrix = Matrix<i32>;

/// Rounded DCT-II coefficients, indexed by `(u, v)`. Wider than the samples so any `i32`
/// input block transforms without overflow.
pub type CoefficientMatrix = Matrix<i64>;

/// Positional quantization divisors. Every entry of a usable table is strictly positive.
pub type DivisorMatrix = Matrix<i32>;

/// Coefficients after division and rounding.
pub type QuantizedMatrix = Matrix<i64>;

/// A dense row-major grid.
///
/// Matrices are built once and never mutated afterwards; every pipeline stage reads its input
/// through a shared reference and returns a fresh matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy> Matrix<T> {
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((row, ragged)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(BlockDctError::Ragged {
                row,
                expected: width,
                actual: ragged.len(),
            });
        }

        // rows without entries carry no data, treat them as no rows at all
        if width == 0 {
            return Ok(Matrix {
                rows: 0,
                cols: 0,
                data: Vec::new(),
            });
        }

        Ok(Matrix {
            rows: height,
            cols: width,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub(crate) fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(rows * cols, data.len());
        Matrix { rows, cols, data }
    }

    /// Builds a `size x size` matrix by evaluating `f(row, col)` for every position.
    pub fn from_fn(size: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let data = (0..size * size).map(|i| f(i / size, i % size)).collect();
        Matrix::from_vec(size, size, data)
    }

    pub fn filled(size: usize, value: T) -> Self {
        Matrix::from_vec(size, size, vec![value; size * size])
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics, an empty matrix has no rows to yield anyway
        self.data.chunks(self.cols.max(1))
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(<[T]>::to_vec).collect()
    }

    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Matrix<U> {
        Matrix::from_vec(self.rows, self.cols, self.data.iter().map(|v| f(*v)).collect())
    }

    /// Fails with a shape error unless this matrix is exactly `size x size`.
    pub fn ensure_shape(&self, size: usize) -> Result<()> {
        match self.rows == size && self.cols == size {
            true => Ok(()),
            false => Err(BlockDctError::Shape {
                expected: size,
                rows: self.rows,
                cols: self.cols,
            }),
        }
    }
}

impl<T: Copy + Default + PartialEq> Matrix<T> {
    /// Number of entries equal to `T::default()`; for quantized blocks, the zero run the entropy
    /// coder would get to skip.
    pub fn count_zeros(&self) -> usize {
        let zero = T::default();
        self.data.iter().filter(|v| **v == zero).count()
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[row * self.cols + col]
    }
}
