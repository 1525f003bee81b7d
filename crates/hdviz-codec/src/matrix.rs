// SPDX-License-Identifier: Apache-2.0

use crate::element::Element;
use std::ops::{Add, Mul};

/// Column-major dense matrix.
///
/// Rows index the ambient dimension and columns index samples, so a column
/// is one sample point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseMatrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Element> DenseMatrix<T> {
    /// Returns `None` when `data.len() != rows * cols`.
    #[must_use]
    pub fn from_column_major(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        (rows.checked_mul(cols) == Some(data.len())).then_some(Self { rows, cols, data })
    }

    #[must_use]
    pub fn from_row_major(rows: usize, cols: usize, data: &[T]) -> Option<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return None;
        }
        let mut out = Vec::with_capacity(data.len());
        for c in 0..cols {
            for r in 0..rows {
                out.push(data[r * cols + c]);
            }
        }
        Some(Self {
            rows,
            cols,
            data: out,
        })
    }

    /// Builds a matrix from a slice of rows; all rows must share a length.
    #[must_use]
    pub fn from_rows(rows: &[Vec<T>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let flat: Vec<T> = rows.iter().flatten().copied().collect();
        Self::from_row_major(rows.len(), cols, &flat)
    }

    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Panics when out of bounds, like slice indexing.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        self.data[col * self.rows + row]
    }

    #[must_use]
    pub fn try_get(&self, row: usize, col: usize) -> Option<T> {
        (row < self.rows && col < self.cols).then(|| self.data[col * self.rows + row])
    }

    #[must_use]
    pub fn column(&self, col: usize) -> &[T] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact panics on a zero chunk size.
        self.data.chunks_exact(self.rows.max(1))
    }

    #[must_use]
    pub fn same_shape<U>(&self, other: &DenseMatrix<U>) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }
}

impl<T> DenseMatrix<T>
where
    T: Element + Add<Output = T> + Mul<Output = T>,
{
    /// Adds `v[r]` to every entry of row `r`, column by column.
    ///
    /// `v` must hold one entry per row.
    pub fn add_columnwise(&mut self, v: &[T]) {
        debug_assert_eq!(v.len(), self.rows);
        for column in self.data.chunks_exact_mut(self.rows.max(1)) {
            for (x, offset) in column.iter_mut().zip(v) {
                *x = *x + *offset;
            }
        }
    }

    pub fn scale(&mut self, factor: T) {
        for x in &mut self.data {
            *x = *x * factor;
        }
    }
}

impl<T: Element + PartialOrd> DenseMatrix<T> {
    /// Minimum of every row, or `None` for a matrix without columns.
    #[must_use]
    pub fn row_min(&self) -> Option<Vec<T>> {
        self.row_fold(|acc, x| if x < acc { x } else { acc })
    }

    #[must_use]
    pub fn row_max(&self) -> Option<Vec<T>> {
        self.row_fold(|acc, x| if x > acc { x } else { acc })
    }

    fn row_fold(&self, pick: impl Fn(T, T) -> T) -> Option<Vec<T>> {
        if self.cols == 0 {
            return None;
        }
        let mut acc = self.column(0).to_vec();
        for column in self.columns().skip(1) {
            for (a, x) in acc.iter_mut().zip(column) {
                *a = pick(*a, *x);
            }
        }
        Some(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DenseMatrix<f64> {
        DenseMatrix::from_rows(&[vec![1.0, 5.0, -2.0], vec![4.0, 0.5, 9.0]]).expect("matrix")
    }

    #[test]
    fn storage_is_column_major() {
        let m = sample();
        assert_eq!(m.as_slice(), &[1.0, 4.0, 5.0, 0.5, -2.0, 9.0]);
        assert_eq!(m.column(1), &[5.0, 0.5]);
        assert_eq!(m.get(1, 2), 9.0);
        assert_eq!(m.try_get(2, 0), None);
    }

    #[test]
    fn row_extrema_scan_all_columns() {
        let m = sample();
        assert_eq!(m.row_min(), Some(vec![-2.0, 0.5]));
        assert_eq!(m.row_max(), Some(vec![5.0, 9.0]));
        assert_eq!(DenseMatrix::<f64>::zeros(3, 0).row_min(), None);
    }

    #[test]
    fn add_columnwise_then_scale() {
        let mut m = sample();
        m.add_columnwise(&[1.0, -1.0]);
        m.scale(2.0);
        assert_eq!(m.column(0), &[4.0, 6.0]);
        assert_eq!(m.column(2), &[-2.0, 16.0]);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        assert!(DenseMatrix::from_column_major(2, 2, vec![1_i32, 2, 3]).is_none());
        assert!(DenseMatrix::from_rows(&[vec![1_i32], vec![2, 3]]).is_none());
        let huge = 1_usize << (usize::BITS - 1);
        assert!(DenseMatrix::<f64>::from_column_major(huge, 2, Vec::new()).is_none());
        assert!(DenseMatrix::<f64>::from_row_major(huge, 2, &[]).is_none());
    }
}
