//! Dense vector and matrix types for the forward recurrence.
//!
//! Row-major storage, no global state. Dimension mismatches are programming
//! errors and panic.

use std::ops::{Index, IndexMut};

/// Dense column vector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector(Vec<f64>);

impl Vector {
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    #[must_use]
    pub fn filled(len: usize, value: f64) -> Self {
        Self(vec![value; len])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Elementwise (Hadamard) product.
    #[must_use]
    pub fn hadamard(&self, other: &Self) -> Self {
        assert_eq!(self.len(), other.len(), "hadamard: length mismatch");
        self.0.iter().zip(&other.0).map(|(a, b)| a * b).collect()
    }

    /// Largest entry, or zero for an empty or all-negative vector.
    #[must_use]
    pub fn max_entry(&self) -> f64 {
        self.0.iter().copied().fold(0.0_f64, f64::max)
    }

    /// Divides every entry by `divisor` in place.
    pub fn divide_by(&mut self, divisor: f64) {
        for value in &mut self.0 {
            *value /= divisor;
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

/// Dense row-major matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Square matrix with `diag` on the diagonal.
    #[must_use]
    pub fn diagonal(diag: &Vector) -> Self {
        let n = diag.len();
        let mut m = Self::zeros(n, n);
        for (i, &value) in diag.iter().enumerate() {
            m[(i, i)] = value;
        }
        m
    }

    /// Builds a matrix from equal-length rows.
    ///
    /// Returns `None` if the rows are ragged.
    #[must_use]
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data: rows.concat(),
        })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                t[(j, i)] = self[(i, j)];
            }
        }
        t
    }

    /// Matrix × vector.
    #[must_use]
    pub fn mul_vector(&self, v: &Vector) -> Vector {
        assert_eq!(self.cols, v.len(), "mul_vector: dimension mismatch");
        (0..self.rows)
            .map(|i| self.row(i).iter().zip(v.iter()).map(|(a, b)| a * b).sum::<f64>())
            .collect()
    }

    /// Matrix × matrix.
    #[must_use]
    pub fn mul_matrix(&self, other: &Self) -> Self {
        assert_eq!(self.cols, other.rows, "mul_matrix: dimension mismatch");
        let mut out = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self[(i, k)];
                if a == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    out[(i, j)] += a * other[(k, j)];
                }
            }
        }
        out
    }

    #[must_use]
    pub fn row_sums(&self) -> Vector {
        (0..self.rows).map(|i| self.row(i).iter().sum::<f64>()).collect()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_none());
    }

    #[test]
    fn test_transpose() {
        let t = sample().transpose();
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t[(2, 1)], 6.0);
        assert_eq!(t[(0, 1)], 4.0);
        assert_eq!(t.transpose(), sample());
    }

    #[test]
    fn test_mul_vector() {
        let v = Vector::from(vec![1.0, 0.0, -1.0]);
        assert_eq!(sample().mul_vector(&v), Vector::from(vec![-2.0, -2.0]));
    }

    #[test]
    fn test_mul_matrix() {
        let m = sample();
        let product = m.mul_matrix(&m.transpose());
        assert_eq!(
            product,
            Matrix::from_rows(&[vec![14.0, 32.0], vec![32.0, 77.0]]).unwrap()
        );
    }

    #[test]
    fn test_diagonal_matches_hadamard() {
        let d = Vector::from(vec![2.0, 3.0]);
        let v = Vector::from(vec![5.0, 7.0]);
        assert_eq!(Matrix::diagonal(&d).mul_vector(&v), d.hadamard(&v));
    }

    #[test]
    fn test_row_sums() {
        assert_eq!(sample().row_sums(), Vector::from(vec![6.0, 15.0]));
    }

    #[test]
    fn test_divide_and_sum() {
        let mut v = Vector::filled(4, 0.5);
        assert_eq!(v.sum(), 2.0);
        v.divide_by(2.0);
        assert_eq!(v.sum(), 1.0);
    }

    #[test]
    fn test_max_entry() {
        assert_eq!(Vector::from(vec![0.1, 0.7, 0.2]).max_entry(), 0.7);
        assert_eq!(Vector::zeros(0).max_entry(), 0.0);
    }
}
