//! A borrowed, row-major matrix for quick row and column-based data access
//!
//! `Matrix` holds the term-term similarity scores of two sets of terms
//! while they are combined by a
//! [`SimilarityCombiner`](`crate::similarity::SimilarityCombiner`).
//! Row `i` belongs to the `i`-th term of the first set, column `j`
//! to the `j`-th term of the second set.
//!
//! | Index |   0 |   1 |   2 |
//! |:----- | ---:| ---:| ---:|
//! | **0** | 0.1 | 0.2 | 0.3 |
//! | **1** | 0.4 | 0.5 | 0.6 |
//!
//! ```
//! use phenosim::matrix::Matrix;
//! let data = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
//! let m = Matrix::new(2, 3, &data);
//!
//! let rows: Vec<f64> = m.rows().map(|row| row.sum()).collect();
//! assert!((rows[0] - 0.6).abs() < 1e-12);
//!
//! let cols: Vec<Vec<f64>> = m.cols().map(|col| col.copied().collect()).collect();
//! assert_eq!(cols[2], vec![0.3, 0.6]);
//! ```
use std::fmt::{Debug, Display};
use std::iter::StepBy;
use std::slice::{ChunksExact, Iter};

/// A borrowed, row-major matrix
///
/// The number of rows and columns is not checked against the length of
/// `data`, callers must make sure that `rows * cols == data.len()`.
pub struct Matrix<'a, T> {
    rows: usize,
    cols: usize,
    data: &'a [T],
}

impl<'a, T> Matrix<'a, T> {
    /// Creates a new Matrix from `data` with `rows` number of rows
    /// and `cols` number of columns
    pub fn new(rows: usize, cols: usize, data: &'a [T]) -> Self {
        debug_assert_eq!(rows * cols, data.len());
        Self { rows, cols, data }
    }

    /// Returns the total number of values
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the `Matrix` does not contain any data
    ///
    /// ```
    /// use phenosim::matrix::Matrix;
    /// let data: Vec<f64> = vec![];
    /// assert!(Matrix::new(0, 3, &data).is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a tuple with number of rows and number of columns
    pub fn dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the value at `row` and `col`, or `None` if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&'a T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Iterates the rows of the matrix
    pub fn rows(&self) -> Rows<'a, T> {
        Rows {
            // `chunks_exact` panics on a chunk size of 0
            inner: self.data.chunks_exact(self.cols.max(1)),
        }
    }

    /// Iterates the columns of the matrix
    pub fn cols(&self) -> Columns<'a, T> {
        Columns {
            data: if self.rows == 0 { &self.data[..0] } else { self.data },
            cols: self.cols,
            idx: 0,
        }
    }
}

impl<T: Display> Debug for Matrix<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let v: Vec<String> = row.map(|v| format!("{v}")).collect();
            writeln!(f, "[{}]", v.join(", "))?;
        }
        Ok(())
    }
}

/// Iterates the rows of a `Matrix`, yielding an Iterator over the row values
pub struct Rows<'a, T> {
    inner: ChunksExact<'a, T>,
}

impl<'a, T> Iterator for Rows<'a, T> {
    type Item = Iter<'a, T>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(<[T]>::iter)
    }
}

/// Iterates the columns of a `Matrix`, yielding an Iterator over the column values
pub struct Columns<'a, T> {
    data: &'a [T],
    cols: usize,
    idx: usize,
}

impl<'a, T> Iterator for Columns<'a, T> {
    type Item = StepBy<Iter<'a, T>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.cols || self.data.is_empty() {
            return None;
        }
        let col = self.data[self.idx..].iter().step_by(self.cols);
        self.idx += 1;
        Some(col)
    }
}
