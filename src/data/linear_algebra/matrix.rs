//! # Dense matrix
//!
//! The dense numeric container underneath every simplex tableau. Besides the usual element access
//! it offers the row operations the pivoting algorithms are built from, a row addition across two
//! matrices for the Big-M coupling, and shape mutations used when constraints are injected into an
//! already solved tableau.
use std::error::Error;
use std::fmt;
use std::slice::Iter;

/// Row-major dense matrix of `f64` values.
///
/// Dimensions only change through the explicit `insert_*` and `remove_*` operations.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    data: Vec<Vec<f64>>,
    nr_rows: usize,
    nr_columns: usize,
}

impl DenseMatrix {
    /// Create a matrix of zeros of dimension `nr_rows` x `nr_columns`.
    pub fn zeros(nr_rows: usize, nr_columns: usize) -> Self {
        debug_assert!(nr_rows > 0);
        debug_assert!(nr_columns > 0);

        Self {
            data: vec![vec![0_f64; nr_columns]; nr_rows],
            nr_rows,
            nr_columns,
        }
    }

    /// Create a matrix from the provided rows.
    pub fn from_data(data: Vec<Vec<f64>>) -> Self {
        let nr_rows = data.len();
        debug_assert!(nr_rows > 0);
        let nr_columns = data[0].len();
        debug_assert!(data.iter().all(|row| row.len() == nr_columns));

        Self { data, nr_rows, nr_columns }
    }

    /// Get the value at coordinate (`i`, `j`).
    pub fn get_value(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.nr_rows);
        debug_assert!(j < self.nr_columns);

        self.data[i][j]
    }

    /// Set the value at coordinate (`i`, `j`) to `value`.
    pub fn set_value(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i < self.nr_rows);
        debug_assert!(j < self.nr_columns);

        self.data[i][j] = value;
    }

    /// Get all values in row `i` of this matrix.
    pub fn row(&self, i: usize) -> Iter<'_, f64> {
        debug_assert!(i < self.nr_rows);

        self.data[i].iter()
    }

    /// Multiply row `i` with a factor `factor`.
    pub fn multiply_row(&mut self, i: usize, factor: f64) {
        debug_assert!(i < self.nr_rows);

        for value in self.data[i].iter_mut() {
            *value *= factor;
        }
    }

    /// Add a multiple of row `read_row` to row `write_row`.
    pub fn mul_add_rows(&mut self, read_row: usize, write_row: usize, factor: f64) {
        debug_assert!(read_row < self.nr_rows);
        debug_assert!(write_row < self.nr_rows);
        debug_assert_ne!(read_row, write_row);

        for j in 0..self.nr_columns {
            self.data[write_row][j] += factor * self.data[read_row][j];
        }
    }

    /// Add a multiple of row `read_row` of `source` to row `write_row` of this matrix.
    ///
    /// This couples the primary tableau matrix to its Big-M companion: eliminating an artificial
    /// variable's contribution requires adding rows of one matrix into the other.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` when the two matrices don't have the same number of columns.
    pub fn mul_add_row_from(
        &mut self,
        write_row: usize,
        source: &DenseMatrix,
        read_row: usize,
        factor: f64,
    ) -> Result<(), ShapeMismatch> {
        debug_assert!(write_row < self.nr_rows);
        debug_assert!(read_row < source.nr_rows);

        if source.nr_columns != self.nr_columns {
            return Err(ShapeMismatch::ColumnCountMismatch {
                left: self.nr_columns,
                right: source.nr_columns,
            });
        }

        for j in 0..self.nr_columns {
            self.data[write_row][j] += factor * source.data[read_row][j];
        }

        Ok(())
    }

    /// Insert a zero-filled row before index `index` (`index == nr_rows` appends).
    pub fn insert_row(&mut self, index: usize) -> Result<(), ShapeMismatch> {
        if index > self.nr_rows {
            return Err(ShapeMismatch::RowOutOfBounds { index, nr_rows: self.nr_rows });
        }

        self.data.insert(index, vec![0_f64; self.nr_columns]);
        self.nr_rows += 1;

        Ok(())
    }

    /// Insert a zero-filled column before index `index` (`index == nr_columns` appends).
    pub fn insert_column(&mut self, index: usize) -> Result<(), ShapeMismatch> {
        if index > self.nr_columns {
            return Err(ShapeMismatch::ColumnOutOfBounds { index, nr_columns: self.nr_columns });
        }

        for row in self.data.iter_mut() {
            row.insert(index, 0_f64);
        }
        self.nr_columns += 1;

        Ok(())
    }

    /// Remove the row at `index`.
    pub fn remove_row(&mut self, index: usize) -> Result<(), ShapeMismatch> {
        if index >= self.nr_rows || self.nr_rows == 1 {
            return Err(ShapeMismatch::RowOutOfBounds { index, nr_rows: self.nr_rows });
        }

        self.data.remove(index);
        self.nr_rows -= 1;

        Ok(())
    }

    /// Remove the column at `index`.
    pub fn remove_column(&mut self, index: usize) -> Result<(), ShapeMismatch> {
        if index >= self.nr_columns || self.nr_columns == 1 {
            return Err(ShapeMismatch::ColumnOutOfBounds { index, nr_columns: self.nr_columns });
        }

        for row in self.data.iter_mut() {
            row.remove(index);
        }
        self.nr_columns -= 1;

        Ok(())
    }

    /// Get the number of rows in this matrix.
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// Get the number of columns in this matrix.
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }
}

/// A matrix operation was given incompatible dimensions.
///
/// The malformed operation is rejected outright so the enclosing solve can abort with a clear
/// diagnostic instead of continuing on a half-mutated matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeMismatch {
    /// A row index outside the current row range.
    RowOutOfBounds {
        /// The offending index.
        index: usize,
        /// The number of rows the matrix has.
        nr_rows: usize,
    },
    /// A column index outside the current column range.
    ColumnOutOfBounds {
        /// The offending index.
        index: usize,
        /// The number of columns the matrix has.
        nr_columns: usize,
    },
    /// Two matrices that should be coupled row-wise have different widths.
    ColumnCountMismatch {
        /// Number of columns of the matrix being written to.
        left: usize,
        /// Number of columns of the matrix being read from.
        right: usize,
    },
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::RowOutOfBounds { index, nr_rows } => {
                write!(f, "row index {} out of bounds for a matrix with {} rows", index, nr_rows)
            },
            Self::ColumnOutOfBounds { index, nr_columns } => {
                write!(
                    f,
                    "column index {} out of bounds for a matrix with {} columns",
                    index, nr_columns,
                )
            },
            Self::ColumnCountMismatch { left, right } => {
                write!(f, "can't couple rows of matrices with {} and {} columns", left, right)
            },
        }
    }
}

impl Error for ShapeMismatch {
}
