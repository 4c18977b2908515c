use super::*;

/// Dense row-major matrix of reals.
///
/// Serves as coordinate storage (N×D), raw cost matrix (N×M) and
/// transport plan (N×M). Entries are addressed as `(row, col)`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Wraps a row-major buffer, checking that it holds exactly rows×cols values.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, TransportError> {
        if data.len() == rows * cols {
            Ok(Self { rows, cols, data })
        } else {
            Err(TransportError::ShapeMismatch {
                expected: (rows, cols),
                found: (data.len() / cols.max(1), cols),
            })
        }
    }
    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.; rows * cols],
        }
    }
    /// Single-column matrix, one row per value.
    pub fn column(values: Vec<f64>) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] = value;
    }
    /// Adds `delta` to the entry at (i, j).
    pub fn increment(&mut self, i: usize, j: usize, delta: f64) {
        self.data[i * self.cols + j] += delta;
    }
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
    /// Row-major iteration over every entry.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }
    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Entrywise transform.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().copied().map(f).collect(),
        }
    }
    /// Entrywise power. Exponent one is returned untouched.
    pub fn powf(&self, p: Exponent) -> Self {
        if p == 1. {
            self.clone()
        } else {
            self.map(|x| x.powf(p))
        }
    }
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
    /// Sum of every row, one entry per row.
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.rows).map(|i| self.row(i).iter().sum()).collect()
    }
    /// Sum of every column, one entry per column.
    pub fn col_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.; self.cols];
        for i in 0..self.rows {
            for (sum, x) in sums.iter_mut().zip(self.row(i)) {
                *sum += x;
            }
        }
        sums
    }
    /// Frobenius inner product Σ self[i,j]·other[i,j].
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn dot(&self, other: &Self) -> f64 {
        assert!(self.shape() == other.shape(), "dot of mismatched shapes");
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }
    /// Appends `extra` zero-valued columns.
    pub fn pad(&self, extra: usize) -> Self {
        let cols = self.cols + extra;
        let mut data = Vec::with_capacity(self.rows * cols);
        for i in 0..self.rows {
            data.extend_from_slice(self.row(i));
            data.extend(std::iter::repeat_n(0., extra));
        }
        Self {
            rows: self.rows,
            cols,
            data,
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = TransportError;
    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        let n = rows.len();
        let d = rows.first().map(Vec::len).unwrap_or(0);
        match rows.iter().find(|row| row.len() != d) {
            Some(ragged) => Err(TransportError::ShapeMismatch {
                expected: (n, d),
                found: (n, ragged.len()),
            }),
            None => Self::new(n, d, rows.into_iter().flatten().collect()),
        }
    }
}
