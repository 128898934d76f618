use tracing::debug;

use super::matrix::Matrix;
use crate::element::{Element, FloatElement};
use crate::error::{Result, TensorError};
use crate::tensor::{SliceEntry, SliceSpec};

impl<T: Element> Matrix<T> {
    /// Matrix product, `self.width` must equal `other.height`. Integer
    /// overflow wraps like the element-wise ops.
    pub fn mat_mul(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        if self.width != other.height {
            return Err(TensorError::mismatch(format!(
                "cannot multiply a {}x{} matrix by a {}x{} matrix",
                self.height, self.width, other.height, other.width
            )));
        }
        let (m, n) = (self.height, other.width);
        let mut data = vec![T::zero(); m * n];
        for i in 0..m {
            let out = &mut data[i * n..(i + 1) * n];
            for k in 0..self.width {
                let a = self.data[i * self.width + k];
                let row = &other.data[k * n..(k + 1) * n];
                for (o, &b) in out.iter_mut().zip(row.iter()) {
                    *o = T::wrapping_add(*o, T::wrapping_mul(a, b));
                }
            }
        }
        Ok(Matrix { height: m, width: n, data })
    }

    pub fn transpose(&self) -> Matrix<T> {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.width {
            for i in 0..self.height {
                data.push(self.data[i * self.width + j]);
            }
        }
        Matrix { height: self.width, width: self.height, data }
    }

    /// Sum of the main diagonal, for a non square matrix the diagonal stops
    /// at the shorter side
    pub fn trace(&self) -> T {
        (0..self.height.min(self.width)).fold(T::zero(), |acc, i| acc.wrapping_add(self.data[i * self.width + i]))
    }
}

impl<T: FloatElement> Matrix<T> {
    /// Euclidean norm of all cells
    pub fn norm(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x * x).sqrt()
    }

    /// Householder reflection `H = I - 2 v v^T / (v^T v)` with
    /// `v = x + sign(x_0) |x| e_1`, so that `H x` is a multiple of `e_1`.
    /// A zero column reflects onto itself and yields the identity.
    pub fn householder(column: &Matrix<T>) -> Result<Matrix<T>> {
        if column.width != 1 {
            return Err(TensorError::mismatch(format!(
                "a householder reflection needs a column vector, got a {}x{} matrix",
                column.height, column.width
            )));
        }
        let n = column.height;
        let mut v = column.data.clone();
        let sign = if v[0] < T::zero() { -T::one() } else { T::one() };
        v[0] = v[0] + sign * column.norm();

        let vtv = v.iter().fold(T::zero(), |acc, &x| acc + x * x);
        let mut h = Matrix::identity(n)?;
        if vtv == T::zero() {
            return Ok(h);
        }
        let scale = T::from_f64(2.0) / vtv;
        for i in 0..n {
            for j in 0..n {
                h.data[i * n + j] = h.data[i * n + j] - scale * v[i] * v[j];
            }
        }
        Ok(h)
    }

    /// Thin QR decomposition by Householder reflections. For an `m x n`
    /// matrix with `k = min(m, n)`, `Q` is `m x k` with orthonormal columns
    /// and `R` is `k x n` upper triangular, `Q R` reproduces `self`.
    pub fn qr_decomposition(&self) -> Result<(Matrix<T>, Matrix<T>)> {
        let (m, n) = (self.height, self.width);
        let k = m.min(n);
        let mut q = Matrix::identity(m)?;
        let mut r = self.clone();

        for j in 0..(m - 1).min(n) {
            let lower = SliceEntry::Range(j as isize, (m - 1) as isize);
            let x = r.slice(&SliceSpec::new(vec![lower, SliceEntry::Index(j as isize)]))?;
            let h_sub = Matrix::householder(&x)?;

            let mut h = Matrix::identity(m)?;
            h.set_slice(&h_sub, &SliceSpec::new(vec![lower, lower]))?;
            r = h.mat_mul(&r)?;
            q = q.mat_mul(&h)?;
            debug!("qr: reflected column {} of a {}x{} matrix", j, m, n);
        }

        // clear the rounding noise left below the diagonal
        for i in 0..m {
            for j in 0..i.min(n) {
                r.data[i * n + j] = T::zero();
            }
        }

        let q = q.slice(&SliceSpec::new(vec![SliceEntry::Full, SliceEntry::Range(0, k as isize - 1)]))?;
        let r = r.slice(&SliceSpec::new(vec![SliceEntry::Range(0, k as isize - 1), SliceEntry::Full]))?;
        Ok((q, r))
    }
}
