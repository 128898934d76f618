use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

use rand::distributions::uniform::SampleUniform;
use rand::distributions::Distribution;
use rand::Rng;

use crate::element::{Element, FloatElement, IntElement, Value};
use crate::error::{Result, TensorError};
use crate::tensor::shape::check_dims;
use crate::tensor::{self, copier, ArrayData, Assign, Nested, Selection, Shape, SliceSpec, Tensor};

/// Dense `height x width` matrix, row-major. Slicing always keeps both
/// dimensions, so every slice of a matrix is a matrix again.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    pub(crate) height: usize,
    pub(crate) width: usize,
    pub(crate) data: Vec<T>,
}

fn check_size(height: usize, width: usize) -> Result<()> {
    check_dims(&[height, width])
}

impl<T: Element> Matrix<T> {
    pub fn constant(value: T, height: usize, width: usize) -> Result<Matrix<T>> {
        check_size(height, width)?;
        Ok(Matrix { height, width, data: vec![value; height * width] })
    }

    pub fn zeros(height: usize, width: usize) -> Result<Matrix<T>> {
        Matrix::constant(T::zero(), height, width)
    }

    pub fn ones(height: usize, width: usize) -> Result<Matrix<T>> {
        Matrix::constant(T::one(), height, width)
    }

    /// `size x width` matrix (square when `width` is `None`) holding `value`
    /// on the main diagonal
    pub fn eye(size: usize, value: T, width: Option<usize>) -> Result<Matrix<T>> {
        let mut m = Matrix::zeros(size, width.unwrap_or(size))?;
        for i in 0..size.min(m.width) {
            m.data[i * m.width + i] = value;
        }
        Ok(m)
    }

    pub fn identity(size: usize) -> Result<Matrix<T>> {
        Matrix::eye(size, T::one(), None)
    }

    /// Square matrix with `values` on the main diagonal
    pub fn diagonal(values: &[T]) -> Result<Matrix<T>> {
        let n = values.len();
        let mut m = Matrix::zeros(n, n)?;
        for (i, &v) in values.iter().enumerate() {
            m.data[i * n + i] = v;
        }
        Ok(m)
    }

    pub fn from_vec(data: Vec<T>, height: usize, width: usize) -> Result<Matrix<T>> {
        check_size(height, width)?;
        if data.len() != height * width {
            return Err(TensorError::invalid_shape(&[height, width]));
        }
        Ok(Matrix { height, width, data })
    }

    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Matrix<T>> {
        Matrix::from_nested(Nested::from_rows(rows))
    }

    pub fn from_nested(nested: impl Into<Nested<T>>) -> Result<Matrix<T>> {
        Matrix::try_from(Tensor::from_nested(nested)?)
    }

    /// Flat data needs explicit dimensions, nested data brings its own
    /// unless they are forced
    pub fn from_data(data: impl Into<ArrayData<T>>, dims: Option<(usize, usize)>) -> Result<Matrix<T>> {
        match (data.into(), dims) {
            (ArrayData::Flat(v), Some((h, w))) => Matrix::from_vec(v, h, w),
            (ArrayData::Flat(_), None) => {
                Err(TensorError::InvalidArgument("flat matrix data needs a height and a width".to_string()))
            }
            (ArrayData::Nested(n), Some((h, w))) => Matrix::try_from(Tensor::from_data(n, Some(&[h, w]))?),
            (ArrayData::Nested(n), None) => Matrix::from_nested(n),
        }
    }

    pub(crate) fn with_data<U>(&self, data: Vec<U>) -> Matrix<U> {
        debug_assert_eq!(data.len(), self.data.len());
        Matrix { height: self.height, width: self.width, data }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.height, self.width]
    }

    pub(crate) fn layout(&self) -> Shape {
        Shape::matrix(self.height, self.width)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_square(&self) -> bool {
        self.height == self.width
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.height || col >= self.width {
            return Err(TensorError::OutOfBounds { row, col, height: self.height, width: self.width });
        }
        Ok(row * self.width + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        Ok(self.data[self.offset(row, col)?])
    }

    pub fn set(&mut self, value: T, row: usize, col: usize) -> Result<()> {
        let i = self.offset(row, col)?;
        self.data[i] = value;
        Ok(())
    }

    pub fn set_value(&mut self, value: Value, row: usize, col: usize) -> Result<()> {
        let value = T::from_value(value)?;
        self.set(value, row, col)
    }

    /// Unlike tensors, matrices do not accept negative coordinates here
    pub fn contains(&self, coords: &[isize]) -> bool {
        match coords {
            &[row, col] => 0 <= row && row < self.height as isize && 0 <= col && col < self.width as isize,
            _ => false,
        }
    }

    pub fn slice(&self, spec: &SliceSpec) -> Result<Matrix<T>> {
        let (dims, data) = copier::extract(&self.layout(), &self.data, spec, true)?;
        Ok(Matrix { height: dims[0], width: dims[1], data })
    }

    pub fn row(&self, i: usize) -> Result<Matrix<T>> {
        self.slice(&SliceSpec::new(vec![i.into(), (..).into()]))
    }

    pub fn column(&self, j: usize) -> Result<Matrix<T>> {
        self.slice(&SliceSpec::new(vec![(..).into(), j.into()]))
    }

    /// Copies `values` into the region, which must be exactly `values`' size
    pub fn set_slice(&mut self, values: &Matrix<T>, spec: &SliceSpec) -> Result<()> {
        let layout = self.layout();
        copier::scatter(&layout, &mut self.data, spec, &values.shape(), &values.data)
    }

    pub fn set_array_as_slice(&mut self, values: impl Into<ArrayData<T>>, spec: &SliceSpec) -> Result<()> {
        let layout = self.layout();
        match values.into() {
            ArrayData::Flat(v) => copier::scatter_flat(&layout, &mut self.data, spec, &v),
            ArrayData::Nested(n) => {
                let (dims, v) = n.infer_shape_and_flatten()?;
                copier::scatter(&layout, &mut self.data, spec, &dims, &v)
            }
        }
    }

    pub fn select(&self, spec: &SliceSpec) -> Result<Selection<Matrix<T>, T>> {
        if spec.is_point() && spec.len() == 2 {
            spec.validate(&self.shape())?;
            if let Some(&[row, col]) = spec.point_coords().as_deref() {
                return Ok(Selection::Scalar(self.get(row, col)?));
            }
        }
        Ok(Selection::Array(self.slice(spec)?))
    }

    pub fn assign(&mut self, spec: &SliceSpec, value: Assign<'_, Matrix<T>, T>) -> Result<()> {
        match value {
            Assign::Scalar(v) => {
                let v = T::from_value(v)?;
                spec.validate(&self.shape())?;
                match spec.point_coords().as_deref() {
                    Some(&[row, col]) => self.set(v, row, col),
                    _ => Err(TensorError::mismatch(format!(
                        "a scalar can only be assigned to a single cell, got the slice {}",
                        spec
                    ))),
                }
            }
            Assign::Array(m) => self.set_slice(m, spec),
            Assign::Raw(raw) => self.set_array_as_slice(raw, spec),
        }
    }

    pub fn map<U: Element, F: Fn(T) -> U>(&self, f: F) -> Matrix<U> {
        self.with_data(self.data.iter().map(|&x| f(x)).collect())
    }

    pub fn apply<F: FnMut(T) -> T>(&mut self, mut f: F) -> &mut Self {
        self.data.iter_mut().for_each(|x| *x = f(*x));
        self
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.data.chunks(self.width).map(|r| r.to_vec()).collect()
    }

    pub fn equals_within(&self, other: &Matrix<T>, tolerance: f64) -> bool {
        self.shape() == other.shape()
            && self.data.iter().zip(other.data.iter()).all(|(&a, &b)| a.close_to(b, tolerance))
    }

    /// Same value a tensor holding the same cells would hash to
    pub fn hash_code(&self) -> u64 {
        tensor::hash_cells(&self.shape(), &self.data)
    }
}

impl<T: Element + SampleUniform> Matrix<T> {
    pub fn random_uniform(height: usize, width: usize, low: T, high: T) -> Result<Matrix<T>> {
        Matrix::random_uniform_with(&mut rand::thread_rng(), height, width, low, high)
    }

    pub fn random_uniform_with<R: Rng + ?Sized>(
        rng: &mut R,
        height: usize,
        width: usize,
        low: T,
        high: T,
    ) -> Result<Matrix<T>> {
        check_size(height, width)?;
        let dist = tensor::uniform(low, high)?;
        let data = (0..height * width).map(|_| dist.sample(rng)).collect();
        Ok(Matrix { height, width, data })
    }
}

impl<T: FloatElement> Matrix<T> {
    pub fn random_normal(height: usize, width: usize, mu: T, sigma: T) -> Result<Matrix<T>> {
        Matrix::random_normal_with(&mut rand::thread_rng(), height, width, mu, sigma)
    }

    pub fn random_normal_with<R: Rng + ?Sized>(
        rng: &mut R,
        height: usize,
        width: usize,
        mu: T,
        sigma: T,
    ) -> Result<Matrix<T>> {
        check_size(height, width)?;
        let data = tensor::box_muller(rng, height * width, mu.as_f64(), sigma.as_f64())?;
        Ok(Matrix { height, width, data: data.into_iter().map(T::from_f64).collect() })
    }
}

impl<T: IntElement> Matrix<T> {
    pub fn random_binomial(height: usize, width: usize, trials: u64, probability: f64) -> Result<Matrix<T>> {
        Matrix::random_binomial_with(&mut rand::thread_rng(), height, width, trials, probability)
    }

    pub fn random_binomial_with<R: Rng + ?Sized>(
        rng: &mut R,
        height: usize,
        width: usize,
        trials: u64,
        probability: f64,
    ) -> Result<Matrix<T>> {
        let t = Tensor::random_binomial_with(rng, &[height, width], trials, probability)?;
        Matrix::try_from(t)
    }
}

impl<T> From<Matrix<T>> for Tensor<T> {
    fn from(m: Matrix<T>) -> Tensor<T> {
        Tensor { shape: Shape::matrix(m.height, m.width), data: m.data }
    }
}

impl<T> TryFrom<Tensor<T>> for Matrix<T> {
    type Error = TensorError;

    fn try_from(t: Tensor<T>) -> Result<Matrix<T>> {
        match *t.shape.dims() {
            [height, width] => Ok(Matrix { height, width, data: t.data }),
            ref dims => Err(TensorError::mismatch(format!("a matrix needs 2 dimensions, got {:?}", dims))),
        }
    }
}

impl<T: IntElement> Eq for Matrix<T> {}

impl<T: Element> Hash for Matrix<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_code().hash(state);
    }
}

impl<T: Element> Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        tensor::pretty_write(f, &self.data, &self.shape())
    }
}

impl<T: Element> Index<[usize; 2]> for Matrix<T> {
    type Output = T;
    fn index(&self, [row, col]: [usize; 2]) -> &T {
        match self.offset(row, col) {
            Ok(i) => &self.data[i],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Element> IndexMut<[usize; 2]> for Matrix<T> {
    fn index_mut(&mut self, [row, col]: [usize; 2]) -> &mut T {
        match self.offset(row, col) {
            Ok(i) => &mut self.data[i],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<'a, T> IntoIterator for &'a Matrix<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T> IntoIterator for Matrix<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
