use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

use tracing::trace;

use super::copier;
use super::format::pretty_write;
use super::nested::{ArrayData, Nested};
use super::shape::Shape;
use super::slice::SliceSpec;
use super::walker::{is_permutation, Coords};
use crate::element::{Element, IntElement, Value};
use crate::error::{Result, TensorError};

/////////////////////////////////////////////////////////////////////
// Dense N-dimensional array owning a row-major flat store.
// Supports coordinate indexing, rectangular slicing and reshaping.
/////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    pub(crate) shape: Shape,
    pub(crate) data: Vec<T>,
}

/// What reading through a `SliceSpec` produced: a single cell when every
/// entry was an index, a sub-array otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<A, T> {
    Scalar(T),
    Array(A),
}

impl<A, T> Selection<A, T> {
    pub fn scalar(self) -> Option<T> {
        match self {
            Selection::Scalar(x) => Some(x),
            Selection::Array(_) => None,
        }
    }

    pub fn array(self) -> Option<A> {
        match self {
            Selection::Array(a) => Some(a),
            Selection::Scalar(_) => None,
        }
    }
}

/// A value written through a `SliceSpec`. The variant decides how the
/// write is carried out.
#[derive(Debug, Clone, PartialEq)]
pub enum Assign<'a, A, T> {
    /// Written to the single cell a point spec addresses
    Scalar(Value),
    /// Copied into the region, its shape must match the region's
    Array(&'a A),
    /// Unshaped or nested raw data copied into the region
    Raw(ArrayData<T>),
}

/// Hashing modulus, the hash stays below 2^62
pub(crate) const HASH_MODULUS: i128 = 2 << 61;

/// Order sensitive hash over shape and the floored cell values
pub(crate) fn hash_cells<T: Element>(dims: &[usize], data: &[T]) -> u64 {
    let m = HASH_MODULUS;
    let mut h = (31 + dims.len() as i128) % m;
    h = (37 * h + data.len() as i128) % m;
    for &d in dims {
        h = (41 * h + d as i128) % m;
    }
    for &x in data {
        h = (43 * h + x.floor_i64() as i128).rem_euclid(m);
    }
    h as u64
}

impl<T: Element> Tensor<T> {
    pub fn constant(value: T, dims: &[usize]) -> Result<Tensor<T>> {
        let shape = Shape::new(dims)?;
        let data = vec![value; shape.numel()];
        Ok(Tensor { shape, data })
    }

    pub fn zeros(dims: &[usize]) -> Result<Tensor<T>> {
        Tensor::constant(T::zero(), dims)
    }

    pub fn ones(dims: &[usize]) -> Result<Tensor<T>> {
        Tensor::constant(T::one(), dims)
    }

    /// Fills every cell with `f(coords)`
    pub fn from_fn<F: FnMut(&[usize]) -> T>(dims: &[usize], mut f: F) -> Result<Tensor<T>> {
        let shape = Shape::new(dims)?;
        let data = Coords::new(dims).map(|c| f(&c)).collect();
        Ok(Tensor { shape, data })
    }

    /// Wraps a row-major store. The cell count has to match `dims` exactly.
    pub fn from_vec(data: Vec<T>, dims: &[usize]) -> Result<Tensor<T>> {
        let shape = Shape::new(dims)?;
        if shape.numel() != data.len() {
            return Err(TensorError::invalid_shape(dims));
        }
        Ok(Tensor { shape, data })
    }

    /// Shape inferred from the nesting, ragged input is rejected
    pub fn from_nested(nested: impl Into<Nested<T>>) -> Result<Tensor<T>> {
        let (dims, data) = nested.into().infer_shape_and_flatten()?;
        Tensor::from_vec(data, &dims)
    }

    /// Builds from raw data, optionally forcing a shape. A forced shape
    /// reinterprets the flattened cells, so only their count has to agree.
    pub fn from_data(data: impl Into<ArrayData<T>>, dims: Option<&[usize]>) -> Result<Tensor<T>> {
        let (inferred, cells) = match data.into() {
            ArrayData::Flat(v) => (vec![v.len()], v),
            ArrayData::Nested(n) => n.infer_shape_and_flatten()?,
        };
        match dims {
            Some(dims) => Tensor::from_vec(cells, dims),
            None => Tensor::from_vec(cells, &inferred),
        }
    }

    /// Same shape, different cells
    pub(crate) fn with_data<U>(&self, data: Vec<U>) -> Tensor<U> {
        debug_assert_eq!(data.len(), self.data.len());
        Tensor { shape: self.shape.clone(), data }
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.shape.dims()
    }

    #[inline]
    pub fn layout(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false, a tensor has at least one cell
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
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

    pub fn get(&self, coords: &[usize]) -> Result<T> {
        Ok(self.data[self.shape.offset(coords)?])
    }

    pub fn set(&mut self, value: T, coords: &[usize]) -> Result<()> {
        let i = self.shape.offset(coords)?;
        self.data[i] = value;
        Ok(())
    }

    /// Writes a dynamically typed value, floats never go into integer cells
    pub fn set_value(&mut self, value: Value, coords: &[usize]) -> Result<()> {
        let value = T::from_value(value)?;
        self.set(value, coords)
    }

    pub fn contains(&self, coords: &[isize]) -> bool {
        self.shape.contains(coords)
    }

    /// Copies the region `spec` selects. Dimensions addressed by a single
    /// index are dropped, unless that would leave no dimension at all.
    pub fn slice(&self, spec: &SliceSpec) -> Result<Tensor<T>> {
        self.slice_with(spec, false)
    }

    pub fn slice_with(&self, spec: &SliceSpec, keep_singletons: bool) -> Result<Tensor<T>> {
        let (mut dims, data) = copier::extract(&self.shape, &self.data, spec, keep_singletons)?;
        if dims.is_empty() && self.rank() > 0 {
            dims.push(1);
        }
        Ok(Tensor { shape: Shape::unchecked(&dims), data })
    }

    /// Copies `values` into the region `spec` selects. The shape of
    /// `values` must equal the region's shape with singletons kept.
    pub fn set_slice(&mut self, values: &Tensor<T>, spec: &SliceSpec) -> Result<()> {
        let target = spec.result_shape(self.shape(), true)?;
        let mut squeezed = spec.result_shape(self.shape(), false)?;
        if squeezed.is_empty() {
            squeezed.push(1);
        }
        // a slice taken without singletons goes back where it came from
        let src = if values.shape() == squeezed.as_slice() { target.as_slice() } else { values.shape() };
        copier::scatter(&self.shape, &mut self.data, spec, src, &values.data)
    }

    /// Copies raw data into the region. Flat data only has to provide the
    /// right number of cells, nested data must also have the right shape.
    pub fn set_array_as_slice(&mut self, values: impl Into<ArrayData<T>>, spec: &SliceSpec) -> Result<()> {
        match values.into() {
            ArrayData::Flat(v) => copier::scatter_flat(&self.shape, &mut self.data, spec, &v),
            ArrayData::Nested(n) => {
                let values = Tensor::from_nested(n)?;
                self.set_slice(&values, spec)
            }
        }
    }

    /// Single cell for a full coordinate, a sub-array for anything else
    pub fn select(&self, spec: &SliceSpec) -> Result<Selection<Tensor<T>, T>> {
        if spec.is_point() {
            spec.validate(self.shape())?;
            let coords = spec
                .point_coords()
                .ok_or_else(|| TensorError::mismatch(format!("{} is not a valid coordinate", spec)))?;
            return Ok(Selection::Scalar(self.get(&coords)?));
        }
        Ok(Selection::Array(self.slice(spec)?))
    }

    pub fn assign(&mut self, spec: &SliceSpec, value: Assign<'_, Tensor<T>, T>) -> Result<()> {
        match value {
            Assign::Scalar(v) => {
                let v = T::from_value(v)?;
                spec.validate(self.shape())?;
                match spec.point_coords() {
                    Some(coords) if spec.is_point() => self.set(v, &coords),
                    _ => Err(TensorError::mismatch(format!(
                        "a scalar can only be assigned to a single cell, got the slice {}",
                        spec
                    ))),
                }
            }
            Assign::Array(a) => self.set_slice(a, spec),
            Assign::Raw(raw) => self.set_array_as_slice(raw, spec),
        }
    }

    pub fn reshape(&self, dims: &[usize]) -> Result<Tensor<T>> {
        let mut out = self.clone();
        out.reshape_in_place(dims)?;
        Ok(out)
    }

    /// Reinterprets the cells under a new shape with the same cell count
    pub fn reshape_in_place(&mut self, dims: &[usize]) -> Result<&mut Self> {
        let shape = Shape::new(dims)?;
        if shape.numel() != self.len() {
            return Err(TensorError::mismatch(format!(
                "cannot reshape an array of shape {:?} into {:?}",
                self.shape(),
                dims
            )));
        }
        trace!("reshape {:?} into {:?}", self.shape(), dims);
        self.shape = shape;
        Ok(self)
    }

    pub fn squeeze(&self) -> Tensor<T> {
        let mut out = self.clone();
        out.squeeze_in_place();
        out
    }

    /// Drops every dimension of size 1
    pub fn squeeze_in_place(&mut self) -> &mut Self {
        let dims: Vec<usize> = self.shape().iter().copied().filter(|&d| d > 1).collect();
        self.shape = Shape::unchecked(&dims);
        self
    }

    pub fn add_dimension(&self, position: usize) -> Result<Tensor<T>> {
        let mut out = self.clone();
        out.add_dimension_in_place(position)?;
        Ok(out)
    }

    /// Inserts a size 1 dimension before `position`, `position == rank` appends
    pub fn add_dimension_in_place(&mut self, position: usize) -> Result<&mut Self> {
        if position > self.rank() {
            return Err(TensorError::mismatch(format!(
                "cannot insert a dimension at {} into an array of rank {}",
                position,
                self.rank()
            )));
        }
        let mut dims = self.shape().to_vec();
        dims.insert(position, 1);
        self.shape = Shape::unchecked(&dims);
        Ok(self)
    }

    /// Repeats the array `repeats[d]` times along every dimension
    pub fn tile(&self, repeats: &[usize]) -> Result<Tensor<T>> {
        if repeats.len() != self.rank() {
            return Err(TensorError::mismatch(format!(
                "tile needs one repeat count per dimension, expected {} got {}",
                self.rank(),
                repeats.len()
            )));
        }
        let dims = self
            .shape()
            .iter()
            .zip(repeats.iter())
            .map(|(d, &r)| d.checked_mul(r))
            .collect::<Option<Vec<usize>>>()
            .ok_or_else(|| TensorError::invalid_shape(repeats))?;
        let shape = Shape::new(&dims)?;
        let src = self.shape();
        let mut wrapped = vec![0; dims.len()];
        let data = Coords::new(&dims)
            .map(|c| {
                for (w, (&i, &d)) in wrapped.iter_mut().zip(c.iter().zip(src.iter())) {
                    *w = i % d;
                }
                self.data[self.shape.offset_unchecked(&wrapped)]
            })
            .collect();
        Ok(Tensor { shape, data })
    }

    /// Reorders the dimensions, result dimension `k` is source dimension
    /// `permutation[k]`. Without a permutation the dimensions are reversed.
    pub fn transpose(&self, permutation: Option<&[usize]>) -> Result<Tensor<T>> {
        let rank = self.rank();
        let perm: Vec<usize> = match permutation {
            Some(p) => p.to_vec(),
            None => (0..rank).rev().collect(),
        };
        if !is_permutation(&perm, rank) {
            return Err(TensorError::InvalidPermutation { permutation: perm });
        }

        let dims: Vec<usize> = perm.iter().map(|&p| self.shape()[p]).collect();
        trace!("transpose {:?} by {:?} into {:?}", self.shape(), perm, dims);
        let shape = Shape::unchecked(&dims);
        let mut data = self.data.clone();
        let mut dest = vec![0; rank];
        for (coords, &x) in Coords::new(self.shape()).zip(self.data.iter()) {
            for (d, &p) in dest.iter_mut().zip(perm.iter()) {
                *d = coords[p];
            }
            data[shape.offset_unchecked(&dest)] = x;
        }
        Ok(Tensor { shape, data })
    }

    pub fn map<U: Element, F: Fn(T) -> U>(&self, f: F) -> Tensor<U> {
        self.with_data(self.data.iter().map(|&x| f(x)).collect())
    }

    pub fn apply<F: FnMut(T) -> T>(&mut self, mut f: F) -> &mut Self {
        self.data.iter_mut().for_each(|x| *x = f(*x));
        self
    }

    pub fn to_nested(&self) -> Nested<T> {
        Nested::build(self.shape(), &self.data)
    }

    /// Same shape and every pair of cells within `tolerance` of each other
    pub fn equals_within(&self, other: &Tensor<T>, tolerance: f64) -> bool {
        self.shape == other.shape && self.data.iter().zip(other.data.iter()).all(|(&a, &b)| a.close_to(b, tolerance))
    }

    pub fn hash_code(&self) -> u64 {
        hash_cells(self.shape(), &self.data)
    }
}

impl<T: IntElement> Eq for Tensor<T> {}

impl<T: Element> Hash for Tensor<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_code().hash(state);
    }
}

impl<T: Element> Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        pretty_write(f, &self.data, self.shape())
    }
}

impl<T: Element> Index<&[usize]> for Tensor<T> {
    type Output = T;
    fn index(&self, coords: &[usize]) -> &T {
        match self.shape.offset(coords) {
            Ok(i) => &self.data[i],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Element> IndexMut<&[usize]> for Tensor<T> {
    fn index_mut(&mut self, coords: &[usize]) -> &mut T {
        match self.shape.offset(coords) {
            Ok(i) => &mut self.data[i],
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Element, const N: usize> Index<[usize; N]> for Tensor<T> {
    type Output = T;
    fn index(&self, coords: [usize; N]) -> &T {
        &self[&coords[..]]
    }
}

impl<T: Element, const N: usize> IndexMut<[usize; N]> for Tensor<T> {
    fn index_mut(&mut self, coords: [usize; N]) -> &mut T {
        &mut self[&coords[..]]
    }
}

impl<'a, T> IntoIterator for &'a Tensor<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Tensor<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}

impl<T> IntoIterator for Tensor<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
