use smallvec::SmallVec;

use crate::error::{Result, TensorError};

pub(crate) type Dims = SmallVec<[usize; 4]>;

/// Dimensions plus the row-major strides derived from them.
///
/// Every dimension is strictly positive. A rank 0 shape is allowed and
/// describes a single cell, it is what squeezing a `[1, 1]` array produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Dims,
    strides: Dims,
}

impl Shape {
    pub fn new(dims: &[usize]) -> Result<Shape> {
        check_dims(dims)?;
        Ok(Shape::unchecked(dims))
    }

    /// Like `new` but for user supplied signed sizes, so `-2` is reported
    /// as it was given instead of wrapping around
    pub fn from_signed(dims: &[isize]) -> Result<Shape> {
        if dims.iter().any(|&d| d <= 0) {
            return Err(TensorError::InvalidShape { dims: dims.to_vec() });
        }
        let dims: Dims = dims.iter().map(|&d| d as usize).collect();
        Shape::new(&dims)
    }

    pub(crate) fn unchecked(dims: &[usize]) -> Shape {
        let dims: Dims = dims.iter().copied().collect();
        let strides = compute_strides(&dims);
        Shape { dims, strides }
    }

    /// The layout a `height x width` matrix uses, strides `[width, 1]`
    pub(crate) fn matrix(height: usize, width: usize) -> Shape {
        Shape::unchecked(&[height, width])
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Linear offset of `coords` into the flat store
    pub fn offset(&self, coords: &[usize]) -> Result<usize> {
        if coords.len() != self.rank() {
            return Err(TensorError::mismatch(format!(
                "unexpected number of dimensions on the coordinates, expected {} got {}",
                self.rank(),
                coords.len()
            )));
        }
        let mut idx = 0;
        for ((&c, &d), &s) in coords.iter().zip(self.dims.iter()).zip(self.strides.iter()) {
            if c >= d {
                return Err(TensorError::mismatch(format!(
                    "the offset {:?} does not fit into the shape {:?}",
                    coords, self.dims
                )));
            }
            idx += c * s;
        }
        Ok(idx)
    }

    /// Same as `offset` for coordinates already known to be in range
    #[inline]
    pub(crate) fn offset_unchecked(&self, coords: &[usize]) -> usize {
        coords.iter().zip(self.strides.iter()).fold(0, |acc, (c, s)| acc + c * s)
    }

    /// Existence check used for membership queries. Unlike `offset` this
    /// tolerates negative coordinates down to `-dims[d]`.
    pub fn contains(&self, coords: &[isize]) -> bool {
        coords.len() == self.rank()
            && coords
                .iter()
                .zip(self.dims.iter())
                .all(|(&c, &d)| c < d as isize && c >= -(d as isize))
    }

    /// Inverse of `offset`
    pub fn unravel(&self, mut offset: usize) -> Vec<usize> {
        self.strides
            .iter()
            .map(|&s| {
                let c = offset / s;
                offset -= c * s;
                c
            })
            .collect()
    }
}

/// Every dimension positive and the cell count representable
pub(crate) fn check_dims(dims: &[usize]) -> Result<()> {
    let count = dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d));
    if dims.iter().any(|&d| d == 0) || count.is_none() {
        return Err(TensorError::invalid_shape(dims));
    }
    Ok(())
}

/// Computes the stride from dimensions, the last stride is always 1
pub(crate) fn compute_strides(dims: &[usize]) -> Dims {
    let mut strides = Dims::with_capacity(dims.len());
    let mut k = 1usize;
    for i in (0..dims.len()).rev() {
        strides.push(k);
        k *= dims[i];
    }
    strides.reverse();
    strides
}
