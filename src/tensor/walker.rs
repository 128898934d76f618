use crate::error::{Result, TensorError};

/// Increase the coordinate by 1 in row-major order, carrying over into the
/// outer dimensions. Returns false once the last coordinate has been passed,
/// in which case `coords` is left untouched.
pub fn advance(coords: &mut [usize], dims: &[usize]) -> bool {
    for i in (0..dims.len()).rev() {
        if coords[i] + 1 < dims[i] {
            coords[i] += 1;
            coords[i + 1..].iter_mut().for_each(|c| *c = 0);
            return true;
        }
    }
    false
}

/// Every coordinate of a shape, in row-major order, starting from all zeros
pub struct Coords {
    dims: Vec<usize>,
    cur: Vec<usize>,
    done: bool,
}

impl Coords {
    pub fn new(dims: &[usize]) -> Coords {
        Coords { dims: dims.to_vec(), cur: vec![0; dims.len()], done: dims.iter().any(|&d| d == 0) }
    }
}

impl Iterator for Coords {
    type Item = Vec<usize>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.cur.clone();
        self.done = !advance(&mut self.cur, &self.dims);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let total: usize = self.dims.iter().product();
        let strides = super::shape::compute_strides(&self.dims);
        let passed: usize = self.cur.iter().zip(strides.iter()).map(|(c, s)| c * s).sum();
        (total - passed, Some(total - passed))
    }
}

impl ExactSizeIterator for Coords {}

/// Selects the dimensions a reduction collapses: either a single axis or a
/// mask with one flag per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Axes {
    Axis(usize),
    Mask(Vec<bool>),
}

impl From<usize> for Axes {
    fn from(axis: usize) -> Self {
        Axes::Axis(axis)
    }
}

impl From<Vec<bool>> for Axes {
    fn from(mask: Vec<bool>) -> Self {
        Axes::Mask(mask)
    }
}

impl From<&[bool]> for Axes {
    fn from(mask: &[bool]) -> Self {
        Axes::Mask(mask.to_vec())
    }
}

impl<const N: usize> From<[bool; N]> for Axes {
    fn from(mask: [bool; N]) -> Self {
        Axes::Mask(mask.to_vec())
    }
}

impl Axes {
    pub fn to_mask(&self, rank: usize) -> Result<Vec<bool>> {
        match self {
            Axes::Axis(axis) => {
                if *axis >= rank {
                    return Err(TensorError::InvalidAxis { axis: *axis, rank });
                }
                let mut mask = vec![false; rank];
                mask[*axis] = true;
                Ok(mask)
            }
            Axes::Mask(mask) => {
                if mask.len() != rank {
                    return Err(TensorError::mismatch(format!(
                        "collapse mask has {} entries but the array has rank {}",
                        mask.len(),
                        rank
                    )));
                }
                Ok(mask.clone())
            }
        }
    }
}

/// Maps a coordinate (or a shape, with `shape_mode`) onto the reduced array:
/// collapsed dimensions become 0 in a coordinate and 1 in a shape.
pub fn collapse_dims(values: &[usize], mask: &[bool], shape_mode: bool) -> Vec<usize> {
    let fill = if shape_mode { 1 } else { 0 };
    values.iter().zip(mask.iter()).map(|(&v, &c)| if c { fill } else { v }).collect()
}

/// True when `perm` holds every index in `0..rank` exactly once
pub(crate) fn is_permutation(perm: &[usize], rank: usize) -> bool {
    let mut seen = vec![false; rank];
    perm.len() == rank && perm.iter().all(|&p| p < rank && !std::mem::replace(&mut seen[p], true))
}

/// The permutation that undoes `perm`, transposing by both gives the
/// original array back
pub fn inverse_permutation(perm: &[usize]) -> Result<Vec<usize>> {
    if !is_permutation(perm, perm.len()) {
        return Err(TensorError::InvalidPermutation { permutation: perm.to_vec() });
    }
    let mut inv = vec![0; perm.len()];
    for (k, &p) in perm.iter().enumerate() {
        inv[p] = k;
    }
    Ok(inv)
}
