use crate::error::{Result, TensorError};

/// Array-of-arrays input, the shape is implied by the nesting.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    Scalar(T),
    List(Vec<Nested<T>>),
}

/// Raw data handed to `from_data`/`set_array_as_slice`: either an unshaped
/// sequence or a nested structure whose own shape has to match.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData<T> {
    Flat(Vec<T>),
    Nested(Nested<T>),
}

impl<T> From<Vec<T>> for ArrayData<T> {
    fn from(v: Vec<T>) -> Self {
        ArrayData::Flat(v)
    }
}

impl<T> From<Nested<T>> for ArrayData<T> {
    fn from(n: Nested<T>) -> Self {
        ArrayData::Nested(n)
    }
}

impl<T: Copy> Nested<T> {
    pub fn from_flat(values: Vec<T>) -> Nested<T> {
        Nested::List(values.into_iter().map(Nested::Scalar).collect())
    }

    pub fn from_rows(rows: Vec<Vec<T>>) -> Nested<T> {
        Nested::List(rows.into_iter().map(Nested::from_flat).collect())
    }

    /// Derives the shape by following the first element at every level, then
    /// flattens level by level. Each sibling is only compared against the
    /// length of the first one, so a ragged list is caught when the odd
    /// sibling is reached.
    pub fn infer_shape_and_flatten(&self) -> Result<(Vec<usize>, Vec<T>)> {
        let mut shape = vec![];
        let mut cur = self;
        while let Nested::List(items) = cur {
            if items.is_empty() {
                return Err(TensorError::invalid_shape(&[0]));
            }
            shape.push(items.len());
            cur = &items[0];
        }

        let mut level = vec![self];
        for (depth, &width) in shape.iter().enumerate() {
            let mut next = Vec::with_capacity(level.len() * width);
            for node in level {
                match node {
                    Nested::List(items) if items.len() == width => next.extend(items.iter()),
                    Nested::List(items) => {
                        return Err(TensorError::mismatch(format!(
                            "ragged data: expected {} elements at depth {}, found {}",
                            width,
                            depth,
                            items.len()
                        )))
                    }
                    Nested::Scalar(_) => {
                        return Err(TensorError::mismatch(format!(
                            "ragged data: expected a list at depth {}, found a scalar",
                            depth
                        )))
                    }
                }
            }
            level = next;
        }

        let data = level
            .into_iter()
            .map(|node| match node {
                Nested::Scalar(x) => Ok(*x),
                Nested::List(_) => Err(TensorError::mismatch(format!(
                    "ragged data: expected scalars at depth {}",
                    shape.len()
                ))),
            })
            .collect::<Result<Vec<T>>>()?;
        Ok((shape, data))
    }

    /// Rebuilds the nesting for a row-major flat store
    pub fn build(dims: &[usize], data: &[T]) -> Nested<T> {
        match dims.split_first() {
            None => Nested::Scalar(data[0]),
            Some((&n, rest)) => {
                let step = rest.iter().product::<usize>();
                Nested::List((0..n).map(|i| Nested::build(rest, &data[i * step..(i + 1) * step])).collect())
            }
        }
    }
}

macro_rules! nested_from_vecs {
    ($($t:ty),*) => {$(
        impl From<$t> for Nested<$t> {
            fn from(x: $t) -> Self {
                Nested::Scalar(x)
            }
        }

        impl From<Vec<$t>> for Nested<$t> {
            fn from(v: Vec<$t>) -> Self {
                Nested::from_flat(v)
            }
        }

        impl From<Vec<Vec<$t>>> for Nested<$t> {
            fn from(v: Vec<Vec<$t>>) -> Self {
                Nested::List(v.into_iter().map(Nested::from).collect())
            }
        }

        impl From<Vec<Vec<Vec<$t>>>> for Nested<$t> {
            fn from(v: Vec<Vec<Vec<$t>>>) -> Self {
                Nested::List(v.into_iter().map(Nested::from).collect())
            }
        }

        impl From<Vec<Vec<Vec<Vec<$t>>>>> for Nested<$t> {
            fn from(v: Vec<Vec<Vec<Vec<$t>>>>) -> Self {
                Nested::List(v.into_iter().map(Nested::from).collect())
            }
        }
    )*};
}

nested_from_vecs!(i32, i64, f32, f64);
