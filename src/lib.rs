//! Dense N-dimensional tensors and 2-D matrices over integer and floating
//! point cells, with NumPy-like slicing, element-wise arithmetic, reductions
//! and a little linear algebra (matrix product, Householder QR).
//!
//! ```
//! use sds_lib::{slice, Tensor};
//!
//! let t = Tensor::from_nested(vec![vec![1i64, 2, 3], vec![4, 5, 6]]).unwrap();
//! let col = t.slice(&slice![.., 1]).unwrap();
//! assert_eq!(col.as_slice(), &[2, 5]);
//! assert_eq!(t.sum_axes(0usize, false).unwrap().as_slice(), &[5, 7, 9]);
//! ```

pub mod config;
pub mod element;
pub mod error;
pub mod matrix;
pub mod tensor;

pub use config::{Config, RandomConfig};
pub use element::{Element, FloatElement, IntElement, Value};
pub use error::{Result, TensorError};
pub use matrix::Matrix;
pub use tensor::{ArrayData, Assign, Axes, Nested, Selection, Shape, SliceEntry, SliceSpec, Tensor};
